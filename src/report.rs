//! One report run: pick the jails, load their bans, render.

use anyhow::Result;

use crate::ban_store::BanStore;
use crate::config_types::{OutputFormat, ReportContext};
use crate::formatters::formatter_for;
use crate::jail::{Jail, load_jails_from_source, load_selected_jails};
use crate::query_catalog::QueryCatalog;

/// Jails named in `only` (every jail when empty), with bans loaded for `ctx`.
pub fn load_report_jails(
    store: &BanStore,
    catalog: &QueryCatalog<'_>,
    ctx: &ReportContext,
    only: &[String],
) -> Vec<Jail> {
    let mut jails = if only.is_empty() {
        load_jails_from_source(store, catalog)
    } else {
        load_selected_jails(only, store, catalog)
    };

    for jail in &mut jails {
        jail.load_banned(store, catalog, ctx);
        jail.load_total_ban_count(store, catalog);
    }

    tracing::info!(
        jails = jails.len(),
        bans = jails.iter().map(|j| j.reports().len()).sum::<usize>(),
        "Loaded report data"
    );
    jails
}

pub fn render_report(
    store: &BanStore,
    catalog: &QueryCatalog<'_>,
    ctx: &ReportContext,
    only: &[String],
    format: OutputFormat,
) -> Result<String> {
    let jails = load_report_jails(store, catalog, ctx, only);
    formatter_for(format, *catalog.config()).format(&jails)
}
