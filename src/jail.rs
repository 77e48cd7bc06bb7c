//! Jails and the bans loaded for them.

use rusqlite::Row;
use rusqlite::types::ValueRef;
use serde::Serialize;
use serde_json::Value;

use crate::ban_classifier::{ban_query_for, classify};
use crate::ban_record::{BanRecord, metadata_or_empty};
use crate::ban_store::BanStore;
use crate::config_types::{ReportContext, SelectionMode, TimeWindow};
use crate::query_catalog::{QueryCatalog, QueryName};

/// A named Fail2Ban filter rule and the bans reported for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Jail {
    #[serde(rename = "jail_name")]
    name: String,
    #[serde(rename = "jail_description")]
    description: Option<String>,
    #[serde(rename = "is_enabled")]
    enabled: bool,
    reports: Vec<BanRecord>,
    #[serde(skip)]
    loaded_for: Option<SelectionMode>,
    #[serde(skip)]
    total_ban_count: Option<u64>,
}

impl Jail {
    pub fn new(name: impl Into<String>, enabled: bool, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            enabled,
            reports: Vec::new(),
            loaded_for: None,
            total_ban_count: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Bans from the most recent [`Jail::load_banned`], in row order.
    pub fn reports(&self) -> &[BanRecord] {
        &self.reports
    }

    /// Mode of the most recent load, `None` before any load.
    pub fn loaded_for(&self) -> Option<SelectionMode> {
        self.loaded_for
    }

    pub fn total_ban_count(&self) -> Option<u64> {
        self.total_ban_count
    }

    /// Replaces the reports with the given records.
    pub fn set_reports(&mut self, mode: SelectionMode, reports: Vec<BanRecord>) {
        self.reports = reports;
        self.loaded_for = Some(mode);
    }

    /// Replaces the reports with the bans selected by `ctx`.
    ///
    /// A query that cannot be prepared leaves the jail empty; a failure
    /// mid-way keeps the rows read so far. A single unreadable row is skipped.
    /// All of these are logged, never returned.
    pub fn load_banned(&mut self, store: &BanStore, catalog: &QueryCatalog<'_>, ctx: &ReportContext) -> usize {
        self.reports.clear();
        self.loaded_for = Some(ctx.selection);

        let window = match ctx.selection {
            SelectionMode::All => TimeWindow::default(),
            _ => ctx.window,
        };
        let sql = catalog.windowed_jail_query(
            ban_query_for(ctx.selection, window),
            &self.name,
            window.after,
            window.before,
        );

        let reports = &mut self.reports;
        let name = &self.name;
        let result = store.for_each_row(&sql, |row| {
            match ban_from_row(row) {
                Ok(record) if classify(&record, ctx.selection, ctx.now, ctx.ignore_threshold) => {
                    reports.push(record);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(jail = %name, error = %e, "Skipping unreadable ban row"),
            }
            Ok(())
        });

        if let Err(e) = result {
            tracing::error!(jail = %self.name, error = %e, "Failed to load bans");
        }
        tracing::debug!(
            jail = %self.name,
            selection = ?ctx.selection,
            count = self.reports.len(),
            "Loaded bans"
        );
        self.reports.len()
    }

    /// Counts every ban ever recorded for this jail; 0 on failure.
    pub fn load_total_ban_count(&mut self, store: &BanStore, catalog: &QueryCatalog<'_>) -> u64 {
        let sql = catalog.jail_query(QueryName::CountBansForJail, &self.name);
        let total = scalar_or_zero(store, &sql, "Failed to count bans for jail");
        self.total_ban_count = Some(total);
        total
    }
}

fn jail_from_row(row: &Row<'_>, catalog: &QueryCatalog<'_>) -> rusqlite::Result<Jail> {
    let name: String = row.get(0)?;
    let enabled = row.get::<_, i64>(1)? != 0;
    let description = catalog.config().jail_description(&name);
    Ok(Jail::new(name, enabled, description))
}

/// Ban rows are `(ip, jail, timeofban, bantime, bancount, data)`. NULL reads
/// as empty or zero.
fn ban_from_row(row: &Row<'_>) -> rusqlite::Result<BanRecord> {
    let host = row.get::<_, Option<String>>(0)?.unwrap_or_default();
    let banned_at = row.get::<_, Option<i64>>(2)?.unwrap_or_default();
    let ban_duration = row.get::<_, Option<i64>>(3)?.unwrap_or_default();
    let ban_count = row.get::<_, Option<i64>>(4)?.unwrap_or_default();
    let metadata = match row.get_ref(5)? {
        ValueRef::Text(raw) | ValueRef::Blob(raw) => metadata_or_empty(raw, &host),
        _ => Value::Null,
    };

    Ok(BanRecord::new(host, banned_at, ban_duration, ban_count.max(0) as u64).with_metadata(metadata))
}

fn scalar_or_zero(store: &BanStore, sql: &str, message: &str) -> u64 {
    match store.query_scalar(sql) {
        Ok(value) => value.unwrap_or(0).max(0) as u64,
        Err(e) => {
            tracing::error!(error = %e, "{message}");
            0
        }
    }
}

/// Every jail in the database, in row order.
pub fn load_jails_from_source(store: &BanStore, catalog: &QueryCatalog<'_>) -> Vec<Jail> {
    let sql = catalog.query(QueryName::ListJails);
    store
        .query_rows(&sql, |row| jail_from_row(row, catalog))
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load jails");
            Vec::new()
        })
}

/// The jail called `name`, if the database has one.
pub fn load_jail_by_name(name: &str, store: &BanStore, catalog: &QueryCatalog<'_>) -> Option<Jail> {
    let sql = catalog.jail_query(QueryName::GetJail, name);
    let mut found = None;
    let result = store.for_each_row(&sql, |row| {
        if found.is_none() {
            found = Some(jail_from_row(row, catalog)?);
        }
        Ok(())
    });

    if let Err(e) = result {
        tracing::error!(jail = %name, error = %e, "Failed to load jail");
    }
    found
}

/// Jails named in `names`, in that order. Unknown names are skipped.
pub fn load_selected_jails<S: AsRef<str>>(
    names: &[S],
    store: &BanStore,
    catalog: &QueryCatalog<'_>,
) -> Vec<Jail> {
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !name.is_empty())
        .filter_map(|name| {
            let jail = load_jail_by_name(name, store, catalog);
            if jail.is_none() {
                tracing::warn!(jail = %name, "No such jail");
            }
            jail
        })
        .collect()
}

pub fn count_total_jails(store: &BanStore, catalog: &QueryCatalog<'_>) -> u64 {
    let sql = catalog.query(QueryName::CountJails);
    scalar_or_zero(store, &sql, "Failed to count jails")
}
