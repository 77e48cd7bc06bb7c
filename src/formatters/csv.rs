//! AbuseIPDB bulk-report CSV.

use std::fmt::Write;

use anyhow::Result;
use chrono::SecondsFormat;

use super::ReportFormatter;
use crate::ban_record::BanRecord;
use crate::config_precedence::ConfigResolver;
use crate::config_types::OutputFormat;
use crate::jail::Jail;

pub const CSV_HEADER: &str = "IP,Categories,ReportDate,Comment";

#[derive(Debug, Clone, Copy)]
pub struct CsvFormatter<'a> {
    config: ConfigResolver<'a>,
}

impl<'a> CsvFormatter<'a> {
    pub fn new(config: ConfigResolver<'a>) -> Self {
        Self { config }
    }
}

impl ReportFormatter for CsvFormatter<'_> {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn format(&self, jails: &[Jail]) -> Result<String> {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');

        for jail in jails {
            let categories = self.config.jail_categories(jail.name());
            for record in jail.reports() {
                let report_date = record
                    .banned_on_utc()
                    .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
                    .unwrap_or_default();
                writeln!(
                    out,
                    "{},{},{},{}",
                    quote(&record.host_address),
                    quote(&categories),
                    report_date,
                    quote(&comment(jail, record)),
                )?;
            }
        }

        Ok(out)
    }
}

fn comment(jail: &Jail, record: &BanRecord) -> String {
    let mut text = format!(
        "Banned by Fail2Ban jail {} ({} time(s))",
        jail.name(),
        record.ban_count
    );
    if let Some(failures) = record.failures() {
        text.push_str(&format!("; {failures} failed attempts"));
    }
    text
}

/// Quotes a field if it contains a separator, quote or line break.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
