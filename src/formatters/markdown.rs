use std::fmt::Write;

use anyhow::Result;
use chrono::SecondsFormat;

use super::ReportFormatter;
use crate::config_types::OutputFormat;
use crate::jail::Jail;
use crate::resources::FALLBACK_JAIL_DESCRIPTION;

const JAIL_NAME_HEADER: &str = " Jail Name ";
const JAIL_ACTIVE_HEADER: &str = " Jail Active ";
const TOTAL_BANS_HEADER: &str = " Total Bans in Jail ";
const REPORTED_BANS_HEADER: &str = " Reported Bans in Jail ";

/// Overview table followed by one section per jail.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    host_name: String,
}

impl MarkdownFormatter {
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
        }
    }

    fn write_overview(&self, out: &mut String, jails: &[Jail]) -> std::fmt::Result {
        writeln!(out, "# General Overview for {}", self.host_name)?;
        writeln!(out)?;

        let name_width = jails
            .iter()
            .map(|jail| jail.name().len() + 2)
            .chain([JAIL_NAME_HEADER.len()])
            .max()
            .unwrap_or(JAIL_NAME_HEADER.len());
        let widths = [
            name_width,
            JAIL_ACTIVE_HEADER.len(),
            TOTAL_BANS_HEADER.len(),
            REPORTED_BANS_HEADER.len(),
        ];

        let headers = [
            JAIL_NAME_HEADER.trim(),
            JAIL_ACTIVE_HEADER.trim(),
            TOTAL_BANS_HEADER.trim(),
            REPORTED_BANS_HEADER.trim(),
        ];
        write_row(out, &widths, &headers)?;
        let separators = widths.map(|width| "-".repeat(width));
        writeln!(out, "|{}|", separators.join("|"))?;

        for jail in jails {
            let total = jail
                .total_ban_count()
                .map_or_else(|| "-".to_owned(), |count| count.to_string());
            let reported = jail.reports().len().to_string();
            let cells = [
                jail.name(),
                if jail.is_enabled() { "yes" } else { "no" },
                total.as_str(),
                reported.as_str(),
            ];
            write_row(out, &widths, &cells)?;
        }
        Ok(())
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }

    fn format(&self, jails: &[Jail]) -> Result<String> {
        let mut out = String::new();
        self.write_overview(&mut out, jails)?;
        for jail in jails {
            writeln!(out)?;
            write_jail_section(&mut out, jail)?;
        }
        Ok(out)
    }
}

fn write_row(out: &mut String, widths: &[usize], cells: &[&str]) -> std::fmt::Result {
    for (width, cell) in widths.iter().zip(cells) {
        write!(out, "|{}", centre(*width, cell))?;
    }
    writeln!(out, "|")
}

fn write_jail_section(out: &mut String, jail: &Jail) -> std::fmt::Result {
    writeln!(out, "# Statistics for {}", jail.name())?;
    writeln!(
        out,
        "## Jail description: {}",
        jail.description().unwrap_or(FALLBACK_JAIL_DESCRIPTION)
    )?;
    writeln!(out)?;

    if jail.reports().is_empty() {
        return writeln!(out, "_No bans reported._");
    }

    writeln!(out, "| Host | Banned On | Banned For | Ban Count |")?;
    writeln!(out, "|------|-----------|------------|-----------|")?;
    for record in jail.reports() {
        let banned_on = record
            .banned_on_utc()
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| record.banned_at.to_string());
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            record.host_address,
            banned_on,
            human_duration(record.ban_duration),
            record.ban_count
        )?;
    }
    Ok(())
}

/// Pads `text` on both sides to `width`; extra padding goes right.
fn centre(width: usize, text: &str) -> String {
    let padding = width.saturating_sub(text.len());
    let left = padding / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(padding - left))
}

/// `90061` → `1d 1h 1m 1s`.
fn human_duration(seconds: i64) -> String {
    if seconds < 60 {
        return format!("{}s", seconds.max(0));
    }

    let units = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];
    let mut remaining = seconds;
    let mut parts = Vec::new();
    for (size, suffix) in units {
        let amount = remaining / size;
        remaining %= size;
        if amount > 0 {
            parts.push(format!("{amount}{suffix}"));
        }
    }
    parts.join(" ")
}
