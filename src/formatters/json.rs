use anyhow::{Context, Result};

use super::ReportFormatter;
use crate::config_types::OutputFormat;
use crate::jail::Jail;

/// Pretty-printed array of per-jail report objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn format(&self, jails: &[Jail]) -> Result<String> {
        serde_json::to_string_pretty(jails).context("Failed to serialize jails")
    }
}
