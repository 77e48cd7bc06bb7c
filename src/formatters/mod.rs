//! Rendering of loaded jails into the supported report formats.

mod csv;
mod json;
mod markdown;

pub use csv::CsvFormatter;
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;

use anyhow::Result;

use crate::config_precedence::ConfigResolver;
use crate::config_types::OutputFormat;
use crate::jail::Jail;

pub trait ReportFormatter {
    fn output_format(&self) -> OutputFormat;

    fn format(&self, jails: &[Jail]) -> Result<String>;
}

/// The formatter for `format`, configured from `config`.
pub fn formatter_for<'a>(format: OutputFormat, config: ConfigResolver<'a>) -> Box<dyn ReportFormatter + 'a> {
    match format {
        OutputFormat::Csv => Box::new(CsvFormatter::new(config)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(config.host_name())),
    }
}
