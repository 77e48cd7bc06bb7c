use std::path::PathBuf;

use clap::Parser;

use crate::config_types::{OutputFormat, SelectionMode, TimeWindow};
use crate::resources::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "jail-report")]
#[command(about = "Report banned hosts per jail from the Fail2Ban database")]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Print version information and exit
    #[arg(short = 'v', long = "version")]
    pub show_version: bool,

    /// Config file location
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Fail2Ban database file, overriding `f2b_db_file` from the config
    #[arg(short = 'f', long = "db-file")]
    pub db_file: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output the report as JSON
    #[arg(short = 'j', long = "json-out", conflicts_with_all = ["markdown_out", "format"])]
    pub json_out: bool,

    /// Output the report as a markdown document
    #[arg(short = 'm', long = "markdown-out", conflicts_with = "format")]
    pub markdown_out: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Report every ban found in the database
    #[arg(short = 'a', long = "all-bans", conflicts_with = "previous_bans")]
    pub all_bans: bool,

    /// Report only bans that have already expired
    #[arg(short = 'p', long = "previous-bans")]
    pub previous_bans: bool,

    /// Comma-separated list of jails to include
    #[arg(short = 'J', long = "only-jails", value_delimiter = ',')]
    pub only_jails: Vec<String>,

    /// Only bans that started after this epoch timestamp
    #[arg(long)]
    pub after: Option<i64>,

    /// Only bans that started before this epoch timestamp
    #[arg(long)]
    pub before: Option<i64>,
}

impl Args {
    pub fn selection_mode(&self) -> SelectionMode {
        if self.all_bans {
            SelectionMode::All
        } else if self.previous_bans {
            SelectionMode::Previous
        } else {
            SelectionMode::Active
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json_out {
            OutputFormat::Json
        } else if self.markdown_out {
            OutputFormat::Markdown
        } else {
            self.format.unwrap_or_default()
        }
    }

    pub fn time_window(&self) -> TimeWindow {
        TimeWindow {
            after: self.after,
            before: self.before,
        }
    }

    /// Jail filter with blanks dropped.
    pub fn jail_filter(&self) -> Vec<String> {
        self.only_jails
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("jail-report").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);
        assert_eq!(args.selection_mode(), SelectionMode::Active);
        assert_eq!(args.output_format(), OutputFormat::Csv);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(args.time_window(), TimeWindow::default());
        assert!(args.jail_filter().is_empty());
        assert!(!args.show_version);
    }

    #[test]
    fn short_flags() {
        let args = parse(&["-p", "-m", "-Jsshd, postfix,", "-f", "/tmp/f2b.db", "-o", "out.md", "-v"]);
        assert_eq!(args.selection_mode(), SelectionMode::Previous);
        assert_eq!(args.output_format(), OutputFormat::Markdown);
        assert_eq!(args.jail_filter(), ["sshd", "postfix"]);
        assert_eq!(args.db_file, Some(PathBuf::from("/tmp/f2b.db")));
        assert_eq!(args.output, Some(PathBuf::from("out.md")));
        assert!(args.show_version);
    }

    #[test]
    fn long_flags() {
        let args = parse(&["--all-bans", "--format", "json", "--after", "10", "--before", "20"]);
        assert_eq!(args.selection_mode(), SelectionMode::All);
        assert_eq!(args.output_format(), OutputFormat::Json);
        assert_eq!(args.time_window(), TimeWindow { after: Some(10), before: Some(20) });
    }

    #[test]
    fn conflicting_selections_are_rejected() {
        let result = Args::try_parse_from(["jail-report", "-a", "-p"]);
        assert!(result.is_err());
        let result = Args::try_parse_from(["jail-report", "-j", "-m"]);
        assert!(result.is_err());
    }
}
