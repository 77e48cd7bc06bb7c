use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which temporal subset of bans a report includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Bans whose window has not yet elapsed.
    #[default]
    Active,
    /// Bans whose window has already elapsed.
    Previous,
    /// Every ban, unfiltered.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// AbuseIPDB bulk-report CSV
    #[default]
    Csv,
    Json,
    Markdown,
}

/// Optional exclusive bounds on `timeofban`, in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub after: Option<i64>,
    pub before: Option<i64>,
}

/// Everything a single report run needs, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContext {
    pub selection: SelectionMode,
    pub window: TimeWindow,
    /// Epoch seconds the run treats as "now".
    pub now: i64,
    /// Bans starting after this timestamp are left out of active reports.
    pub ignore_threshold: i64,
}

impl ReportContext {
    pub fn new(selection: SelectionMode, now: i64, ignore_threshold: i64) -> Self {
        Self {
            selection,
            window: TimeWindow::default(),
            now,
            ignore_threshold,
        }
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }
}
