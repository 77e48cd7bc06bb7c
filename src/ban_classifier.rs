//! Decides which ban rows make it into a report.

use crate::ban_record::BanRecord;
use crate::config_types::{SelectionMode, TimeWindow};
use crate::query_catalog::QueryName;

/// Whether `record` belongs in a report for `mode` at time `now`.
///
/// * `All` keeps everything.
/// * `Active` drops bans whose window ended before `now`, and bans that
///   started after `ignore_threshold`. The threshold is compared against the
///   raw start timestamp.
/// * `Previous` keeps only bans whose window has ended by `now`.
///
/// At `now == banned_at + ban_duration` a ban counts as both active and
/// previous.
pub fn classify(record: &BanRecord, mode: SelectionMode, now: i64, ignore_threshold: i64) -> bool {
    match mode {
        SelectionMode::All => true,
        SelectionMode::Active => {
            let elapsed = record.banned_until() < now;
            let ignored = record.banned_at > ignore_threshold;
            !(elapsed || ignored)
        }
        SelectionMode::Previous => now >= record.banned_until(),
    }
}

/// The row query a jail's bans are loaded with.
///
/// Active and previous reports share a query and differ only in
/// [`classify`]; a bounded window narrows it by timestamp. `All` reads the
/// full history.
pub fn ban_query_for(mode: SelectionMode, window: TimeWindow) -> QueryName {
    if mode == SelectionMode::All {
        return QueryName::ListAllBans;
    }
    match (window.after, window.before) {
        (None, None) => QueryName::ListBansForJail,
        (Some(_), None) => QueryName::ListBansAfter,
        (None, Some(_)) => QueryName::ListBansBefore,
        (Some(_), Some(_)) => QueryName::ListBansBetween,
    }
}
