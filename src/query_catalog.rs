//! Named SQL templates: user overrides under `queries.<name>`, falling back to
//! the compiled-in catalog.

use crate::config_precedence::ConfigResolver;
use crate::resources::{AFTER_MARKER, BEFORE_MARKER, DEFAULT_QUERIES, JAIL_MARKER};

/// The queries this tool issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryName {
    ListJails,
    CountJails,
    ListAllBans,
    ListBansForJail,
    ListBansAfter,
    ListBansBefore,
    ListBansBetween,
    GetJail,
    CountBansForJail,
}

impl QueryName {
    pub const ALL: [QueryName; 9] = [
        QueryName::ListJails,
        QueryName::CountJails,
        QueryName::ListAllBans,
        QueryName::ListBansForJail,
        QueryName::ListBansAfter,
        QueryName::ListBansBefore,
        QueryName::ListBansBetween,
        QueryName::GetJail,
        QueryName::CountBansForJail,
    ];

    /// Config key under `queries`.
    pub fn as_str(self) -> &'static str {
        match self {
            QueryName::ListJails => "get_jails_query",
            QueryName::CountJails => "count_jails_query",
            QueryName::ListAllBans => "get_all_banned_ips_query",
            QueryName::ListBansForJail => "get_banned_ips_per_jail_query",
            QueryName::ListBansAfter => "get_banned_ips_after_tstamp_query",
            QueryName::ListBansBefore => "get_banned_ips_before_tstamp_query",
            QueryName::ListBansBetween => "get_banned_ips_between_tstamps_query",
            QueryName::GetJail => "get_specific_jail_query",
            QueryName::CountBansForJail => "count_bans_for_jail_query",
        }
    }
}

/// Built-in SQL for `name`, or an empty string for unknown names.
pub fn default_query(name: &str) -> &'static str {
    DEFAULT_QUERIES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, sql)| *sql)
        .unwrap_or_default()
}

/// Replaces the first occurrence of `marker` in `template`.
///
/// Later occurrences stay literal. Without a marker the template is returned
/// unchanged.
pub fn substitute(template: &str, marker: &str, value: &str) -> String {
    template.replacen(marker, value, 1)
}

#[derive(Debug, Clone, Copy)]
pub struct QueryCatalog<'a> {
    config: ConfigResolver<'a>,
}

impl<'a> QueryCatalog<'a> {
    pub fn new(config: ConfigResolver<'a>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConfigResolver<'a> {
        &self.config
    }

    /// SQL text for `name`. Never fails; unknown names yield `""`.
    pub fn get_query(&self, name: &str) -> String {
        self.config
            .get::<String>(&format!("queries.{name}"))
            .unwrap_or_else(|_| default_query(name).to_owned())
    }

    pub fn query(&self, name: QueryName) -> String {
        self.get_query(name.as_str())
    }

    /// `name` with the jail marker filled in.
    pub fn jail_query(&self, name: QueryName, jail: &str) -> String {
        substitute(&self.query(name), JAIL_MARKER, jail)
    }

    /// `name` with jail and timestamp markers filled in.
    pub fn windowed_jail_query(
        &self,
        name: QueryName,
        jail: &str,
        after: Option<i64>,
        before: Option<i64>,
    ) -> String {
        let mut sql = self.jail_query(name, jail);
        if let Some(after) = after {
            sql = substitute(&sql, AFTER_MARKER, &after.to_string());
        }
        if let Some(before) = before {
            sql = substitute(&sql, BEFORE_MARKER, &before.to_string());
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_value::ConfigTree;
    use serde_json::json;

    #[test]
    fn substitutes_only_first_marker() {
        let sql = substitute(
            "SELECT * FROM t WHERE j='${JAIL}' AND k='${JAIL}'",
            "${JAIL}",
            "sshd",
        );
        assert_eq!(sql, "SELECT * FROM t WHERE j='sshd' AND k='${JAIL}'");
    }

    #[test]
    fn substitute_without_marker_is_identity() {
        assert_eq!(substitute("SELECT 1", "${JAIL}", "sshd"), "SELECT 1");
    }

    #[test]
    fn every_known_name_has_a_default() {
        for name in QueryName::ALL {
            assert!(!default_query(name.as_str()).is_empty(), "{}", name.as_str());
        }
    }

    #[test]
    fn user_override_wins() {
        let primary = ConfigTree::from_value(json!({
            "queries": {"get_jails_query": "SELECT name, 1 FROM jails"}
        }));
        let defaults = ConfigTree::empty();
        let catalog = QueryCatalog::new(ConfigResolver::new(&primary, &defaults));

        assert_eq!(catalog.query(QueryName::ListJails), "SELECT name, 1 FROM jails");
        assert_eq!(
            catalog.query(QueryName::CountJails),
            default_query("count_jails_query")
        );
    }

    #[test]
    fn non_string_override_is_ignored() {
        let primary = ConfigTree::from_value(json!({"queries": {"count_jails_query": 5}}));
        let defaults = ConfigTree::empty();
        let catalog = QueryCatalog::new(ConfigResolver::new(&primary, &defaults));

        assert_eq!(catalog.query(QueryName::CountJails), "SELECT COUNT(*) FROM jails");
    }

    #[test]
    fn unknown_name_is_empty() {
        let primary = ConfigTree::empty();
        let defaults = ConfigTree::empty();
        let catalog = QueryCatalog::new(ConfigResolver::new(&primary, &defaults));

        assert_eq!(catalog.get_query("drop_everything_query"), "");
    }

    #[test]
    fn fills_jail_and_window_markers() {
        let primary = ConfigTree::empty();
        let defaults = ConfigTree::empty();
        let catalog = QueryCatalog::new(ConfigResolver::new(&primary, &defaults));

        let sql = catalog.windowed_jail_query(QueryName::ListBansBetween, "sshd", Some(10), Some(20));
        assert!(sql.contains("jail = 'sshd'"));
        assert!(sql.contains("timeofban > 10"));
        assert!(sql.contains("timeofban < 20"));
        assert!(!sql.contains("${"));
    }
}
