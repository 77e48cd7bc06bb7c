use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use jail_report::report::{load_report_jails, render_report};
use jail_report::{
    BanStore, ConfigResolver, ConfigTree, OutputFormat, QueryCatalog, ReportContext, SelectionMode,
    StoreError,
};
use rusqlite::{Connection, params};
use serde_json::Value;
use tempfile::TempDir;

const SCHEMA: &str = "
    CREATE TABLE jails (name TEXT NOT NULL UNIQUE, enabled INTEGER NOT NULL DEFAULT 1);
    CREATE TABLE bans (
        jail TEXT NOT NULL, ip TEXT, timeofban INTEGER NOT NULL,
        bantime INTEGER NOT NULL, bancount INTEGER NOT NULL DEFAULT 1, data JSON
    );
    CREATE TABLE bips (
        ip TEXT NOT NULL, jail TEXT NOT NULL, timeofban INTEGER NOT NULL,
        bantime INTEGER NOT NULL, bancount INTEGER NOT NULL DEFAULT 1, data JSON,
        PRIMARY KEY(ip, jail)
    );
";

struct Fixture {
    _dir: TempDir,
    db: PathBuf,
    now: i64,
}

/// sshd holds host A (banned 100s ago for 50s) and host B (banned 10s ago
/// for 500s).
fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("fail2ban.sqlite3");
    let now = Utc::now().timestamp();

    let conn = Connection::open(&db).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute("INSERT INTO jails VALUES ('sshd', 1), ('recidive', 0)", [])
        .unwrap();

    let bans: [(&str, i64, i64, &[u8]); 2] = [
        ("192.0.2.10", now - 100, 50, &br#"{"failures": 5, "matches": []}"#[..]),
        ("192.0.2.20", now - 10, 500, &b"\x00garbage"[..]),
    ];
    for (ip, at, duration, data) in bans {
        for table in ["bans", "bips"] {
            conn.execute(
                &format!(
                    "INSERT INTO {table} (jail, ip, timeofban, bantime, bancount, data) \
                     VALUES ('sshd', ?1, ?2, ?3, 1, ?4)"
                ),
                params![ip, at, duration, data],
            )
            .unwrap();
        }
    }
    conn.close().unwrap();

    Fixture { _dir: dir, db, now }
}

fn hosts(report: &Value, jail: usize) -> Vec<String> {
    report[jail]["reports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["host_address"].as_str().unwrap().to_owned())
        .collect()
}

fn json_report(db: &Path, config: &ConfigTree, selection: SelectionMode, now: i64, only: &[String]) -> Value {
    let defaults = ConfigTree::builtin_defaults().unwrap();
    let resolver = ConfigResolver::new(config, &defaults);
    let catalog = QueryCatalog::new(resolver);
    let ctx = ReportContext::new(selection, now, resolver.ban_ignore_threshold(now));
    let store = BanStore::open_read_only(db).unwrap();

    let text = render_report(&store, &catalog, &ctx, only, OutputFormat::Json).unwrap();
    store.close().unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn active_previous_and_all_reports() {
    let fx = fixture();
    let config = ConfigTree::empty();
    let only = vec!["sshd".to_string()];

    let active = json_report(&fx.db, &config, SelectionMode::Active, fx.now, &only);
    assert_eq!(hosts(&active, 0), ["192.0.2.20"]);
    assert_eq!(active[0]["reports"][0]["ban_data"], Value::Null);

    let previous = json_report(&fx.db, &config, SelectionMode::Previous, fx.now, &only);
    assert_eq!(hosts(&previous, 0), ["192.0.2.10"]);
    assert_eq!(previous[0]["reports"][0]["ban_data"]["failures"], 5);

    let all = json_report(&fx.db, &config, SelectionMode::All, fx.now, &only);
    assert_eq!(hosts(&all, 0), ["192.0.2.10", "192.0.2.20"]);
}

#[test]
fn every_jail_is_listed_without_a_filter() {
    let fx = fixture();
    let report = json_report(&fx.db, &ConfigTree::empty(), SelectionMode::Active, fx.now, &[]);

    let names: Vec<&str> = report
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["jail_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["recidive", "sshd"]);
    assert_eq!(report[0]["is_enabled"], false);
    assert_eq!(report[0]["jail_description"], Value::Null);
    assert_eq!(report[1]["jail_description"], "Brute-force attempts against the SSH daemon");
}

#[test]
fn user_config_overrides_queries_and_threshold() {
    let fx = fixture();
    let config_path = fx.db.with_file_name("config.json");
    fs::write(
        &config_path,
        r#"{
            // narrow active bans to the newer host
            "queries": {
                "get_banned_ips_per_jail_query": "SELECT ip, jail, timeofban, bantime, bancount, data FROM bips WHERE jail = '${JAIL}' AND ip = '192.0.2.20'",
            },
            "jail_descriptions": { "sshd": "ssh", },
        }"#,
    )
    .unwrap();
    let config = ConfigTree::load_or_empty(&config_path);

    let report = json_report(&fx.db, &config, SelectionMode::All, fx.now, &["sshd".to_string()]);
    assert_eq!(hosts(&report, 0).len(), 2);
    assert_eq!(report[0]["jail_description"], "ssh");

    let report = json_report(&fx.db, &config, SelectionMode::Active, fx.now, &["sshd".to_string()]);
    assert_eq!(hosts(&report, 0), ["192.0.2.20"]);

    // a threshold of one hour sits far below any real timestamp
    fs::write(&config_path, r#"{ "ignore_bans_older_than": 1 }"#).unwrap();
    let config = ConfigTree::load_or_empty(&config_path);
    let report = json_report(&fx.db, &config, SelectionMode::Active, fx.now, &["sshd".to_string()]);
    assert!(hosts(&report, 0).is_empty());
}

#[test]
fn markdown_and_csv_render_loaded_jails() {
    let fx = fixture();
    let primary = ConfigTree::from_value(serde_json::json!({"host_name": "edge-1"}));
    let defaults = ConfigTree::builtin_defaults().unwrap();
    let resolver = ConfigResolver::new(&primary, &defaults);
    let catalog = QueryCatalog::new(resolver);
    let ctx = ReportContext::new(SelectionMode::All, fx.now, resolver.ban_ignore_threshold(fx.now));
    let store = BanStore::open_read_only(&fx.db).unwrap();

    let jails = load_report_jails(&store, &catalog, &ctx, &[]);
    assert_eq!(jails[1].total_ban_count(), Some(2));

    let markdown = render_report(&store, &catalog, &ctx, &[], OutputFormat::Markdown).unwrap();
    assert!(markdown.starts_with("# General Overview for edge-1\n"));
    assert!(markdown.contains("# Statistics for sshd"));

    let csv = render_report(&store, &catalog, &ctx, &[], OutputFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "IP,Categories,ReportDate,Comment");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("192.0.2.10,\"18,22\","));
    store.close().unwrap();
}

#[test]
fn missing_database_is_an_open_failure() {
    let dir = tempfile::tempdir().unwrap();
    let result = BanStore::open_read_only(dir.path().join("nope.sqlite3"));
    assert!(matches!(result, Err(StoreError::Open { .. })));
}
