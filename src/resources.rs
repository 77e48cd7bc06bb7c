//! Compile-time resources: default paths, the built-in config document and
//! the default query catalog.

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

pub const DEFAULT_CONFIG_PATH: &str = "/etc/jail_report/config.json";

pub const DEFAULT_DB_FILE_PATH: &str = "/var/lib/fail2ban/fail2ban.sqlite3";

/// Marker replaced with a jail name.
pub const JAIL_MARKER: &str = "${JAIL}";

/// Marker replaced with the lower timestamp bound (exclusive).
pub const AFTER_MARKER: &str = "${AFTER}";

/// Marker replaced with the upper timestamp bound (exclusive).
pub const BEFORE_MARKER: &str = "${BEFORE}";

/// AbuseIPDB "Brute-Force".
pub const FALLBACK_CATEGORIES: &str = "18";

pub const FALLBACK_JAIL_DESCRIPTION: &str = "A Fail2Ban jail";

/// Built-in configuration. Consulted whenever the user config lacks a key.
///
/// `ignore_bans_older_than` is intentionally missing so the wall-clock
/// default applies.
pub const DEFAULT_CONFIG: &str = r#"{
    // location of the Fail2Ban database
    "f2b_db_file": "/var/lib/fail2ban/fail2ban.sqlite3",

    // AbuseIPDB categories used when a jail has none of its own
    "default_categories": "18",
    "jail_categories": {
        "sshd": "18,22",
    },

    "jail_descriptions": {
        "sshd": "Brute-force attempts against the SSH daemon",
    },
}"#;

/// Default SQL for every known query name. Ban queries return
/// `(ip, jail, timeofban, bantime, bancount, data)`.
pub const DEFAULT_QUERIES: &[(&str, &str)] = &[
    ("get_jails_query", "SELECT name, enabled FROM jails ORDER BY name"),
    ("count_jails_query", "SELECT COUNT(*) FROM jails"),
    (
        "get_all_banned_ips_query",
        "SELECT ip, jail, timeofban, bantime, bancount, data FROM bans \
         WHERE jail = '${JAIL}' ORDER BY timeofban",
    ),
    (
        "get_banned_ips_per_jail_query",
        "SELECT ip, jail, timeofban, bantime, bancount, data FROM bips \
         WHERE jail = '${JAIL}' ORDER BY timeofban",
    ),
    (
        "get_banned_ips_after_tstamp_query",
        "SELECT ip, jail, timeofban, bantime, bancount, data FROM bips \
         WHERE jail = '${JAIL}' AND timeofban > ${AFTER} ORDER BY timeofban",
    ),
    (
        "get_banned_ips_before_tstamp_query",
        "SELECT ip, jail, timeofban, bantime, bancount, data FROM bips \
         WHERE jail = '${JAIL}' AND timeofban < ${BEFORE} ORDER BY timeofban",
    ),
    (
        "get_banned_ips_between_tstamps_query",
        "SELECT ip, jail, timeofban, bantime, bancount, data FROM bips \
         WHERE jail = '${JAIL}' AND timeofban > ${AFTER} AND timeofban < ${BEFORE} \
         ORDER BY timeofban",
    ),
    (
        "get_specific_jail_query",
        "SELECT name, enabled FROM jails WHERE name = '${JAIL}'",
    ),
    (
        "count_bans_for_jail_query",
        "SELECT COUNT(*) FROM bans WHERE jail = '${JAIL}'",
    ),
];
