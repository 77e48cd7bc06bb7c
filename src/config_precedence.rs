//! Dot-path lookups over the user config with fallback to the built-in
//! defaults and finally to a caller-supplied value.

use crate::config_path::ConfigPath;
use crate::config_value::{ConfigTree, ConfigValue, FromConfigValue};
use crate::error::ConfigError;
use crate::resources::{DEFAULT_DB_FILE_PATH, FALLBACK_CATEGORIES};

const SECONDS_PER_HOUR: i64 = 3600;

/// Resolves a dot-notation path inside a single tree.
///
/// Every segment but the last must resolve to an object.
pub fn lookup<'t>(tree: &'t ConfigTree, path: &str) -> Result<&'t ConfigValue, ConfigError> {
    let mut current = tree.root();
    let mut segments = ConfigPath::new(path).peekable();

    while let Some(segment) = segments.next() {
        let found = current
            .as_object()
            .and_then(|object| object.get(segment))
            .ok_or_else(|| ConfigError::NotFound(path.to_owned()))?;

        if segments.peek().is_none() {
            return Ok(found);
        }
        if !found.is_object() {
            return Err(ConfigError::PathInvalid(path.to_owned()));
        }
        current = found;
    }

    Err(ConfigError::NotFound(path.to_owned()))
}

/// Resolves `path` in `tree` and converts the value to `T`.
pub fn get_from<T: FromConfigValue>(tree: &ConfigTree, path: &str) -> Result<T, ConfigError> {
    let value = lookup(tree, path)?;
    T::from_config_value(value).ok_or_else(|| ConfigError::TypeMismatch {
        key: path.to_owned(),
        expected: T::EXPECTED,
    })
}

/// Read-only view over the user config (primary) and the built-in defaults.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    primary: &'a ConfigTree,
    defaults: &'a ConfigTree,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(primary: &'a ConfigTree, defaults: &'a ConfigTree) -> Self {
        Self { primary, defaults }
    }

    /// Whether `path` exists in the primary config.
    pub fn has(&self, path: &str) -> bool {
        lookup(self.primary, path).is_ok()
    }

    /// Typed lookup against the primary config only.
    pub fn get<T: FromConfigValue>(&self, path: &str) -> Result<T, ConfigError> {
        get_from(self.primary, path)
    }

    /// Primary config first, then the defaults; `None` if neither yields a `T`.
    pub fn get_layered<T: FromConfigValue>(&self, path: &str) -> Option<T> {
        get_from(self.primary, path)
            .or_else(|_| get_from(self.defaults, path))
            .ok()
    }

    /// Like [`Self::get_layered`], returning `fallback` when both layers miss.
    pub fn try_get<T: FromConfigValue>(&self, path: &str, fallback: T) -> T {
        self.get_layered(path).unwrap_or(fallback)
    }

    pub fn db_file(&self) -> String {
        self.try_get("f2b_db_file", DEFAULT_DB_FILE_PATH.to_owned())
    }

    /// `ignore_bans_older_than` (hours) in seconds.
    ///
    /// Unconfigured, the hour count defaults to the current wall-clock time in
    /// hours, rounded up so the threshold never falls before `now`.
    pub fn ban_ignore_threshold(&self, now: i64) -> i64 {
        let now_in_hours = now.saturating_add(SECONDS_PER_HOUR - 1) / SECONDS_PER_HOUR;
        self.try_get("ignore_bans_older_than", now_in_hours)
            .saturating_mul(SECONDS_PER_HOUR)
    }

    pub fn jail_description(&self, jail: &str) -> Option<String> {
        self.get_layered(&format!("jail_descriptions.{jail}"))
    }

    /// AbuseIPDB categories for `jail`: per-jail entry, then
    /// `default_categories`, then Brute-Force.
    pub fn jail_categories(&self, jail: &str) -> String {
        let fallback = self.try_get("default_categories", FALLBACK_CATEGORIES.to_owned());
        self.try_get(&format!("jail_categories.{jail}"), fallback)
    }

    /// `host_name` from config, else the system host name.
    pub fn host_name(&self) -> String {
        self.get_layered::<String>("host_name")
            .or_else(|| hostname::get().ok().and_then(|h| h.into_string().ok()))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "localhost".to_owned())
    }
}
