use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::resources::DEFAULT_CONFIG;

/// A parsed configuration value: null, bool, number, string, array or an
/// ordered object.
pub type ConfigValue = Value;

/// An immutable configuration document.
///
/// Accepts JSON with comments and trailing commas:
/// ```JSON
/// {
///     // where fail2ban keeps its state
///     "f2b_db_file": "/var/lib/fail2ban/fail2ban.sqlite3",
///     "ignore_bans_older_than": 48,
///     "jail_descriptions": { "sshd": "SSH brute force", },
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: ConfigValue,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigTree {
    /// A tree with an empty root object.
    pub fn empty() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    pub fn from_value(root: ConfigValue) -> Self {
        Self { root }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let root: ConfigValue =
            json5::from_str(text).with_context(|| "Invalid config: expected a JSON document")?;
        Ok(Self { root })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Loads the user config, degrading to an empty tree (so only built-in
    /// defaults apply) when the file is missing or malformed.
    pub fn load_or_empty(path: &Path) -> Self {
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "Config file not found, using built-in defaults");
            return Self::empty();
        }
        Self::from_path(path).unwrap_or_else(|e| {
            tracing::error!(error = ?e, "Failed to parse config, using built-in defaults");
            Self::empty()
        })
    }

    /// The compiled-in default document.
    pub fn builtin_defaults() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG).context("Built-in default config is malformed")
    }

    pub fn root(&self) -> &ConfigValue {
        &self.root
    }
}

/// Conversion of a stored value into a requested type.
///
/// Numbers convert to any integer type (truncating), strings only to
/// `String`, arrays only to `Vec<T>` whose elements all convert, and any
/// value converts to a raw [`ConfigValue`].
pub trait FromConfigValue: Sized {
    /// Name used in type mismatch diagnostics.
    const EXPECTED: &'static str;

    fn from_config_value(value: &ConfigValue) -> Option<Self>;
}

impl FromConfigValue for ConfigValue {
    const EXPECTED: &'static str = "value";

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromConfigValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromConfigValue for String {
    const EXPECTED: &'static str = "string";

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl<T: FromConfigValue> FromConfigValue for Vec<T> {
    const EXPECTED: &'static str = "array";

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        value.as_array()?.iter().map(T::from_config_value).collect()
    }
}

macro_rules! impl_from_config_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromConfigValue for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_config_value(value: &ConfigValue) -> Option<Self> {
                    let Value::Number(number) = value else {
                        return None;
                    };
                    if let Some(v) = number.as_i64() {
                        Some(v as $ty)
                    } else if let Some(v) = number.as_u64() {
                        Some(v as $ty)
                    } else {
                        number.as_f64().map(|v| v as $ty)
                    }
                }
            }
        )*
    };
}

impl_from_config_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
