//! Reports banned hosts per jail from a Fail2Ban database.
//!
//! Settings and SQL come from a JSON config resolved through dot-notation
//! paths (`jail_descriptions.sshd`), falling back to built-in defaults. Ban
//! rows are classified as active, previous or unconditionally included, then
//! rendered as AbuseIPDB CSV, JSON or markdown.

pub mod ban_classifier;
pub mod ban_record;
pub mod ban_store;
pub mod cli;
pub mod config_path;
pub mod config_precedence;
pub mod config_types;
pub mod config_value;
pub mod error;
pub mod formatters;
pub mod jail;
pub mod query_catalog;
pub mod report;
pub mod resources;

pub use ban_classifier::classify;
pub use ban_record::BanRecord;
pub use ban_store::BanStore;
pub use config_precedence::ConfigResolver;
pub use config_types::{OutputFormat, ReportContext, SelectionMode, TimeWindow};
pub use config_value::{ConfigTree, ConfigValue, FromConfigValue};
pub use error::{ConfigError, MetadataParseError, StoreError};
pub use jail::Jail;
pub use query_catalog::{QueryCatalog, QueryName};
