//! Redaction and classification of database and cache statements for telemetry.
//!
//! SQL-like statements go through [`StatementSanitizer`], which replaces every
//! literal with `?` and extracts the operation and target table. Redis-style
//! commands go through [`CommandSanitizer`], which applies a per-command
//! [`CommandStrategy`]. Both memoize results in a [`BoundedCache`] and never fail.
//!
//! ```
//! use dbscrub::{SanitizerConfig, StatementSanitizer};
//!
//! let sanitizer = StatementSanitizer::new(&SanitizerConfig::default());
//! let info = sanitizer.sanitize("SELECT * FROM users WHERE name = 'alice'");
//! assert_eq!(info.sanitized_text.as_deref(), Some("SELECT * FROM users WHERE name = ?"));
//! assert_eq!(info.operation.as_deref(), Some("SELECT"));
//! assert_eq!(info.table.as_deref(), Some("users"));
//! ```

pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod sql;
pub mod statement;

pub use cache::{BoundedCache, CacheStats};
pub use command::{normalize, CommandArg, CommandStrategy};
pub use config::SanitizerConfig;
pub use error::{DbScrubError, Result};
pub use sanitize::{CommandSanitizer, StatementSanitizer};
pub use sql::SqlParser;
pub use statement::{SqlDialect, StatementInfo};
