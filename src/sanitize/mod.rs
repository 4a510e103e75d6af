//! Sanitization facades: the enabled-flag gate, memoization, and dispatch to
//! the SQL parser or the command table.

pub mod command;
pub mod statement;

pub use command::CommandSanitizer;
pub use statement::StatementSanitizer;
