use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DbScrubError {
    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbScrubError>;
