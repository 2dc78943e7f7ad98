use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a migration pass. Malformed records are not errors;
/// see [`crate::record::Malformed`].
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("invalid table: {0}")]
    InvalidTable(String),
    #[error("template id '{0}' appears more than once")]
    DuplicateId(String),
    #[error("ids '{first}' and '{second}' both map to symbol '{name}'")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },
}

impl MigrateError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MigrateError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
