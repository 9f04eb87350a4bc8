//! Build error types.

use std::path::PathBuf;

use cdk46kb_config::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    /// A required input file is absent. Terminal for the item it feeds.
    #[error("missing source file {}", .path.display())]
    MissingSource { path: PathBuf },

    /// An input exists but is not usable tabular/JSON data. Terminal for the item it feeds.
    #[error("cannot parse {}: {reason}", .path.display())]
    ParseFailure { path: PathBuf, reason: String },

    /// An output could not be written. Terminal for the whole build.
    #[error("cannot write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BuildError {
    /// Fatal errors stop the build; the rest only skip one item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BuildError::WriteFailure { .. } | BuildError::Config(_))
    }

    /// The input or output file the error concerns, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            BuildError::MissingSource { path }
            | BuildError::ParseFailure { path, .. }
            | BuildError::WriteFailure { path, .. } => Some(path),
            BuildError::Config(_) => None,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::WriteFailure { path: path.into(), source }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        BuildError::ParseFailure { path: path.into(), reason: reason.to_string() }
    }
}
