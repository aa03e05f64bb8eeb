use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A failure that ends a conversion run.
///
/// Each variant names the path being worked on; the message reads
/// `unable to <operation> <path>` and the cause is available through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unable to retrieve {} stats", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to read {} as directory", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to read {} content", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse {} code", path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("unable to mark {} as CommonJS", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to create {} folder", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to write on {} file", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    /// Short name of the step that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            ConvertError::Stat { .. } => "stat",
            ConvertError::ReadDir { .. } => "read directory",
            ConvertError::Read { .. } => "read",
            ConvertError::Transform { .. } => "transform",
            ConvertError::Manifest { .. } => "write manifest",
            ConvertError::CreateDir { .. } => "create directory",
            ConvertError::Write { .. } => "write",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConvertError::Stat { path, .. }
            | ConvertError::ReadDir { path, .. }
            | ConvertError::Read { path, .. }
            | ConvertError::Transform { path, .. }
            | ConvertError::Manifest { path, .. }
            | ConvertError::CreateDir { path, .. }
            | ConvertError::Write { path, .. } => path,
        }
    }
}
