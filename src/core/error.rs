use std::path::PathBuf;
use thiserror::Error;

/// Failure while rewriting one candidate file.
///
/// The engine logs these and moves on to the next file; they never abort a run.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    pub fn path(&self) -> &PathBuf {
        match self {
            FileError::Read { path, .. }
            | FileError::Decode { path, .. }
            | FileError::Write { path, .. } => path,
        }
    }
}
