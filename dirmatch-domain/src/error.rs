//! Fatal scan errors.
//!
//! Almost every failure is captured inside the scan result. The exception is a directory that
//! exists but cannot be listed: the call scanning it has nothing to report on and returns this
//! error to its caller instead.

use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot list directory {path}: {source}")]
    ListDir {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            ScanError::ListDir { path, .. } => path,
        }
    }

    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            ScanError::ListDir { source, .. } => source.kind(),
        }
    }
}
