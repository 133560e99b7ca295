use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

/// Failures while accessing a trust store. These never leave the export operations, they are
/// logged and turned into an empty export or a fallback path.
#[derive(Debug, ThisError)]
pub enum TrustStoreError {
    #[error("Trust store is unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to load native certificates: {0:?}")]
    Native(Vec<rustls_native_certs::Error>),
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),
    #[error("Invalid PEM data: {0}")]
    InvalidPem(String),
    #[error("Trust store has no filesystem location")]
    PathUnsupported,
    #[error("Trust store provider panicked: {0}")]
    Panicked(String),
}

impl TrustStoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
