use crate::{provider::read_certificate_file, TrustStoreEntries, TrustStoreError, TrustStoreProvider};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A single file with concatenated PEM certificates (`ca-certificates.crt`, `cert.pem`, ...).
#[derive(Debug, Clone)]
pub struct BundleTrustStore {
    path: PathBuf,
}

impl BundleTrustStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrustStoreProvider for BundleTrustStore {
    fn name(&self) -> &str {
        "bundle"
    }

    fn open(&self) -> Result<TrustStoreEntries<'_>, TrustStoreError> {
        let content = fs::read(&self.path).map_err(|err| TrustStoreError::io(&self.path, err))?;
        Ok(Box::new(read_certificate_file(&content).into_iter()))
    }

    fn store_path(&self) -> Result<String, TrustStoreError> {
        if self.path.is_file() {
            Ok(self.path.display().to_string())
        } else {
            Err(TrustStoreError::Unavailable(format!("{} is not a file", self.path.display())))
        }
    }
}
