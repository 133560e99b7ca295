use crate::{provider::read_certificate_file, TrustStoreEntries, TrustStoreError, TrustStoreProvider};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A directory with one or more certificates per file, like the Android system store
/// (`/system/etc/security/cacerts`) or an OpenSSL hashed directory.
///
/// Files are visited in name order, sub-directories are ignored.
#[derive(Debug, Clone)]
pub struct DirectoryTrustStore {
    path: PathBuf,
}

impl DirectoryTrustStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Regular files of a directory in name order.
pub(crate) fn list_certificate_files(dir: &Path) -> Result<Vec<PathBuf>, TrustStoreError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|err| TrustStoreError::io(dir, err))? {
        let entry = entry.map_err(|err| TrustStoreError::io(dir, err))?;
        let path = entry.path();
        // follows symlinks, hashed directories are usually links to the real files
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read the files one by one as the entries are consumed.
pub(crate) fn read_certificate_files(files: Vec<PathBuf>) -> TrustStoreEntries<'static> {
    Box::new(files.into_iter().flat_map(|file| match fs::read(&file) {
        Ok(content) => read_certificate_file(&content),
        Err(err) => vec![Err(TrustStoreError::io(file, err))],
    }))
}

impl TrustStoreProvider for DirectoryTrustStore {
    fn name(&self) -> &str {
        "directory"
    }

    fn open(&self) -> Result<TrustStoreEntries<'_>, TrustStoreError> {
        let files = list_certificate_files(&self.path)?;
        log::debug!("Found {} files in {}", files.len(), self.path.display());
        Ok(read_certificate_files(files))
    }

    fn store_path(&self) -> Result<String, TrustStoreError> {
        if self.path.is_dir() {
            Ok(self.path.display().to_string())
        } else {
            Err(TrustStoreError::Unavailable(format!(
                "{} is not a directory",
                self.path.display()
            )))
        }
    }
}
