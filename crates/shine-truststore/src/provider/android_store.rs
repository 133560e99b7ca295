use super::directory_store::{list_certificate_files, read_certificate_files};
use crate::{expand_env, TrustStoreEntries, TrustStoreError, TrustStoreProvider};
use std::{
    collections::HashSet,
    ffi::OsString,
    path::{Path, PathBuf},
};

/// System store updated through the conscrypt module, Android 14+.
pub const ANDROID_APEX_CACERTS: &str = "/apex/com.android.conscrypt/cacerts";
/// System store of the platform image.
pub const ANDROID_SYSTEM_CACERTS: &str = "${ANDROID_ROOT:-/system}/etc/security/cacerts";
/// Certificates installed by the (primary) user.
pub const ANDROID_USER_ADDED_CACERTS: &str = "/data/misc/user/0/cacerts-added";
/// System certificates disabled by the (primary) user, stored under the name of the system file.
pub const ANDROID_USER_REMOVED_CACERTS: &str = "/data/misc/user/0/cacerts-removed";

/// The CA store of Android as the platform trust manager sees it: the system certificates without the ones the
/// user has disabled, followed by the certificates the user has installed.
///
/// The first existing system directory is used.
#[derive(Debug, Clone)]
pub struct AndroidTrustStore {
    system_dirs: Vec<PathBuf>,
    user_added_dir: Option<PathBuf>,
    user_removed_dir: Option<PathBuf>,
}

impl Default for AndroidTrustStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AndroidTrustStore {
    /// Store with the well-known locations, `ANDROID_ROOT` is read when the store is created.
    pub fn new() -> Self {
        Self {
            system_dirs: vec![
                PathBuf::from(ANDROID_APEX_CACERTS),
                PathBuf::from(expand_env(ANDROID_SYSTEM_CACERTS)),
            ],
            user_added_dir: Some(PathBuf::from(ANDROID_USER_ADDED_CACERTS)),
            user_removed_dir: Some(PathBuf::from(ANDROID_USER_REMOVED_CACERTS)),
        }
    }

    /// Candidate system directories in priority order.
    pub fn with_system_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.system_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_user_dirs(mut self, added: Option<PathBuf>, removed: Option<PathBuf>) -> Self {
        self.user_added_dir = added;
        self.user_removed_dir = removed;
        self
    }

    pub fn system_dirs(&self) -> &[PathBuf] {
        &self.system_dirs
    }

    fn system_dir(&self) -> Option<&Path> {
        self.system_dirs.iter().map(PathBuf::as_path).find(|dir| dir.is_dir())
    }

    fn removed_names(&self) -> HashSet<OsString> {
        let Some(dir) = self.user_removed_dir.as_deref().filter(|dir| dir.is_dir()) else {
            return HashSet::new();
        };

        match list_certificate_files(dir) {
            Ok(files) => files
                .iter()
                .filter_map(|file| file.file_name().map(|name| name.to_owned()))
                .collect(),
            Err(err) => {
                log::warn!("Failed to read the disabled certificates: {err}");
                HashSet::new()
            }
        }
    }

    fn user_added_files(&self) -> Vec<PathBuf> {
        let Some(dir) = self.user_added_dir.as_deref().filter(|dir| dir.is_dir()) else {
            return Vec::new();
        };

        list_certificate_files(dir).unwrap_or_else(|err| {
            log::warn!("Failed to read the user installed certificates: {err}");
            Vec::new()
        })
    }
}

impl TrustStoreProvider for AndroidTrustStore {
    fn name(&self) -> &str {
        "android"
    }

    fn open(&self) -> Result<TrustStoreEntries<'_>, TrustStoreError> {
        let system_dir = self.system_dir().ok_or_else(|| {
            TrustStoreError::Unavailable(format!("no system CA directory in {:?}", self.system_dirs))
        })?;

        let removed = self.removed_names();
        let mut files: Vec<PathBuf> = list_certificate_files(system_dir)?
            .into_iter()
            .filter(|file| !matches!(file.file_name(), Some(name) if removed.contains(name)))
            .collect();
        let system_count = files.len();
        files.extend(self.user_added_files());

        log::debug!(
            "Android trust store {}: {} system ({} disabled), {} user certificates",
            system_dir.display(),
            system_count,
            removed.len(),
            files.len() - system_count
        );
        Ok(read_certificate_files(files))
    }

    fn store_path(&self) -> Result<String, TrustStoreError> {
        self.system_dir()
            .map(|dir| dir.display().to_string())
            .ok_or_else(|| TrustStoreError::Unavailable("no system CA directory".into()))
    }
}
