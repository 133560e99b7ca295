use crate::{Certificate, TrustStoreEntries, TrustStoreError, TrustStoreProvider};
use std::{env, path::PathBuf};

/// Environment variable overriding the CA bundle file, honoured by `rustls-native-certs` as well.
pub const CERT_FILE_ENV: &str = "SSL_CERT_FILE";
/// Environment variable overriding the CA directory, honoured by `rustls-native-certs` as well.
pub const CERT_DIR_ENV: &str = "SSL_CERT_DIR";

/// The trust store of the operating system (Windows certificate store, macOS keychain, or the
/// OpenSSL style bundle on other unix-es).
#[derive(Debug, Clone, Default)]
pub struct NativeTrustStore;

impl NativeTrustStore {
    pub fn new() -> Self {
        Self
    }
}

impl TrustStoreProvider for NativeTrustStore {
    fn name(&self) -> &str {
        "native"
    }

    fn open(&self) -> Result<TrustStoreEntries<'_>, TrustStoreError> {
        let result = rustls_native_certs::load_native_certs();

        if result.certs.is_empty() && !result.errors.is_empty() {
            return Err(TrustStoreError::Native(result.errors));
        }
        for err in &result.errors {
            log::warn!("Native trust store is partially loaded: {err}");
        }

        log::debug!("Native trust store has {} certificates", result.certs.len());
        Ok(Box::new(result.certs.into_iter().map(|der| Ok(Certificate::from(der)))))
    }

    fn store_path(&self) -> Result<String, TrustStoreError> {
        for var in [CERT_DIR_ENV, CERT_FILE_ENV] {
            if let Some(path) = env::var_os(var).filter(|p| !p.is_empty()) {
                log::debug!("Trust store location is taken from {var}");
                return Ok(PathBuf::from(path).display().to_string());
            }
        }

        let probe = openssl_probe::probe();
        probe
            .cert_dir
            .or(probe.cert_file)
            .map(|path| path.display().to_string())
            .ok_or(TrustStoreError::PathUnsupported)
    }
}
