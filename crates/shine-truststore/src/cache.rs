use crate::{CertificateExport, TrustStoreExporter};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Keep the result of an export for the later TLS connections. The store is read on the first access,
/// readers share the same export until it is invalidated.
pub struct CertificateCache {
    exporter: TrustStoreExporter,
    data: RwLock<Option<Arc<CertificateExport>>>,
}

impl CertificateCache {
    pub fn new(exporter: TrustStoreExporter) -> Self {
        Self {
            exporter,
            data: RwLock::new(None),
        }
    }

    pub fn exporter(&self) -> &TrustStoreExporter {
        &self.exporter
    }

    pub fn get(&self) -> Arc<CertificateExport> {
        {
            let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(data) = &*data {
                return data.clone();
            }
        }

        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        // another thread may have loaded it while waiting for the lock
        if let Some(data) = &*data {
            return data.clone();
        }

        log::debug!("Loading trusted certificates into the cache...");
        let export = Arc::new(self.exporter.export_trusted_certificates());
        *data = Some(export.clone());
        export
    }

    /// Drop the cached export, the next [`get`](Self::get) reads the store again.
    pub fn invalidate(&self) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *data = None;
    }
}

/// Process wide cache of the native trust store.
pub fn native_ca_certificates() -> Arc<CertificateExport> {
    static NATIVE_CACHE: OnceLock<CertificateCache> = OnceLock::new();
    NATIVE_CACHE
        .get_or_init(|| CertificateCache::new(TrustStoreExporter::default()))
        .get()
}
