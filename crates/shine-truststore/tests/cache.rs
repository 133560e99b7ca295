use shine_test::test;
use shine_truststore::{
    native_ca_certificates, Certificate, CertificateCache, TrustStoreEntries, TrustStoreError, TrustStoreExporter,
    TrustStoreProvider,
};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

const ALPHA: &[u8] = include_bytes!("fixtures/alpha.der");

#[derive(Clone)]
struct CountingStore(Arc<AtomicUsize>);

impl TrustStoreProvider for CountingStore {
    fn name(&self) -> &str {
        "counting"
    }

    fn open(&self) -> Result<TrustStoreEntries<'_>, TrustStoreError> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(std::iter::once(Ok(Certificate::from_der(ALPHA)))))
    }
}

#[test]
fn test_cache_loads_once() {
    let opened = Arc::new(AtomicUsize::new(0));
    let cache = CertificateCache::new(TrustStoreExporter::new().with_provider(CountingStore(opened.clone())));
    assert_eq!(opened.load(Ordering::Relaxed), 0);

    let first = cache.get();
    let second = cache.get();
    assert_eq!(opened.load(Ordering::Relaxed), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 1);

    cache.invalidate();
    let third = cache.get();
    assert_eq!(opened.load(Ordering::Relaxed), 2);
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(*first, *third);
}

#[test]
fn test_concurrent_cache_access() {
    let opened = Arc::new(AtomicUsize::new(0));
    let cache = CertificateCache::new(TrustStoreExporter::new().with_provider(CountingStore(opened.clone())));

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                let export = cache.get();
                assert_eq!(export.len(), 1);
            });
        }
    });
    assert_eq!(opened.load(Ordering::Relaxed), 1);
}

#[test]
fn test_native_cache_is_shared() {
    let first = native_ca_certificates();
    let second = native_ca_certificates();
    assert!(Arc::ptr_eq(&first, &second));
}
