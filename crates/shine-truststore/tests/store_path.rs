use shine_test::test;
use shine_truststore::{
    DirectoryTrustStore, FallbackPaths, Platform, StaticTrustStore, TrustStoreEntries, TrustStoreError,
    TrustStoreExporter, TrustStorePath, TrustStoreProvider, DEFAULT_FALLBACK_PATH,
};
use std::{env, fs};

const ALPHA_PEM: &str = include_str!("fixtures/alpha.pem");

struct KnownLocation(&'static str);

impl TrustStoreProvider for KnownLocation {
    fn name(&self) -> &str {
        "known"
    }

    fn open(&self) -> Result<TrustStoreEntries<'_>, TrustStoreError> {
        Ok(Box::new(std::iter::empty()))
    }

    fn store_path(&self) -> Result<String, TrustStoreError> {
        Ok(self.0.to_owned())
    }
}

struct BrokenLocation;

impl TrustStoreProvider for BrokenLocation {
    fn name(&self) -> &str {
        "broken"
    }

    fn open(&self) -> Result<TrustStoreEntries<'_>, TrustStoreError> {
        Err(TrustStoreError::Unavailable("no trust manager".into()))
    }

    fn store_path(&self) -> Result<String, TrustStoreError> {
        panic!("trust manager query crashed");
    }
}

#[test(serial = "env")]
fn test_resolved_path() {
    let exporter = TrustStoreExporter::new()
        .with_provider(BrokenLocation)
        .with_provider(KnownLocation(""))
        .with_provider(KnownLocation("/data/misc/keystore"));

    let path = exporter.export_trust_store_path();
    assert_eq!(path, TrustStorePath::Resolved("/data/misc/keystore".into()));
    assert!(!path.is_fallback());
}

#[test(serial = "env")]
fn test_directory_store_path() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = TrustStoreExporter::new().with_provider(DirectoryTrustStore::new(dir.path()));

    let path = exporter.export_trust_store_path();
    assert_eq!(path.as_str(), dir.path().display().to_string());
}

#[test(serial = "env")]
fn test_missing_directory_falls_back() {
    let exporter = TrustStoreExporter::new()
        .with_provider(DirectoryTrustStore::new("/surely/not/existing/cacerts"))
        .with_platform(Platform::Linux);

    assert_eq!(
        exporter.export_trust_store_path(),
        TrustStorePath::Fallback("/etc/ssl/certs".into())
    );
}

#[test(serial = "env")]
fn test_fallback_without_providers() {
    let exporter = TrustStoreExporter::new().with_platform(Platform::Macos);
    let path = exporter.export_trust_store_path();
    assert!(path.is_fallback());
    assert_eq!(path.into_string(), "/etc/ssl/cert.pem");
}

#[test(serial = "env")]
fn test_panicking_query_falls_back() {
    let exporter = TrustStoreExporter::new()
        .with_provider(BrokenLocation)
        .with_provider(StaticTrustStore::new("embedded", Vec::<Vec<u8>>::new()))
        .with_fallback_paths(FallbackPaths::empty().with_path(Platform::Windows, r"D:\certs"))
        .with_platform(Platform::Windows);

    assert_eq!(
        exporter.export_trust_store_path(),
        TrustStorePath::Fallback(r"D:\certs".into())
    );
}

#[test(serial = "env")]
fn test_fallback_is_never_empty() {
    let exporter = TrustStoreExporter::new()
        .with_fallback_paths(FallbackPaths::empty().with_path(Platform::Ios, ""))
        .with_platform(Platform::Ios);

    assert_eq!(
        exporter.export_trust_store_path(),
        TrustStorePath::Fallback(DEFAULT_FALLBACK_PATH.into())
    );
}

#[test(serial = "env")]
fn test_android_fallback_uses_android_root() {
    let exporter = TrustStoreExporter::new()
        .with_provider(BrokenLocation)
        .with_platform(Platform::Android);

    env::remove_var("ANDROID_ROOT");
    assert_eq!(
        exporter.export_trust_store_path().as_str(),
        "/system/etc/security/cacerts"
    );

    env::set_var("ANDROID_ROOT", "/apex/com.android.conscrypt");
    assert_eq!(
        exporter.export_trust_store_path().as_str(),
        "/apex/com.android.conscrypt/etc/security/cacerts"
    );
    env::remove_var("ANDROID_ROOT");
}

#[test(serial = "env")]
fn test_native_path_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let previous = env::var_os("SSL_CERT_DIR");

    env::set_var("SSL_CERT_DIR", dir.path());
    let path = shine_truststore::export_trust_store_path();
    assert_eq!(path, dir.path().display().to_string());

    match previous {
        Some(previous) => env::set_var("SSL_CERT_DIR", previous),
        None => env::remove_var("SSL_CERT_DIR"),
    }
}

#[test(serial = "env")]
fn test_native_path_is_never_empty() {
    let path = shine_truststore::export_trust_store_path();
    log::info!("Native trust store location: {path}");
    assert!(!path.is_empty());
}

fn provider_names(exporter: &TrustStoreExporter) -> Vec<String> {
    exporter.providers().map(|p| p.name().to_owned()).collect()
}

#[test(serial = "env")]
fn test_platform_default_providers() {
    assert_eq!(provider_names(&TrustStoreExporter::for_platform(Platform::Linux)), vec!["native"]);
    assert_eq!(provider_names(&TrustStoreExporter::for_platform(Platform::Macos)), vec!["native"]);
    assert_eq!(
        provider_names(&TrustStoreExporter::for_platform(Platform::Android)),
        vec!["android", "native"]
    );
    assert_eq!(
        provider_names(&TrustStoreExporter::default().with_platform(Platform::Android)),
        vec!["android", "native"]
    );

    // explicitly added providers are kept
    let exporter = TrustStoreExporter::new()
        .with_provider(KnownLocation("/opt/certs"))
        .with_platform(Platform::Android);
    assert_eq!(provider_names(&exporter), vec!["known"]);
}

#[test(serial = "env")]
fn test_android_system_store_by_default() {
    let root = tempfile::tempdir().unwrap();
    let cacerts = root.path().join("etc").join("security").join("cacerts");
    fs::create_dir_all(&cacerts).unwrap();
    fs::write(cacerts.join("1a2b3c4d.0"), ALPHA_PEM).unwrap();
    // no OpenSSL bundle on the device
    let empty = tempfile::tempdir().unwrap();
    let previous_cert_dir = env::var_os("SSL_CERT_DIR");

    env::set_var("ANDROID_ROOT", root.path());
    env::set_var("SSL_CERT_DIR", empty.path());
    let exporter = TrustStoreExporter::default().with_platform(Platform::Android);
    let export = exporter.export_trusted_certificates();
    let path = exporter.export_trust_store_path();
    env::remove_var("ANDROID_ROOT");
    match previous_cert_dir {
        Some(previous) => env::set_var("SSL_CERT_DIR", previous),
        None => env::remove_var("SSL_CERT_DIR"),
    }

    assert_eq!(export.len(), 1, "{export:?}");
    assert_eq!(export.as_bytes(), ALPHA_PEM.as_bytes());
    assert_eq!(path, TrustStorePath::Resolved(cacerts.display().to_string()));
}
