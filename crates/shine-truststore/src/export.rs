use crate::{
    config::TrustStoreSource, Certificate, FallbackPaths, PemWriter, Platform, TrustStoreError, TrustStoreProvider,
};
use serde::{Deserialize, Serialize};
use std::{
    any::Any,
    collections::HashSet,
    fmt,
    panic::{self, AssertUnwindSafe},
};

/// How the certificates of multiple providers are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Selection {
    /// The first provider that can be opened is authoritative, the rest is only consulted when it fails.
    #[default]
    FirstAvailable,
    /// Certificates of all providers are concatenated in provider order, duplicates are dropped.
    Merge,
}

impl Selection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Selection::FirstAvailable => "firstAvailable",
            Selection::Merge => "merge",
        }
    }
}

/// Why an export carries no certificates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmptyReason {
    NoProviders,
    StoreEmpty,
    StoreUnavailable(String),
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoProviders => write!(f, "no trust store provider is configured"),
            EmptyReason::StoreEmpty => write!(f, "trust store has no valid certificates"),
            EmptyReason::StoreUnavailable(reason) => write!(f, "trust store is unavailable ({reason})"),
        }
    }
}

/// Outcome of a certificate export. An empty export is a regular result telling the consumer that no system trust
/// information is available, it is not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CertificateExport {
    Certificates {
        /// Concatenated PEM blocks in enumeration order.
        pem: Vec<u8>,
        count: usize,
        /// Entries dropped as unreadable or invalid.
        skipped: usize,
    },
    Empty(EmptyReason),
}

impl CertificateExport {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            CertificateExport::Certificates { pem, .. } => pem,
            CertificateExport::Empty(_) => &[],
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            CertificateExport::Certificates { pem, .. } => pem,
            CertificateExport::Empty(_) => Vec::new(),
        }
    }

    /// Number of exported certificates.
    pub fn len(&self) -> usize {
        match self {
            CertificateExport::Certificates { count, .. } => *count,
            CertificateExport::Empty(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CertificateExport::Empty(_))
    }
}

/// Location of the trusted certificates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrustStorePath {
    /// Reported by a trust store provider.
    Resolved(String),
    /// Taken from the fallback table, it may not exist.
    Fallback(String),
}

impl TrustStorePath {
    pub fn as_str(&self) -> &str {
        match self {
            TrustStorePath::Resolved(path) | TrustStorePath::Fallback(path) => path,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            TrustStorePath::Resolved(path) | TrustStorePath::Fallback(path) => path,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TrustStorePath::Fallback(_))
    }
}

impl fmt::Display for TrustStorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Export the trusted root certificates for a TLS stack that cannot access the trust store of the OS.
///
/// Both operations are best-effort and never fail: failures are logged and turned into an empty export
/// or into the fallback path of the platform. Each call opens the stores on its own, calls from multiple threads
/// do not interfere.
pub struct TrustStoreExporter {
    providers: Vec<Box<dyn TrustStoreProvider>>,
    selection: Selection,
    fallback_paths: FallbackPaths,
    platform: Platform,
    /// The providers are the defaults of the platform and follow [`TrustStoreExporter::with_platform`].
    platform_providers: bool,
}

impl Default for TrustStoreExporter {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

impl TrustStoreExporter {
    /// Create an exporter without any provider.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            selection: Selection::default(),
            fallback_paths: FallbackPaths::default(),
            platform: Platform::current(),
            platform_providers: false,
        }
    }

    /// Create an exporter with the default providers of a platform.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            providers: Self::default_providers(platform),
            platform,
            platform_providers: true,
            ..Self::new()
        }
    }

    fn default_providers(platform: Platform) -> Vec<Box<dyn TrustStoreProvider>> {
        TrustStoreSource::platform_defaults(platform)
            .iter()
            .map(TrustStoreSource::create_provider)
            .collect()
    }

    pub fn with_provider<P>(self, provider: P) -> Self
    where
        P: TrustStoreProvider + 'static,
    {
        self.with_boxed_provider(Box::new(provider))
    }

    pub fn with_boxed_provider(mut self, provider: Box<dyn TrustStoreProvider>) -> Self {
        self.providers.push(provider);
        self.platform_providers = false;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_fallback_paths(mut self, fallback_paths: FallbackPaths) -> Self {
        self.fallback_paths = fallback_paths;
        self
    }

    /// Override the platform used to pick the fallback path. An exporter created with the platform defaults also
    /// switches to the providers of the new platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        if self.platform_providers && self.platform != platform {
            self.providers = Self::default_providers(platform);
        }
        self.platform = platform;
        self
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn providers(&self) -> impl Iterator<Item = &dyn TrustStoreProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    /// Export the valid certificates of the trust store as concatenated PEM blocks.
    pub fn export_trusted_certificates(&self) -> CertificateExport {
        if self.providers.is_empty() {
            log::warn!("No trust store provider, exporting no certificates");
            return CertificateExport::Empty(EmptyReason::NoProviders);
        }

        let mut writer = PemWriter::new();
        let mut seen = HashSet::new();
        let mut skipped = 0;
        let mut failures = Vec::new();
        let mut opened = false;

        for provider in &self.providers {
            let collected = panic::catch_unwind(AssertUnwindSafe(|| collect_certificates(provider.as_ref())))
                .unwrap_or_else(|payload| Err(TrustStoreError::Panicked(panic_message(payload))));

            let (certificates, provider_skipped) = match collected {
                Ok(collected) => collected,
                Err(err) => {
                    log::warn!("Failed to open the {} trust store: {err}", provider.name());
                    failures.push(format!("{}: {err}", provider.name()));
                    continue;
                }
            };

            opened = true;
            skipped += provider_skipped;
            for certificate in certificates {
                if self.selection == Selection::Merge && !seen.insert(certificate.as_der().to_vec()) {
                    log::trace!("Duplicate certificate is dropped: {:?}", certificate.subject());
                    continue;
                }
                writer.write_certificate(&certificate);
            }

            if self.selection == Selection::FirstAvailable {
                break;
            }
        }

        if !opened {
            return CertificateExport::Empty(EmptyReason::StoreUnavailable(failures.join("; ")));
        }

        if writer.is_empty() {
            log::warn!("Trust store has no valid certificates ({skipped} skipped)");
            return CertificateExport::Empty(EmptyReason::StoreEmpty);
        }

        let count = writer.count();
        log::info!("Exported {count} trusted certificates ({skipped} skipped)");
        CertificateExport::Certificates {
            pem: writer.into_bytes(),
            count,
            skipped,
        }
    }

    /// Find the filesystem location of the trust store. When no provider can tell it, the well-known path of the
    /// platform is returned without checking its existence.
    pub fn export_trust_store_path(&self) -> TrustStorePath {
        for provider in &self.providers {
            let path = panic::catch_unwind(AssertUnwindSafe(|| provider.store_path()))
                .unwrap_or_else(|payload| Err(TrustStoreError::Panicked(panic_message(payload))));

            match path {
                Ok(path) if !path.is_empty() => {
                    log::debug!("Trust store location from {}: {path}", provider.name());
                    return TrustStorePath::Resolved(path);
                }
                Ok(_) => log::debug!("The {} trust store reported an empty location", provider.name()),
                Err(err) => log::debug!("No location for the {} trust store: {err}", provider.name()),
            }
        }

        let path = self.fallback_paths.resolve(self.platform);
        log::warn!("Using fallback trust store location for {:?}: {path}", self.platform);
        TrustStorePath::Fallback(path)
    }
}

/// Open a store and keep the valid certificates. The handle is dropped before returning on every path.
fn collect_certificates(provider: &dyn TrustStoreProvider) -> Result<(Vec<Certificate>, usize), TrustStoreError> {
    let mut certificates = Vec::new();
    let mut skipped = 0;

    for (index, entry) in provider.open()?.enumerate() {
        match entry.and_then(|certificate| certificate.validate().map(|_| certificate)) {
            Ok(certificate) => certificates.push(certificate),
            Err(err) => {
                log::debug!("Skipping entry #{index} of the {} trust store: {err}", provider.name());
                skipped += 1;
            }
        }
    }

    Ok((certificates, skipped))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// Export the certificates of the system trust store, see [`TrustStoreExporter::export_trusted_certificates`].
/// The result is empty when no system trust information is available.
pub fn export_trusted_certificates() -> Vec<u8> {
    TrustStoreExporter::default()
        .export_trusted_certificates()
        .into_bytes()
}

/// Location of the system trust store, see [`TrustStoreExporter::export_trust_store_path`].
pub fn export_trust_store_path() -> String {
    TrustStoreExporter::default()
        .export_trust_store_path()
        .into_string()
}
