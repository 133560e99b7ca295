use crate::{pem, CertificateExport, TrustStoreError, TrustStoreExporter};
use rustls::{pki_types::CertificateDer, RootCertStore};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum CertError {
    #[error("No usable trusted root certificates: {0}")]
    NoCertificates(String),
    #[error(transparent)]
    InvalidExport(#[from] TrustStoreError),
}

/// Build a rustls root store from exported PEM data.
pub fn root_cert_store_from_pem(pem: &[u8]) -> Result<RootCertStore, CertError> {
    let certs = pem::parse_certificates(pem)?;

    let mut store = RootCertStore::empty();
    let (added, ignored) = store.add_parsable_certificates(certs.into_iter().map(CertificateDer::from));
    if ignored > 0 {
        log::warn!("{ignored} certificates could not be used as trust anchor");
    }

    if added == 0 {
        Err(CertError::NoCertificates("no parsable certificate".into()))
    } else {
        Ok(store)
    }
}

pub fn get_root_cert_store(exporter: &TrustStoreExporter) -> Result<RootCertStore, CertError> {
    match exporter.export_trusted_certificates() {
        CertificateExport::Empty(reason) => Err(CertError::NoCertificates(reason.to_string())),
        export => root_cert_store_from_pem(export.as_bytes()),
    }
}
