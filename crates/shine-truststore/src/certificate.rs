use crate::TrustStoreError;
use rustls::pki_types::CertificateDer;
use std::fmt;

/// A DER encoded X.509 certificate as it was read from a trust store.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self { der: der.into() }
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    pub fn into_der(self) -> Vec<u8> {
        self.der
    }

    /// Check that the bytes hold exactly one well-formed X.509 certificate.
    pub fn validate(&self) -> Result<(), TrustStoreError> {
        match x509_parser::parse_x509_certificate(&self.der) {
            Ok((rest, _)) if rest.is_empty() => Ok(()),
            Ok((rest, _)) => Err(TrustStoreError::InvalidCertificate(format!(
                "{} trailing bytes after the certificate",
                rest.len()
            ))),
            Err(err) => Err(TrustStoreError::InvalidCertificate(err.to_string())),
        }
    }

    /// Subject of the certificate, used for diagnostics only.
    pub fn subject(&self) -> Option<String> {
        x509_parser::parse_x509_certificate(&self.der)
            .ok()
            .map(|(_, cert)| cert.subject().to_string())
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("len", &self.der.len())
            .field("subject", &self.subject())
            .finish()
    }
}

impl From<CertificateDer<'_>> for Certificate {
    fn from(der: CertificateDer<'_>) -> Self {
        Self::from_der(der.as_ref())
    }
}

impl From<Certificate> for CertificateDer<'static> {
    fn from(cert: Certificate) -> Self {
        CertificateDer::from(cert.der)
    }
}
