mod android_store;
pub use self::android_store::*;
mod bundle_store;
pub use self::bundle_store::*;
mod directory_store;
pub use self::directory_store::*;
mod native_store;
pub use self::native_store::*;
mod static_store;
pub use self::static_store::*;

use crate::{pem, Certificate, TrustStoreError};

/// An opened trust store: the entries in enumeration order. Dropping the iterator closes the store.
pub type TrustStoreEntries<'a> = Box<dyn Iterator<Item = Result<Certificate, TrustStoreError>> + 'a>;

/// Access to a collection of trusted certificates.
pub trait TrustStoreProvider: Send + Sync {
    /// Name used in the logs.
    fn name(&self) -> &str;

    /// Open the store for reading. An error for an individual entry should be reported through the iterator
    /// and not by failing the whole call.
    fn open(&self) -> Result<TrustStoreEntries<'_>, TrustStoreError>;

    /// Location of the backing store on the filesystem, if the store has one.
    fn store_path(&self) -> Result<String, TrustStoreError> {
        Err(TrustStoreError::PathUnsupported)
    }
}

/// Read the certificates of a file holding either PEM blocks or a single raw DER certificate.
pub(crate) fn read_certificate_file(content: &[u8]) -> Vec<Result<Certificate, TrustStoreError>> {
    const PEM_MARKER: &[u8] = b"-----BEGIN";

    if content.windows(PEM_MARKER.len()).any(|w| w == PEM_MARKER) {
        pem::certificate_entries(content)
    } else if content.is_empty() {
        Vec::new()
    } else {
        vec![Ok(Certificate::from_der(content))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pem::encode_certificate;

    #[test]
    fn test_read_raw_der_file() {
        let entries = read_certificate_file(&[0x30, 0x03, 0x02, 0x01, 0x01]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].as_ref().unwrap().as_der(), &[0x30, 0x03, 0x02, 0x01, 0x01]);
    }

    #[test]
    fn test_read_pem_file_with_preamble() {
        let content = format!("Certificate:\n    Data: ...\n{}", encode_certificate(&[1, 2, 3, 4]));
        let entries = read_certificate_file(content.as_bytes());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].as_ref().unwrap().as_der(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_read_empty_file() {
        assert!(read_certificate_file(&[]).is_empty());
    }
}
