use crate::{Certificate, TrustStoreEntries, TrustStoreError, TrustStoreProvider};

/// Certificates held in memory, for embedded bundles.
#[derive(Debug, Clone, Default)]
pub struct StaticTrustStore {
    name: String,
    certificates: Vec<Certificate>,
}

impl StaticTrustStore {
    pub fn new<I, C>(name: &str, certificates: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self {
            name: name.to_owned(),
            certificates: certificates.into_iter().map(Certificate::from_der).collect(),
        }
    }
}

impl TrustStoreProvider for StaticTrustStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<TrustStoreEntries<'_>, TrustStoreError> {
        Ok(Box::new(self.certificates.iter().cloned().map(Ok)))
    }
}
