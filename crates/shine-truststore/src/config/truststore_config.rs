use crate::{
    config::Environment, AndroidTrustStore, BundleTrustStore, DirectoryTrustStore, FallbackPaths, NativeTrustStore,
    Platform, Selection, TrustStoreExporter, TrustStoreProvider,
};
use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A trust store to read the certificates from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(tag = "type")]
pub enum TrustStoreSource {
    /// Trust store of the operating system
    Native,
    /// Android system store with the user added and disabled certificates
    Android,
    /// Directory with certificate files
    Directory { path: PathBuf },
    /// Single PEM bundle file
    Bundle { path: PathBuf },
}

impl TrustStoreSource {
    /// Sources used when nothing is configured. `rustls-native-certs` finds no system store on Android,
    /// there the platform directories are read first.
    pub fn platform_defaults(platform: Platform) -> Vec<TrustStoreSource> {
        match platform {
            Platform::Android => vec![TrustStoreSource::Android, TrustStoreSource::Native],
            _ => vec![TrustStoreSource::Native],
        }
    }

    pub fn create_provider(&self) -> Box<dyn TrustStoreProvider> {
        match self {
            TrustStoreSource::Native => Box::new(NativeTrustStore::new()),
            TrustStoreSource::Android => Box::new(AndroidTrustStore::new()),
            TrustStoreSource::Directory { path } => Box::new(DirectoryTrustStore::new(path)),
            TrustStoreSource::Bundle { path } => Box::new(BundleTrustStore::new(path)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct TrustStoreConfig {
    pub selection: Selection,
    pub sources: Vec<TrustStoreSource>,
    pub fallback_paths: FallbackPaths,
}

impl Default for TrustStoreConfig {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            sources: TrustStoreSource::platform_defaults(Platform::current()),
            fallback_paths: FallbackPaths::default(),
        }
    }
}

impl TrustStoreConfig {
    /// Load the configuration from the defaults, the optional config file and the environment, the later overriding
    /// the former.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_file, Environment::new())
    }

    pub fn load_with_env(config_file: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let defaults = TrustStoreConfig::default();
        let mut builder = Config::builder().set_default("selection", defaults.selection.as_str())?;
        // defaults are set per platform, a layer overriding a single platform keeps the others
        for (platform, path) in defaults.fallback_paths.iter() {
            builder = builder.set_default(format!("fallbackPaths.{}", platform.as_str()), path)?;
        }

        if let Some(config_file) = config_file {
            log::info!("Loading trust store configuration from {}", config_file.display());
            builder = builder.add_source(File::from(config_file));
        }
        builder = builder.add_source(environment);

        let cfg: TrustStoreConfig = builder.build()?.try_deserialize()?;
        log::debug!("Trust store configuration: {:#?}", cfg);
        Ok(cfg)
    }
}

impl TrustStoreExporter {
    pub fn from_config(config: &TrustStoreConfig) -> Self {
        config
            .sources
            .iter()
            .fold(TrustStoreExporter::new(), |exporter, source| {
                exporter.with_boxed_provider(source.create_provider())
            })
            .with_selection(config.selection)
            .with_fallback_paths(config.fallback_paths.clone())
    }
}
