use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, env, sync::OnceLock};

/// Last resort when the table has no usable entry for a platform.
pub const DEFAULT_FALLBACK_PATH: &str = "/etc/ssl/certs";

/// Platforms with a well-known CA location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Macos,
    Linux,
    Windows,
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Macos => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Other => "other",
        }
    }

    /// The platform of the running binary.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }
}

/// Best-guess location of the CA certificates for each platform, used when the trust store could not
/// tell its own location. The paths are templates, `${VAR}` and `${VAR:-default}` are replaced from the
/// environment. Nothing checks that the resulting path exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackPaths(BTreeMap<Platform, String>);

impl Default for FallbackPaths {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Platform::Android, "${ANDROID_ROOT:-/system}/etc/security/cacerts".to_owned()),
            (Platform::Ios, "/System/Library/Security/Certificates.bundle".to_owned()),
            (Platform::Macos, "/etc/ssl/cert.pem".to_owned()),
            (Platform::Linux, "/etc/ssl/certs".to_owned()),
            (Platform::Windows, r"C:\ProgramData\ssl\certs".to_owned()),
            (Platform::Other, DEFAULT_FALLBACK_PATH.to_owned()),
        ]))
    }
}

impl FallbackPaths {
    /// A table without any entry, every platform resolves to [`DEFAULT_FALLBACK_PATH`].
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with_path(mut self, platform: Platform, path: impl Into<String>) -> Self {
        self.0.insert(platform, path.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, &str)> {
        self.0.iter().map(|(platform, path)| (*platform, path.as_str()))
    }

    pub fn get(&self, platform: Platform) -> Option<&str> {
        self.0.get(&platform).map(String::as_str)
    }

    /// Resolve the path for a platform. The result is never empty.
    pub fn resolve(&self, platform: Platform) -> String {
        [platform, Platform::Other]
            .into_iter()
            .filter_map(|p| self.get(p))
            .map(expand_env)
            .find(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_FALLBACK_PATH.to_owned())
    }
}

/// Replace `${VAR}` and `${VAR:-default}` with the value of the environment variable. Unset and empty
/// variables take the default, or the empty string without one.
pub fn expand_env(template: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").unwrap());

    pattern
        .replace_all(template, |caps: &Captures| {
            env::var(&caps[1])
                .ok()
                .filter(|value| !value.is_empty())
                .or_else(|| caps.get(2).map(|default| default.as_str().to_owned()))
                .unwrap_or_default()
        })
        .into_owned()
}
