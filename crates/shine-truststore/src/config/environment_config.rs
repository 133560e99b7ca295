use config::{ConfigError, Map, Source, Value, ValueKind};
use std::env;

pub const DEFAULT_ENV_PREFIX: &str = "truststore--";
const ENV_SEPARATOR: &str = "--";

/// Configuration source of the environment variables.
///
/// Variables are matched case insensitively on the prefix, the path segments are separated by `--` and are converted
/// from snake case to camel case: `TRUSTSTORE--FALLBACK_PATHS--ANDROID` is read as `fallbackPaths.android`.
/// Based on the config-rs crate, but the key conversion follows the serde naming of the configuration.
#[derive(Debug, Clone)]
pub struct Environment {
    prefix: String,
    source: Option<Map<String, String>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_lowercase(),
            source: None,
        }
    }

    /// Read the variables from the given map instead of the process environment.
    pub fn with_source(mut self, source: Map<String, String>) -> Self {
        self.source = Some(source);
        self
    }

    fn convert_key_case(key: &str) -> String {
        key.split('_')
            .enumerate()
            .map(|(i, s)| {
                if i == 0 {
                    s.to_lowercase()
                } else {
                    let mut chars = s.chars();
                    chars
                        .next()
                        .map(|c| c.to_uppercase().collect::<String>())
                        .unwrap_or_default()
                        + &chars.as_str().to_lowercase()
                }
            })
            .collect()
    }

    fn convert_key(&self, env_key: &str) -> Option<String> {
        let key = env_key.to_lowercase();
        let key = key.strip_prefix(&self.prefix)?;
        if key.is_empty() {
            return None;
        }

        Some(
            key.split(ENV_SEPARATOR)
                .map(Self::convert_key_case)
                .collect::<Vec<_>>()
                .join("."),
        )
    }
}

impl Source for Environment {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        let uri: String = "environment".into();

        let vars: Vec<(String, String)> = match &self.source {
            Some(source) => source.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            None => env::vars().collect(),
        };

        let mut m = Map::new();
        for (env_key, value) in vars {
            if let Some(key) = self.convert_key(&env_key) {
                log::debug!("Reading env {} as {}...", env_key, key);
                m.insert(key, Value::new(Some(&uri), ValueKind::String(value)));
            }
        }

        log::trace!("Environment: {:#?}", m);
        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_conversion() {
        let env = Environment::new();
        assert_eq!(env.convert_key("TRUSTSTORE--SELECTION").as_deref(), Some("selection"));
        assert_eq!(
            env.convert_key("TRUSTSTORE--FALLBACK_PATHS--ANDROID").as_deref(),
            Some("fallbackPaths.android")
        );
        assert_eq!(env.convert_key("TRUSTSTORE--"), None);
        assert_eq!(env.convert_key("PATH"), None);
    }

    #[test]
    fn test_collect_from_source() {
        let env = Environment::new().with_source(Map::from([
            ("TRUSTSTORE--SELECTION".to_owned(), "merge".to_owned()),
            ("HOME".to_owned(), "/root".to_owned()),
        ]));
        let values = env.collect().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values["selection"].clone().into_string().unwrap(), "merge");
    }
}
