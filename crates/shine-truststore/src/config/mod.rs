mod environment_config;
pub use self::environment_config::*;
mod truststore_config;
pub use self::truststore_config::*;
