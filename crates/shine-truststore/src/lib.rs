//! Export the trusted root certificates of the host for TLS stacks that cannot access the trust store of the
//! operating system themselves.

mod error;
pub use self::error::*;
mod certificate;
pub use self::certificate::*;
pub mod pem;
pub use self::pem::PemWriter;
mod provider;
pub use self::provider::*;
mod fallback;
pub use self::fallback::*;
mod export;
pub use self::export::*;
mod cache;
pub use self::cache::*;
mod root_store;
pub use self::root_store::*;

pub mod config;
