//! Secret store adapters.

pub mod env;
pub mod gcp;

pub use env::EnvSecretStore;
pub use gcp::GcpSecretStore;
