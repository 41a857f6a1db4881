pub mod config;
pub mod consent;
pub mod extractor;
pub mod handler;
pub mod server;

pub use config::{ApplicationIdentity, ConfigSource, ConfigurationError, EnvSource, ServerConfig};
pub use consent::{ConsentUrlBuilder, ConsentUrlParameters, ConsentUrlRequest};
