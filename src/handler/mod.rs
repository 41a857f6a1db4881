pub mod consent_url;

pub use consent_url::consent_url;
