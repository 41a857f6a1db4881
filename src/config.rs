use serde::Deserialize;
use std::{collections::HashMap, ffi::OsString, net::SocketAddr};

pub const TENANT_ID_KEY: &str = "AzureAd:TenantId";
pub const CLIENT_ID_KEY: &str = "MicrosoftAppId";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("configuration source is not available")]
    MissingSource,
    #[error("failed reading environment settings: {0}")]
    Env(#[from] envy::Error),
    #[error("cannot resolve listen address {0:?}")]
    InvalidAddress(String),
}

/// Read-only key/value settings, keyed the way the hosting configuration
/// names them (`Section:Key`).
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Settings taken from process environment variables.
///
/// Section separators `:` are spelled `__` in variable names and names
/// match regardless of case, so `AzureAd:TenantId` is found as
/// `AZUREAD__TENANTID`.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct EnvSource {
    #[serde(default, rename = "azuread__tenantid")]
    tenant_id: Option<String>,
    #[serde(default, rename = "microsoftappid")]
    client_id: Option<String>,
}

impl EnvSource {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_os_vars<I>(vars: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_vars(unicode_vars(vars))
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, EnvSource>(vars)?)
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        let key = key.replace(':', "__");

        if key.eq_ignore_ascii_case("azuread__tenantid") {
            self.tenant_id.clone()
        } else if key.eq_ignore_ascii_case("microsoftappid") {
            self.client_id.clone()
        } else {
            None
        }
    }
}

fn unicode_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
}

/// Tenant and client id of the registered application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplicationIdentity {
    tenant_id: String,
    client_id: String,
}

impl ApplicationIdentity {
    pub fn new(tenant_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
        }
    }

    /// Missing keys are not an error, they read as empty strings.
    pub fn from_source<S>(source: &S) -> Self
    where
        S: ConfigSource + ?Sized,
    {
        Self {
            tenant_id: source.get(TENANT_ID_KEY).unwrap_or_default(),
            client_id: source.get(CLIENT_ID_KEY).unwrap_or_default(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// Listen address. `host` may be an IP literal or a name such as
/// `localhost`, resolved when the server starts.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Ok(envy::prefixed("SERVER_").from_iter::<_, ServerConfig>(unicode_vars(std::env::vars_os()))?)
    }

    pub async fn socket_addr(&self) -> Result<SocketAddr, ConfigurationError> {
        let invalid = || ConfigurationError::InvalidAddress(format!("{}:{}", self.host, self.port));

        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|_| invalid())?
            .next()
            .ok_or_else(invalid)
    }
}
