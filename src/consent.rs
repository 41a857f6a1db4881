use crate::config::{ApplicationIdentity, ConfigSource, ConfigurationError};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;
use uuid::Uuid;

/// Everything except the RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const RESPONSE_TYPE: &str = "id_token";
const RESPONSE_MODE: &str = "fragment";
const SCOPE: &str = "https://graph.microsoft.com/User.Read openid profile";
const SIGNIN_END_PATH: &str = "/signin-simple-end";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConsentUrlRequest {
    pub window_location_origin_domain: String,
    pub login_hint: String,
}

// The login hint is a user principal name and stays out of logs.
impl fmt::Debug for ConsentUrlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsentUrlRequest")
            .field(
                "window_location_origin_domain",
                &self.window_location_origin_domain,
            )
            .field("login_hint_len", &self.login_hint.len())
            .finish()
    }
}

impl ConsentUrlRequest {
    pub fn new(
        window_location_origin_domain: impl Into<String>,
        login_hint: impl Into<String>,
    ) -> Self {
        Self {
            window_location_origin_domain: window_location_origin_domain.into(),
            login_hint: login_hint.into(),
        }
    }
}

/// Query parameters of one consent URL, in the order they are emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsentUrlParameters {
    pairs: Vec<(&'static str, String)>,
}

impl ConsentUrlParameters {
    pub fn new(
        identity: &ApplicationIdentity,
        request: &ConsentUrlRequest,
        nonce: Uuid,
        state: Uuid,
    ) -> Self {
        let redirect_uri = format!(
            "https://{}{}",
            request.window_location_origin_domain, SIGNIN_END_PATH
        );

        let pairs = vec![
            ("redirect_uri", redirect_uri),
            ("client_id", identity.client_id().to_owned()),
            ("response_type", RESPONSE_TYPE.to_owned()),
            ("response_mode", RESPONSE_MODE.to_owned()),
            ("scope", SCOPE.to_owned()),
            ("nonce", nonce.to_string()),
            ("state", state.to_string()),
            ("login_hint", request.login_hint.clone()),
        ];

        Self { pairs }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.pairs.iter().map(|(key, value)| (*key, value.as_str()))
    }

    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, utf8_percent_encode(value, QUERY_VALUE)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Builds Microsoft identity platform authorize URLs for the implicit
/// `id_token` flow. Cheap to clone and safe to share between requests.
#[derive(Clone, Debug)]
pub struct ConsentUrlBuilder {
    identity: ApplicationIdentity,
}

impl ConsentUrlBuilder {
    pub fn new(identity: ApplicationIdentity) -> Self {
        Self { identity }
    }

    pub fn from_source<S>(source: Option<&S>) -> Result<Self, ConfigurationError>
    where
        S: ConfigSource + ?Sized,
    {
        let source = source.ok_or(ConfigurationError::MissingSource)?;
        Ok(Self::new(ApplicationIdentity::from_source(source)))
    }

    pub fn identity(&self) -> &ApplicationIdentity {
        &self.identity
    }

    /// Builds a consent URL with a fresh nonce and state.
    pub fn build_consent_url(&self, request: &ConsentUrlRequest) -> String {
        self.consent_url(request, Uuid::new_v4(), Uuid::new_v4())
    }

    pub fn consent_url(&self, request: &ConsentUrlRequest, nonce: Uuid, state: Uuid) -> String {
        let parameters = ConsentUrlParameters::new(&self.identity, request, nonce, state);

        format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/authorize?{}",
            self.identity.tenant_id(),
            parameters.to_query_string()
        )
    }
}
