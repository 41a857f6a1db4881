use crate::consent::ConsentUrlRequest;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Query inputs of the consent URL endpoint.
///
/// Parameter names match without regard to case and absent parameters are
/// empty. The extractor never rejects a request.
#[derive(Debug, Clone, Default)]
pub struct ConsentUrlQuery(pub ConsentUrlRequest);

impl ConsentUrlQuery {
    pub fn parse(query: &str) -> Self {
        let mut domain = None;
        let mut login_hint = None;

        // first occurrence of a repeated parameter wins
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if name.eq_ignore_ascii_case("windowLocationOriginDomain") {
                domain.get_or_insert(value);
            } else if name.eq_ignore_ascii_case("loginHint") {
                login_hint.get_or_insert(value);
            }
        }

        ConsentUrlQuery(ConsentUrlRequest::new(
            domain.unwrap_or_default(),
            login_hint.unwrap_or_default(),
        ))
    }

    pub fn into_inner(self) -> ConsentUrlRequest {
        self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ConsentUrlQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query().unwrap_or_default()))
    }
}
