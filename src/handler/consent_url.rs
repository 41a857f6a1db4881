use crate::{consent::ConsentUrlBuilder, extractor::ConsentUrlQuery};
use axum::extract::State;
use tracing::instrument;

#[instrument(skip(builder))]
pub async fn consent_url(
    State(builder): State<ConsentUrlBuilder>,
    ConsentUrlQuery(request): ConsentUrlQuery,
) -> String {
    let consent_url = builder.build_consent_url(&request);

    tracing::debug!(
        "consent url issued for {}",
        &request.window_location_origin_domain
    );

    consent_url
}
