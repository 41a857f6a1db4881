use crate::{config::ServerConfig, consent::ConsentUrlBuilder, handler};
use axum::{
    extract::FromRef,
    http::Request,
    response::Response,
    routing::get,
    Router,
};
use std::time::Duration;
use tokio::signal;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::Span;

pub const CONSENT_URL_PATH: &str = "/api/authenticationMetadata/consentUrl";

pub fn router(builder: ConsentUrlBuilder) -> Router {
    let app_state = AppState { builder };

    Router::new()
        .route(CONSENT_URL_PATH, get(handler::consent_url))
        .with_state(app_state)
        .layer(
            TraceLayer::new_for_http()
                // query strings carry the login hint, spans record the path only
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path()
                    )
                })
                .on_request(|request: &Request<_>, _span: &Span| {
                    tracing::info!("{} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &Response, latency: Duration, _span: &Span| {
                    tracing::info!("{} in {:?}", response.status(), latency);
                })
                .on_failure(
                    |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                        tracing::error!("{} after {:?}", error, latency);
                    },
                ),
        )
}

pub async fn start_server(config: ServerConfig, builder: ConsentUrlBuilder) -> anyhow::Result<()> {
    let app = router(builder);

    let addr = config.socket_addr().await?;
    tracing::debug!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}

#[derive(Clone)]
struct AppState {
    builder: ConsentUrlBuilder,
}

impl FromRef<AppState> for ConsentUrlBuilder {
    fn from_ref(state: &AppState) -> Self {
        state.builder.clone()
    }
}
