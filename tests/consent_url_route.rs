use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use consent_url_service::{server::router, ApplicationIdentity, ConsentUrlBuilder};
use std::collections::{HashMap, HashSet};
use tower::ServiceExt;
use url::Url;

fn app() -> Router {
    router(ConsentUrlBuilder::new(ApplicationIdentity::new("tid-1", "cid-1")))
}

async fn get(uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

fn query_map(consent_url: &str) -> HashMap<String, String> {
    Url::parse(consent_url)
        .unwrap()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[tokio::test]
async fn returns_consent_url_as_text() {
    let (status, content_type, body) = get(
        "/api/authenticationMetadata/consentUrl?windowLocationOriginDomain=example.com&loginHint=user%40example.com",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert!(body.starts_with(
        "https://login.microsoftonline.com/tid-1/oauth2/v2.0/authorize?\
         redirect_uri=https%3A%2F%2Fexample.com%2Fsignin-simple-end&client_id=cid-1&"
    ));
    assert!(body.ends_with("&login_hint=user%40example.com"));
}

#[tokio::test]
async fn missing_parameters_become_empty() {
    let (status, _, body) = get("/api/authenticationMetadata/consentUrl").await;

    assert_eq!(status, StatusCode::OK);
    let query = query_map(&body);
    assert_eq!(query["redirect_uri"], "https:///signin-simple-end");
    assert_eq!(query["login_hint"], "");
}

#[tokio::test]
async fn parameter_names_ignore_case() {
    let (_, _, body) = get(
        "/api/authenticationMetadata/consentUrl?WindowLocationOriginDomain=teams.example.org&LOGINHINT=a+b%40c.com",
    )
    .await;

    let query = query_map(&body);
    assert_eq!(query["redirect_uri"], "https://teams.example.org/signin-simple-end");
    assert_eq!(query["login_hint"], "a b@c.com");
}

#[tokio::test]
async fn each_request_gets_fresh_identifiers() {
    let uri = "/api/authenticationMetadata/consentUrl?windowLocationOriginDomain=x&loginHint=y";
    let first = query_map(&get(uri).await.2);
    let second = query_map(&get(uri).await.2);

    assert_ne!(first["nonce"], second["nonce"]);
    assert_ne!(first["state"], second["state"]);
    assert_ne!(first["nonce"], first["state"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_get_distinct_identifiers() {
    let uri = "/api/authenticationMetadata/consentUrl?windowLocationOriginDomain=x&loginHint=y";
    let tasks: Vec<_> = (0..32).map(|_| tokio::spawn(get(uri))).collect();

    let mut seen = HashSet::new();
    for task in tasks {
        let (status, _, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        let query = query_map(&body);
        assert!(seen.insert(query["nonce"].clone()));
        assert!(seen.insert(query["state"].clone()));
    }
    assert_eq!(seen.len(), 64);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _, _) = get("/api/authenticationMetadata/other").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
