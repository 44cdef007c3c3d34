//! In-process request tests for the delivery service: auth gating, range
//! semantics, and the session endpoints, exercised through the real router.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use core_auth::SessionGate;
use core_catalog::{Track, TrackCatalog};
use http_body_util::BodyExt;
use media_server::{router, AppState, ServerConfig};
use tower::ServiceExt;

const SECRET: &str = "test-secret";
const ASSET_LEN: usize = 5000;

/// Patterned asset bytes so slices are position-identifiable.
fn asset_bytes() -> Vec<u8> {
    (0..ASSET_LEN).map(|i| (i % 251) as u8).collect()
}

struct TestServer {
    app: Router,
    gate: SessionGate,
    _root: PathBuf,
}

static SERVER_SEQ: AtomicU64 = AtomicU64::new(0);

fn server() -> TestServer {
    let unique = SERVER_SEQ.fetch_add(1, Ordering::Relaxed);
    let root = std::env::temp_dir().join(format!(
        "waveline-http-{}-{}",
        std::process::id(),
        unique
    ));
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("first-light.mp3"), asset_bytes()).unwrap();

    let config = ServerConfig {
        media_root: root.clone(),
        session_secret: SECRET.to_string(),
        ..ServerConfig::default()
    };
    let catalog = TrackCatalog::new(vec![
        Track::new("First Light", "first-light", Some("first-light.mp3")),
        Track::new("Meridian", "meridian", Some("meridian.mp3")).unreleased(),
        Track::new("Ghost", "ghost", Some("missing.mp3")),
    ])
    .unwrap();

    TestServer {
        app: router(AppState::new(&config, Arc::new(catalog))),
        gate: SessionGate::new(SECRET),
        _root: root,
    }
}

fn session_cookie(gate: &SessionGate) -> String {
    let token = gate
        .issue(Some("listener@example.com"), Duration::days(1), Utc::now())
        .unwrap();
    format!("wl_session={token}")
}

fn media_request(cookie: Option<&str>, slug: &str, range: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(format!("/protected-media/{slug}"));
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if let Some(range) = range {
        builder = builder.header(header::RANGE, range);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

fn header_str<'a>(response: &'a axum::response::Response, name: header::HeaderName) -> &'a str {
    response
        .headers()
        .get(name)
        .map(|v| v.to_str().unwrap())
        .unwrap_or("")
}

#[tokio::test]
async fn missing_credential_is_rejected_before_any_file_io() {
    // A media root that does not exist: if auth ran after file access this
    // request could never produce a clean 401.
    let config = ServerConfig {
        media_root: PathBuf::from("/nonexistent/waveline-root"),
        session_secret: SECRET.to_string(),
        ..ServerConfig::default()
    };
    let catalog =
        TrackCatalog::new(vec![Track::new("First Light", "first-light", Some("first-light.mp3"))])
            .unwrap();
    let app = router(AppState::new(&config, Arc::new(catalog)));

    let response = app
        .oneshot(media_request(None, "first-light", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        header_str(&response, header::CACHE_CONTROL),
        "private, max-age=0, no-store"
    );
    let body = body_bytes(response).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Not authorized");
}

#[tokio::test]
async fn expired_credential_is_rejected() {
    let ts = server();
    let token = ts
        .gate
        .issue(Some("x"), Duration::seconds(-10), Utc::now())
        .unwrap();
    let cookie = format!("wl_session={token}");
    let response = ts
        .app
        .oneshot(media_request(Some(&cookie), "first-light", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bearer_header_is_an_equivalent_credential() {
    let ts = server();
    let token = ts
        .gate
        .issue(Some("x"), Duration::days(1), Utc::now())
        .unwrap();
    let request = Request::builder()
        .uri("/protected-media/first-light")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = ts.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn full_body_round_trips_byte_exact() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .oneshot(media_request(Some(&cookie), "first-light", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::ACCEPT_RANGES), "bytes");
    assert_eq!(header_str(&response, header::CONTENT_TYPE), "audio/mpeg");
    assert_eq!(
        header_str(&response, header::CACHE_CONTROL),
        "private, max-age=0, no-store"
    );
    assert_eq!(
        header_str(&response, header::CONTENT_LENGTH),
        ASSET_LEN.to_string()
    );
    assert_eq!(body_bytes(response).await, asset_bytes());
}

#[tokio::test]
async fn simple_range_returns_exact_slice() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .oneshot(media_request(Some(&cookie), "first-light", Some("bytes=0-1023")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        header_str(&response, header::CONTENT_RANGE),
        "bytes 0-1023/5000"
    );
    assert_eq!(header_str(&response, header::CONTENT_LENGTH), "1024");
    let body = body_bytes(response).await;
    assert_eq!(body.len(), 1024);
    assert_eq!(body, &asset_bytes()[0..1024]);
}

#[tokio::test]
async fn interior_ranges_are_byte_exact() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let data = asset_bytes();
    for (start, end) in [(0u64, 0u64), (1, 1), (999, 2500), (4998, 4999), (0, 4999)] {
        let range = format!("bytes={start}-{end}");
        let response = ts
            .app
            .clone()
            .oneshot(media_request(Some(&cookie), "first-light", Some(&range)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT, "{range}");
        assert_eq!(
            header_str(&response, header::CONTENT_RANGE),
            format!("bytes {start}-{end}/5000"),
            "{range}"
        );
        let body = body_bytes(response).await;
        assert_eq!(body, &data[start as usize..=end as usize], "{range}");
    }
}

#[tokio::test]
async fn open_ended_range_runs_to_final_byte() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .oneshot(media_request(Some(&cookie), "first-light", Some("bytes=4000-")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        header_str(&response, header::CONTENT_RANGE),
        "bytes 4000-4999/5000"
    );
    assert_eq!(body_bytes(response).await, &asset_bytes()[4000..]);
}

#[tokio::test]
async fn inverted_range_is_not_satisfiable() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .oneshot(media_request(Some(&cookie), "first-light", Some("bytes=4999-10")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(header_str(&response, header::CONTENT_RANGE), "bytes */5000");
}

#[tokio::test]
async fn range_past_end_is_not_satisfiable() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .oneshot(media_request(Some(&cookie), "first-light", Some("bytes=9999-")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn unparseable_range_serves_the_whole_asset() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .oneshot(media_request(Some(&cookie), "first-light", Some("bytes=a-b")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.len(), ASSET_LEN);
}

#[tokio::test]
async fn unknown_and_path_like_slugs_are_not_found() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    for slug in ["nope", "..%2F..%2Fetc%2Fpasswd", "first-light.mp3"] {
        let response = ts
            .app
            .clone()
            .oneshot(media_request(Some(&cookie), slug, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{slug}");
        let body = body_bytes(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Track not found", "{slug}");
    }
}

#[tokio::test]
async fn unreleased_track_is_withheld() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .oneshot(media_request(Some(&cookie), "meridian", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn known_slug_with_missing_file_reports_file_missing() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .oneshot(media_request(Some(&cookie), "ghost", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_bytes(response).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "File missing");
}

#[tokio::test]
async fn non_get_methods_are_rejected() {
    let ts = server();
    let cookie = session_cookie(&ts.gate);
    let request = Request::builder()
        .method("POST")
        .uri("/protected-media/first-light")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = ts.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn whoami_reports_anonymous_and_authenticated_states() {
    let ts = server();

    let response = ts
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session/whoami")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json, serde_json::json!({ "authed": false }));

    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session/whoami")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["authed"], true);
    assert_eq!(json["payload"]["sub"], "listener@example.com");
}

#[tokio::test]
async fn whoami_reports_expiry_reason_but_still_succeeds() {
    let ts = server();
    let token = ts
        .gate
        .issue(Some("x"), Duration::seconds(-5), Utc::now())
        .unwrap();
    let response = ts
        .app
        .oneshot(
            Request::builder()
                .uri("/session/whoami")
                .header(header::COOKIE, format!("wl_session={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["authed"], false);
    assert_eq!(json["reason"], "exp");
}

#[tokio::test]
async fn me_requires_a_session() {
    let ts = server();
    let response = ts
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = session_cookie(&ts.gate);
    let response = ts
        .app
        .oneshot(
            Request::builder()
                .uri("/session/me")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["user"], "listener@example.com");
}
