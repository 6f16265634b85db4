mod common;

use std::net::SocketAddr;
use std::num::NonZeroU32;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use common::{TEST_PASSWORD, test_app_with_rate_limit};
use scholaris_config::RateLimitConfig;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn strict() -> RateLimitConfig {
    RateLimitConfig {
        auth_per_second: NonZeroU32::new(1).unwrap(),
        auth_burst_size: NonZeroU32::new(1).unwrap(),
    }
}

fn login_from(peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/student/login")
        .header("content-type", "application/json");
    if let Some(forwarded_for) = forwarded_for {
        builder = builder.header("x-forwarded-for", forwarded_for);
    }
    let mut request = builder
        .body(Body::from(
            json!({ "email": "nobody@school.test", "password": TEST_PASSWORD }).to_string(),
        ))
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
    request
}

#[sqlx::test(migrations = "./migrations")]
async fn test_auth_routes_are_limited_per_peer(pool: PgPool) {
    let app = test_app_with_rate_limit(pool, strict());

    let first = app.clone().oneshot(login_from("203.0.113.7:4000", None)).await.unwrap();
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);

    let second = app.clone().oneshot(login_from("203.0.113.7:4001", None)).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let other = app.clone().oneshot(login_from("198.51.100.4:4000", None)).await.unwrap();
    assert_eq!(other.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forwarded_headers_do_not_reset_the_bucket(pool: PgPool) {
    let app = test_app_with_rate_limit(pool, strict());

    let first = app
        .clone()
        .oneshot(login_from("192.0.2.1:5555", Some("1.1.1.1")))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);

    let second = app
        .clone()
        .oneshot(login_from("192.0.2.1:5555", Some("2.2.2.2")))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_is_not_limited(pool: PgPool) {
    let app = test_app_with_rate_limit(pool, strict());

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
