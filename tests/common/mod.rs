#![allow(dead_code)]

use std::num::NonZeroU32;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use scholaris::router::init_router;
use scholaris::state::AppState;
use scholaris_auth::create_access_token;
use scholaris_config::{CorsConfig, JwtConfig, RateLimitConfig};
use scholaris_core::PasswordHash;
use scholaris_models::{Actor, Admin, AdminRole, PermissionTable, SchoolCode};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-for-integration-tests";
pub const TEST_PASSWORD: &str = "password123";

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET, 86_400)
}

fn lenient_rate_limit() -> RateLimitConfig {
    RateLimitConfig {
        auth_per_second: NonZeroU32::new(1_000).unwrap(),
        auth_burst_size: NonZeroU32::new(1_000).unwrap(),
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(
        pool,
        jwt_config(),
        CorsConfig::from_env(),
        lenient_rate_limit(),
        None,
    )
}

pub fn test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

pub fn test_app_with_rate_limit(pool: PgPool, rate_limit: RateLimitConfig) -> Router {
    init_router(AppState::new(
        pool,
        jwt_config(),
        CorsConfig::from_env(),
        rate_limit,
        None,
    ))
}

/// Sends one request and returns the status and the JSON body (`Null` when
/// the body is empty or not JSON).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@school.test", prefix, Uuid::new_v4().simple())
}

/// Inserts an admin row directly, bypassing registration.
pub async fn insert_admin(
    pool: &PgPool,
    role: AdminRole,
    permissions: PermissionTable,
    school_code: Option<&str>,
) -> Admin {
    let password = PasswordHash::from_plaintext(TEST_PASSWORD).unwrap();
    let school_code = school_code.map(|c| SchoolCode::new(c).unwrap());

    sqlx::query_as::<_, Admin>(
        r#"
        INSERT INTO admins (name, email, password, role, permissions, school_code, school_name)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind("Test Admin")
    .bind(unique_email(role.as_str()))
    .bind(password.as_str())
    .bind(role)
    .bind(Json(&permissions))
    .bind(&school_code)
    .bind(school_code.as_ref().map(|_| "Test School"))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn token_for(actor: &Actor) -> String {
    create_access_token(actor.id(), actor.role(), actor.natural_key(), &jwt_config()).unwrap()
}

pub fn admin_token(admin: &Admin) -> String {
    token_for(&Actor::Admin(admin.clone()))
}

/// Inserts a school-owning admin so members can register under `school_code`.
pub async fn insert_school(pool: &PgPool, school_code: &str) -> Admin {
    insert_admin(
        pool,
        AdminRole::Admin,
        PermissionTable::defaults_for(AdminRole::Admin),
        Some(school_code),
    )
    .await
}
