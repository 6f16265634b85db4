mod common;

use axum::http::StatusCode;
use common::{admin_token, insert_admin, send, test_app};
use scholaris_models::{AdminRole, PermissionTable};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_only_super_admin_updates_access(pool: PgPool) {
    let app = test_app(pool.clone());
    let target = insert_admin(
        &pool,
        AdminRole::Moderator,
        PermissionTable::defaults_for(AdminRole::Moderator),
        Some("sch_001m"),
    )
    .await;
    let uri = format!("/api/v1/admin/admins/{}/permissions", target.id);
    let body = json!({ "permissions": { "students": { "view": true, "delete": true } } });

    let peer = insert_admin(
        &pool,
        AdminRole::Admin,
        PermissionTable::defaults_for(AdminRole::Admin),
        Some("sch_002m"),
    )
    .await;
    let (status, _) = send(&app, "PUT", &uri, Some(body.clone()), Some(&admin_token(&peer))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let super_admin = insert_admin(&pool, AdminRole::SuperAdmin, PermissionTable::empty(), None).await;
    let token = admin_token(&super_admin);
    let (status, updated) = send(&app, "PUT", &uri, Some(body), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["permissions"]["students"]["delete"], true);
    assert_eq!(updated["role"], "moderator");

    // The new table takes effect on the target's next request
    let student_uri = format!("/api/v1/admin/students/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "DELETE", &student_uri, None, Some(&admin_token(&target))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_access_update_rejections(pool: PgPool) {
    let app = test_app(pool.clone());
    let super_admin = insert_admin(&pool, AdminRole::SuperAdmin, PermissionTable::empty(), None).await;
    let token = admin_token(&super_admin);
    let target = insert_admin(&pool, AdminRole::Admin, PermissionTable::empty(), Some("sch_001m")).await;
    let uri = format!("/api/v1/admin/admins/{}/permissions", target.id);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "permissions": { "notices": { "view": true } } })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("notices"));

    let (status, _) = send(&app, "PUT", &uri, Some(json!({ "role": "super_admin" })), Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", &uri, Some(json!({})), Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let other_super = insert_admin(&pool, AdminRole::SuperAdmin, PermissionTable::empty(), None).await;
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/admin/admins/{}/permissions", other_super.id),
        Some(json!({ "role": "moderator" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_change_resets_table(pool: PgPool) {
    let app = test_app(pool.clone());
    let super_admin = insert_admin(&pool, AdminRole::SuperAdmin, PermissionTable::empty(), None).await;
    let target = insert_admin(
        &pool,
        AdminRole::Admin,
        PermissionTable::defaults_for(AdminRole::Admin),
        Some("sch_001m"),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/admin/admins/{}/permissions", target.id),
        Some(json!({ "role": "moderator" })),
        Some(&admin_token(&super_admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "moderator");
    assert_eq!(body["permissions"]["students"]["create"], false);
    assert_eq!(body["permissions"]["students"]["view"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_librarian_status_needs_library_edit(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, created) = send(
        &app,
        "POST",
        "/api/v1/auth/librarian/register",
        Some(json!({ "name": "Lib", "email": common::unique_email("lib"), "password": common::TEST_PASSWORD })),
        None,
    )
    .await;
    let uri = format!(
        "/api/v1/admin/librarians/{}/status",
        created["librarian"]["id"].as_str().unwrap()
    );

    let moderator = insert_admin(
        &pool,
        AdminRole::Moderator,
        PermissionTable::defaults_for(AdminRole::Moderator),
        Some("sch_001m"),
    )
    .await;
    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "status": "suspended" })), Some(&admin_token(&moderator))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = insert_admin(
        &pool,
        AdminRole::Admin,
        PermissionTable::defaults_for(AdminRole::Admin),
        Some("sch_001m"),
    )
    .await;
    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "suspended" })), Some(&admin_token(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["librarian"]["status"], "suspended");
}
