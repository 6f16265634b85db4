mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use common::{TEST_PASSWORD, insert_admin, send, test_app, unique_email};
use scholaris::modules::admins::AdminService;
use scholaris::modules::schools::SchoolCodeService;
use scholaris_core::PasswordHash;
use scholaris_models::{AdminRole, NewAdmin, PermissionTable, SchoolType};
use serde_json::json;
use sqlx::PgPool;

fn new_admin(password: &PasswordHash) -> NewAdmin {
    NewAdmin {
        name: "Concurrent".to_string(),
        email: unique_email("concurrent"),
        password: password.clone(),
        role: AdminRole::Admin,
        permissions: PermissionTable::defaults_for(AdminRole::Admin),
        school_name: Some("Parallel School".to_string()),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sequence_is_global_across_types(pool: PgPool) {
    insert_admin(&pool, AdminRole::Admin, PermissionTable::empty(), Some("sch_007g")).await;

    let mut tx = pool.begin().await.unwrap();
    SchoolCodeService::lock_sequence(&mut tx).await.unwrap();
    let code = SchoolCodeService::generate_school_code(&mut tx, SchoolType::Boys)
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(code.as_str(), "sch_008b");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generation_does_not_persist(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let first = SchoolCodeService::generate_school_code(&mut conn, SchoolType::Mixed)
        .await
        .unwrap();
    let second = SchoolCodeService::generate_school_code(&mut conn, SchoolType::Mixed)
        .await
        .unwrap();

    assert_eq!(first.as_str(), "sch_001m");
    assert_eq!(first, second);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_registrations_get_distinct_codes(pool: PgPool) {
    let password = PasswordHash::from_plaintext(TEST_PASSWORD).unwrap();

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let pool = pool.clone();
            let admin = new_admin(&password);
            let school_type = [SchoolType::Boys, SchoolType::Girls, SchoolType::Mixed][i % 3];
            tokio::spawn(async move {
                AdminService::register_school_admin(&pool, admin, school_type).await
            })
        })
        .collect();

    let mut sequences = HashSet::new();
    for handle in handles {
        let admin = handle.await.unwrap().unwrap();
        let code = admin.school_code.unwrap();
        assert!(sequences.insert(code.sequence()), "duplicate sequence for {}", code);
    }

    let expected: HashSet<u16> = (1..=12).collect();
    assert_eq!(sequences, expected);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_capacity_exceeded(pool: PgPool) {
    insert_admin(&pool, AdminRole::Admin, PermissionTable::empty(), Some("sch_999m")).await;
    let app = test_app(pool.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/admin/register",
        Some(json!({
            "name": "Overflow",
            "email": unique_email("admin"),
            "password": TEST_PASSWORD,
            "schoolName": "One Too Many",
            "schoolType": "girls"
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("capacity"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
