//! Fills a database with fake schools, teachers and students.
//!
//! Each school is registered through the same path as the public endpoint,
//! so school codes come from the locked sequence. Member records are
//! generated and bcrypt-hashed in parallel with rayon, then batch inserted.

use std::collections::HashSet;
use std::time::Instant;

use anyhow::Context;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use scholaris_core::PasswordHash;
use scholaris_models::{
    AdminRole, NewAdmin, PermissionTable, SchoolCode, SchoolType, StudentCode, TeacherCode,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::modules::admins::AdminService;

pub const SEED_PASSWORD: &str = "password123";

/// Rows per multi-value INSERT.
const BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub schools: usize,
    pub teachers_per_school: usize,
    pub students_per_school: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            schools: 3,
            teachers_per_school: 5,
            students_per_school: 20,
        }
    }
}

struct MemberSeed {
    name: String,
    email: String,
    password: PasswordHash,
    nic: String,
    code: String,
}

fn school_type_for(index: usize) -> SchoolType {
    match index % 3 {
        0 => SchoolType::Mixed,
        1 => SchoolType::Boys,
        _ => SchoolType::Girls,
    }
}

fn fake_nic() -> String {
    let digits: u64 = (100_000_000..999_999_999).fake();
    format!("{}V", digits)
}

/// Generates `count` members of `school` in parallel, dropping any whose
/// derived code repeats an earlier one.
fn generate_members(
    school: &SchoolCode,
    prefix: &str,
    count: usize,
) -> anyhow::Result<Vec<MemberSeed>> {
    let members: Vec<MemberSeed> = (0..count)
        .into_par_iter()
        .map(|i| -> anyhow::Result<MemberSeed> {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            let nic = fake_nic();
            let code = match prefix {
                "st" => StudentCode::derive(school, &nic)?.into_inner(),
                _ => TeacherCode::derive(school, &nic)?.into_inner(),
            };
            let password = PasswordHash::from_plaintext(SEED_PASSWORD)
                .map_err(|e| anyhow::anyhow!("{}", e.error))?;

            Ok(MemberSeed {
                name: format!("{} {}", first, last),
                email: format!(
                    "{}.{}.{}{}@{}.seed",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    prefix,
                    i,
                    school
                ),
                password,
                nic,
                code,
            })
        })
        .collect::<anyhow::Result<_>>()?;

    let mut seen = HashSet::new();
    Ok(members
        .into_iter()
        .filter(|m| seen.insert(m.code.clone()))
        .collect())
}

async fn insert_members(
    db: &PgPool,
    table: &str,
    code_column: &str,
    school: &SchoolCode,
    members: &[MemberSeed],
) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for chunk in members.chunks(BATCH_SIZE) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} (name, email, password, nic, school_code, {}) ",
            table, code_column
        ));
        builder.push_values(chunk, |mut row, member| {
            row.push_bind(&member.name)
                .push_bind(&member.email)
                .push_bind(member.password.as_str())
                .push_bind(&member.nic)
                .push_bind(school)
                .push_bind(&member.code);
        });
        builder.push(" ON CONFLICT DO NOTHING");

        let result = builder
            .build()
            .execute(db)
            .await
            .with_context(|| format!("Failed to insert {}", table))?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

pub async fn seed_database(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    println!(
        "🌱 Seeding {} schools ({} teachers, {} students each)...",
        config.schools, config.teachers_per_school, config.students_per_school
    );

    let admin_password = PasswordHash::from_plaintext(SEED_PASSWORD)
        .map_err(|e| anyhow::anyhow!("{}", e.error))?;

    for index in 0..config.schools {
        let school_type = school_type_for(index);
        let school_name = format!("{} {} School", LastName().fake::<String>(), school_type);
        let admin = NewAdmin {
            name: format!("{} {}", FirstName().fake::<String>(), LastName().fake::<String>()),
            email: format!("admin{}.{}@school.seed", index, uuid::Uuid::new_v4().simple()),
            password: admin_password.clone(),
            role: AdminRole::Admin,
            permissions: PermissionTable::defaults_for(AdminRole::Admin),
            school_name: Some(school_name),
        };

        let admin = AdminService::register_school_admin(db, admin, school_type)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to register school admin: {}", e.error))?;
        let school = admin
            .school_code
            .context("Registered admin has no school code")?;

        let teachers = generate_members(&school, "te", config.teachers_per_school)?;
        let students = generate_members(&school, "st", config.students_per_school)?;

        let teacher_rows = insert_members(db, "teachers", "teacher_code", &school, &teachers).await?;
        let student_rows = insert_members(db, "students", "student_code", &school, &students).await?;

        println!(
            "   {} → {} teachers, {} students (admin {})",
            school, teacher_rows, student_rows, admin.email
        );
    }

    println!("✅ Seeding complete in {:?}", start.elapsed());
    println!("📝 Password for all seeded accounts: {}", SEED_PASSWORD);
    Ok(())
}

/// Removes every account except super admins.
pub async fn clear_seeded_data(db: &PgPool) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    for statement in [
        "DELETE FROM students",
        "DELETE FROM teachers",
        "DELETE FROM coaches",
        "DELETE FROM librarians",
        "DELETE FROM admins WHERE role <> 'super_admin'",
    ] {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed: {}", statement))?;
    }
    tx.commit().await?;
    println!("🗑️  Cleared seeded data (super admins kept)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_school_types_rotate() {
        let types: Vec<_> = (0..4).map(school_type_for).collect();
        assert_eq!(
            types,
            [SchoolType::Mixed, SchoolType::Boys, SchoolType::Girls, SchoolType::Mixed]
        );
    }

    #[test]
    fn test_generated_members_have_valid_unique_codes() {
        let school = SchoolCode::new("sch_004g").unwrap();
        let members = generate_members(&school, "st", 3).unwrap();
        let mut codes = HashSet::new();
        for member in &members {
            assert!(scholaris_models::is_valid_student_code(&member.code));
            assert!(member.code.starts_with("st004g"));
            assert!(codes.insert(member.code.clone()));
            assert!(member.password.verify(SEED_PASSWORD).unwrap());
        }
    }
}
