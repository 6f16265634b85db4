use anyhow::Context;
use scholaris_core::AppError;
use scholaris_models::{NewStudent, SchoolCode, Student};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::actors::service::map_insert_error;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, student), fields(student_code = %student.student_code))]
    pub async fn insert(db: &PgPool, student: NewStudent) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students
                (name, email, password, nic, school_code, student_code, course_ids, sport_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&student.name)
        .bind(&student.email)
        .bind(student.password.as_str())
        .bind(&student.nic)
        .bind(&student.school_code)
        .bind(&student.student_code)
        .bind(&student.course_ids)
        .bind(&student.sport_ids)
        .fetch_one(db)
        .await
        .map_err(|e| map_insert_error(e, "Student ID"))
    }

    /// Students in `school`, or in every school when `None`, newest first.
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        school: Option<&SchoolCode>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE ($1::text IS NULL OR school_code = $1)",
        )
        .bind(school)
        .fetch_one(db)
        .await
        .context("Failed to count students")
        .map_err(AppError::database)?;

        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT * FROM students
            WHERE ($1::text IS NULL OR school_code = $1)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(school)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn get(
        db: &PgPool,
        id: Uuid,
        school: Option<&SchoolCode>,
    ) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE id = $1 AND ($2::text IS NULL OR school_code = $2)",
        )
        .bind(id)
        .bind(school)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete(
        db: &PgPool,
        id: Uuid,
        school: Option<&SchoolCode>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM students WHERE id = $1 AND ($2::text IS NULL OR school_code = $2)",
        )
        .bind(id)
        .bind(school)
        .execute(db)
        .await
        .context("Failed to delete student")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }
}
