use anyhow::Context;
use scholaris_auth::ActorRole;
use scholaris_core::{AppError, PasswordHash};
use scholaris_models::{
    Actor, ActorStatus, Admin, Coach, Librarian, NewCoach, NewLibrarian, NewTeacher, SchoolCode,
    Student, Teacher, normalize_email,
};
use sqlx::{FromRow, PgPool, postgres::PgRow};
use tracing::instrument;
use uuid::Uuid;

pub struct ActorService;

enum Lookup<'a> {
    Id(Uuid),
    Email(&'a str),
}

impl Lookup<'_> {
    fn column(&self) -> &'static str {
        match self {
            Lookup::Id(_) => "id",
            Lookup::Email(_) => "email",
        }
    }
}

/// Table backing each role.
pub fn table_for(role: ActorRole) -> &'static str {
    match role {
        ActorRole::Admin => "admins",
        ActorRole::Student => "students",
        ActorRole::Teacher => "teachers",
        ActorRole::Coach => "coaches",
        ActorRole::Librarian => "librarians",
    }
}

async fn fetch_optional<T>(
    db: &PgPool,
    role: ActorRole,
    lookup: Lookup<'_>,
) -> Result<Option<Actor>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Into<Actor>,
{
    let sql = format!(
        "SELECT * FROM {} WHERE {} = $1",
        table_for(role),
        lookup.column()
    );

    let query = sqlx::query_as::<_, T>(&sql);
    let query = match lookup {
        Lookup::Id(id) => query.bind(id),
        Lookup::Email(email) => query.bind(normalize_email(email)),
    };

    let row = query
        .fetch_optional(db)
        .await
        .with_context(|| format!("Failed to fetch {} account", role))
        .map_err(AppError::database)?;

    Ok(row.map(Into::into))
}

async fn find(db: &PgPool, role: ActorRole, lookup: Lookup<'_>) -> Result<Option<Actor>, AppError> {
    match role {
        ActorRole::Admin => fetch_optional::<Admin>(db, role, lookup).await,
        ActorRole::Student => fetch_optional::<Student>(db, role, lookup).await,
        ActorRole::Teacher => fetch_optional::<Teacher>(db, role, lookup).await,
        ActorRole::Coach => fetch_optional::<Coach>(db, role, lookup).await,
        ActorRole::Librarian => fetch_optional::<Librarian>(db, role, lookup).await,
    }
}

/// Maps insert failures: unique violations become 409 naming the clashing
/// field, a school code no admin owns becomes 404, format CHECK violations
/// become 400.
pub fn map_insert_error(err: sqlx::Error, key_label: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.ends_with("email_key") {
                return AppError::conflict(anyhow::anyhow!("Email is already registered"));
            }
            return AppError::conflict(anyhow::anyhow!("{} already exists", key_label));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::not_found(anyhow::anyhow!("School not found"));
        }
        if db_err.is_check_violation() {
            return AppError::bad_request(anyhow::anyhow!("Invalid {} format", key_label));
        }
    }
    AppError::database(anyhow::Error::from(err).context("Failed to insert account"))
}

impl ActorService {
    #[instrument(skip(db))]
    pub async fn find_by_id(
        db: &PgPool,
        role: ActorRole,
        id: Uuid,
    ) -> Result<Option<Actor>, AppError> {
        find(db, role, Lookup::Id(id)).await
    }

    #[instrument(skip(db))]
    pub async fn find_by_email(
        db: &PgPool,
        role: ActorRole,
        email: &str,
    ) -> Result<Option<Actor>, AppError> {
        find(db, role, Lookup::Email(email)).await
    }

    /// Sets an account's status. With `school`, only rows in that school match.
    #[instrument(skip(db))]
    pub async fn update_status(
        db: &PgPool,
        role: ActorRole,
        id: Uuid,
        status: ActorStatus,
        school: Option<&SchoolCode>,
    ) -> Result<Actor, AppError> {
        let table = table_for(role);
        let result = match school {
            Some(school) => {
                let sql = format!(
                    "UPDATE {} SET status = $1, updated_at = NOW() WHERE id = $2 AND school_code = $3",
                    table
                );
                sqlx::query(&sql)
                    .bind(status)
                    .bind(id)
                    .bind(school)
                    .execute(db)
                    .await
            }
            None => {
                let sql = format!(
                    "UPDATE {} SET status = $1, updated_at = NOW() WHERE id = $2",
                    table
                );
                sqlx::query(&sql).bind(status).bind(id).execute(db).await
            }
        }
        .context("Failed to update account status")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "{} not found",
                capitalize(role.as_str())
            )));
        }

        Self::find_by_id(db, role, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("{} not found", role)))
    }

    #[instrument(skip(db, password))]
    pub async fn update_password(
        db: &PgPool,
        role: ActorRole,
        id: Uuid,
        password: &PasswordHash,
    ) -> Result<(), AppError> {
        let sql = format!(
            "UPDATE {} SET password = $1, updated_at = NOW() WHERE id = $2",
            table_for(role)
        );

        sqlx::query(&sql)
            .bind(password.as_str())
            .bind(id)
            .execute(db)
            .await
            .context("Failed to update password")
            .map_err(AppError::database)?;

        Ok(())
    }

    #[instrument(skip(db, teacher), fields(teacher_code = %teacher.teacher_code))]
    pub async fn insert_teacher(db: &PgPool, teacher: NewTeacher) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (name, email, password, nic, school_code, teacher_code, course_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&teacher.name)
        .bind(&teacher.email)
        .bind(teacher.password.as_str())
        .bind(&teacher.nic)
        .bind(&teacher.school_code)
        .bind(&teacher.teacher_code)
        .bind(&teacher.course_ids)
        .fetch_one(db)
        .await
        .map_err(|e| map_insert_error(e, "Teacher ID"))
    }

    #[instrument(skip(db, coach))]
    pub async fn insert_coach(db: &PgPool, coach: NewCoach) -> Result<Coach, AppError> {
        sqlx::query_as::<_, Coach>(
            r#"
            INSERT INTO coaches (name, email, password, sport_ids)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&coach.name)
        .bind(&coach.email)
        .bind(coach.password.as_str())
        .bind(&coach.sport_ids)
        .fetch_one(db)
        .await
        .map_err(|e| map_insert_error(e, "Coach"))
    }

    #[instrument(skip(db, librarian))]
    pub async fn insert_librarian(
        db: &PgPool,
        librarian: NewLibrarian,
    ) -> Result<Librarian, AppError> {
        sqlx::query_as::<_, Librarian>(
            r#"
            INSERT INTO librarians (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&librarian.name)
        .bind(&librarian.email)
        .bind(librarian.password.as_str())
        .fetch_one(db)
        .await
        .map_err(|e| map_insert_error(e, "Librarian"))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
