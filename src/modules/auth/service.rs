use scholaris_auth::{ActorRole, create_access_token};
use scholaris_config::JwtConfig;
use scholaris_core::{AppError, verify_dummy_password};
use scholaris_models::{
    Actor, ChangePasswordRequest, Credentialed, LoginRequest, LoginResponse, NewAdmin, NewCoach,
    NewLibrarian, NewStudent, NewTeacher, RegisterAdminDto, RegisterCoachDto,
    RegisterLibrarianDto, RegisterStudentDto, RegisterTeacherDto,
};
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use crate::metrics::{track_jwt_issued, track_login_failure, track_login_success, track_registration};
use crate::modules::actors::ActorService;
use crate::modules::admins::AdminService;
use crate::modules::students::StudentService;
use crate::validator::from_json_value;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Verifies `role` credentials and issues a token carrying the actor's
    /// id, natural key and role.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        role: ActorRole,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let Some(actor) = ActorService::find_by_email(db, role, &dto.email).await? else {
            verify_dummy_password(&dto.password);
            track_login_failure(role, "unknown_email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !actor.compare_password(&dto.password)? {
            track_login_failure(role, "wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !actor.status().is_active() {
            track_login_failure(role, "inactive");
            return Err(AppError::unauthorized(format!(
                "Account is {}",
                actor.status()
            )));
        }

        let token = create_access_token(actor.id(), role, actor.natural_key(), jwt_config)?;
        track_jwt_issued();
        track_login_success(role);
        info!(actor_id = %actor.id(), %role, "Login succeeded");

        Ok(LoginResponse { token, actor })
    }

    /// Deserializes `body` as the registration payload of `role` and persists
    /// the new actor, generating its natural key.
    #[instrument(skip(db, body))]
    pub async fn register(
        db: &PgPool,
        role: ActorRole,
        body: serde_json::Value,
    ) -> Result<Actor, AppError> {
        let actor: Actor = match role {
            ActorRole::Admin => {
                let dto: RegisterAdminDto = from_json_value(body)?;
                let (admin, school_type) = NewAdmin::school_owner(dto)?;
                AdminService::register_school_admin(db, admin, school_type)
                    .await?
                    .into()
            }
            ActorRole::Student => {
                let dto: RegisterStudentDto = from_json_value(body)?;
                StudentService::insert(db, NewStudent::from_dto(dto)?)
                    .await?
                    .into()
            }
            ActorRole::Teacher => {
                let dto: RegisterTeacherDto = from_json_value(body)?;
                ActorService::insert_teacher(db, NewTeacher::from_dto(dto)?)
                    .await?
                    .into()
            }
            ActorRole::Coach => {
                let dto: RegisterCoachDto = from_json_value(body)?;
                ActorService::insert_coach(db, NewCoach::from_dto(dto)?)
                    .await?
                    .into()
            }
            ActorRole::Librarian => {
                let dto: RegisterLibrarianDto = from_json_value(body)?;
                ActorService::insert_librarian(db, NewLibrarian::from_dto(dto)?)
                    .await?
                    .into()
            }
        };

        track_registration(role);
        info!(actor_id = %actor.id(), %role, natural_key = ?actor.natural_key(), "Actor registered");
        Ok(actor)
    }

    /// Returns whether the stored hash was replaced.
    #[instrument(skip(db, actor, dto), fields(actor_id = %actor.id()))]
    pub async fn change_password(
        db: &PgPool,
        actor: &Actor,
        dto: ChangePasswordRequest,
    ) -> Result<bool, AppError> {
        if !actor.compare_password(&dto.current_password)? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        match actor.password_hash().rehash_if_changed(&dto.new_password)? {
            Some(hash) => {
                ActorService::update_password(db, actor.role(), actor.id(), &hash).await?;
                info!("Password changed");
                Ok(true)
            }
            None => {
                debug!("New password matches the current one");
                Ok(false)
            }
        }
    }
}
