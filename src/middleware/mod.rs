//! Request middleware and extractors.
//!
//! - [`auth`]: bearer token verification and actor reloading
//! - [`permission`]: admin `(resource, action)` checks
//! - [`rate_limit`]: per-IP limiting for login and registration
//!
//! # Authentication flow
//!
//! Each protected request runs the whole chain and stops at the first
//! failure:
//!
//! 1. no `Authorization: Bearer` header: 401
//! 2. bad signature, expired or malformed token: 401
//! 3. token role differs from the role the route requires: 403
//! 4. account missing or not `active`: 401
//! 5. the reloaded [`auth::AuthActor`] is attached to the request
//!
//! Handlers may then demand a permission:
//!
//! ```ignore
//! async fn delete_student(
//!     RequireStudentsDelete(admin): RequireStudentsDelete,
//!     Path(id): Path<Uuid>,
//! ) -> Result<Json<MessageResponse>, AppError> {
//!     // only reached when admin.can(Resource::Students, Action::Delete)
//! }
//! ```

pub mod auth;
pub mod permission;
pub mod rate_limit;
