use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::controller::{change_password, login, me, register};
use crate::middleware::auth::require_path_role;
use crate::middleware::rate_limit::rate_limit_auth;
use crate::state::AppState;

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/{role}/login", post(login))
        .route("/{role}/register", post(register))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_auth));

    let protected = Router::new()
        .route("/{role}/me", get(me))
        .route("/{role}/password", put(change_password))
        .route_layer(middleware::from_fn_with_state(state, require_path_role));

    public.merge(protected)
}
