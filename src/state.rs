use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use governor::DefaultKeyedRateLimiter;
use metrics_exporter_prometheus::PrometheusHandle;
use scholaris_config::{CorsConfig, JwtConfig, RateLimitConfig};
use scholaris_db::{DbInitError, PgPool, init_db_pool};

pub type AuthRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    /// Shared per-IP limiter for the login and registration routes.
    pub auth_limiter: Arc<AuthRateLimiter>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let auth_limiter = Arc::new(rate_limit_config.auth_limiter());
        Self {
            db,
            jwt_config,
            cors_config,
            rate_limit_config,
            auth_limiter,
            metrics,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_config", &self.jwt_config)
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .field("metrics_enabled", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state(metrics: Option<PrometheusHandle>) -> Result<AppState, DbInitError> {
    Ok(AppState::new(
        init_db_pool().await?,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        RateLimitConfig::from_env(),
        metrics,
    ))
}
