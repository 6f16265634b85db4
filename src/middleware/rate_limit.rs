use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use scholaris_core::AppError;
use tracing::warn;

use crate::metrics::track_rate_limited;
use crate::state::AppState;

/// Rejects with 429 once the caller's IP has drained its auth bucket.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = peer_ip(req.extensions().get::<ConnectInfo<SocketAddr>>());

    if state.auth_limiter.check_key(&ip).is_err() {
        warn!(client_ip = %ip, path = %req.uri().path(), "Auth rate limit exceeded");
        track_rate_limited();
        return Err(AppError::too_many_requests(
            "Too many requests, please try again later".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

/// The socket peer. Forwarding headers are client-controlled and never
/// consulted; without connect info every caller shares one bucket.
fn peer_ip(connect_info: Option<&ConnectInfo<SocketAddr>>) -> IpAddr {
    connect_info
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
