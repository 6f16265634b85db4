//! Rate limiting configuration for the authentication endpoints.
//!
//! Login and registration share one keyed token bucket per client IP:
//!
//! - `RATE_LIMIT_AUTH_PER_SECOND`: tokens replenished per second (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: bucket capacity (default: 5)
//!
//! Zero or unparsable values fall back to the defaults.

use std::net::IpAddr;
use std::num::NonZeroU32;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

const DEFAULT_AUTH_PER_SECOND: NonZeroU32 = NonZeroU32::new(10).unwrap();
const DEFAULT_AUTH_BURST_SIZE: NonZeroU32 = NonZeroU32::new(5).unwrap();

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub auth_per_second: NonZeroU32,
    pub auth_burst_size: NonZeroU32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth_per_second: DEFAULT_AUTH_PER_SECOND,
            auth_burst_size: DEFAULT_AUTH_BURST_SIZE,
        }
    }
}

fn env_non_zero(key: &str) -> Option<NonZeroU32> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .and_then(NonZeroU32::new)
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_per_second: env_non_zero("RATE_LIMIT_AUTH_PER_SECOND")
                .unwrap_or(defaults.auth_per_second),
            auth_burst_size: env_non_zero("RATE_LIMIT_AUTH_BURST_SIZE")
                .unwrap_or(defaults.auth_burst_size),
        }
    }

    pub fn auth_quota(&self) -> Quota {
        Quota::per_second(self.auth_per_second).allow_burst(self.auth_burst_size)
    }

    /// Builds the per-IP limiter shared by the auth routes.
    #[must_use]
    pub fn auth_limiter(&self) -> DefaultKeyedRateLimiter<IpAddr> {
        RateLimiter::keyed(self.auth_quota())
    }
}
