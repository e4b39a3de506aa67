//! Session configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Session store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Storage key holding the raw token
    pub token_key: String,
    /// Storage key holding the serialized expiration time
    pub expiration_key: String,
    /// A restored session whose remaining validity in milliseconds is at or
    /// below this value is discarded at start-up.
    pub restore_threshold_ms: i64,
    /// Longest delay a single logout timer is armed for
    pub max_timer_delay_ms: i64,
    /// Token lifetime used when a caller logs in without an explicit expiration
    pub default_token_lifetime_minutes: i64,
}

impl SessionConfig {
    /// Storage key for the token
    pub const TOKEN_KEY: &'static str = "Token";

    /// Storage key for the expiration time
    pub const EXPIRATION_KEY: &'static str = "ExpirationTime";

    // Kept at the raw value the shell has always compared against, even
    // though the remaining time is measured in milliseconds.
    pub const RESTORE_THRESHOLD_MS: i64 = 3600;

    /// Browser timers overflow past a signed 32-bit millisecond delay
    pub const MAX_TIMER_DELAY_MS: i64 = i32::MAX as i64;

    pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 30;

    pub fn restore_threshold(&self) -> Duration {
        saturate(
            Duration::try_milliseconds(self.restore_threshold_ms),
            self.restore_threshold_ms,
        )
    }

    pub fn max_timer_delay(&self) -> Duration {
        let millis = self.max_timer_delay_ms.max(1);
        saturate(Duration::try_milliseconds(millis), millis)
    }

    pub fn default_token_lifetime(&self) -> Duration {
        saturate(
            Duration::try_minutes(self.default_token_lifetime_minutes),
            self.default_token_lifetime_minutes,
        )
    }
}

/// Out-of-range values clamp to the nearest representable duration
fn saturate(duration: Option<Duration>, raw: i64) -> Duration {
    duration.unwrap_or(if raw < 0 { Duration::MIN } else { Duration::MAX })
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: Self::TOKEN_KEY.to_string(),
            expiration_key: Self::EXPIRATION_KEY.to_string(),
            restore_threshold_ms: Self::RESTORE_THRESHOLD_MS,
            max_timer_delay_ms: Self::MAX_TIMER_DELAY_MS,
            default_token_lifetime_minutes: Self::DEFAULT_TOKEN_LIFETIME_MINUTES,
        }
    }
}
