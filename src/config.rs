//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::catalog::model::Role;
use crate::error::ConfigError;

/// Default display name of the scripted assistant contact.
pub const DEFAULT_ASSISTANT_NAME: &str = "Buze AI Assistant";

/// Fixed text the scripted assistant answers with.
pub const DEFAULT_ASSISTANT_REPLY: &str = "That's a great question! Let me help you with that. \
    Based on your learning progress, I recommend focusing on practice problems \
    and reviewing the fundamentals.";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Display name of the assistant contact.
    pub assistant_name: String,
    /// Delay before the scripted assistant reply lands.
    pub assistant_reply_delay: Duration,
    /// Reply text used by the scripted assistant.
    pub assistant_reply: String,
    /// Lower bound of the tutor finder's default price range (USD/hour).
    pub price_min: Decimal,
    /// Upper bound of the tutor finder's default price range (USD/hour).
    pub price_max: Decimal,
    /// Optional fixture file replacing the embedded mock data.
    pub fixtures_path: Option<PathBuf>,
    /// Gate the wizard's primary action on step validation.
    pub validate_steps: bool,
    /// Which side of the marketplace the shell opens on.
    pub role: Role,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            assistant_reply_delay: Duration::from_millis(1000),
            assistant_reply: DEFAULT_ASSISTANT_REPLY.to_string(),
            price_min: dec!(20),
            price_max: dec!(100),
            fixtures_path: None,
            validate_steps: false,
            role: Role::Student,
        }
    }
}

impl AppConfig {
    /// Build configuration from `TUTOR_HUB_*` environment variables.
    ///
    /// Unparseable values fall back to their defaults; an inverted price range
    /// is rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let assistant_name = lookup("TUTOR_HUB_ASSISTANT_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.assistant_name);

        let assistant_reply_delay = lookup("TUTOR_HUB_REPLY_DELAY_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.assistant_reply_delay);

        let price_min = lookup("TUTOR_HUB_PRICE_MIN")
            .and_then(|s| s.parse::<Decimal>().ok())
            .unwrap_or(defaults.price_min);

        let price_max = lookup("TUTOR_HUB_PRICE_MAX")
            .and_then(|s| s.parse::<Decimal>().ok())
            .unwrap_or(defaults.price_max);

        if price_min > price_max {
            return Err(ConfigError::InvalidValue {
                key: "TUTOR_HUB_PRICE_MIN".to_string(),
                message: format!("{price_min} is above TUTOR_HUB_PRICE_MAX ({price_max})"),
            });
        }

        let fixtures_path = lookup("TUTOR_HUB_FIXTURES")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let validate_steps = lookup("TUTOR_HUB_VALIDATE_STEPS")
            .map(|s| s.trim().to_ascii_lowercase())
            .map(|s| matches!(s.as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.validate_steps);

        let role = lookup("TUTOR_HUB_ROLE")
            .and_then(|s| s.parse::<Role>().ok())
            .unwrap_or(defaults.role);

        Ok(Self {
            assistant_name,
            assistant_reply_delay,
            assistant_reply: defaults.assistant_reply,
            price_min,
            price_max,
            fixtures_path,
            validate_steps,
            role,
        })
    }
}
