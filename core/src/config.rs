//! Process-wide client configuration.
//!
//! Read once when a `Dispatcher` is built and shared behind an `Arc`
//! afterwards; nothing mutates it while calls are in flight.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{StripeError, StripeResult};

pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct Config {
    /// Secret key sent as a Bearer credential.
    pub api_key: String,
    /// Default `Stripe-Version`. `None` uses the account's pinned version.
    pub api_version: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

// The API key must never reach logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_version: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load configuration from the environment.
    ///
    /// - `STRIPE_API_KEY` (required)
    /// - `STRIPE_API_VERSION`
    /// - `STRIPE_API_BASE`
    /// - `STRIPE_TIMEOUT_SECS`
    pub fn from_env() -> StripeResult<Self> {
        let api_key = env::var("STRIPE_API_KEY")
            .map_err(|_| StripeError::config("missing environment variable STRIPE_API_KEY"))?;

        let mut config = Self::new(api_key);
        if let Ok(version) = env::var("STRIPE_API_VERSION") {
            config = config.with_api_version(version);
        }
        if let Ok(base) = env::var("STRIPE_API_BASE") {
            config = config.with_base_url(base);
        }
        if let Ok(secs) = env::var("STRIPE_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| StripeError::config(format!("invalid STRIPE_TIMEOUT_SECS: {secs}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> StripeResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(StripeError::config("api_key cannot be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(StripeError::config(
                "base_url must start with http:// or https://",
            ));
        }
        if self.timeout.is_zero() {
            return Err(StripeError::config("timeout cannot be zero"));
        }
        Ok(())
    }
}
