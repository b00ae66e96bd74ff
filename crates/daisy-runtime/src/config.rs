//! Client Configuration
//!
//! Credentials and endpoint settings, loaded from the environment the same
//! way for every Daisy client.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use daisy_core::{DaisyError, Result};

/// Default Daisy SDK endpoint
pub const DEFAULT_API_URL: &str = "https://sdk.daisypayments.com";

/// Per-merchant basic-auth credentials.
///
/// The secret key must stay on the server; it is redacted from `Debug`.
#[derive(Clone)]
pub struct Credentials {
    /// `DAISY_ID` from the Daisy Dashboard
    pub identifier: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Subscription manager credentials (`DAISY_ID`, `DAISY_SECRET_KEY`)
    pub fn from_env() -> Result<Self> {
        Self::from_env_vars("DAISY_ID", "DAISY_SECRET_KEY")
    }

    /// Credentials from a pair of environment variable names
    pub fn from_env_vars(identifier_var: &str, secret_var: &str) -> Result<Self> {
        Self::from_lookup(identifier_var, secret_var, |k| std::env::var(k).ok())
    }

    fn from_lookup(
        identifier_var: &str,
        secret_var: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let identifier = lookup(identifier_var)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DaisyError::Config(format!("{identifier_var} not set")))?;
        let secret_key = lookup(secret_var)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DaisyError::Config(format!("{secret_var} not set")))?;

        Ok(Self::new(identifier, secret_key))
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Endpoint and timeout settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaisyConfig {
    /// Base URL of the manager's resources
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_api_url() -> String { DEFAULT_API_URL.into() }
fn default_timeout_secs() -> u64 { 30 }
fn default_connect_timeout_secs() -> u64 { 10 }

impl Default for DaisyConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DaisyConfig {
    /// Read `DAISY_API_URL`, `DAISY_TIMEOUT_SECS` and `DAISY_CONNECT_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            base_url: lookup("DAISY_API_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.base_url),
            timeout_secs: lookup("DAISY_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            connect_timeout_secs: lookup("DAISY_CONNECT_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connect_timeout_secs),
        }
    }

    /// Point at another endpoint (development servers, mocks)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
