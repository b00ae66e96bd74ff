//! # daisy-runtime
//!
//! Transport implementations and configuration for the Daisy SDK.
//!
//! ## Transports
//!
//! - **HTTP** (default): reqwest with basic-auth, JSON bodies and timeouts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use daisy_runtime::{Credentials, DaisyConfig, HttpTransport};
//!
//! let transport = HttpTransport::with_config(
//!     Credentials::from_env()?,
//!     &DaisyConfig::from_env(),
//! )?;
//! ```

pub mod config;

#[cfg(feature = "http")]
pub mod http;

pub use config::{Credentials, DaisyConfig, DEFAULT_API_URL};

#[cfg(feature = "http")]
pub use http::HttpTransport;

// Re-export core types for convenience
pub use daisy_core::{ApiRequest, DaisyError, Method, Result, Transport};
