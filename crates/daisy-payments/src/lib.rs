//! # daisy-payments
//!
//! Server-side clients for the Daisy billing service.
//!
//! ## Subscription flow
//!
//! ```text
//! ┌─────────────┐  agreement +   ┌──────────────────┐  GET /          ┌─────────┐
//! │   Browser   │  signature     │  Your server     │────────────────▶│  Daisy  │
//! │  (signing)  │───────────────▶│  SubscriptionCli │  plan check     │         │
//! └─────────────┘                │                  │  POST /subs/    │         │
//!                                └──────────────────┘────────────────▶└─────────┘
//! ```
//!
//! The browser signs an agreement for one of the manager's plans; the server
//! submits it. Before writing, the client re-reads the manager and refuses
//! agreements whose plan the manager does not expose.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use daisy_payments::{SubscriptionClient, PaymentsClient};
//! use daisy_core::{InvoiceParams, SubscriptionLookup};
//!
//! let subscriptions = SubscriptionClient::from_env()?;
//! let manager = subscriptions.fetch_manager().await?;
//!
//! let receipts = subscriptions
//!     .get_receipts(&SubscriptionLookup::by_hash("0x..."))
//!     .await?;
//!
//! let invoice = payments
//!     .create_invoice(&InvoiceParams::new("100").email("buyer@example.com"))
//!     .await?;
//! ```

mod invoice;
mod subscriptions;

pub use invoice::PaymentsClient;
pub use subscriptions::SubscriptionClient;

pub use daisy_core::{DaisyError, Result};

use serde::de::DeserializeOwned;
use serde_json::Value;

use daisy_core::Envelope;

/// Strip the `data` envelope from a response body
fn unwrap_data<T: DeserializeOwned>(body: Value) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_value(body)?;
    Ok(envelope.into_inner())
}
