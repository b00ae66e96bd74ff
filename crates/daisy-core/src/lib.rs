//! # daisy-core
//!
//! Core types for the Daisy SDK: the wire data model, the error taxonomy and
//! the transport capability every resource client is composed with.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  SubscriptionClient  │   │    PaymentsClient    │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            │   Arc<dyn Transport>     │
//!            └────────────┬─────────────┘
//!              ┌──────────▼──────────┐
//!              │  Transport (trait)  │  HttpTransport / MockTransport
//!              └─────────────────────┘
//! ```

pub mod error;
pub mod lookup;
pub mod model;
pub mod transport;

pub use error::{DaisyError, Result};
pub use lookup::{AccountFilter, SubscriptionCriteria, SubscriptionLookup};
pub use model::{
    Agreement, DeploymentState, Envelope, Invoice, InvoiceParams, PeriodUnit, Plan, Receipt,
    SubmitRequest, Subscription, SubscriptionManager, SubscriptionState, ZERO_ADDRESS,
};
pub use transport::{ApiRequest, Method, MockTransport, Transport};
