//! Application State

use std::sync::Arc;

use daisy_payments::{PaymentsClient, SubscriptionClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Subscription manager client
    pub subscriptions: Arc<SubscriptionClient>,

    /// One-time-payment client (optional - None if not configured)
    pub payments: Option<Arc<PaymentsClient>>,
}
