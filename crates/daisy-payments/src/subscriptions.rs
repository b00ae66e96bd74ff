//! Subscription Resource Client
//!
//! Reads the subscription manager and its plans, resolves subscriptions and
//! receipts by ID or on-chain hash, and validates agreements before creating
//! new subscriptions.

use std::sync::Arc;

use daisy_core::{
    AccountFilter, ApiRequest, DaisyError, Receipt, Result, SubmitRequest, Subscription,
    SubscriptionLookup, SubscriptionManager, Transport,
};
use serde_json::Value;

#[cfg(feature = "http")]
use daisy_runtime::{Credentials, DaisyConfig, HttpTransport};

use crate::unwrap_data;

/// Client for a subscription manager deployed from the Daisy Dashboard
#[derive(Clone)]
pub struct SubscriptionClient {
    transport: Arc<dyn Transport>,
}

impl SubscriptionClient {
    /// Create a client over any transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create an HTTP client for the manager identified by `credentials`
    #[cfg(feature = "http")]
    pub fn connect(credentials: Credentials, config: &DaisyConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::with_config(credentials, config)?)))
    }

    /// Create from `DAISY_ID`, `DAISY_SECRET_KEY` and `DAISY_API_URL`
    #[cfg(feature = "http")]
    pub fn from_env() -> Result<Self> {
        Self::connect(Credentials::from_env()?, &DaisyConfig::from_env())
    }

    /// Get the subscription manager together with its plans
    pub async fn fetch_manager(&self) -> Result<SubscriptionManager> {
        let body = self.transport.send(ApiRequest::get("/")).await?;
        unwrap_data(body)
    }

    #[deprecated(note = "renamed to `fetch_manager`")]
    pub async fn get_plans(&self) -> Result<SubscriptionManager> {
        self.fetch_manager().await
    }

    /// List subscriptions, filtered server-side
    pub async fn list_subscriptions(&self, filter: &AccountFilter) -> Result<Vec<Subscription>> {
        let request = ApiRequest::get("/subscriptions/").with_query(filter.to_query());
        let body = self.transport.send(request).await?;
        unwrap_data(body)
    }

    /// Get a single subscription by ID or subscription hash
    pub async fn get_subscription(
        &self,
        lookup: &SubscriptionLookup,
    ) -> Result<Option<Subscription>> {
        lookup.validate()?;
        let body = self.transport.send(ApiRequest::get(lookup.path())).await?;
        unwrap_data(body)
    }

    /// Get the billing receipts of a subscription
    pub async fn get_receipts(&self, lookup: &SubscriptionLookup) -> Result<Vec<Receipt>> {
        lookup.validate()?;
        let body = self
            .transport
            .send(ApiRequest::get(lookup.receipts_path()))
            .await?;
        unwrap_data(body)
    }

    /// Create a subscription from a signed agreement.
    ///
    /// The manager is fetched fresh and the agreement's plan must be one of
    /// its plans, otherwise nothing is written. Returns the raw response
    /// body, undecoded: once the write is sent, a body of unexpected shape
    /// must not turn into an error. The new subscription starts out `PENDING`.
    pub async fn submit(&self, request: SubmitRequest) -> Result<Value> {
        let manager = self.fetch_manager().await?;

        let Some(plan) = manager.find_plan(&request.agreement.plan) else {
            tracing::warn!(plan = %request.agreement.plan, "Agreement references unknown plan");
            return Err(DaisyError::PlanNotFound(request.agreement.plan));
        };

        if plan.requires_authorization() && request.auth_signature.is_none() {
            tracing::warn!(
                plan = %request.agreement.plan,
                "Private plan submitted without authSignature"
            );
        }

        let body = self
            .transport
            .send(ApiRequest::post("/subscriptions/", &request)?)
            .await?;

        tracing::info!(
            subscription_id = body["data"]["id"].as_str().unwrap_or("-"),
            state = body["data"]["state"].as_str().unwrap_or("-"),
            "Submitted subscription"
        );

        Ok(body)
    }
}
