//! Domain Models
//!
//! Wire types for the Daisy billing service. Field names follow the service's
//! camelCase JSON; enum values are SCREAMING_SNAKE_CASE. Token prices use
//! `rust_decimal` - never f64 for money.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The all-zero Ethereum address, used by the service for "no address".
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Response wrapper: every successful body carries its payload under `data`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Deployment lifecycle shared by managers and plans
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentState {
    Draft,
    Pending,
    Deployed,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Unit of a plan's billing period
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodUnit {
    Days,
    Weeks,
    Months,
    Years,
    #[serde(other)]
    Unknown,
}

/// A billing plan offered by a subscription manager
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Daisy ID
    pub id: String,

    /// Plan ID registered on-chain (absent until deployed)
    #[serde(default)]
    pub on_chain_id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Price in token units
    #[serde(default)]
    pub price: Option<Decimal>,

    /// Number of `period_unit`s between bill cycles
    #[serde(default)]
    pub period: Option<u32>,

    #[serde(default)]
    pub period_unit: Option<PeriodUnit>,

    /// How many times the plan is executed
    #[serde(default, deserialize_with = "string_or_number")]
    pub max_executions: Option<String>,

    /// Private plans require a signature from the manager's authorizer
    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub state: DeploymentState,

    #[serde(default)]
    pub tx_hash: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Plan {
    /// Private plans need an `authSignature` on submit
    pub fn requires_authorization(&self) -> bool {
        self.private
    }

    /// Plan is enabled and deployed on-chain
    pub fn is_subscribable(&self) -> bool {
        self.active && self.state == DeploymentState::Deployed
    }
}

/// Merchant-level billing contract context
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionManager {
    #[serde(default)]
    pub name: String,

    /// Where billed tokens are transferred
    #[serde(default)]
    pub wallet: Option<String>,

    /// Address allowed to edit data and plans
    #[serde(default)]
    pub publisher: Option<String>,

    /// ERC20 token address
    #[serde(default)]
    pub token_address: Option<String>,

    #[serde(default)]
    pub deployed_at: Option<DateTime<Utc>>,

    /// Contract address
    #[serde(default)]
    pub address: Option<String>,

    /// Signs authorizations for private plans
    #[serde(default)]
    pub authorizer: Option<String>,

    #[serde(default)]
    pub tx_hash: Option<String>,

    #[serde(default)]
    pub state: DeploymentState,

    /// DAISY_ID
    #[serde(default)]
    pub identifier: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub plans: Vec<Plan>,
}

impl SubscriptionManager {
    /// First plan whose on-chain id matches
    pub fn find_plan(&self, on_chain_id: &str) -> Option<&Plan> {
        self.plans
            .iter()
            .find(|p| p.on_chain_id.as_deref() == Some(on_chain_id))
    }

    /// Whether an authorizer address is configured
    pub fn has_authorizer(&self) -> bool {
        self.authorizer
            .as_deref()
            .is_some_and(|a| !a.is_empty() && !a.eq_ignore_ascii_case(ZERO_ADDRESS))
    }
}

/// Subscription lifecycle, owned by the remote service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionState {
    NotStarted,
    Pending,
    Created,
    Active,
    ActiveCancelled,
    Cancelled,
    Expired,
    Invalid,
    NotEnoughFunds,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SubscriptionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubscriptionState::NotStarted | SubscriptionState::Pending)
    }

    /// Billing still runs (cancelled-but-active runs until period end)
    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionState::Active | SubscriptionState::ActiveCancelled)
    }

    /// No further transitions are expected
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubscriptionState::Cancelled
                | SubscriptionState::Expired
                | SubscriptionState::Invalid
                | SubscriptionState::Failed
        )
    }
}

/// A user's binding to a plan
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,

    #[serde(default)]
    pub state: SubscriptionState,

    /// Identifier in the blockchain
    #[serde(default)]
    pub subscription_hash: Option<String>,

    /// Subscriber address
    #[serde(default)]
    pub account: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Remaining service-defined fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One billing-cycle execution
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,

    #[serde(default)]
    pub tx_hash: Option<String>,

    /// What happened in this billing cycle
    #[serde(default)]
    pub action: String,

    #[serde(default)]
    pub next_payment: Option<DateTime<Utc>>,

    /// Error message when the cycle failed
    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Signed agreement produced by the browser signing step.
///
/// Only `plan` is read here; everything else passes through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    /// On-chain plan id
    pub plan: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Agreement {
    pub fn new(plan: impl Into<String>) -> Self {
        Self {
            plan: plan.into(),
            fields: Map::new(),
        }
    }
}

/// Input for creating a subscription
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub agreement: Agreement,

    /// Token approval receipt
    #[serde(default)]
    pub receipt: Value,

    pub signature: String,

    /// Authorizer signature, needed for private plans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_signature: Option<String>,
}

/// Input for a one-time-payment invoice.
///
/// Absent optional fields are omitted from the request body.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceParams {
    /// Required; forwarded verbatim (token units)
    #[serde(default, deserialize_with = "string_or_number_or_empty")]
    pub invoiced_price: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoiced_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoiced_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoiced_detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

impl InvoiceParams {
    pub fn new(invoiced_price: impl Into<String>) -> Self {
        Self {
            invoiced_price: invoiced_price.into(),
            ..Default::default()
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.invoiced_email = Some(email.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.invoiced_name = Some(name.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.invoiced_detail = Some(detail.into());
        self
    }

    pub fn token_address(mut self, address: impl Into<String>) -> Self {
        self.token_address = Some(address.into());
        self
    }

    pub fn wallet_address(mut self, address: impl Into<String>) -> Self {
        self.wallet_address = Some(address.into());
        self
    }
}

/// A created one-time-payment invoice
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub invoiced_price: Option<String>,

    #[serde(default)]
    pub invoiced_email: Option<String>,

    #[serde(default)]
    pub invoiced_name: Option<String>,

    #[serde(default)]
    pub invoiced_detail: Option<String>,

    #[serde(default)]
    pub token_address: Option<String>,

    #[serde(default)]
    pub wallet_address: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accepts `"12"` or `12` (the service is not consistent)
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn string_or_number_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_number(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn manager_json() -> Value {
        json!({
            "name": "Margarita",
            "wallet": "0x1111111111111111111111111111111111111111",
            "authorizer": ZERO_ADDRESS,
            "state": "DEPLOYED",
            "identifier": "margarita",
            "createdAt": "2019-06-01T12:00:00.000Z",
            "plans": [
                {
                    "id": "plan-1",
                    "onChainId": "P1",
                    "name": "Basic",
                    "price": "10.5",
                    "period": 1,
                    "periodUnit": "MONTHS",
                    "maxExecutions": 12,
                    "private": false,
                    "active": true,
                    "state": "DEPLOYED"
                },
                {
                    "id": "plan-2",
                    "onChainId": null,
                    "name": "Draft",
                    "state": "DRAFT"
                }
            ]
        })
    }

    #[test]
    fn test_manager_decodes_with_plans() {
        let manager: SubscriptionManager = serde_json::from_value(manager_json()).unwrap();
        assert_eq!(manager.identifier, "margarita");
        assert_eq!(manager.state, DeploymentState::Deployed);
        assert_eq!(manager.plans.len(), 2);

        let basic = &manager.plans[0];
        assert_eq!(basic.price, Some(dec!(10.5)));
        assert_eq!(basic.period_unit, Some(PeriodUnit::Months));
        assert_eq!(basic.max_executions.as_deref(), Some("12"));
        assert!(basic.is_subscribable());
        assert!(!manager.plans[1].is_subscribable());
    }

    #[test]
    fn test_find_plan_first_match() {
        let mut manager: SubscriptionManager = serde_json::from_value(manager_json()).unwrap();
        let mut duplicate = manager.plans[0].clone();
        duplicate.id = "plan-dup".into();
        manager.plans.push(duplicate);

        assert_eq!(manager.find_plan("P1").map(|p| p.id.as_str()), Some("plan-1"));
        assert!(manager.find_plan("P2").is_none());
    }

    #[test]
    fn test_zero_authorizer_is_not_configured() {
        let mut manager: SubscriptionManager = serde_json::from_value(manager_json()).unwrap();
        assert!(!manager.has_authorizer());

        manager.authorizer = Some("0x2222222222222222222222222222222222222222".into());
        assert!(manager.has_authorizer());
    }

    #[test]
    fn test_unknown_states_fall_back() {
        let sub: Subscription = serde_json::from_value(json!({
            "id": "sub-1",
            "state": "SOMETHING_NEW",
            "subscriptionHash": "0xabc",
            "plan": "plan-1"
        }))
        .unwrap();
        assert_eq!(sub.state, SubscriptionState::Unknown);
        assert_eq!(sub.extra.get("plan"), Some(&json!("plan-1")));
    }

    #[test]
    fn test_subscription_state_classes() {
        assert!(SubscriptionState::Pending.is_pending());
        assert!(SubscriptionState::ActiveCancelled.is_active());
        assert!(SubscriptionState::Expired.is_terminal());
        assert!(!SubscriptionState::NotEnoughFunds.is_terminal());
    }

    #[test]
    fn test_agreement_keeps_signed_fields() {
        let agreement: Agreement = serde_json::from_value(json!({
            "plan": "P1",
            "subscriber": "0xabc",
            "nonce": "7"
        }))
        .unwrap();
        assert_eq!(agreement.plan, "P1");

        let back = serde_json::to_value(&agreement).unwrap();
        assert_eq!(back["subscriber"], "0xabc");
        assert_eq!(back["nonce"], "7");
    }

    #[test]
    fn test_invoice_params_omit_absent_fields() {
        let params = InvoiceParams::new("100").email("buyer@example.com");
        let body = serde_json::to_value(&params).unwrap();

        assert_eq!(body, json!({ "invoicedPrice": "100", "invoicedEmail": "buyer@example.com" }));
    }

    #[test]
    fn test_submit_request_omits_missing_auth_signature() {
        let request = SubmitRequest {
            agreement: Agreement::new("P1"),
            receipt: json!("r"),
            signature: "s".into(),
            auth_signature: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("authSignature").is_none());
        assert_eq!(body["agreement"]["plan"], "P1");
    }

    #[test]
    fn test_invoice_params_accept_numeric_price() {
        let params: InvoiceParams =
            serde_json::from_value(json!({ "invoicedPrice": 100, "invoicedName": "Jane" }))
                .unwrap();
        assert_eq!(params.invoiced_price, "100");

        let params: InvoiceParams = serde_json::from_value(json!({ "invoicedPrice": "2.5" })).unwrap();
        assert_eq!(params.invoiced_price, "2.5");

        let params: InvoiceParams = serde_json::from_value(json!({ "invoicedPrice": null })).unwrap();
        assert!(params.invoiced_price.is_empty());
    }
}
