//! Subscription Lookup
//!
//! A subscription is addressable by its Daisy ID or by its on-chain
//! subscription hash. The two keys map to different remote paths and are
//! never combined.

use serde::{Deserialize, Serialize};

use crate::error::{DaisyError, Result};

/// Key into the subscription resource space
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubscriptionLookup {
    /// Daisy ID
    ById(String),
    /// `subscriptionHash` in the blockchain
    ByHash(String),
}

impl SubscriptionLookup {
    pub fn by_id(id: impl Into<String>) -> Self {
        SubscriptionLookup::ById(id.into())
    }

    pub fn by_hash(hash: impl Into<String>) -> Self {
        SubscriptionLookup::ByHash(hash.into())
    }

    /// The lookup key, whichever kind it is
    pub fn key(&self) -> &str {
        match self {
            SubscriptionLookup::ById(key) | SubscriptionLookup::ByHash(key) => key,
        }
    }

    /// Checks the key is present and fits in a single path segment, so an
    /// ID can never address the hash resource (or vice versa).
    pub fn validate(&self) -> Result<()> {
        let key = self.key();
        if key.is_empty() {
            return Err(DaisyError::missing_arguments());
        }
        if key
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
        {
            return Err(DaisyError::Argument(format!("Invalid lookup key: {key}")));
        }
        Ok(())
    }

    /// Path of the subscription resource
    pub fn path(&self) -> String {
        match self {
            SubscriptionLookup::ById(id) => format!("/subscriptions/{id}/"),
            SubscriptionLookup::ByHash(hash) => format!("/subscriptions/hash/{hash}/"),
        }
    }

    /// Path of the receipts sub-resource
    pub fn receipts_path(&self) -> String {
        format!("{}receipts/", self.path())
    }
}

/// Optional-field lookup criteria, as received from untyped input.
///
/// Convert with `SubscriptionLookup::try_from`; an `id` wins over a hash.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCriteria {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub subscription_hash: Option<String>,
}

impl TryFrom<SubscriptionCriteria> for SubscriptionLookup {
    type Error = DaisyError;

    fn try_from(criteria: SubscriptionCriteria) -> Result<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        let lookup = if let Some(id) = present(criteria.id) {
            SubscriptionLookup::ById(id)
        } else if let Some(hash) = present(criteria.subscription_hash) {
            SubscriptionLookup::ByHash(hash)
        } else {
            return Err(DaisyError::missing_arguments());
        };
        lookup.validate()?;
        Ok(lookup)
    }
}

/// Filter for listing subscriptions
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountFilter {
    /// Subscriber Ethereum address
    #[serde(default)]
    pub account: Option<String>,
}

impl AccountFilter {
    pub fn account(account: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
        }
    }

    /// Query pairs; an absent account sends no parameter
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.account
            .iter()
            .map(|a| ("account".to_string(), a.clone()))
            .collect()
    }
}
