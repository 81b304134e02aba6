use crate::{sha256, Hash};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A transfer of `amount` from one identifier to another. Immutable once built.
///
/// `from` is `None` only for rewards minted by the chain itself, so a reward
/// can never be mistaken for a debit of a real address. The amount is stored
/// as given; a negative amount moves value from `to` back to `from`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    from: Option<String>,
    to: String,
    amount: i64,
}

impl Transaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: i64) -> Self {
        Self {
            from: Some(from.into()),
            to: to.into(),
            amount,
        }
    }

    pub fn reward(to: impl Into<String>, amount: i64) -> Self {
        Self {
            from: None,
            to: to.into(),
            amount,
        }
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn is_reward(&self) -> bool {
        self.from.is_none()
    }

    /// Compact JSON with sorted keys, e.g. `{"amount":10,"from":"Alice","to":"Bob"}`.
    pub fn canonical_json(&self) -> String {
        // Built by hand so key order does not depend on serde_json's map features.
        let from = match &self.from {
            Some(from) => Value::String(from.clone()),
            None => Value::Null,
        };
        format!(
            r#"{{"amount":{},"from":{},"to":{}}}"#,
            self.amount,
            from,
            Value::String(self.to.clone())
        )
    }

    /// Merkle leaf for this transaction.
    pub fn leaf_hash(&self) -> Hash {
        sha256(self.canonical_json().as_bytes())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction(from={}, to={}, amount={})",
            self.from.as_deref().unwrap_or("None"),
            self.to,
            self.amount
        )
    }
}
