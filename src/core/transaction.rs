use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use colored::Colorize;

pub type Amount = f64;

/// Caller-assigned identifier of a transaction. The store never
/// generates these and treats them as opaque strings.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: &str) -> TransactionId {
        TransactionId(id.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        TransactionId::new(id)
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        TransactionId(id)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single signed movement of money. Positive amounts are credits,
/// negative ones debits. The date is informational only.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Amount,
    pub date: DateTime<Utc>,
    pub title: String
}

impl Transaction {
    pub fn new(id: impl Into<TransactionId>, amount: Amount, date: DateTime<Utc>, title: &str) -> Transaction {
        Transaction {
            id: id.into(),
            amount,
            date,
            title: title.to_owned()
        }
    }

    /// Same as `new`, dated now.
    pub fn now(id: impl Into<TransactionId>, amount: Amount, title: &str) -> Transaction {
        Transaction::new(id, amount, Utc::now(), title)
    }

    pub fn is_credit(&self) -> bool {
        self.amount > 0.0
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}: {}",
            self.date.format("%Y-%m-%d %H:%M"),
            format!("[{}]", self.id).dimmed(),
            self.title.bold(),
            self.amount)
    }
}
