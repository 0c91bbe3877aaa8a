use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Position of a transfer inside its ledger's transfer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferId(pub usize);

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A card operation notification: purchase, withdrawal, refund, credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOperation {
    /// When the notification was received.
    pub source_time: DateTime<FixedOffset>,
    /// Wall-clock time written inside the message text, if any.
    pub declared_time: Option<NaiveDateTime>,
    pub card: String,
    /// Bank vocabulary, e.g. `покупка`, `зачисление`, `Oplata`.
    pub kind: String,
    pub amount: Money,
    pub currency: String,
    pub fee: Option<Money>,
    pub fee_currency: Option<String>,
    pub place: Option<String>,
    pub balance: Option<Money>,
    /// Set by reconciliation for credit operations only.
    pub matched_transfer: Option<TransferId>,
}

/// A peer-to-peer transfer notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub source_time: DateTime<FixedOffset>,
    pub counterparty: String,
    pub amount: Money,
    pub currency: String,
    pub comment: Option<String>,
}

/// What a single message turns into once a grammar recognized it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Operation(CardOperation),
    Transfer(TransferRecord),
}

impl From<CardOperation> for Record {
    fn from(op: CardOperation) -> Self {
        Record::Operation(op)
    }
}

impl From<TransferRecord> for Record {
    fn from(t: TransferRecord) -> Self {
        Record::Transfer(t)
    }
}
