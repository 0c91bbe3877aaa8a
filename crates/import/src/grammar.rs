use kassa_core::{RawMessage, Record};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::banks::{Sberbank, Vestabank, Vtb};
use crate::error::MessageError;

/// What every supported bank provides: a pre-parse filter, an ordered
/// grammar, and the vocabulary that marks an incoming credit.
pub trait Grammar: Send + Sync {
    fn accepts(&self, body: &str) -> bool;

    fn parse(&self, message: &RawMessage) -> Result<Record, MessageError>;

    /// Whether an operation of this kind may have been caused by a transfer.
    fn is_credit(&self, _kind: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Sberbank,
    Vestabank,
    Vtb,
}

impl Bank {
    pub const ALL: [Bank; 3] = [Bank::Sberbank, Bank::Vestabank, Bank::Vtb];

    pub fn grammar(self) -> &'static dyn Grammar {
        match self {
            Bank::Sberbank => &Sberbank,
            Bank::Vestabank => &Vestabank,
            Bank::Vtb => &Vtb,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Bank::Sberbank => "sberbank",
            Bank::Vestabank => "vestabank",
            Bank::Vtb => "vtb",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown bank: '{0}' (expected one of: sberbank, vestabank, vtb)")]
pub struct UnknownBank(pub String);

impl FromStr for Bank {
    type Err = UnknownBank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bank::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownBank(s.to_string()))
    }
}
