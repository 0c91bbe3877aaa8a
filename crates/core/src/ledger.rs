use serde::Serialize;

use super::record::{CardOperation, TransferId, TransferRecord};

/// The result of one run: card operations and transfers in input order.
///
/// A ledger is built once by [`Ledger::assemble`] and is read-only afterwards;
/// operations point at transfers through [`TransferId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ledger {
    operations: Vec<CardOperation>,
    transfers: Vec<TransferRecord>,
}

impl Ledger {
    pub fn assemble(operations: Vec<CardOperation>, transfers: Vec<TransferRecord>) -> Self {
        Ledger { operations, transfers }
    }

    pub fn operations(&self) -> &[CardOperation] {
        &self.operations
    }

    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    pub fn transfer(&self, id: TransferId) -> Option<&TransferRecord> {
        self.transfers.get(id.0)
    }

    pub fn matched_transfer(&self, op: &CardOperation) -> Option<&TransferRecord> {
        op.matched_transfer.and_then(|id| self.transfer(id))
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.transfers.is_empty()
    }
}
