use kassa_core::{Ledger, RawMessage, Record};
use serde::Serialize;

use crate::error::MessageError;
use crate::grammar::Bank;
use crate::reconcile::{reconcile, MatchPolicy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Report messages that no grammar recognized.
    pub warn_unrecognized: bool,
    pub match_policy: MatchPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub total: usize,
    pub filtered: usize,
    pub operations: usize,
    pub transfers: usize,
    pub unrecognized: usize,
    pub failed: usize,
    pub matched: usize,
}

/// A message that was reported and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub message: RawMessage,
    pub error: MessageError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub ledger: Ledger,
    pub stats: ProcessStats,
    /// Conversion failures, plus unrecognized messages when
    /// [`ProcessOptions::warn_unrecognized`] is set.
    pub rejected: Vec<Rejected>,
}

/// Runs the whole batch: filter and parse every message, then link credit
/// operations to transfers, then assemble the ledger. A bad message is
/// reported and skipped; the batch always completes.
pub fn process(bank: Bank, messages: &[RawMessage], options: &ProcessOptions) -> ProcessOutcome {
    let grammar = bank.grammar();
    let mut stats = ProcessStats { total: messages.len(), ..Default::default() };
    let mut rejected = Vec::new();
    let mut operations = Vec::new();
    let mut transfers = Vec::new();

    // Phase 1: parse everything. A credit may precede its transfer in the input.
    for message in messages {
        if !grammar.accepts(&message.body) {
            stats.filtered += 1;
            continue;
        }

        match grammar.parse(message) {
            Ok(Record::Operation(op)) => operations.push(op),
            Ok(Record::Transfer(t)) => transfers.push(t),
            Err(MessageError::Unrecognized) => {
                stats.unrecognized += 1;
                if options.warn_unrecognized {
                    tracing::warn!(time = %message.timestamp, body = %message.body, "unknown transaction");
                    rejected.push(Rejected { message: message.clone(), error: MessageError::Unrecognized });
                }
            }
            Err(error) => {
                stats.failed += 1;
                tracing::error!(time = %message.timestamp, body = %message.body, "unable to process: {error}");
                rejected.push(Rejected { message: message.clone(), error });
            }
        }
    }

    // Phase 2: reconcile against the complete transfer list.
    stats.matched = reconcile(&mut operations, &transfers, |kind| grammar.is_credit(kind), options.match_policy);
    stats.operations = operations.len();
    stats.transfers = transfers.len();

    tracing::info!(
        bank = %bank,
        total = stats.total,
        filtered = stats.filtered,
        operations = stats.operations,
        transfers = stats.transfers,
        unrecognized = stats.unrecognized,
        failed = stats.failed,
        matched = stats.matched,
        "messages processed"
    );

    ProcessOutcome {
        ledger: Ledger::assemble(operations, transfers),
        stats,
        rejected,
    }
}
