//! Bank SMS extraction: keyword filters, per-bank grammars, transfer
//! reconciliation and ledger export.

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static regex::Regex {
            static R: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            R.get_or_init(|| regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub mod banks;
pub mod builder;
pub mod error;
pub mod export;
pub mod filter;
pub mod grammar;
pub mod pipeline;
pub mod reconcile;

pub use error::MessageError;
pub use export::{write_operations, write_transfers, ExportError};
pub use filter::KeywordFilter;
pub use grammar::{Bank, Grammar, UnknownBank};
pub use pipeline::{process, ProcessOptions, ProcessOutcome, ProcessStats, Rejected};
pub use reconcile::{find_best_transfer, reconcile, MatchPolicy, TransferMatch, UnknownPolicy, MATCH_WINDOW_SECS};
