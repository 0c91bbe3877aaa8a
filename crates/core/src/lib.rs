pub mod ledger;
pub mod message;
pub mod money;
pub mod record;

pub use ledger::Ledger;
pub use message::{parse_timestamp, RawMessage};
pub use money::{Money, MoneyError};
pub use record::{CardOperation, Record, TransferId, TransferRecord};
