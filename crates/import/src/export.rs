use chrono::{DateTime, FixedOffset, NaiveDateTime};
use kassa_core::{Ledger, Money};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

pub const OPERATION_COLUMNS: [&str; 13] = [
    "Card",
    "Time",
    "Time inside SMS",
    "Operation",
    "Sum",
    "Currency",
    "Commission",
    "Comm. currency",
    "Balance",
    "Place",
    "Name",
    "Comment",
    "Time of transfer",
];

pub const TRANSFER_COLUMNS: [&str; 4] = ["Time", "Name", "Sum", "Comment"];

/// One row per card operation; the last three columns describe the matched
/// transfer and stay empty when there is none.
pub fn write_operations<W: Write>(writer: W, ledger: &Ledger) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(OPERATION_COLUMNS)?;

    for op in ledger.operations() {
        let transfer = ledger.matched_transfer(op);
        out.write_record([
            op.card.clone(),
            instant(&op.source_time),
            op.declared_time.as_ref().map(wall_clock).unwrap_or_default(),
            op.kind.clone(),
            op.amount.to_string(),
            op.currency.clone(),
            optional_money(op.fee),
            op.fee_currency.clone().unwrap_or_default(),
            optional_money(op.balance),
            op.place.clone().unwrap_or_default(),
            transfer.map(|t| t.counterparty.clone()).unwrap_or_default(),
            transfer.and_then(|t| t.comment.clone()).unwrap_or_default(),
            transfer.map(|t| instant(&t.source_time)).unwrap_or_default(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

pub fn write_transfers<W: Write>(writer: W, ledger: &Ledger) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(TRANSFER_COLUMNS)?;

    for t in ledger.transfers() {
        out.write_record([
            instant(&t.source_time),
            t.counterparty.clone(),
            t.amount.to_string(),
            t.comment.clone().unwrap_or_default(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

fn instant(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339()
}

fn wall_clock(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn optional_money(m: Option<Money>) -> String {
    m.map(|m| m.to_string()).unwrap_or_default()
}
