//! VTB card notifications.
//!
//!   Karta *8741: Oplata 250.00 RUB;IP SOROKIN E.A. SMT;21.10.2018 17:05,dostupno 283.16 RUB
//!   Karta *8741: Vozvrat 250.00 RUB; dostupno 533.16 RUB.
//!   Oplata 250.00 RUB Karta*8741 MAGNIT Balans 283.16 RUB 17:05

use kassa_core::{CardOperation, RawMessage, Record};

use crate::builder::{first_match, Fields, Pattern};
use crate::error::MessageError;
use crate::filter::KeywordFilter;
use crate::grammar::Grammar;

const FILTER: KeywordFilter = KeywordFilter::CardScoped {
    indicators: &["карта", "karta"],
    denylist: &["nikomu ne", "vhod v", "вход в", "пароль"],
};

re!(re_purchase,
    r"^Karta \*([0-9]+?): (.+?) ([0-9.]+) (.+?);(.+?);(.+)[,;] ?dostupno ([0-9.]+) ([^.]+)(?:\(.+\))?\.?$");
re!(re_refund,
    r"^Karta \*([0-9]+?): (.+?) ([0-9.]+) (.+?); ?dostupno ([0-9.]+) ([^.]+).*$");
re!(re_notification,
    r"^(.+?) ([0-9.]+)(.+?) (?:Karta|Карта)\*(.+?) (.+?) (?:Balans|Баланс) ([0-9.]+)(.+?) ([0-9]+:[0-9]+)");

static PATTERNS: &[Pattern] = &[
    Pattern { name: "purchase", regex: re_purchase, build: purchase },
    Pattern { name: "refund", regex: re_refund, build: refund },
    Pattern { name: "notification", regex: re_notification, build: notification },
];

pub struct Vtb;

impl Grammar for Vtb {
    fn accepts(&self, body: &str) -> bool {
        FILTER.accepts(body)
    }

    fn parse(&self, message: &RawMessage) -> Result<Record, MessageError> {
        first_match(PATTERNS, message)
    }
}

fn purchase(f: &Fields<'_>) -> Result<Record, MessageError> {
    Ok(CardOperation {
        source_time: f.message().timestamp,
        declared_time: Some(f.declared_time(6)?),
        card: f.text(1),
        kind: f.text(2),
        amount: f.amount(3, "amount")?,
        currency: f.text(4),
        fee: None,
        fee_currency: None,
        place: f.opt_text(5),
        balance: Some(f.amount(7, "balance")?),
        matched_transfer: None,
    }
    .into())
}

/// Refunds and other deposits carry neither place nor time.
fn refund(f: &Fields<'_>) -> Result<Record, MessageError> {
    Ok(CardOperation {
        source_time: f.message().timestamp,
        declared_time: None,
        card: f.text(1),
        kind: f.text(2),
        amount: f.amount(3, "amount")?,
        currency: f.text(4),
        fee: None,
        fee_currency: None,
        place: None,
        balance: Some(f.amount(5, "balance")?),
        matched_transfer: None,
    }
    .into())
}

fn notification(f: &Fields<'_>) -> Result<Record, MessageError> {
    Ok(CardOperation {
        source_time: f.message().timestamp,
        declared_time: Some(f.declared_time(8)?),
        card: f.text(4),
        kind: f.text(1),
        amount: f.amount(2, "amount")?,
        currency: f.text(3),
        fee: None,
        fee_currency: None,
        place: f.opt_text(5),
        balance: Some(f.amount(6, "balance")?),
        matched_transfer: None,
    }
    .into())
}
