//! Sberbank "900" notifications.
//!
//!   VISA8413 05.03.17 14:20 покупка 500р MAGNIT Баланс: 12000.50р
//!   VISA8413 05.03.17 оплата Мобильного банка за 05/03/2017-04/04/2017 60р Баланс: 1000.00р
//!   Сбербанк Онлайн. ИВАН ИВАНОВИЧ И. перевел(а) Вам 1000.00 RUB. Сообщение: "за обед"
//!   VISA8413 10:15 перевод 1000р от отправителя ПЕТР ПЕТРОВИЧ П. Сообщение: "долг"

use kassa_core::{CardOperation, RawMessage, Record, TransferRecord};

use crate::builder::{first_match, Fields, Pattern};
use crate::error::MessageError;
use crate::filter::KeywordFilter;
use crate::grammar::Grammar;

const FILTER: KeywordFilter = KeywordFilter::Denylist(&["пароль", "вход в сбербанк"]);

/// Kinds that mark an incoming credit, compared case-insensitively.
const CREDIT: &[&str] = &["зачисление", "credit"];

re!(re_purchase,
    r#"^(?:(?:Card|Карта) )?(.+?) ((?:[0-9]+\.[0-9]+\.[0-9]+ )?[0-9]+:[0-9]+) (.+?) ([0-9]+(?:\.[0-9]+)*)(.+?)(?: с комиссией ([0-9]+(?:\.[0-9]+)*)(.+?))?( .+)? (?:Баланс|Balance): ([0-9]+(?:\.[0-9]+)*).*"#);
re!(re_mobile_bank,
    r#"^(?:(?:Card|Карта) )?(.+?) ([0-9]+\.[0-9]+\.[0-9]+) (.+) ([0-9]+(?:\.[0-9]+)*)(.+?) (?:Баланс|Balance): ([0-9]+(?:\.[0-9]+)*).*"#);
re!(re_online_transfer,
    r#"^Сбербанк Онлайн\. (.+?) перевел(?:.+?) ([0-9]+(?:\.[0-9]+)*) ([^ .]+)\.?(?: Сообщение: "?([^"]+)"?)?"#);
re!(re_incoming_transfer,
    r#"^(.+?):? ([0-9.:]+) (.+) ([0-9]+(?:\.[0-9]+)*)(.+?)\.? от отправителя (.+)(?: Сообщение: "?([^"]+)"?)"#);
re!(re_incoming_transfer_short,
    r#"^(.+?) ([0-9.:]+) (.+) ([0-9]+(?:\.[0-9]+)*)(.+?)\.? от отправителя (.+)"#);

static PATTERNS: &[Pattern] = &[
    Pattern { name: "purchase", regex: re_purchase, build: purchase },
    Pattern { name: "mobile_bank", regex: re_mobile_bank, build: mobile_bank },
    Pattern { name: "online_transfer", regex: re_online_transfer, build: online_transfer },
    Pattern { name: "incoming_transfer", regex: re_incoming_transfer, build: incoming_transfer },
    Pattern { name: "incoming_transfer_short", regex: re_incoming_transfer_short, build: incoming_transfer_short },
];

pub struct Sberbank;

impl Grammar for Sberbank {
    fn accepts(&self, body: &str) -> bool {
        FILTER.accepts(body)
    }

    fn parse(&self, message: &RawMessage) -> Result<Record, MessageError> {
        first_match(PATTERNS, message)
    }

    fn is_credit(&self, kind: &str) -> bool {
        let kind = kind.trim().to_lowercase();
        CREDIT.contains(&kind.as_str())
    }
}

/// Purchases, ATM operations and other card incomes and expenses.
fn purchase(f: &Fields<'_>) -> Result<Record, MessageError> {
    Ok(CardOperation {
        source_time: f.message().timestamp,
        declared_time: Some(f.declared_time(2)?),
        card: f.text(1),
        kind: f.text(3),
        amount: f.amount(4, "amount")?,
        currency: f.text(5),
        fee: f.opt_amount(6, "fee")?,
        fee_currency: f.opt_text(7),
        place: f.opt_text(8),
        balance: Some(f.amount(9, "balance")?),
        matched_transfer: None,
    }
    .into())
}

/// Charges initiated by the bank itself, dated but without a clock time.
fn mobile_bank(f: &Fields<'_>) -> Result<Record, MessageError> {
    Ok(CardOperation {
        source_time: f.message().timestamp,
        declared_time: Some(f.declared_time(2)?),
        card: f.text(1),
        kind: f.text(3),
        amount: f.amount(4, "amount")?,
        currency: f.text(5),
        fee: None,
        fee_currency: None,
        place: None,
        balance: Some(f.amount(6, "balance")?),
        matched_transfer: None,
    }
    .into())
}

fn online_transfer(f: &Fields<'_>) -> Result<Record, MessageError> {
    Ok(TransferRecord {
        source_time: f.message().timestamp,
        counterparty: f.text(1),
        amount: f.amount(2, "amount")?,
        currency: f.text(3),
        comment: f.opt_text(4),
    }
    .into())
}

fn incoming_transfer(f: &Fields<'_>) -> Result<Record, MessageError> {
    Ok(TransferRecord {
        source_time: f.message().timestamp,
        counterparty: f.text(6),
        amount: f.amount(4, "amount")?,
        currency: f.text(5),
        comment: f.opt_text(7),
    }
    .into())
}

fn incoming_transfer_short(f: &Fields<'_>) -> Result<Record, MessageError> {
    Ok(TransferRecord {
        source_time: f.message().timestamp,
        counterparty: f.text(6),
        amount: f.amount(4, "amount")?,
        currency: f.text(5),
        comment: None,
    }
    .into())
}
