//! Vestabank card notifications, Cyrillic or transliterated:
//!
//!   Karta 1234: 05.03.2017 14:20, Pokupka 500.00 RUB. MAGNIT. Dostupno 12000.00 RUB.
//!   Карта 1234: 05.03.2017 14:20, Снятие 3000.00 RUB, комиссия D30.00 RUB. ATM 17. Доступно 9000.00 RUB.

use kassa_core::{CardOperation, RawMessage, Record};

use crate::builder::{first_match, Fields, Pattern};
use crate::error::MessageError;
use crate::filter::KeywordFilter;
use crate::grammar::Grammar;

const FILTER: KeywordFilter = KeywordFilter::CardScoped {
    indicators: &["карта", "karta"],
    denylist: &[
        "otrazhena v vypiske",
        "vhod v internet-bank",
        "вход в vestabank",
        "вход в мобильное приложение",
        "ispolnen platezh",
        "пароль",
    ],
};

re!(re_card_operation,
    r"^(?:Karta|Карта) ([0-9]+?): (.+?), (.+?) ([0-9.]+) (.+?)[.,] (?:(?:комиссия|komissiya) D([0-9.]+) (.+?)\. )?(?:(.+?)\. )? *(?:Доступно|Dostupno) ([0-9.]+) (.+?)\.");

static PATTERNS: &[Pattern] = &[
    Pattern { name: "card_operation", regex: re_card_operation, build: card_operation },
];

pub struct Vestabank;

impl Grammar for Vestabank {
    fn accepts(&self, body: &str) -> bool {
        FILTER.accepts(body)
    }

    fn parse(&self, message: &RawMessage) -> Result<Record, MessageError> {
        first_match(PATTERNS, message)
    }
}

fn card_operation(f: &Fields<'_>) -> Result<Record, MessageError> {
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
