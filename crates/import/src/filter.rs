/// Keyword rule that drops non-transactional notifications (login alerts,
/// one-time passwords) before any grammar is tried. Matching is done on the
/// lower-cased body, so keyword lists must be lower case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordFilter {
    /// Reject when the body contains any denylisted phrase.
    Denylist(&'static [&'static str]),
    /// Accept only when the body mentions a card and contains no denylisted
    /// phrase.
    CardScoped {
        indicators: &'static [&'static str],
        denylist: &'static [&'static str],
    },
}

impl KeywordFilter {
    pub fn accepts(&self, body: &str) -> bool {
        let text = body.to_lowercase();
        let contains_any = |words: &[&str]| words.iter().any(|w| text.contains(w));

        match self {
            KeywordFilter::Denylist(denylist) => !contains_any(denylist),
            KeywordFilter::CardScoped { indicators, denylist } => {
                contains_any(indicators) && !contains_any(denylist)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECURITY: KeywordFilter = KeywordFilter::Denylist(&["пароль", "вход в сбербанк"]);
    const CARD: KeywordFilter = KeywordFilter::CardScoped {
        indicators: &["карта", "karta"],
        denylist: &["vhod v", "пароль"],
    };

    #[test]
    fn denylist_accepts_ordinary_text() {
        assert!(SECURITY.accepts("VISA1234 14:20 покупка 500р Баланс: 100р"));
    }

    #[test]
    fn denylist_rejects_case_insensitively() {
        assert!(!SECURITY.accepts("Вход в Сбербанк Онлайн 05.03.17 14:20"));
        assert!(!SECURITY.accepts("Никому не сообщайте ПАРОЛЬ 12345"));
    }

    #[test]
    fn card_scoped_requires_indicator() {
        assert!(CARD.accepts("Karta *8741: Oplata 250.00 RUB"));
        assert!(CARD.accepts("КАРТА 1234: покупка"));
        assert!(!CARD.accepts("Oplata 250.00 RUB"));
    }

    #[test]
    fn card_scoped_rejects_denylisted_even_with_indicator() {
        assert!(!CARD.accepts("Karta *8741: vhod v internet-bank"));
        assert!(!CARD.accepts("Карта 1234: пароль 0000"));
    }

    #[test]
    fn empty_body() {
        assert!(SECURITY.accepts(""));
        assert!(!CARD.accepts(""));
    }
}
