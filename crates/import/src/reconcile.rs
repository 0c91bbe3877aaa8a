use kassa_core::{CardOperation, TransferId, TransferRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum distance between a credit notification and the transfer that
/// caused it.
pub const MATCH_WINDOW_SECS: i64 = 150;

/// How to choose among several equal-amount transfers inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Left-to-right fold where every window candidate that is not strictly
    /// closer than the running minimum still takes over the result. In
    /// practice the last qualifying transfer in input order wins. This is the
    /// historical behaviour and keeps existing exports stable.
    #[default]
    LastInWindow,
    /// Smallest offset wins; the earliest transfer wins a tie.
    Nearest,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown match policy: '{0}' (expected last-in-window or nearest)")]
pub struct UnknownPolicy(pub String);

impl std::str::FromStr for MatchPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last-in-window" | "last" => Ok(MatchPolicy::LastInWindow),
            "nearest" => Ok(MatchPolicy::Nearest),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMatch {
    Found(TransferId),
    NotFound,
}

impl TransferMatch {
    pub fn id(self) -> Option<TransferId> {
        match self {
            TransferMatch::Found(id) => Some(id),
            TransferMatch::NotFound => None,
        }
    }
}

/// Finds the transfer most plausibly behind a credit operation: equal amount,
/// received within [`MATCH_WINDOW_SECS`] of the operation.
pub fn find_best_transfer(
    op: &CardOperation,
    transfers: &[TransferRecord],
    policy: MatchPolicy,
) -> TransferMatch {
    let mut best: Option<(TransferId, i64)> = None;

    let candidates = transfers
        .iter()
        .enumerate()
        .filter(|(_, t)| t.amount == op.amount);

    for (idx, t) in candidates {
        let offset = (t.source_time - op.source_time).num_seconds().abs();
        if offset > MATCH_WINDOW_SECS {
            continue;
        }
        let id = TransferId(idx);
        best = match (best, policy) {
            (None, _) => Some((id, offset)),
            (Some((_, min)), _) if offset < min => Some((id, offset)),
            (Some((_, min)), MatchPolicy::LastInWindow) => Some((id, min)),
            (kept, MatchPolicy::Nearest) => kept,
        };
    }

    match best {
        Some((id, _)) => TransferMatch::Found(id),
        None => TransferMatch::NotFound,
    }
}

/// Links every credit operation to its transfer. Operations for which
/// `is_credit` is false are left untouched. Returns the number of matches.
pub fn reconcile(
    operations: &mut [CardOperation],
    transfers: &[TransferRecord],
    is_credit: impl Fn(&str) -> bool,
    policy: MatchPolicy,
) -> usize {
    let mut matched = 0;
    for op in operations.iter_mut().filter(|op| is_credit(&op.kind)) {
        op.matched_transfer = find_best_transfer(op, transfers, policy).id();
        match op.matched_transfer {
            Some(id) => {
                matched += 1;
                tracing::debug!(card = %op.card, amount = %op.amount, transfer = %id, "credit matched");
            }
            None => {
                tracing::debug!(card = %op.card, amount = %op.amount, "no transfer for credit");
            }
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use kassa_core::Money;

    const T: i64 = 1_488_712_860;

    fn at(offset_secs: i64) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600).unwrap().timestamp_opt(T + offset_secs, 0).unwrap()
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn credit(amount: &str, offset_secs: i64) -> CardOperation {
        CardOperation {
            source_time: at(offset_secs),
            declared_time: None,
            card: "VISA8413".to_string(),
            kind: "зачисление".to_string(),
            amount: money(amount),
            currency: "р".to_string(),
            fee: None,
            fee_currency: None,
            place: None,
            balance: None,
            matched_transfer: None,
        }
    }

    fn transfer(name: &str, amount: &str, offset_secs: i64) -> TransferRecord {
        TransferRecord {
            source_time: at(offset_secs),
            counterparty: name.to_string(),
            amount: money(amount),
            currency: "RUB".to_string(),
            comment: None,
        }
    }

    #[test]
    fn single_candidate_inside_window() {
        let transfers = vec![transfer("A", "1000.00", 0)];
        let op = credit("1000.00", 90);
        assert_eq!(
            find_best_transfer(&op, &transfers, MatchPolicy::default()),
            TransferMatch::Found(TransferId(0))
        );
    }

    #[test]
    fn only_candidate_outside_window() {
        let transfers = vec![transfer("A", "1000.00", 200)];
        let op = credit("1000.00", 0);
        assert_eq!(find_best_transfer(&op, &transfers, MatchPolicy::default()), TransferMatch::NotFound);
        assert_eq!(find_best_transfer(&op, &transfers, MatchPolicy::Nearest), TransferMatch::NotFound);
    }

    #[test]
    fn window_edge_is_inclusive() {
        let op = credit("10", 0);
        assert_eq!(
            find_best_transfer(&op, &[transfer("A", "10", -150)], MatchPolicy::default()),
            TransferMatch::Found(TransferId(0))
        );
        assert_eq!(
            find_best_transfer(&op, &[transfer("A", "10", 151)], MatchPolicy::default()),
            TransferMatch::NotFound
        );
    }

    #[test]
    fn amount_must_be_equal() {
        let transfers = vec![transfer("A", "999.99", 0), transfer("B", "1000.01", 1)];
        assert_eq!(find_best_transfer(&credit("1000", 0), &transfers, MatchPolicy::Nearest), TransferMatch::NotFound);
    }

    #[test]
    fn equal_amount_with_different_scale_matches() {
        let transfers = vec![transfer("A", "1000", 10)];
        assert_eq!(
            find_best_transfer(&credit("1000.00", 0), &transfers, MatchPolicy::default()),
            TransferMatch::Found(TransferId(0))
        );
    }

    #[test]
    fn no_transfers_at_all() {
        assert_eq!(find_best_transfer(&credit("1", 0), &[], MatchPolicy::default()), TransferMatch::NotFound);
    }

    #[test]
    fn last_in_window_prefers_later_candidate_even_if_farther() {
        let transfers = vec![
            transfer("near", "500", 5),
            transfer("other amount", "7", 0),
            transfer("far", "500", 120),
            transfer("outside", "500", 400),
        ];
        let op = credit("500", 0);
        assert_eq!(
            find_best_transfer(&op, &transfers, MatchPolicy::LastInWindow),
            TransferMatch::Found(TransferId(2))
        );
        assert_eq!(
            find_best_transfer(&op, &transfers, MatchPolicy::Nearest),
            TransferMatch::Found(TransferId(0))
        );
    }

    #[test]
    fn ties_go_to_last_or_first_by_policy() {
        let transfers = vec![transfer("before", "500", -30), transfer("after", "500", 30)];
        let op = credit("500", 0);
        assert_eq!(
            find_best_transfer(&op, &transfers, MatchPolicy::LastInWindow),
            TransferMatch::Found(TransferId(1))
        );
        assert_eq!(
            find_best_transfer(&op, &transfers, MatchPolicy::Nearest),
            TransferMatch::Found(TransferId(0))
        );
    }

    #[test]
    fn nearest_picks_the_closest_regardless_of_order() {
        let transfers = vec![
            transfer("a", "500", 100),
            transfer("b", "500", -3),
            transfer("c", "500", 60),
        ];
        assert_eq!(
            find_best_transfer(&credit("500", 0), &transfers, MatchPolicy::Nearest),
            TransferMatch::Found(TransferId(1))
        );
    }

    #[test]
    fn reconcile_only_touches_credits() {
        let transfers = vec![transfer("A", "100", 10)];
        let mut purchase = credit("100", 0);
        purchase.kind = "покупка".to_string();
        let mut ops = vec![purchase, credit("100", 0), credit("55", 0)];

        let matched = reconcile(&mut ops, &transfers, |k| k == "зачисление", MatchPolicy::default());

        assert_eq!(matched, 1);
        assert_eq!(ops[0].matched_transfer, None);
        assert_eq!(ops[1].matched_transfer, Some(TransferId(0)));
        assert_eq!(ops[2].matched_transfer, None);
    }

    #[test]
    fn reconcile_matches_never_differ_in_amount() {
        let transfers: Vec<_> = (0..20)
            .map(|i| transfer("X", &format!("{}", 100 + i % 4), i * 15))
            .collect();
        let mut ops: Vec<_> = (0..20).map(|i| credit(&format!("{}", 100 + i % 5), i * 17)).collect();

        reconcile(&mut ops, &transfers, |_| true, MatchPolicy::LastInWindow);

        for op in &ops {
            if let Some(id) = op.matched_transfer {
                let t = &transfers[id.0];
                assert_eq!(t.amount, op.amount);
                assert!((t.source_time - op.source_time).num_seconds().abs() <= MATCH_WINDOW_SECS);
            }
        }
        // 104 never appears among transfers.
        assert!(ops.iter().filter(|o| o.amount == money("104")).all(|o| o.matched_transfer.is_none()));
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("nearest".parse::<MatchPolicy>().unwrap(), MatchPolicy::Nearest);
        assert_eq!("Last-In-Window".parse::<MatchPolicy>().unwrap(), MatchPolicy::LastInWindow);
        assert_eq!("closest".parse::<MatchPolicy>(), Err(UnknownPolicy("closest".to_string())));
    }
}
