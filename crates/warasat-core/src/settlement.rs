//! Cash settlement between inheritors.
//!
//! Once properties are assigned, each inheritor either holds more than their
//! share (and must pay cash) or less (and is owed cash). [`SettlementMatcher`]
//! pairs the two sides greedily, largest amounts first, with a two-pointer
//! sweep. The greedy order keeps the transfer count low in common cases but
//! is not guaranteed minimal.

use serde::Serialize;
use tracing::debug;

/// Balances within this many currency units of zero count as settled.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// One inheritor's position: what they are entitled to against what they hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyFinancials {
    pub id: String,
    pub name: String,
    pub target_value: f64,
    pub assigned_value: f64,
    /// Ids of the properties making up `assigned_value`.
    pub assigned_properties: Vec<String>,
}

impl PartyFinancials {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        target_value: f64,
        assigned_value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target_value,
            assigned_value,
            assigned_properties: Vec::new(),
        }
    }

    /// Positive: owed cash. Negative: owes cash.
    pub fn balance(&self) -> f64 {
        self.target_value - self.assigned_value
    }
}

/// A cash payment from an over-allocated inheritor to an under-allocated one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    pub from: String,
    pub from_name: String,
    pub to: String,
    pub to_name: String,
    pub amount: f64,
}

/// Transfers plus whatever the sweep left unmatched on each side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettlementPlan {
    pub transfers: Vec<Transfer>,
    /// Payable amounts not covered by any transfer.
    pub unsettled_payable: f64,
    /// Receivable amounts not covered by any transfer.
    pub unsettled_receivable: f64,
}

impl SettlementPlan {
    pub fn total_transferred(&self) -> f64 {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

#[derive(Debug)]
struct Position<'a> {
    id: &'a str,
    name: &'a str,
    amount: f64,
}

/// Greedy payer/receiver matcher.
#[derive(Debug, Clone, Copy)]
pub struct SettlementMatcher {
    threshold: f64,
}

impl Default for SettlementMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SettlementMatcher {
    /// Matcher with a custom tolerance band. Negative or non-finite values
    /// are treated as zero.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.max(0.0)
        } else {
            0.0
        };
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether every balance already lies within the tolerance band.
    pub fn is_settled(&self, financials: &[PartyFinancials]) -> bool {
        financials
            .iter()
            .all(|f| f.balance().abs() <= self.threshold)
    }

    /// Compute the transfer list.
    ///
    /// Identical input (including order) always yields the identical
    /// sequence.
    pub fn settle(&self, financials: &[PartyFinancials]) -> Vec<Transfer> {
        self.plan(financials).transfers
    }

    /// Compute transfers and report the amounts left unmatched.
    pub fn plan(&self, financials: &[PartyFinancials]) -> SettlementPlan {
        let mut payers: Vec<Position<'_>> = financials
            .iter()
            .filter(|f| f.balance() < -self.threshold)
            .map(|f| Position {
                id: &f.id,
                name: &f.name,
                amount: f.balance().abs(),
            })
            .collect();
        let mut receivers: Vec<Position<'_>> = financials
            .iter()
            .filter(|f| f.balance() > self.threshold)
            .map(|f| Position {
                id: &f.id,
                name: &f.name,
                amount: f.balance(),
            })
            .collect();

        // Stable sorts: equal amounts keep input order.
        payers.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        receivers.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        debug!(
            payers = payers.len(),
            receivers = receivers.len(),
            threshold = self.threshold,
            "matching settlement"
        );

        let mut transfers = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < payers.len() && j < receivers.len() {
            let amount = payers[i].amount.min(receivers[j].amount);

            if amount > 0.0 {
                transfers.push(Transfer {
                    from: payers[i].id.to_string(),
                    from_name: payers[i].name.to_string(),
                    to: receivers[j].id.to_string(),
                    to_name: receivers[j].name.to_string(),
                    amount,
                });
                payers[i].amount -= amount;
                receivers[j].amount -= amount;
            }

            if self.is_exhausted(payers[i].amount) {
                i += 1;
            }
            if self.is_exhausted(receivers[j].amount) {
                j += 1;
            }
        }

        SettlementPlan {
            transfers,
            unsettled_payable: payers.iter().map(|p| p.amount).sum(),
            unsettled_receivable: receivers.iter().map(|r| r.amount).sum(),
        }
    }

    fn is_exhausted(&self, remaining: f64) -> bool {
        remaining <= 0.0 || remaining < self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn matcher() -> SettlementMatcher {
        SettlementMatcher::default()
    }

    fn party(id: &str, target: f64, assigned: f64) -> PartyFinancials {
        PartyFinancials::new(id, id.to_uppercase(), target, assigned)
    }

    fn edges(transfers: &[Transfer]) -> Vec<(&str, &str, f64)> {
        transfers
            .iter()
            .map(|t| (t.from.as_str(), t.to.as_str(), t.amount))
            .collect()
    }

    #[rstest]
    #[case::one_to_one(
        vec![party("a", 0.0, 500.0), party("b", 500.0, 0.0)],
        vec![("a", "b", 500.0)]
    )]
    #[case::one_payer_two_receivers(
        vec![party("a", 0.0, 900.0), party("b", 600.0, 0.0), party("c", 300.0, 0.0)],
        vec![("a", "b", 600.0), ("a", "c", 300.0)]
    )]
    #[case::largest_first(
        vec![
            party("a", 0.0, 200.0),
            party("b", 0.0, 800.0),
            party("c", 700.0, 0.0),
            party("d", 300.0, 0.0),
        ],
        vec![("b", "c", 700.0), ("b", "d", 100.0), ("a", "d", 200.0)]
    )]
    #[case::within_threshold_ignored(
        vec![party("a", 1000.0, 1050.0), party("b", 1000.0, 950.0)],
        vec![]
    )]
    #[case::ties_keep_input_order(
        vec![party("a", 0.0, 400.0), party("b", 0.0, 400.0), party("c", 800.0, 0.0)],
        vec![("a", "c", 400.0), ("b", "c", 400.0)]
    )]
    #[case::no_receivers(vec![party("a", 0.0, 400.0)], vec![])]
    #[case::empty(vec![], vec![])]
    fn settlement_cases(
        matcher: SettlementMatcher,
        #[case] financials: Vec<PartyFinancials>,
        #[case] expected: Vec<(&str, &str, f64)>,
    ) {
        let transfers = matcher.settle(&financials);
        assert_eq!(edges(&transfers), expected);
    }

    #[rstest]
    fn transfers_carry_display_names(matcher: SettlementMatcher) {
        let transfers = matcher.settle(&[party("ali", 0.0, 1000.0), party("sara", 1000.0, 0.0)]);
        assert_eq!(transfers[0].from_name, "ALI");
        assert_eq!(transfers[0].to_name, "SARA");
    }

    #[rstest]
    fn small_residual_is_dropped(matcher: SettlementMatcher) {
        // a overpays by 1050, c and d are owed 1000 each, b overpays 950.
        let financials = vec![
            party("a", 0.0, 1050.0),
            party("b", 0.0, 950.0),
            party("c", 1000.0, 0.0),
            party("d", 1000.0, 0.0),
        ];
        let plan = matcher.plan(&financials);
        assert_eq!(
            edges(&plan.transfers),
            vec![("a", "c", 1000.0), ("b", "d", 950.0)]
        );
        assert_eq!(plan.unsettled_payable, 50.0);
        assert_eq!(plan.unsettled_receivable, 50.0);
    }

    #[rstest]
    fn under_allocation_leaves_receivable_unmatched(matcher: SettlementMatcher) {
        // Shares summing to less than 100% leave payers short of receivers' claims.
        let plan = matcher.plan(&[party("a", 300.0, 1000.0), party("b", 600.0, 0.0)]);
        assert_eq!(edges(&plan.transfers), vec![("a", "b", 600.0)]);
        assert_eq!(plan.unsettled_payable, 100.0);
        assert_eq!(plan.unsettled_receivable, 0.0);
    }

    #[rstest]
    fn nobody_both_pays_and_receives(matcher: SettlementMatcher) {
        let financials = vec![
            party("a", 100.0, 5000.0),
            party("b", 2500.0, 0.0),
            party("c", 2400.0, 0.0),
            party("d", 0.0, 0.0),
        ];
        let transfers = matcher.settle(&financials);
        for t in &transfers {
            assert!(t.amount > 0.0);
            assert!(!transfers.iter().any(|u| u.to == t.from));
        }
    }

    #[test]
    fn zero_threshold_still_terminates() {
        let matcher = SettlementMatcher::new(0.0);
        let transfers = matcher.settle(&[party("a", 0.0, 10.0), party("b", 10.0, 0.0)]);
        assert_eq!(edges(&transfers), vec![("a", "b", 10.0)]);
    }

    #[test]
    fn negative_threshold_is_clamped() {
        assert_eq!(SettlementMatcher::new(-5.0).threshold(), 0.0);
        assert_eq!(SettlementMatcher::new(f64::NAN).threshold(), 0.0);
        assert_eq!(SettlementMatcher::new(250.0).threshold(), 250.0);
    }

    #[rstest]
    fn settled_state_produces_no_transfers(matcher: SettlementMatcher) {
        let financials = vec![party("a", 1000.0, 1020.0), party("b", 1000.0, 980.0)];
        assert!(matcher.is_settled(&financials));
        assert!(matcher.settle(&financials).is_empty());
    }
}
