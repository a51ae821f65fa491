//! Share allocation: from the relations present to each inheritor's percentage.
//!
//! The allocator is a small rule engine over two ordered tables:
//!
//! 1. [`FixedShareRule`]s. Each names a claimant (at most one inheritor) and
//!    the fraction of the estate that claimant receives, conditional on the
//!    rest of the family. Applied in order, each subtracting from the
//!    remaining pool.
//! 2. [`ResidueRule`]s. The first applicable rule receives whatever is left.
//!
//! This is a simplified subset of the inheritance rules: grandchildren,
//! siblings, multiple-wife splitting and several parent interactions are not
//! modelled. Relations outside the tables (including [`Relation::Other`])
//! keep a zero share, and the shortfall is reported on [`Allocation`].
//! Allocation itself never logs beyond `debug!`; callers decide whether a
//! shortfall is worth reporting.

use std::fmt;

use tracing::debug;

use crate::party::{Inheritor, Relation};

/// Below this the remaining pool is treated as exhausted.
const RESIDUE_EPSILON: f64 = 1e-9;

/// Unallocated percentages up to this are rounding noise.
const COMPLETE_TOLERANCE_PERCENT: f64 = 1e-6;

/// A fixed share expressed as a simple fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub numerator: u8,
    pub denominator: u8,
}

impl Fraction {
    pub const fn new(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn value(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Indices into the inheritor slice, grouped by the categories the rules use.
#[derive(Debug, Default)]
pub struct Family {
    pub husband: Option<usize>,
    pub wife: Option<usize>,
    pub sons: Vec<usize>,
    pub daughters: Vec<usize>,
    pub father: Option<usize>,
    pub mother: Option<usize>,
}

impl Family {
    /// Group inheritors by relation. Single-claimant categories take the
    /// first matching inheritor in input order.
    pub fn classify(inheritors: &[Inheritor]) -> Self {
        let mut family = Family::default();
        for (idx, heir) in inheritors.iter().enumerate() {
            match heir.relation {
                Relation::Husband => {
                    family.husband.get_or_insert(idx);
                }
                Relation::Wife => {
                    family.wife.get_or_insert(idx);
                }
                Relation::Son => family.sons.push(idx),
                Relation::Daughter => family.daughters.push(idx),
                Relation::Father => {
                    family.father.get_or_insert(idx);
                }
                Relation::Mother => {
                    family.mother.get_or_insert(idx);
                }
                Relation::Other => {}
            }
        }
        family
    }

    pub fn has_descendants(&self) -> bool {
        !self.sons.is_empty() || !self.daughters.is_empty()
    }
}

/// A prioritized fixed-share entitlement.
pub struct FixedShareRule {
    pub heir: &'static str,
    claimant: fn(&Family) -> Option<usize>,
    fraction: fn(&Family) -> Fraction,
}

impl FixedShareRule {
    pub const fn new(
        heir: &'static str,
        claimant: fn(&Family) -> Option<usize>,
        fraction: fn(&Family) -> Fraction,
    ) -> Self {
        Self {
            heir,
            claimant,
            fraction,
        }
    }

    /// The claimant's index and entitlement, if this rule applies.
    pub fn evaluate(&self, family: &Family) -> Option<(usize, Fraction)> {
        (self.claimant)(family).map(|idx| (idx, (self.fraction)(family)))
    }
}

fn husband(family: &Family) -> Option<usize> {
    family.husband
}

fn husband_share(family: &Family) -> Fraction {
    if family.has_descendants() {
        Fraction::new(1, 4)
    } else {
        Fraction::new(1, 2)
    }
}

/// A wife only inherits as spouse when no husband is recorded.
fn wife(family: &Family) -> Option<usize> {
    match family.husband {
        Some(_) => None,
        None => family.wife,
    }
}

fn wife_share(family: &Family) -> Fraction {
    if family.has_descendants() {
        Fraction::new(1, 8)
    } else {
        Fraction::new(1, 4)
    }
}

fn father(family: &Family) -> Option<usize> {
    family.father
}

fn father_share(_: &Family) -> Fraction {
    Fraction::new(1, 6)
}

fn mother(family: &Family) -> Option<usize> {
    family.mother
}

fn mother_share(family: &Family) -> Fraction {
    if family.has_descendants() {
        Fraction::new(1, 6)
    } else {
        Fraction::new(1, 3)
    }
}

/// Spouse first, then parents.
pub static FIXED_SHARE_RULES: [FixedShareRule; 4] = [
    FixedShareRule::new("husband", husband, husband_share),
    FixedShareRule::new("wife", wife, wife_share),
    FixedShareRule::new("father", father, father_share),
    FixedShareRule::new("mother", mother, mother_share),
];

/// Who takes what is left after the fixed shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidueRule {
    /// Sons take two units, daughters one.
    Descendants,
    /// With no descendants the father takes the residue on top of his 1/6.
    FatherAsResiduary,
}

impl ResidueRule {
    /// Distribute `remaining` into `fractions`. Returns `false` when the rule
    /// does not apply to this family.
    fn apply(&self, family: &Family, remaining: f64, fractions: &mut [f64]) -> bool {
        match self {
            Self::Descendants => {
                let total_units = 2 * family.sons.len() + family.daughters.len();
                if total_units == 0 {
                    return false;
                }
                let unit = remaining / total_units as f64;
                for &idx in &family.sons {
                    fractions[idx] = unit * 2.0;
                }
                for &idx in &family.daughters {
                    fractions[idx] = unit;
                }
                true
            }
            Self::FatherAsResiduary => match family.father {
                Some(idx) => {
                    fractions[idx] += remaining;
                    true
                }
                None => false,
            },
        }
    }
}

pub static RESIDUE_RULES: [ResidueRule; 2] =
    [ResidueRule::Descendants, ResidueRule::FatherAsResiduary];

/// How an inheritor's share was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareBasis {
    /// No rule applied; share is zero.
    Excluded,
    Fixed(Fraction),
    Residuary(ResidueRule),
    FixedAndResidue(Fraction, ResidueRule),
}

impl fmt::Display for ShareBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded => f.write_str("-"),
            Self::Fixed(fraction) => write!(f, "{fraction}"),
            Self::Residuary(_) => f.write_str("residue"),
            Self::FixedAndResidue(fraction, _) => write!(f, "{fraction} + residue"),
        }
    }
}

/// Result of one allocation run.
#[derive(Debug, Clone)]
pub struct Allocation {
    inheritors: Vec<Inheritor>,
    bases: Vec<ShareBasis>,
    unallocated: f64,
}

impl Allocation {
    pub fn inheritors(&self) -> &[Inheritor] {
        &self.inheritors
    }

    pub fn into_inheritors(self) -> Vec<Inheritor> {
        self.inheritors
    }

    /// Basis of each inheritor's share, aligned with [`Allocation::inheritors`].
    pub fn bases(&self) -> &[ShareBasis] {
        &self.bases
    }

    /// Sum of all allocated percentages.
    pub fn total_percentage(&self) -> f64 {
        self.inheritors.iter().map(|h| h.share).sum()
    }

    /// Percentage of the estate no rule assigned to anyone.
    pub fn unallocated(&self) -> f64 {
        self.unallocated
    }

    /// Whether the whole estate has been distributed.
    pub fn is_complete(&self) -> bool {
        self.unallocated <= COMPLETE_TOLERANCE_PERCENT
    }
}

/// Rule engine computing inheritance shares.
pub struct ShareAllocator {
    fixed: &'static [FixedShareRule],
    residue: &'static [ResidueRule],
}

impl Default for ShareAllocator {
    fn default() -> Self {
        Self {
            fixed: &FIXED_SHARE_RULES,
            residue: &RESIDUE_RULES,
        }
    }
}

impl ShareAllocator {
    pub fn new(fixed: &'static [FixedShareRule], residue: &'static [ResidueRule]) -> Self {
        Self { fixed, residue }
    }

    /// Recompute every inheritor's share.
    ///
    /// Output has the same length and order as the input; only `share` is
    /// rewritten. Deterministic for a given sequence of relations.
    pub fn allocate(&self, inheritors: &[Inheritor]) -> Allocation {
        let family = Family::classify(inheritors);
        let mut fractions = vec![0.0_f64; inheritors.len()];
        let mut bases = vec![ShareBasis::Excluded; inheritors.len()];
        let mut remaining = 1.0_f64;

        for rule in self.fixed {
            if let Some((idx, fraction)) = rule.evaluate(&family) {
                debug!(heir = rule.heir, share = %fraction, "fixed share applied");
                fractions[idx] += fraction.value();
                bases[idx] = ShareBasis::Fixed(fraction);
                remaining -= fraction.value();
            }
        }

        if remaining > RESIDUE_EPSILON {
            let before = fractions.clone();
            if let Some(rule) = self
                .residue
                .iter()
                .find(|rule| rule.apply(&family, remaining, &mut fractions))
            {
                debug!(?rule, remaining, "residue distributed");
                for (idx, basis) in bases.iter_mut().enumerate() {
                    if fractions[idx] == before[idx] {
                        continue;
                    }
                    *basis = match *basis {
                        ShareBasis::Fixed(fraction) => ShareBasis::FixedAndResidue(fraction, *rule),
                        _ => ShareBasis::Residuary(*rule),
                    };
                }
            }
        }

        let inheritors: Vec<Inheritor> = inheritors
            .iter()
            .zip(&fractions)
            .map(|(heir, fraction)| Inheritor {
                share: fraction * 100.0,
                ..heir.clone()
            })
            .collect();

        let total: f64 = inheritors.iter().map(|h| h.share).sum();
        let unallocated = (100.0 - total).max(0.0);
        Allocation {
            inheritors,
            bases,
            unallocated,
        }
    }
}

/// Recompute shares with the standard rule tables.
pub fn allocate_shares(inheritors: &[Inheritor]) -> Vec<Inheritor> {
    ShareAllocator::default().allocate(inheritors).into_inheritors()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPS: f64 = 1e-9;

    fn family(relations: &[Relation]) -> Vec<Inheritor> {
        relations
            .iter()
            .enumerate()
            .map(|(i, &r)| Inheritor::new(format!("h{i}"), format!("Heir {i}"), r))
            .collect()
    }

    fn shares(relations: &[Relation]) -> Vec<f64> {
        allocate_shares(&family(relations))
            .into_iter()
            .map(|h| h.share)
            .collect()
    }

    fn assert_shares(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < EPS, "share {i}: expected {e}, got {a}");
        }
    }

    use Relation::*;

    #[test]
    fn husband_two_sons_one_daughter() {
        assert_shares(
            &shares(&[Husband, Son, Son, Daughter]),
            &[25.0, 30.0, 30.0, 15.0],
        );
    }

    #[test]
    fn wife_alone_leaves_residue_unallocated() {
        let allocation = ShareAllocator::default().allocate(&family(&[Wife]));
        assert_shares(
            &allocation.inheritors().iter().map(|h| h.share).collect::<Vec<_>>(),
            &[25.0],
        );
        assert!(!allocation.is_complete());
        assert!((allocation.unallocated() - 75.0).abs() < EPS);
    }

    #[test]
    fn wife_and_father_father_takes_residue() {
        assert_shares(&shares(&[Wife, Father]), &[25.0, 75.0]);
    }

    #[rstest]
    #[case::husband_no_children(&[Husband], &[50.0])]
    #[case::husband_with_daughter(&[Husband, Daughter], &[25.0, 75.0])]
    #[case::wife_with_son(&[Wife, Son], &[12.5, 87.5])]
    #[case::sons_only(&[Son, Son], &[50.0, 50.0])]
    #[case::daughters_only(&[Daughter, Daughter, Daughter], &[100.0 / 3.0, 100.0 / 3.0, 100.0 / 3.0])]
    #[case::parents_no_children(&[Father, Mother], &[100.0 / 6.0 + 50.0, 100.0 / 3.0])]
    #[case::parents_with_son(&[Father, Mother, Son], &[100.0 / 6.0, 100.0 / 6.0, 200.0 / 3.0])]
    #[case::husband_and_parents_exhaust_pool(&[Husband, Father, Mother], &[50.0, 100.0 / 6.0, 100.0 / 3.0])]
    fn standard_configurations(#[case] relations: &[Relation], #[case] expected: &[f64]) {
        assert_shares(&shares(relations), expected);
    }

    #[test]
    fn husband_takes_precedence_over_wife() {
        assert_shares(&shares(&[Wife, Husband, Son]), &[0.0, 25.0, 75.0]);
    }

    #[test]
    fn only_first_wife_claims_the_spouse_share() {
        assert_shares(&shares(&[Wife, Wife, Son]), &[12.5, 0.0, 87.5]);
    }

    #[test]
    fn other_relations_receive_nothing() {
        let allocation = ShareAllocator::default().allocate(&family(&[Other, Son]));
        assert_shares(
            &allocation.inheritors().iter().map(|h| h.share).collect::<Vec<_>>(),
            &[0.0, 100.0],
        );
        assert_eq!(allocation.bases()[0], ShareBasis::Excluded);
        assert!(allocation.is_complete());
    }

    #[test]
    fn mother_alone_is_under_allocated() {
        let allocation = ShareAllocator::default().allocate(&family(&[Mother, Other]));
        assert!((allocation.total_percentage() - 100.0 / 3.0).abs() < EPS);
        assert!(!allocation.is_complete());
    }

    #[test]
    fn empty_list_allocates_nothing() {
        let allocation = ShareAllocator::default().allocate(&[]);
        assert!(allocation.inheritors().is_empty());
        assert!(allocation.bases().is_empty());
        assert_eq!(allocation.total_percentage(), 0.0);
    }

    #[test]
    fn stale_shares_are_reset() {
        let mut heirs = family(&[Other, Son]);
        heirs[0].share = 40.0;
        heirs[1].share = 10.0;
        assert_shares(
            &allocate_shares(&heirs).iter().map(|h| h.share).collect::<Vec<_>>(),
            &[0.0, 100.0],
        );
    }

    #[test]
    fn other_fields_and_order_are_preserved() {
        let heirs = family(&[Daughter, Husband, Son]);
        let allocated = allocate_shares(&heirs);
        for (before, after) in heirs.iter().zip(&allocated) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.name, after.name);
            assert_eq!(before.relation, after.relation);
        }
    }

    #[test]
    fn bases_describe_each_share() {
        let allocation = ShareAllocator::default().allocate(&family(&[Wife, Father, Other]));
        assert_eq!(allocation.bases()[0], ShareBasis::Fixed(Fraction::new(1, 4)));
        assert_eq!(
            allocation.bases()[1],
            ShareBasis::FixedAndResidue(Fraction::new(1, 6), ResidueRule::FatherAsResiduary)
        );
        assert_eq!(allocation.bases()[2], ShareBasis::Excluded);
        assert_eq!(allocation.bases()[1].to_string(), "1/6 + residue");
    }

    #[test]
    fn allocation_is_idempotent() {
        let once = allocate_shares(&family(&[Husband, Mother, Son, Daughter]));
        let twice = allocate_shares(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn custom_tables_can_drop_residue() {
        static NO_RESIDUE: [ResidueRule; 0] = [];
        let allocator = ShareAllocator::new(&FIXED_SHARE_RULES, &NO_RESIDUE);
        let allocation = allocator.allocate(&family(&[Husband, Son]));
        assert_shares(
            &allocation.inheritors().iter().map(|h| h.share).collect::<Vec<_>>(),
            &[25.0, 0.0],
        );
    }
}
