//! Conjunctions, disjunctions, and rules.
//!
//! Evaluation order of atoms within a conjunction (and of conjunctions
//! within a disjunction) has no semantic effect — AND/OR are both
//! commutative — but the parser preserves textual order for `Debug`
//! output and diagnostics. Structural equality (spec §4.6) instead
//! compares each level as a *multiset*: this is implemented by sorting
//! a canonicalized copy at construction time (`Conjunction::new`,
//! `Disjunction::new`) so that `#[derive(PartialEq)]` on the sorted form
//! is already the multiset comparison the spec calls for.

use busguard_contracts::AccessVerdict;

use crate::atom::NegatedAtom;

/// An AND of atoms. Evaluates true iff every atom evaluates true
/// (negation inverts an atom's own result first).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Conjunction {
    /// Atoms in canonical (sorted) order, used for equality.
    sorted: Vec<NegatedAtom>,
}

impl Conjunction {
    /// Build a conjunction from atoms in textual order, canonicalizing
    /// for equality immediately.
    pub fn new(atoms: Vec<NegatedAtom>) -> Self {
        let mut sorted = atoms;
        sorted.sort();
        Self { sorted }
    }

    pub fn atoms(&self) -> &[NegatedAtom] {
        &self.sorted
    }
}

/// An OR of conjunctions. Evaluates true iff any conjunction evaluates
/// true.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Disjunction {
    /// Conjunctions in canonical (sorted) order, used for equality.
    sorted: Vec<Conjunction>,
}

impl Disjunction {
    pub fn new(conjunctions: Vec<Conjunction>) -> Self {
        let mut sorted = conjunctions;
        sorted.sort();
        Self { sorted }
    }

    pub fn conjunctions(&self) -> &[Conjunction] {
        &self.sorted
    }
}

/// A condition paired with the verdict it produces when it matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub condition: Disjunction,
    pub verdict: AccessVerdict,
}

impl Rule {
    pub fn new(condition: Disjunction, verdict: AccessVerdict) -> Self {
        Self { condition, verdict }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;

    fn na(atom: Atom) -> NegatedAtom {
        NegatedAtom::new(atom, false)
    }

    #[test]
    fn conjunction_equality_is_commutative() {
        let a = Conjunction::new(vec![
            na(Atom::UserId { uid: 1, gid: None }),
            na(Atom::GroupId { gid: 2 }),
        ]);
        let b = Conjunction::new(vec![
            na(Atom::GroupId { gid: 2 }),
            na(Atom::UserId { uid: 1, gid: None }),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn disjunction_equality_is_commutative() {
        let c1 = Conjunction::new(vec![na(Atom::UserId { uid: 1, gid: None })]);
        let c2 = Conjunction::new(vec![na(Atom::GroupId { gid: 2 })]);
        let a = Disjunction::new(vec![c1.clone(), c2.clone()]);
        let b = Disjunction::new(vec![c2, c1]);
        assert_eq!(a, b);
    }

    #[test]
    fn rule_equality_requires_matching_verdict() {
        let cond = Disjunction::new(vec![Conjunction::new(vec![na(Atom::Wildcard)])]);
        let allow = Rule::new(cond.clone(), AccessVerdict::Allow);
        let deny = Rule::new(cond, AccessVerdict::Deny);
        assert_ne!(allow, deny);
    }
}
