//! Deterministic inference rules: SINGLE and SUBSET.
//!
//! These rules are sound but not complete; the enumerator covers what
//! they miss on small components.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::frontier::Constraint;

/// How a move's certainty was established.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// One constraint pins its whole scope (all safe or all mines).
    Single,
    /// Set difference of two nested constraints.
    Subset,
    /// Full enumeration of a small component.
    Exact,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Single => write!(f, "SINGLE"),
            Rule::Subset => write!(f, "SUBSET"),
            Rule::Exact => write!(f, "EXACT"),
        }
    }
}

/// A certain move: every cell in `cells` is safe, or every cell is a
/// mine.
#[derive(Clone, Debug)]
pub struct Move {
    pub cells: BTreeSet<(usize, usize)>,
    pub is_mine: bool,
    pub rule: Rule,
    pub explanation: String,
}

/// SINGLE rule over each constraint: remaining 0 means the whole scope
/// is safe; remaining equal to the scope size means it is all mines.
pub fn apply_singles(constraints: &[Constraint], unknowns: &[(usize, usize)]) -> Vec<Move> {
    let mut moves = Vec::new();

    for c in constraints {
        let popcount = c.scope.count_ones();

        if c.remaining == 0 {
            moves.push(Move {
                cells: c.scope.to_cells(unknowns),
                is_mine: false,
                rule: Rule::Single,
                explanation: format!(
                    "SINGLE at {:?}: remaining = 0, all unknown neighbors safe",
                    c.origin
                ),
            });
        } else if c.remaining > 0 && c.remaining as usize == popcount {
            moves.push(Move {
                cells: c.scope.to_cells(unknowns),
                is_mine: true,
                rule: Rule::Single,
                explanation: format!(
                    "SINGLE at {:?}: remaining = {} = scope size, all unknown neighbors mines",
                    c.origin, c.remaining
                ),
            });
        }
    }
    moves
}

/// SUBSET rule over each strictly nested pair: the superset's extra
/// cells are all safe when the remainders match, all mines when the
/// remainder gap equals the extra cell count.
pub fn apply_subset(constraints: &[Constraint], unknowns: &[(usize, usize)]) -> Vec<Move> {
    let mut moves = Vec::new();

    for i in 0..constraints.len() {
        for j in (i + 1)..constraints.len() {
            let (sub, sup) = if constraints[i].scope.is_subset(&constraints[j].scope) {
                (&constraints[i], &constraints[j])
            } else if constraints[j].scope.is_subset(&constraints[i].scope) {
                (&constraints[j], &constraints[i])
            } else {
                continue;
            };

            let diff = sup.scope.and_not(&sub.scope);
            if diff.is_empty() {
                continue;
            }
            let diff_popcount = diff.count_ones();

            if sup.remaining == sub.remaining {
                moves.push(Move {
                    cells: diff.to_cells(unknowns),
                    is_mine: false,
                    rule: Rule::Subset,
                    explanation: format!(
                        "SUBSET: {:?} inside {:?} with equal remaining, difference safe",
                        sub.origin, sup.origin
                    ),
                });
            } else if sup.remaining - sub.remaining == diff_popcount as i32 {
                moves.push(Move {
                    cells: diff.to_cells(unknowns),
                    is_mine: true,
                    rule: Rule::Subset,
                    explanation: format!(
                        "SUBSET: {:?} inside {:?} with remaining gap {} = difference size, difference mines",
                        sub.origin,
                        sup.origin,
                        sup.remaining - sub.remaining
                    ),
                });
            }
        }
    }
    moves
}

/// All certain moves from both rules: singles first, then subsets,
/// deduplicated by (cells, is_mine) with the first occurrence winning.
pub fn find_certain_moves(constraints: &[Constraint], unknowns: &[(usize, usize)]) -> Vec<Move> {
    let mut moves = apply_singles(constraints, unknowns);
    moves.extend(apply_subset(constraints, unknowns));

    let mut seen: HashSet<(Vec<(usize, usize)>, bool)> = HashSet::new();
    moves
        .into_iter()
        .filter(|m| seen.insert((m.cells.iter().copied().collect(), m.is_mine)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::ScopeMask;

    fn constraint(origin: (usize, usize), indices: &[usize], remaining: i32) -> Constraint {
        Constraint {
            origin,
            scope: ScopeMask::from_indices(indices),
            remaining,
        }
    }

    // Local indices 0..4 map to a row of cells.
    fn unknowns() -> Vec<(usize, usize)> {
        vec![(0, 1), (1, 1), (2, 1), (3, 1)]
    }

    #[test]
    fn single_zero_remaining_is_all_safe() {
        let moves = apply_singles(&[constraint((4, 5), &[0], 0)], &unknowns());
        assert_eq!(moves.len(), 1);
        assert!(!moves[0].is_mine);
        assert_eq!(moves[0].rule, Rule::Single);
        assert_eq!(moves[0].cells, BTreeSet::from([(0, 1)]));
    }

    #[test]
    fn single_full_remaining_is_all_mines() {
        let moves = apply_singles(&[constraint((4, 5), &[0, 1], 2)], &unknowns());
        assert_eq!(moves.len(), 1);
        assert!(moves[0].is_mine);
        assert_eq!(moves[0].cells, BTreeSet::from([(0, 1), (1, 1)]));
    }

    #[test]
    fn single_partial_remaining_emits_nothing() {
        let moves = apply_singles(&[constraint((4, 5), &[0, 1, 2], 1)], &unknowns());
        assert!(moves.is_empty());
    }

    #[test]
    fn subset_equal_remaining_clears_difference() {
        let a = constraint((0, 0), &[0, 1], 1);
        let b = constraint((1, 0), &[0, 1, 2, 3], 1);
        let moves = apply_subset(&[a, b], &unknowns());
        assert_eq!(moves.len(), 1);
        assert!(!moves[0].is_mine);
        assert_eq!(moves[0].rule, Rule::Subset);
        assert_eq!(moves[0].cells, BTreeSet::from([(2, 1), (3, 1)]));
    }

    #[test]
    fn subset_remaining_gap_mines_difference() {
        let a = constraint((0, 0), &[0, 1], 1);
        let b = constraint((1, 0), &[0, 1, 2, 3], 3);
        let moves = apply_subset(&[a, b], &unknowns());
        assert_eq!(moves.len(), 1);
        assert!(moves[0].is_mine);
        assert_eq!(moves[0].cells, BTreeSet::from([(2, 1), (3, 1)]));
    }

    #[test]
    fn subset_skips_non_nested_pairs() {
        let a = constraint((0, 0), &[0, 1], 1);
        let b = constraint((1, 0), &[1, 2], 1);
        assert!(apply_subset(&[a, b], &unknowns()).is_empty());
    }

    #[test]
    fn subset_skips_identical_scopes() {
        let a = constraint((0, 0), &[0, 1], 1);
        let b = constraint((1, 0), &[0, 1], 1);
        assert!(apply_subset(&[a, b], &unknowns()).is_empty());
    }

    #[test]
    fn moves_are_deduplicated_first_wins() {
        // Two constraints with the same scope and remaining 0 produce
        // the same safe move; only the first survives.
        let a = constraint((0, 0), &[0, 1], 0);
        let b = constraint((1, 0), &[0, 1], 0);
        let moves = find_certain_moves(&[a, b], &unknowns());
        assert_eq!(moves.len(), 1);
        assert!(moves[0].explanation.contains("(0, 0)"));
    }

    #[test]
    fn singles_come_before_subsets() {
        let single = constraint((0, 0), &[0], 1);
        let sub = constraint((1, 0), &[1, 2], 1);
        let sup = constraint((2, 0), &[1, 2, 3], 1);
        let moves = find_certain_moves(&[sub.clone(), sup.clone(), single], &unknowns());
        assert_eq!(moves[0].rule, Rule::Single);
        assert!(moves[1..].iter().all(|m| m.rule == Rule::Subset));
    }
}
