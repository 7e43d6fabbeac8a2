//! Exact enumeration of one component's satisfying mine assignments.
//!
//! Depth-first backtracking over the component's 0/1 variables with
//! feasibility pruning after every assignment. Worst case is 2^n over n
//! variables, so callers gate n (see the solver's `k_max`).

use std::collections::HashMap;

use crate::frontier::Constraint;

/// Result of enumerating a component.
#[derive(Clone, Debug)]
pub struct Enumeration {
    /// Mine probability per local unknown index.
    pub probabilities: HashMap<usize, f64>,
    /// Number of satisfying assignments. Zero means the component is
    /// inconsistent, and every probability is reported as 0.5.
    pub total_solutions: u64,
}

/// A constraint compiled to positions within the component's variable
/// ordering.
struct Compiled {
    positions: Vec<usize>,
    remaining: i32,
}

struct Search {
    assignment: Vec<u8>,
    mine_counts: Vec<u64>,
    total_solutions: u64,
}

/// Enumerate all mine assignments of a component satisfying every
/// constraint exactly, and derive per-variable probabilities.
///
/// `unknowns` are the component's local indices in ascending order;
/// enumeration is lexicographic over them (value 0 tried before 1), so
/// the result is deterministic.
pub fn enumerate_component(constraints: &[Constraint], unknowns: &[usize]) -> Enumeration {
    let position_of: HashMap<usize, usize> = unknowns
        .iter()
        .enumerate()
        .map(|(pos, &idx)| (idx, pos))
        .collect();
    let compiled: Vec<Compiled> = constraints
        .iter()
        .map(|c| Compiled {
            positions: c
                .scope
                .iter_ones()
                .filter_map(|idx| position_of.get(&idx).copied())
                .collect(),
            remaining: c.remaining,
        })
        .collect();

    let mut search = Search {
        assignment: vec![0; unknowns.len()],
        mine_counts: vec![0; unknowns.len()],
        total_solutions: 0,
    };
    dfs(&compiled, 0, &mut search);

    let probabilities = unknowns
        .iter()
        .enumerate()
        .map(|(pos, &idx)| {
            let p = if search.total_solutions > 0 {
                search.mine_counts[pos] as f64 / search.total_solutions as f64
            } else {
                0.5
            };
            (idx, p)
        })
        .collect();

    Enumeration {
        probabilities,
        total_solutions: search.total_solutions,
    }
}

fn dfs(constraints: &[Compiled], pos: usize, search: &mut Search) {
    if pos == search.assignment.len() {
        if satisfies_all(constraints, &search.assignment) {
            search.total_solutions += 1;
            for (p, &value) in search.assignment.iter().enumerate() {
                if value == 1 {
                    search.mine_counts[p] += 1;
                }
            }
        }
        return;
    }

    for value in [0u8, 1] {
        search.assignment[pos] = value;
        if feasible(constraints, &search.assignment, pos) {
            dfs(constraints, pos + 1, search);
        }
    }
    // Stale values past `pos` are ignored by the feasibility check.
    search.assignment[pos] = 0;
}

/// Whether the partial assignment through `pos` can still satisfy every
/// constraint: prune when a scope is already over budget, or too few
/// unassigned variables remain to reach the budget.
fn feasible(constraints: &[Compiled], assignment: &[u8], pos: usize) -> bool {
    for c in constraints {
        let mut assigned = 0i32;
        let mut unassigned = 0i32;
        for &p in &c.positions {
            if p <= pos {
                assigned += assignment[p] as i32;
            } else {
                unassigned += 1;
            }
        }
        if assigned > c.remaining || assigned + unassigned < c.remaining {
            return false;
        }
    }
    true
}

fn satisfies_all(constraints: &[Compiled], assignment: &[u8]) -> bool {
    constraints.iter().all(|c| {
        let sum: i32 = c.positions.iter().map(|&p| assignment[p] as i32).sum();
        sum == c.remaining
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::ScopeMask;

    fn constraint(indices: &[usize], remaining: i32) -> Constraint {
        Constraint {
            origin: (0, 0),
            scope: ScopeMask::from_indices(indices),
            remaining,
        }
    }

    #[test]
    fn one_mine_in_two_cells_splits_evenly() {
        let result = enumerate_component(&[constraint(&[0, 1], 1)], &[0, 1]);
        assert_eq!(result.total_solutions, 2);
        assert_eq!(result.probabilities[&0], 0.5);
        assert_eq!(result.probabilities[&1], 0.5);
    }

    #[test]
    fn forced_mine_and_forced_safe() {
        let result = enumerate_component(&[constraint(&[0], 1)], &[0]);
        assert_eq!(result.total_solutions, 1);
        assert_eq!(result.probabilities[&0], 1.0);

        let result = enumerate_component(&[constraint(&[0], 0)], &[0]);
        assert_eq!(result.total_solutions, 1);
        assert_eq!(result.probabilities[&0], 0.0);
    }

    #[test]
    fn overlapping_constraints_pin_variables() {
        // x0+x1+x2 = 2 and x1+x2+x3 = 1 force x0 = 1 and x3 = 0.
        let constraints = [constraint(&[0, 1, 2], 2), constraint(&[1, 2, 3], 1)];
        let result = enumerate_component(&constraints, &[0, 1, 2, 3]);
        assert_eq!(result.total_solutions, 2);
        assert_eq!(result.probabilities[&0], 1.0);
        assert_eq!(result.probabilities[&3], 0.0);
        assert_eq!(result.probabilities[&1], 0.5);
        assert_eq!(result.probabilities[&2], 0.5);
    }

    #[test]
    fn infeasible_component_reports_zero_solutions() {
        let result = enumerate_component(&[constraint(&[0, 1], 3)], &[0, 1]);
        assert_eq!(result.total_solutions, 0);
        assert_eq!(result.probabilities[&0], 0.5);
        assert_eq!(result.probabilities[&1], 0.5);

        let result = enumerate_component(&[constraint(&[0, 1], -1)], &[0, 1]);
        assert_eq!(result.total_solutions, 0);
    }

    #[test]
    fn probabilities_sum_to_expected_mines() {
        // One constraint: expected mines across solutions equals its
        // remaining.
        let constraints = [constraint(&[0, 1, 2, 3], 2)];
        let result = enumerate_component(&constraints, &[0, 1, 2, 3]);
        assert_eq!(result.total_solutions, 6);
        let sum: f64 = result.probabilities.values().sum();
        assert!((sum - 2.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let constraints = [constraint(&[0, 1, 2], 1), constraint(&[2, 3], 1)];
        let a = enumerate_component(&constraints, &[0, 1, 2, 3]);
        let b = enumerate_component(&constraints, &[0, 1, 2, 3]);
        assert_eq!(a.total_solutions, b.total_solutions);
        assert_eq!(a.probabilities, b.probabilities);
    }
}
