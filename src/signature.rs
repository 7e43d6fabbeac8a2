//! Canonical component fingerprints for the enumeration cache.

use crate::frontier::{Constraint, ScopeMask};

/// Order-invariant fingerprint of a component: its `(scope, remaining)`
/// pairs in ascending order. Variable indices are taken as-is, so the
/// same geometry re-extracted from an unchanged board hashes the same,
/// while relabeled-but-isomorphic components do not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pairs: Vec<(ScopeMask, i32)>,
}

/// Compute the signature of a component's constraint set.
pub fn component_signature(constraints: &[Constraint]) -> Signature {
    let mut pairs: Vec<(ScopeMask, i32)> = constraints
        .iter()
        .map(|c| (c.scope.clone(), c.remaining))
        .collect();
    pairs.sort();
    Signature { pairs }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint(indices: &[usize], remaining: i32) -> Constraint {
        Constraint {
            origin: (0, 0),
            scope: ScopeMask::from_indices(indices),
            remaining,
        }
    }

    #[test]
    fn constraint_order_does_not_matter() {
        let a = constraint(&[0, 1], 1);
        let b = constraint(&[1, 2, 3], 2);
        assert_eq!(
            component_signature(&[a.clone(), b.clone()]),
            component_signature(&[b, a])
        );
    }

    #[test]
    fn origin_does_not_matter() {
        let mut a = constraint(&[0, 1], 1);
        let mut b = constraint(&[0, 1], 1);
        a.origin = (3, 3);
        b.origin = (7, 1);
        assert_eq!(component_signature(&[a]), component_signature(&[b]));
    }

    #[test]
    fn remaining_distinguishes_signatures() {
        let a = constraint(&[0, 1], 1);
        let b = constraint(&[0, 1], 2);
        assert_ne!(component_signature(&[a]), component_signature(&[b]));
    }

    #[test]
    fn scope_distinguishes_signatures() {
        let a = constraint(&[0, 1], 1);
        let b = constraint(&[0, 2], 1);
        assert_ne!(component_signature(&[a]), component_signature(&[b]));
    }
}
