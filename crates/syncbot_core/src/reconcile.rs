//! Three-way set reconciliation.
//!
//! Given the keys that should exist and the keys that do exist, split their
//! union into keys to add, keys to delete, and keys present on both sides
//! ("mods"). A mod is only a candidate: the reconciler never inspects the
//! attributes behind a key, so callers decide whether anything changed.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Output of [`reconcile`]. The three sets are pairwise disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<K: Eq + Hash> {
    /// Present only in the desired set
    pub adds: HashSet<K>,
    /// Present in both sets
    pub mods: HashSet<K>,
    /// Present only in the current set
    pub dels: HashSet<K>,
}

impl<K: Eq + Hash> Default for Reconciliation<K> {
    fn default() -> Self {
        Self {
            adds: HashSet::new(),
            mods: HashSet::new(),
            dels: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash> Reconciliation<K> {
    /// True when nothing needs to be added or deleted.
    pub fn is_converged(&self) -> bool {
        self.adds.is_empty() && self.dels.is_empty()
    }

    /// Total number of keys across all three sets.
    pub fn len(&self) -> usize {
        self.adds.len() + self.mods.len() + self.dels.len()
    }

    /// True when both inputs were empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute adds, mods and dels between `desired` and `current`.
///
/// Each desired key counts +1 and each current key counts -1 in a signed
/// multiplicity map over the union. A net +1 is an add, -1 a delete and 0 a
/// mod candidate. Inputs are sets, so every key appears at most once per side.
///
/// No ordering is implied by the output; use [`sorted`] for stable iteration.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use syncbot_core::reconcile;
///
/// let desired: HashSet<&str> = ["a", "b"].into_iter().collect();
/// let current: HashSet<&str> = ["b", "c"].into_iter().collect();
/// let diff = reconcile(&desired, &current);
///
/// assert_eq!(diff.adds, ["a"].into_iter().collect());
/// assert_eq!(diff.mods, ["b"].into_iter().collect());
/// assert_eq!(diff.dels, ["c"].into_iter().collect());
/// ```
pub fn reconcile<K>(desired: &HashSet<K>, current: &HashSet<K>) -> Reconciliation<K>
where
    K: Eq + Hash + Clone,
{
    let mut status: HashMap<&K, i8> = HashMap::with_capacity(desired.len() + current.len());
    for key in desired {
        *status.entry(key).or_insert(0) += 1;
    }
    for key in current {
        *status.entry(key).or_insert(0) -= 1;
    }

    let mut result = Reconciliation::default();
    for (key, net) in status {
        match net {
            1 => result.adds.insert(key.clone()),
            -1 => result.dels.insert(key.clone()),
            _ => result.mods.insert(key.clone()),
        };
    }
    result
}

/// Drain a set into a sorted vector.
pub fn sorted<K: Ord>(set: HashSet<K>) -> Vec<K> {
    let mut keys: Vec<K> = set.into_iter().collect();
    keys.sort();
    keys
}
