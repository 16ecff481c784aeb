//! Battery membership arithmetic.

use fleet_types::EntityId;
use std::collections::HashSet;

/// Drop repeated ids, keeping the first occurrence.
pub fn dedupe(ids: Vec<EntityId>) -> Vec<EntityId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Difference between the current and requested membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipChange {
    /// In `current` but not `requested`, in `current` order.
    pub removed: Vec<EntityId>,
    /// In `requested` but not `current`, in `requested` order.
    pub added: Vec<EntityId>,
}

impl MembershipChange {
    pub fn between(current: &[EntityId], requested: &[EntityId]) -> Self {
        let current_set: HashSet<_> = current.iter().collect();
        let requested_set: HashSet<_> = requested.iter().collect();
        Self {
            removed: current
                .iter()
                .filter(|id| !requested_set.contains(id))
                .copied()
                .collect(),
            added: requested
                .iter()
                .filter(|id| !current_set.contains(id))
                .copied()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_types::new_entity_id;

    #[test]
    fn test_symmetric_difference() {
        let (a, b, c) = (new_entity_id(), new_entity_id(), new_entity_id());
        let change = MembershipChange::between(&[a, b], &[b, c]);
        assert_eq!(change.removed, vec![a]);
        assert_eq!(change.added, vec![c]);
    }

    #[test]
    fn test_same_set_in_other_order_is_no_change() {
        let (a, b) = (new_entity_id(), new_entity_id());
        assert!(MembershipChange::between(&[a, b], &[b, a]).is_empty());
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let (a, b) = (new_entity_id(), new_entity_id());
        assert_eq!(dedupe(vec![a, b, a, b, a]), vec![a, b]);
    }
}
