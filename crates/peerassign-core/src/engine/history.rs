use super::state::AssignmentMap;
use crate::core::models::review::ReviewPairing;
use tracing::debug;

/// Seeds an [`AssignmentMap`] from the reviews already on record.
///
/// Loading is idempotent: duplicate pairings, or the same history loaded twice, yield the
/// same map as loading it once.
pub fn load_history(existing: &[ReviewPairing]) -> AssignmentMap {
    let mut assignments = AssignmentMap::new();
    extend_history(&mut assignments, existing);
    assignments
}

pub fn extend_history(assignments: &mut AssignmentMap, existing: &[ReviewPairing]) {
    let mut duplicates = 0usize;
    for pairing in existing {
        if !assignments.insert(pairing.reviewer, pairing.reviewee) {
            duplicates += 1;
        }
    }
    debug!(
        pairings = existing.len(),
        duplicates, "Existing reviews loaded into assignment map."
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::GroupId;

    fn history() -> Vec<ReviewPairing> {
        vec![
            ReviewPairing::new(1, 10),
            ReviewPairing::new(1, 11),
            ReviewPairing::new(2, 10),
        ]
    }

    #[test]
    fn history_groups_reviewees_by_reviewer() {
        let map = load_history(&history());
        assert_eq!(map.count(GroupId(1)), 2);
        assert_eq!(map.count(GroupId(2)), 1);
        assert!(map.contains(GroupId(2), GroupId(10)));
    }

    #[test]
    fn loading_twice_equals_loading_once() {
        let once = load_history(&history());
        let mut twice = load_history(&history());
        extend_history(&mut twice, &history());
        assert_eq!(once, twice);
    }

    #[test]
    fn duplicate_records_are_absorbed() {
        let mut records = history();
        records.push(ReviewPairing::new(1, 10));
        assert_eq!(load_history(&records), load_history(&history()));
    }

    #[test]
    fn empty_history_is_an_empty_map() {
        assert_eq!(load_history(&[]).total(), 0);
    }
}
