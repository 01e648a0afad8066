use super::state::AssignmentMap;
use crate::core::models::group::{ReviewerGroup, RevieweeGroup};
use tracing::trace;

/// Decides whether two groups have a student in common.
///
/// The roster-backed implementation is [`RosterConflicts`]. Any
/// `Fn(&ReviewerGroup, &RevieweeGroup) -> bool` closure is also an oracle, which lets a run
/// be driven by a synthetic conflict graph.
pub trait ConflictOracle {
    fn shares_no_students(&self, reviewer: &ReviewerGroup, reviewee: &RevieweeGroup) -> bool;
}

/// Conflict checks based on the groups' own member lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterConflicts;

impl ConflictOracle for RosterConflicts {
    fn shares_no_students(&self, reviewer: &ReviewerGroup, reviewee: &RevieweeGroup) -> bool {
        reviewer.shares_no_students(reviewee)
    }
}

impl<F> ConflictOracle for F
where
    F: Fn(&ReviewerGroup, &RevieweeGroup) -> bool,
{
    fn shares_no_students(&self, reviewer: &ReviewerGroup, reviewee: &RevieweeGroup) -> bool {
        self(reviewer, reviewee)
    }
}

/// A pairing is eligible when the reviewer has not been given this reviewee yet and the two
/// groups share no students.
pub fn is_eligible<O>(
    reviewer: &ReviewerGroup,
    reviewee: &RevieweeGroup,
    assignments: &AssignmentMap,
    oracle: &O,
) -> bool
where
    O: ConflictOracle + ?Sized,
{
    if assignments.contains(reviewer.id, reviewee.id) {
        trace!(reviewer = %reviewer.id, reviewee = %reviewee.id, "Rejected: already assigned.");
        return false;
    }
    let eligible = oracle.shares_no_students(reviewer, reviewee);
    if !eligible {
        trace!(reviewer = %reviewer.id, reviewee = %reviewee.id, "Rejected: shared student.");
    }
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::GroupId;

    #[test]
    fn fresh_disjoint_pairing_is_eligible() {
        let reviewer = ReviewerGroup::new(1, ["a"]);
        let reviewee = RevieweeGroup::new(2, ["b"]);
        assert!(is_eligible(
            &reviewer,
            &reviewee,
            &AssignmentMap::new(),
            &RosterConflicts
        ));
    }

    #[test]
    fn already_assigned_pairing_is_not_eligible() {
        let reviewer = ReviewerGroup::new(1, ["a"]);
        let reviewee = RevieweeGroup::new(2, ["b"]);
        let mut assignments = AssignmentMap::new();
        assignments.insert(GroupId(1), GroupId(2));

        assert!(!is_eligible(&reviewer, &reviewee, &assignments, &RosterConflicts));
    }

    #[test]
    fn shared_student_is_not_eligible() {
        let reviewer = ReviewerGroup::new(1, ["a", "b"]);
        let reviewee = RevieweeGroup::new(2, ["b"]);
        assert!(!is_eligible(
            &reviewer,
            &reviewee,
            &AssignmentMap::new(),
            &RosterConflicts
        ));
    }

    #[test]
    fn history_is_checked_before_the_oracle() {
        let reviewer = ReviewerGroup::new(1, ["a"]);
        let reviewee = RevieweeGroup::new(2, ["b"]);
        let mut assignments = AssignmentMap::new();
        assignments.insert(GroupId(1), GroupId(2));

        let oracle = |_: &ReviewerGroup, _: &RevieweeGroup| -> bool {
            panic!("oracle must not be consulted for an existing pairing")
        };
        assert!(!is_eligible(&reviewer, &reviewee, &assignments, &oracle));
    }

    #[test]
    fn closures_act_as_oracles() {
        let reviewer = ReviewerGroup::new(1, ["a"]);
        let reviewee = RevieweeGroup::new(2, ["b"]);
        let never = |_: &ReviewerGroup, _: &RevieweeGroup| false;
        assert!(!is_eligible(&reviewer, &reviewee, &AssignmentMap::new(), &never));
    }
}
