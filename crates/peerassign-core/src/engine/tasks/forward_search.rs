use crate::core::models::group::{ReviewerGroup, RevieweeGroup};
use crate::engine::eligibility::{ConflictOracle, is_eligible};
use crate::engine::pool::WorkingPool;
use crate::engine::state::AssignmentMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy)]
pub struct ForwardMatch<'g> {
    pub reviewee: &'g RevieweeGroup,
    /// Pool position the reviewee was swapped in from, if it was not already at the cursor.
    pub swapped_from: Option<usize>,
}

/// Looks for an eligible reviewee for `reviewer` at `cursor` or later in the pool.
///
/// The slot at `cursor` is used as-is when eligible. Otherwise positions `cursor + 1..`
/// are scanned in order and the first eligible one is swapped into `cursor`. Returns
/// `None` when no eligible reviewee exists anywhere in `cursor..pool.len()`, including
/// when the cursor has run off the end of the pool.
pub fn run<'g, O>(
    reviewer: &ReviewerGroup,
    cursor: usize,
    pool: &mut WorkingPool<'g>,
    assignments: &AssignmentMap,
    oracle: &O,
) -> Option<ForwardMatch<'g>>
where
    O: ConflictOracle + ?Sized,
{
    let at_cursor = pool.get(cursor)?;
    if is_eligible(reviewer, at_cursor, assignments, oracle) {
        trace!(reviewer = %reviewer.id, reviewee = %at_cursor.id, cursor, "Cursor slot is eligible.");
        return Some(ForwardMatch {
            reviewee: at_cursor,
            swapped_from: None,
        });
    }

    for candidate_idx in (cursor + 1)..pool.len() {
        let Some(candidate) = pool.get(candidate_idx) else {
            break;
        };
        if is_eligible(reviewer, candidate, assignments, oracle) {
            pool.swap(cursor, candidate_idx);
            debug!(
                reviewer = %reviewer.id,
                reviewee = %candidate.id,
                from = candidate_idx,
                to = cursor,
                "Swapped eligible reviewee into cursor slot."
            );
            return Some(ForwardMatch {
                reviewee: candidate,
                swapped_from: Some(candidate_idx),
            });
        }
    }

    None
}
