use crate::core::models::group::{ReviewerGroup, RevieweeGroup};
use crate::engine::error::EngineError;
use crate::engine::state::RunState;
use tracing::warn;

/// Fallback for a reviewer whose forward search found nothing.
///
/// A full repair would walk positions `cursor - 1..=0`, find the reviewer holding each
/// position's reviewee, and trade pairings when both resulting pairings are eligible.
/// That trade would have to delete an already persisted review, which the assignment
/// context does not support, so this step always fails and the run ends with
/// [`EngineError::UnableToRandomlyAssign`].
pub fn run<'g>(
    reviewer: &ReviewerGroup,
    cursor: usize,
    state: &RunState<'g>,
) -> Result<&'g RevieweeGroup, EngineError> {
    warn!(
        reviewer = %reviewer.id,
        cursor,
        pool_size = state.pool.len(),
        committed = state.records.len(),
        "Forward search exhausted the pool; no backward repair is available."
    );
    Err(EngineError::UnableToRandomlyAssign {
        reviewer: reviewer.id,
        cursor,
        committed: state.records.len(),
    })
}
