use super::context::AssignmentContext;
use super::eligibility::ConflictOracle;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::state::RunState;
use super::tasks::{backward_repair, forward_search};
use crate::core::models::group::{ReviewerGroup, RevieweeGroup};
use tracing::{debug, info, instrument};

/// Runs the assignment loop to its fixed point.
///
/// Each pass first prunes reviewers that have reached `quota`, then scans the remaining
/// ones in order. Every reviewer is given the reviewee found by forward search at the
/// running cursor, and the cursor advances by one per reviewer. A reviewer whose forward
/// search comes up empty falls through to backward repair, which ends the run with
/// [`EngineError::UnableToRandomlyAssign`]. Reviews committed before a failure stay
/// committed and remain available in `state.records`.
#[instrument(skip_all, name = "assignment_loop", fields(quota = quota))]
pub fn run<C, O>(
    state: &mut RunState<'_>,
    quota: usize,
    context: &mut C,
    oracle: &O,
    reporter: &ProgressReporter,
) -> Result<(), EngineError>
where
    C: AssignmentContext + ?Sized,
    O: ConflictOracle + ?Sized,
{
    prune(state, quota);

    while !state.eligible.is_empty() {
        state.stats.passes += 1;
        let eligible = state.eligible.len();
        state.stats.eligible_per_pass.push(eligible);
        reporter.report(Progress::PassStart {
            pass: state.stats.passes,
            eligible,
        });
        debug!(
            pass = state.stats.passes,
            eligible,
            cursor = state.cursor,
            "Starting assignment pass."
        );

        for reviewer in state.eligible.snapshot() {
            let cursor = state.cursor;
            let found = forward_search::run(
                reviewer,
                cursor,
                &mut state.pool,
                &state.assignments,
                oracle,
            );

            let reviewee = match found {
                Some(found) => {
                    if found.swapped_from.is_some() {
                        state.stats.swaps += 1;
                    }
                    found.reviewee
                }
                None => backward_repair::run(reviewer, cursor, state)?,
            };

            commit(state, reviewer, reviewee, context)?;
            reporter.report(Progress::Assigned {
                reviewer: reviewer.id,
                reviewee: reviewee.id,
            });

            state.cursor += 1;
        }

        prune(state, quota);
    }

    info!(
        passes = state.stats.passes,
        swaps = state.stats.swaps,
        created = state.records.len(),
        "All reviewer groups have reached their quota."
    );
    Ok(())
}

fn prune(state: &mut RunState<'_>, quota: usize) {
    let removed = state.eligible.prune(&state.assignments, quota);
    if !removed.is_empty() {
        debug!(
            removed = ?removed,
            remaining = state.eligible.len(),
            "Pruned reviewer groups that reached the quota."
        );
    }
}

/// Persists one review through the context and remembers the pairing.
fn commit<C>(
    state: &mut RunState<'_>,
    reviewer: &ReviewerGroup,
    reviewee: &RevieweeGroup,
    context: &mut C,
) -> Result<(), EngineError>
where
    C: AssignmentContext + ?Sized,
{
    let artifact = context
        .latest_artifact(reviewee)
        .map_err(EngineError::context("looking up the latest artifact"))?
        .ok_or(EngineError::MissingArtifact {
            reviewee: reviewee.id,
        })?;

    let record = context
        .create_review(reviewer, reviewee, artifact)
        .map_err(EngineError::context("creating a review"))?;

    if !state.assignments.insert(reviewer.id, reviewee.id) {
        return Err(EngineError::Internal(format!(
            "Pairing of reviewer {} with reviewee {} was committed twice",
            reviewer.id, reviewee.id
        )));
    }
    debug!(reviewer = %reviewer.id, reviewee = %reviewee.id, "Review committed.");
    state.records.push(record);
    Ok(())
}
