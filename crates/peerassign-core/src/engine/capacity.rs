use super::error::EngineError;
use super::pool;
use super::state::AssignmentMap;
use crate::core::models::group::{ReviewerGroup, RevieweeGroup};
use std::collections::HashSet;
use tracing::warn;

/// Number of distinct reviewee groups, i.e. the most any reviewer can ever be given.
pub fn distinct_reviewees(reviewees: &[RevieweeGroup]) -> usize {
    reviewees.iter().map(|g| g.id).collect::<HashSet<_>>().len()
}

/// Number of slots `pool::build_pool` would allocate.
///
/// # Errors
///
/// [`EngineError::CapacityOverflow`] when the size does not fit in a `usize`.
pub fn pool_size(
    reviewer_count: usize,
    reviewee_count: usize,
    quota: usize,
) -> Result<usize, EngineError> {
    pool::repeats_for(reviewer_count, quota)
        .and_then(|repeats| repeats.checked_mul(reviewee_count))
        .ok_or(EngineError::CapacityOverflow {
            reviewers: reviewer_count,
            reviewees: reviewee_count,
            quota,
        })
}

/// Reviews still needed to bring every reviewer in `reviewers` up to `quota`.
pub fn outstanding_demand<'a>(
    reviewers: impl IntoIterator<Item = &'a ReviewerGroup>,
    assignments: &AssignmentMap,
    quota: usize,
) -> Result<usize, EngineError> {
    let mut reviewer_count = 0usize;
    let mut demand = 0usize;
    for reviewer in reviewers {
        reviewer_count += 1;
        demand = demand
            .checked_add(quota.saturating_sub(assignments.count(reviewer.id)))
            .ok_or(EngineError::CapacityOverflow {
                reviewers: reviewer_count,
                reviewees: 0,
                quota,
            })?;
    }
    Ok(demand)
}

/// Rejects a quota no reviewer could ever reach.
///
/// A reviewer holds each reviewee at most once, so with any reviewers at all the quota
/// must not exceed the number of distinct reviewee groups.
pub fn check_quota(
    reviewer_count: usize,
    reviewees: &[RevieweeGroup],
    quota: usize,
) -> Result<(), EngineError> {
    let distinct = distinct_reviewees(reviewees);
    if reviewer_count > 0 && quota > distinct {
        warn!(quota, reviewees = distinct, "Quota exceeds reviewee count.");
        return Err(EngineError::QuotaExceedsReviewees {
            quota,
            reviewees: distinct,
        });
    }
    Ok(())
}

/// Rejects a pool that cannot cover the outstanding demand.
pub fn check_supply(supply: usize, demand: usize) -> Result<(), EngineError> {
    if supply < demand {
        warn!(supply, demand, "Pool cannot cover the outstanding demand.");
        return Err(EngineError::InsufficientCapacity { supply, demand });
    }
    Ok(())
}

/// Supply and demand of a prospective run, computed without building the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityReport {
    pub reviewers: usize,
    /// Distinct reviewee groups.
    pub reviewees: usize,
    pub quota: usize,
    pub supply: usize,
    pub demand: usize,
}

impl CapacityReport {
    pub fn assess(
        reviewers: &[ReviewerGroup],
        reviewees: &[RevieweeGroup],
        assignments: &AssignmentMap,
        quota: usize,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            reviewers: reviewers.len(),
            reviewees: distinct_reviewees(reviewees),
            quota,
            supply: pool_size(reviewers.len(), reviewees.len(), quota)?,
            demand: outstanding_demand(reviewers, assignments, quota)?,
        })
    }

    /// The same checks an assignment run performs with capacity validation enabled.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.reviewers > 0 && self.quota > self.reviewees {
            return Err(EngineError::QuotaExceedsReviewees {
                quota: self.quota,
                reviewees: self.reviewees,
            });
        }
        if self.demand > 0 {
            check_supply(self.supply, self.demand)?;
        }
        Ok(())
    }

    pub fn is_feasible(&self) -> bool {
        self.validate().is_ok()
    }
}
