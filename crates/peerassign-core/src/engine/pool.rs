use super::capacity;
use super::error::EngineError;
use crate::core::models::group::RevieweeGroup;
use crate::core::models::ids::GroupId;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// The shuffled supply of reviewee groups that reviewers draw from.
///
/// After construction slots may only be swapped in place; nothing is ever appended or
/// removed, so indices stay stable for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct WorkingPool<'g> {
    slots: Vec<&'g RevieweeGroup>,
}

impl<'g> WorkingPool<'g> {
    /// A pool with a caller-chosen permutation, for replaying a run deterministically.
    pub fn from_order(slots: Vec<&'g RevieweeGroup>) -> Self {
        Self { slots }
    }

    pub fn get(&self, index: usize) -> Option<&'g RevieweeGroup> {
        self.slots.get(index).copied()
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn ids(&self) -> Vec<GroupId> {
        self.slots.iter().map(|g| g.id).collect()
    }
}

/// How many full copies of the reviewee list go into the pool.
///
/// Kept as `ceil(reviewers * quota / reviewers)`, which reduces to `quota`. There is nothing
/// to supply for zero reviewers. `None` when `reviewers * quota` overflows.
pub fn repeats_for(reviewer_count: usize, quota: usize) -> Option<usize> {
    if reviewer_count == 0 {
        return Some(0);
    }
    reviewer_count
        .checked_mul(quota)
        .map(|demand| demand.div_ceil(reviewer_count))
}

/// Builds the working pool: `repeats_for(reviewer_count, quota)` copies of `reviewees`,
/// concatenated and then permuted once, uniformly at random.
///
/// The pool only covers `reviewer_count * quota` slots when there are at least as many
/// reviewee groups as reviewer groups; callers that care validate capacity separately.
///
/// # Errors
///
/// [`EngineError::CapacityOverflow`] when the pool size does not fit in a `usize`.
#[instrument(level = "debug", skip_all, fields(reviewer_count = reviewer_count, quota = quota))]
pub fn build_pool<'g, R>(
    reviewer_count: usize,
    reviewees: &'g [RevieweeGroup],
    quota: usize,
    rng: &mut R,
) -> Result<WorkingPool<'g>, EngineError>
where
    R: Rng + ?Sized,
{
    let size = capacity::pool_size(reviewer_count, reviewees.len(), quota)?;
    let mut slots = Vec::with_capacity(size);
    while slots.len() < size {
        slots.extend(reviewees.iter());
    }
    slots.shuffle(rng);

    debug!(
        pool_size = slots.len(),
        demand = ?reviewer_count.checked_mul(quota),
        "Working pool built."
    );
    Ok(WorkingPool { slots })
}
