use crate::core::models::ids::GroupId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "Unable to randomly assign reviewer group {reviewer}: no eligible reviewee remains in the pool from position {cursor} ({committed} review(s) already committed)"
    )]
    UnableToRandomlyAssign {
        reviewer: GroupId,
        cursor: usize,
        committed: usize,
    },

    #[error("Insufficient reviewee capacity: the pool supplies {supply} slot(s) but {demand} assignment(s) are required")]
    InsufficientCapacity { supply: usize, demand: usize },

    #[error("A quota of {quota} cannot be met with only {reviewees} distinct reviewee group(s)")]
    QuotaExceedsReviewees { quota: usize, reviewees: usize },

    #[error(
        "Pool for {reviewers} reviewer group(s), {reviewees} reviewee group(s) and quota {quota} does not fit in memory"
    )]
    CapacityOverflow {
        reviewers: usize,
        reviewees: usize,
        quota: usize,
    },

    #[error("Reviewee group {reviewee} has no gradable submission to review")]
    MissingArtifact { reviewee: GroupId },

    #[error("Assignment context failed while {operation}: {source}")]
    Context {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    pub(crate) fn context<E>(operation: &'static str) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |source| Self::Context {
            operation,
            source: Box::new(source),
        }
    }

    /// Returns `true` for the fatal "no legal pairing" failure of the assignment loop.
    pub fn is_unable_to_assign(&self) -> bool {
        matches!(self, Self::UnableToRandomlyAssign { .. })
    }
}
