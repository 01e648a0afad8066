use crate::core::io::roster::Roster;
use crate::core::models::group::{ReviewerGroup, RevieweeGroup};
use crate::core::models::review::{ArtifactRef, AssignmentRecord, ReviewPairing};
use std::convert::Infallible;

/// The external collaborators an assignment run depends on.
///
/// An implementation is scoped to one peer-review assignment: it lists that assignment's
/// reviewer groups, the reviewee groups of its parent assignment, the reviews already on
/// record, and persists new reviews. The engine calls [`create_review`](Self::create_review)
/// synchronously once per successful pairing; there is no batching and no rollback.
pub trait AssignmentContext {
    type Error: std::error::Error + Send + Sync + 'static;

    fn reviewer_groups(&self) -> Result<Vec<ReviewerGroup>, Self::Error>;

    fn reviewee_groups(&self) -> Result<Vec<RevieweeGroup>, Self::Error>;

    fn existing_reviews(&self) -> Result<Vec<ReviewPairing>, Self::Error>;

    /// The gradable artifact a review of `reviewee` should be linked to, if it has one.
    fn latest_artifact(&self, reviewee: &RevieweeGroup)
    -> Result<Option<ArtifactRef>, Self::Error>;

    fn create_review(
        &mut self,
        reviewer: &ReviewerGroup,
        reviewee: &RevieweeGroup,
        artifact: ArtifactRef,
    ) -> Result<AssignmentRecord, Self::Error>;
}

impl AssignmentContext for Roster {
    type Error = Infallible;

    fn reviewer_groups(&self) -> Result<Vec<ReviewerGroup>, Self::Error> {
        Ok(self.reviewers().to_vec())
    }

    fn reviewee_groups(&self) -> Result<Vec<RevieweeGroup>, Self::Error> {
        Ok(self.reviewees().to_vec())
    }

    fn existing_reviews(&self) -> Result<Vec<ReviewPairing>, Self::Error> {
        Ok(self.reviews().iter().map(AssignmentRecord::pairing).collect())
    }

    fn latest_artifact(
        &self,
        reviewee: &RevieweeGroup,
    ) -> Result<Option<ArtifactRef>, Self::Error> {
        Ok(reviewee.submission.clone())
    }

    fn create_review(
        &mut self,
        reviewer: &ReviewerGroup,
        reviewee: &RevieweeGroup,
        artifact: ArtifactRef,
    ) -> Result<AssignmentRecord, Self::Error> {
        let record = AssignmentRecord {
            reviewer: reviewer.id,
            reviewee: reviewee.id,
            artifact,
        };
        self.push_review(record.clone());
        Ok(record)
    }
}
