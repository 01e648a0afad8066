use super::ids::{GroupId, StudentId};
use super::review::ArtifactRef;
use std::collections::BTreeSet;

/// A group of students that collectively reviews other groups' work.
///
/// Reviewer groups are created by the grouping subsystem of the peer-review assignment.
/// The engine only reads their identity and membership; assignment counts are tracked
/// in the engine's own working state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerGroup {
    pub id: GroupId,
    pub members: BTreeSet<StudentId>,
}

impl ReviewerGroup {
    pub fn new<I, S>(id: impl Into<GroupId>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StudentId>,
    {
        Self {
            id: id.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if no member of this group is also a member of `reviewee`.
    ///
    /// A reviewer must never review work from a group containing one of its own members.
    pub fn shares_no_students(&self, reviewee: &RevieweeGroup) -> bool {
        self.members.is_disjoint(&reviewee.members)
    }
}

/// A group of students whose submitted work is the subject of review.
///
/// `submission` is the group's current gradable artifact, if it has one. Groups without a
/// submission can still sit in the working pool, but a pairing with them cannot be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevieweeGroup {
    pub id: GroupId,
    pub members: BTreeSet<StudentId>,
    pub submission: Option<ArtifactRef>,
}

impl RevieweeGroup {
    pub fn new<I, S>(id: impl Into<GroupId>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StudentId>,
    {
        let id = id.into();
        Self {
            id,
            members: members.into_iter().map(Into::into).collect(),
            submission: Some(ArtifactRef::for_group(id)),
        }
    }

    pub fn with_submission(mut self, submission: Option<ArtifactRef>) -> Self {
        self.submission = submission;
        self
    }
}
