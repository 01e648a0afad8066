use super::ids::GroupId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to the gradable artifact (the latest result of a reviewee's current submission).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(pub String);

impl ArtifactRef {
    pub fn for_group(id: GroupId) -> Self {
        Self(format!("group-{}", id))
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A (reviewer, reviewee) pairing that is already on record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewPairing {
    pub reviewer: GroupId,
    pub reviewee: GroupId,
}

impl ReviewPairing {
    pub fn new(reviewer: impl Into<GroupId>, reviewee: impl Into<GroupId>) -> Self {
        Self {
            reviewer: reviewer.into(),
            reviewee: reviewee.into(),
        }
    }
}

/// A persisted peer review: a reviewer group linked to a reviewee's gradable artifact.
///
/// Records are created once per successful pairing and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub reviewer: GroupId,
    pub reviewee: GroupId,
    pub artifact: ArtifactRef,
}

impl AssignmentRecord {
    pub fn pairing(&self) -> ReviewPairing {
        ReviewPairing {
            reviewer: self.reviewer,
            reviewee: self.reviewee,
        }
    }
}
