use crate::core::models::group::{ReviewerGroup, RevieweeGroup};
use crate::core::models::ids::{GroupId, StudentId};
use crate::core::models::review::{ArtifactRef, AssignmentRecord, ReviewPairing};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Duplicate {kind} group id {id}")]
    DuplicateGroup { kind: &'static str, id: GroupId },
    #[error("Review on record references unknown {kind} group {id}")]
    UnknownGroup { kind: &'static str, id: GroupId },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct FileReviewer {
    id: u64,
    #[serde(default)]
    members: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileReviewee {
    id: u64,
    #[serde(default)]
    members: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    submission: Option<String>,
    #[serde(default = "default_submitted", skip_serializing_if = "is_true")]
    submitted: bool,
}

fn default_submitted() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct FileReview {
    reviewer: u64,
    reviewee: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifact: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct RosterFile {
    #[serde(default)]
    reviewers: Vec<FileReviewer>,
    #[serde(default)]
    reviewees: Vec<FileReviewee>,
    #[serde(default)]
    reviews: Vec<FileReview>,
}

/// An in-memory peer-review assignment context: both group lists and the reviews on record.
///
/// A roster is usually loaded from a TOML file:
///
/// ```toml
/// [[reviewers]]
/// id = 1
/// members = ["alice", "bob"]
///
/// [[reviewees]]
/// id = 10
/// members = ["carol"]
/// submission = "result-10"
///
/// [[reviews]]
/// reviewer = 1
/// reviewee = 10
/// ```
///
/// Reviewees without a `submission` get a default artifact reference; `submitted = false`
/// marks a group that has nothing to review.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    reviewers: Vec<ReviewerGroup>,
    reviewees: Vec<RevieweeGroup>,
    reviews: Vec<AssignmentRecord>,
}

impl Roster {
    pub fn new(reviewers: Vec<ReviewerGroup>, reviewees: Vec<RevieweeGroup>) -> Self {
        Self {
            reviewers,
            reviewees,
            reviews: Vec::new(),
        }
    }

    /// Adds reviews on record, resolving each pairing's artifact from the reviewee's submission.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::UnknownGroup`] if a pairing names a group not in the roster.
    pub fn with_reviews(
        mut self,
        pairings: impl IntoIterator<Item = ReviewPairing>,
    ) -> Result<Self, RosterError> {
        for pairing in pairings {
            let artifact = self.artifact_for(pairing.reviewee, None)?;
            self.reviews.push(AssignmentRecord {
                reviewer: pairing.reviewer,
                reviewee: pairing.reviewee,
                artifact,
            });
        }
        self.check_review_references()?;
        Ok(self)
    }

    pub fn reviewers(&self) -> &[ReviewerGroup] {
        &self.reviewers
    }

    pub fn reviewees(&self) -> &[RevieweeGroup] {
        &self.reviewees
    }

    pub fn reviews(&self) -> &[AssignmentRecord] {
        &self.reviews
    }

    pub fn reviewee(&self, id: GroupId) -> Option<&RevieweeGroup> {
        self.reviewees.iter().find(|g| g.id == id)
    }

    pub fn reviewer(&self, id: GroupId) -> Option<&ReviewerGroup> {
        self.reviewers.iter().find(|g| g.id == id)
    }

    pub fn push_review(&mut self, record: AssignmentRecord) {
        self.reviews.push(record);
    }

    pub fn read_from(reader: &mut impl Read) -> Result<Self, RosterError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_toml_str(&content)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        debug!("Loading roster from {:?}", path.as_ref());
        let mut file = File::open(path)?;
        Self::read_from(&mut file)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RosterError> {
        let file: RosterFile = toml::from_str(content)?;

        let mut seen = HashSet::new();
        let reviewers = file
            .reviewers
            .into_iter()
            .map(|r| {
                let id = GroupId(r.id);
                if !seen.insert(id) {
                    return Err(RosterError::DuplicateGroup {
                        kind: "reviewer",
                        id,
                    });
                }
                Ok(ReviewerGroup {
                    id,
                    members: r.members.into_iter().map(StudentId).collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        seen.clear();
        let reviewees = file
            .reviewees
            .into_iter()
            .map(|r| {
                let id = GroupId(r.id);
                if !seen.insert(id) {
                    return Err(RosterError::DuplicateGroup {
                        kind: "reviewee",
                        id,
                    });
                }
                let submission = if r.submitted {
                    Some(
                        r.submission
                            .map(ArtifactRef)
                            .unwrap_or_else(|| ArtifactRef::for_group(id)),
                    )
                } else {
                    None
                };
                Ok(RevieweeGroup {
                    id,
                    members: r.members.into_iter().map(StudentId).collect(),
                    submission,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut roster = Self {
            reviewers,
            reviewees,
            reviews: Vec::with_capacity(file.reviews.len()),
        };
        for review in file.reviews {
            let reviewee = GroupId(review.reviewee);
            let artifact = roster.artifact_for(reviewee, review.artifact.map(ArtifactRef))?;
            roster.reviews.push(AssignmentRecord {
                reviewer: GroupId(review.reviewer),
                reviewee,
                artifact,
            });
        }
        roster.check_review_references()?;

        debug!(
            reviewers = roster.reviewers.len(),
            reviewees = roster.reviewees.len(),
            reviews = roster.reviews.len(),
            "Roster parsed."
        );
        Ok(roster)
    }

    pub fn to_toml_string(&self) -> Result<String, RosterError> {
        let file = RosterFile {
            reviewers: self
                .reviewers
                .iter()
                .map(|g| FileReviewer {
                    id: g.id.0,
                    members: g.members.iter().map(|s| s.0.clone()).collect(),
                })
                .collect(),
            reviewees: self
                .reviewees
                .iter()
                .map(|g| FileReviewee {
                    id: g.id.0,
                    members: g.members.iter().map(|s| s.0.clone()).collect(),
                    submission: g.submission.as_ref().map(|a| a.0.clone()),
                    submitted: g.submission.is_some(),
                })
                .collect(),
            reviews: self
                .reviews
                .iter()
                .map(|r| FileReview {
                    reviewer: r.reviewer.0,
                    reviewee: r.reviewee.0,
                    artifact: Some(r.artifact.0.clone()),
                })
                .collect(),
        };
        Ok(toml::to_string(&file)?)
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), RosterError> {
        writer.write_all(self.to_toml_string()?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), RosterError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
    }

    fn artifact_for(
        &self,
        reviewee: GroupId,
        explicit: Option<ArtifactRef>,
    ) -> Result<ArtifactRef, RosterError> {
        if let Some(artifact) = explicit {
            return Ok(artifact);
        }
        let group = self.reviewee(reviewee).ok_or(RosterError::UnknownGroup {
            kind: "reviewee",
            id: reviewee,
        })?;
        Ok(group
            .submission
            .clone()
            .unwrap_or_else(|| ArtifactRef::for_group(reviewee)))
    }

    fn check_review_references(&self) -> Result<(), RosterError> {
        for review in &self.reviews {
            if self.reviewer(review.reviewer).is_none() {
                return Err(RosterError::UnknownGroup {
                    kind: "reviewer",
                    id: review.reviewer,
                });
            }
            if self.reviewee(review.reviewee).is_none() {
                return Err(RosterError::UnknownGroup {
                    kind: "reviewee",
                    id: review.reviewee,
                });
            }
        }
        Ok(())
    }
}
