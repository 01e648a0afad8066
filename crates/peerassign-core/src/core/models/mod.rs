//! Domain models for peer-review assignment.
//!
//! - [`ids`] - Strongly typed identifiers for groups and students
//! - [`group`] - Reviewer and reviewee groups with their student memberships
//! - [`review`] - Existing pairings, gradable artifacts and persisted assignment records

pub mod group;
pub mod ids;
pub mod review;
