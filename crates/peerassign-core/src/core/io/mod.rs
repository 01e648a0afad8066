//! File formats for the assignment engine.
//!
//! - [`roster`] - TOML roster files: reviewer groups, reviewee groups and reviews on record
//! - [`report`] - TOML or CSV reports of the reviews created by a run

pub mod report;
pub mod roster;
