//! # Engine Module
//!
//! The stateful assignment machinery behind [`crate::workflows::assign`].
//!
//! ## Overview
//!
//! A run executes four responsibilities in strict sequence:
//!
//! 1. **Pool building** ([`pool`]) - replicate the reviewee list and shuffle it once
//! 2. **History loading** ([`history`]) - seed the [`state::AssignmentMap`] from reviews on record
//! 3. **Assignment loop** ([`assignment_loop`]) - prune satisfied reviewers, then scan the rest,
//!    giving each one a reviewee by forward search and persisting every success immediately
//! 4. **Eligibility** ([`eligibility`]) - the predicate consulted for every candidate pairing
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Quota, seed and capacity validation settings
//! - **Capacity** ([`capacity`]) - Pool size, outstanding demand and the checks between them
//! - **External Collaborators** ([`context`]) - Roster lookups and persistence, behind a trait
//! - **State Tracking** ([`state`]) - The assignment map and the live eligible-reviewer set
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - The fatal assignment error and collaborator failures
//!
//! All run state is owned by one run and threaded explicitly through each step; nothing is
//! shared between runs. Two runs over overlapping groups must not execute concurrently.

pub mod assignment_loop;
pub mod capacity;
pub mod config;
pub mod context;
pub mod eligibility;
pub mod error;
pub mod history;
pub mod pool;
pub mod progress;
pub mod state;
pub(crate) mod tasks;
