//! # PeerAssign Core Library
//!
//! Randomized, conflict-aware assignment of reviewer groups to reviewee groups for peer review.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that the assignment algorithm can be
//! tested in isolation from any roster storage or persistence backend.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ReviewerGroup`, `RevieweeGroup`,
//!   `AssignmentRecord`) and file I/O for roster and report files.
//!
//! - **[`engine`]: The Logic Core.** The stateful assignment machinery: the shuffled
//!   `WorkingPool`, the `AssignmentMap` seeded from history, the eligibility predicate and the
//!   forward-search assignment loop. External collaborators (roster lookups, persistence,
//!   conflict checks) are reached only through the traits in [`engine::context`] and
//!   [`engine::eligibility`].
//!
//! - **[`workflows`]: The Public API.** Ties the `engine` and `core` together into the single
//!   entry point [`workflows::assign::run`].

pub mod core;
pub mod engine;
pub mod workflows;
