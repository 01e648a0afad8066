//! # Workflows Module
//!
//! Top-level entry points for users of the library.
//!
//! - **Random Assignment** ([`assign`]) - pool building, history loading and the assignment
//!   loop, run against an [`AssignmentContext`](crate::engine::context::AssignmentContext)

pub mod assign;
