//! # Core Module
//!
//! Fundamental data structures shared by the assignment engine and its callers.
//!
//! ## Architecture
//!
//! - **Domain Models** ([`models`]) - Group identities, memberships, artifacts and review records
//! - **File I/O** ([`io`]) - Roster files describing an assignment context, and assignment reports
//!
//! Nothing in this module holds run state; the engine borrows these values read-only for the
//! duration of a run.

pub mod io;
pub mod models;
