//! Per-reviewer search steps used by the assignment loop.
//!
//! - [`forward_search`] - find an eligible reviewee at or after the cursor, swapping it into place
//! - [`backward_repair`] - the fallback when forward search is exhausted

pub mod backward_repair;
pub mod forward_search;
