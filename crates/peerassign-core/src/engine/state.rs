use super::capacity;
use super::error::EngineError;
use super::pool::WorkingPool;
use crate::core::models::group::ReviewerGroup;
use crate::core::models::ids::GroupId;
use crate::core::models::review::AssignmentRecord;
use std::collections::{HashMap, HashSet};

/// Reviewer id -> set of reviewee ids already assigned to it.
///
/// Seeded from the reviews on record and grown as the run commits new reviews. Set
/// semantics absorb duplicates, so no (reviewer, reviewee) pair is ever counted twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentMap {
    assigned: HashMap<GroupId, HashSet<GroupId>>,
}

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pairing. Returns `false` if it was already present.
    pub fn insert(&mut self, reviewer: GroupId, reviewee: GroupId) -> bool {
        self.assigned.entry(reviewer).or_default().insert(reviewee)
    }

    pub fn contains(&self, reviewer: GroupId, reviewee: GroupId) -> bool {
        self.assigned
            .get(&reviewer)
            .is_some_and(|reviewees| reviewees.contains(&reviewee))
    }

    /// Number of distinct reviewees assigned to `reviewer`.
    pub fn count(&self, reviewer: GroupId) -> usize {
        self.assigned.get(&reviewer).map_or(0, HashSet::len)
    }

    /// Total number of distinct pairings.
    pub fn total(&self) -> usize {
        self.assigned.values().map(HashSet::len).sum()
    }
}

/// The reviewer groups still under quota, in their original order.
///
/// Membership only ever shrinks: a reviewer leaves once its assigned count reaches the
/// quota and never re-enters.
#[derive(Debug, Clone)]
pub struct EligibleReviewers<'g> {
    reviewers: Vec<&'g ReviewerGroup>,
}

impl<'g> EligibleReviewers<'g> {
    pub fn new(reviewers: &'g [ReviewerGroup]) -> Self {
        Self {
            reviewers: reviewers.iter().collect(),
        }
    }

    /// Drops every reviewer whose assigned count is at least `quota`, returning their ids.
    pub fn prune(&mut self, assignments: &AssignmentMap, quota: usize) -> Vec<GroupId> {
        let mut removed = Vec::new();
        self.reviewers.retain(|reviewer| {
            let keep = assignments.count(reviewer.id) < quota;
            if !keep {
                removed.push(reviewer.id);
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.reviewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty()
    }

    /// A copy of the current membership, in scan order.
    pub fn snapshot(&self) -> Vec<&'g ReviewerGroup> {
        self.reviewers.clone()
    }

    pub fn ids(&self) -> Vec<GroupId> {
        self.reviewers.iter().map(|r| r.id).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of outer passes over the eligible set.
    pub passes: usize,
    /// Number of forward-search swaps performed on the pool.
    pub swaps: usize,
    pub pool_size: usize,
    /// Size of the eligible set at the start of each pass. Never increases.
    pub eligible_per_pass: Vec<usize>,
}

/// Everything a single assignment run mutates, owned by that run.
#[derive(Debug)]
pub struct RunState<'g> {
    pub pool: WorkingPool<'g>,
    pub eligible: EligibleReviewers<'g>,
    pub assignments: AssignmentMap,
    /// Running pool position; advances once per reviewer attempt and is never reset.
    pub cursor: usize,
    /// Reviews committed by this run, in creation order.
    pub records: Vec<AssignmentRecord>,
    pub stats: RunStats,
}

impl<'g> RunState<'g> {
    pub fn new(
        pool: WorkingPool<'g>,
        reviewers: &'g [ReviewerGroup],
        assignments: AssignmentMap,
    ) -> Self {
        let stats = RunStats {
            pool_size: pool.len(),
            ..RunStats::default()
        };
        Self {
            pool,
            eligible: EligibleReviewers::new(reviewers),
            assignments,
            cursor: 0,
            records: Vec::new(),
            stats,
        }
    }

    /// Reviews still needed to bring every reviewer up to `quota`.
    pub fn outstanding_demand(&self, quota: usize) -> Result<usize, EngineError> {
        capacity::outstanding_demand(
            self.eligible.reviewers.iter().copied(),
            &self.assignments,
            quota,
        )
    }
}
