use crate::core::models::group::{ReviewerGroup, RevieweeGroup};
use crate::core::models::review::AssignmentRecord;
use crate::engine::assignment_loop;
use crate::engine::capacity;
use crate::engine::config::AssignmentConfig;
use crate::engine::context::AssignmentContext;
use crate::engine::eligibility::ConflictOracle;
use crate::engine::error::EngineError;
use crate::engine::history;
use crate::engine::pool;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{AssignmentMap, RunState, RunStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, thread_rng};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    /// Reviews created by this run, in creation order.
    pub records: Vec<AssignmentRecord>,
    /// History plus everything created by this run.
    pub assignments: AssignmentMap,
    pub stats: RunStats,
}

/// Randomly assigns every reviewer group of `context` enough distinct reviewee groups to
/// reach `config.quota`.
///
/// The only randomness is the initial pool permutation, drawn from a `StdRng` seeded with
/// `config.seed` when one is set and from the thread RNG otherwise.
///
/// # Errors
///
/// - [`EngineError::QuotaExceedsReviewees`] when the quota is larger than the number of
///   distinct reviewee groups. This is checked before the pool is built, whatever
///   `validate_capacity` says.
/// - [`EngineError::InsufficientCapacity`] when capacity validation is enabled and the pool
///   cannot cover the outstanding demand.
/// - [`EngineError::CapacityOverflow`] when the pool size does not fit in memory.
/// - [`EngineError::UnableToRandomlyAssign`] when some reviewer has no eligible reviewee
///   left in the pool. Reviews created before the failure remain persisted.
/// - [`EngineError::MissingArtifact`] / [`EngineError::Context`] for collaborator failures.
pub fn run<C, O>(
    context: &mut C,
    oracle: &O,
    config: &AssignmentConfig,
    reporter: &ProgressReporter,
) -> Result<AssignmentOutcome, EngineError>
where
    C: AssignmentContext + ?Sized,
    O: ConflictOracle + ?Sized,
{
    match config.seed {
        Some(seed) => run_with_rng(
            context,
            oracle,
            config,
            &mut StdRng::seed_from_u64(seed),
            reporter,
        ),
        None => run_with_rng(context, oracle, config, &mut thread_rng(), reporter),
    }
}

#[instrument(skip_all, name = "assignment_workflow", fields(quota = config.quota))]
pub fn run_with_rng<C, O, R>(
    context: &mut C,
    oracle: &O,
    config: &AssignmentConfig,
    rng: &mut R,
    reporter: &ProgressReporter,
) -> Result<AssignmentOutcome, EngineError>
where
    C: AssignmentContext + ?Sized,
    O: ConflictOracle + ?Sized,
    R: Rng + ?Sized,
{
    let quota = config.quota;
    let reviewers = context
        .reviewer_groups()
        .map_err(EngineError::context("listing reviewer groups"))?;
    let reviewees = context
        .reviewee_groups()
        .map_err(EngineError::context("listing reviewee groups"))?;
    info!(
        reviewers = reviewers.len(),
        reviewees = reviewees.len(),
        quota,
        "Starting random assignment."
    );

    // Checked before the pool is sized from the quota.
    capacity::check_quota(reviewers.len(), &reviewees, quota)?;

    // === Phase 1: Working pool ===
    let working_pool = reporter.phase("Building Pool", || {
        pool::build_pool(reviewers.len(), &reviewees, quota, rng)
    })?;

    // === Phase 2: History ===
    let assignments = reporter.phase("Loading History", || {
        let existing = context
            .existing_reviews()
            .map_err(EngineError::context("listing existing reviews"))?;
        info!(existing = existing.len(), "Loaded reviews on record.");
        if !existing.is_empty() {
            reporter.report(Progress::Message(format!(
                "{} review(s) already on record",
                existing.len()
            )));
        }
        Ok::<_, EngineError>(history::load_history(&existing))
    })?;

    let mut state = RunState::new(working_pool, &reviewers, assignments);

    // === Phase 3: Capacity ===
    let demand = state.outstanding_demand(quota)?;
    if config.validate_capacity && demand > 0 {
        capacity::check_supply(state.pool.len(), demand)?;
    }

    // === Phase 4: Assignment loop ===
    reporter.report(Progress::PhaseStart {
        name: "Assigning Reviewers",
    });
    reporter.report(Progress::TaskStart {
        total_steps: demand as u64,
    });
    assignment_loop::run(&mut state, quota, context, oracle, reporter)?;
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(
        created = state.records.len(),
        passes = state.stats.passes,
        "Random assignment complete."
    );
    Ok(AssignmentOutcome {
        records: state.records,
        assignments: state.assignments,
        stats: state.stats,
    })
}

/// Counts (reviewer, reviewee) pairs that the oracle reports as sharing a student.
pub fn count_conflicts<O>(
    reviewers: &[ReviewerGroup],
    reviewees: &[RevieweeGroup],
    oracle: &O,
) -> usize
where
    O: ConflictOracle + ?Sized,
{
    reviewers
        .iter()
        .map(|r| {
            reviewees
                .iter()
                .filter(|e| !oracle.shares_no_students(r, e))
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::roster::Roster;
    use crate::core::models::ids::GroupId;
    use crate::core::models::review::{ArtifactRef, ReviewPairing};
    use crate::engine::config::AssignmentConfigBuilder;
    use crate::engine::eligibility::RosterConflicts;
    use std::collections::HashSet;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    fn roster(reviewers: u64, reviewees: u64) -> Roster {
        Roster::new(
            (1..=reviewers)
                .map(|id| ReviewerGroup::new(id, [format!("r{}", id)]))
                .collect(),
            (1..=reviewees)
                .map(|id| RevieweeGroup::new(100 + id, [format!("e{}", id)]))
                .collect(),
        )
    }

    fn config(quota: usize, seed: u64) -> AssignmentConfig {
        AssignmentConfigBuilder::new()
            .quota(quota)
            .seed(Some(seed))
            .build()
            .unwrap()
    }

    fn assert_properties(context: &Roster, outcome: &AssignmentOutcome, quota: usize) {
        let mut seen = HashSet::new();
        for review in context.reviews() {
            assert!(
                seen.insert(review.pairing()),
                "duplicate pairing {:?}",
                review.pairing()
            );
        }
        for record in &outcome.records {
            let reviewer = context.reviewer(record.reviewer).unwrap();
            let reviewee = context.reviewee(record.reviewee).unwrap();
            assert!(reviewer.shares_no_students(reviewee));
        }
        for reviewer in context.reviewers() {
            assert_eq!(outcome.assignments.count(reviewer.id), quota);
        }
        assert!(
            outcome
                .stats
                .eligible_per_pass
                .windows(2)
                .all(|w| w[1] <= w[0])
        );
    }

    #[test]
    fn quota_one_always_succeeds_without_conflicts() {
        for seed in 0..16 {
            let mut context = roster(2, 2);
            let outcome = run(
                &mut context,
                &RosterConflicts,
                &config(1, seed),
                &ProgressReporter::new(),
            )
            .unwrap();

            assert_properties(&context, &outcome, 1);
            let covered: HashSet<_> = outcome.records.iter().map(|r| r.reviewee).collect();
            assert_eq!(covered.len(), 2);
        }
    }

    #[test]
    fn successful_runs_satisfy_every_property() {
        let mut successes = 0;
        for seed in 0..64 {
            let mut context = roster(3, 3);
            match run(
                &mut context,
                &RosterConflicts,
                &config(2, seed),
                &ProgressReporter::new(),
            ) {
                Ok(outcome) => {
                    successes += 1;
                    assert_eq!(outcome.records.len(), 6);
                    assert_properties(&context, &outcome, 2);
                }
                Err(err) => assert!(err.is_unable_to_assign(), "unexpected error: {}", err),
            }
        }
        assert!(successes > 0);
    }

    #[test]
    fn same_seed_replays_the_same_pairings() {
        let mut first = roster(5, 6);
        let mut second = roster(5, 6);

        let a = run(
            &mut first,
            &RosterConflicts,
            &config(2, 1234),
            &ProgressReporter::new(),
        );
        let b = run(
            &mut second,
            &RosterConflicts,
            &config(2, 1234),
            &ProgressReporter::new(),
        );

        assert_eq!(first.reviews(), second.reviews());
        assert_eq!(a.is_ok(), b.is_ok());
    }

    #[test]
    fn conflicting_only_candidate_fails_fatally() {
        let mut context = Roster::new(
            vec![ReviewerGroup::new(1, ["alice"])],
            vec![RevieweeGroup::new(10, ["alice"])],
        );
        let err = run(
            &mut context,
            &RosterConflicts,
            &config(1, 0),
            &ProgressReporter::new(),
        )
        .unwrap_err();

        assert!(err.is_unable_to_assign());
        assert!(context.reviews().is_empty());
    }

    #[test]
    fn history_satisfying_a_reviewer_prunes_it() {
        let mut context = roster(2, 2)
            .with_reviews([ReviewPairing::new(1, 101)])
            .unwrap();

        let outcome = run(
            &mut context,
            &RosterConflicts,
            &config(1, 5),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].reviewer, GroupId(2));
        assert_eq!(outcome.assignments.count(GroupId(1)), 1);
    }

    #[test]
    fn rerun_after_success_creates_nothing() {
        let mut context = roster(3, 4);
        run(
            &mut context,
            &RosterConflicts,
            &config(1, 9),
            &ProgressReporter::new(),
        )
        .unwrap();
        let before = context.reviews().len();

        let again = run(
            &mut context,
            &RosterConflicts,
            &config(1, 10),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(again.records.is_empty());
        assert_eq!(again.stats.passes, 0);
        assert_eq!(context.reviews().len(), before);
    }

    #[test]
    fn insufficient_supply_is_reported_up_front() {
        let mut context = roster(4, 2);
        let err = run(
            &mut context,
            &RosterConflicts,
            &config(1, 0),
            &ProgressReporter::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            EngineError::InsufficientCapacity {
                supply: 2,
                demand: 4
            }
        ));
        assert!(context.reviews().is_empty());
    }

    #[test]
    fn quota_larger_than_reviewee_count_is_reported() {
        let mut context = roster(1, 2);
        let err = run(
            &mut context,
            &RosterConflicts,
            &config(3, 0),
            &ProgressReporter::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            EngineError::QuotaExceedsReviewees {
                quota: 3,
                reviewees: 2
            }
        ));
    }

    #[test]
    fn huge_quota_is_rejected_before_the_pool_is_built() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        let mut context = roster(2, 2);
        let quota = usize::MAX / 2 + 1;

        let err = run(&mut context, &RosterConflicts, &config(quota, 0), &reporter).unwrap_err();

        assert!(matches!(
            err,
            EngineError::QuotaExceedsReviewees { reviewees: 2, .. }
        ));
        assert!(events.lock().unwrap().is_empty());
        assert!(context.reviews().is_empty());
    }

    #[test]
    fn quota_bound_holds_without_capacity_validation() {
        let mut context = roster(2, 2);
        let config = AssignmentConfigBuilder::new()
            .quota(1_000_000_000)
            .seed(Some(0))
            .validate_capacity(false)
            .build()
            .unwrap();

        let err = run(
            &mut context,
            &RosterConflicts,
            &config,
            &ProgressReporter::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            EngineError::QuotaExceedsReviewees {
                quota: 1_000_000_000,
                reviewees: 2
            }
        ));
    }

    #[test]
    fn disabled_validation_falls_back_to_the_generic_failure() {
        let mut context = roster(4, 2);
        let config = AssignmentConfigBuilder::new()
            .quota(1)
            .seed(Some(0))
            .validate_capacity(false)
            .build()
            .unwrap();

        let err = run(
            &mut context,
            &RosterConflicts,
            &config,
            &ProgressReporter::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            EngineError::UnableToRandomlyAssign {
                cursor: 2,
                committed: 2,
                ..
            }
        ));
        assert_eq!(context.reviews().len(), 2);
    }

    #[test]
    fn no_reviewers_is_a_no_op() {
        let mut context = roster(0, 3);
        let outcome = run(
            &mut context,
            &RosterConflicts,
            &config(2, 0),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.pool_size, 0);
    }

    #[test]
    fn progress_reports_phases_and_each_assignment() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        let mut context = roster(2, 2);

        run(&mut context, &RosterConflicts, &config(1, 3), &reporter).unwrap();

        let events = events.lock().unwrap();
        let phases: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Progress::PhaseStart { name } => Some(*name),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec!["Building Pool", "Loading History", "Assigning Reviewers"]
        );
        assert!(events.contains(&Progress::TaskStart { total_steps: 2 }));
        let assigned = events
            .iter()
            .filter(|e| matches!(e, Progress::Assigned { .. }))
            .count();
        assert_eq!(assigned, 2);
    }

    #[test]
    fn reviews_on_record_are_announced() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        let mut context = roster(2, 2)
            .with_reviews([ReviewPairing::new(1, 101)])
            .unwrap();

        run(&mut context, &RosterConflicts, &config(1, 2), &reporter).unwrap();

        let events = events.lock().unwrap();
        assert!(events.contains(&Progress::Message(
            "1 review(s) already on record".to_string()
        )));
        assert!(events.contains(&Progress::TaskStart { total_steps: 1 }));
    }

    #[derive(Debug)]
    struct StoreDown;

    impl fmt::Display for StoreDown {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("store is down")
        }
    }

    impl std::error::Error for StoreDown {}

    /// Wraps a roster and refuses to persist after `limit` reviews.
    struct FlakyStore {
        inner: Roster,
        limit: usize,
    }

    impl AssignmentContext for FlakyStore {
        type Error = StoreDown;

        fn reviewer_groups(&self) -> Result<Vec<ReviewerGroup>, StoreDown> {
            Ok(self.inner.reviewers().to_vec())
        }
        fn reviewee_groups(&self) -> Result<Vec<RevieweeGroup>, StoreDown> {
            Ok(self.inner.reviewees().to_vec())
        }
        fn existing_reviews(&self) -> Result<Vec<ReviewPairing>, StoreDown> {
            Ok(self
                .inner
                .reviews()
                .iter()
                .map(AssignmentRecord::pairing)
                .collect())
        }
        fn latest_artifact(
            &self,
            reviewee: &RevieweeGroup,
        ) -> Result<Option<ArtifactRef>, StoreDown> {
            Ok(reviewee.submission.clone())
        }
        fn create_review(
            &mut self,
            reviewer: &ReviewerGroup,
            reviewee: &RevieweeGroup,
            artifact: ArtifactRef,
        ) -> Result<AssignmentRecord, StoreDown> {
            if self.inner.reviews().len() >= self.limit {
                return Err(StoreDown);
            }
            let record = AssignmentRecord {
                reviewer: reviewer.id,
                reviewee: reviewee.id,
                artifact,
            };
            self.inner.push_review(record.clone());
            Ok(record)
        }
    }

    #[test]
    fn persistence_failure_surfaces_as_a_context_error() {
        let mut store = FlakyStore {
            inner: roster(3, 3),
            limit: 1,
        };

        let err = run(
            &mut store,
            &RosterConflicts,
            &config(1, 4),
            &ProgressReporter::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Context {
                operation: "creating a review",
                ..
            }
        ));
        assert_eq!(store.inner.reviews().len(), 1);
    }

    #[test]
    fn count_conflicts_counts_shared_members() {
        let reviewers = vec![ReviewerGroup::new(1, ["a", "b"]), ReviewerGroup::new(2, ["c"])];
        let reviewees = vec![RevieweeGroup::new(10, ["a"]), RevieweeGroup::new(11, ["b", "c"])];
        assert_eq!(count_conflicts(&reviewers, &reviewees, &RosterConflicts), 3);
    }
}
