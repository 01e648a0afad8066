use crate::cli::CheckArgs;
use crate::config::build_check_config;
use crate::error::{CliError, Result};
use peerassign::{
    core::io::roster::Roster,
    core::models::review::AssignmentRecord,
    engine::{capacity::CapacityReport, eligibility::RosterConflicts, history},
    workflows,
};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    pub capacity: CapacityReport,
    pub conflicting_pairs: usize,
    pub existing_reviews: usize,
}

pub async fn run(args: CheckArgs) -> Result<()> {
    let config = build_check_config(&args)?;

    info!("Loading roster from {:?}", &args.roster);
    let roster =
        Roster::read_from_path(&args.roster).map_err(CliError::roster(args.roster.clone()))?;

    let summary = summarize(&roster, config.quota)?;
    info!(?summary, "Roster check complete.");

    let capacity = &summary.capacity;
    println!("Reviewer groups:    {}", capacity.reviewers);
    println!("Reviewee groups:    {}", capacity.reviewees);
    println!("Existing reviews:   {}", summary.existing_reviews);
    println!("Conflicting pairs:  {}", summary.conflicting_pairs);
    println!("Quota:              {}", capacity.quota);
    println!("Pool supply:        {}", capacity.supply);
    println!("Outstanding demand: {}", capacity.demand);

    if let Err(reason) = capacity.validate() {
        warn!("Roster cannot satisfy the requested quota: {}", reason);
        println!("Warning: {}", reason);
    }
    Ok(())
}

pub fn summarize(roster: &Roster, quota: usize) -> Result<CheckSummary> {
    let reviewers = roster.reviewers();
    let reviewees = roster.reviewees();

    let pairings: Vec<_> = roster.reviews().iter().map(AssignmentRecord::pairing).collect();
    let assignments = history::load_history(&pairings);

    Ok(CheckSummary {
        capacity: CapacityReport::assess(reviewers, reviewees, &assignments, quota)?,
        conflicting_pairs: workflows::assign::count_conflicts(
            reviewers,
            reviewees,
            &RosterConflicts,
        ),
        existing_reviews: assignments.total(),
    })
}
