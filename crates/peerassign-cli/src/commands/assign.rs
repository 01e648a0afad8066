use crate::cli::AssignArgs;
use crate::config::{AppConfig, build_assign_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use peerassign::{
    core::io::{report, roster::Roster},
    engine::{eligibility::RosterConflicts, progress::ProgressReporter},
    workflows,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{error, info, warn};

pub async fn run(args: AssignArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let config = build_assign_config(&args)?;

    info!("Loading roster from {:?}", &config.roster_path);
    let mut roster = Roster::read_from_path(&config.roster_path)
        .map_err(CliError::roster(config.roster_path.clone()))?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    eprintln!(
        "Assigning {} reviewee group(s) to each of {} reviewer group(s)...",
        config.core_config.quota,
        roster.reviewers().len()
    );
    info!("Invoking the core assignment workflow...");

    let result = tokio::task::block_in_place(|| {
        workflows::assign::run(&mut roster, &RosterConflicts, &config.core_config, &reporter)
    });

    // Reviews committed before a failure are already part of the roster.
    if let Err(save_error) = save_roster(&roster, &config) {
        if let Err(run_error) = &result {
            error!("Assignment failed before the roster could be saved: {}", run_error);
        }
        return Err(save_error);
    }

    let outcome = result?;
    info!(
        "Workflow finished: {} review(s) created in {} pass(es), {} swap(s).",
        outcome.records.len(),
        outcome.stats.passes,
        outcome.stats.swaps
    );

    if outcome.records.is_empty() {
        warn!("Every reviewer group already met the quota; nothing was assigned.");
        eprintln!("Warning: every reviewer group already has its reviews. Nothing to assign.");
    }

    write_report(&outcome.records, &config)?;
    eprintln!(
        "✓ Created {} review(s) across {} reviewer group(s).",
        outcome.records.len(),
        roster.reviewers().len()
    );
    Ok(())
}

fn save_roster(roster: &Roster, config: &AppConfig) -> Result<()> {
    let Some(path) = &config.save_roster_path else {
        return Ok(());
    };
    info!("Writing updated roster to {:?}", path);
    roster.write_to_path(path).map_err(|e| {
        CliError::Other(
            anyhow::Error::new(e).context(format!("Failed to save roster to '{}'", path.display())),
        )
    })?;
    eprintln!("  Roster saved to: {}", path.display());
    Ok(())
}

fn write_report(
    records: &[peerassign::core::models::review::AssignmentRecord],
    config: &AppConfig,
) -> Result<()> {
    match &config.output_path {
        Some(path) => {
            info!("Writing report ({:?}) to {:?}", config.format, path);
            let mut writer = BufWriter::new(File::create(path)?);
            report::write_report(records, config.format, &mut writer)?;
            eprintln!("  Report written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            report::write_report(records, config.format, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}
