use clap::{Args, Parser, Subcommand};
use peerassign::core::io::report::ReportFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "PeerAssign Contributors",
    version,
    about = "PeerAssign CLI - randomly assigns reviewer groups to reviewee groups for peer review, avoiding shared students.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assign reviewee groups to every reviewer group in a roster.
    Assign(AssignArgs),
    /// Report conflicts, supply and demand for a roster without assigning anything.
    Check(CheckArgs),
}

/// Arguments for the `assign` subcommand.
#[derive(Args, Debug)]
pub struct AssignArgs {
    // --- Core Arguments ---
    /// Path to the roster file (TOML) listing reviewer groups, reviewee groups and existing reviews.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub roster: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Assignment Overrides ---
    /// Number of distinct reviewee groups each reviewer group must receive.
    #[arg(short = 'n', long, value_name = "INT")]
    pub quota: Option<usize>,

    /// Seed for the initial shuffle, for reproducible assignments.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Skip the up-front supply/demand check.
    #[arg(long)]
    pub no_capacity_check: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S assignment.quota=3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    // --- Output ---
    /// Where to write the report of created reviews. Defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report format: 'toml' or 'csv'.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Write the roster, including newly created reviews, to this path.
    #[arg(long, value_name = "PATH")]
    pub save_roster: Option<PathBuf>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the roster file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub roster: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of distinct reviewee groups each reviewer group must receive.
    #[arg(short = 'n', long, value_name = "INT")]
    pub quota: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assign_arguments_parse() {
        let cli = Cli::parse_from([
            "peerassign",
            "-vv",
            "assign",
            "--roster",
            "roster.toml",
            "-n",
            "2",
            "--seed",
            "42",
            "--format",
            "csv",
            "-S",
            "assignment.validate-capacity=false",
        ]);

        assert_eq!(cli.verbose, 2);
        let Commands::Assign(args) = cli.command else {
            panic!("expected the assign subcommand");
        };
        assert_eq!(args.roster, PathBuf::from("roster.toml"));
        assert_eq!(args.quota, Some(2));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.format, Some(ReportFormat::Csv));
        assert_eq!(args.set_values, vec!["assignment.validate-capacity=false"]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["peerassign", "-q", "-v", "check", "-r", "r.toml"]);
        assert!(result.is_err());
    }
}
