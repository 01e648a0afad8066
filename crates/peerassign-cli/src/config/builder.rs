use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{AssignArgs, CheckArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use peerassign::core::io::report::ReportFormat;
use peerassign::engine::config as core_config;
use std::path::Path;

pub fn build_assign_config(args: &AssignArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(args.config.as_deref(), &args.set_values)?;

    let format = match args.format {
        Some(format) => format,
        None => match file_config.output.take().and_then(|o| o.format) {
            Some(name) => name.parse::<ReportFormat>().map_err(CliError::Config)?,
            None => defaults.format,
        },
    };

    let core_config = merge_assignment(
        &mut file_config,
        args.quota,
        args.seed,
        args.no_capacity_check,
        &defaults,
    )?;

    Ok(AppConfig {
        roster_path: args.roster.clone(),
        output_path: args.output.clone(),
        format,
        save_roster_path: args.save_roster.clone(),
        core_config,
    })
}

pub fn build_check_config(args: &CheckArgs) -> Result<core_config::AssignmentConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(args.config.as_deref(), &args.set_values)?;
    merge_assignment(&mut file_config, args.quota, None, false, &defaults)
}

fn load_file_config(path: Option<&Path>, set_values: &[String]) -> Result<FileConfig> {
    let file_config = match path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    apply_set_values(file_config, set_values)
}

fn merge_assignment(
    file_config: &mut FileConfig,
    cli_quota: Option<usize>,
    cli_seed: Option<u64>,
    cli_no_capacity_check: bool,
    defaults: &DefaultsConfig,
) -> Result<core_config::AssignmentConfig> {
    let assignment_file = file_config.assignment.take().unwrap_or_default();

    let quota = cli_quota
        .or(assignment_file.quota)
        .unwrap_or(defaults.quota);
    let seed = cli_seed.or(assignment_file.seed);
    let validate_capacity = if cli_no_capacity_check {
        false
    } else {
        assignment_file
            .validate_capacity
            .unwrap_or(defaults.validate_capacity)
    };

    core_config::AssignmentConfigBuilder::new()
        .quota(quota)
        .seed(seed)
        .validate_capacity(validate_capacity)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "assignment.quota" => {
                config
                    .assignment
                    .get_or_insert_with(Default::default)
                    .quota = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "assignment.seed" => {
                config.assignment.get_or_insert_with(Default::default).seed =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid integer value for {}: {}",
                            key, value_str
                        ))
                    })?);
            }
            "assignment.validate-capacity" => {
                config
                    .assignment
                    .get_or_insert_with(Default::default)
                    .validate_capacity = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                })?);
            }
            "output.format" => {
                config.output.get_or_insert_with(Default::default).format =
                    Some(value_str.to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
