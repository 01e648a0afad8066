use peerassign::core::io::report::ReportFormat;
use peerassign::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub roster_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub format: ReportFormat,
    pub save_roster_path: Option<PathBuf>,
    pub core_config: core_config::AssignmentConfig,
}
