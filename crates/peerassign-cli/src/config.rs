mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_assign_config, build_check_config};
pub use models::AppConfig;
