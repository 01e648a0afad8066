use peerassign::core::io::report::ReportFormat;

pub struct DefaultsConfig {
    pub quota: usize,
    pub validate_capacity: bool,
    pub format: ReportFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            quota: 1,
            validate_capacity: true,
            format: ReportFormat::Toml,
        }
    }
}
