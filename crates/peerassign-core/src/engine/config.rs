use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid quota {0}: every reviewer group must receive at least one reviewee")]
    InvalidQuota(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentConfig {
    /// Number of distinct reviewee groups every reviewer group must end up with.
    pub quota: usize,
    /// Seed for the single initial pool permutation. `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Reject runs whose pool cannot cover the outstanding demand before assigning anything.
    pub validate_capacity: bool,
}

#[derive(Default)]
pub struct AssignmentConfigBuilder {
    quota: Option<usize>,
    seed: Option<u64>,
    validate_capacity: Option<bool>,
}

impl AssignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn validate_capacity(mut self, enabled: bool) -> Self {
        self.validate_capacity = Some(enabled);
        self
    }

    pub fn build(self) -> Result<AssignmentConfig, ConfigError> {
        let quota = self.quota.ok_or(ConfigError::MissingParameter("quota"))?;
        if quota == 0 {
            return Err(ConfigError::InvalidQuota(quota));
        }
        Ok(AssignmentConfig {
            quota,
            seed: self.seed,
            validate_capacity: self.validate_capacity.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_a_quota() {
        let result = AssignmentConfigBuilder::new().seed(Some(3)).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("quota")));
    }

    #[test]
    fn build_rejects_a_zero_quota() {
        let result = AssignmentConfigBuilder::new().quota(0).build();
        assert_eq!(result, Err(ConfigError::InvalidQuota(0)));
    }

    #[test]
    fn capacity_validation_defaults_to_enabled() {
        let config = AssignmentConfigBuilder::new().quota(2).build().unwrap();
        assert_eq!(
            config,
            AssignmentConfig {
                quota: 2,
                seed: None,
                validate_capacity: true,
            }
        );
    }

    #[test]
    fn all_fields_can_be_set() {
        let config = AssignmentConfigBuilder::new()
            .quota(3)
            .seed(Some(42))
            .validate_capacity(false)
            .build()
            .unwrap();
        assert_eq!(config.quota, 3);
        assert_eq!(config.seed, Some(42));
        assert!(!config.validate_capacity);
    }
}
