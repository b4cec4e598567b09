use crate::core::models::vessel::DEFAULT_TARGET_FRACTION;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssessmentConfig {
    /// Fraction of initial capacity at which a bed counts as exhausted.
    pub target_fraction: f64,
    /// Report per-species rates alongside the bed totals.
    pub include_species: bool,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            target_fraction: DEFAULT_TARGET_FRACTION,
            include_species: false,
        }
    }
}

#[derive(Default)]
pub struct AssessmentConfigBuilder {
    target_fraction: Option<f64>,
    include_species: Option<bool>,
}

impl AssessmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_fraction(mut self, fraction: f64) -> Self {
        self.target_fraction = Some(fraction);
        self
    }
    pub fn include_species(mut self, include: bool) -> Self {
        self.include_species = Some(include);
        self
    }

    pub fn build(self) -> Result<AssessmentConfig, ConfigError> {
        let defaults = AssessmentConfig::default();
        let target_fraction = self.target_fraction.unwrap_or(defaults.target_fraction);
        if !(target_fraction.is_finite() && target_fraction > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "target_fraction",
                reason: format!("must be a positive fraction, got {}", target_fraction),
            });
        }
        Ok(AssessmentConfig {
            target_fraction,
            include_species: self.include_species.unwrap_or(defaults.include_species),
        })
    }
}
