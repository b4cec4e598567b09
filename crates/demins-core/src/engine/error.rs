use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::vessel::VesselError;
use crate::core::units::UnitError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid assessment configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Vessel evaluation failed: {source}")]
    Vessel {
        #[from]
        source: VesselError,
    },

    #[error("Unit conversion failed: {source}")]
    Unit {
        #[from]
        source: UnitError,
    },
}
