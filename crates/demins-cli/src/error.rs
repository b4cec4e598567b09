use demins::core::io::species_table::LoadError;
use demins::core::models::builder::BuildError;
use demins::core::units::UnitError;
use demins::core::units::registry::UnitDefinitionsError;
use demins::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid vessel description: {0}")]
    Build(#[from] BuildError),

    #[error(transparent)]
    SpeciesTable(#[from] LoadError),

    #[error(transparent)]
    UnitDefinitions(#[from] UnitDefinitionsError),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
