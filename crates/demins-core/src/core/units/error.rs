use super::dimension::Dimension;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnitError {
    #[error("Unknown unit: '{0}'")]
    UnknownUnit(String),

    #[error("Cannot {operation} '{left}' ({left_dim}) and '{right}' ({right_dim})")]
    Dimensionality {
        operation: &'static str,
        left: String,
        left_dim: Dimension,
        right: String,
        right_dim: Dimension,
    },

    #[error("Invalid unit expression '{expression}': {reason}")]
    Parse { expression: String, reason: String },

    #[error("Unit '{0}' is already defined")]
    Redefinition(String),
}
