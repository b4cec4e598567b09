//! # Units Module
//!
//! Tagged physical quantities and the registry that names them.
//!
//! Every value that enters or leaves the exhaustion model is a [`Quantity`]: a
//! magnitude paired with a [`Unit`]. Units carry a scale factor onto the base
//! units (gram, liter, second, mole, equivalent, count) and a [`Dimension`]
//! exponent vector, so mixing incompatible quantities fails at the point of the
//! operation instead of producing a silently wrong number.
//!
//! ## Key Components
//!
//! - [`dimension`] - Exponent algebra over the six base dimensions
//! - [`quantity`] - `Unit` and `Quantity` with checked addition and conversion
//! - [`registry`] - `UnitSystem`, the immutable table of named units, including
//!   mass fractions (ppm/ppb/ppt) and the radionuclide activity units
//! - [`error`] - `UnitError`

pub mod dimension;
pub mod error;
pub mod quantity;
pub mod registry;

pub use dimension::Dimension;
pub use error::UnitError;
pub use quantity::{Quantity, Unit};
pub use registry::UnitSystem;
