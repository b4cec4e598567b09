//! Reading vessel inputs from files.
//!
//! Species concentrations usually come from a plant chemistry log, so they are
//! accepted as a flat CSV table with one row per species and a column naming
//! the bed. Unit definitions are read by
//! [`UnitSystem::load_definitions`](crate::core::units::UnitSystem::load_definitions).

pub mod species_table;
