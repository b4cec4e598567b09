//! # Core Module
//!
//! The exhaustion model itself: quantities and units, the vessel data model and
//! file loaders.
//!
//! ## Architecture
//!
//! - **Units** ([`units`]) - Tagged quantities, dimension algebra and the unit registry
//! - **Vessel Model** ([`models`]) - Species, resin beds and the vessel, with the
//!   capacity-depletion calculations
//! - **File I/O** ([`io`]) - Species tables in CSV form
//!
//! ## Model
//!
//! Each species contributes an equivalent flow rate derived from its
//! concentration, the vessel flow and the fluid density. The fraction captured
//! by the resin (the removal efficiency) is summed per bed into an uptake rate.
//! Remaining capacity is the derated initial capacity less uptake over the time
//! in service, and the time to a target exhaustion is a linear extrapolation at
//! the current uptake rate.

pub mod io;
pub mod models;
pub mod units;
