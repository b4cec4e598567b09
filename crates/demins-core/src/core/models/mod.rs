//! # Core Models Module
//!
//! Data structures describing a demineralizer vessel and the water it treats.
//!
//! ## Overview
//!
//! A [`vessel::Vessel`] carries two [`bed::ResinBed`]s, addressed by
//! [`bed::BedKind`], each loaded with the dissolved [`species::Species`] it
//! removes. All derived figures (uptake rates, remaining capacity, percent
//! exhausted, time to a target exhaustion) are computed on demand from the
//! model and an explicit wall-clock instant; nothing is stored between calls.
//!
//! ## Key Components
//!
//! - [`species`] - One dissolved constituent and its equivalent flow rate
//! - [`bed`] - A resin bed: volume, specific capacity, derating penalty
//! - [`vessel`] - Both beds plus flow, density and start of service
//! - [`builder`] - Incremental construction from raw numbers and unit names
//!
//! ## Usage
//!
//! ```ignore
//! use demins::core::models::{bed::BedKind, builder::VesselBuilder};
//!
//! let mut builder = VesselBuilder::default();
//! builder
//!     .start_date(start)
//!     .flow(120.0, "gpm")
//!     .start_bed(BedKind::Cation, 20.0, "ft3", 2.4, "eq / L")
//!     .add_species("zinc", 10.0, "ppb", 2.0, 65.38, 0.98);
//! let vessel = builder.build()?;
//! let pct = vessel.percent_exhausted(BedKind::Cation, SystemTime::now())?;
//! ```

pub mod bed;
pub mod builder;
pub mod species;
pub mod vessel;
