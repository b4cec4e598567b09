//! # Workflows Module
//!
//! High-level entry points that tie the vessel model and the engine together.
//!
//! - **Assessment** ([`assess`]) - Evaluates a vessel at one instant into an
//!   [`ExhaustionReport`](crate::engine::report::ExhaustionReport): capacities,
//!   percent exhausted, forecasts and (optionally) per-species rates.

pub mod assess;
