//! # Engine Module
//!
//! Evaluation settings, errors and the report type produced by the
//! [assessment workflow](crate::workflows::assess).
//!
//! The vessel model answers individual questions; the engine gathers those
//! answers into one immutable [`report::ExhaustionReport`] so callers can read
//! every figure without re-running the model or worrying about call order.
//!
//! - **Configuration** ([`config`]) - Target exhaustion fraction and report detail
//! - **Reporting** ([`report`]) - Per-bed status, forecasts and the status line
//! - **Error Handling** ([`error`]) - Engine-level error type

pub mod config;
pub mod error;
pub mod report;
