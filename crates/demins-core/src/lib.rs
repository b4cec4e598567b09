//! # Demins Core Library
//!
//! A model of ion-exchange resin exhaustion in water demineralizer vessels.
//! Given the dissolved species flowing through a vessel, it computes removal
//! rates, remaining exchange capacity, percent of each bed exhausted and the
//! projected time until a target exhaustion is reached.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Tagged physical quantities with dimension
//!   checking, the immutable `UnitSystem`, and the species/bed/vessel data model
//!   whose queries are pure functions of the model and a wall-clock instant.
//!
//! - **[`engine`]: Evaluation Support.** Assessment settings, error types and
//!   the `ExhaustionReport` value that holds a complete snapshot.
//!
//! - **[`workflows`]: The Public API.** `assess::run` evaluates a vessel into a
//!   report; it is what the command-line tool calls.

pub mod core;
pub mod engine;
pub mod workflows;
