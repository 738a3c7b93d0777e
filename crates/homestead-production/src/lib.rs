//! Production activities for the Homestead simulator.
//!
//! This crate is the computational core of the workspace. A production
//! [`Activity`] is bound to one output good at construction time: it
//! resolves the good's configuration (production formula, productivity
//! ceilings, quantization steps) through the material catalog and caches
//! it for its lifetime. Each [`Activity::perform`] call is then a pure
//! function of labor, land, and a [`Stock`] snapshot:
//!
//! 1. Compute each input's output-capacity contribution
//!    (`conversion rate x available quantity`), plus the `labor` and
//!    `land` pseudo-inputs.
//! 2. Evaluate the production formula over the named contributions --
//!    typically `min(...)`, modeling the most-limiting input.
//! 3. Floor the result to the output good's step amount.
//! 4. Consume inputs (ceiling the remainder to each input's own step),
//!    pass untouched goods through, and credit the output.
//!
//! The input snapshot is never mutated; `perform` returns a fresh
//! [`Stock`].
//!
//! # Modules
//!
//! - [`activity`] -- The [`Activity`] type: construction and `perform`.
//! - [`error`] -- [`ProductionError`].
//! - [`formula`] -- The sandboxed arithmetic formula parser/evaluator.
//!
//! [`Stock`]: homestead_types::Stock

pub mod activity;
pub mod error;
pub mod formula;

pub use activity::Activity;
pub use error::ProductionError;
pub use formula::{Formula, FormulaError};
