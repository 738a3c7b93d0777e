//! Shared type definitions for the Homestead production simulator.
//!
//! This crate is the leaf dependency of the workspace. It defines the
//! vocabulary every other crate speaks:
//!
//! - [`material`] -- The [`MaterialSpec`] catalog record describing one
//!   good's production configuration, and the reserved variable names.
//! - [`quantity`] -- Step quantization helpers (floor-to-step and
//!   ceiling-to-step) over [`rust_decimal::Decimal`].
//! - [`stock`] -- The [`Stock`] resource mapping: a snapshot of stock
//!   levels, one entry per good.
//!
//! All quantities, rates, and step amounts are [`Decimal`] values. The
//! simulator never uses floating point: quantization to tradable units
//! must be exact, and `0.1 + 0.2` must equal `0.3`.
//!
//! [`Decimal`]: rust_decimal::Decimal
//! [`MaterialSpec`]: material::MaterialSpec
//! [`Stock`]: stock::Stock

pub mod material;
pub mod quantity;
pub mod stock;

pub use material::{MaterialSpec, reserved};
pub use quantity::{ceil_to_step, floor_to_step};
pub use stock::Stock;
