//! The production [`Activity`]: one output good, bound configuration,
//! repeated `perform` calls.
//!
//! Construction resolves the output good's [`MaterialSpec`] through the
//! material catalog -- including each declared input good's own step
//! amount -- and parses the production formula. The resolved
//! configuration is immutable for the activity's lifetime, so `perform`
//! is a pure function of labor, land, and the supplied stock snapshot.
//!
//! Rounding is conservative against the activity: output is floored to
//! the output good's step, and the remaining quantity of each consumed
//! input is ceiled to that input's step. The actor never gains a
//! fractional free unit from quantization.
//!
//! [`MaterialSpec`]: homestead_types::MaterialSpec

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use homestead_catalog::MaterialCatalog;
use homestead_types::{Stock, ceil_to_step, floor_to_step, reserved};

use crate::error::ProductionError;
use crate::formula::Formula;

/// Resolved configuration for one declared input good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InputSpec {
    /// Output units producible per unit of this input.
    rate: Decimal,
    /// The input good's own quantization step, resolved from its catalog
    /// record at activity construction.
    step: Decimal,
}

/// A production activity bound to one output good.
///
/// Immutable after construction. The only mutable concept in a
/// production run is the [`Stock`] snapshot threaded between successive
/// [`Activity::perform`] calls, and that lives entirely in caller
/// memory: `perform` never mutates its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    output_good: String,
    formula: Formula,
    inputs: BTreeMap<String, InputSpec>,
    labor_rate: Decimal,
    land_rate: Decimal,
    output_step: Decimal,
}

impl Activity {
    /// Construct an activity for `output_good`, resolving its
    /// configuration through `catalog`.
    ///
    /// Resolution happens once, here: the output good's record, the
    /// parsed production formula, and the step amount of every declared
    /// input good (looked up from that input's own record). Two
    /// activities constructed for the same output good against the same
    /// catalog are identical.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionError::Catalog`] if the output good or any
    /// declared input has zero or multiple catalog entries, and
    /// [`ProductionError::Formula`] if the production formula does not
    /// parse.
    pub fn new(output_good: &str, catalog: &MaterialCatalog) -> Result<Self, ProductionError> {
        let spec = catalog.material_data(output_good)?;
        let formula = Formula::parse(&spec.production_function)?;

        let mut inputs = BTreeMap::new();
        for (good, rate) in &spec.max_productivity_per_input_good {
            let input_spec = catalog.material_data(good)?;
            inputs.insert(
                good.clone(),
                InputSpec {
                    rate: *rate,
                    step: input_spec.step_amount,
                },
            );
        }

        Ok(Self {
            output_good: spec.name.clone(),
            formula,
            inputs,
            labor_rate: spec.max_productivity_per_labor,
            land_rate: spec.max_productivity_per_land,
            output_step: spec.step_amount,
        })
    }

    /// Run one production step: compute the maximum feasible output from
    /// `labor`, `land`, and the `available` stock, consume the
    /// corresponding inputs, and return the updated stock.
    ///
    /// `available` is never mutated; the returned [`Stock`] is a fresh
    /// snapshot. On any error the caller's stock is unaffected -- there
    /// is no partial consumption.
    ///
    /// # Errors
    ///
    /// - [`ProductionError::MissingInput`] if a declared input good has
    ///   no entry in `available` (a zero quantity is legal, a missing
    ///   key is not).
    /// - [`ProductionError::InvalidInput`] if any capacity contribution
    ///   is negative.
    /// - [`ProductionError::NegativeOutput`] if the formula evaluates to
    ///   a negative quantity.
    /// - [`ProductionError::Formula`] if evaluation itself fails (an
    ///   unbound variable, division by zero).
    /// - [`ProductionError::Arithmetic`] on checked-arithmetic failure,
    ///   including consuming against a zero conversion rate.
    pub fn perform(
        &self,
        labor: Decimal,
        land: Decimal,
        available: &Stock,
    ) -> Result<Stock, ProductionError> {
        // Capacity contributions: one per declared input good, plus the
        // labor and land pseudo-inputs, all in output units.
        let mut contributions: BTreeMap<String, Decimal> = BTreeMap::new();
        for (good, input) in &self.inputs {
            let Some(quantity) = available.get(good) else {
                return Err(ProductionError::MissingInput { good: good.clone() });
            };
            let contribution = input
                .rate
                .checked_mul(quantity)
                .ok_or(ProductionError::Arithmetic)?;
            contributions.insert(good.clone(), contribution);
        }
        let labor_contribution = labor
            .checked_mul(self.labor_rate)
            .ok_or(ProductionError::Arithmetic)?;
        let land_contribution = land
            .checked_mul(self.land_rate)
            .ok_or(ProductionError::Arithmetic)?;
        contributions.insert(String::from(reserved::LABOR), labor_contribution);
        contributions.insert(String::from(reserved::LAND), land_contribution);

        for (name, value) in &contributions {
            if value.is_sign_negative() {
                return Err(ProductionError::InvalidInput {
                    name: name.clone(),
                    value: *value,
                });
            }
        }

        debug!(
            activity = %self.output_good,
            ?contributions,
            "capacity contributions computed"
        );

        // The most-limiting input (or whatever else the formula says),
        // floored to the output good's step.
        let raw_output = self.formula.evaluate(&contributions)?;
        if raw_output.is_sign_negative() {
            return Err(ProductionError::NegativeOutput { value: raw_output });
        }
        let output =
            floor_to_step(raw_output, self.output_step).ok_or(ProductionError::Arithmetic)?;

        debug!(
            activity = %self.output_good,
            %raw_output,
            %output,
            "production output quantized"
        );

        // Consume declared inputs, pass everything else through.
        let mut result = Stock::new();
        for (good, old_quantity) in available.iter() {
            match self.inputs.get(good) {
                None => result.set(good, old_quantity),
                Some(input) => {
                    let consumed = if output.is_zero() {
                        Decimal::ZERO
                    } else {
                        output
                            .checked_div(input.rate)
                            .ok_or(ProductionError::Arithmetic)?
                    };
                    let remaining = old_quantity
                        .checked_sub(consumed)
                        .ok_or(ProductionError::Arithmetic)?;
                    let quantized = ceil_to_step(remaining, input.step)
                        .ok_or(ProductionError::Arithmetic)?;
                    result.set(good, quantized);
                }
            }
        }

        // Credit the output, incrementing if the good already has an
        // entry (it may even be one of this activity's own inputs).
        result
            .credit(&self.output_good, output)
            .ok_or(ProductionError::Arithmetic)?;

        Ok(result)
    }

    /// The good this activity produces.
    pub fn output_good(&self) -> &str {
        &self.output_good
    }

    /// The declared input goods, in name order.
    pub fn input_goods(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    /// The conversion rate for one declared input good.
    pub fn conversion_rate(&self, good: &str) -> Option<Decimal> {
        self.inputs.get(good).map(|input| input.rate)
    }

    /// The resolved step amount for one declared input good.
    pub fn input_step(&self, good: &str) -> Option<Decimal> {
        self.inputs.get(good).map(|input| input.step)
    }

    /// Output units producible per unit of labor.
    pub const fn labor_rate(&self) -> Decimal {
        self.labor_rate
    }

    /// Output units producible per unit of land.
    pub const fn land_rate(&self) -> Decimal {
        self.land_rate
    }

    /// The output good's quantization step.
    pub const fn output_step(&self) -> Decimal {
        self.output_step
    }

    /// The production formula's source text.
    pub fn formula_text(&self) -> &str {
        self.formula.source()
    }
}

impl core::fmt::Display for Activity {
    /// Render the resolved configuration for diagnostics.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "activity output: {}", self.output_good)?;
        let input_names: Vec<&str> = self.input_goods().collect();
        writeln!(f, "input goods: {}", input_names.join(", "))?;
        writeln!(f, "production function: {}", self.formula)?;
        for (good, input) in &self.inputs {
            writeln!(
                f,
                "max productivity per {good}: {} (step {})",
                input.rate, input.step
            )?;
        }
        writeln!(f, "max productivity per labor: {}", self.labor_rate)?;
        writeln!(f, "max productivity per land: {}", self.land_rate)?;
        write!(f, "output step: {}", self.output_step)
    }
}
