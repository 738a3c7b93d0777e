//! Error types for the `homestead-production` crate.
//!
//! Every error is a programmer or configuration error, not a transient
//! failure: nothing here is retried or swallowed. `perform` has no
//! partial-success state -- it either returns a fully updated stock or
//! fails with the caller's snapshot untouched.

use rust_decimal::Decimal;

use homestead_catalog::CatalogError;

use crate::formula::FormulaError;

/// Errors that can occur constructing or performing a production activity.
#[derive(Debug, thiserror::Error)]
pub enum ProductionError {
    /// Catalog resolution failed (unknown or ambiguous good name).
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },

    /// The production formula failed to parse or evaluate.
    #[error("formula error: {source}")]
    Formula {
        /// The underlying formula error.
        #[from]
        source: FormulaError,
    },

    /// A declared input good has no entry in the supplied stock.
    ///
    /// A zero quantity is legal; a missing key is not. Nothing is
    /// consumed or produced.
    #[error("no output is possible because '{good}' is missing from the available stock")]
    MissingInput {
        /// The absent input good.
        good: String,
    },

    /// A capacity contribution came out negative.
    #[error("invalid capacity contribution for '{name}': {value}")]
    InvalidInput {
        /// The contribution's variable name (an input good, `labor`, or
        /// `land`).
        name: String,
        /// The offending value.
        value: Decimal,
    },

    /// The production formula evaluated to a negative output.
    ///
    /// This signals a misconfigured formula or productivity table; the
    /// activity refuses to run rather than clamping to zero.
    #[error("production formula yielded negative output {value}")]
    NegativeOutput {
        /// The negative formula result.
        value: Decimal,
    },

    /// Arithmetic overflow or division by zero in a checked operation.
    #[error("arithmetic overflow in production calculation")]
    Arithmetic,
}
