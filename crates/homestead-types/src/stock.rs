//! The [`Stock`] resource mapping: a snapshot of stock levels.
//!
//! A stock maps good names to quantities. It represents the goods
//! available at one point in simulated time. Production never mutates a
//! stock in place -- each `perform` call returns a fresh snapshot, so
//! callers can retain the pre-call snapshot for history.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A snapshot of stock levels, one entry per good.
///
/// Keys are good names; values are quantities. Quantities supplied by
/// callers are expected to be non-negative; the production core validates
/// this on every use and rejects negative quantities rather than
/// silently clamping them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stock {
    goods: BTreeMap<String, Decimal>,
}

impl Stock {
    /// Create an empty stock.
    pub const fn new() -> Self {
        Self {
            goods: BTreeMap::new(),
        }
    }

    /// Builder-style helper: return this stock with `good` set to `quantity`.
    #[must_use]
    pub fn with_good(mut self, good: &str, quantity: Decimal) -> Self {
        self.goods.insert(String::from(good), quantity);
        self
    }

    /// Return the quantity of `good`, or `None` if the good has no entry.
    ///
    /// A good with quantity zero is present; a good with no entry is
    /// absent. The distinction matters: production requires its declared
    /// inputs to be *present*, even at quantity zero.
    pub fn get(&self, good: &str) -> Option<Decimal> {
        self.goods.get(good).copied()
    }

    /// Return whether `good` has an entry in this stock.
    pub fn contains(&self, good: &str) -> bool {
        self.goods.contains_key(good)
    }

    /// Set the quantity of `good`, inserting the entry if absent.
    pub fn set(&mut self, good: &str, quantity: Decimal) {
        self.goods.insert(String::from(good), quantity);
    }

    /// Add `quantity` to `good`, inserting the entry at `quantity` if
    /// absent. Returns the new total, or `None` on arithmetic overflow.
    pub fn credit(&mut self, good: &str, quantity: Decimal) -> Option<Decimal> {
        let current = self.get(good).unwrap_or(Decimal::ZERO);
        let total = current.checked_add(quantity)?;
        self.set(good, total);
        Some(total)
    }

    /// Iterate over `(good, quantity)` entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.goods.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    /// Return the number of goods with an entry.
    pub fn len(&self) -> usize {
        self.goods.len()
    }

    /// Return whether the stock has no entries.
    pub fn is_empty(&self) -> bool {
        self.goods.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for Stock {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            goods: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, Decimal>> for Stock {
    fn from(goods: BTreeMap<String, Decimal>) -> Self {
        Self { goods }
    }
}
