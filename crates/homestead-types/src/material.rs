//! The [`MaterialSpec`] catalog record.
//!
//! One record describes how a good is produced: the textual production
//! formula, the productivity ceilings for each input good and for labor
//! and land, and the good's own quantization step. Records are stored in
//! the material catalog (a JSON array keyed by `name`) and resolved once
//! at activity construction.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reserved variable names for the production formula.
///
/// Labor and land participate in the formula symmetrically with input
/// goods, but they are flows rather than stocks: they are supplied fresh
/// on every `perform` call and never appear in a [`Stock`] mapping. A
/// catalog record must not declare an input good under either name.
///
/// [`Stock`]: crate::stock::Stock
pub mod reserved {
    /// Formula variable bound to `labor x max_productivity_per_labor`.
    pub const LABOR: &str = "labor";
    /// Formula variable bound to `land x max_productivity_per_land`.
    pub const LAND: &str = "land";
}

/// Static production configuration for one good.
///
/// Field names mirror the catalog file schema. `production_function` is
/// an arithmetic expression over the declared input-good names plus
/// `labor` and `land`; it is parsed into an AST at activity construction
/// and never executed as code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// The good this record describes. Unique within a catalog.
    pub name: String,

    /// Textual production formula, e.g. `min(wood, stone, labor, land)`.
    pub production_function: String,

    /// Output units producible per unit of each input good.
    ///
    /// The keys are this activity's declared inputs. Empty for primary
    /// goods (mining, woodcutting) that consume only labor and land.
    #[serde(default)]
    pub max_productivity_per_input_good: BTreeMap<String, Decimal>,

    /// Output units producible per unit of labor.
    pub max_productivity_per_labor: Decimal,

    /// Output units producible per unit of land.
    pub max_productivity_per_land: Decimal,

    /// Quantization granularity for this good's quantity. Strictly
    /// positive; validated at catalog construction.
    pub step_amount: Decimal,
}

impl MaterialSpec {
    /// Return the declared input-good names in name order.
    pub fn input_goods(&self) -> impl Iterator<Item = &str> {
        self.max_productivity_per_input_good
            .keys()
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn deserializes_catalog_record() {
        let json = r#"{
            "name": "axe",
            "production_function": "min(wood, stone, labor, land)",
            "max_productivity_per_input_good": {"wood": 0.5, "stone": 0.2},
            "max_productivity_per_labor": 1,
            "max_productivity_per_land": 0,
            "step_amount": 1
        }"#;
        let spec: Result<MaterialSpec, _> = serde_json::from_str(json);
        let spec = spec.ok();
        assert!(spec.is_some());
        let spec = spec.unwrap_or_else(|| MaterialSpec {
            name: String::new(),
            production_function: String::new(),
            max_productivity_per_input_good: BTreeMap::new(),
            max_productivity_per_labor: Decimal::ZERO,
            max_productivity_per_land: Decimal::ZERO,
            step_amount: Decimal::ONE,
        });
        assert_eq!(spec.name, "axe");
        assert_eq!(
            spec.max_productivity_per_input_good.get("wood"),
            Some(&dec!(0.5))
        );
        assert_eq!(
            spec.max_productivity_per_input_good.get("stone"),
            Some(&dec!(0.2))
        );
        assert_eq!(spec.max_productivity_per_labor, dec!(1));
        assert_eq!(spec.max_productivity_per_land, dec!(0));
        assert_eq!(spec.step_amount, dec!(1));
    }

    #[test]
    fn input_map_defaults_to_empty() {
        // Primary goods (wood, stone) consume only labor and land.
        let json = r#"{
            "name": "wood",
            "production_function": "min(labor, land)",
            "max_productivity_per_labor": 2,
            "max_productivity_per_land": 1,
            "step_amount": 1
        }"#;
        let spec: Result<MaterialSpec, _> = serde_json::from_str(json);
        assert!(
            spec.as_ref()
                .is_ok_and(|s| s.max_productivity_per_input_good.is_empty())
        );
    }

    #[test]
    fn input_goods_in_name_order() {
        let mut inputs = BTreeMap::new();
        inputs.insert(String::from("wood"), dec!(0.5));
        inputs.insert(String::from("stone"), dec!(0.2));
        let spec = MaterialSpec {
            name: String::from("axe"),
            production_function: String::from("min(wood, stone, labor, land)"),
            max_productivity_per_input_good: inputs,
            max_productivity_per_labor: dec!(1),
            max_productivity_per_land: dec!(0),
            step_amount: dec!(1),
        };
        let goods: Vec<&str> = spec.input_goods().collect();
        assert_eq!(goods, vec!["stone", "wood"]);
    }
}
