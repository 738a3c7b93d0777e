//! The [`MaterialCatalog`]: loading and exactly-one-match lookup.

use std::path::Path;

use rust_decimal::Decimal;
use tracing::debug;

use homestead_types::{MaterialSpec, reserved};

use crate::error::CatalogError;

/// Read-only catalog of [`MaterialSpec`] records.
///
/// Backed by a JSON array of records. Records are kept as a flat list,
/// not an index, so duplicate names survive loading and every lookup can
/// enforce the exactly-one-match rule.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    specs: Vec<MaterialSpec>,
}

impl MaterialCatalog {
    /// Load a catalog from a JSON file containing an array of records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read,
    /// [`CatalogError::Json`] if the content is not a valid record array,
    /// or [`CatalogError::InvalidSpec`] if a record violates a structural
    /// invariant (see [`MaterialCatalog::from_specs`]).
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&contents)?;
        debug!(
            path = %path.display(),
            records = catalog.len(),
            "material catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a catalog from a JSON string containing an array of records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] on malformed JSON, or
    /// [`CatalogError::InvalidSpec`] if a record violates a structural
    /// invariant.
    pub fn parse(json: &str) -> Result<Self, CatalogError> {
        let specs: Vec<MaterialSpec> = serde_json::from_str(json)?;
        Self::from_specs(specs)
    }

    /// Build a catalog from in-memory records.
    ///
    /// This is the constructor test fixtures use; file loading funnels
    /// through it as well, so validation runs exactly once per record:
    ///
    /// - `step_amount` must be strictly positive,
    /// - every productivity rate must be non-negative,
    /// - no input good may use the reserved names `labor` or `land`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidSpec`] naming the first offending
    /// record.
    pub fn from_specs(specs: Vec<MaterialSpec>) -> Result<Self, CatalogError> {
        for spec in &specs {
            validate_spec(spec)?;
        }
        Ok(Self { specs })
    }

    /// Resolve the record for `name` under exactly-one-match semantics.
    ///
    /// The whole record list is scanned on every call so that duplicate
    /// names are always detected, whichever name is asked for first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for zero matches and
    /// [`CatalogError::Ambiguous`] for more than one.
    pub fn material_data(&self, name: &str) -> Result<&MaterialSpec, CatalogError> {
        let mut matches = self.specs.iter().filter(|spec| spec.name == name);
        let Some(first) = matches.next() else {
            return Err(CatalogError::NotFound {
                name: String::from(name),
            });
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(CatalogError::Ambiguous {
                name: String::from(name),
                count: extra.saturating_add(1),
            });
        }
        Ok(first)
    }

    /// Iterate over the good names in the catalog, in record order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| spec.name.as_str())
    }

    /// Return the number of records in the catalog.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Return whether the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Check one record against the catalog's structural invariants.
fn validate_spec(spec: &MaterialSpec) -> Result<(), CatalogError> {
    if spec.step_amount <= Decimal::ZERO {
        return Err(CatalogError::InvalidSpec {
            name: spec.name.clone(),
            reason: format!("step_amount must be positive, got {}", spec.step_amount),
        });
    }
    if spec.max_productivity_per_labor.is_sign_negative() {
        return Err(CatalogError::InvalidSpec {
            name: spec.name.clone(),
            reason: format!(
                "max_productivity_per_labor must be non-negative, got {}",
                spec.max_productivity_per_labor
            ),
        });
    }
    if spec.max_productivity_per_land.is_sign_negative() {
        return Err(CatalogError::InvalidSpec {
            name: spec.name.clone(),
            reason: format!(
                "max_productivity_per_land must be non-negative, got {}",
                spec.max_productivity_per_land
            ),
        });
    }
    for (good, rate) in &spec.max_productivity_per_input_good {
        if good == reserved::LABOR || good == reserved::LAND {
            return Err(CatalogError::InvalidSpec {
                name: spec.name.clone(),
                reason: format!("input good '{good}' uses a reserved variable name"),
            });
        }
        if rate.is_sign_negative() {
            return Err(CatalogError::InvalidSpec {
                name: spec.name.clone(),
                reason: format!("conversion rate for '{good}' must be non-negative, got {rate}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal_macros::dec;

    use super::*;

    fn spec(name: &str, inputs: &[(&str, Decimal)]) -> MaterialSpec {
        let max_productivity_per_input_good: BTreeMap<String, Decimal> = inputs
            .iter()
            .map(|(good, rate)| (String::from(*good), *rate))
            .collect();
        MaterialSpec {
            name: String::from(name),
            production_function: String::from("min(labor, land)"),
            max_productivity_per_input_good,
            max_productivity_per_labor: dec!(1),
            max_productivity_per_land: dec!(1),
            step_amount: dec!(1),
        }
    }

    #[test]
    fn lookup_finds_unique_record() {
        let catalog = MaterialCatalog::from_specs(vec![spec("wood", &[]), spec("stone", &[])]);
        assert!(catalog.is_ok());
        let catalog = catalog.unwrap_or_default();
        let found = catalog.material_data("wood");
        assert!(found.is_ok_and(|s| s.name == "wood"));
    }

    #[test]
    fn lookup_missing_name_is_not_found() {
        let catalog = MaterialCatalog::from_specs(vec![spec("wood", &[])]).unwrap_or_default();
        let err = catalog.material_data("iron");
        assert!(matches!(err, Err(CatalogError::NotFound { name }) if name == "iron"));
    }

    #[test]
    fn duplicate_names_are_ambiguous() {
        let catalog = MaterialCatalog::from_specs(vec![spec("wood", &[]), spec("wood", &[])])
            .unwrap_or_default();
        let err = catalog.material_data("wood");
        assert!(matches!(
            err,
            Err(CatalogError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn duplicates_of_other_names_do_not_block_lookup() {
        let catalog = MaterialCatalog::from_specs(vec![
            spec("wood", &[]),
            spec("wood", &[]),
            spec("stone", &[]),
        ])
        .unwrap_or_default();
        assert!(catalog.material_data("stone").is_ok());
    }

    #[test]
    fn zero_step_rejected_at_construction() {
        let mut bad = spec("wood", &[]);
        bad.step_amount = Decimal::ZERO;
        let err = MaterialCatalog::from_specs(vec![bad]);
        assert!(matches!(err, Err(CatalogError::InvalidSpec { name, .. }) if name == "wood"));
    }

    #[test]
    fn negative_rate_rejected_at_construction() {
        let bad = spec("axe", &[("wood", dec!(-0.5))]);
        let err = MaterialCatalog::from_specs(vec![bad]);
        assert!(matches!(err, Err(CatalogError::InvalidSpec { name, .. }) if name == "axe"));
    }

    #[test]
    fn reserved_input_name_rejected() {
        let bad = spec("axe", &[("labor", dec!(1))]);
        let err = MaterialCatalog::from_specs(vec![bad]);
        assert!(matches!(err, Err(CatalogError::InvalidSpec { .. })));
    }

    #[test]
    fn parses_record_array() {
        let json = r#"[
            {
                "name": "axe",
                "production_function": "min(wood, stone, labor, land)",
                "max_productivity_per_input_good": {"wood": 0.5, "stone": 0.2},
                "max_productivity_per_labor": 1,
                "max_productivity_per_land": 0,
                "step_amount": 1
            },
            {
                "name": "wood",
                "production_function": "min(labor, land)",
                "max_productivity_per_labor": 2,
                "max_productivity_per_land": 1,
                "step_amount": 1
            }
        ]"#;
        let catalog = MaterialCatalog::parse(json);
        assert!(catalog.as_ref().is_ok_and(|c| c.len() == 2));
        let catalog = catalog.unwrap_or_default();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["axe", "wood"]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = MaterialCatalog::parse("[{\"name\": ");
        assert!(matches!(err, Err(CatalogError::Json { .. })));
    }
}
