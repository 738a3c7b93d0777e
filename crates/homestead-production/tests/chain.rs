//! Multi-day production chain integration test.
//!
//! Drives a four-activity chain (stone mining, woodcutting, axe and
//! hammer tool-making) over successive days, threading the stock
//! snapshot through every activity in order -- the simulator's main
//! usage pattern. Verifies the binding-constraint, conservation,
//! pass-through, and no-mutation properties across whole days rather
//! than single calls.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use homestead_catalog::MaterialCatalog;
use homestead_production::Activity;
use homestead_types::{MaterialSpec, Stock};

const LABOR: Decimal = dec!(10);
const LAND: Decimal = dec!(20);

fn spec(
    name: &str,
    formula: &str,
    inputs: &[(&str, Decimal)],
    labor_rate: Decimal,
    land_rate: Decimal,
) -> MaterialSpec {
    let max_productivity_per_input_good: BTreeMap<String, Decimal> = inputs
        .iter()
        .map(|(good, rate)| (String::from(*good), *rate))
        .collect();
    MaterialSpec {
        name: String::from(name),
        production_function: String::from(formula),
        max_productivity_per_input_good,
        max_productivity_per_labor: labor_rate,
        max_productivity_per_land: land_rate,
        step_amount: dec!(1),
    }
}

fn chain_catalog() -> MaterialCatalog {
    let specs = vec![
        spec("stone", "min(labor, land)", &[], dec!(3), dec!(1)),
        spec("wood", "min(labor, land)", &[], dec!(2), dec!(1)),
        spec(
            "axe",
            "min(wood, stone, labor, land)",
            &[("wood", dec!(0.5)), ("stone", dec!(0.2))],
            dec!(1),
            dec!(1),
        ),
        spec(
            "hammer",
            "min(wood, stone, labor, land)",
            &[("wood", dec!(0.4)), ("stone", dec!(0.25))],
            dec!(1),
            dec!(1),
        ),
    ];
    match MaterialCatalog::from_specs(specs) {
        Ok(catalog) => catalog,
        Err(err) => panic!("chain catalog must validate: {err}"),
    }
}

fn chain_activities(catalog: &MaterialCatalog) -> Vec<Activity> {
    ["stone", "wood", "axe", "hammer"]
        .iter()
        .map(|good| match Activity::new(good, catalog) {
            Ok(activity) => activity,
            Err(err) => panic!("activity '{good}' must construct: {err}"),
        })
        .collect()
}

fn starting_stock() -> Stock {
    Stock::new()
        .with_good("wood", dec!(100))
        .with_good("stone", dec!(50))
        .with_good("axe", Decimal::ZERO)
        .with_good("hammer", Decimal::ZERO)
}

/// Run one day: every activity in chain order, threading the snapshot.
fn run_day(activities: &[Activity], stock: &Stock) -> Stock {
    let mut current = stock.clone();
    for activity in activities {
        current = match activity.perform(LABOR, LAND, &current) {
            Ok(next) => next,
            Err(err) => panic!(
                "activity '{}' must succeed mid-chain: {err}",
                activity.output_good()
            ),
        };
    }
    current
}

#[test]
fn first_day_of_the_chain_is_exact() {
    let catalog = chain_catalog();
    let activities = chain_activities(&catalog);

    let day_one = run_day(&activities, &starting_stock());

    // Mining: +20 stone (land binds). Woodcutting: +20 wood (land binds).
    // Axe: min(120*0.5, 70*0.2, 10, 20) = 10 -> wood 100, stone 20.
    // Hammer: min(100*0.4, 20*0.25, 10, 20) = 5 -> wood 87.5 ceil 88,
    // stone 0.
    assert_eq!(day_one.get("wood"), Some(dec!(88)));
    assert_eq!(day_one.get("stone"), Some(Decimal::ZERO));
    assert_eq!(day_one.get("axe"), Some(dec!(10)));
    assert_eq!(day_one.get("hammer"), Some(dec!(5)));
}

#[test]
fn second_day_rides_the_regenerated_stone() {
    let catalog = chain_catalog();
    let activities = chain_activities(&catalog);

    let day_one = run_day(&activities, &starting_stock());
    let day_two = run_day(&activities, &day_one);

    // Mining: stone 20. Woodcutting: wood 108.
    // Axe: min(54, 4, 10, 20) = 4 -> wood 100, stone 0, axe 14.
    // Hammer: stone binds at 0 -> nothing produced, nothing consumed.
    assert_eq!(day_two.get("wood"), Some(dec!(100)));
    assert_eq!(day_two.get("stone"), Some(Decimal::ZERO));
    assert_eq!(day_two.get("axe"), Some(dec!(14)));
    assert_eq!(day_two.get("hammer"), Some(dec!(5)));
}

#[test]
fn history_snapshots_survive_later_days() {
    let catalog = chain_catalog();
    let activities = chain_activities(&catalog);

    let mut history = vec![starting_stock()];
    for _ in 0..10 {
        let Some(latest) = history.last() else {
            panic!("history starts non-empty");
        };
        let next = run_day(&activities, latest);
        history.push(next);
    }

    assert_eq!(history.len(), 11);
    // The starting snapshot is untouched by ten days of production.
    assert_eq!(history.first(), Some(&starting_stock()));

    // Tool stocks never shrink: tools are produced, never consumed.
    for pair in history.windows(2) {
        let [before, after] = pair else {
            panic!("windows(2) yields pairs");
        };
        for tool in ["axe", "hammer"] {
            let earlier = before.get(tool).unwrap_or(Decimal::ZERO);
            let later = after.get(tool).unwrap_or(Decimal::ZERO);
            assert!(later >= earlier, "{tool} shrank from {earlier} to {later}");
        }
    }
}

#[test]
fn all_quantities_stay_step_aligned() {
    let catalog = chain_catalog();
    let activities = chain_activities(&catalog);

    let mut current = starting_stock();
    for _ in 0..10 {
        current = run_day(&activities, &current);
        for (good, quantity) in current.iter() {
            // Every step in this catalog is 1, so every stock level must
            // be a whole number.
            assert_eq!(
                quantity,
                quantity.floor(),
                "{good} stock {quantity} is not step-aligned"
            );
            assert!(
                quantity >= Decimal::ZERO,
                "{good} stock {quantity} went negative"
            );
        }
    }
}

#[test]
fn unrelated_goods_ride_through_whole_days() {
    let catalog = chain_catalog();
    let activities = chain_activities(&catalog);

    let stock = starting_stock().with_good("berries", dec!(12.5));
    let after = run_day(&activities, &stock);
    assert_eq!(after.get("berries"), Some(dec!(12.5)));
}

#[test]
fn a_day_against_bare_stock_fails_fast() {
    // Tool activities demand their inputs be present, even at zero.
    let catalog = chain_catalog();
    let axe = match Activity::new("axe", &catalog) {
        Ok(activity) => activity,
        Err(err) => panic!("axe must construct: {err}"),
    };

    let empty = Stock::new();
    let err = axe.perform(LABOR, LAND, &empty);
    assert!(err.is_err());
    // The failed call consumed nothing.
    assert!(empty.is_empty());
}
