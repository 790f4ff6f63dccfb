//! Demand aggregation for order placement.
//!
//! Pure arithmetic over already-resolved order lines: no store access, no
//! side effects. The aggregation is commutative and associative, so any
//! line order produces identical per-ingredient totals and the identical
//! order total (exact `Decimal` arithmetic).

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One order line after catalog resolution: the requested quantity, the
/// unit price snapshot, and the per-unit ingredient requirements.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub quantity: i32,
    pub unit_price: Decimal,
    /// (ingredient id, quantity consumed per unit sold)
    pub ingredients: Vec<(Uuid, Decimal)>,
}

/// Aggregated demand for one order: total ingredient consumption across
/// all lines, plus the order's monetary total.
///
/// Keyed by a `BTreeMap` so iteration is in ingredient-id order; the
/// ledger relies on that to touch rows in a consistent order across
/// concurrent transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDemand {
    pub per_ingredient: BTreeMap<Uuid, Decimal>,
    pub total_amount: Decimal,
}

/// Sums ingredient requirements and line totals across all lines.
pub fn aggregate(lines: &[PricedLine]) -> OrderDemand {
    let mut demand = OrderDemand::default();

    for line in lines {
        let quantity = Decimal::from(line.quantity);
        demand.total_amount += line.unit_price * quantity;

        for (ingredient_id, per_unit) in &line.ingredients {
            *demand
                .per_ingredient
                .entry(*ingredient_id)
                .or_insert_with(Decimal::default) += *per_unit * quantity;
        }
    }

    demand
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(quantity: i32, unit_price: Decimal, ingredients: Vec<(Uuid, Decimal)>) -> PricedLine {
        PricedLine {
            quantity,
            unit_price,
            ingredients,
        }
    }

    #[test]
    fn empty_order_has_no_demand() {
        let demand = aggregate(&[]);
        assert!(demand.per_ingredient.is_empty());
        assert_eq!(demand.total_amount, Decimal::ZERO);
    }

    #[test]
    fn multiplies_per_unit_requirements_by_line_quantity() {
        let flour = Uuid::new_v4();
        let demand = aggregate(&[line(3, dec!(12.50), vec![(flour, dec!(150))])]);

        assert_eq!(demand.per_ingredient[&flour], dec!(450));
        assert_eq!(demand.total_amount, dec!(37.50));
    }

    #[test]
    fn sums_shared_ingredients_across_lines() {
        let flour = Uuid::new_v4();
        let cheese = Uuid::new_v4();

        let lines = vec![
            line(2, dec!(10), vec![(flour, dec!(100)), (cheese, dec!(40))]),
            line(1, dec!(8), vec![(flour, dec!(50))]),
        ];
        let demand = aggregate(&lines);

        assert_eq!(demand.per_ingredient[&flour], dec!(250));
        assert_eq!(demand.per_ingredient[&cheese], dec!(80));
        assert_eq!(demand.total_amount, dec!(28));
    }

    #[test]
    fn aggregation_is_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut lines = vec![
            line(1, dec!(5.25), vec![(a, dec!(10)), (b, dec!(2.5))]),
            line(4, dec!(3.75), vec![(b, dec!(1.25))]),
            line(2, dec!(9.00), vec![(a, dec!(0.5))]),
        ];

        let forward = aggregate(&lines);
        lines.reverse();
        let reversed = aggregate(&lines);

        assert_eq!(forward, reversed);
    }
}
