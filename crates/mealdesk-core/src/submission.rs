//! # Line Submission Builder
//!
//! Turns a finished line configuration into the flat option list and the
//! order line handed to the cart.
//!
//! ## Output Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. generic modifiers     { id: key,         label,  price: delta }    │
//! │  2. upgrade               { id: "up_<plan>", 升級：<side>＋<drink> }     │
//! │  3. set meal drink        { id: "set_drink", 飲品：<drink> }             │
//! │  4. standalone drink      { id: "spec",      <size>/<temp>[/<sugar>] } │
//! │  5. note                  { id: "note",      備: <note>, price: 0 }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every emitted price comes from the same functions as
//! [`price_breakdown`](crate::pricing::price_breakdown), so
//! `(base + Σ option prices) × quantity` always equals the line total.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::CoreResult;
use crate::money::Money;
use crate::pricing::{drink_surcharge, DrinkContext, LineConfig};
use crate::types::{ItemKind, PricedOption};
use crate::validation::{validate_note, validate_quantity};

/// Id prefix of upgrade descriptors (`up_39_hotdog`).
pub const UPGRADE_OPTION_PREFIX: &str = "up_";
pub const SET_DRINK_OPTION_ID: &str = "set_drink";
pub const SPEC_OPTION_ID: &str = "spec";
pub const NOTE_OPTION_ID: &str = "note";

/// Flattens a line into its ordered priced options.
pub fn build_priced_options(catalog: &Catalog, line: &LineConfig) -> Vec<PricedOption> {
    let item = &line.item;
    let rules = catalog.rules_for(&item.category, &item.name);

    let mut options: Vec<PricedOption> = line
        .selection
        .applicable_options(&rules)
        .into_iter()
        .map(|(key, option)| PricedOption::new(key, option.label.clone(), option.price))
        .collect();

    if let Some(plan) = line.upgrade_plan(catalog) {
        let drink = line.upgrade_drink(plan);
        let surcharge = drink_surcharge(
            catalog,
            drink,
            line.drink.size,
            DrinkContext::Upgrade { plan_id: &plan.id },
        );
        options.push(PricedOption::new(
            format!("{}{}", UPGRADE_OPTION_PREFIX, plan.id),
            format!(
                "升級：{}＋{}",
                plan.side_label(),
                line.drink.label_as(catalog, drink)
            ),
            plan.price + surcharge,
        ));
    }

    if let Some(drink) = line.set_meal_drink(catalog) {
        let surcharge = drink_surcharge(catalog, drink, line.drink.size, DrinkContext::SetMeal);
        options.push(PricedOption::new(
            SET_DRINK_OPTION_ID,
            format!("飲品：{}", line.drink.label_as(catalog, drink)),
            surcharge,
        ));
    }

    if item.kind.is_standalone_drink() {
        let surcharge = drink_surcharge(catalog, &item.name, line.drink.size, DrinkContext::Single);
        options.push(PricedOption::new(
            SPEC_OPTION_ID,
            line.drink.spec_label(catalog.drink_config(&item.name)),
            surcharge,
        ));
    }

    if let Some(note) = line.printed_note() {
        options.push(PricedOption::new(
            NOTE_OPTION_ID,
            format!("備: {}", note),
            Money::zero(),
        ));
    }

    options
}

// =============================================================================
// Order Line
// =============================================================================

/// A priced line handed to the cart.
///
/// ## Design Notes
/// - `line_id`: fresh UUID v4, so two identical configurations stay two lines
/// - `item_name` and `unit_price` are frozen at submission; later menu edits
///   don't change a line already in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub line_id: String,
    pub item_id: String,
    pub item_name: String,
    pub item_kind: ItemKind,
    pub quantity: u32,
    pub options: Vec<PricedOption>,
    /// Base price plus every option price.
    pub unit_price: Money,
    /// Unit price times quantity.
    pub subtotal: Money,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl OrderLine {
    /// Sum of the option prices.
    pub fn options_total(&self) -> Money {
        self.options.iter().map(|o| o.price).sum()
    }
}

/// Validates a line and builds the order line for the cart.
///
/// ## Errors
/// - quantity outside `1..=999`
/// - note longer than [`MAX_NOTE_LENGTH`](crate::MAX_NOTE_LENGTH)
pub fn build_order_line(catalog: &Catalog, line: &LineConfig) -> CoreResult<OrderLine> {
    validate_quantity(line.quantity)?;
    validate_note(&line.note)?;

    let options = build_priced_options(catalog, line);
    let options_total: Money = options.iter().map(|o| o.price).sum();
    let unit_price = line.item.base_price + options_total;

    Ok(OrderLine {
        line_id: Uuid::new_v4().to_string(),
        item_id: line.item.id.clone(),
        item_name: line.item.name.clone(),
        item_kind: line.item.kind,
        quantity: line.quantity,
        options,
        unit_price,
        subtotal: unit_price.multiply_quantity(line.quantity),
        added_at: Utc::now(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use crate::pricing::line_total;
    use crate::types::{DrinkSize, DrinkTemp, MenuItem, RuleKind, SugarTier};

    fn item(name: &str, category: &str, base: i64) -> MenuItem {
        MenuItem::new("p-1", name, category, Money::from_units(base)).unwrap()
    }

    fn ids(options: &[PricedOption]) -> Vec<&str> {
        options.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn test_generic_modifiers_then_upgrade_then_note() {
        let catalog = Catalog::builtin();
        let mut line = LineConfig::new(item("豬肉漢堡", "漢堡", 50));
        line.selection = line
            .selection
            .toggle("meat", "加培根", Money::from_units(25), RuleKind::Toggle)
            .toggle("egg", "加蛋", Money::from_units(15), RuleKind::Toggle);
        line.upgrade_id = Some("39_hotdog".to_string());
        line.drink.enter_upgrade(&catalog, "奶茶");
        line.drink.set_temperature(&catalog, DrinkTemp::NoIce);
        line.note = "  醬少 ".to_string();

        let options = build_priced_options(&catalog, &line);
        assert_eq!(ids(&options), vec!["egg", "meat", "up_39_hotdog", "note"]);
        assert_eq!(options[2].label, "升級：熱狗＋奶茶(中/去冰/正常糖)");
        assert_eq!(options[2].price.units(), 49);
        assert_eq!(options[3].label, "備:   醬少 ");
        assert_eq!(options[3].price, Money::zero());
    }

    #[test]
    fn test_set_meal_drink_descriptor() {
        let catalog = Catalog::builtin();
        let mut line = LineConfig::new(item("A套餐", "套餐", 80));
        line.set_drink_id = Some("cocoa".to_string());
        line.drink.enter_set_meal(&catalog, "可可亞牛奶");
        line.drink.set_size(&catalog, DrinkSize::Large);
        line.drink.set_temperature(&catalog, DrinkTemp::Hot);

        let options = build_priced_options(&catalog, &line);
        assert_eq!(
            options,
            vec![PricedOption::new("set_drink", "飲品：可可亞牛奶(大/熱)", Money::from_units(30))]
        );
    }

    #[test]
    fn test_set_meal_soup_prints_bare_name() {
        let catalog = Catalog::builtin();
        let mut line = LineConfig::new(item("B套餐", "套餐", 90));
        line.set_drink_id = Some("soup".to_string());
        line.drink.enter_set_meal(&catalog, "玉米濃湯");

        let options = build_priced_options(&catalog, &line);
        assert_eq!(options[0].label, "飲品：玉米濃湯");
        assert_eq!(options[0].price.units(), 25);
    }

    #[test]
    fn test_standalone_drink_spec_descriptor() {
        let catalog = Catalog::builtin();
        let mut line = LineConfig::new(item("美式咖啡", "研磨咖啡", 35));
        line.drink.enter_single(&catalog, "美式咖啡");
        line.drink.set_size(&catalog, DrinkSize::Large);
        line.drink.sugar = SugarTier::Unsweet;

        let options = build_priced_options(&catalog, &line);
        assert_eq!(
            options,
            vec![PricedOption::new("spec", "大/冰/無糖", Money::from_units(20))]
        );
    }

    #[test]
    fn test_soup_item_has_no_spec_line() {
        let catalog = Catalog::builtin();
        let line = LineConfig::new(item("玉米濃湯", "美味小點", 40));
        assert!(build_priced_options(&catalog, &line).is_empty());
    }

    #[test]
    fn test_note_is_printed_as_typed() {
        let catalog = Catalog::builtin();
        let mut line = LineConfig::new(item("薯餅", "美味小點", 25));
        assert!(build_priced_options(&catalog, &line).is_empty());

        line.note = "   ".to_string();
        assert_eq!(
            build_priced_options(&catalog, &line),
            vec![PricedOption::new("note", "備:    ", Money::zero())]
        );
    }

    #[test]
    fn test_order_line_matches_line_total() {
        let catalog = Catalog::builtin();
        let mut line = LineConfig::new(item("豬肉漢堡", "漢堡", 50));
        line.selection = line
            .selection
            .toggle("remove", "不加蛋", Money::from_units(-5), RuleKind::Toggle)
            .toggle("bread", "圓形帕瑪森", Money::from_units(10), RuleKind::Choice);
        line.upgrade_id = Some("69_fish".to_string());
        line.drink.enter_upgrade(&catalog, "鮮奶茶");
        line.drink.set_size(&catalog, DrinkSize::Large);
        line.quantity = 2;

        let order_line = build_order_line(&catalog, &line).unwrap();
        assert_eq!(order_line.subtotal, line_total(&catalog, &line));
        assert_eq!(order_line.unit_price, line.item.base_price + order_line.options_total());
        assert_eq!(order_line.subtotal.units(), (50 + 10 - 5 + 69 + 25) * 2);
        assert!(Uuid::parse_str(&order_line.line_id).is_ok());
    }

    #[test]
    fn test_order_lines_get_distinct_ids() {
        let catalog = Catalog::builtin();
        let line = LineConfig::new(item("薯餅", "美味小點", 25));
        let a = build_order_line(&catalog, &line).unwrap();
        let b = build_order_line(&catalog, &line).unwrap();
        assert_ne!(a.line_id, b.line_id);
    }

    #[test]
    fn test_order_line_rejects_bad_input() {
        let catalog = Catalog::builtin();
        let mut line = LineConfig::new(item("薯餅", "美味小點", 25));
        line.quantity = 0;
        assert!(matches!(
            build_order_line(&catalog, &line),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        line.quantity = 1;
        line.note = "加".repeat(crate::MAX_NOTE_LENGTH + 1);
        assert!(matches!(
            build_order_line(&catalog, &line),
            Err(CoreError::Validation(ValidationError::TooLong { .. }))
        ));
    }
}
