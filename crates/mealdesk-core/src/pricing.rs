//! # Price Calculator
//!
//! Pure functions from a line configuration to a price. Re-evaluated on every
//! tap, so identical input always yields identical output.
//!
//! ## Line Total
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         price_breakdown(line)                           │
//! │                                                                         │
//! │    base_price                                   50   (豬肉漢堡)         │
//! │  + applicable generic modifiers                 40   (加蛋, 加培根)     │
//! │  + upgrade: plan.price + surcharge(upgrade)      0                      │
//! │  + set meal drink: surcharge(set)                0                      │
//! │  + standalone drink: surcharge(single)           0                      │
//! │  ─────────────────────────────────────────────────                      │
//! │    unit price                                   90                      │
//! │  × quantity                                      3                      │
//! │  ═════════════════════════════════════════════════                      │
//! │    total                                       270                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Drink Surcharges
//! | Context   | Surcharge                                              |
//! |-----------|--------------------------------------------------------|
//! | single    | `price[size] − min(price)`                             |
//! | set meal  | `max(0, price[size] − 15)`                             |
//! | upgrade   | 0 for the plan's default drink, else `max(0, price[size] − credit)` |
//!
//! Unknown drinks and unknown plans contribute nothing.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, UpgradePlan};
use crate::drink::DrinkSelection;
use crate::money::Money;
use crate::selection::SelectionState;
use crate::types::{DrinkSize, ItemKind, MenuItem};
use crate::SET_MEAL_DRINK_CREDIT;

// =============================================================================
// Drink Surcharge
// =============================================================================

/// Where a drink's price is being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrinkContext<'a> {
    /// A drink or coffee bought on its own.
    Single,
    /// The drink included with a set meal.
    SetMeal,
    /// The replacement drink of a combo upgrade.
    Upgrade { plan_id: &'a str },
}

/// Extra charge for a drink size in a context. Never negative.
///
/// ## Example
/// ```rust
/// use mealdesk_core::pricing::{drink_surcharge, DrinkContext};
/// use mealdesk_core::{Catalog, DrinkSize};
///
/// let catalog = Catalog::builtin();
/// let large = drink_surcharge(&catalog, "紅茶", DrinkSize::Large, DrinkContext::Single);
/// assert_eq!(large.units(), 10); // 25 - 15
/// ```
pub fn drink_surcharge(
    catalog: &Catalog,
    drink: &str,
    size: DrinkSize,
    context: DrinkContext<'_>,
) -> Money {
    let Some(config) = catalog.drink_config(drink) else {
        return Money::zero();
    };
    let price = config.price(size);

    match context {
        DrinkContext::Single => (price - config.min_price()).floor_zero(),
        DrinkContext::SetMeal => {
            (price - Money::from_units(SET_MEAL_DRINK_CREDIT)).floor_zero()
        }
        DrinkContext::Upgrade { plan_id } => match catalog.upgrade_plan(plan_id) {
            Some(plan) if plan.is_default(drink, size) => Money::zero(),
            Some(plan) => (price - plan.credit).floor_zero(),
            None => Money::zero(),
        },
    }
}

/// "From" amount shown next to a drink in an upgrade plan's drink picker:
/// the medium cup (small when no medium is sold) minus the plan's credit.
pub fn upgrade_drink_hint(catalog: &Catalog, plan: &UpgradePlan, drink: &str) -> Money {
    if drink == plan.default_drink {
        return Money::zero();
    }
    match catalog.drink_config(drink) {
        Some(config) => {
            let reference = config
                .prices
                .get(DrinkSize::Medium)
                .or(config.prices.get(DrinkSize::Small))
                .unwrap_or_default();
            (reference - plan.credit).floor_zero()
        }
        None => Money::zero(),
    }
}

// =============================================================================
// Line Configuration
// =============================================================================

fn default_quantity() -> u32 {
    1
}

/// Everything that determines one line's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConfig {
    pub item: MenuItem,

    /// Generic modifier selections.
    #[serde(default)]
    pub selection: SelectionState,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Active combo upgrade.
    #[serde(default)]
    pub upgrade_id: Option<String>,

    /// Chosen set-meal drink.
    #[serde(default)]
    pub set_drink_id: Option<String>,

    /// Size, temperature and sugar of the line's drink.
    #[serde(default)]
    pub drink: DrinkSelection,

    /// Free-text kitchen note.
    #[serde(default)]
    pub note: String,
}

impl LineConfig {
    /// A fresh line: no selections, quantity 1.
    pub fn new(item: MenuItem) -> Self {
        LineConfig {
            item,
            selection: SelectionState::new(),
            quantity: 1,
            upgrade_id: None,
            set_drink_id: None,
            drink: DrinkSelection::default(),
            note: String::new(),
        }
    }

    /// The active upgrade plan, if the id resolves.
    pub fn upgrade_plan<'c>(&self, catalog: &'c Catalog) -> Option<&'c UpgradePlan> {
        self.upgrade_id
            .as_deref()
            .and_then(|id| catalog.upgrade_plan(id))
    }

    /// The drink an upgrade is priced against: the chosen drink, or the
    /// plan's default drink when none was chosen.
    pub fn upgrade_drink<'a>(&'a self, plan: &'a UpgradePlan) -> &'a str {
        if self.drink.is_empty() {
            &plan.default_drink
        } else {
            &self.drink.name
        }
    }

    /// The set meal's drink name, if this is a set meal with a known choice.
    pub fn set_meal_drink<'c>(&self, catalog: &'c Catalog) -> Option<&'c str> {
        if self.item.kind != ItemKind::SetMeal {
            return None;
        }
        self.set_drink_id
            .as_deref()
            .and_then(|id| catalog.set_meal_drink(id))
            .map(|choice| choice.drink.as_str())
    }

    /// The note exactly as typed, `None` when empty.
    pub fn printed_note(&self) -> Option<&str> {
        (!self.note.is_empty()).then_some(self.note.as_str())
    }
}

// =============================================================================
// Price Breakdown
// =============================================================================

/// A line total split by source, for live price display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub base: Money,
    /// Generic modifiers that the item's rules actually offer.
    pub modifiers: Money,
    /// Upgrade price plus the replacement drink's surcharge.
    pub upgrade: Money,
    pub set_drink: Money,
    pub single_drink: Money,
    pub quantity: u32,
}

impl PriceBreakdown {
    /// Price of one unit.
    pub fn unit_price(&self) -> Money {
        self.base + self.modifiers + self.upgrade + self.set_drink + self.single_drink
    }

    /// Unit price times quantity.
    pub fn total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// Splits a line's price by source.
pub fn price_breakdown(catalog: &Catalog, line: &LineConfig) -> PriceBreakdown {
    let item = &line.item;
    let rules = catalog.rules_for(&item.category, &item.name);

    let upgrade = line
        .upgrade_plan(catalog)
        .map(|plan| {
            let surcharge = drink_surcharge(
                catalog,
                line.upgrade_drink(plan),
                line.drink.size,
                DrinkContext::Upgrade { plan_id: &plan.id },
            );
            plan.price + surcharge
        })
        .unwrap_or_default();

    let set_drink = line
        .set_meal_drink(catalog)
        .map(|drink| drink_surcharge(catalog, drink, line.drink.size, DrinkContext::SetMeal))
        .unwrap_or_default();

    let single_drink = if item.kind.is_standalone_drink() {
        drink_surcharge(catalog, &item.name, line.drink.size, DrinkContext::Single)
    } else {
        Money::zero()
    };

    PriceBreakdown {
        base: item.base_price,
        modifiers: line.selection.applicable_total(&rules),
        upgrade,
        set_drink,
        single_drink,
        quantity: line.quantity,
    }
}

/// Final line amount: unit price times quantity.
pub fn line_total(catalog: &Catalog, line: &LineConfig) -> Money {
    price_breakdown(catalog, line).total()
}

// =============================================================================
// Unit Tests
// =============================================================================
