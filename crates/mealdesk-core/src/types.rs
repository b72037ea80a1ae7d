//! # Domain Types
//!
//! Core domain types shared by every stage of the pricing pipeline.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │  ModifierRule   │   │  PricedOption   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  kind           │   │  id             │       │
//! │  │  name           │   │  key            │   │  label          │       │
//! │  │  category       │   │  label          │   │  price          │       │
//! │  │  base_price     │   │  options[]      │   └─────────────────┘       │
//! │  │  kind ◄─────────┼── computed once at load                           │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   DrinkSize     │   │   DrinkTemp     │   │   SugarTier     │       │
//! │  │  S / M / L      │   │ ice/no_ice/hot  │   │ normal/unsweet  │       │
//! │  │  小 / 中 / 大   │   │ 冰 / 去冰 / 熱  │   │ 正常糖 / 無糖   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_base_price, validate_item_name};

// =============================================================================
// Item Kind
// =============================================================================

/// How the ordering screen treats a menu item.
///
/// Derived once from the category and item name when the item is loaded,
/// then pattern-matched everywhere else.
///
/// ## Classification Order
/// ```text
/// category contains 套餐 ─────────────► SetMeal
/// name contains 濃湯 ─────────────────► Soup
/// category contains 咖啡 ─────────────► Coffee
/// category contains 飲料 ─────────────► Drink
/// anything else ──────────────────────► Standard
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A set meal with an included drink.
    SetMeal,
    /// A soup; one size, one temperature, never a size surcharge.
    Soup,
    /// Ground coffee sold on its own.
    Coffee,
    /// A drink sold on its own.
    Drink,
    /// Food items (burgers, toast, omelets, ...).
    Standard,
}

impl ItemKind {
    /// Classifies an item from its category name and display name.
    pub fn classify(category: &str, name: &str) -> Self {
        if category.contains("套餐") {
            ItemKind::SetMeal
        } else if name.contains("濃湯") {
            ItemKind::Soup
        } else if category.contains("咖啡") {
            ItemKind::Coffee
        } else if category.contains("飲料") {
            ItemKind::Drink
        } else {
            ItemKind::Standard
        }
    }

    /// Drinks and coffees priced by their own size table.
    #[inline]
    pub fn is_standalone_drink(&self) -> bool {
        matches!(self, ItemKind::Drink | ItemKind::Coffee)
    }

    /// Whether the generic modifier rules are offered.
    #[inline]
    pub fn shows_generic_rules(&self) -> bool {
        !self.is_standalone_drink()
    }

    /// Whether a combo upgrade may be attached.
    #[inline]
    pub fn allows_upgrade(&self) -> bool {
        matches!(self, ItemKind::Standard)
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A menu item as delivered by the menu catalog collaborator.
///
/// Deserialization validates the name and base price and computes
/// [`ItemKind`], so a `MenuItem` in hand is always classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MenuItemRecord")]
pub struct MenuItem {
    /// Product id from the menu catalog.
    pub id: String,

    /// Display name, also the key for item-specific rules and drink tables.
    pub name: String,

    /// Category display name (e.g. `漢堡`, `飲料`).
    pub category: String,

    /// Base price before any modifier.
    pub base_price: Money,

    /// Optional description for the ordering screen.
    pub description: Option<String>,

    /// Classification derived from `category` and `name`.
    pub kind: ItemKind,
}

/// Wire shape of a menu item before classification.
#[derive(Debug, Clone, Deserialize)]
struct MenuItemRecord {
    id: String,
    name: String,
    #[serde(alias = "categoryName")]
    category: String,
    base_price: Money,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<MenuItemRecord> for MenuItem {
    type Error = ValidationError;

    fn try_from(record: MenuItemRecord) -> Result<Self, Self::Error> {
        MenuItem::new(record.id, record.name, record.category, record.base_price)
            .map(|item| item.with_description(record.description))
    }
}

impl MenuItem {
    /// Creates a validated, classified menu item.
    ///
    /// ## Example
    /// ```rust
    /// use mealdesk_core::{ItemKind, MenuItem, Money};
    ///
    /// let item = MenuItem::new("p-1", "紅茶", "飲料", Money::from_units(15)).unwrap();
    /// assert_eq!(item.kind, ItemKind::Drink);
    /// ```
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        base_price: Money,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let category = category.into();
        validate_item_name(&name)?;
        validate_base_price(base_price)?;

        let kind = ItemKind::classify(&category, &name);
        Ok(MenuItem {
            id: id.into(),
            name,
            category,
            base_price,
            description: None,
            kind,
        })
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

// =============================================================================
// Modifier Rules
// =============================================================================

/// Whether a rule's options are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Exactly one option may be active; a new choice replaces the old one.
    Choice,
    /// Any subset of options may be active; selecting twice deselects.
    Toggle,
}

/// One priceable option within a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOption {
    pub label: String,
    /// Price delta; negative for removals (`不加蛋` = -5).
    pub price: Money,
}

impl RuleOption {
    pub fn new(label: impl Into<String>, price: i64) -> Self {
        RuleOption {
            label: label.into(),
            price: Money::from_units(price),
        }
    }
}

/// A named, typed set of options attachable to a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    /// Stable key identifying the rule within an item (e.g. `egg`, `remove`).
    pub key: String,
    /// Section heading (e.g. `加肉`, `客製`).
    pub label: String,
    pub options: Vec<RuleOption>,
}

impl ModifierRule {
    /// A single-choice rule.
    pub fn choice(key: &str, label: &str, options: Vec<RuleOption>) -> Self {
        ModifierRule {
            kind: RuleKind::Choice,
            key: key.to_string(),
            label: label.to_string(),
            options,
        }
    }

    /// A multi-toggle rule.
    pub fn toggle(key: &str, label: &str, options: Vec<RuleOption>) -> Self {
        ModifierRule {
            kind: RuleKind::Toggle,
            key: key.to_string(),
            label: label.to_string(),
            options,
        }
    }

    /// A toggle with a single option labelled like the rule itself
    /// (`加蛋` +15).
    pub fn single_toggle(key: &str, label: &str, price: i64) -> Self {
        Self::toggle(key, label, vec![RuleOption::new(label, price)])
    }

    /// Finds an option by label.
    pub fn option(&self, label: &str) -> Option<&RuleOption> {
        self.options.iter().find(|o| o.label == label)
    }
}

// =============================================================================
// Drink Attributes
// =============================================================================

/// Cup size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DrinkSize {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
}

impl DrinkSize {
    /// Short code used in catalogs (`S`, `M`, `L`).
    pub fn code(&self) -> &'static str {
        match self {
            DrinkSize::Small => "S",
            DrinkSize::Medium => "M",
            DrinkSize::Large => "L",
        }
    }

    /// Text printed on order labels.
    pub fn display_text(&self) -> &'static str {
        match self {
            DrinkSize::Small => "小",
            DrinkSize::Medium => "中",
            DrinkSize::Large => "大",
        }
    }
}

impl fmt::Display for DrinkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Serving temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DrinkTemp {
    Ice,
    NoIce,
    Hot,
}

impl DrinkTemp {
    /// Text printed on order labels.
    pub fn display_text(&self) -> &'static str {
        match self {
            DrinkTemp::Ice => "冰",
            DrinkTemp::NoIce => "去冰",
            DrinkTemp::Hot => "熱",
        }
    }
}

/// Sugar level. Descriptive only, never priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SugarTier {
    #[default]
    Normal,
    Unsweet,
}

impl SugarTier {
    /// Text printed on order labels.
    pub fn display_text(&self) -> &'static str {
        match self {
            SugarTier::Normal => "正常糖",
            SugarTier::Unsweet => "無糖",
        }
    }
}

// =============================================================================
// Priced Option
// =============================================================================

/// One finalized customization, as persisted with the order line.
///
/// ## Examples
/// ```text
/// { id: "egg",       label: "加蛋",                         price: 15 }
/// { id: "up_39_hotdog", label: "升級：熱狗＋紅茶(大/冰)",   price: 49 }
/// { id: "set_drink", label: "飲品：可可亞牛奶(大/熱)",       price: 30 }
/// { id: "spec",      label: "大/去冰/無糖",                  price: 10 }
/// { id: "note",      label: "備: 醬少",                      price: 0  }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricedOption {
    pub id: String,
    pub label: String,
    pub price: Money,
}

impl PricedOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, price: Money) -> Self {
        PricedOption {
            id: id.into(),
            label: label.into(),
            price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
