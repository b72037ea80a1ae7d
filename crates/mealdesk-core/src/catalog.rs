//! # Rule Catalog
//!
//! Read-only lookup tables: category rules, item rules, drink configuration,
//! set-meal drink choices and combo-upgrade plans.
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         rules_for(category, item)                      │
//! │                                                                         │
//! │  "漢堡" ──► categories ──► "burger" ──► category_rules["burger"]       │
//! │  "未知" ──► (unmapped) ──► fallback_category ("snacks")                │
//! │                                                    │                    │
//! │  "蔥抓餅加蛋" ──► item_rules["蔥抓餅加蛋"] ─────────┤                    │
//! │                                                    ▼                    │
//! │                      [category rules..., item rules...]                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Process-Wide Catalog
//! The catalog never changes while the register runs. [`Catalog::global`]
//! returns the built-in tables unless [`Catalog::install`] fixed another
//! catalog first (e.g. one loaded from a TOML file at startup). Both go
//! through a `OnceLock`, so reads need no locking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::CatalogError;
use crate::money::Money;
use crate::types::{DrinkSize, DrinkTemp, ModifierRule, RuleOption};
use crate::FALLBACK_CATEGORY_KEY;

// =============================================================================
// Drink Configuration
// =============================================================================

/// Absolute price per cup size.
///
/// Serialized as `{ S = 15, M = 20, L = 25 }`; a missing key means the size
/// is not sold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePrices {
    #[serde(rename = "S", default, skip_serializing_if = "Option::is_none")]
    pub small: Option<Money>,
    #[serde(rename = "M", default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Money>,
    #[serde(rename = "L", default, skip_serializing_if = "Option::is_none")]
    pub large: Option<Money>,
}

impl SizePrices {
    /// Price for a size, if sold.
    pub fn get(&self, size: DrinkSize) -> Option<Money> {
        match size {
            DrinkSize::Small => self.small,
            DrinkSize::Medium => self.medium,
            DrinkSize::Large => self.large,
        }
    }

    /// Sets the price for a size.
    pub fn set(&mut self, size: DrinkSize, price: Money) {
        match size {
            DrinkSize::Small => self.small = Some(price),
            DrinkSize::Medium => self.medium = Some(price),
            DrinkSize::Large => self.large = Some(price),
        }
    }

    /// Sizes that have a price, smallest first.
    pub fn sizes(&self) -> impl Iterator<Item = DrinkSize> + '_ {
        [DrinkSize::Small, DrinkSize::Medium, DrinkSize::Large]
            .into_iter()
            .filter(|size| self.get(*size).is_some())
    }

    /// Cheapest listed price.
    pub fn min(&self) -> Option<Money> {
        [self.small, self.medium, self.large].into_iter().flatten().min()
    }
}

/// Per-drink sizes, prices, temperatures and flags.
///
/// ## Invariants (checked by [`Catalog::validate`])
/// - `sizes` and `temperatures` are non-empty
/// - every size in `sizes` has a price and every priced size is in `sizes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkConfig {
    pub name: String,
    pub sizes: Vec<DrinkSize>,
    pub prices: SizePrices,
    pub temperatures: Vec<DrinkTemp>,
    /// Sugar tier is offered and printed on the label.
    #[serde(default)]
    pub has_sugar: bool,
    /// Soups have one fixed price and print as the bare name.
    #[serde(default)]
    pub is_soup: bool,
}

impl DrinkConfig {
    /// Absolute price of a size.
    ///
    /// A size missing from the table falls back to the first listed size's
    /// price; a drink without prices costs nothing.
    pub fn price(&self, size: DrinkSize) -> Money {
        self.prices
            .get(size)
            .or_else(|| self.sizes.iter().find_map(|s| self.prices.get(*s)))
            .or_else(|| self.prices.min())
            .unwrap_or_default()
    }

    /// Cheapest size's price.
    pub fn min_price(&self) -> Money {
        self.prices.min().unwrap_or_default()
    }

    pub fn has_size(&self, size: DrinkSize) -> bool {
        self.sizes.contains(&size)
    }

    pub fn has_temperature(&self, temp: DrinkTemp) -> bool {
        self.temperatures.contains(&temp)
    }

    /// First valid size, the correction target for out-of-range sizes.
    pub fn first_size(&self) -> Option<DrinkSize> {
        self.sizes.first().copied()
    }

    /// First valid temperature.
    pub fn first_temperature(&self) -> Option<DrinkTemp> {
        self.temperatures.first().copied()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.sizes.is_empty() {
            return Err(CatalogError::EmptySizes {
                drink: self.name.clone(),
            });
        }
        if self.temperatures.is_empty() {
            return Err(CatalogError::EmptyTemperatures {
                drink: self.name.clone(),
            });
        }

        let priced_all_sizes = self.sizes.iter().all(|s| self.prices.get(*s).is_some());
        let no_extra_prices = self.prices.sizes().all(|s| self.sizes.contains(&s));
        if !priced_all_sizes || !no_extra_prices {
            return Err(CatalogError::PriceTableMismatch {
                drink: self.name.clone(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Set Meals & Upgrades
// =============================================================================

/// A drink offered with a set meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMealDrinkChoice {
    pub id: String,
    /// Drink name, a key into the drink table.
    pub drink: String,
    /// Display-only "from" amount; real pricing uses the size table.
    pub add: Money,
}

impl SetMealDrinkChoice {
    /// Dropdown hint, `(+$20起)` or empty when the drink is included.
    pub fn hint(&self) -> String {
        if self.add.is_positive() {
            format!("(+{}起)", self.add)
        } else {
            String::new()
        }
    }
}

/// A fixed combo upgrade: a side plus a drink, with a credit toward a
/// different drink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePlan {
    pub id: String,
    pub price: Money,
    /// `<side>＋<drink>` (e.g. `熱狗＋中紅`).
    pub label: String,
    /// Subtracted from a replacement drink's price.
    pub credit: Money,
    pub default_drink: String,
    pub default_size: DrinkSize,
}

impl UpgradePlan {
    /// The side dish part of the label (`熱狗` from `熱狗＋中紅`).
    pub fn side_label(&self) -> &str {
        self.label.split('＋').next().unwrap_or(self.label.as_str())
    }

    /// Whether a drink/size pair is the plan's included drink.
    pub fn is_default(&self, drink: &str, size: DrinkSize) -> bool {
        self.default_drink == drink && self.default_size == size
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The complete rule catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Category key used for category names with no mapping.
    #[serde(default = "default_fallback_category")]
    pub fallback_category: String,

    /// Category display name → category key.
    pub categories: BTreeMap<String, String>,

    /// Category key → generic rules, in declaration order.
    pub category_rules: BTreeMap<String, Vec<ModifierRule>>,

    /// Exact item name → extra rules, in declaration order.
    #[serde(default)]
    pub item_rules: BTreeMap<String, Vec<ModifierRule>>,

    /// Drink table, in menu order.
    pub drinks: Vec<DrinkConfig>,

    /// Set-meal drink choices, in menu order. The first one is the default.
    pub set_meal_drinks: Vec<SetMealDrinkChoice>,

    /// Combo upgrades, in menu order.
    pub upgrade_plans: Vec<UpgradePlan>,
}

fn default_fallback_category() -> String {
    FALLBACK_CATEGORY_KEY.to_string()
}

static GLOBAL: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    // =========================================================================
    // Process-wide instance
    // =========================================================================

    /// Returns the process-wide catalog, the built-in one unless another was
    /// installed first.
    pub fn global() -> &'static Catalog {
        GLOBAL.get_or_init(Catalog::builtin)
    }

    /// Validates and installs the process-wide catalog.
    ///
    /// Must run before the first [`Catalog::global`] call; afterwards the
    /// catalog is fixed and this returns [`CatalogError::AlreadyInstalled`].
    pub fn install(catalog: Catalog) -> Result<&'static Catalog, CatalogError> {
        catalog.validate()?;
        GLOBAL
            .set(catalog)
            .map_err(|_| CatalogError::AlreadyInstalled)?;
        Ok(Self::global())
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Parses and validates a TOML catalog document.
    pub fn from_toml_str(document: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = toml::from_str(document)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Renders the catalog as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, CatalogError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks drink tables and cross references.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (idx, drink) in self.drinks.iter().enumerate() {
            drink.validate()?;
            if self.drinks[..idx].iter().any(|d| d.name == drink.name) {
                return Err(CatalogError::DuplicateDrink {
                    drink: drink.name.clone(),
                });
            }
        }

        for plan in &self.upgrade_plans {
            let valid_default = self
                .drink_config(&plan.default_drink)
                .is_some_and(|d| d.has_size(plan.default_size));
            if !valid_default {
                return Err(CatalogError::UnknownDefaultDrink {
                    plan: plan.id.clone(),
                    drink: format!("{}/{}", plan.default_drink, plan.default_size),
                });
            }
        }

        for choice in &self.set_meal_drinks {
            if self.drink_config(&choice.drink).is_none() {
                return Err(CatalogError::UnknownSetMealDrink {
                    id: choice.id.clone(),
                    drink: choice.drink.clone(),
                });
            }
        }

        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Category key for a category display name.
    pub fn category_key(&self, category: &str) -> &str {
        self.categories
            .get(category)
            .map(String::as_str)
            .unwrap_or(self.fallback_category.as_str())
    }

    /// Rules applicable to an item: category rules, then item-specific rules.
    pub fn rules_for(&self, category: &str, item_name: &str) -> Vec<&ModifierRule> {
        let category_rules = self
            .category_rules
            .get(self.category_key(category))
            .into_iter()
            .flatten();
        let item_rules = self.item_rules.get(item_name).into_iter().flatten();
        category_rules.chain(item_rules).collect()
    }

    /// Drink configuration, or `None` for anything that isn't a drink.
    pub fn drink_config(&self, name: &str) -> Option<&DrinkConfig> {
        self.drinks.iter().find(|d| d.name == name)
    }

    /// All drinks, in menu order.
    pub fn drinks(&self) -> &[DrinkConfig] {
        &self.drinks
    }

    pub fn upgrade_plans(&self) -> &[UpgradePlan] {
        &self.upgrade_plans
    }

    pub fn upgrade_plan(&self, id: &str) -> Option<&UpgradePlan> {
        self.upgrade_plans.iter().find(|p| p.id == id)
    }

    pub fn set_meal_drinks(&self) -> &[SetMealDrinkChoice] {
        &self.set_meal_drinks
    }

    pub fn set_meal_drink(&self, id: &str) -> Option<&SetMealDrinkChoice> {
        self.set_meal_drinks.iter().find(|c| c.id == id)
    }

    // =========================================================================
    // Built-in tables
    // =========================================================================

    /// The shop's built-in catalog.
    pub fn builtin() -> Catalog {
        let categories = CATEGORY_KEYS
            .iter()
            .map(|(name, key)| (name.to_string(), key.to_string()))
            .collect();

        let drinks = DRINK_TABLE
            .iter()
            .map(|row| {
                let mut prices = SizePrices::default();
                for (size, price) in row.prices {
                    prices.set(*size, Money::from_units(*price));
                }
                DrinkConfig {
                    name: row.name.to_string(),
                    sizes: row.prices.iter().map(|(size, _)| *size).collect(),
                    prices,
                    temperatures: row.temps.to_vec(),
                    has_sugar: row.sugar,
                    is_soup: row.soup,
                }
            })
            .collect();

        let set_meal_drinks = SET_MEAL_DRINKS
            .iter()
            .map(|(id, drink, add)| SetMealDrinkChoice {
                id: id.to_string(),
                drink: drink.to_string(),
                add: Money::from_units(*add),
            })
            .collect();

        let upgrade_plans = UPGRADE_PLANS
            .iter()
            .map(|(id, price, label, credit, drink)| UpgradePlan {
                id: id.to_string(),
                price: Money::from_units(*price),
                label: label.to_string(),
                credit: Money::from_units(*credit),
                default_drink: drink.to_string(),
                default_size: DrinkSize::Medium,
            })
            .collect();

        Catalog {
            fallback_category: default_fallback_category(),
            categories,
            category_rules: builtin_category_rules(),
            item_rules: builtin_item_rules(),
            drinks,
            set_meal_drinks,
            upgrade_plans,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

// -----------------------------------------------------------------------------
// Table data
// -----------------------------------------------------------------------------

const CATEGORY_KEYS: &[(&str, &str)] = &[
    ("套餐", "setmeal"),
    ("漢堡", "burger"),
    ("烤土司", "toast"),
    ("蛋餅", "omelet"),
    ("總匯", "club"),
    ("店長推薦", "special"),
    ("帕瑪森/捲餅/香頌/燒餅", "custom"),
    ("美味小點", "snacks"),
    ("鍋燒系列", "hotpot"),
    ("飲料", "drinks"),
    ("研磨咖啡", "coffee"),
];

fn opts(options: &[(&str, i64)]) -> Vec<RuleOption> {
    options
        .iter()
        .map(|(label, price)| RuleOption::new(*label, *price))
        .collect()
}

fn builtin_category_rules() -> BTreeMap<String, Vec<ModifierRule>> {
    let remove_all = || {
        ModifierRule::toggle(
            "remove",
            "客製",
            opts(&[("不加蛋", -5), ("不加菜", 0), ("不加醬", 0)]),
        )
    };

    let mut rules = BTreeMap::new();
    rules.insert(
        "burger".to_string(),
        vec![
            ModifierRule::choice("bread", "麵包體", opts(&[("漢堡", 0), ("圓形帕瑪森", 10)])),
            ModifierRule::single_toggle("egg", "加蛋", 15),
            ModifierRule::single_toggle("cheese", "加起司", 10),
            ModifierRule::toggle(
                "meat",
                "加肉",
                opts(&[("加火腿", 15), ("加培根", 25), ("加里肌", 30), ("加卡拉雞", 45)]),
            ),
            remove_all(),
        ],
    );
    rules.insert(
        "toast".to_string(),
        vec![
            ModifierRule::toggle(
                "add",
                "加料",
                opts(&[("加起司", 10), ("換鬆餅", 15), ("加火腿", 15), ("加厚", 10)]),
            ),
            remove_all(),
        ],
    );
    rules.insert(
        "omelet".to_string(),
        vec![ModifierRule::toggle(
            "add",
            "加料",
            opts(&[("加起司", 10), ("雙蛋", 15), ("加火腿", 15)]),
        )],
    );
    rules.insert(
        "custom".to_string(),
        vec![
            ModifierRule::choice(
                "bread",
                "麵包體",
                opts(&[("帕瑪森", 10), ("捲餅", 5), ("香頌", 5), ("燒餅", 0)]),
            ),
            ModifierRule::toggle("add", "加料", opts(&[("加蛋", 15), ("加起司", 10)])),
            ModifierRule::toggle("remove", "客製", opts(&[("不加菜", 0), ("不加醬", 0)])),
        ],
    );
    rules.insert(
        "hotpot".to_string(),
        vec![ModifierRule::toggle(
            "add",
            "加料",
            opts(&[("加起司", 10), ("加沙茶", 10), ("加麵", 15)]),
        )],
    );
    for key in ["setmeal", "drinks", "coffee", "snacks", "club", "special"] {
        rules.insert(key.to_string(), Vec::new());
    }
    rules
}

fn builtin_item_rules() -> BTreeMap<String, Vec<ModifierRule>> {
    let mut rules = BTreeMap::new();
    rules.insert(
        "蔥抓餅加蛋".to_string(),
        vec![
            ModifierRule::toggle("add", "加料", opts(&[("加起司", 10), ("加火腿", 15)])),
            ModifierRule::toggle("remove", "客製", opts(&[("不加蛋", -5), ("不加醬", 0)])),
        ],
    );
    rules.insert(
        "荷包蛋".to_string(),
        vec![ModifierRule::choice(
            "doneness",
            "熟度",
            opts(&[("全熟", 0), ("半熟", 0)]),
        )],
    );
    rules
}

struct DrinkRow {
    name: &'static str,
    prices: &'static [(DrinkSize, i64)],
    temps: &'static [DrinkTemp],
    sugar: bool,
    soup: bool,
}

const COMMON_TEMPS: &[DrinkTemp] = &[DrinkTemp::Ice, DrinkTemp::NoIce, DrinkTemp::Hot];
const COLD_ONLY: &[DrinkTemp] = &[DrinkTemp::Ice, DrinkTemp::NoIce];
const HOT_ONLY: &[DrinkTemp] = &[DrinkTemp::Hot];

use DrinkSize::{Large as L, Medium as M, Small as S};

const fn drink(
    name: &'static str,
    prices: &'static [(DrinkSize, i64)],
    temps: &'static [DrinkTemp],
    sugar: bool,
) -> DrinkRow {
    DrinkRow {
        name,
        prices,
        temps,
        sugar,
        soup: false,
    }
}

const DRINK_TABLE: &[DrinkRow] = &[
    // Tea
    drink("紅茶", &[(S, 15), (M, 20), (L, 25)], COMMON_TEMPS, false),
    drink("無糖紅茶", &[(S, 15), (M, 20), (L, 25)], COMMON_TEMPS, false),
    // Milk tea / soy
    drink("奶茶", &[(S, 20), (M, 25), (L, 35)], COMMON_TEMPS, true),
    drink("豆漿", &[(S, 20), (M, 25), (L, 35)], COMMON_TEMPS, false),
    drink("無糖豆漿", &[(S, 20), (M, 25), (L, 35)], COMMON_TEMPS, false),
    drink("薏仁漿", &[(S, 20), (M, 25), (L, 35)], COMMON_TEMPS, false),
    drink("米漿", &[(S, 20), (M, 25), (L, 35)], COMMON_TEMPS, false),
    drink("冬瓜茶", &[(M, 25), (L, 30)], COMMON_TEMPS, false),
    // Juice / cold brew
    drink("柳橙汁", &[(S, 30), (M, 35), (L, 40)], COLD_ONLY, false),
    drink("蔓越莓汁", &[(S, 30), (M, 35), (L, 40)], COLD_ONLY, false),
    drink("冷泡茶", &[(M, 25), (L, 35)], COLD_ONLY, false),
    // Fresh milk
    drink("鮮奶茶", &[(M, 35), (L, 45)], COMMON_TEMPS, true),
    drink("薏仁牛奶", &[(M, 35), (L, 45)], COMMON_TEMPS, false),
    drink("可可亞牛奶", &[(M, 35), (L, 45)], COMMON_TEMPS, false),
    drink("豆奶茶", &[(M, 30), (L, 40)], COMMON_TEMPS, true),
    drink("泰式奶茶", &[(M, 35), (L, 45)], COMMON_TEMPS, false),
    // Coffee
    drink("美式咖啡", &[(M, 35), (L, 55)], COMMON_TEMPS, true),
    drink("拿鐵咖啡", &[(M, 50), (L, 75)], COMMON_TEMPS, true),
    drink("特調咖啡", &[(M, 40), (L, 60)], COMMON_TEMPS, true),
    drink("鴛鴦奶茶", &[(M, 40), (L, 60)], COMMON_TEMPS, true),
    // Soup
    DrinkRow {
        name: "玉米濃湯",
        prices: &[(M, 40)],
        temps: HOT_ONLY,
        sugar: false,
        soup: true,
    },
];

const SET_MEAL_DRINKS: &[(&str, &str, i64)] = &[
    ("tea", "紅茶", 0),
    ("green", "無糖紅茶", 0),
    ("milk", "奶茶", 5),
    ("winter", "冬瓜茶", 10),
    ("soy", "豆漿", 5),
    ("soy_ns", "無糖豆漿", 5),
    ("barley", "薏仁漿", 5),
    ("rice", "米漿", 5),
    ("orange", "柳橙汁", 15),
    ("cranberry", "蔓越莓汁", 15),
    ("fresh", "鮮奶茶", 20),
    ("barley_milk", "薏仁牛奶", 20),
    ("soy_milk", "豆奶茶", 15),
    ("cocoa", "可可亞牛奶", 20),
    ("thai", "泰式奶茶", 20),
    ("cold_brew", "冷泡茶", 10),
    ("americano", "美式咖啡", 20),
    ("latte", "拿鐵咖啡", 35),
    ("special_cof", "特調咖啡", 25),
    ("yuanyang", "鴛鴦奶茶", 25),
    ("soup", "玉米濃湯", 25),
];

/// (id, price, label, credit, default drink); every default size is M.
const UPGRADE_PLANS: &[(&str, i64, &str, i64, &str)] = &[
    ("39_hotdog", 39, "熱狗＋中紅", 15, "紅茶"),
    ("49_garlic", 49, "香蒜麵包＋中紅", 15, "紅茶"),
    ("59_tempura", 59, "甜不辣＋中奶", 20, "奶茶"),
    ("69_fish", 69, "魚條＋中冬", 20, "冬瓜茶"),
];

// =============================================================================
// Unit Tests
// =============================================================================
