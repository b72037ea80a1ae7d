//! # Order Session
//!
//! One item being configured on the ordering screen, from the tap on the
//! menu tile to 加入購物車.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Session Operations                             │
//! │                                                                         │
//! │  Screen Action            Session Call              State Change        │
//! │  ─────────────            ────────────              ────────────        │
//! │                                                                         │
//! │  Tap menu tile ─────────► start() ────────────────► mode defaults       │
//! │                                                                         │
//! │  Tap option chip ───────► toggle_option() ────────► selection           │
//! │                                                                         │
//! │  Pick set drink ────────► choose_set_drink() ─────► drink + correction  │
//! │                                                                         │
//! │  Pick upgrade ──────────► choose_upgrade() ───────► plan default, M     │
//! │                                                                         │
//! │  Size / temp / sugar ───► set_size() etc. ────────► corrected drink     │
//! │                                                                         │
//! │  Every change ──────────► total() ────────────────► (read only)         │
//! │                                                                         │
//! │  加入購物車 ─────────────► submit() ────────────────► OrderLine           │
//! │                                                                         │
//! │  Close modal ───────────► drop the session (nothing is emitted)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inputs that don't apply to the current item (an unknown option, an
//! upgrade on a set meal) are ignored with a warning and leave the session
//! unchanged.

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, SetMealDrinkChoice, UpgradePlan};
use crate::drink::SizeOption;
use crate::error::CoreResult;
use crate::money::Money;
use crate::pricing::{price_breakdown, upgrade_drink_hint, DrinkContext, LineConfig, PriceBreakdown};
use crate::selection::SelectionState;
use crate::submission::{build_order_line, build_priced_options, OrderLine};
use crate::types::{DrinkSize, DrinkTemp, ItemKind, MenuItem, ModifierRule, PricedOption, SugarTier};
use crate::MAX_ITEM_QUANTITY;

/// Configuration session for one menu item.
#[derive(Debug, Clone)]
pub struct OrderSession<'c> {
    catalog: &'c Catalog,
    line: LineConfig,
}

impl<'c> OrderSession<'c> {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Opens a session with the item's mode defaults.
    ///
    /// - set meal: first set-meal drink at its smallest size
    /// - drink, coffee or soup: the item itself at medium size
    pub fn start(catalog: &'c Catalog, item: MenuItem) -> Self {
        debug!(item = %item.name, kind = ?item.kind, "Starting order session");
        let mut session = OrderSession {
            catalog,
            line: LineConfig::new(item),
        };
        session.apply_mode_defaults();
        session
    }

    /// Resumes a session from a saved line configuration.
    ///
    /// The drink selection is re-corrected against the catalog; nothing else
    /// is changed.
    pub fn resume(catalog: &'c Catalog, mut line: LineConfig) -> Self {
        line.drink.correct(catalog);
        OrderSession { catalog, line }
    }

    /// Clears every choice and re-applies the mode defaults.
    pub fn reset(&mut self) {
        debug!(item = %self.line.item.name, "Resetting order session");
        self.line = LineConfig::new(self.line.item.clone());
        self.apply_mode_defaults();
    }

    fn apply_mode_defaults(&mut self) {
        let catalog = self.catalog;
        match self.line.item.kind {
            ItemKind::SetMeal => {
                if let Some(choice) = catalog.set_meal_drinks().first() {
                    self.line.set_drink_id = Some(choice.id.clone());
                    self.line.drink.enter_set_meal(catalog, &choice.drink);
                }
            }
            ItemKind::Drink | ItemKind::Coffee | ItemKind::Soup => {
                let name = self.line.item.name.clone();
                self.line.drink.enter_single(catalog, &name);
            }
            ItemKind::Standard => {}
        }
    }

    /// Validates the line and hands it over as an [`OrderLine`].
    pub fn submit(self) -> CoreResult<OrderLine> {
        let order_line = build_order_line(self.catalog, &self.line)?;
        info!(
            item = %order_line.item_name,
            quantity = order_line.quantity,
            subtotal = %order_line.subtotal,
            options = order_line.options.len(),
            "Order line submitted"
        );
        Ok(order_line)
    }

    // =========================================================================
    // Generic modifiers
    // =========================================================================

    /// Taps an option of one of the item's rules.
    ///
    /// The rule's kind and the option's price come from the catalog. Returns
    /// `false` when the item offers no such option.
    pub fn toggle_option(&mut self, key: &str, label: &str) -> bool {
        let found = self
            .rules()
            .into_iter()
            .filter(|rule| rule.key == key)
            .find_map(|rule| rule.option(label).map(|option| (rule.kind, option.price)));

        let Some((kind, price)) = found else {
            warn!(item = %self.line.item.name, key, label, "Ignoring unknown option");
            return false;
        };

        self.line.selection = self.line.selection.toggle(key, label, price, kind);
        debug!(
            key,
            label,
            selected = self.line.selection.is_selected(key, label),
            "Option toggled"
        );
        true
    }

    // =========================================================================
    // Quantity & note
    // =========================================================================

    /// Sets the quantity, clamped to `1..=999`.
    pub fn set_quantity(&mut self, quantity: u32) {
        let clamped = quantity.clamp(1, MAX_ITEM_QUANTITY);
        if clamped != quantity {
            warn!(quantity, clamped, "Quantity out of range, clamped");
        }
        self.line.quantity = clamped;
    }

    pub fn increment(&mut self) {
        self.set_quantity(self.line.quantity.saturating_add(1));
    }

    /// Decrements the quantity; it never drops below 1.
    pub fn decrement(&mut self) {
        self.set_quantity(self.line.quantity.saturating_sub(1).max(1));
    }

    /// Sets the kitchen note. Length is checked on submit.
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.line.note = note.into();
    }

    // =========================================================================
    // Set meal drink
    // =========================================================================

    /// Picks the set meal's drink. Size and temperature are kept when the
    /// new drink sells them.
    pub fn choose_set_drink(&mut self, id: &str) -> bool {
        if self.line.item.kind != ItemKind::SetMeal {
            warn!(item = %self.line.item.name, id, "Ignoring set drink for a non set meal");
            return false;
        }
        let Some(choice) = self.catalog.set_meal_drink(id) else {
            warn!(id, "Ignoring unknown set meal drink");
            return false;
        };

        self.line.set_drink_id = Some(choice.id.clone());
        self.line.drink.change_drink(self.catalog, &choice.drink);
        debug!(drink = %choice.drink, size = %self.line.drink.size, "Set meal drink chosen");
        true
    }

    // =========================================================================
    // Combo upgrade
    // =========================================================================

    /// Attaches a combo upgrade with its default drink at medium size.
    pub fn choose_upgrade(&mut self, plan_id: &str) -> bool {
        if !self.line.item.kind.allows_upgrade() {
            warn!(item = %self.line.item.name, plan_id, "Item does not take upgrades");
            return false;
        }
        let Some(plan) = self.catalog.upgrade_plan(plan_id) else {
            warn!(plan_id, "Ignoring unknown upgrade plan");
            return false;
        };

        self.line.upgrade_id = Some(plan.id.clone());
        self.line.drink.enter_upgrade(self.catalog, &plan.default_drink);
        debug!(plan = %plan.id, drink = %plan.default_drink, "Upgrade chosen");
        true
    }

    /// Removes the upgrade and its drink.
    pub fn clear_upgrade(&mut self) {
        if self.line.upgrade_id.take().is_some() {
            self.line.drink.name.clear();
            debug!("Upgrade cleared");
        }
    }

    /// Swaps the upgrade's drink; the size goes back to medium.
    pub fn change_upgrade_drink(&mut self, drink: &str) -> bool {
        if self.line.upgrade_id.is_none() {
            warn!(drink, "No upgrade to change the drink of");
            return false;
        }
        if self.catalog.drink_config(drink).is_none() {
            warn!(drink, "Ignoring unknown upgrade drink");
            return false;
        }

        self.line.drink.enter_upgrade(self.catalog, drink);
        debug!(drink, size = %self.line.drink.size, "Upgrade drink changed");
        true
    }

    // =========================================================================
    // Drink size / temperature / sugar
    // =========================================================================

    /// Picks a cup size; sizes the drink doesn't sell are corrected.
    pub fn set_size(&mut self, size: DrinkSize) -> bool {
        if !self.has_drink() {
            warn!(size = %size, "No drink to size");
            return false;
        }
        self.line.drink.set_size(self.catalog, size);
        debug!(requested = %size, size = %self.line.drink.size, "Drink size set");
        true
    }

    pub fn set_temperature(&mut self, temperature: DrinkTemp) -> bool {
        if !self.has_drink() {
            warn!(temperature = ?temperature, "No drink to set the temperature of");
            return false;
        }
        self.line.drink.set_temperature(self.catalog, temperature);
        true
    }

    /// Sets the sugar tier. Only printed when the drink has one.
    pub fn set_sugar(&mut self, sugar: SugarTier) {
        self.line.drink.sugar = sugar;
    }

    fn has_drink(&self) -> bool {
        self.drink_context().is_some() && !self.line.drink.is_empty()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn item(&self) -> &MenuItem {
        &self.line.item
    }

    /// The full line configuration.
    pub fn line(&self) -> &LineConfig {
        &self.line
    }

    pub fn selection(&self) -> &SelectionState {
        &self.line.selection
    }

    pub fn quantity(&self) -> u32 {
        self.line.quantity
    }

    /// Generic rules shown for the item. Standalone drinks show none.
    pub fn rules(&self) -> Vec<&'c ModifierRule> {
        if !self.line.item.kind.shows_generic_rules() {
            return Vec::new();
        }
        self.catalog
            .rules_for(&self.line.item.category, &self.line.item.name)
    }

    /// Which drink pricing applies right now, if any.
    pub fn drink_context(&self) -> Option<DrinkContext<'_>> {
        let kind = self.line.item.kind;
        if kind == ItemKind::SetMeal {
            return self.line.set_drink_id.as_ref().map(|_| DrinkContext::SetMeal);
        }
        if let Some(plan_id) = self.line.upgrade_id.as_deref() {
            return Some(DrinkContext::Upgrade { plan_id });
        }
        kind.is_standalone_drink().then_some(DrinkContext::Single)
    }

    /// Size picker entries with their surcharge in the current context.
    pub fn size_options(&self) -> Vec<SizeOption> {
        match self.drink_context() {
            Some(context) => self.line.drink.size_options(self.catalog, context),
            None => Vec::new(),
        }
    }

    pub fn temperature_options(&self) -> Vec<DrinkTemp> {
        if self.drink_context().is_none() {
            return Vec::new();
        }
        self.line.drink.temperature_options(self.catalog)
    }

    /// Whether the sugar picker is shown.
    pub fn sugar_applies(&self) -> bool {
        self.drink_context().is_some() && self.line.drink.sugar_applies(self.catalog)
    }

    /// Set meal drink dropdown.
    pub fn set_meal_drink_options(&self) -> &'c [SetMealDrinkChoice] {
        if self.line.item.kind == ItemKind::SetMeal {
            self.catalog.set_meal_drinks()
        } else {
            &[]
        }
    }

    /// Upgrade radio list.
    pub fn upgrade_options(&self) -> &'c [UpgradePlan] {
        if self.line.item.kind.allows_upgrade() {
            self.catalog.upgrade_plans()
        } else {
            &[]
        }
    }

    /// Replacement drinks for the active upgrade with their "from" hints.
    pub fn upgrade_drink_options(&self) -> Vec<(&'c str, Money)> {
        let Some(plan) = self.line.upgrade_plan(self.catalog) else {
            return Vec::new();
        };
        self.catalog
            .drinks()
            .iter()
            .map(|drink| {
                let hint = upgrade_drink_hint(self.catalog, plan, &drink.name);
                (drink.name.as_str(), hint)
            })
            .collect()
    }

    /// Live price split by source.
    pub fn breakdown(&self) -> PriceBreakdown {
        price_breakdown(self.catalog, &self.line)
    }

    /// Live line total.
    pub fn total(&self) -> Money {
        self.breakdown().total()
    }

    /// Options as they would be submitted right now.
    pub fn preview_options(&self) -> Vec<PricedOption> {
        build_priced_options(self.catalog, &self.line)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str, base: i64) -> MenuItem {
        MenuItem::new("p-1", name, category, Money::from_units(base)).unwrap()
    }

    #[test]
    fn test_start_set_meal_defaults() {
        let catalog = Catalog::builtin();
        let session = OrderSession::start(&catalog, item("A套餐", "套餐", 80));

        assert_eq!(session.line().set_drink_id.as_deref(), Some("tea"));
        assert_eq!(session.line().drink.name, "紅茶");
        assert_eq!(session.line().drink.size, DrinkSize::Small);
        assert_eq!(session.drink_context(), Some(DrinkContext::SetMeal));
        assert_eq!(session.total().units(), 80);
    }

    #[test]
    fn test_start_drink_defaults() {
        let catalog = Catalog::builtin();
        let session = OrderSession::start(&catalog, item("紅茶", "飲料", 15));
        assert_eq!(session.line().drink.size, DrinkSize::Medium);
        assert_eq!(session.total().units(), 20);
        assert!(session.rules().is_empty());
        assert_eq!(session.drink_context(), Some(DrinkContext::Single));
    }

    #[test]
    fn test_start_soup_has_no_drink_pickers() {
        let catalog = Catalog::builtin();
        let session = OrderSession::start(&catalog, item("玉米濃湯", "美味小點", 40));
        assert_eq!(session.line().drink.name, "玉米濃湯");
        assert_eq!(session.drink_context(), None);
        assert!(session.size_options().is_empty());
        assert_eq!(session.total().units(), 40);
    }

    #[test]
    fn test_toggle_option_uses_catalog_price() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("豬肉漢堡", "漢堡", 50));

        assert!(session.toggle_option("meat", "加卡拉雞"));
        assert_eq!(session.total().units(), 95);
        assert!(session.toggle_option("meat", "加卡拉雞"));
        assert_eq!(session.total().units(), 50);

        assert!(!session.toggle_option("meat", "加龍蝦"));
        assert!(!session.toggle_option("doneness", "半熟"));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_toggle_option_finds_item_specific_rule() {
        let catalog = Catalog::builtin();
        let mut session =
            OrderSession::start(&catalog, item("蔥抓餅加蛋", "帕瑪森/捲餅/香頌/燒餅", 45));
        assert!(session.toggle_option("add", "加火腿"));
        assert!(session.toggle_option("remove", "不加蛋"));
        assert_eq!(session.total().units(), 55);
    }

    #[test]
    fn test_quantity_is_clamped() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("薯餅", "美味小點", 25));
        session.decrement();
        assert_eq!(session.quantity(), 1);
        session.increment();
        session.increment();
        assert_eq!(session.total().units(), 75);
        session.set_quantity(5000);
        assert_eq!(session.quantity(), MAX_ITEM_QUANTITY);
        session.set_quantity(0);
        assert_eq!(session.quantity(), 1);
    }

    #[test]
    fn test_choose_set_drink_keeps_valid_size() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("A套餐", "套餐", 80));
        session.set_size(DrinkSize::Large);

        assert!(session.choose_set_drink("cocoa"));
        assert_eq!(session.line().drink.size, DrinkSize::Large);
        assert_eq!(session.total().units(), 110);

        // 可可亞牛奶 has no small cup.
        session.set_size(DrinkSize::Small);
        assert_eq!(session.line().drink.size, DrinkSize::Medium);

        assert!(!session.choose_set_drink("unknown"));
        assert_eq!(session.line().set_drink_id.as_deref(), Some("cocoa"));
    }

    #[test]
    fn test_upgrade_flow() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("豬肉漢堡", "漢堡", 50));
        assert!(session.drink_context().is_none());

        assert!(session.choose_upgrade("59_tempura"));
        assert_eq!(session.line().drink.name, "奶茶");
        assert_eq!(session.total().units(), 109);

        session.set_size(DrinkSize::Large);
        assert_eq!(session.total().units(), 124);

        assert!(session.change_upgrade_drink("鮮奶茶"));
        assert_eq!(session.line().drink.size, DrinkSize::Medium);
        assert_eq!(session.total().units(), 124);

        session.clear_upgrade();
        assert!(session.line().drink.is_empty());
        assert_eq!(session.total().units(), 50);
    }

    #[test]
    fn test_upgrade_rejected_for_non_standard_items() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("A套餐", "套餐", 80));
        assert!(!session.choose_upgrade("39_hotdog"));
        assert!(session.upgrade_options().is_empty());
        assert!(!session.change_upgrade_drink("紅茶"));
    }

    #[test]
    fn test_upgrade_drink_options() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("豬肉漢堡", "漢堡", 50));
        assert!(session.upgrade_drink_options().is_empty());

        session.choose_upgrade("39_hotdog");
        let options = session.upgrade_drink_options();
        assert_eq!(options.len(), catalog.drinks().len());
        assert_eq!(options[0], ("紅茶", Money::zero()));
    }

    #[test]
    fn test_drink_setters_without_drink_are_ignored() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("豬肉漢堡", "漢堡", 50));
        assert!(!session.set_size(DrinkSize::Large));
        assert!(!session.set_temperature(DrinkTemp::Hot));
        assert!(session.size_options().is_empty());
        assert!(!session.sugar_applies());
    }

    #[test]
    fn test_sugar_applies_follows_drink() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("A套餐", "套餐", 80));
        assert!(!session.sugar_applies());
        session.choose_set_drink("fresh");
        assert!(session.sugar_applies());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("A套餐", "套餐", 80));
        session.choose_set_drink("latte");
        session.set_quantity(3);
        session.set_note("去冰");

        session.reset();
        assert_eq!(session.line().set_drink_id.as_deref(), Some("tea"));
        assert_eq!(session.quantity(), 1);
        assert!(session.line().note.is_empty());
    }

    #[test]
    fn test_submit_builds_order_line() {
        let catalog = Catalog::builtin();
        let mut session = OrderSession::start(&catalog, item("豬肉漢堡", "漢堡", 50));
        session.toggle_option("egg", "加蛋");
        session.set_note("切半");
        session.set_quantity(2);
        let total = session.total();

        let line = session.submit().unwrap();
        assert_eq!(line.subtotal, total);
        assert_eq!(line.options.len(), 2);
        assert_eq!(line.options[1].label, "備: 切半");
    }

    #[test]
    fn test_resume_corrects_drink() {
        let catalog = Catalog::builtin();
        let mut line = LineConfig::new(item("冷泡茶", "飲料", 25));
        line.drink.name = "冷泡茶".to_string();
        line.drink.size = DrinkSize::Small;
        line.drink.temperature = DrinkTemp::Hot;

        let session = OrderSession::resume(&catalog, line);
        assert_eq!(session.line().drink.size, DrinkSize::Medium);
        assert_eq!(session.line().drink.temperature, DrinkTemp::Ice);
    }
}
