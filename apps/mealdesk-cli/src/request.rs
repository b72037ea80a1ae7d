//! # Order Requests
//!
//! An order request is a recorded series of taps on the ordering screen,
//! stored as JSON and replayed through an [`OrderSession`].
//!
//! ## Request Format
//! ```json
//! {
//!   "item": { "id": "p-12", "name": "豬肉漢堡", "category": "漢堡", "base_price": 50 },
//!   "options": [ { "key": "egg", "label": "加蛋" } ],
//!   "upgrade": "39_hotdog",
//!   "upgrade_drink": "奶茶",
//!   "size": "L",
//!   "temperature": "no_ice",
//!   "quantity": 2,
//!   "note": "醬少"
//! }
//! ```
//!
//! Replay order matches the screen: options, set drink, upgrade, upgrade
//! drink, size, temperature, sugar, quantity, note. Taps the item doesn't
//! accept are collected in [`Replay::ignored`]. Notes are trimmed before
//! they reach the session.

use serde::{Deserialize, Serialize};
use tracing::debug;

use mealdesk_core::{Catalog, DrinkSize, DrinkTemp, MenuItem, OrderSession, SugarTier};

/// One option tap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTap {
    pub key: String,
    pub label: String,
}

/// A recorded item configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub item: MenuItem,

    #[serde(default)]
    pub options: Vec<OptionTap>,

    /// Set-meal drink choice id.
    #[serde(default)]
    pub set_drink: Option<String>,

    /// Upgrade plan id.
    #[serde(default)]
    pub upgrade: Option<String>,

    /// Replacement drink for the upgrade.
    #[serde(default)]
    pub upgrade_drink: Option<String>,

    #[serde(default)]
    pub size: Option<DrinkSize>,

    #[serde(default)]
    pub temperature: Option<DrinkTemp>,

    #[serde(default)]
    pub sugar: Option<SugarTier>,

    #[serde(default)]
    pub quantity: Option<u32>,

    #[serde(default)]
    pub note: Option<String>,
}

/// A replayed request.
#[derive(Debug)]
pub struct Replay<'c> {
    pub session: OrderSession<'c>,
    /// Human-readable descriptions of taps the item did not accept.
    pub ignored: Vec<String>,
}

impl OrderRequest {
    /// Parses a JSON request.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Replays the request on a fresh session.
    pub fn replay<'c>(&self, catalog: &'c Catalog) -> Replay<'c> {
        let mut session = OrderSession::start(catalog, self.item.clone());
        let mut ignored = Vec::new();

        for tap in &self.options {
            if !session.toggle_option(&tap.key, &tap.label) {
                ignored.push(format!("option {}/{}", tap.key, tap.label));
            }
        }

        if let Some(id) = &self.set_drink {
            if !session.choose_set_drink(id) {
                ignored.push(format!("set drink {}", id));
            }
        }

        if let Some(id) = &self.upgrade {
            if !session.choose_upgrade(id) {
                ignored.push(format!("upgrade {}", id));
            }
        }

        if let Some(drink) = &self.upgrade_drink {
            if !session.change_upgrade_drink(drink) {
                ignored.push(format!("upgrade drink {}", drink));
            }
        }

        if let Some(size) = self.size {
            if !session.set_size(size) {
                ignored.push(format!("size {}", size));
            }
        }

        if let Some(temperature) = self.temperature {
            if !session.set_temperature(temperature) {
                ignored.push(format!("temperature {}", temperature.display_text()));
            }
        }

        if let Some(sugar) = self.sugar {
            session.set_sugar(sugar);
        }

        if let Some(quantity) = self.quantity {
            session.set_quantity(quantity);
        }

        if let Some(note) = &self.note {
            session.set_note(note.trim());
        }

        debug!(
            item = %self.item.name,
            ignored = ignored.len(),
            total = %session.total(),
            "Order request replayed"
        );
        Replay { session, ignored }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_burger_with_upgrade() {
        let catalog = Catalog::builtin();
        let request = OrderRequest::from_json(
            r#"{
                "item": { "id": "p-12", "name": "豬肉漢堡", "category": "漢堡", "base_price": 50 },
                "options": [ { "key": "egg", "label": "加蛋" }, { "key": "meat", "label": "加培根" } ],
                "upgrade": "39_hotdog",
                "upgrade_drink": "奶茶",
                "size": "L",
                "temperature": "no_ice",
                "quantity": 2,
                "note": "  醬少 "
            }"#,
        )
        .unwrap();

        let replay = request.replay(&catalog);
        assert!(replay.ignored.is_empty());
        // (50 + 15 + 25 + 39 + (35 - 15)) × 2
        assert_eq!(replay.session.total().units(), 298);

        let line = replay.session.submit().unwrap();
        assert_eq!(line.options[2].label, "升級：熱狗＋奶茶(大/去冰/正常糖)");
        assert_eq!(line.options[3].label, "備: 醬少");
    }

    #[test]
    fn test_replay_collects_ignored_taps() {
        let catalog = Catalog::builtin();
        let request = OrderRequest::from_json(
            r#"{
                "item": { "id": "p-1", "name": "A套餐", "categoryName": "套餐", "base_price": 80 },
                "options": [ { "key": "egg", "label": "加蛋" } ],
                "set_drink": "cocoa",
                "upgrade": "39_hotdog",
                "size": "S"
            }"#,
        )
        .unwrap();

        let replay = request.replay(&catalog);
        assert_eq!(replay.ignored, vec!["option egg/加蛋", "upgrade 39_hotdog"]);
        // S is corrected to M for 可可亞牛奶: 35 - 15.
        assert_eq!(replay.session.total().units(), 100);
    }

    #[test]
    fn test_request_rejects_invalid_item() {
        let result = OrderRequest::from_json(
            r#"{ "item": { "id": "p-1", "name": "", "category": "漢堡", "base_price": 50 } }"#,
        );
        assert!(result.is_err());
    }
}
