//! # Selection State
//!
//! The live record of which modifier options are active for one item.
//!
//! ## Toggle Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Choice rule "bread" (麵包體)                                           │
//! │    {}  ──toggle(漢堡)──►  {漢堡:0}  ──toggle(圓形帕瑪森)──► {圓形帕瑪森:10} │
//! │                                                                         │
//! │  Toggle rule "meat" (加肉)                                              │
//! │    {}  ──toggle(加培根)──► {加培根:25} ──toggle(加火腿)──►               │
//! │        {加培根:25, 加火腿:15} ──toggle(加培根)──► {加火腿:15}            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Copy-on-Write
//! [`SelectionState::toggle`] takes `&self` and returns a new state. Earlier
//! snapshots stay valid, so a screen can compare the state before and after
//! a tap.
//!
//! Presence, not price, decides whether an option is selected: `不加菜` costs
//! nothing but is still recorded.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{ModifierRule, RuleKind};

/// One active option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub label: String,
    pub price: Money,
}

/// Active options for one rule key, in the order they were selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionGroup {
    pub key: String,
    pub options: Vec<SelectedOption>,
}

impl SelectionGroup {
    fn position(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|o| o.label == label)
    }
}

/// Rule key → (option label → price delta), insertion-ordered.
///
/// ## Invariants
/// - a key toggled as [`RuleKind::Choice`] holds at most one option
/// - a key never holds the same label twice
/// - a key whose last option is removed disappears
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
    groups: Vec<SelectionGroup>,
}

impl SelectionState {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state after one tap on an option.
    ///
    /// - `Choice`: the key's options become exactly `{label: price}`
    /// - `Toggle`: `label` is removed if present, added if absent
    ///
    /// ## Example
    /// ```rust
    /// use mealdesk_core::{Money, RuleKind, SelectionState};
    ///
    /// let empty = SelectionState::new();
    /// let with_egg = empty.toggle("egg", "加蛋", Money::from_units(15), RuleKind::Toggle);
    ///
    /// assert!(with_egg.is_selected("egg", "加蛋"));
    /// assert!(!empty.is_selected("egg", "加蛋")); // old snapshot untouched
    /// ```
    pub fn toggle(&self, key: &str, label: &str, price: Money, kind: RuleKind) -> SelectionState {
        let mut next = self.clone();
        let option = SelectedOption {
            label: label.to_string(),
            price,
        };

        let group_idx = next.groups.iter().position(|g| g.key == key);
        match (kind, group_idx) {
            (RuleKind::Choice, Some(idx)) => {
                next.groups[idx].options = vec![option];
            }
            (RuleKind::Toggle, Some(idx)) => {
                let group = &mut next.groups[idx];
                match group.position(label) {
                    Some(pos) => {
                        group.options.remove(pos);
                    }
                    None => group.options.push(option),
                }
                if group.options.is_empty() {
                    next.groups.remove(idx);
                }
            }
            (_, None) => next.groups.push(SelectionGroup {
                key: key.to_string(),
                options: vec![option],
            }),
        }
        next
    }

    /// Whether an option is active.
    pub fn is_selected(&self, key: &str, label: &str) -> bool {
        self.group(key)
            .is_some_and(|g| g.position(label).is_some())
    }

    /// Active options for a key.
    pub fn group(&self, key: &str) -> Option<&SelectionGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Number of active options for a key.
    pub fn count(&self, key: &str) -> usize {
        self.group(key).map_or(0, |g| g.options.len())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All active options as `(key, option)`, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectedOption)> {
        self.groups
            .iter()
            .flat_map(|g| g.options.iter().map(move |o| (g.key.as_str(), o)))
    }

    /// Active options that the given rules actually offer.
    ///
    /// Keys come out in rule-declaration order (each key once), labels in
    /// selection order. Entries left over from another item are skipped.
    pub fn applicable_options<'a>(
        &'a self,
        rules: &[&ModifierRule],
    ) -> Vec<(&'a str, &'a SelectedOption)> {
        let mut seen: Vec<&str> = Vec::new();
        let mut out = Vec::new();

        for rule in rules {
            if seen.contains(&rule.key.as_str()) {
                continue;
            }
            seen.push(rule.key.as_str());

            let Some(group) = self.group(&rule.key) else {
                continue;
            };
            for option in &group.options {
                let offered = rules
                    .iter()
                    .any(|r| r.key == group.key && r.option(&option.label).is_some());
                if offered {
                    out.push((group.key.as_str(), option));
                }
            }
        }
        out
    }

    /// Sum of the applicable options' deltas.
    pub fn applicable_total(&self, rules: &[&ModifierRule]) -> Money {
        self.applicable_options(rules)
            .into_iter()
            .map(|(_, option)| option.price)
            .sum()
    }
}

/// Mapping equality: the same keys with the same label → price entries,
/// regardless of selection order.
impl PartialEq for SelectionState {
    fn eq(&self, other: &Self) -> bool {
        let covers = |a: &SelectionState, b: &SelectionState| {
            a.iter().all(|(key, option)| {
                b.group(key)
                    .and_then(|g| g.options.iter().find(|o| o.label == option.label))
                    .is_some_and(|o| o.price == option.price)
            })
        };
        covers(self, other) && covers(other, self)
    }
}

impl Eq for SelectionState {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn m(units: i64) -> Money {
        Money::from_units(units)
    }

    #[test]
    fn test_choice_replaces_previous_option() {
        let state = SelectionState::new()
            .toggle("bread", "漢堡", m(0), RuleKind::Choice)
            .toggle("bread", "圓形帕瑪森", m(10), RuleKind::Choice);

        assert_eq!(state.count("bread"), 1);
        assert!(state.is_selected("bread", "圓形帕瑪森"));
        assert!(!state.is_selected("bread", "漢堡"));
    }

    #[test]
    fn test_choice_same_option_stays_selected() {
        let once = SelectionState::new().toggle("doneness", "半熟", m(0), RuleKind::Choice);
        let twice = once.toggle("doneness", "半熟", m(0), RuleKind::Choice);
        assert_eq!(once, twice);
        assert!(twice.is_selected("doneness", "半熟"));
    }

    #[test]
    fn test_toggle_flips_membership() {
        let state = SelectionState::new()
            .toggle("meat", "加培根", m(25), RuleKind::Toggle)
            .toggle("meat", "加火腿", m(15), RuleKind::Toggle);
        assert_eq!(state.count("meat"), 2);

        let state = state.toggle("meat", "加培根", m(25), RuleKind::Toggle);
        assert_eq!(state.count("meat"), 1);
        assert!(state.is_selected("meat", "加火腿"));
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let before = SelectionState::new().toggle("egg", "加蛋", m(15), RuleKind::Toggle);
        let after = before
            .toggle("remove", "不加菜", m(0), RuleKind::Toggle)
            .toggle("remove", "不加菜", m(0), RuleKind::Toggle);
        assert_eq!(before, after);
        assert!(after.group("remove").is_none());
    }

    #[test]
    fn test_zero_priced_option_is_selected() {
        let state = SelectionState::new().toggle("remove", "不加菜", m(0), RuleKind::Toggle);
        assert!(state.is_selected("remove", "不加菜"));
        assert!(!state.is_empty());
    }

    #[test]
    fn test_toggle_does_not_mutate_snapshot() {
        let first = SelectionState::new().toggle("egg", "加蛋", m(15), RuleKind::Toggle);
        let snapshot = first.clone();
        let _second = first.toggle("egg", "加蛋", m(15), RuleKind::Toggle);
        assert_eq!(first, snapshot);
        assert!(first.is_selected("egg", "加蛋"));
    }

    #[test]
    fn test_equality_ignores_selection_order() {
        let a = SelectionState::new()
            .toggle("meat", "加火腿", m(15), RuleKind::Toggle)
            .toggle("meat", "加培根", m(25), RuleKind::Toggle);
        let b = SelectionState::new()
            .toggle("meat", "加培根", m(25), RuleKind::Toggle)
            .toggle("meat", "加火腿", m(15), RuleKind::Toggle);
        assert_eq!(a, b);

        let c = SelectionState::new().toggle("meat", "加火腿", m(15), RuleKind::Toggle);
        assert_ne!(a, c);
    }

    #[test]
    fn test_applicable_options_follow_rule_order() {
        let catalog = Catalog::builtin();
        let rules = catalog.rules_for("漢堡", "豬肉漢堡");

        let state = SelectionState::new()
            .toggle("remove", "不加醬", m(0), RuleKind::Toggle)
            .toggle("egg", "加蛋", m(15), RuleKind::Toggle)
            .toggle("meat", "加卡拉雞", m(45), RuleKind::Toggle)
            .toggle("meat", "加火腿", m(15), RuleKind::Toggle);

        let labels: Vec<&str> = state
            .applicable_options(&rules)
            .iter()
            .map(|(_, o)| o.label.as_str())
            .collect();
        assert_eq!(labels, vec!["加蛋", "加卡拉雞", "加火腿", "不加醬"]);
        assert_eq!(state.applicable_total(&rules), m(75));
    }

    #[test]
    fn test_stale_entries_are_ignored() {
        let catalog = Catalog::builtin();
        let omelet_rules = catalog.rules_for("蛋餅", "起司蛋餅");

        // Carried over from a burger: "egg" is not an omelet rule, and
        // "加培根" is not an omelet "add" option.
        let state = SelectionState::new()
            .toggle("egg", "加蛋", m(15), RuleKind::Toggle)
            .toggle("add", "加培根", m(25), RuleKind::Toggle)
            .toggle("add", "雙蛋", m(15), RuleKind::Toggle);

        assert_eq!(state.applicable_total(&omelet_rules), m(15));
        assert_eq!(state.applicable_options(&omelet_rules).len(), 1);
    }

    #[test]
    fn test_shared_keys_between_category_and_item_rules() {
        let catalog = Catalog::builtin();
        let rules = catalog.rules_for("帕瑪森/捲餅/香頌/燒餅", "蔥抓餅加蛋");

        // "加火腿" only exists in the item-specific "add" rule.
        let state = SelectionState::new()
            .toggle("add", "加蛋", m(15), RuleKind::Toggle)
            .toggle("add", "加火腿", m(15), RuleKind::Toggle)
            .toggle("remove", "不加蛋", m(-5), RuleKind::Toggle);

        let options = state.applicable_options(&rules);
        assert_eq!(options.len(), 3);
        assert_eq!(state.applicable_total(&rules), m(25));
    }

    #[test]
    fn test_serializes_as_group_list() {
        let state = SelectionState::new().toggle("egg", "加蛋", m(15), RuleKind::Toggle);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"[{"key":"egg","options":[{"label":"加蛋","price":15}]}]"#);
        let back: SelectionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
