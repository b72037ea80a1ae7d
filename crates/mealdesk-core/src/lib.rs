//! # mealdesk-core: Order Pricing and Modifier Resolution
//!
//! This crate prices one order line on the ordering screen: which modifier
//! options an item offers, which are selected, which drink sizes are valid,
//! and what the line costs. Pure logic, no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        mealdesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Menu catalog (external)                         │   │
//! │  │          MenuItem { id, name, category, base_price }           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ mealdesk-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   catalog ──► selection ──► drink ──► pricing ──► submission   │   │
//! │  │   (rules)     (chips)       (S/M/L)   (total)    (options)     │   │
//! │  │                                                                 │   │
//! │  │                  session: one item being configured            │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderLine                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   Cart / order submission (external)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Menu items, modifier rules, drink enums, priced options
//! - [`money`] - Integer money in the smallest currency unit
//! - [`catalog`] - Rule, drink, set-meal and upgrade tables
//! - [`selection`] - Copy-on-write modifier selection state
//! - [`drink`] - Drink size/temperature correction and labels
//! - [`pricing`] - Drink surcharges and line totals
//! - [`submission`] - Priced option lists and order lines
//! - [`session`] - One item's configuration session
//! - [`validation`] - Input checks at the catalog and cart boundaries
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use mealdesk_core::{Catalog, MenuItem, Money, OrderSession};
//!
//! let catalog = Catalog::builtin();
//! let burger = MenuItem::new("p-1", "豬肉漢堡", "漢堡", Money::from_units(50)).unwrap();
//!
//! let mut session = OrderSession::start(&catalog, burger);
//! session.toggle_option("egg", "加蛋");
//! session.toggle_option("meat", "加培根");
//! session.set_quantity(3);
//!
//! assert_eq!(session.total().units(), 270); // (50 + 15 + 25) × 3
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod drink;
pub mod error;
pub mod money;
pub mod pricing;
pub mod selection;
pub mod session;
pub mod submission;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, DrinkConfig, SetMealDrinkChoice, SizePrices, UpgradePlan};
pub use drink::{correct_drink_selection, DrinkSelection, SizeOption};
pub use error::{CatalogError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{drink_surcharge, line_total, price_breakdown, DrinkContext, LineConfig, PriceBreakdown};
pub use selection::{SelectedOption, SelectionState};
pub use session::OrderSession;
pub use submission::{build_order_line, build_priced_options, OrderLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Maximum kitchen note length, in characters.
pub const MAX_NOTE_LENGTH: usize = 100;

/// Category key for categories missing from the category map.
pub const FALLBACK_CATEGORY_KEY: &str = "snacks";

/// Credit a set meal gives toward its included drink.
///
/// A small 紅茶 (15) is free; anything pricier pays the difference.
pub const SET_MEAL_DRINK_CREDIT: i64 = 15;
