//! # Drink Configuration Resolver
//!
//! Keeps a drink selection (name, size, temperature, sugar) consistent with
//! the drink's configuration.
//!
//! ## Auto-Correction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Selected: 紅茶 / S / hot                                                │
//! │       │                                                                 │
//! │       │  change_drink("冷泡茶")   sizes [M, L], temps [ice, no_ice]      │
//! │       ▼                                                                 │
//! │  S ∉ sizes  ──► first size  ──► M                                      │
//! │  hot ∉ temps ──► first temp ──► ice                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Selected: 冷泡茶 / M / ice   (priced only after this step)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mode Defaults
//! - set meal: smallest size (S if sold, else the first size)
//! - upgrade and standalone drinks: M if sold, else the first size

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, DrinkConfig};
use crate::money::Money;
use crate::pricing::{drink_surcharge, DrinkContext};
use crate::types::{DrinkSize, DrinkTemp, SugarTier};

/// Returns a `(size, temperature)` pair that is valid for the drink.
///
/// Values already valid are kept; others reset to the first valid value.
pub fn correct_drink_selection(
    config: &DrinkConfig,
    size: DrinkSize,
    temperature: DrinkTemp,
) -> (DrinkSize, DrinkTemp) {
    let size = if config.has_size(size) {
        size
    } else {
        config.first_size().unwrap_or(size)
    };
    let temperature = if config.has_temperature(temperature) {
        temperature
    } else {
        config.first_temperature().unwrap_or(temperature)
    };
    (size, temperature)
}

impl Catalog {
    /// Corrects a size/temperature pair for a drink name. Unknown drinks
    /// return the input unchanged.
    pub fn correct_drink_selection(
        &self,
        drink: &str,
        size: DrinkSize,
        temperature: DrinkTemp,
    ) -> (DrinkSize, DrinkTemp) {
        match self.drink_config(drink) {
            Some(config) => correct_drink_selection(config, size, temperature),
            None => (size, temperature),
        }
    }
}

// =============================================================================
// Drink Selection
// =============================================================================

/// The drink part of a line: the drink itself for standalone drinks, the
/// included drink of a set meal, or the replacement drink of an upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkSelection {
    /// Drink name; empty when the line has no drink.
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_size")]
    pub size: DrinkSize,
    #[serde(default = "default_temperature")]
    pub temperature: DrinkTemp,
    #[serde(default)]
    pub sugar: SugarTier,
}

fn default_size() -> DrinkSize {
    DrinkSize::Medium
}

fn default_temperature() -> DrinkTemp {
    DrinkTemp::Ice
}

impl Default for DrinkSelection {
    fn default() -> Self {
        DrinkSelection {
            name: String::new(),
            size: default_size(),
            temperature: default_temperature(),
            sugar: SugarTier::default(),
        }
    }
}

/// A size entry for a size picker, with its surcharge in the current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeOption {
    pub size: DrinkSize,
    pub surcharge: Money,
}

impl SizeOption {
    /// `中` or `大 +10`.
    pub fn label(&self) -> String {
        if self.surcharge.is_positive() {
            format!("{} +{}", self.size.display_text(), self.surcharge.units())
        } else {
            self.size.display_text().to_string()
        }
    }
}

impl DrinkSelection {
    /// Whether a drink is chosen at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Configuration of the chosen drink.
    pub fn config<'c>(&self, catalog: &'c Catalog) -> Option<&'c DrinkConfig> {
        catalog.drink_config(&self.name)
    }

    /// Re-applies auto-correction against the current drink.
    pub fn correct(&mut self, catalog: &Catalog) {
        let (size, temperature) =
            catalog.correct_drink_selection(&self.name, self.size, self.temperature);
        self.size = size;
        self.temperature = temperature;
    }

    /// Switches to another drink, keeping size and temperature when valid.
    pub fn change_drink(&mut self, catalog: &Catalog, name: &str) {
        self.name = name.to_string();
        self.correct(catalog);
    }

    /// Switches to a set meal's drink at its smallest size.
    pub fn enter_set_meal(&mut self, catalog: &Catalog, name: &str) {
        self.enter_with_size(catalog, name, DrinkSize::Small);
    }

    /// Switches to an upgrade drink at medium size.
    pub fn enter_upgrade(&mut self, catalog: &Catalog, name: &str) {
        self.enter_with_size(catalog, name, DrinkSize::Medium);
    }

    /// Starts a standalone drink at medium size.
    pub fn enter_single(&mut self, catalog: &Catalog, name: &str) {
        self.enter_with_size(catalog, name, DrinkSize::Medium);
    }

    fn enter_with_size(&mut self, catalog: &Catalog, name: &str, preferred: DrinkSize) {
        self.name = name.to_string();
        self.size = preferred;
        self.correct(catalog);
    }

    /// Picks a size; an invalid size is corrected right away.
    pub fn set_size(&mut self, catalog: &Catalog, size: DrinkSize) {
        self.size = size;
        self.correct(catalog);
    }

    /// Picks a temperature; an invalid one is corrected right away.
    pub fn set_temperature(&mut self, catalog: &Catalog, temperature: DrinkTemp) {
        self.temperature = temperature;
        self.correct(catalog);
    }

    /// Whether the sugar tier is offered and printed for this drink.
    pub fn sugar_applies(&self, catalog: &Catalog) -> bool {
        self.config(catalog).is_some_and(|c| c.has_sugar)
    }

    /// Size picker entries for the current drink. Soups and unknown drinks
    /// have no size picker.
    pub fn size_options(&self, catalog: &Catalog, context: DrinkContext<'_>) -> Vec<SizeOption> {
        match self.config(catalog) {
            Some(config) if !config.is_soup => config
                .sizes
                .iter()
                .map(|&size| SizeOption {
                    size,
                    surcharge: drink_surcharge(catalog, &self.name, size, context),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Temperature picker entries for the current drink.
    pub fn temperature_options(&self, catalog: &Catalog) -> Vec<DrinkTemp> {
        match self.config(catalog) {
            Some(config) if !config.is_soup => config.temperatures.clone(),
            _ => Vec::new(),
        }
    }

    /// `<name>(<size>/<temp>[/<sugar>])` for the chosen drink.
    pub fn label(&self, catalog: &Catalog) -> String {
        self.label_as(catalog, &self.name)
    }

    /// Formats another drink name with this selection's size, temperature
    /// and sugar. Soups print as the bare name.
    pub fn label_as(&self, catalog: &Catalog, name: &str) -> String {
        let config = catalog.drink_config(name);
        if config.is_some_and(|c| c.is_soup) {
            return name.to_string();
        }
        format!("{}({})", name, self.spec_label(config))
    }

    /// `<size>/<temp>[/<sugar>]`, sugar only when the drink has it.
    pub fn spec_label(&self, config: Option<&DrinkConfig>) -> String {
        let mut label = format!(
            "{}/{}",
            self.size.display_text(),
            self.temperature.display_text()
        );
        if config.is_some_and(|c| c.has_sugar) {
            label.push('/');
            label.push_str(self.sugar.display_text());
        }
        label
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
