//! # Error Types
//!
//! Domain-specific error types for mealdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mealdesk-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── CatalogError     - Catalog document problems                      │
//! │  └── ValidationError  - Order-line input validation failures           │
//! │                                                                         │
//! │  CLI errors (apps/mealdesk-cli)                                        │
//! │  └── CliError         - What the terminal sees                         │
//! │                                                                         │
//! │  Flow: ValidationError / CatalogError → CoreError → CliError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Pricing itself never fails. An unknown drink prices at zero, a stale
//! selection key is ignored, and an out-of-range size or temperature is
//! corrected. Errors only appear at the boundaries: loading a catalog and
//! handing a finished line to the cart.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The catalog document is malformed or inconsistent.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Catalog Error
// =============================================================================

/// Problems found while parsing or validating a catalog.
///
/// ## When This Occurs
/// - A catalog TOML file fails to parse
/// - A drink's price table and size list disagree
/// - An upgrade plan or set-meal choice names a drink that isn't configured
/// - A second catalog is installed after the global one was fixed
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document could not be parsed.
    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    /// Failed to render the catalog document.
    #[error("Failed to render catalog: {0}")]
    Render(String),

    /// Price table keys differ from the size list.
    #[error("Drink {drink}: price table does not match sizes")]
    PriceTableMismatch { drink: String },

    /// A drink without any size.
    #[error("Drink {drink} has no sizes")]
    EmptySizes { drink: String },

    /// A drink without any temperature.
    #[error("Drink {drink} has no temperatures")]
    EmptyTemperatures { drink: String },

    /// The same drink name appears twice.
    #[error("Drink {drink} is configured more than once")]
    DuplicateDrink { drink: String },

    /// An upgrade plan's default drink/size is not a configured combination.
    #[error("Upgrade plan {plan}: default {drink} is not a configured drink size")]
    UnknownDefaultDrink { plan: String, drink: String },

    /// A set-meal drink choice names an unknown drink.
    #[error("Set-meal choice {id}: unknown drink {drink}")]
    UnknownSetMealDrink { id: String, drink: String },

    /// The process-wide catalog was already fixed.
    #[error("Global catalog is already installed")]
    AlreadyInstalled,
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for CatalogError {
    fn from(err: toml::ser::Error) -> Self {
        CatalogError::Render(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a line is handed to the cart with values the
/// shop does not accept.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_messages() {
        let err = CatalogError::PriceTableMismatch {
            drink: "紅茶".to_string(),
        };
        assert_eq!(err.to_string(), "Drink 紅茶: price table does not match sizes");

        let err = CatalogError::UnknownSetMealDrink {
            id: "tea".to_string(),
            drink: "綠茶".to_string(),
        };
        assert_eq!(err.to_string(), "Set-meal choice tea: unknown drink 綠茶");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
    }

    #[test]
    fn test_conversions_into_core_error() {
        let core_err: CoreError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = CatalogError::AlreadyInstalled.into();
        assert!(matches!(core_err, CoreError::Catalog(_)));
    }

    #[test]
    fn test_toml_error_becomes_parse_error() {
        let err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let catalog_err: CatalogError = err.into();
        assert!(matches!(catalog_err, CatalogError::Parse(_)));
    }
}
