//! # Validation Module
//!
//! Field rules checked before a row is written.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  └── Type validation (i64, Money parsing)                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository insert/update                                     │
//! │  └── THIS MODULE: lengths, non-negative money and stock                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Length limits follow the Northwind column sizes
//! (`CategoryName nvarchar(15)`, `ProductName nvarchar(40)`, ...).
//!
//! ## Usage
//! ```rust
//! use northwind_core::validation::{validate_category_name, validate_unit_price_cents};
//!
//! assert!(validate_category_name("Beverages").is_ok());
//! assert!(validate_unit_price_cents(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{Category, Customer, Product, Supplier};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_CATEGORY_NAME_LEN: usize = 15;
pub const MAX_PRODUCT_NAME_LEN: usize = 40;
pub const MAX_COMPANY_NAME_LEN: usize = 40;
pub const MAX_CONTACT_NAME_LEN: usize = 30;
pub const MAX_ADDRESS_LEN: usize = 60;
pub const CUSTOMER_ID_LEN: usize = 5;

/// `UnitsInStock` is a smallint in Northwind.
pub const MAX_UNITS_IN_STOCK: i64 = i16::MAX as i64;

/// Largest unit price whose stock value (price x `MAX_UNITS_IN_STOCK`)
/// still fits in an `i64` of cents, rounded down to whole dollars.
pub const MAX_UNIT_PRICE_CENTS: i64 = i64::MAX / MAX_UNITS_IN_STOCK / 100 * 100;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn validate_optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(value) if value.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

/// Validates a category name (1 to 15 characters).
///
/// ## Example
/// ```rust
/// use northwind_core::validation::validate_category_name;
///
/// assert!(validate_category_name("Seafood").is_ok());
/// assert!(validate_category_name("   ").is_err());
/// assert!(validate_category_name("Frozen Desserts And More").is_err());
/// ```
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_text("category name", name, MAX_CATEGORY_NAME_LEN)
}

/// Validates a product name (1 to 40 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("product name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a company name (1 to 40 characters).
pub fn validate_company_name(name: &str) -> ValidationResult<()> {
    validate_text("company name", name, MAX_COMPANY_NAME_LEN)
}

/// Validates a Northwind customer code: exactly five ASCII letters or digits.
///
/// ## Example
/// ```rust
/// use northwind_core::validation::validate_customer_id;
///
/// assert!(validate_customer_id("ALFKI").is_ok());
/// assert!(validate_customer_id("ALF").is_err());
/// ```
pub fn validate_customer_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer id".to_string(),
        });
    }

    if id.len() != CUSTOMER_ID_LEN || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "customer id".to_string(),
            reason: format!("must be {CUSTOMER_ID_LEN} letters or digits"),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in cents (0 to `MAX_UNIT_PRICE_CENTS`).
///
/// ## Example
/// ```rust
/// use northwind_core::validation::validate_unit_price_cents;
///
/// assert!(validate_unit_price_cents(1800).is_ok());
/// assert!(validate_unit_price_cents(0).is_ok());
/// assert!(validate_unit_price_cents(-100).is_err());
/// assert!(validate_unit_price_cents(1_000_000_000_000_000).is_err());
/// ```
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "unit price".to_string(),
        });
    }

    if cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates units in stock (0 to 32767).
pub fn validate_units_in_stock(units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::Negative {
            field: "units in stock".to_string(),
        });
    }

    if units > MAX_UNITS_IN_STOCK {
        return Err(ValidationError::OutOfRange {
            field: "units in stock".to_string(),
            min: 0,
            max: MAX_UNITS_IN_STOCK,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

pub fn validate_category(category: &Category) -> ValidationResult<()> {
    validate_category_name(&category.name)
}

pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_unit_price_cents(product.unit_price_cents)?;
    validate_units_in_stock(product.units_in_stock)
}

pub fn validate_supplier(supplier: &Supplier) -> ValidationResult<()> {
    validate_company_name(&supplier.company_name)?;
    validate_optional_text("address", supplier.address.as_deref(), MAX_ADDRESS_LEN)
}

pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    validate_customer_id(&customer.id)?;
    validate_company_name(&customer.company_name)?;
    validate_optional_text(
        "contact name",
        customer.contact_name.as_deref(),
        MAX_CONTACT_NAME_LEN,
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_category_name() {
        assert!(validate_category_name("Beverages").is_ok());
        assert!(validate_category_name("").is_err());
        assert_eq!(
            validate_category_name(&"A".repeat(16)),
            Err(ValidationError::TooLong {
                field: "category name".to_string(),
                max: 15
            })
        );
    }

    #[test]
    fn test_validate_customer_id() {
        assert!(validate_customer_id("ALFKI").is_ok());
        assert!(validate_customer_id("").is_err());
        assert!(validate_customer_id("ALFKIX").is_err());
        assert!(validate_customer_id("AL KI").is_err());
    }

    #[test]
    fn test_validate_units_in_stock() {
        assert!(validate_units_in_stock(0).is_ok());
        assert!(validate_units_in_stock(32767).is_ok());
        assert!(validate_units_in_stock(-1).is_err());
        assert!(validate_units_in_stock(32768).is_err());
    }

    #[test]
    fn test_unit_price_ceiling_keeps_stock_value_in_range() {
        assert!(validate_unit_price_cents(MAX_UNIT_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_unit_price_cents(MAX_UNIT_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { .. })
        ));

        let priciest = Product {
            id: 1,
            name: "Gold".to_string(),
            unit_price_cents: MAX_UNIT_PRICE_CENTS,
            units_in_stock: MAX_UNITS_IN_STOCK,
            category_id: None,
            supplier_id: None,
        };
        assert!(validate_product(&priciest).is_ok());
        assert!(priciest.stock_value().is_some());
    }

    #[test]
    fn test_validate_product() {
        let mut product = Product {
            id: 1,
            name: "Chai".to_string(),
            unit_price_cents: 1800,
            units_in_stock: 39,
            category_id: Some(1),
            supplier_id: Some(1),
        };
        assert!(validate_product(&product).is_ok());

        product.unit_price_cents = -1;
        assert!(matches!(
            validate_product(&product),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_customer_contact_length() {
        let customer = Customer {
            id: "BERGS".to_string(),
            company_name: "Berglunds snabbköp".to_string(),
            contact_name: Some("C".repeat(31)),
        };
        assert!(validate_customer(&customer).is_err());
    }
}
