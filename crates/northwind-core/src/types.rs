//! # Domain Types
//!
//! The Northwind entities and the read-only shapes queries project them into.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Entities (persisted)                            │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │     Product     │   │    Supplier     │       │
//! │  │  ─────────────  │◄──│  ─────────────  │──►│  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name           │   │  company_name   │       │
//! │  │  description    │   │  unit_price     │   │  address        │       │
//! │  └─────────────────┘   │  units_in_stock │   └─────────────────┘       │
//! │                        │  category_id?   │                              │
//! │  ┌─────────────────┐   │  supplier_id?   │                              │
//! │  │    Customer     │   └─────────────────┘                              │
//! │  │  id ("ALFKI")   │                                                    │
//! │  │  company_name   │                                                    │
//! │  │  contact_name   │                                                    │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │                      Projections (never persisted)                      │
//! │  ProductValuation · ProductCategoryRow · CategoryGroup                  │
//! │  ProductDetail · ProductSupplierRow                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are assigned by the store and never change afterwards.
//! A product's category and supplier references are optional.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category ("Beverages", "Condiments", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>, description: Option<String>) -> Self {
        Category {
            id,
            name: name.into(),
            description,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    pub name: String,

    /// Unit price in cents. Between 0 and `MAX_UNIT_PRICE_CENTS`.
    pub unit_price_cents: i64,

    /// Units on the shelf. Never negative.
    pub units_in_stock: i64,

    pub category_id: Option<i64>,

    pub supplier_id: Option<i64>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price times units in stock. `None` if the product overflows.
    #[inline]
    pub fn stock_value(&self) -> Option<Money> {
        self.price().checked_mul(self.units_in_stock)
    }
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub company_name: String,
    pub address: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer. The id is Northwind's five-letter code, e.g. `ALFKI`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub company_name: String,
    pub contact_name: Option<String>,
}

// =============================================================================
// Projections
// =============================================================================

/// Product re-selected as {id, name, price, price × stock}.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductValuation {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub stock_value_cents: i64,
}

impl ProductValuation {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn stock_value(&self) -> Money {
        Money::from_cents(self.stock_value_cents)
    }
}

/// One row of the category/product inner join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductCategoryRow {
    pub product_id: i64,
    pub product_name: String,
    pub category_name: String,
}

/// A category together with every product that references it.
///
/// `products` is ordered by name and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category_id: i64,
    pub category_name: String,
    pub products: Vec<Product>,
}

/// A product with its category and supplier attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub category: Option<Category>,
    pub supplier: Option<Supplier>,
}

/// Result row of the raw product/category/supplier report.
///
/// Category and supplier columns are empty strings, not absent, when the
/// product has no matching row on that side of the left join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductSupplierRow {
    pub product_id: i64,
    pub product_name: String,
    pub category_name: String,
    pub supplier_company: String,
    pub supplier_address: String,
}

// =============================================================================
// Group Join
// =============================================================================

/// Attaches to every category the products whose `category_id` matches it.
///
/// ```text
///  categories: [1 Beverages, 2 Produce, 3 Seafood]
///  products:   [Tea(1), Apple(2), Chai(1), Orphan(None)]
///
///  ──► Beverages: [Chai, Tea]
///      Produce:   [Apple]
///      Seafood:   []            ← kept, with an empty group
/// ```
///
/// Categories keep their input order. Within a group, products are ordered
/// by name, ties broken by id. Products without a matching category appear
/// in no group.
pub fn group_join(categories: Vec<Category>, products: Vec<Product>) -> Vec<CategoryGroup> {
    let mut by_category: HashMap<i64, Vec<Product>> = HashMap::new();
    for product in products {
        if let Some(category_id) = product.category_id {
            by_category.entry(category_id).or_default().push(product);
        }
    }

    categories
        .into_iter()
        .map(|category| {
            let mut products = by_category.remove(&category.id).unwrap_or_default();
            products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            CategoryGroup {
                category_id: category.id,
                category_name: category.name,
                products,
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, category_id: Option<i64>) -> Product {
        Product {
            id,
            name: name.to_string(),
            unit_price_cents: 100,
            units_in_stock: 1,
            category_id,
            supplier_id: None,
        }
    }

    #[test]
    fn test_stock_value() {
        let tea = Product {
            unit_price_cents: 1000,
            units_in_stock: 2,
            ..product(1, "Tea", Some(1))
        };
        assert_eq!(tea.stock_value(), Some(Money::from_cents(2000)));
        assert_eq!(tea.price().to_string(), "$10.00");
    }

    #[test]
    fn test_group_join_keeps_empty_categories() {
        let categories = vec![
            Category::new(1, "Beverages", None),
            Category::new(2, "Produce", None),
            Category::new(3, "Seafood", None),
        ];
        let products = vec![
            product(1, "Tea", Some(1)),
            product(2, "Apple", Some(2)),
            product(3, "Chai", Some(1)),
        ];

        let groups = group_join(categories, products);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].category_name, "Beverages");
        let names: Vec<_> = groups[0].products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Chai", "Tea"]);
        assert_eq!(groups[1].products.len(), 1);
        assert!(groups[2].products.is_empty());
    }

    #[test]
    fn test_group_join_partitions_products() {
        let categories = vec![Category::new(1, "A", None), Category::new(2, "B", None)];
        let products = vec![
            product(1, "x", Some(2)),
            product(2, "y", Some(1)),
            product(3, "z", Some(2)),
            product(4, "orphan", None),
            product(5, "dangling", Some(99)),
        ];

        let groups = group_join(categories, products);

        let mut grouped_ids: Vec<i64> = groups
            .iter()
            .flat_map(|g| {
                g.products.iter().map(move |p| {
                    assert_eq!(p.category_id, Some(g.category_id));
                    p.id
                })
            })
            .collect();
        grouped_ids.sort_unstable();
        assert_eq!(grouped_ids, [1, 2, 3]);
    }

    #[test]
    fn test_serde_round_trip_keeps_optional_fields() {
        let customer = Customer {
            id: "ALFKI".to_string(),
            company_name: "Alfreds Futterkiste".to_string(),
            contact_name: None,
        };
        let json = serde_json::to_string(&customer).unwrap();
        let back: Customer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, customer);
    }
}
