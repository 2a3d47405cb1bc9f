//! # Sample Data
//!
//! A slice of the classic Northwind data set: all eight categories, the
//! first eight suppliers with their products, and a page and a half of
//! customers.
//!
//! Grains/Cereals has no products here, so the group join always shows an
//! empty group.

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use northwind_core::{Category, Customer, Product, Supplier};

/// (id, name, description)
const CATEGORIES: &[(i64, &str, &str)] = &[
    (1, "Beverages", "Soft drinks, coffees, teas, beers, and ales"),
    (2, "Condiments", "Sweet and savory sauces, relishes, spreads, and seasonings"),
    (3, "Confections", "Desserts, candies, and sweet breads"),
    (4, "Dairy Products", "Cheeses"),
    (5, "Grains/Cereals", "Breads, crackers, pasta, and cereal"),
    (6, "Meat/Poultry", "Prepared meats"),
    (7, "Produce", "Dried fruit and bean curd"),
    (8, "Seafood", "Seaweed and fish"),
];

/// (id, company, address)
const SUPPLIERS: &[(i64, &str, &str)] = &[
    (1, "Exotic Liquids", "49 Gilbert St."),
    (2, "New Orleans Cajun Delights", "P.O. Box 78934"),
    (3, "Grandma Kelly's Homestead", "707 Oxford Rd."),
    (4, "Tokyo Traders", "9-8 Sekimai Musashino-shi"),
    (5, "Cooperativa de Quesos 'Las Cabras'", "Calle del Rosal 4"),
    (6, "Mayumi's", "92 Setsuko Chuo-ku"),
    (7, "Pavlova, Ltd.", "74 Rose St. Moonie Ponds"),
    (8, "Specialty Biscuits, Ltd.", "29 King's Way"),
];

/// (id, name, supplier, category, price cents, units in stock)
const PRODUCTS: &[(i64, &str, i64, i64, i64, i64)] = &[
    (1, "Chai", 1, 1, 1800, 39),
    (2, "Chang", 1, 1, 1900, 17),
    (3, "Aniseed Syrup", 1, 2, 1000, 13),
    (4, "Chef Anton's Cajun Seasoning", 2, 2, 2200, 53),
    (5, "Chef Anton's Gumbo Mix", 2, 2, 2135, 0),
    (6, "Grandma's Boysenberry Spread", 3, 2, 2500, 120),
    (7, "Uncle Bob's Organic Dried Pears", 3, 7, 3000, 15),
    (8, "Northwoods Cranberry Sauce", 3, 2, 4000, 6),
    (9, "Mishi Kobe Niku", 4, 6, 9700, 29),
    (10, "Ikura", 4, 8, 3100, 31),
    (11, "Queso Cabrales", 5, 4, 2100, 22),
    (12, "Queso Manchego La Pastora", 5, 4, 3800, 86),
    (13, "Konbu", 6, 8, 600, 24),
    (14, "Tofu", 6, 7, 2325, 35),
    (15, "Genen Shouyu", 6, 2, 1550, 39),
    (16, "Pavlova", 7, 3, 1745, 29),
    (17, "Alice Mutton", 7, 6, 3900, 0),
    (18, "Carnarvon Tigers", 7, 8, 6250, 42),
    (19, "Teatime Chocolate Biscuits", 8, 3, 920, 25),
    (20, "Sir Rodney's Marmalade", 8, 3, 8100, 40),
    (21, "Sir Rodney's Scones", 8, 3, 1000, 3),
];

/// (code, company, contact)
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("ALFKI", "Alfreds Futterkiste", "Maria Anders"),
    ("ANATR", "Ana Trujillo Emparedados y helados", "Ana Trujillo"),
    ("ANTON", "Antonio Moreno Taquería", "Antonio Moreno"),
    ("AROUT", "Around the Horn", "Thomas Hardy"),
    ("BERGS", "Berglunds snabbköp", "Christina Berglund"),
    ("BLAUS", "Blauer See Delikatessen", "Hanna Moos"),
    ("BONAP", "Bon app'", "Laurence Lebihan"),
    ("BOTTM", "Bottom-Dollar Markets", "Elizabeth Lincoln"),
    ("CHOPS", "Chop-suey Chinese", "Yang Wang"),
    ("ERNSH", "Ernst Handel", "Roland Mendel"),
    ("FRANK", "Frankenversand", "Peter Franken"),
    ("HANAR", "Hanari Carnes", "Mario Pontes"),
    ("LAZYK", "Lazy K Kountry Store", "John Steel"),
    ("QUICK", "QUICK-Stop", "Horst Kloss"),
    ("SEVES", "Seven Seas Imports", "Hari Kumar"),
    ("VINET", "Vins et alcools Chevalier", "Paul Henriot"),
    ("WOLZA", "Wolski  Zajazd", "Zbyszek Piestrzeniewicz"),
];

/// Row counts written by [`seed_sample_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub suppliers: usize,
    pub products: usize,
    pub customers: usize,
}

/// Writes the sample rows through the repositories.
///
/// Expects empty tables: existing ids fail with `DbError::UniqueViolation`.
pub async fn seed_sample_data(db: &Database) -> DbResult<SeedSummary> {
    let mut session = db.session().await?;
    let mut summary = SeedSummary::default();

    for &(id, name, description) in CATEGORIES {
        let category = Category::new(id, name, Some(description.to_string()));
        session.categories().insert(&category).await?;
        summary.categories += 1;
    }

    for &(id, company_name, address) in SUPPLIERS {
        let supplier = Supplier {
            id,
            company_name: company_name.to_string(),
            address: Some(address.to_string()),
        };
        session.suppliers().insert(&supplier).await?;
        summary.suppliers += 1;
    }

    for &(id, name, supplier_id, category_id, unit_price_cents, units_in_stock) in PRODUCTS {
        let product = Product {
            id,
            name: name.to_string(),
            unit_price_cents,
            units_in_stock,
            category_id: Some(category_id),
            supplier_id: Some(supplier_id),
        };
        session.products().insert(&product).await?;
        summary.products += 1;
    }

    for &(id, company_name, contact_name) in CUSTOMERS {
        let customer = Customer {
            id: id.to_string(),
            company_name: company_name.to_string(),
            contact_name: Some(contact_name.to_string()),
        };
        session.customers().insert(&customer).await?;
        summary.customers += 1;
    }

    info!(
        categories = summary.categories,
        suppliers = summary.suppliers,
        products = summary.products,
        customers = summary.customers,
        "Sample data written"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use crate::DbError;
    use northwind_core::Money;

    #[tokio::test]
    async fn test_seed_sample_data() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let summary = seed_sample_data(&db).await.unwrap();
        assert_eq!(summary.categories, 8);
        assert_eq!(summary.products, PRODUCTS.len());

        let mut session = db.session().await.unwrap();
        assert_eq!(session.products().count().await.unwrap(), 21);
        assert_eq!(
            session.customers().count().await.unwrap(),
            CUSTOMERS.len() as i64
        );

        let top = session.customers().top_by_company_desc(10).await.unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].company_name, "Wolski  Zajazd");

        let groups = session.reports().category_groups().await.unwrap();
        let grains = groups.iter().find(|g| g.category_id == 5).unwrap();
        assert!(grains.products.is_empty());

        let total = session.products().total_unit_price().await.unwrap();
        let expected: i64 = PRODUCTS.iter().map(|p| p.4).sum();
        assert_eq!(total, Money::from_cents(expected));
    }

    #[tokio::test]
    async fn test_seed_twice_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_sample_data(&db).await.unwrap();

        let err = seed_sample_data(&db).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
