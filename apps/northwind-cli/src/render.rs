//! # Presentation
//!
//! One line of text per result row, fields in a fixed order. Prices use
//! [`Money`](northwind_core::Money)'s `Display` (`$10.50`).
//!
//! ```text
//! customer          Wolski  Zajazd Zbyszek Piestrzeniewicz
//! product           1 Chai $18.00 (39 in stock)
//! valuation         1 Chai $18.00 stock value $702.00
//! product/category  1 Chai Beverages
//! group             Beverages (2 products)
//!                     1 Chai $18.00 (39 in stock)
//! detail            1 Chai $18.00 category=Beverages supplier=Exotic Liquids
//! total             Total unit price: $636.25
//! report            1 Chai | Beverages | Exotic Liquids | 49 Gilbert St.
//! ```

use northwind_core::{
    Category, CategoryGroup, Customer, Money, Product, ProductCategoryRow, ProductDetail,
    ProductSupplierRow, ProductValuation,
};

pub fn customer_line(customer: &Customer) -> String {
    match &customer.contact_name {
        Some(contact) => format!("{} {}", customer.company_name, contact),
        None => customer.company_name.clone(),
    }
}

pub fn category_line(category: &Category) -> String {
    format!(
        "{} {} ({})",
        category.id,
        category.name,
        category.description.as_deref().unwrap_or("-")
    )
}

pub fn product_line(product: &Product) -> String {
    format!(
        "{} {} {} ({} in stock)",
        product.id,
        product.name,
        product.price(),
        product.units_in_stock
    )
}

pub fn valuation_line(row: &ProductValuation) -> String {
    format!(
        "{} {} {} stock value {}",
        row.product_id,
        row.product_name,
        row.price(),
        row.stock_value()
    )
}

pub fn product_category_line(row: &ProductCategoryRow) -> String {
    format!("{} {} {}", row.product_id, row.product_name, row.category_name)
}

/// Header line followed by one indented product line per member.
pub fn category_group_lines(group: &CategoryGroup) -> Vec<String> {
    let count = group.products.len();

    let mut lines = Vec::with_capacity(count + 1);
    lines.push(format!("{} ({count} products)", group.category_name));
    lines.extend(group.products.iter().map(|p| format!("  {}", product_line(p))));
    lines
}

pub fn product_detail_line(detail: &ProductDetail) -> String {
    let product = &detail.product;
    format!(
        "{} {} {} category={} supplier={}",
        product.id,
        product.name,
        product.price(),
        detail.category.as_ref().map_or("-", |c| c.name.as_str()),
        detail
            .supplier
            .as_ref()
            .map_or("-", |s| s.company_name.as_str()),
    )
}

pub fn total_line(total: Money) -> String {
    format!("Total unit price: {total}")
}

pub fn product_supplier_line(row: &ProductSupplierRow) -> String {
    format!(
        "{} {} | {} | {} | {}",
        row.product_id,
        row.product_name,
        row.category_name,
        row.supplier_company,
        row.supplier_address
    )
}

pub fn connection_line(connection_string: &str) -> String {
    format!("ConnectionString : {connection_string}")
}
