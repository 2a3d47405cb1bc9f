//! # SQL Dialects
//!
//! Translation point for hand-written SQL.
//!
//! The sample's raw report was written for SQL Server with bracket-quoted
//! identifiers (`[Products]`). The statement text here is written once with
//! unquoted names and every identifier goes through [`Dialect::quote_ident`],
//! so the same row mapping works against either backend.
//!
//! ```text
//!   report template ──► SqliteDialect ──► "products"."name"
//!                   └─► MssqlDialect  ──► [products].[name]
//! ```

/// SQL syntax differences between backends.
pub trait Dialect: Send + Sync {
    /// Short backend name, used in logs.
    fn name(&self) -> &str;

    /// Quotes a single identifier (table, column, alias).
    fn quote_ident(&self, name: &str) -> String;

    /// Quotes a dotted path, e.g. `p.name` → `"p"."name"`.
    fn quote_path(&self, path: &str) -> String {
        path.split('.')
            .map(|part| self.quote_ident(part))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// SQLite: ANSI double quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn quote_ident(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Microsoft SQL Server: square brackets.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlDialect;

impl Dialect for MssqlDialect {
    fn name(&self) -> &str {
        "mssql"
    }

    fn quote_ident(&self, name: &str) -> String {
        // Closing brackets inside a name are escaped by doubling them
        format!("[{}]", name.replace(']', "]]"))
    }
}

/// Builds the product/category/supplier report for `dialect`.
///
/// Left joins keep products whose category or supplier is missing; the
/// COALESCE turns their columns into empty strings.
pub fn product_supplier_report_sql(dialect: &dyn Dialect) -> String {
    let q = |path: &str| dialect.quote_path(path);

    format!(
        "SELECT {p_id} AS {product_id}, \
                {p_name} AS {product_name}, \
                COALESCE({c_name}, '') AS {category_name}, \
                COALESCE({s_company}, '') AS {supplier_company}, \
                COALESCE({s_address}, '') AS {supplier_address} \
         FROM {products} AS {p} \
         LEFT JOIN {categories} AS {c} ON {p_category} = {c_id} \
         LEFT JOIN {suppliers} AS {s} ON {p_supplier} = {s_id} \
         ORDER BY {p_id}",
        p_id = q("p.id"),
        p_name = q("p.name"),
        c_name = q("c.name"),
        s_company = q("s.company_name"),
        s_address = q("s.address"),
        product_id = q("product_id"),
        product_name = q("product_name"),
        category_name = q("category_name"),
        supplier_company = q("supplier_company"),
        supplier_address = q("supplier_address"),
        products = q("products"),
        categories = q("categories"),
        suppliers = q("suppliers"),
        p = q("p"),
        c = q("c"),
        s = q("s"),
        p_category = q("p.category_id"),
        c_id = q("c.id"),
        p_supplier = q("p.supplier_id"),
        s_id = q("s.id"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(SqliteDialect.quote_ident("products"), "\"products\"");
        assert_eq!(SqliteDialect.quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(MssqlDialect.quote_ident("Products"), "[Products]");
        assert_eq!(MssqlDialect.quote_ident("a]b"), "[a]]b]");
    }

    #[test]
    fn test_quote_path() {
        assert_eq!(MssqlDialect.quote_path("p.category_id"), "[p].[category_id]");
        assert_eq!(SqliteDialect.quote_path("p.name"), "\"p\".\"name\"");
    }

    #[test]
    fn test_report_sql_uses_dialect_quoting() {
        let mssql = product_supplier_report_sql(&MssqlDialect);
        assert!(mssql.contains("FROM [products] AS [p]"));
        assert!(mssql.contains("LEFT JOIN [suppliers] AS [s] ON [p].[supplier_id] = [s].[id]"));
        assert!(!mssql.contains('"'));

        let sqlite = product_supplier_report_sql(&SqliteDialect);
        assert!(sqlite.contains("FROM \"products\" AS \"p\""));
        assert!(!sqlite.contains('['));
    }
}
