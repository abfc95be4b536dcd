//! PostgREST query builder.
//!
//! Reads select every column; the only filter needed is the lower time bound,
//! expressed as a `column=gte.value` query parameter. Parameters are handed to
//! `reqwest` for URL encoding, never spliced into the path by hand.
//!
//! # Example
//!
//! ```rust
//! use storefront_analytics::QueryBuilder;
//! let (path, params) = QueryBuilder::new("products")
//!     .gte("created_at", "2024-01-01T00:00:00.000Z")
//!     .build();
//! assert_eq!(path, "products");
//! assert_eq!(params[0], ("select".to_string(), "*".to_string()));
//! assert_eq!(params[1].1, "gte.2024-01-01T00:00:00.000Z");
//! ```

/// Builds PostgREST table reads as `(path, query_params)`.
pub struct QueryBuilder {
    table: String,
    filters: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a builder reading every column of `table`.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filters: Vec::new(),
        }
    }

    /// Add a greater-than-or-equal filter: `{column}=gte.{value}`.
    pub fn gte(&mut self, column: &str, value: &str) -> &mut Self {
        self.filters
            .push((column.to_string(), format!("gte.{}", value)));
        self
    }

    /// Build the table path and the ordered query parameter list.
    pub fn build(&self) -> (String, Vec<(String, String)>) {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(self.filters.iter().cloned());
        (self.table.clone(), params)
    }
}
