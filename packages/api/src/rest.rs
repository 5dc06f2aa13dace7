//! Query builder for the REST layer's URL grammar
//! (`select=...&col=eq.value&order=col.desc&limit=n`).

/// A read against one table. Values are percent-encoded by the HTTP client
/// when the pairs are attached with `RequestBuilder::query`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableQuery {
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<usize>,
}

impl TableQuery {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns to return. Embedded resources use the `rel(cols)` form,
    /// e.g. `memos(count)`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{column}.{dir}"));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Query-string pairs in a stable order: select, filters, order, limit.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(select) = &self.select {
            pairs.push(("select".to_string(), select.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}
