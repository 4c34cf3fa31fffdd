use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Read query against a named store collection. Only the operations the
/// managed store exposes over its REST surface: equality and membership
/// filters, ordering, limit, and column projection.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    collection: String,
    params: Vec<(String, String)>,
}

impl SelectQuery {
    pub fn from_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            params: Vec::new(),
        }
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.params.push((column.to_string(), "is.null".to_string()));
        self
    }

    pub fn any_of<V: Display>(mut self, column: &str, values: &[V]) -> Self {
        let list = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.params.push((column.to_string(), format!("in.({list})")));
        self
    }

    /// Repeated calls extend one comma-joined `order` parameter; the store
    /// only honors the last `order` key it receives.
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        let key = format!("{column}.{}", direction.as_str());
        match self.params.iter_mut().find(|(name, _)| name == "order") {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&key);
            }
            None => self.params.push(("order".to_string(), key)),
        }
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    pub fn columns(mut self, projection: &str) -> Self {
        self.params
            .push(("select".to_string(), projection.to_string()));
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}
