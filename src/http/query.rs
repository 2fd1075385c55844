/// A single query-string value: either a scalar or a repeated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::One(v)
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::One(v.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::Many(v)
    }
}

/// Filters that can be turned into query-string parameters.
///
/// Empty values are skipped when the query is built, so implementors can
/// return every field unconditionally. Keys are the service's lowercase
/// parameter names (`label`, `type`, `ids`), never Rust field names.
pub trait ToQuery {
    fn to_query(&self) -> Vec<(&'static str, QueryValue)>;
}

/// Accumulates `key=value` pairs in insertion order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_filters<F: ToQuery + ?Sized>(filters: Option<&F>) -> Self {
        let mut query = Self::new();
        if let Some(filters) = filters {
            for (key, value) in filters.to_query() {
                query.push(key, value);
            }
        }
        query
    }

    pub fn push(&mut self, key: &str, value: impl Into<QueryValue>) {
        match value.into() {
            QueryValue::One(v) if v.is_empty() => {},
            QueryValue::One(v) => self.pairs.push((key.to_string(), v)),
            QueryValue::Many(values) => {
                self.pairs
                    .extend(values.into_iter().filter(|v| !v.is_empty()).map(|v| (key.to_string(), v)));
            },
        }
    }

    /// Replaces any existing value for `key`.
    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.push((key.to_string(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}
