use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreResult;

/// A stored record: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";
/// Field holding the per-document version counter.
pub const VERSION_FIELD: &str = "__v";

/// Public name of [`ID_FIELD`] in shaped JSON.
pub const PUBLIC_ID_FIELD: &str = "id";

/// Map a public field name to the name it is stored under.
pub fn stored_field(field: &str) -> &str {
    if field == PUBLIC_ID_FIELD {
        ID_FIELD
    } else {
        field
    }
}

/// Exact-match filter: every listed field must equal the given value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: BTreeMap<String, Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality criterion; chains.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field: String = field.into();
        let field = stored_field(&field).to_string();
        self.fields.insert(field, value.into());
        self
    }

    /// Add an equality criterion only when a value is present.
    pub fn eq_opt(self, field: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Whether `doc` satisfies every criterion.
    pub fn matches(&self, doc: &Document) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One `field:order` criterion of a sort specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

/// Ordered list of sort criteria, parsed from `field:asc,other:desc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    keys: Vec<SortKey>,
}

impl Sort {
    /// Parse a `sortBy` expression. Anything but `desc` sorts ascending;
    /// empty criteria are skipped.
    pub fn parse(expr: &str) -> Self {
        let keys = expr
            .split(',')
            .filter_map(|criterion| {
                let mut parts = criterion.trim().splitn(2, ':');
                let field = parts.next()?.trim();
                if field.is_empty() {
                    return None;
                }
                let order = match parts.next().map(str::trim) {
                    Some("desc") => SortOrder::Desc,
                    _ => SortOrder::Asc,
                };
                Some(SortKey {
                    field: stored_field(field).to_string(),
                    order,
                })
            })
            .collect();
        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .keys
            .iter()
            .map(|key| {
                let order = match key.order {
                    SortOrder::Asc => "asc",
                    SortOrder::Desc => "desc",
                };
                format!("{}:{}", key.field, order)
            })
            .collect();
        f.write_str(&rendered.join(","))
    }
}

/// Bounded fetch request passed to [`DocumentStore::find`].
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Sort,
    pub skip: u64,
    pub limit: Option<u64>,
}

/// Contract every document backend provides.
///
/// Documents returned by a store always carry [`ID_FIELD`] as a string.
/// `update_by_id` and `delete_by_id` check existence and mutate in one
/// atomic step; `None` means no document had that identifier.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logs.
    fn kind(&self) -> &'static str;

    /// Check `id` has the shape this backend assigns.
    fn validate_id(&self, id: &str) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;

    /// Insert `doc`, assigning the identifier and a zero version counter.
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<Document>;

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Merge `changes` over the stored fields and bump the version counter.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StoreResult<Option<Document>>;

    /// Remove the document and return its last stored state.
    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sort_parses_multiple_criteria() {
        let sort = Sort::parse("name:asc, createdAt:desc");
        assert_eq!(
            sort.keys(),
            &[
                SortKey {
                    field: "name".into(),
                    order: SortOrder::Asc
                },
                SortKey {
                    field: "createdAt".into(),
                    order: SortOrder::Desc
                },
            ]
        );
        assert_eq!(sort.to_string(), "name:asc,createdAt:desc");
    }

    #[test]
    fn sort_defaults_to_ascending_and_skips_blanks() {
        let sort = Sort::parse("name,,:desc,updatedAt:sideways");
        assert_eq!(sort.keys().len(), 2);
        assert!(sort.keys().iter().all(|k| k.order == SortOrder::Asc));
        assert!(Sort::parse("").is_empty());
    }

    #[test]
    fn filter_matches_all_criteria() {
        let doc = json!({"name": "Go", "author": "a1"});
        let doc = doc.as_object().unwrap();

        assert!(Filter::new().matches(doc));
        assert!(Filter::new().eq("name", "Go").matches(doc));
        assert!(!Filter::new().eq("name", "Go").eq("author", "a2").matches(doc));
        assert!(!Filter::new().eq("publisher", "p1").matches(doc));
    }

    #[test]
    fn filter_eq_opt_skips_missing_values() {
        let filter = Filter::new().eq_opt("name", None::<String>);
        assert!(filter.is_empty());
        let filter = Filter::new().eq_opt("name", Some("Acme"));
        assert_eq!(filter.iter().count(), 1);
    }

    #[test]
    fn public_id_maps_to_stored_id() {
        let sort = Sort::parse("id:desc");
        assert_eq!(sort.keys()[0].field, ID_FIELD);

        let doc = json!({"_id": "abc", "name": "Go"});
        let doc = doc.as_object().unwrap();
        assert!(Filter::new().eq("id", "abc").matches(doc));
        assert!(!Filter::new().eq("id", "xyz").matches(doc));
    }
}
