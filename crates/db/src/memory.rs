//! In-process document store used for local runs and tests.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{
    Document, DocumentStore, Filter, FindOptions, Sort, SortOrder, ID_FIELD, VERSION_FIELD,
};

/// Collections kept in insertion order, which is this backend's natural order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_of(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

fn compare_documents(sort: &Sort, a: &Document, b: &Document) -> Ordering {
    sort.keys()
        .iter()
        .map(|key| {
            let ordering = compare_values(a.get(&key.field), b.get(&key.field));
            match key.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn validate_id(&self, id: &str) -> StoreResult<()> {
        Uuid::parse_str(id)
            .map(|_| ())
            .map_err(|_| StoreError::InvalidId(id.to_string()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, collection: &str, mut doc: Document) -> StoreResult<Document> {
        doc.insert(ID_FIELD.to_string(), Value::String(Uuid::now_v7().to_string()));
        doc.insert(VERSION_FIELD.to_string(), Value::from(0u64));

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.validate_id(id)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| id_of(doc) == Some(id)))
            .cloned())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<&Document> = docs.iter().filter(|doc| filter.matches(doc)).collect();
        if !options.sort.is_empty() {
            // stable, so ties keep insertion order
            matched.sort_by(|a, b| compare_documents(&options.sort, a, b));
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StoreResult<Option<Document>> {
        self.validate_id(id)?;
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| id_of(doc) == Some(id)))
        else {
            return Ok(None);
        };

        for (field, value) in changes {
            if field == ID_FIELD || field == VERSION_FIELD {
                continue;
            }
            doc.insert(field, value);
        }
        let version = doc.get(VERSION_FIELD).and_then(Value::as_u64).unwrap_or(0);
        doc.insert(VERSION_FIELD.to_string(), Value::from(version + 1));

        Ok(Some(doc.clone()))
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.validate_id(id)?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let position = docs.iter().position(|doc| id_of(doc) == Some(id));
        Ok(position.map(|index| docs.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_version() {
        let store = MemoryStore::new();
        let stored = store
            .insert("publishers", doc(json!({"name": "Acme"})))
            .await
            .unwrap();

        let id = stored[ID_FIELD].as_str().unwrap();
        assert!(store.validate_id(id).is_ok());
        assert_eq!(stored[VERSION_FIELD], json!(0));

        let fetched = store.find_by_id("publishers", id).await.unwrap();
        assert_eq!(fetched, Some(stored));
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected() {
        let store = MemoryStore::new();
        let err = store.find_by_id("publishers", "not-an-id").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }

    #[tokio::test]
    async fn update_merges_fields_and_bumps_version() {
        let store = MemoryStore::new();
        let stored = store
            .insert("books", doc(json!({"name": "Go", "author": "a1"})))
            .await
            .unwrap();
        let id = stored[ID_FIELD].as_str().unwrap().to_string();

        let updated = store
            .update_by_id("books", &id, doc(json!({"name": "Rust", "_id": "hijack"})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated["name"], json!("Rust"));
        assert_eq!(updated["author"], json!("a1"));
        assert_eq!(updated[ID_FIELD], json!(id));
        assert_eq!(updated[VERSION_FIELD], json!(1));
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_id_return_none() {
        let store = MemoryStore::new();
        let id = Uuid::now_v7().to_string();
        assert!(store
            .update_by_id("books", &id, Document::new())
            .await
            .unwrap()
            .is_none());
        assert!(store.delete_by_id("books", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let store = MemoryStore::new();
        let stored = store
            .insert("authors", doc(json!({"name": "Jane"})))
            .await
            .unwrap();
        let id = stored[ID_FIELD].as_str().unwrap();

        let removed = store.delete_by_id("authors", id).await.unwrap();
        assert_eq!(removed, Some(stored.clone()));
        assert!(store.find_by_id("authors", id).await.unwrap().is_none());
        assert_eq!(store.count("authors", &Filter::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_filters_sorts_and_bounds() {
        let store = MemoryStore::new();
        for name in ["b", "c", "a", "d"] {
            store
                .insert("authors", doc(json!({"name": name, "group": 1})))
                .await
                .unwrap();
        }
        store
            .insert("authors", doc(json!({"name": "z", "group": 2})))
            .await
            .unwrap();

        let filter = Filter::new().eq("group", 1);
        let options = FindOptions {
            sort: Sort::parse("name:desc"),
            skip: 1,
            limit: Some(2),
        };
        let found = store.find("authors", &filter, &options).await.unwrap();
        let names: Vec<_> = found.iter().map(|d| d["name"].clone()).collect();
        assert_eq!(names, vec![json!("c"), json!("b")]);
        assert_eq!(store.count("authors", &filter).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn find_without_sort_keeps_insertion_order() {
        let store = MemoryStore::new();
        for name in ["b", "a", "c"] {
            store
                .insert("authors", doc(json!({"name": name})))
                .await
                .unwrap();
        }
        let found = store
            .find("authors", &Filter::new(), &FindOptions::default())
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|d| d["name"].clone()).collect();
        assert_eq!(names, vec![json!("b"), json!("a"), json!("c")]);
    }
}
