use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::{StoreError, StoreResult};
use crate::paginate::{paginate, QueryOptions, QueryResult};
use crate::store::{Document, DocumentStore, Filter};
use crate::to_json::to_json;

pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Fixed-width RFC 3339, so stored timestamps sort as strings.
const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
);

/// A persisted entity type. Its serialized form is the public JSON shape.
pub trait Schema: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the entity lives in.
    const COLLECTION: &'static str;

    /// Stored fields never exposed through [`to_json`].
    const PRIVATE_FIELDS: &'static [&'static str] = &[];
}

/// Typed access to one collection: timestamps on write, shaping on read.
pub struct Repository<E> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

fn now_timestamp() -> StoreResult<Value> {
    OffsetDateTime::now_utc()
        .format(TIMESTAMP_FORMAT)
        .map(Value::String)
        .map_err(|err| StoreError::Backend(err.into()))
}

fn to_document<B: Serialize>(collection: &str, body: &B) -> StoreResult<Document> {
    match serde_json::to_value(body)? {
        Value::Object(doc) => Ok(doc),
        _ => Err(StoreError::NotAnObject(collection.to_string())),
    }
}

impl<E: Schema> Repository<E> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    fn decode(doc: Document) -> StoreResult<E> {
        let shaped = to_json(doc, E::PRIVATE_FIELDS);
        Ok(serde_json::from_value(Value::Object(shaped))?)
    }

    /// Fails with [`StoreError::InvalidId`] when `id` is malformed for the backend.
    pub fn validate_id(&self, id: &str) -> StoreResult<()> {
        self.store.validate_id(id)
    }

    pub async fn create<B: Serialize>(&self, body: &B) -> StoreResult<E> {
        let mut doc = to_document(E::COLLECTION, body)?;
        let now = now_timestamp()?;
        doc.insert(CREATED_AT_FIELD.to_string(), now.clone());
        doc.insert(UPDATED_AT_FIELD.to_string(), now);

        let stored = self.store.insert(E::COLLECTION, doc).await?;
        tracing::debug!(collection = E::COLLECTION, "document created");
        Self::decode(stored)
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<E>> {
        self.store
            .find_by_id(E::COLLECTION, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        self.store.count(E::COLLECTION, filter).await
    }

    pub async fn paginate(
        &self,
        filter: &Filter,
        options: &QueryOptions,
    ) -> StoreResult<QueryResult<E>> {
        paginate(self.store.as_ref(), E::COLLECTION, filter, options)
            .await?
            .try_map(Self::decode)
    }

    /// Apply the non-null fields of `changes` and refresh `updatedAt`.
    pub async fn update_by_id<B: Serialize>(&self, id: &str, changes: &B) -> StoreResult<Option<E>> {
        let mut doc = to_document(E::COLLECTION, changes)?;
        doc.retain(|_, value| !value.is_null());
        doc.remove(CREATED_AT_FIELD);
        doc.insert(UPDATED_AT_FIELD.to_string(), now_timestamp()?);

        let updated = self.store.update_by_id(E::COLLECTION, id, doc).await?;
        tracing::debug!(
            collection = E::COLLECTION,
            id,
            found = updated.is_some(),
            "document update"
        );
        updated.map(Self::decode).transpose()
    }

    pub async fn delete_by_id(&self, id: &str) -> StoreResult<Option<E>> {
        let removed = self.store.delete_by_id(E::COLLECTION, id).await?;
        tracing::debug!(
            collection = E::COLLECTION,
            id,
            found = removed.is_some(),
            "document delete"
        );
        removed.map(Self::decode).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Shelf {
        id: String,
        label: String,
        created_at: String,
        updated_at: String,
    }

    impl Schema for Shelf {
        const COLLECTION: &'static str = "shelves";
        const PRIVATE_FIELDS: &'static [&'static str] = &["internalCode"];
    }

    fn repository() -> Repository<Shelf> {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_stamps_timestamps_and_hides_private_fields() {
        let repo = repository();
        let shelf = repo
            .create(&json!({"label": "A1", "internalCode": "x"}))
            .await
            .unwrap();

        assert_eq!(shelf.label, "A1");
        assert_eq!(shelf.created_at, shelf.updated_at);
        assert!(OffsetDateTime::parse(
            &shelf.created_at,
            &time::format_description::well_known::Rfc3339
        )
        .is_ok());

        let raw = repo
            .store()
            .find_by_id(Shelf::COLLECTION, &shelf.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(raw["internalCode"], json!("x"));
        assert_eq!(repo.find_by_id(&shelf.id).await.unwrap(), Some(shelf));
    }

    #[tokio::test]
    async fn update_ignores_null_fields_and_keeps_created_at() {
        let repo = repository();
        let shelf = repo.create(&json!({"label": "A1"})).await.unwrap();

        let updated = repo
            .update_by_id(
                &shelf.id,
                &json!({"label": null, "createdAt": "1970-01-01T00:00:00.000000000Z"}),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.label, "A1");
        assert_eq!(updated.created_at, shelf.created_at);
        assert!(updated.updated_at >= shelf.updated_at);
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected() {
        let repo = repository();
        let err = repo.create(&json!(["not", "an", "object"])).await.unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject(_)));
    }

    #[tokio::test]
    async fn paginate_decodes_entities() {
        let repo = repository();
        for label in ["b", "a"] {
            repo.create(&json!({ "label": label })).await.unwrap();
        }
        let page = repo
            .paginate(
                &Filter::new(),
                &QueryOptions {
                    sort_by: Some("label:asc".into()),
                    ..QueryOptions::default()
                },
            )
            .await
            .unwrap();
        let labels: Vec<_> = page.results.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(repo.count(&Filter::new().eq("label", "a")).await.unwrap(), 1);
    }
}
