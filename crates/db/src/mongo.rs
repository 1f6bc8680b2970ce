//! MongoDB backend, enabled with the `mongodb` cargo feature.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::store::{
    Document, DocumentStore, Filter, FindOptions, Sort, SortOrder, ID_FIELD, VERSION_FIELD,
};

pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect to `uri` and bind to the named database.
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self {
            database: client.database(database),
        })
    }

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.database.collection(name)
    }

    fn object_id(&self, id: &str) -> StoreResult<ObjectId> {
        ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
    }
}

fn to_bson_document(doc: &Document) -> StoreResult<bson::Document> {
    bson::to_document(doc).map_err(|err| StoreError::Backend(err.into()))
}

fn to_bson_filter(filter: &Filter) -> StoreResult<bson::Document> {
    let mut out = bson::Document::new();
    for (field, value) in filter.iter() {
        if field == ID_FIELD {
            if let Some(oid) = value.as_str().and_then(|id| ObjectId::parse_str(id).ok()) {
                out.insert(ID_FIELD, oid);
                continue;
            }
        }
        let value = bson::to_bson(value).map_err(|err| StoreError::Backend(err.into()))?;
        out.insert(field.clone(), value);
    }
    Ok(out)
}

fn sort_document(sort: &Sort) -> bson::Document {
    let mut out = bson::Document::new();
    for key in sort.keys() {
        let direction = match key.order {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        };
        out.insert(key.field.clone(), direction);
    }
    out
}

/// Converts a stored BSON document back to JSON with `_id` as a hex string.
fn from_bson_document(mut doc: bson::Document) -> Document {
    let id = match doc.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
        Some(Bson::String(id)) => Some(id),
        Some(other) => Some(other.to_string()),
        None => None,
    };
    let mut out = match Bson::Document(doc).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    };
    if let Some(id) = id {
        out.insert(ID_FIELD.to_string(), Value::String(id));
    }
    out
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn kind(&self) -> &'static str {
        "mongodb"
    }

    fn validate_id(&self, id: &str) -> StoreResult<()> {
        self.object_id(id).map(|_| ())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<Document> {
        let mut stored = to_bson_document(&doc)?;
        stored.insert(ID_FIELD, ObjectId::new());
        stored.insert(VERSION_FIELD, 0i64);

        self.collection(collection).insert_one(&stored).await?;
        Ok(from_bson_document(stored))
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let oid = self.object_id(id)?;
        let found = self
            .collection(collection)
            .find_one(doc! { "_id": oid })
            .await?;
        Ok(found.map(from_bson_document))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let filter = to_bson_filter(filter)?;
        Ok(self.collection(collection).count_documents(filter).await?)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let filter = to_bson_filter(filter)?;
        let sort = sort_document(&options.sort);

        let coll = self.collection(collection);
        let mut find = coll.find(filter).skip(options.skip);
        if !sort.is_empty() {
            find = find.sort(sort);
        }
        if let Some(limit) = options.limit {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let cursor = find.await?;
        let docs: Vec<bson::Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(from_bson_document).collect())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        mut changes: Document,
    ) -> StoreResult<Option<Document>> {
        let oid = self.object_id(id)?;
        changes.remove(ID_FIELD);
        changes.remove(VERSION_FIELD);

        let mut update = doc! { "$inc": { "__v": 1 } };
        if !changes.is_empty() {
            update.insert("$set", to_bson_document(&changes)?);
        }

        let updated = self
            .collection(collection)
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(from_bson_document))
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let oid = self.object_id(id)?;
        let removed = self
            .collection(collection)
            .find_one_and_delete(doc! { "_id": oid })
            .await?;
        Ok(removed.map(from_bson_document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_becomes_equality_document() {
        let filter = Filter::new().eq("name", "Penguin").eq("archived", false);
        let out = to_bson_filter(&filter).unwrap();
        assert_eq!(out.get_str("name").unwrap(), "Penguin");
        assert!(!out.get_bool("archived").unwrap());
    }

    #[test]
    fn id_filter_matches_object_ids() {
        let oid = ObjectId::new();
        let out = to_bson_filter(&Filter::new().eq("id", oid.to_hex())).unwrap();
        assert_eq!(out.get_object_id("_id").unwrap(), oid);
    }

    #[test]
    fn stored_document_exposes_hex_id_and_keeps_version() {
        let oid = ObjectId::new();
        let stored = doc! { "_id": oid, "__v": 2i64, "name": "Penguin" };

        let out = from_bson_document(stored);
        assert_eq!(out.get(ID_FIELD), Some(&json!(oid.to_hex())));
        assert_eq!(out.get(VERSION_FIELD), Some(&json!(2)));
        assert_eq!(out.get("name"), Some(&json!("Penguin")));
    }

    #[test]
    fn string_ids_are_kept_verbatim() {
        let out = from_bson_document(doc! { "_id": "legacy-1" });
        assert_eq!(out.get(ID_FIELD), Some(&json!("legacy-1")));
    }

    #[test]
    fn sort_keys_map_to_directions() {
        let sort = sort_document(&Sort::parse("name:asc,createdAt:desc"));
        let keys: Vec<&String> = sort.keys().collect();
        assert_eq!(keys, ["name", "createdAt"]);
        assert_eq!(sort.get_i32("name").unwrap(), 1);
        assert_eq!(sort.get_i32("createdAt").unwrap(), -1);
    }
}
