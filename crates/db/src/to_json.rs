//! Public shaping of stored documents.

use crate::store::{Document, ID_FIELD, VERSION_FIELD};
pub use crate::store::PUBLIC_ID_FIELD;

/// Strip bookkeeping and private fields from `doc` and expose `_id` as `id`.
pub fn to_json(mut doc: Document, private_fields: &[&str]) -> Document {
    doc.remove(VERSION_FIELD);
    for field in private_fields {
        doc.remove(*field);
    }
    if let Some(id) = doc.remove(ID_FIELD) {
        doc.insert(PUBLIC_ID_FIELD.to_string(), id);
    }
    doc
}
