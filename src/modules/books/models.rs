use catalog_db::{Filter, QueryOptions, Schema};
use garde::Validate;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::serde_trim::{trimmed, trimmed_opt};

/// Book with loose references to its publisher and author.
///
/// The references are plain identifiers; nothing guarantees the publisher
/// or author still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    /// Publisher id
    pub publisher: String,
    /// Author id
    pub author: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Schema for Book {
    const COLLECTION: &'static str = "books";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBook {
    #[garde(length(min = 1))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[garde(length(min = 1))]
    pub publisher: String,
    #[garde(length(min = 1))]
    pub author: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBook {
    #[garde(length(min = 1))]
    #[serde(
        default,
        deserialize_with = "trimmed_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[garde(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[garde(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookListQuery {
    #[garde(skip)]
    pub name: Option<String>,
    #[garde(skip)]
    pub publisher: Option<String>,
    #[garde(skip)]
    pub author: Option<String>,
    #[garde(skip)]
    pub sort_by: Option<String>,
    #[garde(range(min = 1))]
    pub limit: Option<u64>,
    #[garde(range(min = 1))]
    pub page: Option<u64>,
}

impl BookListQuery {
    pub fn into_parts(self) -> (Filter, QueryOptions) {
        let filter = Filter::new()
            .eq_opt("name", self.name)
            .eq_opt("publisher", self.publisher)
            .eq_opt("author", self.author);
        let options = QueryOptions {
            sort_by: self.sort_by,
            limit: self.limit,
            page: self.page,
        };
        (filter, options)
    }
}
