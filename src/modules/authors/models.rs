use catalog_db::{Filter, QueryOptions, Schema};
use garde::Validate;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::serde_trim::{trimmed, trimmed_opt};

/// Catalog author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Schema for Author {
    const COLLECTION: &'static str = "authors";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAuthor {
    #[garde(length(min = 1))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAuthor {
    #[garde(length(min = 1))]
    #[serde(
        default,
        deserialize_with = "trimmed_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
}

/// `GET /authors` query string.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthorListQuery {
    #[garde(skip)]
    pub name: Option<String>,
    #[garde(skip)]
    pub sort_by: Option<String>,
    #[garde(range(min = 1))]
    pub limit: Option<u64>,
    #[garde(range(min = 1))]
    pub page: Option<u64>,
}

impl AuthorListQuery {
    pub fn into_parts(self) -> (Filter, QueryOptions) {
        let filter = Filter::new().eq_opt("name", self.name);
        let options = QueryOptions {
            sort_by: self.sort_by,
            limit: self.limit,
            page: self.page,
        };
        (filter, options)
    }
}
