//! Page-based listing over a collection.

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::store::{Document, DocumentStore, Filter, FindOptions, Sort};

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_PAGE: u64 = 1;

/// Listing options; `page` is 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// `field:asc|desc`, comma-separated for several criteria.
    pub sort_by: Option<String>,
    pub limit: Option<u64>,
    pub page: Option<u64>,
}

impl QueryOptions {
    /// Effective page size; zero or absent falls back to [`DEFAULT_LIMIT`].
    pub fn limit(&self) -> u64 {
        self.limit.filter(|limit| *limit > 0).unwrap_or(DEFAULT_LIMIT)
    }

    pub fn page(&self) -> u64 {
        self.page.filter(|page| *page > 0).unwrap_or(DEFAULT_PAGE)
    }

    pub fn sort(&self) -> Sort {
        self.sort_by.as_deref().map(Sort::parse).unwrap_or_default()
    }

    pub fn skip(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Pagination envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    pub results: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub total_results: u64,
}

impl<T> QueryResult<T> {
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<QueryResult<U>, E> {
        let results = self.results.into_iter().map(f).collect::<Result<_, _>>()?;
        Ok(QueryResult {
            results,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            total_results: self.total_results,
        })
    }
}

pub fn total_pages(total_results: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total_results.div_ceil(limit)
    }
}

/// Count the matches and fetch the requested page as two independent store
/// calls.
pub async fn paginate(
    store: &dyn DocumentStore,
    collection: &str,
    filter: &Filter,
    options: &QueryOptions,
) -> StoreResult<QueryResult<Document>> {
    let limit = options.limit();
    let page = options.page();
    let find_options = FindOptions {
        sort: options.sort(),
        skip: options.skip(),
        limit: Some(limit),
    };

    let (total_results, results) = tokio::try_join!(
        store.count(collection, filter),
        store.find(collection, filter, &find_options),
    )?;

    tracing::debug!(
        collection,
        page,
        limit,
        total_results,
        returned = results.len(),
        "paginated query"
    );

    Ok(QueryResult {
        results,
        page,
        limit,
        total_pages: total_pages(total_results, limit),
        total_results,
    })
}
