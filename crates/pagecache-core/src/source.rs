//! The paging data source contract: the boundary between the cache and
//! whatever backs it (a remote API, a canister query, a database).

use crate::error::InternalError;
use crate::filter::Filter;

///
/// PageRequest
///
/// One page of a filtered dataset, addressed by 1-based page number.
///

#[derive(Clone, Debug)]
pub struct PageRequest<T> {
    pub filter: Filter<T>,
    pub page: usize,
    pub page_size: usize,
}

impl<T> PageRequest<T> {
    #[must_use]
    pub const fn new(filter: Filter<T>, page: usize, page_size: usize) -> Self {
        Self {
            filter,
            page,
            page_size,
        }
    }
}

///
/// PageResponse
///
/// What a [`DataSource`] hands back for one [`PageRequest`]: the page's
/// entities, the echoed page coordinates, `total_filtered` (entities
/// matching the filter) and `total_dataset` (entities in the underlying
/// source, unfiltered). Out-of-range pages return an empty item list with
/// correct totals rather than an error.
///

#[derive(Clone, Debug)]
pub struct PageResponse<I, T> {
    pub items: Vec<(I, T)>,
    pub page: usize,
    pub page_size: usize,
    pub total_filtered: i64,
    pub total_dataset: i64,
}

impl<I, T> PageResponse<I, T> {
    #[must_use]
    pub const fn new(
        items: Vec<(I, T)>,
        page: usize,
        page_size: usize,
        total_filtered: i64,
        total_dataset: i64,
    ) -> Self {
        Self {
            items,
            page,
            page_size,
            total_filtered,
            total_dataset,
        }
    }
}

///
/// DataSource
///
/// The paging backend a [`crate::manager::DatasetManager`] sits in front of.
/// Implementations own the actual retrieval: network calls, canister query
/// execution, database reads. A single method, blocking from the caller's
/// perspective; parallelism across pages is the fetch-mode strategy's job,
/// not the source's.
///

pub trait DataSource<I, T>: Send + Sync {
    /// # Errors
    /// Returns `invalid-argument` for a null filter or `page <= 0`, or
    /// `source-failure` if retrieval fails for any other reason.
    fn fetch_page(&self, request: &PageRequest<T>) -> Result<PageResponse<I, T>, InternalError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorOrigin;
    use crate::filter::Filter;

    struct StaticSource;

    impl DataSource<u64, String> for StaticSource {
        fn fetch_page(
            &self,
            request: &PageRequest<String>,
        ) -> Result<PageResponse<u64, String>, InternalError> {
            if request.page == 0 {
                return Err(InternalError::invalid_argument(ErrorOrigin::Fetch, "page must be >= 1"));
            }
            Ok(PageResponse::new(
                vec![(1, "alice".to_string()), (2, "bob".to_string())],
                request.page,
                request.page_size,
                2,
                2,
            ))
        }
    }

    #[test]
    fn fetch_page_returns_items_and_totals() {
        let source = StaticSource;
        let request = PageRequest::new(Filter::<String>::empty(), 1, 20);
        let response = source.fetch_page(&request).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.total_filtered, 2);
        assert_eq!(response.total_dataset, 2);
    }

    #[test]
    fn fetch_page_propagates_source_errors() {
        let source = StaticSource;
        let request = PageRequest::new(Filter::<String>::empty(), 0, 20);
        assert!(source.fetch_page(&request).is_err());
    }
}
