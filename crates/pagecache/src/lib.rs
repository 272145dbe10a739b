//! # pagecache
//!
//! `pagecache` is the **public facade crate** for the dataset cache runtime.
//! It is the recommended dependency for applications that sit a client in
//! front of a paging data source.
//!
//! This crate exposes:
//! - the stable runtime surface (filter algebra, dataset manager, snapshots),
//! - a public `Error` type with a stable class + origin taxonomy,
//! - and a `prelude` module bringing the whole domain vocabulary into scope.
//!
//! Low-level execution internals live in `pagecache-core` and are re-exported
//! here unchanged; this crate adds no behaviour of its own beyond the public
//! error mapping.
//!
//! ## Crate layout
//!
//! - `error`
//!   Public error type and taxonomy, converted `From` the core crate's
//!   internal error.
//!
//! ## Prelude
//!
//! - `prelude`
//!   Glob-importable vocabulary: filter algebra, dataset manager, prefetch
//!   and fetch-mode strategies, snapshots, and the `Value` type.

pub use pagecache_core::{fetch, filter, manager, page, prefetch, snapshot, source, store, value};

pub mod error;
pub use error::Error;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///
/// Opinionated runtime prelude for applications wiring up a cache in front
/// of their own data source. Intended to be glob-imported.
///

pub mod prelude {
    pub use crate::Error;
    pub use pagecache_core::{
        fetch::{FetchModeStrategy, ParallelFetchMode, SimpleFetchMode},
        filter::{FieldBinding, FieldFilter, Filter, FilterBuilder, Resolver, ResolverRegistry},
        manager::{DatasetManager, DatasetManagerBuilder, HandleIndex},
        page::FilterPageMap,
        prefetch::{AroundRequested, HeadOnly, NoPrefetch, PrefetchStrategy},
        snapshot::{DatasetManagerSnapshot, EntityStoreSnapshot, FilterPageMapSnapshot},
        source::{DataSource, PageRequest, PageResponse},
        store::{EntityStore, Progress},
        value::Value,
    };
    pub use ulid::Ulid;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use pagecache_core::error::InternalError;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: u64,
        label: String,
    }

    struct StaticSource;

    impl DataSource<u64, Item> for StaticSource {
        fn fetch_page(
            &self,
            request: &PageRequest<Item>,
        ) -> Result<PageResponse<u64, Item>, InternalError> {
            if request.page != 1 {
                return Ok(PageResponse::new(Vec::new(), request.page, request.page_size, 1, 1));
            }
            let items = vec![(1, Item { id: 1, label: "a".into() })];
            Ok(PageResponse::new(items, request.page, request.page_size, 1, 1))
        }
    }

    #[test]
    fn public_surface_builds_and_queries_a_manager() {
        let manager = DatasetManager::builder(StaticSource)
            .prefetch_strategy(NoPrefetch)
            .build();
        let filter = Filter::<Item>::empty();
        let page = manager.get_data(&filter, 1, 10).unwrap();
        assert_eq!(page, vec![Item { id: 1, label: "a".into() }]);
    }

    #[test]
    fn invalid_argument_converts_into_the_public_error_type() {
        let manager = DatasetManager::builder(StaticSource)
            .prefetch_strategy(NoPrefetch)
            .build();
        let filter = Filter::<Item>::empty();
        let internal_err = manager.get_data(&filter, 0, 10).unwrap_err();
        let err: Error = internal_err.into();
        assert_eq!(err.class, error::ErrorClass::InvalidArgument);
    }
}
