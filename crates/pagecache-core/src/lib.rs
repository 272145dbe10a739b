//! Core runtime for pagecache: the entity store, filter algebra, filter-page
//! map, prefetch/fetch-mode strategies, dataset manager, and snapshot types
//! exported via the `prelude`.
#![warn(unreachable_pub)]

extern crate self as pagecache_core;

pub mod error;
pub mod fetch;
pub mod filter;
pub mod manager;
pub mod page;
pub mod prefetch;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod value;

///
/// CONSTANTS
///

/// Default worker-pool width for [`fetch::ParallelFetchMode`].
pub const DEFAULT_PARALLEL_WIDTH: usize = 4;

///
/// Prelude
///
/// Domain vocabulary only: no error or logging internals.
///

pub mod prelude {
    pub use crate::{
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
}
