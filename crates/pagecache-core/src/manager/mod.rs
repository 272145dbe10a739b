//! The dataset manager: orchestrates the filter algebra, entity store,
//! filter-page map, prefetch strategy and fetch-mode strategy behind a
//! single `getData` entry point.

pub mod handle;

pub use handle::HandleIndex;

use crate::error::{ErrorOrigin, InternalError};
use crate::fetch::{FetchModeStrategy, SimpleFetchMode};
use crate::filter::Filter;
use crate::page::FilterPageMap;
use crate::prefetch::{AroundRequested, PrefetchStrategy};
use crate::snapshot::{DatasetManagerSnapshot, EntityStoreSnapshot, FilterPageMapSnapshot};
use crate::source::DataSource;
use crate::store::EntityStore;
use std::collections::HashMap;
use std::sync::Mutex;
use ulid::Ulid;

struct ManagerState<I, T> {
    store: EntityStore<I, T>,
    page_maps: HashMap<String, FilterPageMap<I>>,
    handles: Option<HandleIndex<I>>,
}

///
/// DatasetManager
///
/// Orchestrates the filter algebra, entity store, filter-page map, prefetch
/// strategy and fetch-mode strategy behind a single `get_data` entry point.
/// Mutating operations are serialised by one mutex guarding both the entity
/// store and the filter-map registry; the only genuine concurrency is the
/// parallel fetch-mode strategy's worker pool, whose responses are applied
/// back to this state one at a time on the caller's thread.
///

pub struct DatasetManager<I, T, S, F = SimpleFetchMode, P = AroundRequested> {
    state: Mutex<ManagerState<I, T>>,
    source: S,
    fetch_mode: F,
    prefetch: P,
    on_insert: Option<Box<dyn Fn(&I) + Send + Sync>>,
}

impl<I, T, S> DatasetManager<I, T, S, SimpleFetchMode, AroundRequested>
where
    I: Ord + Clone,
    S: DataSource<I, T>,
{
    /// Default manager: entity store + empty filter-map registry +
    /// `ImmediateAround(1, 1)` prefetch + simple (sequential) fetch mode.
    pub fn new(source: S) -> Self {
        DatasetManagerBuilder::new(source).build()
    }

    #[must_use]
    pub fn builder(source: S) -> DatasetManagerBuilder<I, T, S> {
        DatasetManagerBuilder::new(source)
    }
}

impl<I, T, S, F, P> DatasetManager<I, T, S, F, P>
where
    I: Ord + Clone,
    S: DataSource<I, T>,
    F: FetchModeStrategy<I, T>,
    P: PrefetchStrategy,
{
    /// # Errors
    /// Returns `invalid-argument` if `page` or `page_size` is `0`, or
    /// propagates a `source-failure` from fetching the requested page.
    /// Prefetch-page failures are logged, not propagated.
    pub fn get_data(
        &self,
        filter: &Filter<T>,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<T>, InternalError>
    where
        T: Clone,
    {
        if page < 1 || page_size < 1 {
            return Err(InternalError::invalid_argument(
                ErrorOrigin::Manager,
                "page and page_size must both be >= 1",
            ));
        }
        let fingerprint = filter.fingerprint();

        let fully_cached = {
            let state = self.state.lock().expect("manager state poisoned");
            state.page_maps.get(&fingerprint).is_some_and(|map| {
                map.is_page_fully_cached(page, page_size)
                    && map
                        .get_id_list(page, page_size)
                        .iter()
                        .all(|id| id.as_ref().is_some_and(|id| state.store.contains(id)))
            })
        };

        if !fully_cached {
            let response = self.fetch_mode.fetch_one(filter, page, page_size, &self.source)?;
            self.apply_response(&fingerprint, page, page_size, response);
        }

        let (total_pages, already_cached) = {
            let state = self.state.lock().expect("manager state poisoned");
            let map = state
                .page_maps
                .get(&fingerprint)
                .expect("page map is populated by the fetch above");
            let total_pages = map.total_elements().div_ceil(page_size).max(1);
            (total_pages, map.pages_already_cached())
        };

        let prefetch_pages = self.prefetch.pages_to_fetch(page, &already_cached, total_pages)?;

        if !prefetch_pages.is_empty() {
            self.fetch_mode.fetch_many(
                filter,
                &prefetch_pages,
                page_size,
                &self.source,
                |fetched_page, result| match result {
                    Ok(response) => self.apply_response(&fingerprint, fetched_page, page_size, response),
                    Err(err) => log::warn!(
                        "prefetch of page {fetched_page} for fingerprint `{fingerprint}` failed: {}",
                        err.message
                    ),
                },
            )?;
        }

        let state = self.state.lock().expect("manager state poisoned");
        let map = state
            .page_maps
            .get(&fingerprint)
            .expect("page map is populated by the fetch above");
        let ids = map.get_id_list(page, page_size);
        Ok(state.store.get(&ids).into_iter().cloned().collect())
    }

    /// Apply one fetched page to the filter-page map and entity store. The
    /// filter-page map is created, sized from `total_filtered`, on first
    /// observation of `fingerprint`; later drift in `total_filtered` is
    /// logged and does not resize it (`total_elements` is fixed at first
    /// observation).
    fn apply_response(
        &self,
        fingerprint: &str,
        page: usize,
        page_size: usize,
        response: crate::source::PageResponse<I, T>,
    ) {
        let mut state = self.state.lock().expect("manager state poisoned");

        let total_elements = usize::try_from(response.total_filtered.max(0)).unwrap_or(0);
        if let Some(existing) = state.page_maps.get(fingerprint) {
            if existing.total_elements() != total_elements {
                log::warn!(
                    "total_filtered drift for fingerprint `{fingerprint}`: kept {}, source now reports {total_elements}",
                    existing.total_elements()
                );
            }
        }
        let map = state
            .page_maps
            .entry(fingerprint.to_string())
            .or_insert_with(|| FilterPageMap::new(total_elements));

        let ids: Vec<Option<I>> = response.items.iter().map(|(id, _)| Some(id.clone())).collect();
        if let Err(err) = map.update_data(&ids, page, page_size) {
            log::warn!(
                "failed to record fetched page {page} for fingerprint `{fingerprint}`: {}",
                err.message
            );
        }

        if let Some(handles) = state.handles.as_mut() {
            for (id, _) in &response.items {
                handles.allocate(id);
            }
        }

        let on_insert = &self.on_insert;
        state
            .store
            .update_from_page(response.items, response.total_dataset, |id| {
                if let Some(callback) = on_insert {
                    callback(id);
                }
            });
    }

    /// Identifier-level lookup against the entity store; skips absent ids.
    #[must_use]
    pub fn find_by_id(&self, ids: &[I]) -> Vec<T>
    where
        T: Clone,
    {
        let state = self.state.lock().expect("manager state poisoned");
        let wrapped: Vec<Option<I>> = ids.iter().cloned().map(Some).collect();
        state.store.get(&wrapped).into_iter().cloned().collect()
    }

    /// Surrogate-key lookup via the handle index.
    ///
    /// # Errors
    /// Returns `invalid-argument` if handle tracking was not enabled when
    /// this manager was built.
    pub fn find_by_handle(&self, handles: &[Ulid]) -> Result<Vec<T>, InternalError>
    where
        T: Clone,
    {
        let state = self.state.lock().expect("manager state poisoned");
        let handle_index = state.handles.as_ref().ok_or_else(|| {
            InternalError::invalid_argument(
                ErrorOrigin::Manager,
                "handle tracking is not enabled for this manager",
            )
        })?;
        let ids = handle_index.resolve_many(handles);
        let wrapped: Vec<Option<I>> = ids.into_iter().map(Some).collect();
        Ok(state.store.get(&wrapped).into_iter().cloned().collect())
    }

    /// Every entity currently present in the entity store.
    #[must_use]
    pub fn cached_data(&self) -> Vec<T>
    where
        T: Clone,
    {
        let state = self.state.lock().expect("manager state poisoned");
        state.store.all_values().into_iter().cloned().collect()
    }

    /// Capture the complete manager state as a passive, serialisable record.
    #[must_use]
    pub fn snapshot(&self) -> DatasetManagerSnapshot<I, T, Option<HandleIndex<I>>>
    where
        T: Clone,
    {
        let state = self.state.lock().expect("manager state poisoned");
        let entity_store = Some(EntityStoreSnapshot::capture(&state.store));
        let page_maps = state
            .page_maps
            .iter()
            .map(|(fingerprint, map)| (fingerprint.clone(), Some(FilterPageMapSnapshot::capture(map))))
            .collect();
        DatasetManagerSnapshot {
            entity_store,
            page_maps,
            extension: state.handles.clone(),
        }
    }

    /// Rebuild a manager from a snapshot captured by [`Self::snapshot`].
    /// Inverts construction exactly: the restored manager compares equal to
    /// the original under structural equality of all three snapshot parts.
    ///
    /// # Errors
    /// Returns `snapshot-null` if the entity-store part or any filter-page-
    /// map entry is absent.
    pub fn from_snapshot(
        snapshot: DatasetManagerSnapshot<I, T, Option<HandleIndex<I>>>,
        source: S,
        fetch_mode: F,
        prefetch: P,
        on_insert: Option<Box<dyn Fn(&I) + Send + Sync>>,
    ) -> Result<Self, InternalError> {
        let store = EntityStoreSnapshot::restore(snapshot.entity_store)?;
        let page_maps = snapshot
            .page_maps
            .into_iter()
            .map(|(fingerprint, map)| Ok((fingerprint, FilterPageMapSnapshot::restore(map)?)))
            .collect::<Result<HashMap<_, _>, InternalError>>()?;
        Ok(Self {
            state: Mutex::new(ManagerState {
                store,
                page_maps,
                handles: snapshot.extension,
            }),
            source,
            fetch_mode,
            prefetch,
            on_insert,
        })
    }
}

///
/// DatasetManagerBuilder
///
/// Fluent construction of a [`DatasetManager`], letting callers override the
/// prefetch strategy, fetch-mode strategy and handle-allocation policy
/// independently instead of a telescoping constructor.
///

pub struct DatasetManagerBuilder<I, T, S, F = SimpleFetchMode, P = AroundRequested> {
    source: S,
    fetch_mode: F,
    prefetch: P,
    track_handles: bool,
    on_insert: Option<Box<dyn Fn(&I) + Send + Sync>>,
    _entity: std::marker::PhantomData<fn() -> T>,
}

impl<I, T, S> DatasetManagerBuilder<I, T, S, SimpleFetchMode, AroundRequested>
where
    S: DataSource<I, T>,
{
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            fetch_mode: SimpleFetchMode,
            prefetch: AroundRequested::default(),
            track_handles: false,
            on_insert: None,
            _entity: std::marker::PhantomData,
        }
    }
}

impl<I, T, S, F, P> DatasetManagerBuilder<I, T, S, F, P>
where
    S: DataSource<I, T>,
    F: FetchModeStrategy<I, T>,
    P: PrefetchStrategy,
{
    pub fn fetch_mode<F2: FetchModeStrategy<I, T>>(
        self,
        fetch_mode: F2,
    ) -> DatasetManagerBuilder<I, T, S, F2, P> {
        DatasetManagerBuilder {
            source: self.source,
            fetch_mode,
            prefetch: self.prefetch,
            track_handles: self.track_handles,
            on_insert: self.on_insert,
            _entity: std::marker::PhantomData,
        }
    }

    pub fn prefetch_strategy<P2: PrefetchStrategy>(
        self,
        prefetch: P2,
    ) -> DatasetManagerBuilder<I, T, S, F, P2> {
        DatasetManagerBuilder {
            source: self.source,
            fetch_mode: self.fetch_mode,
            prefetch,
            track_handles: self.track_handles,
            on_insert: self.on_insert,
            _entity: std::marker::PhantomData,
        }
    }

    #[must_use]
    pub const fn track_handles(mut self, track: bool) -> Self {
        self.track_handles = track;
        self
    }

    #[must_use]
    pub fn on_insert(mut self, on_insert: impl Fn(&I) + Send + Sync + 'static) -> Self {
        self.on_insert = Some(Box::new(on_insert));
        self
    }

    #[must_use]
    pub fn build(self) -> DatasetManager<I, T, S, F, P>
    where
        I: Ord + Clone,
    {
        DatasetManager {
            state: Mutex::new(ManagerState {
                store: EntityStore::new(),
                page_maps: HashMap::new(),
                handles: self.track_handles.then(HandleIndex::new),
            }),
            source: self.source,
            fetch_mode: self.fetch_mode,
            prefetch: self.prefetch,
            on_insert: self.on_insert,
        }
    }
}
