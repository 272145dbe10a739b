//! Snapshot I/O: passive, serialisable records of the complete cache state.

use crate::error::InternalError;
use crate::page::FilterPageMap;
use crate::store::{EntityStore, Progress};
use bit_vec::BitVec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

///
/// EntityStoreSnapshot
///
/// Passive record of one [`EntityStore`]: the full dataset map, the set of
/// known-empty identifiers, and the progress tuple. Preserves `datasetMap`
/// insertion/sort order (a `BTreeMap` is ordered by `I`) and encodes
/// nullable min/max ids as `Option`.
///

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStoreSnapshot<I: Ord, T> {
    pub dataset: BTreeMap<I, T>,
    pub empty_ids: BTreeSet<I>,
    pub progress: Progress<I>,
}

impl<I: Ord + Clone, T: Clone> EntityStoreSnapshot<I, T> {
    #[must_use]
    pub fn capture(store: &EntityStore<I, T>) -> Self {
        Self {
            dataset: store.dataset().clone(),
            empty_ids: store.empty_ids().clone(),
            progress: store.progress().clone(),
        }
    }

    /// Rebuild the entity store from a captured part. `None` means the
    /// snapshot's `entity_store` part was absent.
    ///
    /// # Errors
    /// Returns `snapshot-null` if `snapshot` is `None`.
    pub fn restore(snapshot: Option<Self>) -> Result<EntityStore<I, T>, InternalError> {
        let snapshot = snapshot.ok_or_else(|| InternalError::snapshot_null("entity_store"))?;
        Ok(EntityStore::from_parts(snapshot.dataset, snapshot.empty_ids, snapshot.progress))
    }
}

///
/// FilterPageMapSnapshot
///
/// Passive record of one [`FilterPageMap`]: `total_elements`, `known_count`,
/// the positional `id_storage`, and both population bitmaps, preserving the
/// exact bit pattern so popcount survives a round trip.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterPageMapSnapshot<I> {
    pub total_elements: usize,
    pub known_count: usize,
    pub id_storage: Vec<Option<I>>,
    pub populated_positions: BitVec,
    pub populated_pages: BitVec,
}

impl<I: Clone> FilterPageMapSnapshot<I> {
    #[must_use]
    pub fn capture(map: &FilterPageMap<I>) -> Self {
        Self {
            total_elements: map.total_elements(),
            known_count: map.known_count(),
            id_storage: map.id_storage().clone(),
            populated_positions: map.populated_positions().clone(),
            populated_pages: map.populated_pages().clone(),
        }
    }

    /// Rebuild a filter-page map from a captured part. `None` means the
    /// snapshot's entry for this fingerprint was absent.
    ///
    /// # Errors
    /// Returns `snapshot-null` if `snapshot` is `None`.
    pub fn restore(snapshot: Option<Self>) -> Result<FilterPageMap<I>, InternalError> {
        let snapshot = snapshot.ok_or_else(|| InternalError::snapshot_null("filter_page_map"))?;
        Ok(FilterPageMap::from_parts(
            snapshot.total_elements,
            snapshot.id_storage,
            snapshot.populated_positions,
            snapshot.populated_pages,
            snapshot.known_count,
        ))
    }
}

///
/// DatasetManagerSnapshot
///
/// Compositional snapshot: `(core, extension)` where `extension` is opaque
/// to the core persistence layer. The core parts are the entity store and
/// the `fingerprint -> filter-page-map` registry; `Ext` carries whatever a
/// manager layers on top, such as a handle index.
///
/// `entity_store` and each `page_maps` entry are `Option`-wrapped so a
/// serialised snapshot that carries an explicit `null` for one of these
/// parts deserialises cleanly instead of failing inside `serde`; restoring
/// such a snapshot then raises `snapshot-null` rather than silently
/// treating the missing part as empty.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetManagerSnapshot<I: Ord, T, Ext> {
    pub entity_store: Option<EntityStoreSnapshot<I, T>>,
    pub page_maps: HashMap<String, Option<FilterPageMapSnapshot<I>>>,
    pub extension: Ext,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{DatasetManager, HandleIndex};
    use crate::error::InternalError;
    use crate::fetch::SimpleFetchMode;
    use crate::filter::Filter;
    use crate::prefetch::NoPrefetch;
    use crate::source::{DataSource, PageRequest, PageResponse};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u64,
        label: String,
    }

    struct FixedSource;

    impl DataSource<u64, Item> for FixedSource {
        fn fetch_page(
            &self,
            request: &PageRequest<Item>,
        ) -> Result<PageResponse<u64, Item>, InternalError> {
            if request.page != 1 {
                return Ok(PageResponse::new(Vec::new(), request.page, request.page_size, 3, 3));
            }
            let items = vec![
                (1, Item { id: 1, label: "a".into() }),
                (2, Item { id: 2, label: "b".into() }),
                (3, Item { id: 3, label: "c".into() }),
            ];
            Ok(PageResponse::new(items, request.page, request.page_size, 3, 3))
        }
    }

    #[test]
    fn s5_snapshot_round_trip_preserves_cache_state() {
        let manager = DatasetManager::builder(FixedSource)
            .prefetch_strategy(NoPrefetch)
            .build();
        let filter = Filter::<Item>::empty();
        manager.get_data(&filter, 1, 10).unwrap();

        let snapshot = manager.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: DatasetManagerSnapshot<u64, Item, Option<HandleIndex<u64>>> =
            serde_json::from_str(&json).unwrap();

        assert_eq!(
            restored.entity_store.as_ref().unwrap().dataset,
            snapshot.entity_store.as_ref().unwrap().dataset
        );
        assert_eq!(restored.page_maps.keys().collect::<Vec<_>>(), snapshot.page_maps.keys().collect::<Vec<_>>());
        for (fingerprint, map) in &snapshot.page_maps {
            let map = map.as_ref().unwrap();
            let other = restored.page_maps[fingerprint].as_ref().unwrap();
            assert_eq!(map.total_elements, other.total_elements);
            assert_eq!(map.known_count, other.known_count);
            assert_eq!(map.id_storage, other.id_storage);
            assert_eq!(map.populated_positions, other.populated_positions);
            assert_eq!(map.populated_pages, other.populated_pages);
        }

        let rebuilt =
            DatasetManager::from_snapshot(restored, FixedSource, SimpleFetchMode, NoPrefetch, None)
                .unwrap();
        assert_eq!(rebuilt.cached_data().len(), 3);
    }

    #[test]
    fn restoring_a_snapshot_missing_its_entity_store_fails_fast() {
        let manager = DatasetManager::builder(FixedSource)
            .prefetch_strategy(NoPrefetch)
            .build();
        let filter = Filter::<Item>::empty();
        manager.get_data(&filter, 1, 10).unwrap();

        let mut snapshot = manager.snapshot();
        snapshot.entity_store = None;

        let err = DatasetManager::from_snapshot(snapshot, FixedSource, SimpleFetchMode, NoPrefetch, None)
            .unwrap_err();
        assert_eq!(err.class, crate::error::ErrorClass::SnapshotNull);
    }

    #[test]
    fn restoring_a_snapshot_with_a_missing_page_map_entry_fails_fast() {
        let manager = DatasetManager::builder(FixedSource)
            .prefetch_strategy(NoPrefetch)
            .build();
        let filter = Filter::<Item>::empty();
        manager.get_data(&filter, 1, 10).unwrap();

        let mut snapshot = manager.snapshot();
        let fingerprint = snapshot.page_maps.keys().next().unwrap().clone();
        snapshot.page_maps.insert(fingerprint, None);

        let err = DatasetManager::from_snapshot(snapshot, FixedSource, SimpleFetchMode, NoPrefetch, None)
            .unwrap_err();
        assert_eq!(err.class, crate::error::ErrorClass::SnapshotNull);
    }

    #[test]
    fn handle_index_survives_a_snapshot_round_trip_when_tracking_is_enabled() {
        let manager = DatasetManager::builder(FixedSource)
            .prefetch_strategy(NoPrefetch)
            .track_handles(true)
            .build();
        let filter = Filter::<Item>::empty();
        manager.get_data(&filter, 1, 10).unwrap();

        let snapshot = manager.snapshot();
        let original_handles = snapshot
            .extension
            .as_ref()
            .expect("handle tracking was enabled")
            .clone();

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: DatasetManagerSnapshot<u64, Item, Option<HandleIndex<u64>>> =
            serde_json::from_str(&json).unwrap();

        let restored_handles = restored
            .extension
            .as_ref()
            .expect("handle tracking survives the round trip")
            .clone();
        assert_eq!(restored_handles.len(), original_handles.len());
        for (handle, id) in original_handles.iter() {
            assert_eq!(restored_handles.resolve(handle), Some(id));
        }

        let rebuilt =
            DatasetManager::from_snapshot(restored, FixedSource, SimpleFetchMode, NoPrefetch, None)
                .unwrap();
        let handle = *original_handles.iter().next().unwrap().0;
        assert_eq!(rebuilt.find_by_handle(&[handle]).unwrap().len(), 1);
    }

    #[test]
    fn entity_store_snapshot_round_trips_through_serde_json() {
        let mut store: EntityStore<u64, Item> = EntityStore::new();
        store.put(1, Item { id: 1, label: "a".into() });
        let snapshot = EntityStoreSnapshot::capture(&store);
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: EntityStoreSnapshot<u64, Item> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
