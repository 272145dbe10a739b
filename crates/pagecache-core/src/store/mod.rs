//! The entity store: identifier-keyed cache of entities plus progress metadata.

mod progress;

pub use progress::Progress;

use std::collections::{BTreeMap, BTreeSet};

///
/// EntityStore
///
/// Global, per-manager cache keyed by stable identifier. Not internally
/// synchronised: callers provide external exclusion if shared across threads.
///

pub struct EntityStore<I, T> {
    dataset: BTreeMap<I, T>,
    empty_ids: BTreeSet<I>,
    progress: Progress<I>,
}

impl<I, T> EntityStore<I, T>
where
    I: Ord + Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            dataset: BTreeMap::new(),
            empty_ids: BTreeSet::new(),
            progress: Progress::default(),
        }
    }

    /// Insert or replace an entity, removing its id from `empty_ids`.
    pub fn put(&mut self, id: I, entity: T) {
        self.empty_ids.remove(&id);
        if self.dataset.insert(id.clone(), entity).is_none() {
            self.progress.observe_insert(&id);
        }
    }

    /// Delete `id` from the dataset and record it as known-empty. Recomputes
    /// `min_id`/`max_id` from the remaining keys if `id` was either bound.
    pub fn remove(&mut self, id: &I) {
        if self.dataset.remove(id).is_some() {
            self.progress.known_count -= 1;
            if self.progress.min_id.as_ref() == Some(id) {
                self.progress.min_id = self.dataset.keys().next().cloned();
            }
            if self.progress.max_id.as_ref() == Some(id) {
                self.progress.max_id = self.dataset.keys().next_back().cloned();
            }
        }
        self.empty_ids.insert(id.clone());
    }

    #[must_use]
    pub fn contains(&self, id: &I) -> bool {
        self.dataset.contains_key(id)
    }

    /// Fetch entities for `ids`, skipping absent or `None` slots.
    #[must_use]
    pub fn get(&self, ids: &[Option<I>]) -> Vec<&T> {
        ids.iter()
            .filter_map(|id| id.as_ref())
            .filter_map(|id| self.dataset.get(id))
            .collect()
    }

    #[must_use]
    pub fn all_values(&self) -> Vec<&T> {
        self.dataset.values().collect()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.dataset.len()
    }

    pub fn clear(&mut self) {
        self.dataset.clear();
        self.empty_ids.clear();
        self.progress = Progress::default();
    }

    #[must_use]
    pub const fn progress(&self) -> &Progress<I> {
        &self.progress
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress.is_complete()
    }

    /// Apply a page of freshly-fetched items: insert genuinely new ids,
    /// update progress, and invoke `on_insert` once per new id. Updates
    /// `expected_total`; a differing value on a later call logs a warning
    /// and overwrites (`progress-drift`, logged rather than raised).
    pub fn update_from_page(
        &mut self,
        items: impl IntoIterator<Item = (I, T)>,
        total: i64,
        mut on_insert: impl FnMut(&I),
    ) {
        let mut any = false;
        for (id, entity) in items {
            any = true;
            self.empty_ids.remove(&id);
            if self.dataset.insert(id.clone(), entity).is_none() {
                self.progress.observe_insert(&id);
                on_insert(&id);
            }
        }
        if !any {
            return;
        }
        self.progress.set_expected_total(total);
    }

    #[must_use]
    pub fn dataset(&self) -> &BTreeMap<I, T> {
        &self.dataset
    }

    #[must_use]
    pub fn empty_ids(&self) -> &BTreeSet<I> {
        &self.empty_ids
    }

    /// Rebuild an `EntityStore` from its raw parts, as used by snapshot
    /// restore.
    #[must_use]
    pub const fn from_parts(
        dataset: BTreeMap<I, T>,
        empty_ids: BTreeSet<I>,
        progress: Progress<I>,
    ) -> Self {
        Self {
            dataset,
            empty_ids,
            progress,
        }
    }
}

impl<I, T> Default for EntityStore<I, T>
where
    I: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_removes_id_from_empty_ids() {
        let mut store: EntityStore<u64, &str> = EntityStore::new();
        store.remove(&1);
        assert!(store.empty_ids().contains(&1));
        store.put(1, "alice");
        assert!(!store.empty_ids().contains(&1));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn dataset_and_empty_ids_stay_disjoint() {
        let mut store: EntityStore<u64, &str> = EntityStore::new();
        store.put(1, "alice");
        store.remove(&1);
        assert!(!store.dataset().contains_key(&1));
        assert!(store.empty_ids().contains(&1));
        assert!(store
            .dataset()
            .keys()
            .collect::<BTreeSet<_>>()
            .is_disjoint(&store.empty_ids().iter().collect()));
    }

    #[test]
    fn known_count_tracks_dataset_len() {
        let mut store: EntityStore<u64, &str> = EntityStore::new();
        store.put(1, "a");
        store.put(2, "b");
        store.put(2, "b-again");
        assert_eq!(store.progress().known_count, store.size() as u64);
        assert_eq!(store.size(), 2);
    }

    #[test]
    fn update_from_page_invokes_on_insert_once_per_new_id() {
        let mut store: EntityStore<u64, &str> = EntityStore::new();
        let mut inserted = Vec::new();
        store.update_from_page(vec![(1, "a"), (2, "b")], 2, |id| inserted.push(*id));
        assert_eq!(inserted, vec![1, 2]);
        inserted.clear();
        // Re-observing id 1 with the same page must not invoke on_insert again.
        store.update_from_page(vec![(1, "a-updated")], 2, |id| inserted.push(*id));
        assert!(inserted.is_empty());
    }

    #[test]
    fn empty_items_is_a_no_op() {
        let mut store: EntityStore<u64, &str> = EntityStore::new();
        store.update_from_page(Vec::new(), 5, |_| panic!("must not be called"));
        assert_eq!(store.progress().expected_total, -1);
    }

    #[test]
    fn remove_recomputes_min_and_max_when_a_bound_is_removed() {
        let mut store: EntityStore<u64, &str> = EntityStore::new();
        store.put(1, "a");
        store.put(2, "b");
        store.put(3, "c");
        assert_eq!(store.progress().min_id, Some(1));
        assert_eq!(store.progress().max_id, Some(3));

        store.remove(&1);
        assert_eq!(store.progress().min_id, Some(2));
        assert_eq!(store.progress().max_id, Some(3));

        store.remove(&3);
        assert_eq!(store.progress().min_id, Some(2));
        assert_eq!(store.progress().max_id, Some(2));

        store.remove(&2);
        assert_eq!(store.progress().min_id, None);
        assert_eq!(store.progress().max_id, None);
    }

    #[test]
    fn is_complete_requires_known_expected_total() {
        let mut store: EntityStore<u64, &str> = EntityStore::new();
        assert!(!store.is_complete());
        store.update_from_page(vec![(1, "a")], 1, |_| {});
        assert!(store.is_complete());
    }
}
