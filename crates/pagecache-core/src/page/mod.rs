//! The filter-page map: positional cache of identifiers for one fingerprint.

use crate::error::{ErrorOrigin, InternalError};
use bit_vec::BitVec;

///
/// FilterPageMap
///
/// Fixed-length positional array of identifiers for one filter fingerprint,
/// with per-position and per-page population bitmaps. `total_elements` is
/// immutable after construction: it sizes `id_storage` once, on first
/// observation of the filtered result.
///

pub struct FilterPageMap<I> {
    total_elements: usize,
    id_storage: Vec<Option<I>>,
    populated_positions: BitVec,
    populated_pages: BitVec,
    known_count: usize,
}

impl<I: Clone> FilterPageMap<I> {
    #[must_use]
    pub fn new(total_elements: usize) -> Self {
        Self {
            total_elements,
            id_storage: vec![None; total_elements],
            populated_positions: BitVec::from_elem(total_elements, false),
            populated_pages: BitVec::new(),
            known_count: 0,
        }
    }

    #[must_use]
    pub const fn total_elements(&self) -> usize {
        self.total_elements
    }

    #[must_use]
    pub const fn known_count(&self) -> usize {
        self.known_count
    }

    fn page_window(&self, page: usize, page_size: usize) -> (usize, usize) {
        let start = (page - 1) * page_size;
        let end = (page * page_size).min(self.total_elements);
        if start >= self.total_elements {
            (self.total_elements, self.total_elements)
        } else {
            (start, end)
        }
    }

    fn ensure_pages_capacity(&mut self, page: usize, page_size: usize) {
        let total_pages = self.total_elements.div_ceil(page_size.max(1)).max(1);
        if self.populated_pages.len() < total_pages.max(page) {
            let grow_to = total_pages.max(page);
            let extra = grow_to - self.populated_pages.len();
            self.populated_pages.grow(extra, false);
        }
    }

    /// Returns an immutable copy of the identifiers recorded for `page`.
    /// Out-of-range pages return the empty list. Unfilled slots are `None`.
    #[must_use]
    pub fn get_id_list(&self, page: usize, page_size: usize) -> Vec<Option<I>> {
        if page < 1 {
            return Vec::new();
        }
        let (start, end) = self.page_window(page, page_size);
        self.id_storage[start..end].to_vec()
    }

    /// Write `new_ids` into the slots for `page`, updating the position and
    /// page bitmaps. Empty input is a no-op.
    ///
    /// # Errors
    /// Returns `invalid-argument` if `page < 1`.
    pub fn update_data(
        &mut self,
        new_ids: &[Option<I>],
        page: usize,
        page_size: usize,
    ) -> Result<(), InternalError> {
        if page < 1 {
            return Err(InternalError::invalid_argument(
                ErrorOrigin::PageMap,
                "page must be >= 1",
            ));
        }
        if new_ids.is_empty() {
            return Ok(());
        }
        self.ensure_pages_capacity(page, page_size);

        let (start, end) = self.page_window(page, page_size);
        let window_len = end - start;
        let write_len = new_ids.len().min(window_len);

        for offset in 0..write_len {
            let slot = start + offset;
            if let Some(id) = &new_ids[offset] {
                if !self.populated_positions.get(slot).unwrap_or(false) {
                    self.populated_positions.set(slot, true);
                    self.known_count += 1;
                }
                self.id_storage[slot] = Some(id.clone());
            }
        }

        if window_len > 0
            && write_len == window_len
            && (start..end).all(|i| self.populated_positions.get(i).unwrap_or(false))
        {
            self.populated_pages.set(page - 1, true);
        }

        Ok(())
    }

    /// Per-position check: every slot in the page's window is populated.
    /// Deliberately does not consult `populated_pages`, which can be stale
    /// for a short tail page relative to the page size used to build it.
    #[must_use]
    pub fn is_page_fully_cached(&self, page: usize, page_size: usize) -> bool {
        if page < 1 {
            return false;
        }
        let (start, end) = self.page_window(page, page_size);
        if start >= end {
            return false;
        }
        (start..end).all(|i| self.populated_positions.get(i).unwrap_or(false))
    }

    /// 1-based indices of pages recorded as fully populated.
    #[must_use]
    pub fn pages_already_cached(&self) -> Vec<usize> {
        self.populated_pages
            .iter()
            .enumerate()
            .filter_map(|(idx, bit)| bit.then_some(idx + 1))
            .collect()
    }

    #[must_use]
    pub const fn id_storage(&self) -> &Vec<Option<I>> {
        &self.id_storage
    }

    #[must_use]
    pub const fn populated_positions(&self) -> &BitVec {
        &self.populated_positions
    }

    #[must_use]
    pub const fn populated_pages(&self) -> &BitVec {
        &self.populated_pages
    }

    /// Rebuild a `FilterPageMap` from its raw parts, as used by snapshot
    /// restore. Does not re-derive `known_count`; trusts the snapshot.
    #[must_use]
    pub const fn from_parts(
        total_elements: usize,
        id_storage: Vec<Option<I>>,
        populated_positions: BitVec,
        populated_pages: BitVec,
        known_count: usize,
    ) -> Self {
        Self {
            total_elements,
            id_storage,
            populated_positions,
            populated_pages,
            known_count,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn known_count_tracks_popcount_and_never_exceeds_total(
            total in 1usize..200,
            page_size in 1usize..50,
        ) {
            let mut map: FilterPageMap<u64> = FilterPageMap::new(total);
            let total_pages = total.div_ceil(page_size);
            for page in 1..=total_pages {
                let start = (page - 1) * page_size;
                let end = (page * page_size).min(total);
                let ids: Vec<Option<u64>> = (start..end).map(|i| Some((i + 1) as u64)).collect();
                map.update_data(&ids, page, page_size).unwrap();

                let popcount = map.populated_positions().iter().filter(|bit| *bit).count();
                prop_assert_eq!(map.known_count(), popcount);
                prop_assert!(map.known_count() <= map.total_elements());

                if map.is_page_fully_cached(page, page_size) {
                    prop_assert!((start..end).all(|i| map.populated_positions().get(i).unwrap_or(false)));
                }
            }
        }
    }
}
