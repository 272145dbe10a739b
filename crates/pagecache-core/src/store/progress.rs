use serde::{Deserialize, Serialize};

///
/// Progress
///
/// Global progress record for an [`super::EntityStore`]: the identifier
/// range observed so far, how many entities are known, and how many the
/// source has reported existing in total (`-1` = unknown).
///

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress<I> {
    pub min_id: Option<I>,
    pub max_id: Option<I>,
    pub known_count: u64,
    pub expected_total: i64,
}

impl<I> Default for Progress<I> {
    fn default() -> Self {
        Self {
            min_id: None,
            max_id: None,
            known_count: 0,
            expected_total: -1,
        }
    }
}

impl<I: Ord + Clone> Progress<I> {
    pub(super) fn observe_insert(&mut self, id: &I) {
        self.known_count += 1;
        match &self.min_id {
            Some(min) if id >= min => {}
            _ => self.min_id = Some(id.clone()),
        }
        match &self.max_id {
            Some(max) if id <= max => {}
            _ => self.max_id = Some(id.clone()),
        }
    }

    pub(super) fn set_expected_total(&mut self, total: i64) {
        if self.expected_total == -1 {
            self.expected_total = total;
        } else if self.expected_total != total {
            log::warn!(
                "expected_total drift: was {}, source now reports {total}",
                self.expected_total
            );
            self.expected_total = total;
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.expected_total != -1 && self.known_count >= self.expected_total as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_insert_tracks_min_and_max() {
        let mut p: Progress<u64> = Progress::default();
        p.observe_insert(&5);
        p.observe_insert(&1);
        p.observe_insert(&9);
        assert_eq!(p.min_id, Some(1));
        assert_eq!(p.max_id, Some(9));
        assert_eq!(p.known_count, 3);
    }

    #[test]
    fn set_expected_total_first_call_sets_it() {
        let mut p: Progress<u64> = Progress::default();
        p.set_expected_total(42);
        assert_eq!(p.expected_total, 42);
    }

    #[test]
    fn set_expected_total_later_drift_overwrites() {
        let mut p: Progress<u64> = Progress::default();
        p.set_expected_total(42);
        p.set_expected_total(50);
        assert_eq!(p.expected_total, 50);
    }
}
