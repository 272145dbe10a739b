use super::FetchModeStrategy;
use crate::error::{ErrorOrigin, InternalError};
use crate::filter::Filter;
use crate::source::{DataSource, PageRequest, PageResponse};

///
/// ParallelFetchMode
///
/// Each page is dispatched to a bounded worker pool; at most `width` fetches
/// run concurrently. `fetch_many`'s callback is invoked in completion order,
/// which may differ from the order of `pages`.
///

pub struct ParallelFetchMode {
    pool: rayon::ThreadPool,
}

impl ParallelFetchMode {
    /// # Errors
    /// Returns `source-failure` if the underlying worker pool cannot be built.
    pub fn new(width: usize) -> Result<Self, InternalError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(width.max(1))
            .build()
            .map_err(|e| InternalError::source_failure(ErrorOrigin::Fetch, e.to_string()))?;
        Ok(Self { pool })
    }
}

impl Default for ParallelFetchMode {
    fn default() -> Self {
        Self::new(crate::DEFAULT_PARALLEL_WIDTH)
            .expect("the default worker pool width always builds")
    }
}

impl<I, T> FetchModeStrategy<I, T> for ParallelFetchMode
where
    I: Send,
    T: Send + Sync,
{
    fn fetch_one(
        &self,
        filter: &Filter<T>,
        page: usize,
        page_size: usize,
        source: &dyn DataSource<I, T>,
    ) -> Result<PageResponse<I, T>, InternalError> {
        let request = PageRequest::new(filter.clone(), page, page_size);
        source.fetch_page(&request)
    }

    fn fetch_many<F>(
        &self,
        filter: &Filter<T>,
        pages: &[usize],
        page_size: usize,
        source: &dyn DataSource<I, T>,
        mut on_response: F,
    ) -> Result<(), InternalError>
    where
        F: FnMut(usize, Result<PageResponse<I, T>, InternalError>),
    {
        let (tx, rx) = std::sync::mpsc::channel();
        self.pool.scope(|scope| {
            for &page in pages {
                let tx = tx.clone();
                let request = PageRequest::new(filter.clone(), page, page_size);
                scope.spawn(move |_| {
                    let result = source.fetch_page(&request);
                    let _ = tx.send((page, result));
                });
            }
        });
        drop(tx);
        for (page, result) in rx {
            on_response(page, result);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl DataSource<u64, String> for CountingSource {
        fn fetch_page(
            &self,
            request: &PageRequest<String>,
        ) -> Result<PageResponse<u64, String>, InternalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PageResponse::new(
                vec![(request.page as u64, "x".into())],
                request.page,
                request.page_size,
                40,
                40,
            ))
        }
    }

    #[test]
    fn fetch_many_visits_every_page_exactly_once() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let strategy = ParallelFetchMode::new(2).unwrap();
        let seen = std::sync::Mutex::new(HashSet::<usize>::new());
        strategy
            .fetch_many(&Filter::<String>::empty(), &[1, 2, 3, 4], 10, &source, |page, result| {
                assert!(result.is_ok());
                seen.lock().unwrap().insert(page);
            })
            .unwrap();
        assert_eq!(seen.into_inner().unwrap(), HashSet::from([1, 2, 3, 4]));
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn default_width_matches_spec() {
        let strategy = ParallelFetchMode::default();
        assert_eq!(strategy.pool.current_num_threads(), crate::DEFAULT_PARALLEL_WIDTH);
    }
}
