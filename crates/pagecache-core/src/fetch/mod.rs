//! Fetch-mode strategy: drives page retrieval against a [`DataSource`],
//! sequentially or across a bounded worker pool.

mod parallel;
mod simple;

pub use parallel::ParallelFetchMode;
pub use simple::SimpleFetchMode;

use crate::error::InternalError;
use crate::filter::Filter;
use crate::source::{DataSource, PageResponse};

///
/// FetchModeStrategy
///
/// Drives retrieval of one page or a set of pages against a [`DataSource`].
/// `fetch_many`'s callback is invoked once per page; ordering is guaranteed
/// only by [`SimpleFetchMode`], not by [`ParallelFetchMode`].
///

pub trait FetchModeStrategy<I, T>: Send + Sync {
    /// # Errors
    /// Propagates whatever the source returns for this page.
    fn fetch_one(
        &self,
        filter: &Filter<T>,
        page: usize,
        page_size: usize,
        source: &dyn DataSource<I, T>,
    ) -> Result<PageResponse<I, T>, InternalError>;

    /// # Errors
    /// Returns an error only if dispatch itself fails (e.g. the worker pool
    /// could not be built); per-page source failures are reported through
    /// `on_response`, not as the method's `Err`.
    fn fetch_many<F>(
        &self,
        filter: &Filter<T>,
        pages: &[usize],
        page_size: usize,
        source: &dyn DataSource<I, T>,
        on_response: F,
    ) -> Result<(), InternalError>
    where
        F: FnMut(usize, Result<PageResponse<I, T>, InternalError>);
}
