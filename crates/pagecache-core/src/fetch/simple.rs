use super::FetchModeStrategy;
use crate::error::InternalError;
use crate::filter::Filter;
use crate::source::{DataSource, PageRequest, PageResponse};

///
/// SimpleFetchMode
///
/// Purely sequential, on the caller's thread. `fetch_many` invokes its
/// callback once per page, in the iteration order of `pages`.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleFetchMode;

impl<I, T> FetchModeStrategy<I, T> for SimpleFetchMode {
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
        for &page in pages {
            let request = PageRequest::new(filter.clone(), page, page_size);
            let result = source.fetch_page(&request);
            on_response(page, result);
        }
        Ok(())
    }
}
