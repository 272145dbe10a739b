//! Prefetch strategy: chooses which pages to load around a requested page.

use crate::error::{ErrorOrigin, InternalError};

///
/// PrefetchStrategy
///
/// Given the requested page, the pages already fully cached, and the total
/// page count, returns the pages that should be loaded. Implementations must
/// only return pages in `[1, total_pages]` that are not already cached, in
/// ascending order.
///

pub trait PrefetchStrategy: Send + Sync {
    /// # Errors
    /// Returns `invalid-argument` if `requested_page` or `total_pages` is
    /// out of range.
    fn pages_to_fetch(
        &self,
        requested_page: usize,
        already_cached: &[usize],
        total_pages: usize,
    ) -> Result<Vec<usize>, InternalError>;
}

fn validate(requested_page: usize, total_pages: usize) -> Result<(), InternalError> {
    if total_pages == 0 {
        return Err(InternalError::invalid_argument(
            ErrorOrigin::Prefetch,
            "total_pages must be >= 1",
        ));
    }
    if requested_page < 1 || requested_page > total_pages {
        return Err(InternalError::invalid_argument(
            ErrorOrigin::Prefetch,
            format!("requested_page {requested_page} is outside [1, {total_pages}]"),
        ));
    }
    Ok(())
}

fn window_minus_cached(
    start: usize,
    end: usize,
    already_cached: &[usize],
) -> Vec<usize> {
    (start..=end)
        .filter(|page| !already_cached.contains(page))
        .collect()
}

///
/// AroundRequested
///
/// Prefetches a window `[requested - before, requested + after]` clamped to
/// `[1, total_pages]`, minus pages already cached.
///

pub struct AroundRequested {
    before: usize,
    after: usize,
}

impl AroundRequested {
    #[must_use]
    pub const fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }
}

/// `AroundRequested(1, 1)`: the canonical default prefetch window.
#[must_use]
pub const fn immediate_around() -> AroundRequested {
    AroundRequested::new(1, 1)
}

impl Default for AroundRequested {
    fn default() -> Self {
        immediate_around()
    }
}

impl PrefetchStrategy for AroundRequested {
    fn pages_to_fetch(
        &self,
        requested_page: usize,
        already_cached: &[usize],
        total_pages: usize,
    ) -> Result<Vec<usize>, InternalError> {
        validate(requested_page, total_pages)?;
        let start = requested_page.saturating_sub(self.before).max(1);
        let end = (requested_page + self.after).min(total_pages);
        Ok(window_minus_cached(start, end, already_cached))
    }
}

///
/// HeadOnly
///
/// Always prefetches the first `count` pages not already cached, regardless
/// of which page was requested. Useful when locality is unknown.
///

pub struct HeadOnly {
    count: usize,
}

impl HeadOnly {
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { count }
    }
}

impl PrefetchStrategy for HeadOnly {
    fn pages_to_fetch(
        &self,
        requested_page: usize,
        already_cached: &[usize],
        total_pages: usize,
    ) -> Result<Vec<usize>, InternalError> {
        validate(requested_page, total_pages)?;
        let end = self.count.min(total_pages).max(1);
        Ok(window_minus_cached(1, end, already_cached))
    }
}

///
/// NoPrefetch
///
/// Never prefetches anything beyond the requested page itself.
///

pub struct NoPrefetch;

impl PrefetchStrategy for NoPrefetch {
    fn pages_to_fetch(
        &self,
        requested_page: usize,
        _already_cached: &[usize],
        total_pages: usize,
    ) -> Result<Vec<usize>, InternalError> {
        validate(requested_page, total_pages)?;
        Ok(Vec::new())
    }
}
