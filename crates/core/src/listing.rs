//! Client-side filtering and pagination over an in-memory record list.
//!
//! [`ListView`] owns the normalized records for one screen together with
//! the search query, the page size and the current page. Every accessor
//! recomputes from those four inputs, so there is no cached slice to go
//! stale. The engine never reorders records.

use serde::Serialize;

use crate::error::CoreError;
use crate::project::ProjectRecord;
use crate::risk::ScoredBug;

// ---------------------------------------------------------------------------
// Page sizes
// ---------------------------------------------------------------------------

/// Page sizes offered by the bug list.
pub const PAGE_SIZE_OPTIONS: &[usize] = &[6, 12];

/// Page size a fresh list starts with.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Check that a page size is one of [`PAGE_SIZE_OPTIONS`].
pub fn validate_page_size(page_size: usize) -> Result<(), CoreError> {
    if PAGE_SIZE_OPTIONS.contains(&page_size) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid page size {}. Must be one of: {:?}",
            page_size, PAGE_SIZE_OPTIONS
        )))
    }
}

// ---------------------------------------------------------------------------
// Searching
// ---------------------------------------------------------------------------

/// Records that can be matched against a search query.
pub trait Searchable {
    /// `needle` is already lower-cased.
    fn matches(&self, needle: &str) -> bool;
}

impl Searchable for ScoredBug {
    fn matches(&self, needle: &str) -> bool {
        self.bug.title.to_lowercase().contains(needle)
    }
}

impl Searchable for ProjectRecord {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Keep the records matching `query`, case-insensitively, in order.
/// The query is used as-is; an empty query keeps everything.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    items.iter().filter(|item| item.matches(&needle)).collect()
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// Number of pages needed for `count` records. Zero when there are none.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// The slice of `items` shown on 1-indexed `page`. Out-of-range pages
/// yield an empty slice.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// The "Showing `start` to `end` of `total` entries" footer, 1-indexed
/// and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// ListView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    query: String,
    page_size: usize,
    page: usize,
}

impl<T> ListView<T> {
    /// A list whose page size is a known-good constant.
    pub(crate) fn fixed(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            page_size: page_size.max(1),
            page: 1,
        }
    }
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self::fixed(DEFAULT_PAGE_SIZE)
    }
}

impl<T: Searchable> ListView<T> {
    /// An empty list with the given page size.
    pub fn new(page_size: usize) -> Result<Self, CoreError> {
        if page_size == 0 {
            return Err(CoreError::Validation("Page size must be positive".into()));
        }
        Ok(Self::fixed(page_size))
    }

    /// Replace the record set. The current page is kept when it still
    /// exists and pulled back to the last page otherwise.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        let last = self.total_pages().max(1);
        if self.page > last {
            self.page = last;
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Change the search query. Always returns to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page size. Always returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), CoreError> {
        if page_size == 0 {
            return Err(CoreError::Validation("Page size must be positive".into()));
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn filtered(&self) -> Vec<&T> {
        filter(&self.items, &self.query)
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_len(), self.page_size)
    }

    /// Records on the current page.
    pub fn visible(&self) -> Vec<&T> {
        let filtered = self.filtered();
        page_slice(&filtered, self.page, self.page_size).to_vec()
    }

    pub fn can_previous(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Move back one page. Returns `false` (and does nothing) on page 1.
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Move forward one page. Returns `false` (and does nothing) on the
    /// last page.
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Jump to a page. Only pages in `1..=total_pages` are accepted.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    /// Footer metadata; `None` when nothing matches the query.
    pub fn range(&self) -> Option<PageRange> {
        let total = self.filtered_len();
        if total == 0 {
            return None;
        }
        let start = (self.page - 1) * self.page_size + 1;
        Some(PageRange {
            start,
            end: (start - 1 + self.page_size).min(total),
            total,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
