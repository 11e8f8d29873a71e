//! Page-number pagination over published post listings.
//!
//! Bad page arguments never surface as errors: anything that is not an
//! integer resolves to the first page, anything out of range to the last.

use serde::Serialize;

/// Number of posts per listing page.
pub const POSTS_PER_PAGE: u64 = 3;

/// A resolved page position within a result set of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
}

impl PageWindow {
    /// Resolve a raw `page` query argument against `total` items.
    pub fn resolve(requested: Option<&str>, total: u64, per_page: u64) -> Self {
        let per_page = per_page.max(1);
        // An empty listing still has one (empty) page.
        let num_pages = total.div_ceil(per_page).max(1);

        let number = requested.map_or(1, |raw| requested_page(raw, num_pages));

        Self {
            number,
            num_pages,
            per_page,
            total,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

/// Page number for a raw argument. Integers too large for `i64` are still
/// integers, so they land on the last page rather than the first.
fn requested_page(raw: &str, num_pages: u64) -> u64 {
    let raw = raw.trim();
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }

    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => (n as u64).min(num_pages),
        _ => num_pages,
    }
}

/// One page of items plus the metadata needed to render pager links.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            per_page: window.per_page,
            total: window.total,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            total: self.total,
        }
    }
}
