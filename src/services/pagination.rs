//! Fixed-size pagination for post listings.
//!
//! Page numbers are 1-indexed and resolved leniently from the raw query
//! parameter: anything that does not parse as an integer falls back to the
//! first page, and an integer outside the valid range is clamped to the last
//! page (so page 2 of a 13-item listing holds the remaining 3 items, and
//! page 99 shows the same thing). An empty listing still has one empty page.

/// Number of posts per listing page.
pub const PAGE_SIZE: i64 = 10;

/// Computes page boundaries over a known total count.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    total_count: i64,
    per_page: i64,
}

impl Paginator {
    pub fn new(total_count: i64, per_page: i64) -> Self {
        Self {
            total_count: total_count.max(0),
            per_page: per_page.max(1),
        }
    }

    pub fn num_pages(&self) -> i64 {
        if self.total_count == 0 {
            1
        } else {
            (self.total_count + self.per_page - 1) / self.per_page
        }
    }

    /// Resolve the raw `?page=` value to a valid page number.
    pub fn resolve(&self, raw: Option<&str>) -> i64 {
        match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
            None => 1,
            Some(n) if n >= 1 && n <= self.num_pages() => n,
            Some(_) => self.num_pages(),
        }
    }

    /// Offset of the first item on `page`. `page` must already be resolved.
    pub fn offset(&self, page: i64) -> i64 {
        (page - 1) * self.per_page
    }
}

/// One slice of a sorted listing plus the metadata templates need to draw
/// pagination controls.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> i64 {
        self.number - 1
    }

    pub fn next_page_number(&self) -> i64 {
        self.number + 1
    }
}
