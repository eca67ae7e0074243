use serde::Serialize;

/// Page window over a result batch. `current_page` is always within `1..=total_pages()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    current_page: u32,
    per_page: usize,
    total: usize,
}

impl Pagination {
    /// `per_page` of zero is treated as one
    pub fn new(requested_page: u32, per_page: usize, total: usize) -> Self {
        let mut window = Self {
            current_page: 1,
            per_page: per_page.max(1),
            total,
        };
        window.go_to(requested_page);
        window
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// ceil(total / per_page), but never less than one so an empty list still has page 1
    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(self.per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Jump to `page`, clamped into range
    pub fn go_to(&mut self, page: u32) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Items of the current page. A short last page is returned as-is.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current_page as usize - 1).saturating_mul(self.per_page);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.per_page).min(items.len());
        &items[start..end]
    }

    /// Page numbers for the pager strip, at most `window` wide and centred on the current page
    pub fn page_numbers(&self, window: u32) -> Vec<u32> {
        let total = self.total_pages();
        let window = window.clamp(1, total);
        let half = window / 2;
        let start = self
            .current_page
            .saturating_sub(half)
            .max(1)
            .min(total - window + 1);
        (start..start + window).collect()
    }
}
