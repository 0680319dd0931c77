//! Sliding window of page numbers for the article list.

use std::ops::RangeInclusive;

/// Maximum number of page buttons shown at once.
pub const PAGE_WINDOW: u32 = 9;

/// Pages needed to show `count` items, never less than one.
pub const fn page_count(count: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = count.div_ceil(page_size);
    if pages == 0 {
        1
    } else {
        pages
    }
}

/// Offset of the first item on a 1-indexed `page`.
pub const fn offset_for(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Page numbers to display for `total` pages with `current` selected.
///
/// The window holds at most [`PAGE_WINDOW`] pages, keeps `current` centered
/// where it can, and never leaves `1..=total`.
pub fn page_window(total: u32, current: u32) -> RangeInclusive<u32> {
    let total = total.max(1);
    if total <= PAGE_WINDOW {
        return 1..=total;
    }

    let current = i64::from(current.clamp(1, total));
    let half = i64::from(PAGE_WINDOW / 2);
    let last_start = i64::from(total - PAGE_WINDOW + 1);
    let start = (current - half).min(last_start).max(1);
    let start = u32::try_from(start).unwrap_or(1);
    start..=start + PAGE_WINDOW - 1
}

/// Whatever displays the current page.
pub trait PageView {
    fn set_page(&mut self, page: u32);
    fn scroll_to_top(&mut self);
}

/// Navigation state for a paged list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_pages: u32,
    current: u32,
}

impl Paginator {
    pub fn new(total_pages: u32, current: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            total_pages,
            current: current.clamp(1, total_pages),
        }
    }

    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub const fn current(&self) -> u32 {
        self.current
    }

    pub fn window(&self) -> RangeInclusive<u32> {
        page_window(self.total_pages, self.current)
    }

    /// "Previous" is disabled on the first page.
    pub const fn is_first(&self) -> bool {
        self.current == 1
    }

    /// "Next" is disabled on the last page.
    pub const fn is_last(&self) -> bool {
        self.current == self.total_pages
    }

    /// Move to `target`, clamped into range.
    ///
    /// Returns `false` and leaves `view` untouched when the clamped target is
    /// already the current page.
    pub fn go_to(&mut self, target: i64, view: &mut impl PageView) -> bool {
        let clamped = target.clamp(1, i64::from(self.total_pages));
        let page = u32::try_from(clamped).unwrap_or(1);
        if page == self.current {
            return false;
        }

        self.current = page;
        view.set_page(page);
        view.scroll_to_top();
        true
    }

    pub fn next(&mut self, view: &mut impl PageView) -> bool {
        self.go_to(i64::from(self.current) + 1, view)
    }

    pub fn previous(&mut self, view: &mut impl PageView) -> bool {
        self.go_to(i64::from(self.current) - 1, view)
    }
}
