//! Gallery pagination and filtering.

use crate::gallery::SavedItem;
use crate::model::Filter;

/// Items shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// A visible gallery entry with its position in the unfiltered gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry<'a> {
    /// Absolute index into the gallery, usable for deletion.
    pub index: usize,
    /// The saved item.
    pub item: &'a SavedItem,
}

/// One computed page of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    /// Entries on this page, in gallery order.
    pub entries: Vec<PageEntry<'a>>,
    /// Page count for the current filter (0 when nothing matches).
    pub total_pages: usize,
}

/// Compute the visible slice for `filter` and the 1-based `page`.
///
/// A page past the end yields no entries rather than an error; [`ViewState`]
/// never asks for one.
#[must_use]
pub fn paginate(items: &[SavedItem], filter: Filter, page: usize, page_size: usize) -> Page<'_> {
    let page_size = page_size.max(1);
    let filtered: Vec<PageEntry<'_>> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| filter.admits(item.kind()))
        .map(|(index, item)| PageEntry { index, item })
        .collect();
    let total_pages = filtered.len().div_ceil(page_size);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    let entries = filtered.into_iter().skip(start).take(page_size).collect();
    Page { entries, total_pages }
}

/// Ephemeral view state: active filter and page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    filter: Filter,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    /// First page of everything.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self { filter: Filter::All, page: 1, page_size: page_size.max(1) }
    }

    /// Active filter.
    #[must_use]
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Current 1-based page.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Compute the current page of `items`.
    #[must_use]
    pub fn visible<'a>(&self, items: &'a [SavedItem]) -> Page<'a> {
        paginate(items, self.filter, self.page, self.page_size)
    }

    /// Change the filter and return to page 1.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Jump to `page`, clamped to the pages that exist for `items`.
    pub fn go_to(&mut self, page: usize, items: &[SavedItem]) {
        self.page = page.clamp(1, self.total_pages(items).max(1));
    }

    /// Advance one page if there is a next page.
    pub fn next_page(&mut self, items: &[SavedItem]) {
        if self.page < self.total_pages(items) {
            self.page += 1;
        }
    }

    /// Go back one page if not on the first.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Pull the page back after items were removed.
    pub fn clamp(&mut self, items: &[SavedItem]) {
        let total = self.total_pages(items);
        if self.page > total {
            self.page = total.max(1);
        }
    }

    fn total_pages(&self, items: &[SavedItem]) -> usize {
        items.iter().filter(|i| self.filter.admits(i.kind())).count().div_ceil(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SymbolKind;
    use crate::ports::RenderedImage;

    fn items(kinds: &[SymbolKind]) -> Vec<SavedItem> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, &k)| SavedItem::new(k, format!("item-{i}"), RenderedImage::png(vec![])))
            .collect()
    }

    fn indices(page: &Page<'_>) -> Vec<usize> {
        page.entries.iter().map(|e| e.index).collect()
    }

    #[test]
    fn last_partial_page() {
        let all = items(&[SymbolKind::Qr; 10]);
        let page = paginate(&all, Filter::All, 3, 4);
        assert_eq!(indices(&page), [8, 9]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let page = paginate(&[], Filter::All, 1, 4);
        assert!(page.entries.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn page_past_end_is_empty() {
        let all = items(&[SymbolKind::Qr; 3]);
        let page = paginate(&all, Filter::All, 5, 4);
        assert!(page.entries.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn filter_keeps_absolute_indices() {
        use SymbolKind::{Barcode, Qr};
        let all = items(&[Qr, Barcode, Qr, Barcode, Barcode]);
        let page = paginate(&all, Filter::Barcode, 1, 2);
        assert_eq!(indices(&page), [1, 3]);
        assert_eq!(page.total_pages, 2);

        let page = paginate(&all, Filter::Barcode, 2, 2);
        assert_eq!(indices(&page), [4]);
        assert_eq!(page.entries[0].item.content(), "item-4");
    }

    #[test]
    fn set_filter_resets_page() {
        let all = items(&[SymbolKind::Qr; 10]);
        let mut view = ViewState::new(4);
        view.go_to(3, &all);
        assert_eq!(view.visible(&all).entries.len(), 2);

        view.set_filter(Filter::Barcode);
        assert_eq!(view.page(), 1);
        assert_eq!(view.filter(), Filter::Barcode);
    }

    #[test]
    fn removal_clamps_page() {
        let mut all = items(&[SymbolKind::Qr; 5]);
        let mut view = ViewState::new(4);
        view.go_to(2, &all);
        assert_eq!(indices(&view.visible(&all)), [4]);

        all.remove(4);
        view.clamp(&all);
        assert_eq!(view.page(), 1);
        assert_eq!(view.visible(&all).total_pages, 1);
    }

    #[test]
    fn clamp_on_empty_goes_to_first_page() {
        let mut all = items(&[SymbolKind::Qr; 5]);
        let mut view = ViewState::new(4);
        view.go_to(2, &all);
        all.clear();
        view.clamp(&all);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn go_to_past_end_lands_on_last_page() {
        let all = items(&[SymbolKind::Qr; 3]);
        let mut view = ViewState::new(4);
        view.go_to(9, &all);
        assert_eq!(view.page(), 1);
        assert_eq!(indices(&view.visible(&all)), [0, 1, 2]);

        let all = items(&[SymbolKind::Qr; 10]);
        view.go_to(7, &all);
        assert_eq!(view.page(), 3);
        view.go_to(0, &all);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn go_to_on_empty_filter_stays_on_first_page() {
        let all = items(&[SymbolKind::Qr; 6]);
        let mut view = ViewState::new(4);
        view.set_filter(Filter::Barcode);
        view.go_to(2, &all);
        assert_eq!(view.page(), 1);
        assert_eq!(view.visible(&all).total_pages, 0);
    }

    #[test]
    fn navigation_stays_in_range() {
        let all = items(&[SymbolKind::Qr; 6]);
        let mut view = ViewState::new(4);
        view.prev_page();
        assert_eq!(view.page(), 1);
        view.next_page(&all);
        assert_eq!(view.page(), 2);
        view.next_page(&all);
        assert_eq!(view.page(), 2);
        view.prev_page();
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let view = ViewState::new(0);
        assert_eq!(view.page_size, 1);
        let all = items(&[SymbolKind::Qr; 3]);
        assert_eq!(view.visible(&all).total_pages, 3);
    }
}
