//! Client-side incremental reveal of an already-fetched list.

/// Default number of items revealed per step.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Reveals a fully fetched list one page at a time.
///
/// The whole list is held from the start; [`reveal_next`](Self::reveal_next)
/// only moves the visible window. Nothing is re-fetched per page.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealPager<T> {
    items: Vec<T>,
    revealed: usize,
    page_size: usize,
}

impl<T> Default for RevealPager<T> {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_PAGE_SIZE)
    }
}

impl<T> RevealPager<T> {
    /// Start with the first page visible. A zero page size is treated as 1.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let revealed = page_size.min(items.len());
        Self {
            items,
            revealed,
            page_size,
        }
    }

    /// Items currently shown.
    pub fn visible(&self) -> &[T] {
        &self.items[..self.revealed]
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn has_more(&self) -> bool {
        self.revealed < self.items.len()
    }

    /// Reveal the next page. Returns how many items became visible.
    pub fn reveal_next(&mut self) -> usize {
        let before = self.revealed;
        self.revealed = (self.revealed + self.page_size).min(self.items.len());
        self.revealed - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_25_items_in_pages_of_10() {
        let mut pager = RevealPager::new((0..25).collect::<Vec<_>>(), 10);
        assert_eq!(pager.visible().len(), 10);
        assert!(pager.has_more());

        assert_eq!(pager.reveal_next(), 10);
        assert_eq!(pager.visible().len(), 20);
        assert!(pager.has_more());

        assert_eq!(pager.reveal_next(), 5);
        assert_eq!(pager.visible().len(), 25);
        assert!(!pager.has_more());

        assert_eq!(pager.reveal_next(), 0);
        assert_eq!(pager.visible(), &(0..25).collect::<Vec<_>>()[..]);
    }

    #[test]
    fn test_short_and_empty_lists() {
        let pager = RevealPager::new(vec!["a", "b"], 10);
        assert_eq!(pager.visible(), &["a", "b"]);
        assert!(!pager.has_more());

        let empty: RevealPager<u8> = RevealPager::default();
        assert!(empty.visible().is_empty());
        assert!(!empty.has_more());
    }

    #[test]
    fn test_zero_page_size_still_progresses() {
        let mut pager = RevealPager::new(vec![1, 2, 3], 0);
        assert_eq!(pager.revealed(), 1);
        pager.reveal_next();
        assert_eq!(pager.revealed(), 2);
    }
}
