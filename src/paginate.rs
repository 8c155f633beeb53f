pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a> {
    pub rows: &'a [usize],
    pub total_pages: usize,
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Half-open window `[index*size, index*size+size)` clipped to the result bounds.
/// Callers keep `page_index` in range; an out-of-range index yields an empty slice.
pub fn paginate(results: &[usize], page_index: usize, page_size: usize) -> Page<'_> {
    let start = page_index.saturating_mul(page_size).min(results.len());
    let end = start.saturating_add(page_size).min(results.len());
    Page {
        rows: &results[start..end],
        total_pages: total_pages(results.len(), page_size),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub index: usize,
    pub size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

impl PageState {
    pub fn new() -> Self {
        Self {
            index: 0,
            size: PAGE_SIZE,
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self, total_pages: usize) -> bool {
        self.index + 1 >= total_pages
    }

    pub fn next(&mut self, total_pages: usize) {
        if !self.is_last(total_pages) {
            self.index += 1;
        }
    }

    pub fn prev(&mut self) {
        if !self.is_first() {
            self.index -= 1;
        }
    }

    pub fn clamp(&mut self, total_pages: usize) {
        if total_pages == 0 {
            self.index = 0;
        } else if self.index >= total_pages {
            self.index = total_pages - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_holds_the_remainder() {
        let results: Vec<usize> = (0..23).collect();
        let page = paginate(&results, 2, PAGE_SIZE);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows, &[20, 21, 22]);
    }

    #[test]
    fn empty_results_have_no_pages() {
        let page = paginate(&[], 0, PAGE_SIZE);
        assert_eq!(page.total_pages, 0);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn navigation_stops_at_the_boundaries() {
        let mut state = PageState::new();
        state.prev();
        assert_eq!(state.index, 0);
        state.next(2);
        state.next(2);
        assert_eq!(state.index, 1);
        assert!(state.is_last(2));
        state.clamp(0);
        assert_eq!(state.index, 0);
    }
}
