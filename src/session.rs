use crate::filter::ResultSet;
use crate::paginate::{Page, PageState, paginate, total_pages};

/// Per-session scout state: the latest result set and where the user is in it.
#[derive(Debug, Clone, Default)]
pub struct ScoutSession {
    pub results: Option<ResultSet>,
    pub page: PageState,
}

impl ScoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the previous results wholesale and rewinds to the first page.
    pub fn apply_search(&mut self, results: ResultSet) {
        self.results = Some(results);
        self.page.reset();
    }

    pub fn clear(&mut self) {
        self.results = None;
        self.page.reset();
    }

    pub fn result_count(&self) -> usize {
        self.results.as_ref().map_or(0, ResultSet::len)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.result_count(), self.page.size)
    }

    pub fn current_page(&self) -> Page<'_> {
        let rows = self.results.as_ref().map_or(&[][..], ResultSet::rows);
        paginate(rows, self.page.index, self.page.size)
    }

    pub fn next_page(&mut self) {
        let total = self.total_pages();
        self.page.next(total);
    }

    pub fn prev_page(&mut self) {
        self.page.prev();
    }

    pub fn status_line(&self) -> String {
        match &self.results {
            None => "No search yet".to_string(),
            Some(r) if r.is_empty() => "No players match the selected filters".to_string(),
            Some(r) => format!(
                "Found {} players | Page {} of {}",
                r.len(),
                self.page.index + 1,
                self.total_pages()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_search_rewinds_the_page() {
        let mut session = ScoutSession::new();
        session.apply_search(ResultSet::from_rows((0..25).collect()));
        session.next_page();
        session.next_page();
        session.next_page();
        assert_eq!(session.page.index, 2);
        assert_eq!(session.current_page().rows.len(), 5);

        session.apply_search(ResultSet::from_rows(vec![3, 4]));
        assert_eq!(session.page.index, 0);
        assert_eq!(session.status_line(), "Found 2 players | Page 1 of 1");

        session.clear();
        assert!(session.results.is_none());
        assert_eq!(session.total_pages(), 0);
        assert!(session.current_page().rows.is_empty());
    }
}
