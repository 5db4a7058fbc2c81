//! Navigation between the index overview and a single index's detail view.

use crate::domain::{SortDirective, SortKey};

/// Which table is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// All indices, searchable.
    Overview,
    /// Instruments belonging to one index code.
    Detail(String),
}

/// Explicit navigation state: the active view plus the sort directive and
/// search term. Only the transition methods below mutate it.
///
/// The search term only filters the overview. It is retained (inert) while a
/// detail view is open and applies again after `back`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    view: View,
    sort: SortDirective,
    search: String,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(SortDirective::default(), String::new())
    }
}

impl Navigation {
    pub fn new(sort: SortDirective, search: String) -> Self {
        Self {
            view: View::Overview,
            sort,
            search,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn sort(&self) -> SortDirective {
        self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// The search term to apply right now (`None` outside the overview).
    pub fn active_search(&self) -> Option<&str> {
        match self.view {
            View::Overview if !self.search.is_empty() => Some(&self.search),
            _ => None,
        }
    }

    pub fn detail_code(&self) -> Option<&str> {
        match &self.view {
            View::Detail(code) => Some(code),
            View::Overview => None,
        }
    }

    /// Open the detail view for `code` and reset the sort to 1W descending.
    ///
    /// Selecting from a detail view re-targets it; no state from the previous
    /// selection survives.
    pub fn select(&mut self, code: &str) {
        self.view = View::Detail(code.to_string());
        self.sort = SortDirective::desc(SortKey::Change1w);
    }

    /// Return to the overview. Returns `false` if already there.
    pub fn back(&mut self) -> bool {
        if self.view == View::Overview {
            return false;
        }
        self.view = View::Overview;
        true
    }

    /// Apply a column-header click.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = self.sort.clicked(key);
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortDirection;

    #[test]
    fn starts_in_overview_with_default_sort() {
        let nav = Navigation::default();
        assert_eq!(nav.view(), &View::Overview);
        assert_eq!(nav.sort(), SortDirective::desc(SortKey::Change1w));
        assert_eq!(nav.search(), "");
        assert_eq!(nav.active_search(), None);
    }

    #[test]
    fn select_resets_sort_but_keeps_search() {
        let mut nav = Navigation::default();
        nav.set_search("bank");
        nav.sort_by(SortKey::Price);
        nav.sort_by(SortKey::Price);
        assert_eq!(nav.sort().direction, SortDirection::Asc);

        nav.select("XBANK");
        assert_eq!(nav.view(), &View::Detail("XBANK".into()));
        assert_eq!(nav.sort(), SortDirective::default());
        assert_eq!(nav.search(), "bank");
        assert_eq!(nav.active_search(), None);
    }

    #[test]
    fn back_restores_overview_and_reactivates_search() {
        let mut nav = Navigation::default();
        nav.set_search("ban");
        nav.select("XBANK");
        assert!(nav.back());
        assert_eq!(nav.view(), &View::Overview);
        assert_eq!(nav.active_search(), Some("ban"));
        assert!(!nav.back());
    }

    #[test]
    fn sorting_works_in_detail_view() {
        let mut nav = Navigation::default();
        nav.select("XUSIN");
        nav.sort_by(SortKey::Change1d);
        assert_eq!(nav.sort(), SortDirective::desc(SortKey::Change1d));
        nav.sort_by(SortKey::Change1d);
        assert_eq!(nav.sort().direction, SortDirection::Asc);
        assert_eq!(nav.detail_code(), Some("XUSIN"));
    }
}
