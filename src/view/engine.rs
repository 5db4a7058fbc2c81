//! The view-state engine: single source of truth for what the table shows.
//!
//! It owns the navigation state and the current datasets, and derives the
//! visible rows on demand. It performs no I/O; data arrives through
//! `on_data_replaced` and every other input is a named transition.

use tracing::{debug, warn};

use crate::domain::{
    Datasets, IndexRecord, InstrumentRecord, RowView, SortDirective, SortKey,
};
use crate::view::membership::members_of;
use crate::view::navigation::{Navigation, View};
use crate::view::projection::project;

/// The view as seen by a front-end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrentView<'a> {
    Overview,
    /// `parent` is `None` when `code` does not resolve in the current indices.
    Detail {
        code: &'a str,
        parent: Option<&'a IndexRecord>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// The code is not in the current index dataset; the detail view is empty.
    UnknownParent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// No detail view was open.
    NoSelection,
    /// The selected index still exists and was re-resolved.
    Kept,
    /// The selected index vanished; the detail view is now empty.
    Cleared,
}

/// Everything a front-end needs to draw the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub columns: &'static [SortKey],
    pub sort: SortDirective,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    nav: Navigation,
    datasets: Datasets,
    selected: Option<IndexRecord>,
}

impl ViewState {
    pub fn new(sort: SortDirective, search: String) -> Self {
        Self {
            nav: Navigation::new(sort, search),
            datasets: Datasets::default(),
            selected: None,
        }
    }

    pub fn sort(&self) -> SortDirective {
        self.nav.sort()
    }

    pub fn search(&self) -> &str {
        self.nav.search()
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    pub fn current_view(&self) -> CurrentView<'_> {
        match self.nav.view() {
            View::Overview => CurrentView::Overview,
            View::Detail(code) => CurrentView::Detail {
                code,
                parent: self.selected.as_ref(),
            },
        }
    }

    /// Ordered, filtered rows for the current view.
    ///
    /// An empty result is a valid state (no matches, or an unknown parent);
    /// telling it apart from "still loading" is the caller's job.
    pub fn visible_rows(&self) -> Vec<RowView> {
        let sort = self.nav.sort();
        match self.nav.view() {
            View::Overview => project(&self.datasets.indices, sort, self.nav.active_search())
                .iter()
                .map(RowView::from)
                .collect(),
            View::Detail(_) => {
                let Some(parent) = &self.selected else {
                    return Vec::new();
                };
                let members = members_of(&self.datasets.instruments, &parent.code);
                project(&members, sort, None)
                    .iter()
                    .map(RowView::from)
                    .collect()
            }
        }
    }

    pub fn table(&self) -> TableModel {
        let columns: &'static [SortKey] = match self.nav.view() {
            View::Overview => &SortKey::INDEX_COLUMNS,
            View::Detail(_) => &SortKey::INSTRUMENT_COLUMNS,
        };
        TableModel {
            columns,
            sort: self.nav.sort(),
            rows: self.visible_rows(),
        }
    }

    pub fn on_select_parent(&mut self, code: &str) -> SelectOutcome {
        self.nav.select(code);
        self.selected = self.resolve(code);
        match self.selected {
            Some(_) => {
                debug!(code, "opened index detail");
                SelectOutcome::Selected
            }
            None => {
                warn!(code, "selected index code is not in the current dataset");
                SelectOutcome::UnknownParent
            }
        }
    }

    pub fn on_back(&mut self) {
        if self.nav.back() {
            self.selected = None;
            debug!("back to index overview");
        }
    }

    pub fn on_sort(&mut self, key: SortKey) {
        self.nav.sort_by(key);
        let sort = self.nav.sort();
        debug!(key = ?sort.key, direction = ?sort.direction, "sort changed");
    }

    /// Update the search term. While a detail view is open the term is stored
    /// but has no effect until the overview is shown again.
    pub fn on_search(&mut self, term: &str) {
        self.nav.set_search(term);
    }

    /// Replace both datasets wholesale; the selected index is re-resolved.
    /// The new datasets carry no timestamp; use `replace` to keep one.
    pub fn on_data_replaced(
        &mut self,
        indices: Vec<IndexRecord>,
        instruments: Vec<InstrumentRecord>,
    ) -> ReplaceOutcome {
        self.replace(Datasets {
            indices,
            instruments,
            as_of: None,
        })
    }

    /// Same as `on_data_replaced`, carrying the dataset timestamp along.
    pub fn replace(&mut self, datasets: Datasets) -> ReplaceOutcome {
        debug!(
            indices = datasets.indices.len(),
            instruments = datasets.instruments.len(),
            "datasets replaced"
        );
        self.datasets = datasets;

        let Some(code) = self.nav.detail_code().map(str::to_string) else {
            self.selected = None;
            return ReplaceOutcome::NoSelection;
        };
        self.selected = self.resolve(&code);
        match self.selected {
            Some(_) => ReplaceOutcome::Kept,
            None => {
                warn!(code = %code, "selected index disappeared after refresh");
                ReplaceOutcome::Cleared
            }
        }
    }

    fn resolve(&self, code: &str) -> Option<IndexRecord> {
        self.datasets
            .indices
            .iter()
            .find(|i| i.code == code)
            .cloned()
    }
}
