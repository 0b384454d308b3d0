use std::sync::Arc;

use rusty_dashboards::dashboard::ViewModel;
use rusty_dashboards::data::Table;

use crate::color::ColorMap;
use crate::ui::panels::FilterPanel;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState<D: FilterPanel> {
    /// Loaded dataset, read-only for the lifetime of the process
    /// (or until the user opens another file).
    pub table: Arc<Table<D::Record>>,

    /// Choices offered by the filter widgets.
    pub options: D::Options,

    /// Current widget selections.
    pub filters: D::Filters,

    /// Output of the last refresh.
    pub view: ViewModel,

    /// Category colours, stable across filter changes.
    pub colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl<D: FilterPanel> AppState<D> {
    pub fn new(table: Arc<Table<D::Record>>) -> Self {
        let options = D::options(&table);
        let filters = D::default_filters(&options);
        let colors = D::color_map(&options);
        let mut state = Self {
            table,
            options,
            filters,
            view: ViewModel::default(),
            colors,
            status_message: None,
        };
        state.refresh();
        state
    }

    /// Ingest a newly loaded dataset, reinitialise filters and colours.
    pub fn set_table(&mut self, table: Arc<Table<D::Record>>) {
        *self = Self::new(table);
    }

    /// Recompute the view after a filter change.
    pub fn refresh(&mut self) {
        let predicates = D::predicates(&self.filters);
        self.view = D::render(&self.table, &predicates);
    }

    /// Back to "everything selected".
    pub fn reset_filters(&mut self) {
        self.filters = D::default_filters(&self.options);
        self.refresh();
    }
}
