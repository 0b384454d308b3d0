//! Dashboards: filter state, predicate building and the view model.
//!
//! `render` is a pure function of the loaded table and the current predicate
//! set. The UI shell calls it again after every filter change.

pub mod cars;
pub mod supermarket;

use serde::de::DeserializeOwned;

use crate::data::{PredicateSet, Record, Table, Value};

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// A labelled, already formatted scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Metric {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Line,
    /// `hole` is the inner radius as a fraction of the outer one (0 = full pie).
    Pie { hole: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(Value, f64)>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(Value, f64)>) -> Self {
        Series {
            name: name.into(),
            points,
        }
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Everything the presentation layer shows for one filter state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub metrics: Vec<Metric>,
    pub charts: Vec<Chart>,
    /// Indices into the table of the rows passing the filters, in source order.
    pub rows: Vec<usize>,
}

impl ViewModel {
    pub fn metric(&self, label: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.value.as_str())
    }

    pub fn chart(&self, title: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.title == title)
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// One dashboard: its record type, widget options and filter state.
pub trait Dashboard {
    type Record: Record + DeserializeOwned;
    /// Choices offered by the input widgets, derived once from the table.
    type Options;
    /// Current widget state.
    type Filters: Clone + PartialEq;

    const TITLE: &'static str;
    const SUBTITLE: &'static str = "";
    /// Whether the table comes from a file the user may swap at runtime.
    const FILE_BACKED: bool = false;

    fn options(table: &Table<Self::Record>) -> Self::Options;

    /// The initial widget state: everything selected, full ranges.
    fn default_filters(options: &Self::Options) -> Self::Filters;

    fn predicates(filters: &Self::Filters) -> PredicateSet;

    fn render(table: &Table<Self::Record>, predicates: &PredicateSet) -> ViewModel;
}

/// Bounds for a range widget; a zero-width range when there is no data.
pub(crate) fn range_or_zero(extent: Option<(f64, f64)>) -> (f64, f64) {
    extent.unwrap_or((0.0, 0.0))
}
