//! Filter-and-aggregate pipeline behind the sales dashboards.
//!
//! Nothing in this crate depends on the UI toolkit: the binary owns the
//! widgets and calls [`dashboard::Dashboard::render`] on every filter change.

pub mod config;
pub mod dashboard;
pub mod data;
pub mod format;
