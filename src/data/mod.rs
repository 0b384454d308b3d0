//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  inline rows / .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table<R>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Table<R> │  Vec<R>, fixed schema, source order
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply PredicateSet → filtered rows
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  metrics and grouped series
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;

pub use filter::{PredicateSet, Rule, Selection};
pub use model::{Column, ColumnKind, Record, Table, Value};
