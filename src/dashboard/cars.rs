//! Car sales dashboard over a small inline dataset.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{range_or_zero, Chart, ChartKind, Dashboard, Metric, Series, ViewModel};
use crate::data::aggregate::{self, AggOp, SeriesOrder};
use crate::data::filter::filtered_indices;
use crate::data::{Column, ColumnKind, PredicateSet, Record, Rule, Table, Value};
use crate::format;

/// Column names.
pub mod col {
    pub const BRAND: &str = "Merek";
    pub const MODEL: &str = "Model";
    pub const YEAR: &str = "Tahun";
    pub const PRICE: &str = "Harga";
    pub const SOLD: &str = "Terjual";
}

pub const TOTAL_SOLD: &str = "Total Unit Terjual";
pub const AVERAGE_PRICE: &str = "Rata-rata Harga";
pub const BEST_SELLER: &str = "Mobil Terlaris";

pub const SOLD_PER_BRAND: &str = "Jumlah Terjual per Merek";
pub const YEARLY_TREND: &str = "Tren Penjualan per Tahun";
pub const MARKET_SHARE: &str = "Market Share";

/// Price slider step.
pub const PRICE_STEP: f64 = 10_000_000.0;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSale {
    #[serde(rename = "Merek")]
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Tahun")]
    pub year: i64,
    #[serde(rename = "Harga")]
    pub price: i64,
    #[serde(rename = "Terjual")]
    pub sold: i64,
}

const COLUMNS: &[Column] = &[
    Column::new(col::BRAND, ColumnKind::Text),
    Column::new(col::MODEL, ColumnKind::Text),
    Column::new(col::YEAR, ColumnKind::Integer),
    Column::new(col::PRICE, ColumnKind::Integer),
    Column::new(col::SOLD, ColumnKind::Integer),
];

impl Record for CarSale {
    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn value(&self, column: &str) -> Option<Value> {
        match column {
            col::BRAND => Some(Value::from(self.brand.as_str())),
            col::MODEL => Some(Value::from(self.model.as_str())),
            col::YEAR => Some(Value::Integer(self.year)),
            col::PRICE => Some(Value::Integer(self.price)),
            col::SOLD => Some(Value::Integer(self.sold)),
            _ => None,
        }
    }
}

impl CarSale {
    pub fn new(brand: &str, model: &str, year: i64, price: i64, sold: i64) -> Self {
        CarSale {
            brand: brand.to_string(),
            model: model.to_string(),
            year,
            price,
            sold,
        }
    }
}

/// The built-in dataset.
pub fn load() -> Table<CarSale> {
    Table::new(vec![
        CarSale::new("Toyota", "Avanza", 2021, 220_000_000, 120),
        CarSale::new("Honda", "Civic", 2021, 350_000_000, 80),
        CarSale::new("Suzuki", "Ertiga", 2021, 200_000_000, 60),
        CarSale::new("Mitsubishi", "Xpander", 2021, 280_000_000, 70),
        CarSale::new("Toyota", "Fortuner", 2022, 500_000_000, 90),
        CarSale::new("Honda", "HR-V", 2022, 400_000_000, 75),
        CarSale::new("Suzuki", "Baleno", 2022, 250_000_000, 55),
        CarSale::new("Mitsubishi", "Pajero", 2022, 600_000_000, 65),
    ])
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CarOptions {
    pub brands: Vec<Value>,
    pub years: Vec<Value>,
    /// Full price extent, the slider bounds.
    pub price: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarFilters {
    pub brands: BTreeSet<Value>,
    pub years: BTreeSet<Value>,
    /// Inclusive `(low, high)`.
    pub price: (f64, f64),
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct CarSales;

impl Dashboard for CarSales {
    type Record = CarSale;
    type Options = CarOptions;
    type Filters = CarFilters;

    const TITLE: &'static str = "Dashboard Penjualan Mobil";
    const SUBTITLE: &'static str =
        "Project ini menampilkan data penjualan mobil dengan visualisasi interaktif.";

    fn options(table: &Table<CarSale>) -> CarOptions {
        let rows = table.rows();
        CarOptions {
            brands: aggregate::unique_values(&rows, col::BRAND),
            years: aggregate::unique_values(&rows, col::YEAR),
            price: range_or_zero(aggregate::extent(&rows, col::PRICE)),
        }
    }

    fn default_filters(options: &CarOptions) -> CarFilters {
        CarFilters {
            brands: options.brands.iter().cloned().collect(),
            years: options.years.iter().cloned().collect(),
            price: options.price,
        }
    }

    fn predicates(filters: &CarFilters) -> PredicateSet {
        PredicateSet::new()
            .with(col::BRAND, Rule::OneOf(filters.brands.clone()))
            .with(col::YEAR, Rule::OneOf(filters.years.clone()))
            .with(col::PRICE, Rule::between(filters.price.0, filters.price.1))
    }

    fn render(table: &Table<CarSale>, predicates: &PredicateSet) -> ViewModel {
        let indices = filtered_indices(table.records(), predicates);
        let rows: Vec<&CarSale> = indices.iter().map(|&i| &table.records()[i]).collect();
        log::debug!("{} of {} cars visible", rows.len(), table.len());

        let metrics = vec![
            Metric::new(
                TOTAL_SOLD,
                format::thousands(aggregate::sum(&rows, col::SOLD), 0),
            ),
            Metric::new(
                AVERAGE_PRICE,
                format::or_placeholder(aggregate::mean(&rows, col::PRICE), format::rupiah),
            ),
            Metric::new(
                BEST_SELLER,
                aggregate::arg_max_label(&rows, col::SOLD, col::MODEL),
            ),
        ];

        let per_brand = aggregate::group_aggregate(
            &rows,
            col::BRAND,
            col::SOLD,
            AggOp::Sum,
            SeriesOrder::FirstSeen,
        );

        let yearly: Vec<Series> = aggregate::partition(&rows, col::BRAND)
            .into_iter()
            .map(|(brand, members)| {
                let points = aggregate::group_aggregate(
                    &members,
                    col::YEAR,
                    col::SOLD,
                    AggOp::Sum,
                    SeriesOrder::ByKey,
                );
                Series::new(brand.to_string(), points)
            })
            .collect();

        let charts = vec![
            Chart {
                title: SOLD_PER_BRAND.to_string(),
                kind: ChartKind::Bar,
                x_label: col::BRAND.to_string(),
                y_label: col::SOLD.to_string(),
                series: vec![Series::new(col::SOLD, per_brand.clone())],
            },
            Chart {
                title: YEARLY_TREND.to_string(),
                kind: ChartKind::Line,
                x_label: col::YEAR.to_string(),
                y_label: col::SOLD.to_string(),
                series: yearly,
            },
            Chart {
                title: MARKET_SHARE.to_string(),
                kind: ChartKind::Pie { hole: 0.0 },
                x_label: col::BRAND.to_string(),
                y_label: col::SOLD.to_string(),
                series: vec![Series::new(col::SOLD, per_brand)],
            },
        ];

        ViewModel {
            metrics,
            charts,
            rows: indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with(filters: &CarFilters) -> ViewModel {
        CarSales::render(&load(), &CarSales::predicates(filters))
    }

    fn defaults() -> CarFilters {
        CarSales::default_filters(&CarSales::options(&load()))
    }

    #[test]
    fn options_follow_source_order() {
        let options = CarSales::options(&load());
        assert_eq!(
            options.brands,
            vec![
                Value::from("Toyota"),
                Value::from("Honda"),
                Value::from("Suzuki"),
                Value::from("Mitsubishi"),
            ]
        );
        assert_eq!(options.years, vec![Value::Integer(2021), Value::Integer(2022)]);
        assert_eq!(options.price, (200_000_000.0, 600_000_000.0));
    }

    #[test]
    fn default_filters_show_everything() {
        let view = render_with(&defaults());
        assert_eq!(view.rows, (0..8).collect::<Vec<_>>());
        assert_eq!(view.metric(TOTAL_SOLD), Some("615"));
        assert_eq!(view.metric(AVERAGE_PRICE), Some("Rp 350,000,000"));
        assert_eq!(view.metric(BEST_SELLER), Some("Avanza"));
    }

    #[test]
    fn two_row_table_filtered_to_toyota() {
        let table = Table::new(vec![
            CarSale::new("Toyota", "Avanza", 2021, 220_000_000, 120),
            CarSale::new("Honda", "Civic", 2021, 350_000_000, 80),
        ]);
        let predicates = PredicateSet::new().with(col::BRAND, Rule::one_of(["Toyota"]));
        let view = CarSales::render(&table, &predicates);
        assert_eq!(view.rows, vec![0]);
        assert_eq!(view.metric(TOTAL_SOLD), Some("120"));
        assert_eq!(view.metric(BEST_SELLER), Some("Avanza"));
    }

    #[test]
    fn single_point_price_range_selects_fortuner() {
        let mut filters = defaults();
        filters.price = (500_000_000.0, 500_000_000.0);
        let view = render_with(&filters);
        assert_eq!(view.rows, vec![4]);
        assert_eq!(load().records()[4].model, "Fortuner");
    }

    #[test]
    fn empty_selection_renders_placeholders() {
        let mut filters = defaults();
        filters.brands.clear();
        let view = render_with(&filters);
        assert!(view.rows.is_empty());
        assert_eq!(view.metric(TOTAL_SOLD), Some("0"));
        assert_eq!(view.metric(AVERAGE_PRICE), Some(format::NOT_AVAILABLE));
        assert_eq!(view.metric(BEST_SELLER), Some(aggregate::PLACEHOLDER));
        assert!(view.charts.iter().all(Chart::is_empty));
    }

    #[test]
    fn charts_aggregate_units_by_brand_and_year() {
        let mut filters = defaults();
        filters.years = [Value::Integer(2022)].into_iter().collect();
        let view = render_with(&filters);

        let bar = view.chart(SOLD_PER_BRAND).expect("bar chart");
        assert_eq!(
            bar.series[0].points,
            vec![
                (Value::from("Toyota"), 90.0),
                (Value::from("Honda"), 75.0),
                (Value::from("Suzuki"), 55.0),
                (Value::from("Mitsubishi"), 65.0),
            ]
        );

        let line = view.chart(YEARLY_TREND).expect("line chart");
        assert_eq!(line.series.len(), 4);
        assert_eq!(line.series[0].name, "Toyota");
        assert_eq!(line.series[0].points, vec![(Value::Integer(2022), 90.0)]);

        let pie = view.chart(MARKET_SHARE).expect("pie chart");
        assert_eq!(pie.series[0].total(), 285.0);
    }
}
