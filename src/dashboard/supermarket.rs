//! Supermarket sales dashboard over a file-backed dataset.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{range_or_zero, Chart, ChartKind, Dashboard, Metric, Series, ViewModel};
use crate::data::aggregate::{self, AggOp, SeriesOrder};
use crate::data::filter::filtered_indices;
use crate::data::loader::lenient_date;
use crate::data::{Column, ColumnKind, PredicateSet, Record, Rule, Selection, Table, Value};
use crate::format;

/// Column names, as found in the CSV header.
pub mod col {
    pub const INVOICE_ID: &str = "Invoice ID";
    pub const BRANCH: &str = "Branch";
    pub const CITY: &str = "City";
    pub const CUSTOMER_TYPE: &str = "Customer type";
    pub const GENDER: &str = "Gender";
    pub const PRODUCT_LINE: &str = "Product line";
    pub const UNIT_PRICE: &str = "Unit price";
    pub const QUANTITY: &str = "Quantity";
    pub const TAX: &str = "Tax 5%";
    pub const TOTAL: &str = "Total";
    pub const DATE: &str = "Date";
    pub const TIME: &str = "Time";
    pub const PAYMENT: &str = "Payment";
    pub const COGS: &str = "cogs";
    pub const GROSS_MARGIN: &str = "gross margin percentage";
    pub const GROSS_INCOME: &str = "gross income";
    pub const RATING: &str = "Rating";
}

pub const TOTAL_SALES: &str = "Total Penjualan";
pub const AVERAGE_RATING: &str = "Rata-rata Rating";
pub const TRANSACTIONS: &str = "Total Transaksi";

pub const AVERAGE_PER_PRODUCT_LINE: &str = "Rata-rata Penjualan per Product Line";
pub const GENDER_SHARE: &str = "Proporsi Gender";
pub const DAILY_TREND: &str = "Tren Penjualan Harian";

/// Label of the gender radio button that disables the gender filter.
pub const ALL_GENDERS: &str = "Semua";

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One invoice line of the supermarket export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupermarketSale {
    #[serde(rename = "Invoice ID")]
    pub invoice_id: String,
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Customer type")]
    pub customer_type: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Product line")]
    pub product_line: String,
    #[serde(rename = "Unit price")]
    pub unit_price: f64,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "Tax 5%")]
    pub tax: f64,
    #[serde(rename = "Total")]
    pub total: f64,
    /// `None` when the source value could not be parsed as a date.
    #[serde(rename = "Date", with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Payment")]
    pub payment: String,
    #[serde(rename = "cogs")]
    pub cogs: f64,
    #[serde(rename = "gross margin percentage")]
    pub gross_margin_percentage: f64,
    #[serde(rename = "gross income")]
    pub gross_income: f64,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

const COLUMNS: &[Column] = &[
    Column::new(col::INVOICE_ID, ColumnKind::Text),
    Column::new(col::BRANCH, ColumnKind::Text),
    Column::new(col::CITY, ColumnKind::Text),
    Column::new(col::CUSTOMER_TYPE, ColumnKind::Text),
    Column::new(col::GENDER, ColumnKind::Text),
    Column::new(col::PRODUCT_LINE, ColumnKind::Text),
    Column::new(col::UNIT_PRICE, ColumnKind::Float),
    Column::new(col::QUANTITY, ColumnKind::Integer),
    Column::new(col::TAX, ColumnKind::Float),
    Column::new(col::TOTAL, ColumnKind::Float),
    Column::new(col::DATE, ColumnKind::Date),
    Column::new(col::TIME, ColumnKind::Text),
    Column::new(col::PAYMENT, ColumnKind::Text),
    Column::new(col::COGS, ColumnKind::Float),
    Column::new(col::GROSS_MARGIN, ColumnKind::Float),
    Column::new(col::GROSS_INCOME, ColumnKind::Float),
    Column::new(col::RATING, ColumnKind::Float),
];

impl Record for SupermarketSale {
    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn value(&self, column: &str) -> Option<Value> {
        let value = match column {
            col::INVOICE_ID => Value::from(self.invoice_id.as_str()),
            col::BRANCH => Value::from(self.branch.as_str()),
            col::CITY => Value::from(self.city.as_str()),
            col::CUSTOMER_TYPE => Value::from(self.customer_type.as_str()),
            col::GENDER => Value::from(self.gender.as_str()),
            col::PRODUCT_LINE => Value::from(self.product_line.as_str()),
            col::UNIT_PRICE => Value::Float(self.unit_price),
            col::QUANTITY => Value::Integer(self.quantity),
            col::TAX => Value::Float(self.tax),
            col::TOTAL => Value::Float(self.total),
            col::DATE => Value::from(self.date),
            col::TIME => Value::from(self.time.as_str()),
            col::PAYMENT => Value::from(self.payment.as_str()),
            col::COGS => Value::Float(self.cogs),
            col::GROSS_MARGIN => Value::Float(self.gross_margin_percentage),
            col::GROSS_INCOME => Value::Float(self.gross_income),
            col::RATING => Value::Float(self.rating),
            _ => return None,
        };
        Some(value)
    }
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SupermarketOptions {
    pub cities: Vec<Value>,
    pub product_lines: Vec<Value>,
    /// Full `Total` extent, the slider bounds.
    pub total: (f64, f64),
    pub genders: Vec<Value>,
    pub payments: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupermarketFilters {
    /// Single-select without an "all" choice; `None` only when there are no cities.
    pub city: Option<Value>,
    pub product_lines: BTreeSet<Value>,
    /// Inclusive `(low, high)`.
    pub total: (f64, f64),
    pub gender: Selection,
    pub payments: BTreeSet<Value>,
    pub invoice_search: String,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct SupermarketSales;

impl Dashboard for SupermarketSales {
    type Record = SupermarketSale;
    type Options = SupermarketOptions;
    type Filters = SupermarketFilters;

    const TITLE: &'static str = "Supermarket Sales Dashboard";
    const SUBTITLE: &'static str =
        "Visualisasi interaktif penjualan supermarket dengan berbagai filter dan grafik.";
    const FILE_BACKED: bool = true;

    fn options(table: &Table<SupermarketSale>) -> SupermarketOptions {
        let rows = table.rows();
        SupermarketOptions {
            cities: aggregate::unique_values(&rows, col::CITY),
            product_lines: aggregate::unique_values(&rows, col::PRODUCT_LINE),
            total: range_or_zero(aggregate::extent(&rows, col::TOTAL)),
            genders: aggregate::unique_values(&rows, col::GENDER),
            payments: aggregate::unique_values(&rows, col::PAYMENT),
        }
    }

    fn default_filters(options: &SupermarketOptions) -> SupermarketFilters {
        SupermarketFilters {
            city: options.cities.first().cloned(),
            product_lines: options.product_lines.iter().cloned().collect(),
            total: options.total,
            gender: Selection::All,
            payments: options.payments.iter().cloned().collect(),
            invoice_search: String::new(),
        }
    }

    fn predicates(filters: &SupermarketFilters) -> PredicateSet {
        let city = match &filters.city {
            Some(city) => Rule::Equals(Selection::Only(city.clone())),
            None => Rule::OneOf(BTreeSet::new()),
        };
        PredicateSet::new()
            .with(col::CITY, city)
            .with(col::PRODUCT_LINE, Rule::OneOf(filters.product_lines.clone()))
            .with(col::TOTAL, Rule::between(filters.total.0, filters.total.1))
            .with(col::GENDER, Rule::Equals(filters.gender.clone()))
            .with(col::PAYMENT, Rule::OneOf(filters.payments.clone()))
            .with(col::INVOICE_ID, Rule::Contains(filters.invoice_search.clone()))
    }

    fn render(table: &Table<SupermarketSale>, predicates: &PredicateSet) -> ViewModel {
        let indices = filtered_indices(table.records(), predicates);
        let rows: Vec<&SupermarketSale> = indices.iter().map(|&i| &table.records()[i]).collect();
        log::debug!("{} of {} invoices visible", rows.len(), table.len());

        let metrics = vec![
            Metric::new(TOTAL_SALES, format::dollars(aggregate::sum(&rows, col::TOTAL))),
            Metric::new(
                AVERAGE_RATING,
                format::or_placeholder(aggregate::mean(&rows, col::RATING), |v| {
                    format::fixed(v, 2)
                }),
            ),
            Metric::new(TRANSACTIONS, aggregate::count(&rows).to_string()),
        ];

        let per_product_line = aggregate::group_aggregate(
            &rows,
            col::PRODUCT_LINE,
            col::TOTAL,
            AggOp::Mean,
            SeriesOrder::Ascending,
        );
        let genders: Vec<(Value, f64)> = aggregate::value_counts(&rows, col::GENDER)
            .into_iter()
            .map(|(gender, n)| (gender, n as f64))
            .collect();
        let daily = aggregate::group_aggregate(
            &rows,
            col::DATE,
            col::TOTAL,
            AggOp::Sum,
            SeriesOrder::ByKey,
        );

        let charts = vec![
            Chart {
                title: AVERAGE_PER_PRODUCT_LINE.to_string(),
                kind: ChartKind::HorizontalBar,
                x_label: "Rata-rata Total Penjualan".to_string(),
                y_label: "Product Line".to_string(),
                series: vec![Series::new(col::TOTAL, per_product_line)],
            },
            Chart {
                title: GENDER_SHARE.to_string(),
                kind: ChartKind::Pie { hole: 0.4 },
                x_label: col::GENDER.to_string(),
                y_label: "Transaksi".to_string(),
                series: vec![Series::new(col::GENDER, genders)],
            },
            Chart {
                title: DAILY_TREND.to_string(),
                kind: ChartKind::Line,
                x_label: "Tanggal".to_string(),
                y_label: "Total Penjualan".to_string(),
                series: vec![Series::new(col::TOTAL, daily)],
            },
        ];

        ViewModel {
            metrics,
            charts,
            rows: indices,
        }
    }
}
