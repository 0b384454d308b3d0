//! End-to-end checks of the filter-and-aggregate pipeline on both dashboards.

use std::path::PathBuf;

use rusty_dashboards::dashboard::cars::{self, CarSales};
use rusty_dashboards::dashboard::supermarket::{self, SupermarketSale, SupermarketSales};
use rusty_dashboards::dashboard::Dashboard;
use rusty_dashboards::data::aggregate::{self, AggOp, SeriesOrder};
use rusty_dashboards::data::filter::filter;
use rusty_dashboards::data::{loader, PredicateSet, Rule, Selection, Table, Value};
use rusty_dashboards::format;

fn sample_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/supermarket_sales.csv")
}

fn supermarket() -> Table<SupermarketSale> {
    loader::load_file(&sample_csv()).expect("sample data loads")
}

#[test]
fn all_selected_filters_keep_every_car() {
    let table = cars::load();
    let filters = CarSales::default_filters(&CarSales::options(&table));
    let rows = filter(&table, &CarSales::predicates(&filters));
    assert_eq!(rows.len(), table.len());
    assert!(rows.iter().zip(table.iter()).all(|(a, b)| std::ptr::eq(*a, b)));
}

#[test]
fn filtering_twice_changes_nothing() {
    let table = supermarket();
    let mut filters = SupermarketSales::default_filters(&SupermarketSales::options(&table));
    filters.gender = Selection::Only(Value::from("Female"));

    let predicates = SupermarketSales::predicates(&filters);
    let once = filter(&table, &predicates);
    let twice = filter(once.iter().copied(), &predicates);
    assert_eq!(once, twice);
}

#[test]
fn adding_a_predicate_only_narrows() {
    let table = cars::load();
    let base = PredicateSet::new().with(cars::col::YEAR, Rule::one_of([Value::Integer(2022)]));
    let narrower = base
        .clone()
        .with(cars::col::PRICE, Rule::between(0.0, 450_000_000.0));

    let wide = filter(&table, &base);
    let narrow = filter(&table, &narrower);
    assert!(narrow.len() <= wide.len());
    assert!(narrow.iter().all(|r| wide.iter().any(|w| std::ptr::eq(*w, *r))));
}

#[test]
fn group_sums_add_up_to_the_total() {
    let table = supermarket();
    let rows = table.rows();
    let grouped = aggregate::group_aggregate(
        &rows,
        supermarket::col::PRODUCT_LINE,
        supermarket::col::TOTAL,
        AggOp::Sum,
        SeriesOrder::FirstSeen,
    );
    let from_groups: f64 = grouped.iter().map(|(_, v)| v).sum();
    let total = aggregate::sum(&rows, supermarket::col::TOTAL);
    assert!((from_groups - total).abs() < 1e-6);
}

#[test]
fn supermarket_defaults_select_first_city() {
    let table = supermarket();
    let options = SupermarketSales::options(&table);
    assert_eq!(options.cities.first(), Some(&Value::from("Yangon")));
    assert_eq!(options.total, (60.816, 772.38));

    let filters = SupermarketSales::default_filters(&options);
    let view = SupermarketSales::render(&table, &SupermarketSales::predicates(&filters));

    assert_eq!(view.rows.len(), 12);
    assert_eq!(view.metric(supermarket::TRANSACTIONS), Some("12"));
    assert_eq!(view.metric(supermarket::TOTAL_SALES), Some("$5,108.52"));
    let rating: f64 = view
        .metric(supermarket::AVERAGE_RATING)
        .and_then(|v| v.parse().ok())
        .expect("numeric rating");
    assert!((rating - 7.025).abs() < 0.01);

    let per_line = view
        .chart(supermarket::AVERAGE_PER_PRODUCT_LINE)
        .expect("product line chart");
    let keys: Vec<String> = per_line.series[0].points.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(
        keys,
        vec![
            "Food and beverages",
            "Electronic accessories",
            "Home and lifestyle",
            "Health and beauty",
            "Sports and travel",
        ]
    );
}

#[test]
fn invoice_search_is_a_substring_match() {
    let table = supermarket();
    let mut filters = SupermarketSales::default_filters(&SupermarketSales::options(&table));
    filters.invoice_search = "-1".to_string();
    let view = SupermarketSales::render(&table, &SupermarketSales::predicates(&filters));

    let ids: Vec<&str> = view
        .rows
        .iter()
        .map(|&i| table.records()[i].invoice_id.as_str())
        .collect();
    assert_eq!(ids, vec!["123-19-1176", "329-62-1586"]);
}

#[test]
fn gender_share_counts_transactions() {
    let table = supermarket();
    let mut filters = SupermarketSales::default_filters(&SupermarketSales::options(&table));
    filters.gender = Selection::Only(Value::from("Female"));
    let view = SupermarketSales::render(&table, &SupermarketSales::predicates(&filters));

    let pie = view.chart(supermarket::GENDER_SHARE).expect("gender chart");
    assert_eq!(pie.series[0].points, vec![(Value::from("Female"), 6.0)]);
}

#[test]
fn empty_result_uses_placeholders_everywhere() {
    let table = supermarket();
    let mut filters = SupermarketSales::default_filters(&SupermarketSales::options(&table));
    filters.payments.clear();
    let view = SupermarketSales::render(&table, &SupermarketSales::predicates(&filters));

    assert!(view.rows.is_empty());
    assert_eq!(view.metric(supermarket::TOTAL_SALES), Some("$0.00"));
    assert_eq!(view.metric(supermarket::AVERAGE_RATING), Some(format::NOT_AVAILABLE));
    assert_eq!(view.metric(supermarket::TRANSACTIONS), Some("0"));
    assert!(view.charts.iter().all(|c| c.is_empty()));
}
