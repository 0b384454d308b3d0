//! Loading tables from CSV, JSON and Parquet files.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Date64Array, Float64Array, Int64Array, StringArray,
    TimestampNanosecondArray,
};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use rusty_dashboards::dashboard::supermarket::SupermarketSale;
use rusty_dashboards::data::loader::{self, SchemaError};

const HEADER: &str = "Invoice ID,Branch,City,Customer type,Gender,Product line,Unit price,Quantity,Tax 5%,Total,Date,Time,Payment,cogs,gross margin percentage,gross income,Rating";

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

#[test]
fn loads_csv_and_parses_dates() {
    let csv = format!(
        "{HEADER}\n\
         750-67-8428,A,Yangon,Member,Female,Health and beauty,74.69,7,26.1415,548.9715,1/5/2019,13:08,Ewallet,522.83,4.761904762,26.1415,9.1\n\
         226-31-3081,C,Naypyitaw,Normal,Male,Electronic accessories,15.28,5,3.82,80.22,2019-03-08,10:29,Cash,76.4,4.761904762,3.82,9.6\n"
    );
    let file = temp_file(".csv", &csv);

    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load csv");
    assert_eq!(table.len(), 2);
    let first = &table.records()[0];
    assert_eq!(first.invoice_id, "750-67-8428");
    assert_eq!(first.quantity, 7);
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2019, 1, 5));
    assert_eq!(table.records()[1].date, NaiveDate::from_ymd_opt(2019, 3, 8));
}

#[test]
fn invalid_dates_become_null_instead_of_failing() {
    let csv = format!(
        "{HEADER}\n\
         750-67-8428,A,Yangon,Member,Female,Health and beauty,74.69,7,26.1415,548.9715,someday,13:08,Ewallet,522.83,4.761904762,26.1415,9.1\n\
         750-67-8429,A,Yangon,Member,Female,Health and beauty,74.69,7,26.1415,548.9715,,13:08,Ewallet,522.83,4.761904762,26.1415,9.1\n"
    );
    let file = temp_file(".csv", &csv);

    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load csv");
    assert!(table.iter().all(|r| r.date.is_none()));
}

#[test]
fn missing_columns_are_reported_by_name() {
    let file = temp_file(".csv", "Invoice ID,City\n1,Yangon\n");

    let err = loader::load_file::<SupermarketSale>(file.path()).expect_err("schema mismatch");
    let schema = err.downcast_ref::<SchemaError>().expect("schema error in chain");
    let SchemaError::MissingColumns { missing } = schema;
    assert!(missing.contains(&"Total".to_string()));
    assert!(missing.contains(&"Rating".to_string()));
    assert!(!missing.contains(&"City".to_string()));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.csv");
    assert!(loader::load_file::<SupermarketSale>(&path).is_err());
}

#[test]
fn unsupported_extension_is_rejected() {
    let file = temp_file(".xlsx", "");
    let err = loader::load_file::<SupermarketSale>(file.path()).expect_err("bad extension");
    assert!(err.to_string().contains("Unsupported file extension"));
}

#[test]
fn loads_json_records() {
    let json = r#"[
        {"Invoice ID": "750-67-8428", "Branch": "A", "City": "Yangon", "Customer type": "Member",
         "Gender": "Female", "Product line": "Health and beauty", "Unit price": 74.69, "Quantity": 7,
         "Tax 5%": 26.1415, "Total": 548.9715, "Date": "2019-01-05", "Time": "13:08",
         "Payment": "Ewallet", "cogs": 522.83, "gross margin percentage": 4.761904762,
         "gross income": 26.1415, "Rating": 9, "Extra": true}
    ]"#;
    let file = temp_file(".json", json);

    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load json");
    assert_eq!(table.len(), 1);
    assert_eq!(table.records()[0].rating, 9.0);
    assert_eq!(table.records()[0].date, NaiveDate::from_ymd_opt(2019, 1, 5));
}

fn json_row_with_date(date: &str) -> String {
    format!(
        r#"[{{"Invoice ID": "750-67-8428", "Branch": "A", "City": "Yangon", "Customer type": "Member",
             "Gender": "Female", "Product line": "Health and beauty", "Unit price": 74.69, "Quantity": 7,
             "Tax 5%": 26.1415, "Total": 548.9715, "Date": {date}, "Time": "13:08",
             "Payment": "Ewallet", "cogs": 522.83, "gross margin percentage": 4.761904762,
             "gross income": 26.1415, "Rating": 9.1}}]"#
    )
}

#[test]
fn json_epoch_millis_dates_are_read() {
    let file = temp_file(".json", &json_row_with_date("1546646400000"));
    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load json");
    assert_eq!(table.records()[0].date, NaiveDate::from_ymd_opt(2019, 1, 5));
}

#[test]
fn json_dates_of_any_other_shape_become_null() {
    for date in [r#""garbage""#, "null", "true", "[1, 2]", r#"{"d": 1}"#] {
        let file = temp_file(".json", &json_row_with_date(date));
        let table = loader::load_file::<SupermarketSale>(file.path())
            .unwrap_or_else(|e| panic!("Date {date} should load: {e:#}"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].date, None, "Date {date}");
    }
}

#[test]
fn csv_header_whitespace_is_ignored() {
    let header = HEADER.replace(',', ", ");
    let csv = format!(
        "{header}\n\
         750-67-8428,A,Yangon,Member,Female,Health and beauty,74.69,7,26.1415,548.9715,1/5/2019,13:08,Ewallet,522.83,4.761904762,26.1415,9.1\n"
    );
    let file = temp_file(".csv", &csv);

    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load csv");
    assert_eq!(table.records()[0].city, "Yangon");
    assert_eq!(table.records()[0].rating, 9.1);
}

#[test]
fn json_must_be_an_array() {
    let file = temp_file(".json", r#"{"Invoice ID": "x"}"#);
    assert!(loader::load_file::<SupermarketSale>(file.path()).is_err());
}

fn write_parquet(date: ArrayRef) -> NamedTempFile {
    let text = |v: &str| -> ArrayRef { Arc::new(StringArray::from(vec![v])) };
    let float = |v: f64| -> ArrayRef { Arc::new(Float64Array::from(vec![v])) };
    let batch = RecordBatch::try_from_iter(vec![
        ("Invoice ID", text("750-67-8428")),
        ("Branch", text("A")),
        ("City", text("Yangon")),
        ("Customer type", text("Member")),
        ("Gender", text("Female")),
        ("Product line", text("Health and beauty")),
        ("Unit price", float(74.69)),
        ("Quantity", Arc::new(Int64Array::from(vec![7])) as ArrayRef),
        ("Tax 5%", float(26.1415)),
        ("Total", float(548.9715)),
        ("Date", date),
        ("Time", text("13:08")),
        ("Payment", text("Ewallet")),
        ("cogs", float(522.83)),
        ("gross margin percentage", float(4.761904762)),
        ("gross income", float(26.1415)),
        ("Rating", float(9.1)),
    ])
    .expect("record batch");

    let file = tempfile::Builder::new()
        .suffix(".parquet")
        .tempfile()
        .expect("temp file");
    let mut writer =
        ArrowWriter::try_new(file.reopen().expect("reopen"), batch.schema(), None).expect("writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close writer");
    file
}

#[test]
fn loads_parquet_columns() {
    // 2019-01-05 is day 17,901 after the Unix epoch.
    let file = write_parquet(Arc::new(Date32Array::from(vec![17_901])));

    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load parquet");
    assert_eq!(table.len(), 1);
    assert_eq!(table.records()[0].quantity, 7);
    assert_eq!(table.records()[0].date, NaiveDate::from_ymd_opt(2019, 1, 5));
}

#[test]
fn parquet_timestamp_dates_are_read() {
    // pandas writes datetime64 columns as nanosecond timestamps.
    let nanos =
        TimestampNanosecondArray::from(vec![1_546_646_400_000_000_000 + 13 * 3_600_000_000_000]);
    let file = write_parquet(Arc::new(nanos));
    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load parquet");
    assert_eq!(table.records()[0].date, NaiveDate::from_ymd_opt(2019, 1, 5));

    let millis = Date64Array::from(vec![1_546_646_400_000]);
    let file = write_parquet(Arc::new(millis));
    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load parquet");
    assert_eq!(table.records()[0].date, NaiveDate::from_ymd_opt(2019, 1, 5));
}

#[test]
fn parquet_unreadable_dates_become_null() {
    let file = write_parquet(Arc::new(StringArray::from(vec!["someday"])));
    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load parquet");
    assert_eq!(table.records()[0].date, None);

    let file = write_parquet(Arc::new(BooleanArray::from(vec![true])));
    let table = loader::load_file::<SupermarketSale>(file.path()).expect("load parquet");
    assert_eq!(table.records()[0].date, None);
}
