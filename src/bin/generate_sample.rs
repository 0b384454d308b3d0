//! Write a synthetic supermarket export as CSV and Parquet.
//!
//! usage: generate_sample [OUTPUT_DIR]   (default: data)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use chrono::{Datelike, Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

use rusty_dashboards::dashboard::supermarket::{col, SupermarketSale};

const ROWS: usize = 300;
const BRANCHES: [(&str, &str); 3] = [("A", "Yangon"), ("B", "Mandalay"), ("C", "Naypyitaw")];
const PRODUCT_LINES: [&str; 6] = [
    "Health and beauty",
    "Electronic accessories",
    "Home and lifestyle",
    "Sports and travel",
    "Food and beverages",
    "Fashion accessories",
];
const PAYMENTS: [&str; 3] = ["Ewallet", "Cash", "Credit card"];
const GROSS_MARGIN: f64 = 4.761904762;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(rng: &mut SimpleRng) -> Vec<SupermarketSale> {
    let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default();
    (0..ROWS)
        .map(|i| {
            let (branch, city) = *rng.pick(&BRANCHES);
            let unit_price = round2(rng.range(10.0, 100.0));
            let quantity = 1 + (rng.next_u64() % 10) as i64;
            let cogs = round2(unit_price * quantity as f64);
            let tax = round2(cogs * 0.05);
            let date = start + Duration::days((rng.next_u64() % 90) as i64);
            SupermarketSale {
                invoice_id: format!(
                    "{:03}-{:02}-{:04}",
                    100 + rng.next_u64() % 900,
                    10 + rng.next_u64() % 90,
                    1000 + i
                ),
                branch: branch.to_string(),
                city: city.to_string(),
                customer_type: rng.pick(&["Member", "Normal"]).to_string(),
                gender: rng.pick(&["Female", "Male"]).to_string(),
                product_line: rng.pick(&PRODUCT_LINES).to_string(),
                unit_price,
                quantity,
                tax,
                total: round2(cogs + tax),
                date: Some(date),
                time: format!("{:02}:{:02}", 10 + rng.next_u64() % 11, rng.next_u64() % 60),
                payment: rng.pick(&PAYMENTS).to_string(),
                cogs,
                gross_margin_percentage: GROSS_MARGIN,
                gross_income: tax,
                rating: (rng.range(4.0, 10.0) * 10.0).round() / 10.0,
            }
        })
        .collect()
}

fn to_batch(rows: &[SupermarketSale]) -> Result<RecordBatch> {
    fn text(rows: &[SupermarketSale], f: impl Fn(&SupermarketSale) -> &str) -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    }
    fn float(rows: &[SupermarketSale], f: impl Fn(&SupermarketSale) -> f64) -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    }

    // Date32 counts days since the Unix epoch.
    let epoch_days = NaiveDate::from_ymd_opt(1970, 1, 1)
        .map(|d| d.num_days_from_ce())
        .unwrap_or(719_163);
    let dates: ArrayRef = Arc::new(Date32Array::from(
        rows.iter()
            .map(|r| r.date.map(|d| d.num_days_from_ce() - epoch_days))
            .collect::<Vec<_>>(),
    ));

    let schema = Arc::new(Schema::new(vec![
        Field::new(col::INVOICE_ID, DataType::Utf8, false),
        Field::new(col::BRANCH, DataType::Utf8, false),
        Field::new(col::CITY, DataType::Utf8, false),
        Field::new(col::CUSTOMER_TYPE, DataType::Utf8, false),
        Field::new(col::GENDER, DataType::Utf8, false),
        Field::new(col::PRODUCT_LINE, DataType::Utf8, false),
        Field::new(col::UNIT_PRICE, DataType::Float64, false),
        Field::new(col::QUANTITY, DataType::Int64, false),
        Field::new(col::TAX, DataType::Float64, false),
        Field::new(col::TOTAL, DataType::Float64, false),
        Field::new(col::DATE, DataType::Date32, true),
        Field::new(col::TIME, DataType::Utf8, false),
        Field::new(col::PAYMENT, DataType::Utf8, false),
        Field::new(col::COGS, DataType::Float64, false),
        Field::new(col::GROSS_MARGIN, DataType::Float64, false),
        Field::new(col::GROSS_INCOME, DataType::Float64, false),
        Field::new(col::RATING, DataType::Float64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        text(rows, |r| r.invoice_id.as_str()),
        text(rows, |r| r.branch.as_str()),
        text(rows, |r| r.city.as_str()),
        text(rows, |r| r.customer_type.as_str()),
        text(rows, |r| r.gender.as_str()),
        text(rows, |r| r.product_line.as_str()),
        float(rows, |r| r.unit_price),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.quantity).collect::<Vec<_>>())),
        float(rows, |r| r.tax),
        float(rows, |r| r.total),
        dates,
        text(rows, |r| r.time.as_str()),
        text(rows, |r| r.payment.as_str()),
        float(rows, |r| r.cogs),
        float(rows, |r| r.gross_margin_percentage),
        float(rows, |r| r.gross_income),
        float(rows, |r| r.rating),
    ];

    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "data".to_string()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    // Write CSV
    let csv_path = out_dir.join("supermarket_sales.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    for row in &rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    // Write Parquet
    let batch = to_batch(&rows)?;
    let parquet_path = out_dir.join("supermarket_sales.parquet");
    let file = std::fs::File::create(&parquet_path)
        .with_context(|| format!("creating {}", parquet_path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    print_batches(&[batch.slice(0, batch.num_rows().min(5))]).context("printing preview")?;
    println!(
        "Wrote {} rows to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
