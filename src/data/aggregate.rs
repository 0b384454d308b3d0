use std::collections::HashMap;

use super::model::{Record, Value};

/// Label returned by [`arg_max_label`] when there is nothing to rank.
pub const PLACEHOLDER: &str = "-";

// ---------------------------------------------------------------------------
// Scalar aggregates
// ---------------------------------------------------------------------------

fn numbers<'a, R: Record>(rows: &'a [&'a R], field: &'a str) -> impl Iterator<Item = f64> + 'a {
    rows.iter().filter_map(move |r| r.value(field)?.as_f64())
}

/// Sum of a numeric field. Non-numeric and null cells are skipped; 0 on empty input.
pub fn sum<R: Record>(rows: &[&R], field: &str) -> f64 {
    numbers(rows, field).sum()
}

/// Arithmetic mean of a numeric field, or `None` when there is no data.
pub fn mean<R: Record>(rows: &[&R], field: &str) -> Option<f64> {
    let (total, n) = numbers(rows, field).fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
    (n > 0).then(|| total / n as f64)
}

pub fn count<R: Record>(rows: &[&R]) -> usize {
    rows.len()
}

/// Label of the first record holding the maximum of `value_field`.
///
/// Returns [`PLACEHOLDER`] when no record has a numeric value.
pub fn arg_max_label<R: Record>(rows: &[&R], value_field: &str, label_field: &str) -> String {
    let mut best: Option<(f64, &R)> = None;
    for record in rows {
        let Some(v) = record.value(value_field).and_then(|v| v.as_f64()) else {
            continue;
        };
        match best {
            Some((max, _)) if v <= max => {}
            _ => best = Some((v, *record)),
        }
    }
    best.and_then(|(_, record)| record.value(label_field))
        .map(|label| label.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

// ---------------------------------------------------------------------------
// Grouped series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggOp {
    Sum,
    Mean,
}

/// Ordering of a grouped series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOrder {
    /// Order in which each key first appears in the input.
    FirstSeen,
    /// Ascending by key (time series).
    ByKey,
    /// Ascending by aggregated value; ties keep first-seen order.
    Ascending,
    /// Descending by aggregated value; ties keep first-seen order.
    Descending,
}

/// Distinct non-null values of `field`, in first-seen order, with their rows.
pub fn partition<'a, R: Record>(rows: &[&'a R], field: &str) -> Vec<(Value, Vec<&'a R>)> {
    let mut index: HashMap<Value, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<&'a R>)> = Vec::new();
    for record in rows {
        let key = match record.value(field) {
            Some(v) if !v.is_null() => v,
            _ => continue,
        };
        match index.get(&key) {
            Some(&i) => groups[i].1.push(*record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![*record]));
            }
        }
    }
    groups
}

/// Group by `group_field` and aggregate `value_field` per group.
///
/// Keys are exactly the distinct non-null values of `group_field` present in
/// `rows`. A group without any numeric value has a mean of `NaN`.
pub fn group_aggregate<R: Record>(
    rows: &[&R],
    group_field: &str,
    value_field: &str,
    op: AggOp,
    order: SeriesOrder,
) -> Vec<(Value, f64)> {
    let mut series: Vec<(Value, f64)> = partition(rows, group_field)
        .into_iter()
        .map(|(key, members)| {
            let value = match op {
                AggOp::Sum => sum(&members, value_field),
                AggOp::Mean => mean(&members, value_field).unwrap_or(f64::NAN),
            };
            (key, value)
        })
        .collect();

    match order {
        SeriesOrder::FirstSeen => {}
        SeriesOrder::ByKey => series.sort_by(|a, b| a.0.cmp(&b.0)),
        SeriesOrder::Ascending => series.sort_by(|a, b| a.1.total_cmp(&b.1)),
        SeriesOrder::Descending => series.sort_by(|a, b| b.1.total_cmp(&a.1)),
    }
    series
}

/// Occurrences per distinct non-null value, most frequent first.
/// Ties keep first-seen order.
pub fn value_counts<R: Record>(rows: &[&R], field: &str) -> Vec<(Value, usize)> {
    let mut counts: Vec<(Value, usize)> = partition(rows, field)
        .into_iter()
        .map(|(key, members)| (key, members.len()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// ---------------------------------------------------------------------------
// Option helpers for input widgets
// ---------------------------------------------------------------------------

/// Distinct non-null values of `field` in first-seen order.
pub fn unique_values<R: Record>(rows: &[&R], field: &str) -> Vec<Value> {
    partition(rows, field).into_iter().map(|(key, _)| key).collect()
}

/// `(min, max)` of a numeric field, or `None` when there is no numeric value.
pub fn extent<R: Record>(rows: &[&R], field: &str) -> Option<(f64, f64)> {
    numbers(rows, field).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
