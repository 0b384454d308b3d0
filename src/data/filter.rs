use std::collections::{BTreeMap, BTreeSet};

use super::model::{Record, Value};

// ---------------------------------------------------------------------------
// Filter rules
// ---------------------------------------------------------------------------

/// Single-choice selection with an "all" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No constraint; the rule is skipped.
    All,
    Only(Value),
}

/// One filter rule applied to one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Value must be in the set. An empty set matches nothing.
    OneOf(BTreeSet<Value>),
    /// Inclusive numeric range. Non-numeric and null values fail.
    Between { low: f64, high: f64 },
    /// Equality, unless the selection is [`Selection::All`].
    Equals(Selection),
    /// Case-insensitive substring match on text. An empty needle is skipped.
    Contains(String),
}

impl Rule {
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Rule::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn between(low: f64, high: f64) -> Self {
        Rule::Between { low, high }
    }

    /// Whether the rule constrains anything at all.
    pub fn is_active(&self) -> bool {
        match self {
            Rule::Equals(Selection::All) => false,
            Rule::Contains(needle) => !needle.is_empty(),
            _ => true,
        }
    }

    /// Evaluate the rule against a single cell.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Rule::OneOf(selected) => selected.contains(value),
            Rule::Between { low, high } => value
                .as_f64()
                .is_some_and(|v| *low <= v && v <= *high),
            Rule::Equals(Selection::All) => true,
            Rule::Equals(Selection::Only(expected)) => value == expected,
            Rule::Contains(needle) => {
                if needle.is_empty() {
                    return true;
                }
                value
                    .as_str()
                    .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Predicate set: which rule applies to which column
// ---------------------------------------------------------------------------

/// Per-column rules, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    rules: BTreeMap<String, Rule>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; replaces any previous rule on the same column.
    pub fn with(mut self, column: impl Into<String>, rule: Rule) -> Self {
        self.insert(column, rule);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, rule: Rule) {
        self.rules.insert(column.into(), rule);
    }

    pub fn get(&self, column: &str) -> Option<&Rule> {
        self.rules.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(c, r)| (c.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// A record passes when every rule matches.
    ///
    /// A column the record does not have is evaluated as [`Value::Null`].
    /// Evaluation stops at the first failing rule.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.rules.iter().all(|(column, rule)| {
            if !rule.is_active() {
                return true;
            }
            match record.value(column) {
                Some(value) => rule.matches(&value),
                None => rule.matches(&Value::Null),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Keep the rows that pass all predicates, in input order.
///
/// Accepts a table or the output of a previous `filter` call.
pub fn filter<'a, R, I>(rows: I, predicates: &PredicateSet) -> Vec<&'a R>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    rows.into_iter()
        .filter(|record| predicates.matches(*record))
        .collect()
}

/// Return indices of records that pass all predicates.
pub fn filtered_indices<R: Record>(records: &[R], predicates: &PredicateSet) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| predicates.matches(*record))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnKind};

    struct Row {
        name: &'static str,
        score: i64,
        tag: Option<&'static str>,
    }

    const COLUMNS: &[Column] = &[
        Column::new("name", ColumnKind::Text),
        Column::new("score", ColumnKind::Integer),
        Column::new("tag", ColumnKind::Text),
    ];

    impl Record for Row {
        fn columns() -> &'static [Column] {
            COLUMNS
        }

        fn value(&self, column: &str) -> Option<Value> {
            match column {
                "name" => Some(Value::from(self.name)),
                "score" => Some(Value::Integer(self.score)),
                "tag" => Some(self.tag.map_or(Value::Null, Value::from)),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "inv100", score: 5, tag: Some("a") },
            Row { name: "INV200", score: 10, tag: None },
            Row { name: "Inv150", score: 15, tag: Some("b") },
        ]
    }

    #[test]
    fn empty_predicate_set_keeps_everything() {
        let rows = rows();
        assert_eq!(filtered_indices(&rows, &PredicateSet::new()), vec![0, 1, 2]);
    }

    #[test]
    fn empty_membership_matches_nothing() {
        let rows = rows();
        let p = PredicateSet::new().with("name", Rule::OneOf(BTreeSet::new()));
        assert!(filtered_indices(&rows, &p).is_empty());
    }

    #[test]
    fn membership_keeps_selected_values() {
        let rows = rows();
        let p = PredicateSet::new().with("name", Rule::one_of(["INV200", "inv100"]));
        assert_eq!(filtered_indices(&rows, &p), vec![0, 1]);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let rows = rows();
        let p = PredicateSet::new().with("score", Rule::between(5.0, 10.0));
        assert_eq!(filtered_indices(&rows, &p), vec![0, 1]);

        let p = PredicateSet::new().with("score", Rule::between(15.0, 15.0));
        assert_eq!(filtered_indices(&rows, &p), vec![2]);
    }

    #[test]
    fn range_rejects_non_numeric_values() {
        let rows = rows();
        let p = PredicateSet::new().with("name", Rule::between(f64::MIN, f64::MAX));
        assert!(filtered_indices(&rows, &p).is_empty());
    }

    #[test]
    fn equality_sentinel_skips_rule() {
        let rows = rows();
        let p = PredicateSet::new().with("tag", Rule::Equals(Selection::All));
        assert_eq!(filtered_indices(&rows, &p), vec![0, 1, 2]);

        let p = PredicateSet::new().with("tag", Rule::Equals(Selection::Only(Value::from("b"))));
        assert_eq!(filtered_indices(&rows, &p), vec![2]);
    }

    #[test]
    fn substring_is_case_insensitive() {
        let rows = rows();
        let p = PredicateSet::new().with("name", Rule::Contains("INV1".into()));
        assert_eq!(filtered_indices(&rows, &p), vec![0, 2]);
    }

    #[test]
    fn empty_substring_is_skipped() {
        let rows = rows();
        let p = PredicateSet::new().with("name", Rule::Contains(String::new()));
        assert_eq!(filtered_indices(&rows, &p), vec![0, 1, 2]);
    }

    #[test]
    fn unknown_column_is_treated_as_null() {
        let rows = rows();
        let p = PredicateSet::new().with("missing", Rule::one_of([Value::Null]));
        assert_eq!(filtered_indices(&rows, &p), vec![0, 1, 2]);

        let p = PredicateSet::new().with("missing", Rule::one_of(["x"]));
        assert!(filtered_indices(&rows, &p).is_empty());
    }

    #[test]
    fn filter_can_be_applied_to_its_own_output() {
        let rows = rows();
        let p = PredicateSet::new()
            .with("score", Rule::between(0.0, 12.0))
            .with("name", Rule::Contains("inv".into()));
        let once = filter(&rows, &p);
        let twice = filter(once.iter().copied(), &p);
        assert_eq!(once.len(), 2);
        assert_eq!(
            once.iter().map(|r| r.name).collect::<Vec<_>>(),
            twice.iter().map(|r| r.name).collect::<Vec<_>>()
        );
    }
}
