// src/table.rs

use chrono::NaiveDate;
use std::fmt;

use crate::process::{date_parser, utils};

/// A single cell. `Float` is always finite; anything else coerces to `Missing`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view used by range checks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "utf8",
            Value::Int(_) => "int64",
            Value::Float(_) => "float64",
            Value::Date(_) => "date",
            Value::Missing => "missing",
        }
    }

    /// Stable textual encoding used by the writer.
    pub fn render(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => utils::format_float(*f),
            Value::Date(d) => d.format(date_parser::DATE_FORMAT).to_string(),
            Value::Missing => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str("<missing>"),
            other => f.write_str(&other.render()),
        }
    }
}

/// In-memory table: named columns in a fixed order, rows aligned with them.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    /// Delimiter the table was read with; the writer reuses it.
    delimiter: u8,
}

impl Table {
    pub fn new(columns: Vec<String>, delimiter: u8) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            delimiter,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<Value>] {
        &mut self.rows
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Appends a row. Panics if the row width differs from the column count.
    pub fn push_row(&mut self, row: Vec<Value>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row width must match column count"
        );
        self.rows.push(row);
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Keeps the rows for which `keep` returns true; returns how many were removed.
    pub(crate) fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&[Value]) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|r| keep(r));
        before - self.rows.len()
    }

    /// Missing-value count per column, in column order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let n = self.rows.iter().filter(|r| r[i].is_missing()).count();
                (name.clone(), n)
            })
            .collect()
    }

    /// Number of rows holding at least one missing value.
    pub fn incomplete_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.iter().any(Value::is_missing))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["a".into(), "b".into()], b',');
        t.push_row(vec![Value::Int(1), Value::Missing]);
        t.push_row(vec![Value::Str("x".into()), Value::Float(2.5)]);
        t
    }

    #[test]
    fn test_lookup_by_name() {
        let t = sample();
        assert_eq!(t.column_index("b"), Some(1));
        assert_eq!(t.column_index("zz"), None);
        assert_eq!(t.get(1, "b"), Some(&Value::Float(2.5)));
        assert_eq!(t.get(5, "b"), None);
    }

    #[test]
    fn test_missing_summary() {
        let t = sample();
        assert_eq!(
            t.missing_counts(),
            vec![("a".to_string(), 0), ("b".to_string(), 1)]
        );
        assert_eq!(t.incomplete_rows(), 1);
    }

    #[test]
    fn test_render() {
        assert_eq!(Value::Float(100.0).render(), "100.0");
        assert_eq!(Value::Int(-3).render(), "-3");
        let d = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert_eq!(Value::Date(d).render(), "2020-01-02");
        assert_eq!(Value::Missing.render(), "");
    }

    #[test]
    #[should_panic]
    fn test_push_row_rejects_wrong_width() {
        let mut t = Table::new(vec!["a".into()], b',');
        t.push_row(vec![Value::Missing, Value::Missing]);
    }
}
