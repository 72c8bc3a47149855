use std::collections::HashSet;
use tracing::debug;

use crate::process::{date_parser, utils};
use crate::schema::{ColumnSpec, ColumnType};
use crate::table::{Table, Value};

/// Turn every `Str` cell equal to one of `na_values` into `Missing`.
/// Returns the number of cells changed.
pub fn normalize_na(table: &mut Table, na_values: &[String]) -> usize {
    if na_values.is_empty() {
        return 0;
    }
    let tokens: HashSet<&str> = na_values.iter().map(String::as_str).collect();
    let mut changed = 0;
    for row in table.rows_mut() {
        for cell in row.iter_mut() {
            if let Value::Str(s) = cell {
                if tokens.contains(s.trim()) {
                    *cell = Value::Missing;
                    changed += 1;
                }
            }
        }
    }
    changed
}

/// Coerce one value to `ty`. `None` means the value could not be converted.
/// Values already of the target type pass through unchanged.
pub fn coerce(value: &Value, ty: ColumnType, date_format: &str) -> Option<Value> {
    match (ty, value) {
        (_, Value::Missing) => Some(Value::Missing),

        (ColumnType::Utf8, Value::Str(s)) => Some(Value::Str(s.clone())),
        (ColumnType::Utf8, other) => Some(Value::Str(other.render())),

        (ColumnType::Int64, Value::Int(i)) => Some(Value::Int(*i)),
        (ColumnType::Int64, Value::Str(s)) => utils::parse_i64(s).map(Value::Int),
        (ColumnType::Int64, Value::Float(f)) => utils::f64_to_i64(*f).map(Value::Int),

        (ColumnType::Float64, Value::Float(f)) => Some(Value::Float(*f)),
        (ColumnType::Float64, Value::Int(i)) => Some(Value::Float(*i as f64)),
        (ColumnType::Float64, Value::Str(s)) => utils::parse_f64(s).map(Value::Float),

        (ColumnType::Date, Value::Date(d)) => Some(Value::Date(*d)),
        (ColumnType::Date, Value::Str(s)) => {
            date_parser::parse_date(s, date_format).map(Value::Date)
        }

        _ => None,
    }
}

/// Convert declared columns into their final types in place.
///
/// Columns declared but absent from the table are skipped. Cells that fail
/// to convert become `Missing`; the per-column failure counts are returned
/// in declaration order (zero counts omitted).
pub fn convert_to_final_types(table: &mut Table, specs: &[ColumnSpec]) -> Vec<(String, usize)> {
    let mut failures = Vec::new();

    for spec in specs {
        let Some(idx) = table.column_index(&spec.name) else {
            debug!(column = %spec.name, "declared column absent, skipping conversion");
            continue;
        };
        let format = spec
            .format
            .as_deref()
            .unwrap_or(date_parser::DATE_FORMAT);

        let mut failed = 0;
        for row in table.rows_mut() {
            let cell = &mut row[idx];
            match coerce(cell, spec.ty, format) {
                Some(v) => *cell = v,
                None => {
                    *cell = Value::Missing;
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            debug!(column = %spec.name, failed, "values coerced to missing");
            failures.push((spec.name.clone(), failed));
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn s(v: &str) -> Value {
        Value::Str(v.to_string())
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce(&s("1.5"), ColumnType::Float64, ""), Some(Value::Float(1.5)));
        assert_eq!(coerce(&s("7"), ColumnType::Float64, ""), Some(Value::Float(7.0)));
        assert_eq!(coerce(&s("7"), ColumnType::Int64, ""), Some(Value::Int(7)));
        assert_eq!(coerce(&Value::Float(3.0), ColumnType::Int64, ""), Some(Value::Int(3)));
        assert_eq!(coerce(&Value::Float(3.5), ColumnType::Int64, ""), None);
        assert_eq!(coerce(&Value::Float(9.223372036854775808e18), ColumnType::Int64, ""), None);
        assert_eq!(coerce(&s("1e19"), ColumnType::Int64, ""), None);
        assert_eq!(coerce(&s("abc"), ColumnType::Float64, ""), None);
        assert_eq!(coerce(&Value::Missing, ColumnType::Int64, ""), Some(Value::Missing));
    }

    #[test]
    fn test_coerce_dates_and_strings() {
        let d = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        assert_eq!(
            coerce(&s("2023-05-01"), ColumnType::Date, date_parser::DATE_FORMAT),
            Some(Value::Date(d))
        );
        assert_eq!(coerce(&Value::Int(5), ColumnType::Date, "%Y-%m-%d"), None);
        assert_eq!(coerce(&Value::Int(5), ColumnType::Utf8, ""), Some(s("5")));
    }

    #[test]
    fn test_coercion_is_stable() {
        for (v, ty) in [
            (s("12"), ColumnType::Int64),
            (s("12.25"), ColumnType::Float64),
            (s("2020-02-29"), ColumnType::Date),
            (s(" x "), ColumnType::Utf8),
        ] {
            let once = coerce(&v, ty, date_parser::DATE_FORMAT).unwrap();
            let twice = coerce(&once, ty, date_parser::DATE_FORMAT).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_convert_table_counts_failures() {
        let mut t = Table::new(vec!["volume".into(), "note".into()], b',');
        t.push_row(vec![s("10"), s("a")]);
        t.push_row(vec![s("ten"), s("b")]);
        t.push_row(vec![Value::Missing, s("c")]);

        let specs = vec![
            ColumnSpec::new("volume", ColumnType::Int64),
            ColumnSpec::new("absent", ColumnType::Float64),
        ];
        let failures = convert_to_final_types(&mut t, &specs);
        assert_eq!(failures, vec![("volume".to_string(), 1)]);
        assert_eq!(t.get(0, "volume"), Some(&Value::Int(10)));
        assert_eq!(t.get(1, "volume"), Some(&Value::Missing));
        assert_eq!(t.get(0, "note"), Some(&s("a")));
    }

    #[test]
    fn test_convert_uses_column_date_format() {
        let mut t = Table::new(vec!["day".into()], b',');
        t.push_row(vec![s("29/02/2020")]);
        t.push_row(vec![s("2020-02-29")]);

        let specs = vec![ColumnSpec::new("day", ColumnType::Date).with_format("%d/%m/%Y")];
        let failures = convert_to_final_types(&mut t, &specs);
        assert_eq!(
            t.get(0, "day"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()))
        );
        assert_eq!(t.get(1, "day"), Some(&Value::Missing));
        assert_eq!(failures, vec![("day".to_string(), 1)]);
    }

    #[test]
    fn test_normalize_na() {
        let mut t = Table::new(vec!["a".into()], b',');
        t.push_row(vec![s("NA")]);
        t.push_row(vec![s(" null ")]);
        t.push_row(vec![s("NAB")]);
        let changed = normalize_na(&mut t, &["NA".to_string(), "null".to_string()]);
        assert_eq!(changed, 2);
        assert_eq!(t.get(2, "a"), Some(&s("NAB")));
    }
}
