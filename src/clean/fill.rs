// src/clean/fill.rs

use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

use crate::table::{Table, Value};

/// Forward-fill `columns` along ascending `order_by` within each `group_by` group.
///
/// A missing cell takes the most recent preceding non-missing value of its
/// group; with none it stays missing. Rows whose group or order key is
/// missing are left out entirely. Row order is not changed. Returns the
/// number of cells filled.
pub fn forward_fill(table: &mut Table, group_by: &str, order_by: &str, columns: &[String]) -> usize {
    let (Some(g), Some(o)) = (table.column_index(group_by), table.column_index(order_by)) else {
        warn!(group_by, order_by, "forward-fill keys absent, skipping");
        return 0;
    };
    let targets: Vec<usize> = columns
        .iter()
        .filter_map(|c| {
            let idx = table.column_index(c);
            if idx.is_none() {
                warn!(column = %c, "forward-fill column absent");
            }
            idx
        })
        .collect();

    // group → row indices, in input order
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        if row[g].is_missing() || row[o].is_missing() {
            continue;
        }
        groups.entry(row[g].render()).or_default().push(i);
    }

    let rows = table.rows_mut();
    let mut filled = 0;
    for indices in groups.values_mut() {
        // stable: equal order keys keep their input order
        indices.sort_by(|&a, &b| compare_values(&rows[a][o], &rows[b][o]));

        for &col in &targets {
            let mut last: Option<Value> = None;
            for &i in indices.iter() {
                let cell = &mut rows[i][col];
                if cell.is_missing() {
                    if let Some(v) = &last {
                        *cell = v.clone();
                        filled += 1;
                    }
                } else {
                    last = Some(cell.clone());
                }
            }
        }
    }
    filled
}

/// Replace missing cells of `column` with `value`. Returns the number filled.
pub fn fill_default(table: &mut Table, column: &str, value: &Value) -> usize {
    let Some(idx) = table.column_index(column) else {
        warn!(column, "fill-default column absent");
        return 0;
    };
    let mut filled = 0;
    for row in table.rows_mut() {
        if row[idx].is_missing() {
            row[idx] = value.clone();
            filled += 1;
        }
    }
    filled
}

/// Drop rows with a missing value in any of `subset` (any column when empty).
/// Returns the number of rows removed.
pub fn drop_incomplete(table: &mut Table, subset: &[String]) -> usize {
    let indices: Vec<usize> = if subset.is_empty() {
        (0..table.num_columns()).collect()
    } else {
        subset
            .iter()
            .filter_map(|c| {
                let idx = table.column_index(c);
                if idx.is_none() {
                    warn!(column = %c, "drop-incomplete column absent");
                }
                idx
            })
            .collect()
    };
    table.retain_rows(|row| indices.iter().all(|&i| !row[i].is_missing()))
}

/// Ordering for order-by keys: dates and numbers by value, anything else by text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.render().cmp(&b.render()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(2020, 1, day).unwrap())
    }

    fn sym(s: &str) -> Value {
        Value::Str(s.to_string())
    }

    fn prices(rows: Vec<(Value, Value, Value)>) -> Table {
        let mut t = Table::new(vec!["stock_symbol".into(), "date".into(), "close".into()], b',');
        for (s, dt, c) in rows {
            t.push_row(vec![s, dt, c]);
        }
        t
    }

    fn closes(t: &Table) -> Vec<Value> {
        (0..t.num_rows()).map(|i| t.get(i, "close").unwrap().clone()).collect()
    }

    fn ffill(t: &mut Table) -> usize {
        forward_fill(t, "stock_symbol", "date", &["close".to_string()])
    }

    #[test]
    fn test_fills_from_previous_day() {
        let mut t = prices(vec![
            (sym("AAPL"), d(1), Value::Float(100.0)),
            (sym("AAPL"), d(2), Value::Missing),
            (sym("AAPL"), d(3), Value::Float(105.0)),
        ]);
        assert_eq!(ffill(&mut t), 1);
        assert_eq!(t.get(1, "close"), Some(&Value::Float(100.0)));
    }

    #[test]
    fn test_fill_follows_dates_not_row_order() {
        let mut t = prices(vec![
            (sym("AAPL"), d(3), Value::Missing),
            (sym("AAPL"), d(1), Value::Float(1.0)),
            (sym("AAPL"), d(2), Value::Float(2.0)),
            (sym("AAPL"), d(4), Value::Missing),
        ]);
        ffill(&mut t);
        assert_eq!(
            closes(&t),
            vec![Value::Float(2.0), Value::Float(1.0), Value::Float(2.0), Value::Float(2.0)]
        );
    }

    #[test]
    fn test_fill_never_crosses_tickers() {
        let mut t = prices(vec![
            (sym("AAPL"), d(1), Value::Float(100.0)),
            (sym("MSFT"), d(2), Value::Missing),
            (sym("MSFT"), d(3), Value::Float(50.0)),
            (sym("MSFT"), d(4), Value::Missing),
        ]);
        ffill(&mut t);
        assert_eq!(
            closes(&t),
            vec![Value::Float(100.0), Value::Missing, Value::Float(50.0), Value::Float(50.0)]
        );
    }

    #[test]
    fn test_rows_without_keys_are_left_alone() {
        let mut t = prices(vec![
            (sym("AAPL"), d(1), Value::Float(100.0)),
            (sym("AAPL"), Value::Missing, Value::Missing),
            (Value::Missing, d(2), Value::Missing),
            (sym("AAPL"), d(3), Value::Missing),
        ]);
        ffill(&mut t);
        assert_eq!(
            closes(&t),
            vec![Value::Float(100.0), Value::Missing, Value::Missing, Value::Float(100.0)]
        );
    }

    #[test]
    fn test_filled_value_is_nearest_preceding() {
        // every filled cell equals the last non-missing close before it, per ticker
        let original = prices(vec![
            (sym("A"), d(5), Value::Missing),
            (sym("B"), d(1), Value::Float(10.0)),
            (sym("A"), d(2), Value::Float(1.0)),
            (sym("A"), d(1), Value::Missing),
            (sym("B"), d(3), Value::Missing),
            (sym("A"), d(4), Value::Float(4.0)),
            (sym("B"), d(2), Value::Float(20.0)),
            (sym("A"), d(3), Value::Missing),
        ]);
        let mut t = original.clone();
        ffill(&mut t);

        for (i, row) in original.rows().iter().enumerate() {
            let expected = original
                .rows()
                .iter()
                .filter(|r| r[0] == row[0] && compare_values(&r[1], &row[1]) == Ordering::Less)
                .filter(|r| !r[2].is_missing())
                .max_by(|a, b| compare_values(&a[1], &b[1]))
                .map(|r| r[2].clone());
            let got = t.get(i, "close").unwrap();
            if row[2].is_missing() {
                assert_eq!(Some(got.clone()), expected.or(Some(Value::Missing)), "row {}", i);
            } else {
                assert_eq!(got, &row[2]);
            }
        }
    }

    #[test]
    fn test_fill_default_and_drop() {
        let mut t = Table::new(vec!["Airline".into(), "Origin".into()], b',');
        t.push_row(vec![Value::Missing, sym("SYD")]);
        t.push_row(vec![sym("Qantas"), Value::Missing]);
        t.push_row(vec![sym("Qantas"), sym("MEL")]);

        let mut dropped = t.clone();
        assert_eq!(drop_incomplete(&mut dropped, &["Airline".to_string()]), 1);
        assert_eq!(dropped.num_rows(), 2);
        assert_eq!(drop_incomplete(&mut dropped, &[]), 1);
        assert_eq!(dropped.num_rows(), 1);

        assert_eq!(fill_default(&mut t, "Airline", &sym("UNKNOWN")), 1);
        assert_eq!(t.get(0, "Airline"), Some(&sym("UNKNOWN")));
        assert_eq!(fill_default(&mut t, "absent", &sym("x")), 0);
    }
}
