use crate::schema::{ColumnSpec, ColumnType};
use crate::table::{Table, Value};

/// Trim declared text columns, upper-casing the ones flagged `uppercase`.
/// A value that trims to nothing becomes `Missing`.
pub fn apply_trimming(table: &mut Table, specs: &[ColumnSpec]) {
    let targets: Vec<(usize, bool)> = specs
        .iter()
        .filter(|s| s.ty == ColumnType::Utf8)
        .filter_map(|s| table.column_index(&s.name).map(|idx| (idx, s.uppercase)))
        .collect();
    if targets.is_empty() {
        return;
    }

    for row in table.rows_mut() {
        for &(idx, upper) in &targets {
            if let Value::Str(s) = &row[idx] {
                let trimmed = s.trim();
                let next = if trimmed.is_empty() {
                    Value::Missing
                } else if upper {
                    Value::Str(trimmed.to_uppercase())
                } else {
                    Value::Str(trimmed.to_string())
                };
                row[idx] = next;
            }
        }
    }
}
