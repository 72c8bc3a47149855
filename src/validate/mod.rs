// src/validate/mod.rs

pub mod rules;

use serde::Serialize;
use tracing::{debug, warn};

use crate::table::Table;

pub use rules::{matches_type, Rule};

/// Whether violations stop the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Violations are reported; output is still written.
    #[default]
    Advisory,
    /// Any violation fails the dataset before it is written.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub rule: String,
    pub column: Option<String>,
    /// 0-based index into the cleaned table; `None` for table-level findings.
    pub row: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Row and per-column missing-value counts of a table at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissingSummary {
    pub rows: usize,
    pub incomplete_rows: usize,
    pub missing_by_column: Vec<ColumnMissing>,
}

impl MissingSummary {
    pub fn of(table: &Table) -> Self {
        Self {
            rows: table.num_rows(),
            incomplete_rows: table.incomplete_rows(),
            missing_by_column: table
                .missing_counts()
                .into_iter()
                .map(|(column, missing)| ColumnMissing { column, missing })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub rows: usize,
    /// Missing data before the missing-value policies ran.
    pub input: MissingSummary,
    /// Missing data left in the validated table.
    pub output: MissingSummary,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Log missing counts, then each violation.
    pub fn log(&self, dataset: &str) {
        debug!(
            dataset,
            rows = self.input.rows,
            incomplete = self.input.incomplete_rows,
            "missing data before policies"
        );
        for cm in self.input.missing_by_column.iter().filter(|cm| cm.missing > 0) {
            debug!(dataset, column = %cm.column, missing = cm.missing, "missing values");
        }
        debug!(
            dataset,
            rows = self.output.rows,
            incomplete = self.output.incomplete_rows,
            "missing data after cleaning"
        );
        for v in &self.violations {
            warn!(dataset, rule = %v.rule, row = ?v.row, "{}", v.message);
        }
    }
}

/// Check `table` against `rules`. The table is never modified.
pub fn validate(table: &Table, rules: &[Rule]) -> ValidationReport {
    validate_cleaned(table, MissingSummary::of(table), rules)
}

/// Like [`validate`], for a table that went through cleaning. `input` is the
/// missing-data summary taken before the missing-value policies; the
/// incomplete-row ratio is judged against it.
pub fn validate_cleaned(table: &Table, input: MissingSummary, rules: &[Rule]) -> ValidationReport {
    let mut violations = Vec::new();
    for rule in rules {
        check_rule(table, &input, rule, &mut violations);
    }

    ValidationReport {
        rows: table.num_rows(),
        input,
        output: MissingSummary::of(table),
        violations,
    }
}

fn check_rule(table: &Table, input: &MissingSummary, rule: &Rule, out: &mut Vec<Violation>) {
    let violation = |column: &str, row: Option<usize>, message: String| Violation {
        rule: rule.name().to_string(),
        column: Some(column.to_string()),
        row,
        message,
    };

    match rule {
        Rule::RequiredColumn { column } => {
            if !table.has_column(column) {
                out.push(violation(
                    column,
                    None,
                    format!("required column `{}` is absent", column),
                ));
            }
        }

        Rule::NotNull { column } => {
            let Some(idx) = table.column_index(column) else {
                return;
            };
            for (i, row) in table.rows().iter().enumerate() {
                if row[idx].is_missing() {
                    out.push(violation(
                        column,
                        Some(i),
                        format!("row {}: `{}` is missing", i, column),
                    ));
                }
            }
        }

        Rule::Type { column, ty } => {
            let Some(idx) = table.column_index(column) else {
                return;
            };
            for (i, row) in table.rows().iter().enumerate() {
                let v = &row[idx];
                if !v.is_missing() && !matches_type(v, *ty) {
                    out.push(violation(
                        column,
                        Some(i),
                        format!(
                            "row {}: `{}` holds {} value {:?}, expected {:?}",
                            i,
                            column,
                            v.type_name(),
                            v.render(),
                            ty
                        ),
                    ));
                }
            }
        }

        Rule::Range { column, min, max } => {
            let Some(idx) = table.column_index(column) else {
                return;
            };
            for (i, row) in table.rows().iter().enumerate() {
                let Some(x) = row[idx].as_f64() else {
                    continue;
                };
                let below = min.map_or(false, |m| x < m);
                let above = max.map_or(false, |m| x > m);
                if below || above {
                    out.push(violation(
                        column,
                        Some(i),
                        format!(
                            "row {}: `{}` = {} outside [{}, {}]",
                            i,
                            column,
                            x,
                            min.map_or("-inf".to_string(), |m| m.to_string()),
                            max.map_or("inf".to_string(), |m| m.to_string()),
                        ),
                    ));
                }
            }
        }

        Rule::NotLess { column, than } => {
            let (Some(a), Some(b)) = (table.column_index(column), table.column_index(than))
            else {
                return;
            };
            for (i, row) in table.rows().iter().enumerate() {
                if let (Some(x), Some(y)) = (row[a].as_f64(), row[b].as_f64()) {
                    if x < y {
                        out.push(violation(
                            column,
                            Some(i),
                            format!("row {}: `{}` ({}) < `{}` ({})", i, column, x, than, y),
                        ));
                    }
                }
            }
        }

        Rule::MaxIncompleteRatio { ratio } => {
            let total = input.rows;
            if total == 0 {
                return;
            }
            let incomplete = input.incomplete_rows;
            if incomplete as f64 > ratio * total as f64 {
                out.push(Violation {
                    rule: rule.name().to_string(),
                    column: None,
                    row: None,
                    message: format!(
                        "{} of {} rows have missing data (limit {:.0}%)",
                        incomplete,
                        total,
                        ratio * 100.0
                    ),
                });
            }
        }
    }
}
