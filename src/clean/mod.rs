// src/clean/mod.rs

pub mod fill;

use serde::Serialize;
use tracing::{info, warn};

use crate::process::{convert, date_parser, trimming};
use crate::schema::{ColumnType, DatasetProfile, MissingPolicy};
use crate::table::{Table, Value};
use crate::validate::MissingSummary;

/// What one cleaning pass changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanSummary {
    pub na_normalized: usize,
    pub coercion_failures: Vec<(String, usize)>,
    pub filled: usize,
    pub dropped: usize,
    /// Missing data after coercion, before any missing-value policy.
    pub before_policies: MissingSummary,
}

/// Apply `profile` to `table` in place: NA tokens → coercion → string
/// normalization → missing-value policies, in that order.
///
/// Deterministic, and a second pass over an already-cleaned table changes nothing.
#[tracing::instrument(level = "info", skip_all, fields(dataset = %profile.name))]
pub fn clean(table: &mut Table, profile: &DatasetProfile) -> CleanSummary {
    let mut summary = CleanSummary {
        na_normalized: convert::normalize_na(table, &profile.na_values),
        ..Default::default()
    };

    summary.coercion_failures = convert::convert_to_final_types(table, &profile.columns);
    trimming::apply_trimming(table, &profile.columns);
    summary.before_policies = MissingSummary::of(table);

    for policy in &profile.missing {
        match policy {
            MissingPolicy::ForwardFill {
                group_by,
                order_by,
                columns,
            } => {
                summary.filled += fill::forward_fill(table, group_by, order_by, columns);
            }
            MissingPolicy::FillDefault { column, value } => {
                match default_value(profile, column, value) {
                    Some(v) => summary.filled += fill::fill_default(table, column, &v),
                    None => warn!(column = %column, value = %value, "unusable default, skipping"),
                }
            }
            MissingPolicy::DropIncomplete { subset } => {
                summary.dropped += fill::drop_incomplete(table, subset);
            }
        }
    }

    let failed: usize = summary.coercion_failures.iter().map(|(_, n)| n).sum();
    info!(
        rows = table.num_rows(),
        na = summary.na_normalized,
        coercion_failures = failed,
        filled = summary.filled,
        dropped = summary.dropped,
        "cleaned"
    );
    summary
}

/// A `FillDefault` value coerced to its column's declared type (text when undeclared).
pub fn default_value(profile: &DatasetProfile, column: &str, raw: &str) -> Option<Value> {
    let (ty, format) = profile
        .column(column)
        .map(|c| (c.ty, c.format.as_deref().unwrap_or(date_parser::DATE_FORMAT)))
        .unwrap_or((ColumnType::Utf8, date_parser::DATE_FORMAT));
    match convert::coerce(&Value::Str(raw.to_string()), ty, format)? {
        Value::Missing => None,
        Value::Str(s) if s.trim().is_empty() => None,
        Value::Str(s) if profile.column(column).map_or(false, |c| c.uppercase) => {
            Some(Value::Str(s.trim().to_uppercase()))
        }
        Value::Str(s) => Some(Value::Str(s.trim().to_string())),
        v => Some(v),
    }
}
