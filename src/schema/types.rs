// src/schema/types.rs

use serde::{Deserialize, Serialize};

use crate::validate::Rule;

/// Semantic type a column is coerced to.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Utf8,
    Int64,
    Float64,
    Date,
}

/// A single declared column of a dataset.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    pub name: String,
    pub ty: ColumnType,
    /// chrono format for `Date` columns; defaults to `%Y-%m-%d`.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub uppercase: bool,
}

impl ColumnSpec {
    pub fn new(name: &str, ty: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            format: None,
            uppercase: false,
        }
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }
}

/// How the reader splits a file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ReadOptions {
    /// `None` → inferred from the header line.
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(default = "ReadOptions::default_has_headers")]
    pub has_headers: bool,
}

impl ReadOptions {
    pub fn default_has_headers() -> bool {
        true
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_headers: Self::default_has_headers(),
        }
    }
}

/// One step of a dataset's missing-value handling, applied after coercion.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Per `group_by` key, in ascending `order_by` order, carry the last
    /// non-missing value of each of `columns` forward.
    ForwardFill {
        group_by: String,
        order_by: String,
        columns: Vec<String>,
    },
    /// Replace missing cells of `column` with `value`, coerced to the column type.
    FillDefault { column: String, value: String },
    /// Remove rows missing any of `subset` (every column when empty).
    DropIncomplete {
        #[serde(default)]
        subset: Vec<String>,
    },
}

/// Everything the pipeline needs to know about one dataset.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct DatasetProfile {
    pub name: String,
    pub input_file: String,
    /// Defaults to `cleaned_<input_file>`.
    #[serde(default)]
    pub output_file: Option<String>,
    /// A header column whose presence identifies this dataset.
    pub detect_column: String,
    #[serde(default)]
    pub read: ReadOptions,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default = "DatasetProfile::default_na_values")]
    pub na_values: Vec<String>,
    #[serde(default)]
    pub missing: Vec<MissingPolicy>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl DatasetProfile {
    pub fn default_na_values() -> Vec<String> {
        ["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn output_file_name(&self) -> String {
        self.output_file
            .clone()
            .unwrap_or_else(|| format!("cleaned_{}", self.input_file))
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}
