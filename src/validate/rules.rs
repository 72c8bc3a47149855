use serde::{Deserialize, Serialize};

use crate::schema::ColumnType;
use crate::table::Value;

/// A post-clean check. Row-level rules yield one violation per offending row.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    RequiredColumn {
        column: String,
    },
    NotNull {
        column: String,
    },
    Type {
        column: String,
        ty: ColumnType,
    },
    /// Inclusive numeric bounds; either side may be open.
    Range {
        column: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    /// `column >= than` wherever both are present.
    NotLess {
        column: String,
        than: String,
    },
    /// Table-level: share of rows holding any missing value must not exceed `ratio`.
    MaxIncompleteRatio {
        ratio: f64,
    },
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::RequiredColumn { .. } => "required_column",
            Rule::NotNull { .. } => "not_null",
            Rule::Type { .. } => "type",
            Rule::Range { .. } => "range",
            Rule::NotLess { .. } => "not_less",
            Rule::MaxIncompleteRatio { .. } => "max_incomplete_ratio",
        }
    }

    pub fn required(column: &str) -> Self {
        Rule::RequiredColumn {
            column: column.to_string(),
        }
    }

    pub fn not_null(column: &str) -> Self {
        Rule::NotNull {
            column: column.to_string(),
        }
    }

    pub fn of_type(column: &str, ty: ColumnType) -> Self {
        Rule::Type {
            column: column.to_string(),
            ty,
        }
    }

    pub fn at_least(column: &str, min: f64) -> Self {
        Rule::Range {
            column: column.to_string(),
            min: Some(min),
            max: None,
        }
    }

    pub fn not_less(column: &str, than: &str) -> Self {
        Rule::NotLess {
            column: column.to_string(),
            than: than.to_string(),
        }
    }
}

/// Whether a non-missing `value` is stored as `ty`.
pub fn matches_type(value: &Value, ty: ColumnType) -> bool {
    matches!(
        (value, ty),
        (Value::Str(_), ColumnType::Utf8)
            | (Value::Int(_), ColumnType::Int64)
            | (Value::Float(_), ColumnType::Float64)
            | (Value::Date(_), ColumnType::Date)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_from_yaml() {
        let yaml = r#"
- rule: required_column
  column: Airline
- rule: range
  column: volume
  min: 0
- rule: not_less
  column: high
  than: low
- rule: max_incomplete_ratio
  ratio: 0.9
"#;
        let rules: Vec<Rule> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            rules,
            vec![
                Rule::required("Airline"),
                Rule::at_least("volume", 0.0),
                Rule::not_less("high", "low"),
                Rule::MaxIncompleteRatio { ratio: 0.9 },
            ]
        );
    }

    #[test]
    fn test_matches_type() {
        assert!(matches_type(&Value::Int(1), ColumnType::Int64));
        assert!(!matches_type(&Value::Int(1), ColumnType::Float64));
        assert!(matches_type(&Value::Str("a".into()), ColumnType::Utf8));
    }
}
