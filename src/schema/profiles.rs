// src/schema/profiles.rs

use super::types::{ColumnSpec, ColumnType, DatasetProfile, MissingPolicy, ReadOptions};
use crate::table::Table;
use crate::validate::Rule;

const STOCK_PRICE_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "adj_close"];

const FLIGHT_UPPERCASE_COLUMNS: [&str; 5] =
    ["Origin", "Destination", "Departure Gate", "Arrival Gate", "Pod"];

const FLIGHT_FLOAT_COLUMNS: [&str; 2] = ["Revenue ($)", "Distance (km)"];

const FLIGHT_INT_COLUMNS: [&str; 4] = [
    "Flight Number",
    "Passengers (First Class)",
    "Passengers (Business Class)",
    "Passengers (Economy Class)",
];

/// Share of incomplete rows above which a dataset is flagged as unusable.
pub const MAX_INCOMPLETE_RATIO: f64 = 0.9;

/// `airline_flights.csv`: rows with any gap are dropped, codes upper-cased.
pub fn flights() -> DatasetProfile {
    let mut columns = vec![
        ColumnSpec::new("Date", ColumnType::Date),
        ColumnSpec::new("Airline", ColumnType::Utf8),
        ColumnSpec::new("Aircraft Type", ColumnType::Utf8),
    ];
    columns.extend(
        FLIGHT_UPPERCASE_COLUMNS
            .iter()
            .map(|c| ColumnSpec::new(c, ColumnType::Utf8).uppercase()),
    );
    columns.extend(
        FLIGHT_FLOAT_COLUMNS
            .iter()
            .map(|c| ColumnSpec::new(c, ColumnType::Float64)),
    );
    columns.extend(
        FLIGHT_INT_COLUMNS
            .iter()
            .map(|c| ColumnSpec::new(c, ColumnType::Int64)),
    );

    let mut rules: Vec<Rule> = ["Airline", "Origin", "Destination", "Date"]
        .iter()
        .flat_map(|c| [Rule::required(c), Rule::not_null(c)])
        .collect();
    rules.extend(columns.iter().map(|c| Rule::of_type(&c.name, c.ty)));
    rules.extend(
        FLIGHT_FLOAT_COLUMNS
            .iter()
            .chain(FLIGHT_INT_COLUMNS.iter().skip(1))
            .map(|c| Rule::at_least(c, 0.0)),
    );
    rules.push(Rule::MaxIncompleteRatio {
        ratio: MAX_INCOMPLETE_RATIO,
    });

    DatasetProfile {
        name: "airline_flights".to_string(),
        input_file: "airline_flights.csv".to_string(),
        output_file: None,
        detect_column: "Airline".to_string(),
        read: ReadOptions {
            delimiter: Some(','),
            has_headers: true,
        },
        columns,
        na_values: DatasetProfile::default_na_values(),
        missing: vec![MissingPolicy::DropIncomplete { subset: Vec::new() }],
        rules,
    }
}

/// `big_tech_stock_prices.txt`: prices and volume forward-filled per ticker by date.
pub fn stocks() -> DatasetProfile {
    let mut columns = vec![
        ColumnSpec::new("stock_symbol", ColumnType::Utf8),
        ColumnSpec::new("date", ColumnType::Date),
    ];
    columns.extend(
        STOCK_PRICE_COLUMNS
            .iter()
            .map(|c| ColumnSpec::new(c, ColumnType::Float64)),
    );
    columns.push(ColumnSpec::new("volume", ColumnType::Int64));

    let mut filled: Vec<String> = STOCK_PRICE_COLUMNS.iter().map(|c| c.to_string()).collect();
    filled.push("volume".to_string());

    let mut rules: Vec<Rule> = columns.iter().map(|c| Rule::required(&c.name)).collect();
    rules.push(Rule::not_null("stock_symbol"));
    rules.push(Rule::not_null("date"));
    rules.extend(columns.iter().map(|c| Rule::of_type(&c.name, c.ty)));
    rules.extend(filled.iter().map(|c| Rule::at_least(c, 0.0)));
    rules.push(Rule::not_less("high", "low"));
    rules.push(Rule::MaxIncompleteRatio {
        ratio: MAX_INCOMPLETE_RATIO,
    });

    DatasetProfile {
        name: "big_tech_stock_prices".to_string(),
        input_file: "big_tech_stock_prices.txt".to_string(),
        output_file: None,
        detect_column: "stock_symbol".to_string(),
        read: ReadOptions::default(),
        columns,
        na_values: DatasetProfile::default_na_values(),
        missing: vec![MissingPolicy::ForwardFill {
            group_by: "stock_symbol".to_string(),
            order_by: "date".to_string(),
            columns: filled,
        }],
        rules,
    }
}

/// Built-in profiles, run and matched in this order. Flights come first, so a
/// header carrying both `Airline` and `stock_symbol` is read as flights.
pub fn builtin_profiles() -> Vec<DatasetProfile> {
    vec![flights(), stocks()]
}

/// First profile whose `detect_column` appears in `table`'s header.
pub fn detect_profile<'a>(table: &Table, profiles: &'a [DatasetProfile]) -> Option<&'a DatasetProfile> {
    profiles.iter().find(|p| table.has_column(&p.detect_column))
}
