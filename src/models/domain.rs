use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Placeholder used for missing cells and explicit "no preference" answers
pub const NO_PREFERENCE: &str = "No Preference";

/// Column names as they appear in the roommate survey export
pub mod columns {
    pub const NAME: &str = "Name";
    pub const GENDER: &str = "Gender";
    pub const PREFERRED_GENDER: &str = "Preferred Gender of Roommate";
    pub const AGE: &str = "Age";
    pub const BUDGET: &str = "Budget for Rent (Per Week AUD)";
    pub const SMOKING: &str = "Preferred Lifestyle (Smoking)";
    pub const LIFESTYLE: &str = "Preferred Lifestyle";
    pub const LIVING_HABITS: &str = "Preferred Living Habits";
    pub const PETS: &str = "Pets";
    pub const LOCATION: &str = "Preferred Location/Neighborhood";
    pub const LIVING_ARRANGEMENT: &str = "Preferred Living Arrangement";
    pub const HOBBIES: &str = "Hobbies";
    pub const SPORTS: &str = "Sports";

    /// Spreadsheet row counter, dropped before normalization
    pub const INDEX: &str = "Index";

    pub const REQUIRED: [&str; 13] = [
        NAME,
        GENDER,
        PREFERRED_GENDER,
        AGE,
        BUDGET,
        SMOKING,
        LIFESTYLE,
        LIVING_HABITS,
        PETS,
        LOCATION,
        LIVING_ARRANGEMENT,
        HOBBIES,
        SPORTS,
    ];
}

/// A single raw spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Missing,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Convert a JSON value into a cell. Booleans and nested values are kept as text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::Missing,
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => Cell::Number(v),
                None => Cell::Text(n.to_string()),
            },
            serde_json::Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text form of the cell, with missing cells replaced by `fill`
    pub fn to_text_or(&self, fill: &str) -> String {
        match self {
            Cell::Missing => fill.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => v.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// One row of the raw dataset, keyed by column name
pub type RawRow = HashMap<String, Cell>;

/// Raw tabular input: the column set seen in the source and its rows in order
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from typed person records, using the full survey column set
    pub fn from_records(records: &[PersonRecord]) -> Self {
        let columns = columns::REQUIRED.iter().map(|c| c.to_string()).collect();
        let rows = records.iter().map(PersonRecord::to_row).collect();
        Self { columns, rows }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Raw person record as answered in the roommate survey
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonRecord {
    pub name: Cell,
    pub gender: Cell,
    pub preferred_gender: Cell,
    pub age: Cell,
    pub budget: Cell,
    pub smoking: Cell,
    pub lifestyle: Cell,
    pub living_habits: Cell,
    pub pets: Cell,
    pub location: Cell,
    pub living_arrangement: Cell,
    pub hobbies: Cell,
    pub sports: Cell,
}

impl PersonRecord {
    /// Extract the survey fields from a raw row; absent keys become missing cells
    pub fn from_row(row: &RawRow) -> Self {
        let cell = |column: &str| row.get(column).cloned().unwrap_or_default();
        Self {
            name: cell(columns::NAME),
            gender: cell(columns::GENDER),
            preferred_gender: cell(columns::PREFERRED_GENDER),
            age: cell(columns::AGE),
            budget: cell(columns::BUDGET),
            smoking: cell(columns::SMOKING),
            lifestyle: cell(columns::LIFESTYLE),
            living_habits: cell(columns::LIVING_HABITS),
            pets: cell(columns::PETS),
            location: cell(columns::LOCATION),
            living_arrangement: cell(columns::LIVING_ARRANGEMENT),
            hobbies: cell(columns::HOBBIES),
            sports: cell(columns::SPORTS),
        }
    }

    pub fn to_row(&self) -> RawRow {
        [
            (columns::NAME, &self.name),
            (columns::GENDER, &self.gender),
            (columns::PREFERRED_GENDER, &self.preferred_gender),
            (columns::AGE, &self.age),
            (columns::BUDGET, &self.budget),
            (columns::SMOKING, &self.smoking),
            (columns::LIFESTYLE, &self.lifestyle),
            (columns::LIVING_HABITS, &self.living_habits),
            (columns::PETS, &self.pets),
            (columns::LOCATION, &self.location),
            (columns::LIVING_ARRANGEMENT, &self.living_arrangement),
            (columns::HOBBIES, &self.hobbies),
            (columns::SPORTS, &self.sports),
        ]
        .into_iter()
        .map(|(column, cell)| (column.to_string(), cell.clone()))
        .collect()
    }
}

/// A feature value after normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EncodedValue {
    /// Index into the column's sorted vocabulary
    Category(u32),
    /// Min/max scaled number in [0, 1]
    Scaled(f64),
}

/// Person record after normalization
///
/// Gender fields are kept verbatim for the compatibility gate. Raw age and
/// budget are kept for the ratio factors, hobbies and sports for the overlap
/// factors.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPerson {
    pub name: String,
    pub gender: String,
    pub preferred_gender: String,
    pub age: EncodedValue,
    pub budget: EncodedValue,
    pub smoking: EncodedValue,
    pub lifestyle: EncodedValue,
    pub living_habits: EncodedValue,
    pub pets: EncodedValue,
    pub location: EncodedValue,
    pub living_arrangement: EncodedValue,
    pub hobbies: String,
    pub sports: String,
    pub raw_age: Option<f64>,
    pub raw_budget: Option<f64>,
}

/// Compatibility score for one unordered pair
///
/// Field names follow the column headers of the published results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    #[serde(rename = "Person1")]
    pub person1: String,
    #[serde(rename = "Person2")]
    pub person2: String,
    #[serde(rename = "Match Score")]
    pub score: f64,
}

impl PairScore {
    pub fn involves(&self, name: &str) -> bool {
        self.person1 == name || self.person2 == name
    }

    /// The other person in the pair, if `name` is part of it
    pub fn partner_of(&self, name: &str) -> Option<&str> {
        if self.person1 == name {
            Some(&self.person2)
        } else if self.person2 == name {
            Some(&self.person1)
        } else {
            None
        }
    }
}

impl fmt::Display for PairScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}: {:.4}", self.person1, self.person2, self.score)
    }
}

/// Top-ranked pairings for one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonTable {
    pub name: String,
    pub matches: Vec<PairScore>,
}

/// Output of one batch run: the global table and the per-person tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResults {
    /// Every pair, sorted by score descending
    pub matches: Vec<PairScore>,
    /// One table per person, in input order
    pub individual_tables: Vec<PersonTable>,
}

impl MatchResults {
    pub fn people_count(&self) -> usize {
        self.individual_tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_from_json() {
        assert_eq!(Cell::from_json(&json!(null)), Cell::Missing);
        assert_eq!(Cell::from_json(&json!("Male")), Cell::Text("Male".to_string()));
        assert_eq!(Cell::from_json(&json!(250)), Cell::Number(250.0));
        assert_eq!(Cell::from_json(&json!(true)), Cell::Text("true".to_string()));
    }

    #[test]
    fn test_cell_text_fill() {
        assert_eq!(Cell::Missing.to_text_or(NO_PREFERENCE), "No Preference");
        assert_eq!(Cell::Number(3.0).to_text_or(""), "3");
        assert_eq!(Cell::Number(2.5).to_text_or(""), "2.5");
    }

    #[test]
    fn test_record_row_round_trip() {
        let record = PersonRecord {
            name: "Ava".into(),
            age: 23.0.into(),
            hobbies: "Reading,Gaming".into(),
            ..Default::default()
        };

        let row = record.to_row();
        assert_eq!(row.len(), columns::REQUIRED.len());
        assert_eq!(PersonRecord::from_row(&row), record);
    }

    #[test]
    fn test_pair_score_partner() {
        let pair = PairScore {
            person1: "Ava".to_string(),
            person2: "Ben".to_string(),
            score: 0.5,
        };

        assert_eq!(pair.partner_of("Ava"), Some("Ben"));
        assert_eq!(pair.partner_of("Ben"), Some("Ava"));
        assert_eq!(pair.partner_of("Cleo"), None);
        assert!(pair.involves("Ben"));
    }

    #[test]
    fn test_pair_score_serializes_with_table_headers() {
        let pair = PairScore {
            person1: "Ava".to_string(),
            person2: "Ben".to_string(),
            score: 0.75,
        };

        let value = serde_json::to_value(&pair).unwrap();
        assert_eq!(value, json!({"Person1": "Ava", "Person2": "Ben", "Match Score": 0.75}));
    }
}
