use crate::models::{columns, Cell, EncodedValue, NormalizedPerson, PersonRecord, RawTable, NO_PREFERENCE};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that abort normalization of a dataset
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Duplicate name in dataset: {0}")]
    DuplicateName(String),

    #[error("Value {value:?} in column {column} was not seen when the encoding was built")]
    UnknownCategory { column: String, value: String },

    #[error("Non-numeric value in numeric column {column}: {value:?}")]
    NotNumeric { column: String, value: String },
}

/// Sorted set of distinct values seen in one categorical column
///
/// A value's code is its position in the sorted set, so codes only mean
/// something within the dataset they were built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoricalVocabulary {
    values: Vec<String>,
}

impl CategoricalVocabulary {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        values.sort();
        values.dedup();
        Self { values }
    }

    pub fn code(&self, value: &str) -> Option<u32> {
        self.values
            .binary_search_by(|v| v.as_str().cmp(value))
            .ok()
            .map(|idx| idx as u32)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Observed min/max of one numeric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    pub fn fit(values: &[f64]) -> Option<Self> {
        let mut iter = values.iter().copied();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min, max })
    }

    /// Rescale to [0, 1]. A column holding a single distinct value maps to 0.
    #[inline]
    pub fn scale(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        (value - self.min) / range
    }
}

/// How one feature column is turned into comparable values
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEncoding {
    Categorical(CategoricalVocabulary),
    Numeric(ColumnRange),
}

impl ColumnEncoding {
    /// A column is numeric only if every cell holds a number. Any missing or
    /// text cell turns the whole column categorical, with missing cells
    /// filled by the sentinel.
    pub fn fit<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let cells: Vec<&Cell> = cells.into_iter().collect();
        let numbers: Option<Vec<f64>> = cells.iter().map(|c| c.as_number()).collect();

        match numbers.as_deref().and_then(ColumnRange::fit) {
            Some(range) => ColumnEncoding::Numeric(range),
            None => ColumnEncoding::Categorical(CategoricalVocabulary::fit(
                cells.iter().map(|c| c.to_text_or(NO_PREFERENCE)),
            )),
        }
    }

    pub fn encode(&self, column: &str, cell: &Cell) -> Result<EncodedValue, NormalizeError> {
        match self {
            ColumnEncoding::Categorical(vocab) => {
                let value = cell.to_text_or(NO_PREFERENCE);
                vocab
                    .code(&value)
                    .map(EncodedValue::Category)
                    .ok_or_else(|| NormalizeError::UnknownCategory {
                        column: column.to_string(),
                        value,
                    })
            }
            ColumnEncoding::Numeric(range) => cell
                .as_number()
                .map(|v| EncodedValue::Scaled(range.scale(v)))
                .ok_or_else(|| NormalizeError::NotNumeric {
                    column: column.to_string(),
                    value: cell.to_text_or(NO_PREFERENCE),
                }),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnEncoding::Numeric(_))
    }
}

/// Per-column encodings fitted on one run's dataset
///
/// Built once with [`FeatureEncoding::fit`] and passed explicitly to
/// [`FeatureEncoding::transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoding {
    pub age: ColumnEncoding,
    pub budget: ColumnEncoding,
    pub smoking: ColumnEncoding,
    pub lifestyle: ColumnEncoding,
    pub living_habits: ColumnEncoding,
    pub pets: ColumnEncoding,
    pub location: ColumnEncoding,
    pub living_arrangement: ColumnEncoding,
}

impl FeatureEncoding {
    pub fn fit(records: &[PersonRecord]) -> Self {
        Self {
            age: fit_column(records, |r| &r.age),
            budget: fit_column(records, |r| &r.budget),
            smoking: fit_column(records, |r| &r.smoking),
            lifestyle: fit_column(records, |r| &r.lifestyle),
            living_habits: fit_column(records, |r| &r.living_habits),
            pets: fit_column(records, |r| &r.pets),
            location: fit_column(records, |r| &r.location),
            living_arrangement: fit_column(records, |r| &r.living_arrangement),
        }
    }

    pub fn transform(&self, record: &PersonRecord) -> Result<NormalizedPerson, NormalizeError> {
        Ok(NormalizedPerson {
            name: record.name.to_text_or(NO_PREFERENCE),
            gender: record.gender.to_text_or(NO_PREFERENCE),
            preferred_gender: record.preferred_gender.to_text_or(NO_PREFERENCE),
            age: self.age.encode(columns::AGE, &record.age)?,
            budget: self.budget.encode(columns::BUDGET, &record.budget)?,
            smoking: self.smoking.encode(columns::SMOKING, &record.smoking)?,
            lifestyle: self.lifestyle.encode(columns::LIFESTYLE, &record.lifestyle)?,
            living_habits: self
                .living_habits
                .encode(columns::LIVING_HABITS, &record.living_habits)?,
            pets: self.pets.encode(columns::PETS, &record.pets)?,
            location: self.location.encode(columns::LOCATION, &record.location)?,
            living_arrangement: self
                .living_arrangement
                .encode(columns::LIVING_ARRANGEMENT, &record.living_arrangement)?,
            hobbies: record.hobbies.to_text_or(""),
            sports: record.sports.to_text_or(""),
            raw_age: record.age.as_number(),
            raw_budget: record.budget.as_number(),
        })
    }
}

fn fit_column<F>(records: &[PersonRecord], field: F) -> ColumnEncoding
where
    F: Fn(&PersonRecord) -> &Cell,
{
    ColumnEncoding::fit(records.iter().map(|r| field(r)))
}

/// Normalized people plus the encoding they were produced with
#[derive(Debug, Clone)]
pub struct NormalizedDataset {
    pub people: Vec<NormalizedPerson>,
    pub encoding: FeatureEncoding,
}

/// Check the table schema and pull out the survey fields of every row
pub fn extract_records(table: &RawTable) -> Result<Vec<PersonRecord>, NormalizeError> {
    if let Some(missing) = columns::REQUIRED.iter().find(|c| !table.has_column(c)) {
        return Err(NormalizeError::MissingColumn(missing.to_string()));
    }

    for extra in table
        .columns
        .iter()
        .filter(|c| !columns::REQUIRED.contains(&c.as_str()))
    {
        if extra == columns::INDEX {
            continue;
        }
        tracing::debug!("Ignoring column not used for scoring: {}", extra);
    }

    Ok(table.rows.iter().map(PersonRecord::from_row).collect())
}

/// Fit the feature encoding on `records` and normalize every one of them
pub fn normalize_records(records: &[PersonRecord]) -> Result<NormalizedDataset, NormalizeError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let name = record.name.to_text_or(NO_PREFERENCE);
        if !seen.insert(name.clone()) {
            return Err(NormalizeError::DuplicateName(name));
        }
    }

    let encoding = FeatureEncoding::fit(records);
    let people = records
        .iter()
        .map(|r| encoding.transform(r))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        "Normalized {} records (age numeric: {}, budget numeric: {})",
        people.len(),
        encoding.age.is_numeric(),
        encoding.budget.is_numeric()
    );

    Ok(NormalizedDataset { people, encoding })
}

/// Normalize a raw table: schema check, missing-value fill, encoding, scaling
pub fn normalize(table: &RawTable) -> Result<NormalizedDataset, NormalizeError> {
    let records = extract_records(table)?;
    normalize_records(&records)
}
