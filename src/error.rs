use thiserror::Error;

/// A dataset row that breaks the record invariants. Raised at load time,
/// never by the view engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("row {row}: country name is empty")]
    EmptyCountry { row: usize },

    #[error("row {row}: year {year} is outside 1952..=2007 or off the 5-year grid")]
    InvalidYear { row: usize, year: i32 },

    #[error("row {row}: life expectancy {value} must be a finite value >= 0")]
    InvalidLifeExp { row: usize, value: f64 },

    #[error("row {row}: population must be > 0")]
    InvalidPopulation { row: usize },

    #[error("row {row}: GDP per capita {value} must be a finite value > 0")]
    InvalidGdpPercap { row: usize, value: f64 },
}

/// Filter values a host handed over that are outside the enumerated set.
/// These are contract violations by the caller, not empty-result cases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown size category '{0}' (expected small, medium or large)")]
    UnknownSizeCategory(String),

    #[error("unknown continent '{0}' (expected 'all' or a continent name)")]
    UnknownContinent(String),
}
