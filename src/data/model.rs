use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, EngineError};

/// First and last survey year, and the spacing between survey years.
pub const FIRST_YEAR: i32 = 1952;
pub const LAST_YEAR: i32 = 2007;
pub const YEAR_STEP: i32 = 5;

// ---------------------------------------------------------------------------
// Continent
// ---------------------------------------------------------------------------

/// Ordered alphabetically so grouped output sorts the same way a legend does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Continent {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl Continent {
    pub const ALL: [Continent; 5] = [
        Continent::Africa,
        Continent::Americas,
        Continent::Asia,
        Continent::Europe,
        Continent::Oceania,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Americas => "Americas",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Continent {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Continent::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EngineError::UnknownContinent(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the gapminder table
// ---------------------------------------------------------------------------

/// A single country-year observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub country: String,
    pub continent: Continent,
    pub year: i32,
    #[serde(rename = "lifeExp")]
    pub life_exp: f64,
    pub pop: u64,
    #[serde(rename = "gdpPercap")]
    pub gdp_percap: f64,
}

impl Record {
    /// Check the row invariants. `row` is only used for the error message.
    pub fn validate(&self, row: usize) -> Result<(), DataError> {
        if self.country.trim().is_empty() {
            return Err(DataError::EmptyCountry { row });
        }
        if !(FIRST_YEAR..=LAST_YEAR).contains(&self.year) || (self.year - FIRST_YEAR) % YEAR_STEP != 0
        {
            return Err(DataError::InvalidYear {
                row,
                year: self.year,
            });
        }
        if !self.life_exp.is_finite() || self.life_exp < 0.0 {
            return Err(DataError::InvalidLifeExp {
                row,
                value: self.life_exp,
            });
        }
        if self.pop == 0 {
            return Err(DataError::InvalidPopulation { row });
        }
        if !self.gdp_percap.is_finite() || self.gdp_percap <= 0.0 {
            return Err(DataError::InvalidGdpPercap {
                row,
                value: self.gdp_percap,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The validated, read-only base table. Built once, then shared behind an
/// `Arc`; nothing hands out mutable access to the rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    years: BTreeSet<i32>,
    continents: BTreeSet<Continent>,
}

impl Dataset {
    /// Validate every row and build the year / continent indices.
    pub fn from_records(records: Vec<Record>) -> Result<Self, DataError> {
        for (row, record) in records.iter().enumerate() {
            record.validate(row)?;
        }
        let years = records.iter().map(|r| r.year).collect();
        let continents = records.iter().map(|r| r.continent).collect();
        Ok(Dataset {
            records,
            years,
            continents,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct survey years, ascending.
    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// Continents that have at least one row.
    pub fn continents(&self) -> &BTreeSet<Continent> {
        &self.continents
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(
        country: &str,
        continent: Continent,
        year: i32,
        life_exp: f64,
        pop: u64,
        gdp_percap: f64,
    ) -> Record {
        Record {
            country: country.to_string(),
            continent,
            year,
            life_exp,
            pop,
            gdp_percap,
        }
    }

    #[test]
    fn test_continent_parse_is_case_insensitive() {
        assert_eq!("europe".parse::<Continent>(), Ok(Continent::Europe));
        assert_eq!(" Oceania ".parse::<Continent>(), Ok(Continent::Oceania));
        assert_eq!(
            "Atlantis".parse::<Continent>(),
            Err(EngineError::UnknownContinent("Atlantis".to_string()))
        );
    }

    #[test]
    fn test_dataset_indexes_years_and_continents() {
        let ds = Dataset::from_records(vec![
            record("Chile", Continent::Americas, 2007, 78.5, 16_284_741, 13_171.6),
            record("Chile", Continent::Americas, 1952, 54.7, 6_377_619, 3_939.9),
            record("Kenya", Continent::Africa, 2007, 54.1, 35_610_177, 1_463.2),
        ])
        .unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.years().iter().copied().collect::<Vec<_>>(), vec![1952, 2007]);
        assert_eq!(
            ds.continents().iter().copied().collect::<Vec<_>>(),
            vec![Continent::Africa, Continent::Americas]
        );
        assert_eq!(ds.latest_year(), Some(2007));
    }

    #[test]
    fn test_invalid_rows_are_rejected() {
        let off_grid = record("Chile", Continent::Americas, 2005, 78.0, 10, 100.0);
        assert_eq!(
            Dataset::from_records(vec![off_grid]).unwrap_err(),
            DataError::InvalidYear { row: 0, year: 2005 }
        );

        let ok = record("Chile", Continent::Americas, 2007, 78.0, 10, 100.0);
        let no_pop = record("Peru", Continent::Americas, 2007, 71.0, 0, 100.0);
        assert_eq!(
            Dataset::from_records(vec![ok, no_pop]).unwrap_err(),
            DataError::InvalidPopulation { row: 1 }
        );

        let bad_gdp = record("Peru", Continent::Americas, 2007, 71.0, 5, f64::NAN);
        assert!(matches!(
            bad_gdp.validate(4),
            Err(DataError::InvalidGdpPercap { row: 4, .. })
        ));

        let blank = record("  ", Continent::Asia, 2007, 71.0, 5, 10.0);
        assert_eq!(blank.validate(2), Err(DataError::EmptyCountry { row: 2 }));
    }

    #[test]
    fn test_empty_dataset_has_no_latest_year() {
        let ds = Dataset::from_records(Vec::new()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.latest_year(), None);
    }
}
