use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::{Continent, Dataset, Record};
use crate::config::DashboardConfig;
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Continent selection
// ---------------------------------------------------------------------------

/// Either every continent or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContinentFilter {
    #[default]
    All,
    Only(Continent),
}

impl ContinentFilter {
    pub fn matches(self, continent: Continent) -> bool {
        match self {
            ContinentFilter::All => true,
            ContinentFilter::Only(c) => c == continent,
        }
    }
}

impl fmt::Display for ContinentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContinentFilter::All => f.write_str("all"),
            ContinentFilter::Only(c) => write!(f, "{c}"),
        }
    }
}

impl FromStr for ContinentFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(ContinentFilter::All)
        } else {
            s.parse().map(ContinentFilter::Only)
        }
    }
}

// ---------------------------------------------------------------------------
// Chart size
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeCategory {
    pub const ALL: [SizeCategory; 3] = [SizeCategory::Small, SizeCategory::Medium, SizeCategory::Large];

    pub fn label(self) -> &'static str {
        match self {
            SizeCategory::Small => "Small",
            SizeCategory::Medium => "Medium",
            SizeCategory::Large => "Large",
        }
    }
}

impl FromStr for SizeCategory {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(SizeCategory::Small),
            "medium" => Ok(SizeCategory::Medium),
            "large" => Ok(SizeCategory::Large),
            other => Err(EngineError::UnknownSizeCategory(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Everything the user can pick. One value per engine call; the engine keeps
/// no memory of earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub year: i32,
    pub continent: ContinentFilter,
    pub size: SizeCategory,
    pub log_x: bool,
}

impl FilterState {
    /// Build a filter from the raw values a widget layer typically hands out.
    pub fn parse(year: i32, continent: &str, size: &str, log_x: bool) -> Result<Self, EngineError> {
        Ok(FilterState {
            year,
            continent: continent.parse()?,
            size: size.parse()?,
            log_x,
        })
    }

    /// Starting selection for a freshly loaded dataset: the configured
    /// defaults, falling back to the latest year when the configured one is
    /// not in the data.
    pub fn initial(dataset: &Dataset, config: &DashboardConfig) -> Result<Self, EngineError> {
        let year = config
            .default_year
            .filter(|y| dataset.years().contains(y))
            .or_else(|| dataset.latest_year())
            .unwrap_or(crate::data::model::LAST_YEAR);
        Self::parse(
            year,
            &config.default_continent,
            &config.default_size,
            config.default_log_x,
        )
    }
}

/// Rows of the selected year (and continent), in dataset order.
pub fn scope_rows(dataset: &Dataset, filter: &FilterState) -> Vec<Record> {
    dataset
        .records()
        .iter()
        .filter(|r| r.year == filter.year && filter.continent.matches(r.continent))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Chile", Continent::Americas, 2002, 77.9, 15_497_046, 10_778.8),
            record("Chile", Continent::Americas, 2007, 78.6, 16_284_741, 13_171.6),
            record("Kenya", Continent::Africa, 2007, 54.1, 35_610_177, 1_463.2),
            record("Peru", Continent::Americas, 2007, 71.4, 28_674_757, 7_408.9),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_filter_values() {
        let f = FilterState::parse(2007, "Europe", "large", false).unwrap();
        assert_eq!(f.continent, ContinentFilter::Only(Continent::Europe));
        assert_eq!(f.size, SizeCategory::Large);

        let all = FilterState::parse(1952, "all", "small", true).unwrap();
        assert_eq!(all.continent, ContinentFilter::All);
        assert!(all.log_x);
    }

    #[test]
    fn test_unknown_size_is_rejected_not_defaulted() {
        assert_eq!(
            FilterState::parse(2007, "all", "huge", true),
            Err(EngineError::UnknownSizeCategory("huge".to_string()))
        );
        assert!("Medium".parse::<SizeCategory>().is_err());
    }

    #[test]
    fn test_unknown_continent_is_rejected() {
        assert_eq!(
            "Antarctica".parse::<ContinentFilter>(),
            Err(EngineError::UnknownContinent("Antarctica".to_string()))
        );
    }

    #[test]
    fn test_scope_rows_keeps_dataset_order() {
        let ds = dataset();
        let f = FilterState::parse(2007, "Americas", "medium", true).unwrap();
        let names: Vec<_> = scope_rows(&ds, &f).into_iter().map(|r| r.country).collect();
        assert_eq!(names, vec!["Chile", "Peru"]);

        let f = FilterState::parse(2007, "all", "medium", true).unwrap();
        assert_eq!(scope_rows(&ds, &f).len(), 3);
    }

    #[test]
    fn test_initial_falls_back_to_latest_year() {
        let ds = dataset();
        let config = DashboardConfig {
            default_year: Some(1952),
            ..DashboardConfig::default()
        };
        let f = FilterState::initial(&ds, &config).unwrap();
        assert_eq!(f.year, 2007);
        assert_eq!(f.continent, ContinentFilter::All);
        assert_eq!(f.size, SizeCategory::Medium);
        assert!(f.log_x);

        let config = DashboardConfig {
            default_year: Some(2002),
            ..DashboardConfig::default()
        };
        assert_eq!(FilterState::initial(&ds, &config).unwrap().year, 2002);
    }
}
