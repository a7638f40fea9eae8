use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::filter::{scope_rows, ContinentFilter, FilterState, SizeCategory};
use super::model::{Continent, Dataset, Record};

/// How many rows the bar chart and the per-continent pie keep.
pub const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Chart height lookup
// ---------------------------------------------------------------------------

/// Pixel height per size category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightMap {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
}

impl HeightMap {
    pub const STANDARD: HeightMap = HeightMap {
        small: 400,
        medium: 600,
        large: 800,
    };

    pub const COMPACT: HeightMap = HeightMap {
        small: 400,
        medium: 500,
        large: 650,
    };

    pub fn height(&self, size: SizeCategory) -> u32 {
        match size {
            SizeCategory::Small => self.small,
            SizeCategory::Medium => self.medium,
            SizeCategory::Large => self.large,
        }
    }
}

impl Default for HeightMap {
    fn default() -> Self {
        HeightMap::STANDARD
    }
}

// ---------------------------------------------------------------------------
// Derived rows
// ---------------------------------------------------------------------------

/// Mean life expectancy of one year (and continent, when all are shown).
#[derive(Debug, Clone, PartialEq)]
pub struct LifeExpPoint {
    pub year: i32,
    pub continent: Option<Continent>,
    pub mean_life_exp: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinentPopulation {
    pub continent: Continent,
    pub pop: u64,
}

/// Population breakdown: per continent, or the most populous countries of the
/// selected continent.
#[derive(Debug, Clone, PartialEq)]
pub enum PieRows {
    ByContinent(Vec<ContinentPopulation>),
    TopCountries(Vec<Record>),
}

impl PieRows {
    /// `(label, population)` per slice, in legend order.
    pub fn slices(&self) -> Vec<(String, u64)> {
        match self {
            PieRows::ByContinent(rows) => rows
                .iter()
                .map(|r| (r.continent.to_string(), r.pop))
                .collect(),
            PieRows::TopCountries(rows) => rows.iter().map(|r| (r.country.clone(), r.pop)).collect(),
        }
    }

    pub fn total(&self) -> u64 {
        self.slices().iter().map(|(_, pop)| pop).sum()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PieRows::ByContinent(rows) => rows.is_empty(),
            PieRows::TopCountries(rows) => rows.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTitles {
    pub scatter: String,
    pub bar: String,
    pub line: String,
    pub pie: String,
}

impl ChartTitles {
    fn new(filter: &FilterState) -> Self {
        let year = filter.year;
        let (line, pie) = match filter.continent {
            ContinentFilter::All => (
                "Life Expectancy by Continent".to_string(),
                format!("Population by Continent ({year})"),
            ),
            ContinentFilter::Only(c) => (
                format!("Life Expectancy in {c}"),
                format!("Top {TOP_N} Most Populous Countries in {c} ({year})"),
            ),
        };
        ChartTitles {
            scatter: format!("Life Expectancy vs GDP per Capita ({year})"),
            bar: format!("Top {TOP_N} Countries by GDP per Capita ({year})"),
            line,
            pie,
        }
    }
}

/// Everything the four charts need for one filter selection. Owns fresh
/// copies of the rows it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    pub scatter: Vec<Record>,
    pub bar: Vec<Record>,
    pub line: Vec<LifeExpPoint>,
    pub pie: PieRows,
    pub chart_height: u32,
    pub log_x: bool,
    pub titles: ChartTitles,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Recompute all chart tables for `filter`. Pure: same inputs, same output.
pub fn compute(dataset: &Dataset, filter: &FilterState, heights: &HeightMap) -> DerivedViews {
    let scatter = scope_rows(dataset, filter);
    let bar = top_n_by(&scatter, TOP_N, |r| r.gdp_percap);
    let line = life_exp_trend(dataset, filter.continent);
    let pie = match filter.continent {
        ContinentFilter::All => PieRows::ByContinent(population_by_continent(&scatter)),
        ContinentFilter::Only(_) => PieRows::TopCountries(top_n_by(&scatter, TOP_N, |r| r.pop as f64)),
    };

    log::debug!(
        "views for {:?}: scatter={} bar={} line={} pie={}",
        filter,
        scatter.len(),
        bar.len(),
        line.len(),
        pie.slices().len()
    );

    DerivedViews {
        scatter,
        bar,
        line,
        pie,
        chart_height: heights.height(filter.size),
        log_x: filter.log_x,
        titles: ChartTitles::new(filter),
    }
}

/// The `n` rows with the largest `key`, descending. Equal keys keep their
/// input order.
fn top_n_by(rows: &[Record], n: usize, key: impl Fn(&Record) -> f64) -> Vec<Record> {
    let mut ranked: Vec<&Record> = rows.iter().collect();
    // `sort_by` is stable
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked.into_iter().take(n).cloned().collect()
}

/// Unweighted mean life expectancy per year over the whole dataset, split by
/// continent when all continents are selected. Ignores the year filter.
fn life_exp_trend(dataset: &Dataset, continent: ContinentFilter) -> Vec<LifeExpPoint> {
    let mut groups: BTreeMap<(i32, Option<Continent>), (f64, usize)> = BTreeMap::new();

    for r in dataset.records() {
        let key = match continent {
            ContinentFilter::All => (r.year, Some(r.continent)),
            ContinentFilter::Only(c) if c == r.continent => (r.year, None),
            ContinentFilter::Only(_) => continue,
        };
        let entry = groups.entry(key).or_insert((0.0, 0));
        entry.0 += r.life_exp;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((year, continent), (sum, count))| LifeExpPoint {
            year,
            continent,
            mean_life_exp: sum / count as f64,
        })
        .collect()
}

/// Summed population per continent, largest first.
fn population_by_continent(rows: &[Record]) -> Vec<ContinentPopulation> {
    let mut totals: BTreeMap<Continent, u64> = BTreeMap::new();
    for r in rows {
        *totals.entry(r.continent).or_default() += r.pop;
    }

    let mut out: Vec<ContinentPopulation> = totals
        .into_iter()
        .map(|(continent, pop)| ContinentPopulation { continent, pop })
        .collect();
    out.sort_by(|a, b| b.pop.cmp(&a.pop));
    out
}
