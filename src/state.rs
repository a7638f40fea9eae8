use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{ContinentFilter, FilterState, SizeCategory};
use crate::data::model::Dataset;
use crate::data::views::{compute, DerivedViews};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Arc<Dataset>>,

    /// Current control selection.
    pub filter: FilterState,

    /// Chart tables for `filter` (cached until the next change).
    pub views: Option<DerivedViews>,

    pub config: DashboardConfig,

    /// Shared by every chart so a continent has one colour everywhere.
    pub continent_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            dataset: None,
            filter: FilterState {
                year: config.default_year.unwrap_or(crate::data::model::LAST_YEAR),
                continent: config.default_continent.parse().unwrap_or_default(),
                size: config.default_size.parse().unwrap_or_default(),
                log_x: config.default_log_x,
            },
            views: None,
            config,
            continent_colors: ColorMap::continents(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset the controls to the defaults.
    pub fn set_dataset(&mut self, dataset: Dataset) -> Result<()> {
        self.filter = FilterState::initial(&dataset, &self.config)?;
        self.dataset = Some(Arc::new(dataset));
        self.status_message = None;
        self.refresh();
        Ok(())
    }

    /// Load a file and make it the current dataset, keeping the error for the
    /// status line on failure.
    pub fn open(&mut self, path: &Path) {
        let result = crate::data::loader::load_file(path).and_then(|ds| self.set_dataset(ds));
        if let Err(e) = result {
            log::error!("Failed to load {}: {e:#}", path.display());
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    /// Recompute the chart tables after a control change.
    pub fn refresh(&mut self) {
        self.views = self
            .dataset
            .as_deref()
            .map(|ds| compute(ds, &self.filter, &self.config.heights));
    }

    pub fn set_year(&mut self, year: i32) {
        if self.filter.year != year {
            self.filter.year = year;
            self.refresh();
        }
    }

    pub fn set_continent(&mut self, continent: ContinentFilter) {
        if self.filter.continent != continent {
            self.filter.continent = continent;
            self.refresh();
        }
    }

    pub fn set_size(&mut self, size: SizeCategory) {
        if self.filter.size != size {
            self.filter.size = size;
            self.refresh();
        }
    }

    pub fn set_log_x(&mut self, log_x: bool) {
        if self.filter.log_x != log_x {
            self.filter.log_x = log_x;
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::Continent;

    fn loaded() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        let ds = Dataset::from_records(vec![
            record("Chile", Continent::Americas, 2002, 77.9, 15_497_046, 10_778.8),
            record("Chile", Continent::Americas, 2007, 78.6, 16_284_741, 13_171.6),
            record("Kenya", Continent::Africa, 2007, 54.1, 35_610_177, 1_463.2),
        ])
        .unwrap();
        state.set_dataset(ds).unwrap();
        state
    }

    #[test]
    fn test_no_views_without_dataset() {
        let mut state = AppState::new(DashboardConfig::default());
        state.refresh();
        assert!(state.views.is_none());
    }

    #[test]
    fn test_control_changes_recompute_views() {
        let mut state = loaded();
        assert_eq!(state.views.as_ref().unwrap().scatter.len(), 2);

        state.set_year(2002);
        assert_eq!(state.views.as_ref().unwrap().scatter.len(), 1);

        state.set_continent(ContinentFilter::Only(Continent::Africa));
        assert!(state.views.as_ref().unwrap().scatter.is_empty());
        assert_eq!(state.views.as_ref().unwrap().line.len(), 1);

        state.set_size(SizeCategory::Large);
        assert_eq!(state.views.as_ref().unwrap().chart_height, 800);

        state.set_log_x(false);
        assert!(!state.views.as_ref().unwrap().log_x);
    }

    #[test]
    fn test_open_missing_file_sets_status() {
        let mut state = loaded();
        state.open(Path::new("/nonexistent/gapminder.csv"));
        assert!(state.status_message.is_some());
        // Previous dataset stays usable.
        assert!(state.views.is_some());
    }
}
