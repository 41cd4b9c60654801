use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data::cache::DatasetCache;
use crate::data::filter::{FilterState, filter_table};
use crate::data::loader::load_dataset;
use crate::data::model::Table;
use crate::data::options::FilterOptions;
use crate::data::report::DatasetReport;

/// Rows shown in the commodity ranking until the user moves the slider.
const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Ranking,
    Statistics,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Cleaned tables of every source opened so far.
    cache: DatasetCache,

    /// Source of the current dataset (None until a file is opened).
    pub source: Option<PathBuf>,

    /// Cleaned dataset; shared read-only with the cache.
    pub dataset: Arc<Table>,

    pub report: Option<DatasetReport>,

    /// Candidate values of each filter control.
    pub options: FilterOptions,

    /// Current filter selections.
    pub filters: FilterState,

    /// Rows passing the current filters.
    pub filtered: Table,

    /// Charts and tables of `filtered`.
    pub dashboard: Dashboard,

    /// How many ranked commodities the user asked for; may exceed the
    /// current ranking.  Read through `shown_top_n`.
    pub top_n: usize,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            source: None,
            dataset: Arc::new(Table::default()),
            report: None,
            options: FilterOptions::default(),
            filters: FilterState::default(),
            filtered: Table::default(),
            dashboard: Dashboard::empty(),
            top_n: DEFAULT_TOP_N,
            tab: Tab::Overview,
            status_message: None,
        }
    }

    /// Load `path` (from cache when unchanged) and make it the current
    /// dataset.  On failure the dashboard continues with an empty table and
    /// the error is kept as the status message.
    pub fn open(&mut self, path: &Path) {
        let config = &self.config;
        let loaded = self.cache.get_or_load(path, |p| load_dataset(p, config));
        self.source = Some(path.to_path_buf());
        log::debug!("{} dataset(s) cached", self.cache.len());

        match loaded {
            Ok(dataset) => {
                self.status_message = None;
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.set_dataset(Arc::new(Table::default()));
            }
        }
    }

    /// Ingest a cleaned dataset, initialise options and default selections.
    pub fn set_dataset(&mut self, dataset: Arc<Table>) {
        let report = DatasetReport::from_table(&dataset);
        log::debug!("\n{report}");
        self.report = Some(report);

        self.options = FilterOptions::from_table(&dataset);
        self.filters = FilterState {
            cities: self.options.default_cities(&self.config.default_cities),
            states: Default::default(),
            years: self.options.default_years(),
        };
        self.dataset = dataset;
        self.refilter();
    }

    /// Recompute the filtered view and every dashboard section.
    pub fn refilter(&mut self) {
        self.filtered = filter_table(&self.dataset, &self.filters);
        self.dashboard = Dashboard::compute(&self.filtered, &self.config);
        log::debug!(
            "Recomputed dashboard: {} of {} rows selected",
            self.filtered.len(),
            self.dataset.len()
        );
    }

    /// Number of ranked commodities; upper bound of the ranking slider.
    pub fn ranking_len(&self) -> usize {
        self.dashboard.ranking.ready().map_or(0, Vec::len)
    }

    /// Rows of the ranking actually listed: the requested count, capped by
    /// the current ranking length.
    pub fn shown_top_n(&self) -> usize {
        self.top_n.min(self.ranking_len())
    }

    pub fn toggle_city(&mut self, city: &str) {
        toggle(&mut self.filters.cities, city.to_string());
        self.refilter();
    }

    pub fn toggle_state(&mut self, state: &str) {
        toggle(&mut self.filters.states, state.to_string());
        self.refilter();
    }

    pub fn toggle_year(&mut self, year: i64) {
        toggle(&mut self.filters.years, year);
        self.refilter();
    }

    pub fn clear_cities(&mut self) {
        self.filters.cities.clear();
        self.refilter();
    }

    pub fn clear_states(&mut self) {
        self.filters.states.clear();
        self.refilter();
    }

    pub fn clear_years(&mut self) {
        self.filters.years.clear();
        self.refilter();
    }

    pub fn select_all_years(&mut self) {
        self.filters.years = self.options.default_years();
        self.refilter();
    }
}

fn toggle<T: Ord>(set: &mut std::collections::BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "City,Economic Block,Year,US$ FOB,Net Weight,SH2 Description,SH4 Description\n\
        Franca - SP,European Union,2021,1500,10,Footwear,Leather shoes\n\
        Alfenas - MG,European Union,2021,900,30,Coffee,Roasted coffee\n\
        Franca - SP,European Union,2022,2500,12,Footwear,Leather shoes\n\
        Alfenas - MG,Europe,2022,400,5,Coffee,Green coffee\n\
        Campinas - SP,European Union,2022,700,2,Machinery,Pumps\n";

    fn csv_file() -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(CSV.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_open_applies_default_selection() {
        let f = csv_file();
        let mut state = AppState::default();
        state.open(f.path());

        assert!(state.status_message.is_none());
        assert_eq!(state.dataset.len(), 4);
        // Only Alfenas of the two default cities is present.
        assert_eq!(state.filters.cities.len(), 1);
        assert_eq!(state.filters.years.len(), 2);
        assert!(state.filters.states.is_empty());
        assert_eq!(state.filtered.len(), 1);
    }

    #[test]
    fn test_clearing_a_filter_widens_the_view() {
        let f = csv_file();
        let mut state = AppState::default();
        state.open(f.path());
        state.clear_cities();
        assert_eq!(state.filtered.len(), 4);

        state.toggle_state("SP");
        assert_eq!(state.filtered.len(), 3);
        state.toggle_year(2021);
        assert_eq!(state.filtered.len(), 2);
        state.toggle_state("SP");
        assert_eq!(state.filtered.len(), 2);
        state.select_all_years();
        assert_eq!(state.filtered.len(), 4);
        // source table is never narrowed
        assert_eq!(state.dataset.len(), 4);
    }

    #[test]
    fn test_top_n_stays_within_ranking() {
        let f = csv_file();
        let mut state = AppState::default();
        state.open(f.path());
        state.clear_cities();
        assert_eq!(state.ranking_len(), 3);
        assert_eq!(state.shown_top_n(), 3);
    }

    #[test]
    fn test_top_n_recovers_after_narrow_filter() {
        let f = csv_file();
        let mut state = AppState::default();
        state.open(f.path());
        state.clear_cities();
        state.top_n = 3;

        state.toggle_city("Campinas - SP");
        assert_eq!(state.ranking_len(), 1);
        assert_eq!(state.shown_top_n(), 1);

        state.clear_cities();
        assert_eq!(state.top_n, 3);
        assert_eq!(state.shown_top_n(), 3);
    }

    #[test]
    fn test_missing_file_leaves_empty_dashboard() {
        let mut state = AppState::default();
        state.open(Path::new("/no/such/exports.csv"));
        let msg = state.status_message.clone().unwrap();
        assert!(msg.contains("/no/such/exports.csv"));
        assert!(state.dataset.is_empty());
        assert_eq!(state.dashboard, Dashboard::empty());
        assert_eq!(state.ranking_len(), 0);
    }
}
