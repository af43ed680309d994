use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::aggregate::{
    correlation_matrix, rating_distribution, trend_by_rating, trend_by_year, BoxSummary,
    CorrelationMatrix,
};
use crate::data::filter::{available_years, rating_labels, select_rating, select_year};
use crate::data::model::MovieTable;
use crate::data::stats::{summary, SummaryTable};
use crate::data::store::TableStore;
use crate::export::Exporter;
use crate::error::{ExportError, LoadError};

// ---------------------------------------------------------------------------
// Chart tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    TrendByYear,
    TrendByRating,
    Heatmap,
    Boxplot,
}

impl ChartTab {
    pub const ALL: [ChartTab; 4] = [
        ChartTab::TrendByYear,
        ChartTab::TrendByRating,
        ChartTab::Heatmap,
        ChartTab::Boxplot,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartTab::TrendByYear => "Trend by Year",
            ChartTab::TrendByRating => "Trend by Age Rating",
            ChartTab::Heatmap => "Heatmap",
            ChartTab::Boxplot => "Boxplot",
        }
    }
}

/// Series behind the four charts, derived from one table.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub trend_by_year: Vec<(f64, f64)>,
    pub trend_by_rating: Vec<(String, f64)>,
    pub correlation: CorrelationMatrix,
    pub distribution: Vec<BoxSummary>,
}

impl ChartData {
    pub fn from_table(table: &MovieTable) -> Self {
        Self {
            trend_by_year: trend_by_year(table),
            trend_by_rating: trend_by_rating(table),
            correlation: correlation_matrix(table),
            distribution: rating_distribution(table),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Owner of the loaded table.
    pub store: TableStore,

    /// Table currently on screen (None until a load succeeds).
    pub table: Option<Arc<MovieTable>>,

    /// Year choices and the current pick.
    pub years: Vec<f64>,
    pub selected_year: Option<f64>,

    /// Age-rating choices and the current pick.
    pub rating_labels: Vec<String>,
    pub selected_rating: String,

    /// Row indices for the two selections (derived).
    pub year_rows: Vec<usize>,
    pub rating_rows: Vec<usize>,

    /// Derived tables and chart series.
    pub summary: SummaryTable,
    pub charts: ChartData,
    pub color_map: ColorMap,

    pub show_raw: bool,
    pub active_tab: ChartTab,

    pub exporter: Exporter,

    /// Load error shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: TableStore::new(&config.data.path),
            table: None,
            years: Vec::new(),
            selected_year: None,
            rating_labels: Vec::new(),
            selected_rating: config.data.rating_label.clone(),
            year_rows: Vec::new(),
            rating_rows: Vec::new(),
            summary: SummaryTable::default(),
            charts: ChartData::default(),
            color_map: ColorMap::new(std::iter::empty()),
            show_raw: false,
            active_tab: ChartTab::default(),
            exporter: Exporter::new(config.mongo.clone()),
            status_message: None,
        }
    }

    /// Fetch the table from the store; rebuild derived views if it changed.
    ///
    /// On failure the previous table stays on screen and the error is shown.
    pub fn refresh(&mut self) {
        match self.store.get() {
            Ok(table) => self.show(table),
            Err(e) => self.report(&e),
        }
    }

    /// Open another file. The current table and its source stay in place
    /// unless the new file loads.
    pub fn open(&mut self, path: PathBuf) {
        let mut store = TableStore::new(path);
        match store.get() {
            Ok(table) => {
                self.store = store;
                self.show(table);
            }
            Err(e) => {
                if self.table.is_none() {
                    self.store = store;
                }
                self.report(&e);
            }
        }
    }

    /// Re-read the current file even if it looks unchanged.
    pub fn reload(&mut self) {
        self.store.invalidate();
        self.refresh();
    }

    fn show(&mut self, table: Arc<MovieTable>) {
        let unchanged = self
            .table
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &table));
        if unchanged {
            return;
        }
        log::info!(
            "Loaded {} movies from {} with columns {:?}",
            table.len(),
            self.store.path().display(),
            table.columns
        );
        self.status_message = None;
        self.set_table(table);
    }

    /// Show a load error; logged once per distinct message.
    fn report(&mut self, error: &LoadError) {
        let message = format!("Error: {error}");
        if self.status_message.as_deref() != Some(message.as_str()) {
            log::error!("Failed to load table: {error}");
        }
        self.status_message = Some(message);
    }

    /// Ingest a newly loaded table, keep selections that still apply.
    pub fn set_table(&mut self, table: Arc<MovieTable>) {
        self.years = available_years(&table);
        if !self
            .selected_year
            .is_some_and(|y| self.years.contains(&y))
        {
            self.selected_year = self.years.first().copied();
        }
        self.rating_labels = rating_labels(&table);
        self.summary = summary(&table);
        self.charts = ChartData::from_table(&table);
        self.color_map = ColorMap::new(self.rating_labels.iter().map(String::as_str));
        self.table = Some(table);
        self.reselect();
    }

    pub fn select_year(&mut self, year: f64) {
        self.selected_year = Some(year);
        self.reselect();
    }

    pub fn select_rating(&mut self, label: String) {
        self.selected_rating = label;
        self.reselect();
    }

    /// Recompute the selected rows after a selection change.
    fn reselect(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.year_rows = self
            .selected_year
            .map(|y| select_year(table, y))
            .unwrap_or_default();
        self.rating_rows = select_rating(table, &self.selected_rating);
    }

    /// Request an export; the upload itself runs on the next frame.
    pub fn request_export(&mut self) {
        self.exporter.trigger();
    }

    /// Run a pending export of the whole table. The outcome is recorded on
    /// [`Exporter::status`].
    pub fn run_pending_export(&mut self) {
        if !self.exporter.is_submitting() {
            return;
        }
        let outcome = match self.table.clone() {
            Some(table) => self.exporter.submit(&table),
            None => self.exporter.fail(ExportError::NoTable),
        };
        if let Err(e) = outcome {
            log::debug!("export attempt ended with {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::config::DataConfig;
    use crate::export::ExportStatus;
    use pretty_assertions::assert_eq;

    const MOVIES: &str = "\
Title,Release Year,Fan Rating,Age Rating
The Shawshank Redemption,1994,9.3,R
Forrest Gump,1994,8.1,PG-13
The Dark Knight,2008,9.0,PG-13
Lost Reel,N/A,7.5,PG-13
";

    fn state_for(contents: &str) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("movies.csv");
        fs::write(&path, contents).expect("write");
        let config = AppConfig {
            data: DataConfig {
                path,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut state = AppState::new(&config);
        state.refresh();
        (dir, state)
    }

    #[test]
    fn first_year_is_preselected() {
        let (_dir, state) = state_for(MOVIES);
        assert_eq!(state.years, vec![1994.0, 2008.0]);
        assert_eq!(state.selected_year, Some(1994.0));
        assert_eq!(state.year_rows, vec![0, 1]);
        assert_eq!(state.rating_rows, vec![1, 2, 3]);
    }

    #[test]
    fn missing_year_row_is_kept_in_raw_table_only() {
        let (_dir, state) = state_for(MOVIES);
        let table = state.table.as_ref().expect("table");
        assert_eq!(table.len(), 4);
        let years: Vec<f64> = state.charts.trend_by_year.iter().map(|t| t.0).collect();
        assert_eq!(years, vec![1994.0, 2008.0]);
    }

    #[test]
    fn changing_selection_rederives_rows() {
        let (_dir, mut state) = state_for(MOVIES);
        state.select_year(2008.0);
        assert_eq!(state.year_rows, vec![2]);
        state.select_rating("R".into());
        assert_eq!(state.rating_rows, vec![0]);
    }

    #[test]
    fn failed_open_keeps_previous_table_and_source() {
        let (dir, mut state) = state_for(MOVIES);
        let source = dir.path().join("movies.csv");

        state.open(dir.path().join("gone.csv"));
        assert!(state.status_message.is_some());
        assert_eq!(state.table.as_ref().map(|t| t.len()), Some(4));
        assert_eq!(state.store.path(), source.as_path());

        // The next frame keeps both the table and the error.
        state.refresh();
        assert!(state.status_message.is_some());
        assert_eq!(state.store.path(), source.as_path());
    }

    #[test]
    fn successful_open_switches_source() {
        let (dir, mut state) = state_for(MOVIES);
        let other = dir.path().join("other.csv");
        fs::write(&other, "Title,Release Year,Fan Rating,Age Rating\nAlien,1979,8.5,R\n")
            .expect("write");

        state.open(dir.path().join("gone.csv"));
        state.open(other.clone());
        assert_eq!(state.store.path(), other.as_path());
        assert_eq!(state.table.as_ref().map(|t| t.len()), Some(1));
        assert_eq!(state.years, vec![1979.0]);
        assert_eq!(state.selected_year, Some(1979.0));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn export_without_target_fails_inline() {
        let (_dir, mut state) = state_for(MOVIES);
        state.run_pending_export();
        assert_eq!(state.exporter.status(), &ExportStatus::Idle);

        state.request_export();
        state.run_pending_export();
        assert!(matches!(state.exporter.status(), ExportStatus::Failed(_)));
    }
}
