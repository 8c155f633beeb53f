use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::catalog::{AttributeCatalog, FilterOptions, SheetSection, filter_options, player_sheet, rankable_attributes};
use crate::config::ScoutConfig;
use crate::dataset::{Descriptions, LoadOutcome};
use crate::error::ScoutError;
use crate::export::{export_csv, export_file_name, export_xlsx};
use crate::filter::{AgeRange, AttributeRanges, IdentificationCriteria, TextMatch, search};
use crate::ranking::{RankOptions, Ranking, TOP_N_CHOICES, rank_with};
use crate::session::ScoutSession;
use crate::table::{PlayerRecord, WorkingTable};

const MINUTES_STEP: f64 = 90.0;
const SLIDER_STEPS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Scout,
    Rankings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoutFocus {
    Filters,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Xlsx,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiSelect {
    pub options: Vec<String>,
    pub selected: BTreeSet<usize>,
    pub cursor: usize,
}

impl MultiSelect {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            selected: BTreeSet::new(),
            cursor: 0,
        }
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let total = self.options.len();
        if total == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor as i64 + delta as i64).rem_euclid(total as i64) as usize;
    }

    pub fn toggle(&mut self) {
        if self.cursor >= self.options.len() {
            return;
        }
        if !self.selected.remove(&self.cursor) {
            self.selected.insert(self.cursor);
        }
    }

    pub fn values(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|idx| self.options.get(*idx).cloned())
            .collect()
    }

    pub fn current(&self) -> Option<&str> {
        self.options.get(self.cursor).map(String::as_str)
    }

    pub fn summary(&self) -> String {
        if self.selected.is_empty() {
            "any".to_string()
        } else {
            self.values().join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub column: String,
    pub label: String,
    pub category: &'static str,
    pub max: f64,
    pub lo: f64,
    pub hi: f64,
}

impl Slider {
    fn step(&self) -> f64 {
        self.max / SLIDER_STEPS
    }

    pub fn adjust(&mut self, delta: i32, lower: bool) {
        let step = self.step() * delta as f64;
        if lower {
            self.lo = (self.lo + step).clamp(0.0, self.hi);
        } else {
            self.hi = (self.hi + step).clamp(self.lo, self.max);
        }
    }

    pub fn is_default(&self) -> bool {
        self.lo <= 0.0 && self.hi >= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    AgeMin,
    AgeMax,
    Nationality,
    Position,
    Club,
    Slider(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterForm {
    pub age_bounds: (u32, u32),
    pub age: (u32, u32),
    pub nationality: MultiSelect,
    pub position: MultiSelect,
    pub club: MultiSelect,
    pub sliders: Vec<Slider>,
    pub text_match: TextMatch,
    pub cursor: usize,
}

impl FilterForm {
    pub fn new(options: FilterOptions, catalog: &AttributeCatalog) -> Self {
        let age_bounds = options.age_bounds.unwrap_or((0, 0));
        let sliders = catalog
            .categories()
            .iter()
            .flat_map(|group| {
                group.attributes.iter().map(move |a| Slider {
                    column: a.column.clone(),
                    label: a.label.clone(),
                    category: group.name,
                    max: a.max,
                    lo: 0.0,
                    hi: a.max,
                })
            })
            .collect();
        Self {
            age_bounds,
            age: age_bounds,
            nationality: MultiSelect::new(options.nationalities),
            position: MultiSelect::new(options.positions),
            club: MultiSelect::new(options.clubs),
            sliders,
            text_match: TextMatch::default(),
            cursor: 0,
        }
    }

    pub fn fields(&self) -> Vec<FilterField> {
        let mut out = vec![
            FilterField::AgeMin,
            FilterField::AgeMax,
            FilterField::Nationality,
            FilterField::Position,
            FilterField::Club,
        ];
        out.extend((0..self.sliders.len()).map(FilterField::Slider));
        out
    }

    pub fn current_field(&self) -> FilterField {
        self.fields()
            .get(self.cursor)
            .copied()
            .unwrap_or(FilterField::AgeMin)
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let total = self.fields().len() as i64;
        self.cursor = (self.cursor as i64 + delta as i64).rem_euclid(total) as usize;
    }

    /// `h/l` (lower = false) and `H/L` (lower = true) on the focused field.
    pub fn adjust(&mut self, delta: i32, lower: bool) {
        let (min_age, max_age) = self.age_bounds;
        match self.current_field() {
            FilterField::AgeMin => {
                self.age.0 = (self.age.0 as i64 + delta as i64).clamp(min_age as i64, self.age.1 as i64) as u32;
            }
            FilterField::AgeMax => {
                self.age.1 = (self.age.1 as i64 + delta as i64).clamp(self.age.0 as i64, max_age as i64) as u32;
            }
            FilterField::Nationality => self.nationality.move_cursor(delta),
            FilterField::Position => self.position.move_cursor(delta),
            FilterField::Club => self.club.move_cursor(delta),
            FilterField::Slider(idx) => {
                if let Some(slider) = self.sliders.get_mut(idx) {
                    slider.adjust(delta, lower);
                }
            }
        }
    }

    pub fn toggle_option(&mut self) {
        match self.current_field() {
            FilterField::Nationality => self.nationality.toggle(),
            FilterField::Position => self.position.toggle(),
            FilterField::Club => self.club.toggle(),
            _ => {}
        }
    }

    pub fn toggle_text_match(&mut self) {
        self.text_match = match self.text_match {
            TextMatch::Substring => TextMatch::Token,
            TextMatch::Token => TextMatch::Substring,
        };
    }

    pub fn identification(&self) -> IdentificationCriteria {
        let age = (self.age != self.age_bounds).then(|| AgeRange::new(self.age.0, self.age.1));
        IdentificationCriteria {
            age,
            nationalities: self.nationality.values(),
            positions: self.position.values(),
            clubs: self.club.values().into_iter().collect(),
            text_match: self.text_match,
        }
    }

    pub fn ranges(&self, catalog: &AttributeCatalog) -> Result<AttributeRanges, ScoutError> {
        AttributeRanges::from_sliders(
            catalog,
            self.sliders
                .iter()
                .map(|s| (s.column.as_str(), s.lo, s.hi)),
        )
    }

    pub fn reset(&mut self) {
        self.age = self.age_bounds;
        self.nationality.selected.clear();
        self.position.selected.clear();
        self.club.selected.clear();
        for slider in &mut self.sliders {
            slider.lo = 0.0;
            slider.hi = slider.max;
        }
        self.text_match = TextMatch::default();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingsView {
    pub attributes: Vec<String>,
    pub selected: usize,
    pub top_n_idx: usize,
    pub min_minutes: f64,
    pub result: Option<Ranking>,
    pub error: Option<String>,
}

impl RankingsView {
    fn new(attributes: Vec<String>, cfg: &ScoutConfig) -> Self {
        let selected = attributes
            .iter()
            .position(|a| *a == cfg.default_attribute)
            .unwrap_or(0);
        let top_n_idx = TOP_N_CHOICES
            .iter()
            .position(|n| *n == cfg.top_n)
            .unwrap_or(1);
        Self {
            attributes,
            selected,
            top_n_idx,
            min_minutes: cfg.min_minutes,
            result: None,
            error: None,
        }
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attributes.get(self.selected).map(String::as_str)
    }

    pub fn top_n(&self) -> usize {
        TOP_N_CHOICES[self.top_n_idx % TOP_N_CHOICES.len()]
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    pub table: WorkingTable,
    pub catalog: AttributeCatalog,
    pub descriptions: Descriptions,
    pub data_date: Option<String>,
    pub load_error: Option<String>,
    pub form: FilterForm,
    pub session: ScoutSession,
    pub focus: ScoutFocus,
    pub result_selected: usize,
    pub sheet_open: bool,
    pub rankings: RankingsView,
    pub rank_options: RankOptions,
}

impl AppState {
    pub fn new(
        loaded: LoadOutcome,
        descriptions: Descriptions,
        data_date: Option<String>,
        cfg: &ScoutConfig,
    ) -> Self {
        let table = loaded.table;
        let catalog = AttributeCatalog::build(&table);
        let form = FilterForm::new(filter_options(&table), &catalog);
        let rank_options = cfg.rank_options();
        let excluded: Vec<&str> = rank_options.excluded.iter().map(String::as_str).collect();
        let rankings = RankingsView::new(rankable_attributes(&table, &excluded), cfg);

        let mut state = Self {
            screen: Screen::Scout,
            help_overlay: false,
            logs: VecDeque::new(),
            table,
            catalog,
            descriptions,
            data_date,
            load_error: loaded.diagnostic,
            form,
            session: ScoutSession::new(),
            focus: ScoutFocus::Filters,
            result_selected: 0,
            sheet_open: false,
            rankings,
            rank_options,
        };
        if let Some(err) = state.load_error.clone() {
            state.push_log(format!("[WARN] {err}"));
        }
        state.refresh_ranking();
        state
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn has_data(&self) -> bool {
        self.load_error.is_none() && !self.table.is_empty()
    }

    pub fn run_search(&mut self) {
        if !self.has_data() {
            self.push_log("[WARN] No data loaded; search unavailable");
            return;
        }
        let outcome = self
            .form
            .ranges(&self.catalog)
            .and_then(|ranges| search(&self.table, &self.form.identification(), &ranges));
        match outcome {
            Ok(results) => {
                let found = results.len();
                self.session.apply_search(results);
                self.result_selected = 0;
                self.sheet_open = false;
                if found == 0 {
                    self.push_log("[WARN] No players found for the selected filters");
                } else {
                    self.push_log(format!("[INFO] Found {found} players"));
                    self.focus = ScoutFocus::Results;
                }
            }
            Err(err) => self.push_log(format!("[WARN] Search failed: {err}")),
        }
    }

    pub fn clear_search(&mut self) {
        self.session.clear();
        self.form.reset();
        self.result_selected = 0;
        self.sheet_open = false;
        self.focus = ScoutFocus::Filters;
        self.push_log("[INFO] Filters and results cleared");
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ScoutFocus::Filters if self.session.result_count() > 0 => ScoutFocus::Results,
            _ => ScoutFocus::Filters,
        };
    }

    pub fn page_rows(&self) -> Vec<usize> {
        self.session.current_page().rows.to_vec()
    }

    pub fn next_page(&mut self) {
        self.session.next_page();
        self.result_selected = 0;
        self.sheet_open = false;
    }

    pub fn prev_page(&mut self) {
        self.session.prev_page();
        self.result_selected = 0;
        self.sheet_open = false;
    }

    pub fn select_result_next(&mut self) {
        let total = self.page_rows().len();
        if total == 0 {
            self.result_selected = 0;
            return;
        }
        self.result_selected = (self.result_selected + 1) % total;
    }

    pub fn select_result_prev(&mut self) {
        let total = self.page_rows().len();
        if total == 0 {
            self.result_selected = 0;
            return;
        }
        if self.result_selected == 0 {
            self.result_selected = total - 1;
        } else {
            self.result_selected -= 1;
        }
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.page_rows().get(self.result_selected).copied()
    }

    pub fn selected_player(&self) -> Option<&PlayerRecord> {
        self.selected_row().and_then(|row| self.table.row(row))
    }

    pub fn toggle_sheet(&mut self) {
        self.sheet_open = !self.sheet_open && self.selected_row().is_some();
    }

    pub fn selected_sheet(&self) -> Vec<SheetSection> {
        match self.selected_row() {
            Some(row) => player_sheet(&self.table, &self.catalog, row),
            None => Vec::new(),
        }
    }

    pub fn focused_description(&self) -> Option<&str> {
        match self.form.current_field() {
            FilterField::Slider(idx) => self
                .form
                .sliders
                .get(idx)
                .map(|s| self.descriptions.get(&s.column)),
            _ => None,
        }
    }

    /// Writes the current results into `dir` and reports the written path.
    pub fn export_results(&mut self, kind: ExportKind, dir: &Path, today: NaiveDate) -> Option<PathBuf> {
        let Some(results) = self.session.results.as_ref().filter(|r| !r.is_empty()) else {
            self.push_log("[INFO] Nothing to export yet");
            return None;
        };
        let (ext, written) = match kind {
            ExportKind::Csv => {
                let path = dir.join(export_file_name(today, "csv"));
                let res = export_csv(&self.table, results)
                    .and_then(|bytes| fs::write(&path, bytes).context("write csv file"))
                    .map(|_| path);
                ("csv", res)
            }
            ExportKind::Xlsx => {
                let path = dir.join(export_file_name(today, "xlsx"));
                let res: Result<PathBuf> = export_xlsx(&path, &self.table, results).map(|_| path);
                ("xlsx", res)
            }
        };
        match written {
            Ok(path) => {
                self.push_log(format!("[INFO] Exported {ext} to {}", path.display()));
                Some(path)
            }
            Err(err) => {
                self.push_log(format!("[WARN] Export failed: {err:#}"));
                None
            }
        }
    }

    pub fn refresh_ranking(&mut self) {
        let Some(attribute) = self.rankings.attribute().map(str::to_string) else {
            self.rankings.result = None;
            self.rankings.error = None;
            return;
        };
        match rank_with(
            &self.table,
            &attribute,
            self.rankings.min_minutes,
            self.rankings.top_n(),
            &self.rank_options,
        ) {
            Ok(ranking) => {
                self.rankings.result = Some(ranking);
                self.rankings.error = None;
            }
            Err(err) => {
                self.rankings.result = None;
                self.rankings.error = Some(err.to_string());
                self.push_log(format!("[WARN] Ranking failed: {err}"));
            }
        }
    }

    pub fn cycle_rank_attribute(&mut self, delta: i32) {
        let total = self.rankings.attributes.len();
        if total == 0 {
            return;
        }
        self.rankings.selected =
            (self.rankings.selected as i64 + delta as i64).rem_euclid(total as i64) as usize;
        self.refresh_ranking();
    }

    pub fn cycle_top_n(&mut self) {
        self.rankings.top_n_idx = (self.rankings.top_n_idx + 1) % TOP_N_CHOICES.len();
        self.refresh_ranking();
    }

    pub fn adjust_min_minutes(&mut self, steps: i32) {
        self.rankings.min_minutes = (self.rankings.min_minutes + MINUTES_STEP * steps as f64).max(0.0);
        self.refresh_ranking();
    }
}

/// Writes the export next to the working directory the app was started from.
pub fn export_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_select_wraps_and_toggles() {
        let mut select = MultiSelect::new(vec!["Brazil".into(), "Ghana".into(), "Mali".into()]);
        select.move_cursor(-1);
        assert_eq!(select.current(), Some("Mali"));
        select.toggle();
        select.move_cursor(1);
        select.toggle();
        assert_eq!(select.values(), vec!["Brazil", "Mali"]);
        assert_eq!(select.summary(), "Brazil, Mali");
        select.toggle();
        assert_eq!(select.values(), vec!["Mali"]);
    }

    #[test]
    fn slider_bounds_never_cross() {
        let mut slider = Slider {
            column: "Shooting_goals".into(),
            label: "Goals".into(),
            category: "SHOOTING",
            max: 20.0,
            lo: 0.0,
            hi: 20.0,
        };
        assert!(slider.is_default());
        slider.adjust(3, true);
        assert_eq!(slider.lo, 3.0);
        slider.adjust(-30, false);
        assert_eq!(slider.hi, 3.0);
        slider.adjust(-10, true);
        assert_eq!(slider.lo, 0.0);
        assert!(!slider.is_default());
    }
}
