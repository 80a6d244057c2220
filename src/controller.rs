//! Table controller: owns the filter/sort/page/selection state and reruns
//! the filter -> sort -> paginate pipeline after every state change.
//!
//! All transitions are plain methods so the state machine can be driven
//! without a terminal. Each recompute resets the selection to the first
//! row of the page.

use tracing::{debug, warn};

use crate::column::Column;
use crate::data::{Dataset, Row};
use crate::error::TableError;
use crate::filter::{self, FilterSpec, Filters};
use crate::page::{self, PageStep};
use crate::sort::{self, SortState, SortStates};

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Arrow-key direction for selection movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// How the view must scroll so the selected row stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirective {
    #[default]
    None,
    /// Selection wrapped from the last row to the first
    JumpTop,
    /// Selection wrapped from the first row to the last
    JumpBottom,
    /// Scroll down by this many rows
    NudgeDown(usize),
    /// Scroll up by this many rows
    NudgeUp(usize),
}

/// Visible window of body rows below the fixed header, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    /// 0 until the view reports its size
    pub height: usize,
}

impl Viewport {
    /// Scroll needed to show `selected`, given the previously selected row.
    pub fn directive(&self, selected: usize, last: usize, len: usize) -> ScrollDirective {
        if len == 0 {
            return ScrollDirective::None;
        }
        if selected == 0 && last == len - 1 {
            ScrollDirective::JumpTop
        } else if selected == len - 1 && last == 0 {
            ScrollDirective::JumpBottom
        } else if self.height == 0 {
            ScrollDirective::None
        } else if selected >= self.offset + self.height {
            ScrollDirective::NudgeDown(selected + 1 - (self.offset + self.height))
        } else if selected < self.offset {
            ScrollDirective::NudgeUp(self.offset - selected)
        } else {
            ScrollDirective::None
        }
    }

    /// Move the window per `directive`, keeping it inside `len` rows.
    pub fn apply(&mut self, directive: ScrollDirective, len: usize) {
        let max_offset = len.saturating_sub(self.height.max(1));
        self.offset = match directive {
            ScrollDirective::None => self.offset,
            ScrollDirective::JumpTop => 0,
            ScrollDirective::JumpBottom => max_offset,
            ScrollDirective::NudgeDown(n) => self.offset + n,
            ScrollDirective::NudgeUp(n) => self.offset.saturating_sub(n),
        }
        .min(max_offset);
    }
}

/// Everything the view needs to draw one frame.
#[derive(Debug)]
pub struct TableView<'a> {
    pub columns: &'a [Column],
    /// Rows of the current page, in display order
    pub rows: Vec<&'a Row>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// Highlighted position within `rows`
    pub selected_index: usize,
    /// Preview resource of the selected row, empty if none
    pub preview: String,
    pub scroll: ScrollDirective,
    pub viewport: Viewport,
    pub sort_states: SortStates,
    pub filtered_count: usize,
    pub total_count: usize,
}

impl TableView<'_> {
    /// Sort state of the column at position `col`.
    pub fn sort_state_of(&self, col: usize) -> SortState {
        self.sort_states.state(col)
    }
}

/// Owns the widget state and the dataset it pages over.
#[derive(Debug)]
pub struct TableController {
    dataset: Dataset,
    filters: Filters,
    sort_states: SortStates,
    current_page: usize,
    page_size: usize,
    total_pages: usize,
    /// Dataset row indices after filter and sort
    order: Vec<usize>,
    /// Dataset row indices on the current page
    page_rows: Vec<usize>,
    selected_index: usize,
    last_index: usize,
    viewport: Viewport,
    scroll: ScrollDirective,
}

impl TableController {
    /// Build a controller showing page 1 with no filters and no sort.
    pub fn new(dataset: Dataset, page_size: usize) -> Result<Self, TableError> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize(page_size));
        }
        let mut controller = Self {
            dataset,
            filters: Filters::new(),
            sort_states: SortStates::new(),
            current_page: 1,
            page_size,
            total_pages: 1,
            order: Vec::new(),
            page_rows: Vec::new(),
            selected_index: 0,
            last_index: 0,
            viewport: Viewport::default(),
            scroll: ScrollDirective::None,
        };
        controller.recompute();
        Ok(controller)
    }

    fn column_index(&self, key: &str) -> Result<usize, TableError> {
        self.dataset
            .column_index(key)
            .ok_or_else(|| TableError::UnknownColumn(key.to_string()))
    }

    /// Replace the filter on `key` and return to page 1.
    pub fn set_filter(&mut self, key: &str, spec: FilterSpec) -> Result<(), TableError> {
        self.column_index(key)?;
        self.filters.insert(key.to_string(), spec);
        self.current_page = 1;
        self.recompute();
        Ok(())
    }

    /// Remove the filter on `key` and return to page 1.
    pub fn clear_filter(&mut self, key: &str) -> Result<(), TableError> {
        self.column_index(key)?;
        self.filters.remove(key);
        self.current_page = 1;
        self.recompute();
        Ok(())
    }

    /// Apply raw input typed into a column's filter box, parsed according
    /// to the column's filter type. Input that constrains nothing clears it.
    pub fn apply_filter_input(&mut self, key: &str, raw: &str) -> Result<(), TableError> {
        let col = self.column_index(key)?;
        let filter_type = self.dataset.columns[col].filter_type;
        match FilterSpec::parse_input(filter_type, raw) {
            Some(spec) => self.set_filter(key, spec),
            None => self.clear_filter(key),
        }
    }

    /// Clear every filter and return to page 1.
    pub fn reset_filters(&mut self) {
        self.filters.clear();
        self.current_page = 1;
        self.recompute();
    }

    /// Advance `key` through none -> asc -> desc -> none; every other
    /// column goes back to none.
    pub fn cycle_sort(&mut self, key: &str) -> Result<SortState, TableError> {
        let col = self.column_index(key)?;
        let state = self.sort_states.cycle(col);
        debug!(column = key, ?state, "sort cycled");
        self.current_page = 1;
        self.recompute();
        Ok(state)
    }

    /// Change rows per page. Zero is rejected and leaves state unchanged.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), TableError> {
        if page_size == 0 {
            warn!("ignoring page size 0");
            return Err(TableError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.current_page = 1;
        self.recompute();
        Ok(())
    }

    /// Jump to page `n`; out-of-range requests are clamped.
    pub fn go_to_page(&mut self, n: usize) {
        self.current_page = n;
        self.recompute();
    }

    /// Cyclic next/prev page.
    pub fn advance_page(&mut self, step: PageStep) {
        self.current_page = page::step_page(self.current_page, self.total_pages, step);
        self.recompute();
    }

    /// Select the row at `index` within the current page. Out-of-range
    /// indices are ignored and `false` is returned.
    pub fn select_row(&mut self, index: usize) -> bool {
        if index >= self.page_rows.len() {
            return false;
        }
        self.selected_index = index;
        self.update_selection();
        true
    }

    /// Move the selection one row, wrapping within the current page.
    pub fn move_selection(&mut self, direction: Direction) {
        let len = self.page_rows.len();
        if len == 0 {
            return;
        }
        self.selected_index = match direction {
            Direction::Down => (self.selected_index + 1) % len,
            Direction::Up => (self.selected_index + len - 1) % len,
        };
        self.update_selection();
    }

    /// Record how many body rows the view can show and keep the selected
    /// row inside that window.
    pub fn set_viewport_height(&mut self, height: usize) {
        if self.viewport.height == height {
            return;
        }
        self.viewport.height = height;
        let len = self.page_rows.len();
        let directive = self
            .viewport
            .directive(self.selected_index, self.selected_index, len);
        if matches!(directive, ScrollDirective::NudgeDown(_) | ScrollDirective::NudgeUp(_)) {
            self.viewport.apply(directive, len);
        } else {
            self.viewport.apply(ScrollDirective::None, len);
        }
    }

    fn recompute(&mut self) {
        let filtered = filter::filter(&self.dataset.rows, &self.filters, &self.dataset.columns);
        let sorted = sort::sort(&filtered, &self.sort_states);
        self.order = sorted.iter().map(|row| row.index).collect();

        let page = page::paginate(&self.order, self.current_page, self.page_size);
        self.current_page = page.current_page;
        self.total_pages = page.total_pages;
        self.page_rows = page.rows;

        debug!(
            filtered = self.order.len(),
            total = self.dataset.row_count(),
            page = self.current_page,
            pages = self.total_pages,
            "pipeline recomputed"
        );

        self.selected_index = 0;
        self.last_index = 0;
        self.update_selection();
    }

    fn update_selection(&mut self) {
        let len = self.page_rows.len();
        self.scroll = self
            .viewport
            .directive(self.selected_index, self.last_index, len);
        self.viewport.apply(self.scroll, len);
        self.last_index = self.selected_index;
    }

    /// Current frame for the view.
    pub fn view(&self) -> TableView<'_> {
        TableView {
            columns: &self.dataset.columns,
            rows: self.page_rows().collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            page_size: self.page_size,
            selected_index: self.selected_index,
            preview: self.preview(),
            scroll: self.scroll,
            viewport: self.viewport,
            sort_states: self.sort_states,
            filtered_count: self.order.len(),
            total_count: self.dataset.row_count(),
        }
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.page_rows.iter().map(|&i| &self.dataset.rows[i])
    }

    /// Filtered and sorted rows across all pages.
    pub fn ordered_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.order.iter().map(|&i| &self.dataset.rows[i])
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.page_rows
            .get(self.selected_index)
            .map(|&i| &self.dataset.rows[i])
    }

    /// Preview resource of the selected row, empty if none.
    pub fn preview(&self) -> String {
        self.selected_row()
            .map(|row| self.dataset.preview_of(row))
            .unwrap_or_default()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn columns(&self) -> &[Column] {
        &self.dataset.columns
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn filter_for(&self, key: &str) -> Option<&FilterSpec> {
        self.filters.get(key)
    }

    /// Sort state of `key`; unknown keys read as `None`.
    pub fn sort_state(&self, key: &str) -> SortState {
        self.dataset
            .column_index(key)
            .map(|col| self.sort_states.state(col))
            .unwrap_or_default()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn scroll(&self) -> ScrollDirective {
        self.scroll
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn filtered_count(&self) -> usize {
        self.order.len()
    }

    /// Distinct values of a column, used as filter input suggestions.
    pub fn filter_suggestions(&self, key: &str) -> Result<Vec<String>, TableError> {
        let col = self.column_index(key)?;
        Ok(self.dataset.distinct_values(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::FilterType;
    use crate::data::Value;

    fn numbered(rows: usize) -> Dataset {
        let mut data = Dataset::new(
            vec![
                Column::new("id").with_filter_type(FilterType::Range),
                Column::new("img"),
            ],
            (0..rows)
                .map(|i| vec![Value::from(i as i64), Value::Text(format!("img{}.jpg", i))])
                .collect(),
        );
        data.set_preview_column("img").unwrap();
        data
    }

    #[test]
    fn test_initial_state() {
        let ctl = TableController::new(numbered(23), 10).unwrap();
        assert_eq!(ctl.current_page(), 1);
        assert_eq!(ctl.total_pages(), 3);
        assert_eq!(ctl.selected_index(), 0);
        assert_eq!(ctl.page_rows().count(), 10);
        assert_eq!(ctl.preview(), "img0.jpg");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert_eq!(
            TableController::new(numbered(3), 0).unwrap_err(),
            TableError::InvalidPageSize(0)
        );
        let mut ctl = TableController::new(numbered(23), 10).unwrap();
        ctl.go_to_page(2);
        assert!(ctl.set_page_size(0).is_err());
        assert_eq!(ctl.page_size(), 10);
        assert_eq!(ctl.current_page(), 2);
    }

    #[test]
    fn test_unknown_column() {
        let mut ctl = TableController::new(numbered(3), 10).unwrap();
        assert_eq!(
            ctl.cycle_sort("nope"),
            Err(TableError::UnknownColumn("nope".to_string()))
        );
        assert!(ctl.set_filter("nope", FilterSpec::text("x")).is_err());
        assert!(ctl.filters().is_empty());
    }

    #[test]
    fn test_filter_resets_page() {
        let mut ctl = TableController::new(numbered(23), 10).unwrap();
        ctl.go_to_page(3);
        ctl.set_filter("id", FilterSpec::range(Some(5.0), None)).unwrap();
        assert_eq!(ctl.current_page(), 1);
        assert_eq!(ctl.filtered_count(), 18);
    }

    #[test]
    fn test_apply_filter_input_clears_on_empty() {
        let mut ctl = TableController::new(numbered(23), 10).unwrap();
        ctl.apply_filter_input("id", "..4").unwrap();
        assert_eq!(ctl.filtered_count(), 5);
        ctl.apply_filter_input("id", "").unwrap();
        assert_eq!(ctl.filter_for("id"), None);
        assert_eq!(ctl.filtered_count(), 23);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut ctl = TableController::new(numbered(23), 10).unwrap();
        ctl.go_to_page(50);
        assert_eq!(ctl.current_page(), 3);
        assert_eq!(ctl.page_rows().count(), 3);
        ctl.go_to_page(0);
        assert_eq!(ctl.current_page(), 1);
    }

    #[test]
    fn test_select_row_bounds() {
        let mut ctl = TableController::new(numbered(5), 10).unwrap();
        assert!(ctl.select_row(3));
        assert_eq!(ctl.selected_index(), 3);
        assert_eq!(ctl.preview(), "img3.jpg");
        assert!(!ctl.select_row(5));
        assert_eq!(ctl.selected_index(), 3);
    }

    #[test]
    fn test_move_selection_on_empty_page_is_noop() {
        let mut ctl = TableController::new(numbered(5), 10).unwrap();
        ctl.set_filter("id", FilterSpec::range(Some(100.0), None)).unwrap();
        ctl.move_selection(Direction::Down);
        assert_eq!(ctl.selected_index(), 0);
        assert_eq!(ctl.preview(), "");
        assert_eq!(ctl.total_pages(), 1);
    }

    #[test]
    fn test_wrap_directives() {
        let mut ctl = TableController::new(numbered(5), 10).unwrap();
        ctl.set_viewport_height(3);
        ctl.move_selection(Direction::Up);
        assert_eq!(ctl.selected_index(), 4);
        assert_eq!(ctl.scroll(), ScrollDirective::JumpBottom);
        assert_eq!(ctl.viewport().offset, 2);
        ctl.move_selection(Direction::Down);
        assert_eq!(ctl.selected_index(), 0);
        assert_eq!(ctl.scroll(), ScrollDirective::JumpTop);
        assert_eq!(ctl.viewport().offset, 0);
    }

    #[test]
    fn test_nudge_directives() {
        let mut ctl = TableController::new(numbered(6), 10).unwrap();
        ctl.set_viewport_height(2);
        ctl.move_selection(Direction::Down);
        assert_eq!(ctl.scroll(), ScrollDirective::None);
        ctl.move_selection(Direction::Down);
        assert_eq!(ctl.scroll(), ScrollDirective::NudgeDown(1));
        assert_eq!(ctl.viewport().offset, 1);
        ctl.select_row(4);
        assert_eq!(ctl.scroll(), ScrollDirective::NudgeDown(2));
        assert_eq!(ctl.viewport().offset, 3);
        ctl.select_row(1);
        assert_eq!(ctl.scroll(), ScrollDirective::NudgeUp(2));
        assert_eq!(ctl.viewport().offset, 1);
    }

    #[test]
    fn test_recompute_scrolls_back_to_first_row() {
        let mut ctl = TableController::new(numbered(6), 10).unwrap();
        ctl.set_viewport_height(2);
        ctl.select_row(4);
        assert_eq!(ctl.viewport().offset, 3);
        ctl.cycle_sort("id").unwrap();
        assert_eq!(ctl.selected_index(), 0);
        assert_eq!(ctl.scroll(), ScrollDirective::NudgeUp(3));
        assert_eq!(ctl.viewport().offset, 0);
    }

    #[test]
    fn test_viewport_shrink_keeps_selection_visible() {
        let mut ctl = TableController::new(numbered(8), 10).unwrap();
        ctl.set_viewport_height(8);
        ctl.select_row(6);
        assert_eq!(ctl.viewport().offset, 0);
        ctl.set_viewport_height(3);
        assert_eq!(ctl.viewport().offset, 4);
    }

    #[test]
    fn test_filter_suggestions() {
        let ctl = TableController::new(numbered(3), 10).unwrap();
        assert_eq!(
            ctl.filter_suggestions("img").unwrap(),
            vec!["img0.jpg", "img1.jpg", "img2.jpg"]
        );
    }
}
