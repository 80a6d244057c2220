//! Application state for the terminal front end.
//!
//! Wraps the [`TableController`] with the UI-only bits: input mode, the
//! input buffer, column focus and the body area used for mouse hit tests.

use ratatui::layout::Rect;

use crate::controller::TableController;

/// Application mode for handling different input states.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppMode {
    Normal,        // Regular table navigation
    FilterInput,   // '/' pressed, editing the focused column's filter
    PageInput,     // ':' pressed, entering a page number
    PageSizeInput, // 'z' pressed, entering rows per page
}

/// Terminal UI state around the controller.
#[derive(Debug)]
pub struct App {
    pub controller: TableController,
    pub mode: AppMode,
    pub input_buffer: String,
    /// Column that sort/filter keys act on
    pub focused_col: usize,
    pub status_message: Option<String>,
    /// Screen area of the table body rows in the last frame
    pub body_area: Rect,
    /// Position in the focused column's suggestions while cycling with Tab
    pub suggestion_idx: Option<usize>,
}

impl App {
    pub fn new(controller: TableController) -> Self {
        Self {
            controller,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            focused_col: 0,
            status_message: None,
            body_area: Rect::default(),
            suggestion_idx: None,
        }
    }

    /// Key of the focused column.
    pub fn focused_key(&self) -> Option<String> {
        self.controller
            .columns()
            .get(self.focused_col)
            .map(|c| c.key.clone())
    }

    /// Switch mode, starting with an empty input buffer.
    pub fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
        self.input_buffer.clear();
        self.suggestion_idx = None;
    }
}
