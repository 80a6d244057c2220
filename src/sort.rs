//! Single-column tri-state sorting.
//!
//! At most one column is sorted at a time. Empty cells order first, then
//! values that parse as finite numbers (compared numerically), then text.
//! Numeric-ness is checked per cell, not per column.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::data::{Row, Value};

/// Sort direction of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortState {
    #[default]
    None,
    Asc,
    Desc,
}

impl SortState {
    /// Next state in the `None -> Asc -> Desc -> None` cycle.
    pub fn next(self) -> Self {
        match self {
            SortState::None => SortState::Asc,
            SortState::Asc => SortState::Desc,
            SortState::Desc => SortState::None,
        }
    }

    /// Header indicator glyphs.
    pub fn indicator(self) -> &'static str {
        match self {
            SortState::None => "△▽",
            SortState::Asc => "▲▽",
            SortState::Desc => "△▼",
        }
    }
}

/// Sort state of every column, stored as the single active column if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortStates {
    /// (column position, Asc or Desc); never holds `SortState::None`
    active: Option<(usize, SortState)>,
}

impl SortStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, col: usize) -> SortState {
        match self.active {
            Some((c, state)) if c == col => state,
            _ => SortState::None,
        }
    }

    /// The sorted column and its direction.
    pub fn active(&self) -> Option<(usize, SortState)> {
        self.active
    }

    /// Set one column's state. A non-`None` state clears every other column.
    pub fn set(&mut self, col: usize, state: SortState) {
        match state {
            SortState::None => {
                if matches!(self.active, Some((c, _)) if c == col) {
                    self.active = None;
                }
            }
            _ => self.active = Some((col, state)),
        }
    }

    /// Advance `col` to its next state, resetting all others. Returns the new state.
    pub fn cycle(&mut self, col: usize) -> SortState {
        let next = self.state(col).next();
        self.active = None;
        self.set(col, next);
        next
    }
}

/// Primary collation key: accents stripped via NFD, then lowercased.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Lowercase sorts before uppercase for the same letter.
fn case_key(c: char) -> (bool, char) {
    (!c.is_lowercase(), c)
}

/// Locale-like text ordering: accent- and case-insensitive first, then
/// lowercase before uppercase, then raw bytes.
fn text_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| a.chars().map(case_key).cmp(b.chars().map(case_key)))
        .then_with(|| a.cmp(b))
}

/// Ascending comparison of two cell values: empty cells first, then
/// numbers, then text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => return Ordering::Equal,
        (Value::Null, _) => return Ordering::Less,
        (_, Value::Null) => return Ordering::Greater,
        _ => {}
    }
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => text_cmp(&a.to_string(), &b.to_string()),
    }
}

/// Order rows by the active column. With no active column the input order
/// is returned unchanged. The sort is stable.
pub fn sort<'a>(rows: &[&'a Row], sort_states: &SortStates) -> Vec<&'a Row> {
    let mut sorted = rows.to_vec();
    let Some((col, state)) = sort_states.active() else {
        return sorted;
    };
    match state {
        SortState::Asc => sorted.sort_by(|a, b| compare_values(a.value(col), b.value(col))),
        SortState::Desc => sorted.sort_by(|a, b| compare_values(b.value(col), a.value(col))),
        SortState::None => {}
    }
    sorted
}
