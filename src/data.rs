//! Dataset types: scalar cell values, rows and the loaded table.

use std::collections::HashSet;
use std::fmt;

use crate::column::{self, Column, FilterType};
use crate::error::TableError;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    /// Missing or empty cell
    Null,
}

static NULL: Value = Value::Null;

impl Value {
    /// Build a value from raw text input. Empty (after trimming) is `Null`,
    /// anything else is kept verbatim as text.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Value::Null
        } else {
            Value::Text(trimmed.to_string())
        }
    }

    /// Numeric coercion: numbers as-is, text parsed after trimming.
    /// Returns `None` unless the result is finite.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
            Value::Null => return None,
        };
        n.is_finite().then_some(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

/// One record. `index` is its position in the source dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: usize,
    pub cells: Vec<Value>,
}

impl Row {
    /// Cell at column position `col`; short rows read as `Null`.
    pub fn value(&self, col: usize) -> &Value {
        self.cells.get(col).unwrap_or(&NULL)
    }
}

/// The loaded table. Rows are never mutated after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    /// Column holding each row's preview resource
    preview: Option<usize>,
}

impl Dataset {
    /// Create a dataset, numbering rows by their input position.
    pub fn new(columns: Vec<Column>, cells: Vec<Vec<Value>>) -> Self {
        let rows = cells
            .into_iter()
            .enumerate()
            .map(|(index, cells)| Row { index, cells })
            .collect();
        Self {
            columns,
            rows,
            preview: None,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        column::position(&self.columns, key)
    }

    fn require_column(&self, key: &str) -> Result<usize, TableError> {
        self.column_index(key)
            .ok_or_else(|| TableError::UnknownColumn(key.to_string()))
    }

    /// Use `key` as the preview column.
    pub fn set_preview_column(&mut self, key: &str) -> Result<(), TableError> {
        self.preview = Some(self.require_column(key)?);
        Ok(())
    }

    /// Use the column at position `col` as the preview column.
    pub fn with_preview(mut self, col: usize) -> Self {
        self.preview = Some(col);
        self
    }

    pub fn preview_column(&self) -> Option<&Column> {
        self.preview.and_then(|i| self.columns.get(i))
    }

    pub fn set_filter_type(&mut self, key: &str, filter_type: FilterType) -> Result<(), TableError> {
        let idx = self.require_column(key)?;
        self.columns[idx].filter_type = filter_type;
        Ok(())
    }

    pub fn set_label(&mut self, key: &str, label: &str) -> Result<(), TableError> {
        let idx = self.require_column(key)?;
        self.columns[idx].label = label.to_string();
        Ok(())
    }

    /// Preview resource of a row, empty if there is none.
    pub fn preview_of(&self, row: &Row) -> String {
        self.preview
            .map(|col| row.value(col).to_string())
            .unwrap_or_default()
    }

    /// Distinct stringified values of a column in first-seen order.
    pub fn distinct_values(&self, col: usize) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|row| row.value(col).to_string())
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }
}
