//! Column definitions and the static per-column filter kind.

use serde::Deserialize;

/// How a column's filter input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Case-insensitive substring match
    #[default]
    Match,
    /// Case-insensitive prefix match
    Prefix,
    /// Inclusive numeric bounds
    Range,
    /// Exact match against one of the column's values
    Select,
}

impl FilterType {
    /// Short marker shown in the filter row next to an active filter.
    pub fn marker(self) -> &'static str {
        match self {
            FilterType::Match => "~",
            FilterType::Prefix => "^",
            FilterType::Range => "#",
            FilterType::Select => "=",
        }
    }
}

/// A table column: `key` addresses a row field, `label` is display text.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub filter_type: FilterType,
}

impl Column {
    /// Column labelled with its own key and a substring filter.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            filter_type: FilterType::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }
}

/// Position of the column with the given key.
pub fn position(columns: &[Column], key: &str) -> Option<usize> {
    columns.iter().position(|c| c.key == key)
}
