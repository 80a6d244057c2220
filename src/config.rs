//! Command line options and the optional JSON table configuration file.
//!
//! Settings are resolved from the file first and then overridden by flags.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::column::FilterType;
use crate::controller::DEFAULT_PAGE_SIZE;
use crate::data::Dataset;
use crate::error::{LoadError, TableError};

/// Interactive table pager with per-column filters, sorting and paging.
#[derive(Parser, Debug, Default)]
#[command(name = "tpg", version, about)]
pub struct Cli {
    /// CSV, JSON or psql-formatted file (psql output is read from stdin when omitted)
    pub file: Option<PathBuf>,

    /// Open a generated demo dataset
    #[arg(long, conflicts_with = "file")]
    pub demo: bool,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Columns filtered by numeric range (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub range: Vec<String>,

    /// Columns filtered by case-insensitive prefix (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub prefix: Vec<String>,

    /// Columns filtered by exact value (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Column holding each row's preview resource
    #[arg(long)]
    pub preview: Option<String>,

    /// JSON table configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log file path (defaults to table-pager.log in the working directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG is used otherwise
    #[arg(long)]
    pub log_level: Option<tracing::Level>,
}

/// Contents of the `--config` file.
///
/// ```json
/// { "page_size": 20, "preview": "img",
///   "filter_types": { "score": "range" }, "labels": { "score": "Score" } }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub page_size: Option<usize>,
    pub preview: Option<String>,
    pub filter_types: HashMap<String, FilterType>,
    pub labels: HashMap<String, String>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Effective table settings after merging file and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub page_size: usize,
    pub preview: Option<String>,
    pub filter_types: Vec<(String, FilterType)>,
    pub labels: Vec<(String, String)>,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: FileConfig) -> Self {
        let mut filter_types: Vec<(String, FilterType)> = file.filter_types.into_iter().collect();
        // Stable order so later flags win deterministically
        filter_types.sort_by(|a, b| a.0.cmp(&b.0));
        for (keys, filter_type) in [
            (&cli.range, FilterType::Range),
            (&cli.prefix, FilterType::Prefix),
            (&cli.select, FilterType::Select),
        ] {
            filter_types.extend(keys.iter().map(|k| (k.trim().to_string(), filter_type)));
        }

        let mut labels: Vec<(String, String)> = file.labels.into_iter().collect();
        labels.sort();

        Self {
            page_size: cli
                .page_size
                .or(file.page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            preview: cli.preview.clone().or(file.preview),
            filter_types,
            labels,
        }
    }

    /// Configure the dataset's columns. Unknown column keys are an error.
    pub fn apply(&self, dataset: &mut Dataset) -> Result<(), TableError> {
        for (key, filter_type) in &self.filter_types {
            dataset.set_filter_type(key, *filter_type)?;
        }
        for (key, label) in &self.labels {
            dataset.set_label(key, label)?;
        }
        if let Some(preview) = &self.preview {
            dataset.set_preview_column(preview)?;
        }
        Ok(())
    }
}
