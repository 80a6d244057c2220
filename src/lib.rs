//! Terminal table pager: per-column filtering, single-column tri-state
//! sorting, pagination and row selection with a preview panel.
//!
//! The filter -> sort -> paginate stages are pure functions over borrowed
//! rows; [`TableController`] owns the state and reruns them on every change.

pub mod column;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod load;
pub mod logging;
pub mod page;
pub mod render;
pub mod sort;
pub mod state;

pub use column::{Column, FilterType};
pub use controller::{Direction, ScrollDirective, TableController, TableView, Viewport};
pub use data::{Dataset, Row, Value};
pub use error::{LoadError, TableError};
pub use filter::{FilterSpec, Filters};
pub use page::{Page, PageStep};
pub use sort::{SortState, SortStates};
