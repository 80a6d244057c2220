//! Per-column row filtering.
//!
//! A row passes when it satisfies every column that has an active filter.
//! How a text filter matches depends on the column's static [`FilterType`].

use std::collections::HashMap;

use crate::column::{Column, FilterType};
use crate::data::{Row, Value};

/// Active matching condition for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    Text(String),
    /// Inclusive bounds; `None` is unbounded on that side
    Range { min: Option<f64>, max: Option<f64> },
}

/// Filters keyed by column key. Absent key = no constraint.
pub type Filters = HashMap<String, FilterSpec>;

impl FilterSpec {
    pub fn text(text: impl Into<String>) -> Self {
        FilterSpec::Text(text.into())
    }

    /// Range filter. NaN bounds are treated as unbounded.
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        FilterSpec::Range {
            min: min.filter(|v| !v.is_nan()),
            max: max.filter(|v| !v.is_nan()),
        }
    }

    /// Whether this filter constrains anything at all.
    pub fn is_active(&self) -> bool {
        match self {
            FilterSpec::Text(text) => !text.is_empty(),
            FilterSpec::Range { min, max } => min.is_some() || max.is_some(),
        }
    }

    /// Parse raw filter input for a column of the given type.
    ///
    /// Returns `None` when the input imposes no constraint, so the caller
    /// clears the filter. Range input accepts `min..max`, `min..`, `..max`
    /// or a single number (a lower bound); a side that does not parse is
    /// unbounded.
    pub fn parse_input(filter_type: FilterType, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let spec = match filter_type {
            FilterType::Range => {
                let (min, max) = match raw.split_once("..") {
                    Some((lo, hi)) => (parse_bound(lo), parse_bound(hi)),
                    None => (parse_bound(raw), None),
                };
                FilterSpec::range(min, max)
            }
            FilterType::Match | FilterType::Prefix | FilterType::Select => FilterSpec::text(raw),
        };
        spec.is_active().then_some(spec)
    }

    /// Short human-readable form for the filter row.
    pub fn summary(&self, filter_type: FilterType) -> String {
        match self {
            FilterSpec::Text(text) => format!("{}{}", filter_type.marker(), text),
            FilterSpec::Range { min, max } => {
                let fmt = |b: &Option<f64>| b.map(|v| v.to_string()).unwrap_or_default();
                format!("{}..{}", fmt(min), fmt(max))
            }
        }
    }
}

fn parse_bound(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// A filter resolved against a column position, text pre-lowercased.
enum Predicate {
    Contains(String),
    Prefix(String),
    Equals(String),
    Range { min: Option<f64>, max: Option<f64> },
}

impl Predicate {
    fn new(spec: &FilterSpec, filter_type: FilterType) -> Option<Self> {
        if !spec.is_active() {
            return None;
        }
        Some(match spec {
            FilterSpec::Text(text) => match filter_type {
                FilterType::Prefix => Predicate::Prefix(text.to_lowercase()),
                FilterType::Select => Predicate::Equals(text.clone()),
                FilterType::Match | FilterType::Range => Predicate::Contains(text.to_lowercase()),
            },
            FilterSpec::Range { min, max } => Predicate::Range {
                min: *min,
                max: *max,
            },
        })
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Predicate::Contains(needle) => value.to_string().to_lowercase().contains(needle.as_str()),
            Predicate::Prefix(needle) => value.to_string().to_lowercase().starts_with(needle.as_str()),
            Predicate::Equals(expected) => value.to_string() == *expected,
            Predicate::Range { min, max } => {
                // Cells that do not coerce to a number fail any active bound
                let Some(n) = value.as_number() else {
                    return false;
                };
                min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
            }
        }
    }
}

/// Keep the rows that satisfy every active column filter, in input order.
pub fn filter<'a, I>(rows: I, filters: &Filters, columns: &[Column]) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let predicates: Vec<(usize, Predicate)> = columns
        .iter()
        .enumerate()
        .filter_map(|(i, col)| {
            let spec = filters.get(&col.key)?;
            Predicate::new(spec, col.filter_type).map(|p| (i, p))
        })
        .collect();

    rows.into_iter()
        .filter(|row| predicates.iter().all(|(col, p)| p.matches(row.value(*col))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;

    fn people() -> Dataset {
        Dataset::new(
            vec![
                Column::new("name"),
                Column::new("age").with_filter_type(FilterType::Range),
                Column::new("city").with_filter_type(FilterType::Prefix),
            ],
            vec![
                vec!["Alice".into(), 30i64.into(), "New York".into()],
                vec!["Bob".into(), 25i64.into(), "Seattle".into()],
                vec!["alice".into(), "28".into(), "Newark".into()],
                vec!["Carol".into(), "unknown".into(), "Boston".into()],
            ],
        )
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.value(0).to_string()).collect()
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let data = people();
        let out = filter(&data.rows, &Filters::new(), &data.columns);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_text_filter_case_insensitive_substring() {
        let data = people();
        let mut filters = Filters::new();
        filters.insert("name".to_string(), FilterSpec::text("LIC"));
        let out = filter(&data.rows, &filters, &data.columns);
        assert_eq!(names(&out), vec!["Alice", "alice"]);
    }

    #[test]
    fn test_empty_text_imposes_nothing() {
        let data = people();
        let mut filters = Filters::new();
        filters.insert("name".to_string(), FilterSpec::text(""));
        assert_eq!(filter(&data.rows, &filters, &data.columns).len(), 4);
    }

    #[test]
    fn test_prefix_column() {
        let data = people();
        let mut filters = Filters::new();
        filters.insert("city".to_string(), FilterSpec::text("new"));
        let out = filter(&data.rows, &filters, &data.columns);
        assert_eq!(names(&out), vec!["Alice", "alice"]);

        filters.insert("city".to_string(), FilterSpec::text("york"));
        assert!(filter(&data.rows, &filters, &data.columns).is_empty());
    }

    #[test]
    fn test_range_filter_coerces_text_and_excludes_non_numeric() {
        let data = people();
        let mut filters = Filters::new();
        filters.insert("age".to_string(), FilterSpec::range(Some(26.0), None));
        let out = filter(&data.rows, &filters, &data.columns);
        assert_eq!(names(&out), vec!["Alice", "alice"]);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let data = people();
        let mut filters = Filters::new();
        filters.insert("age".to_string(), FilterSpec::range(Some(25.0), Some(28.0)));
        let out = filter(&data.rows, &filters, &data.columns);
        assert_eq!(names(&out), vec!["Bob", "alice"]);
    }

    #[test]
    fn test_upper_bound_only() {
        let data = people();
        let mut filters = Filters::new();
        filters.insert("age".to_string(), FilterSpec::range(None, Some(28.0)));
        let out = filter(&data.rows, &filters, &data.columns);
        assert_eq!(names(&out), vec!["Bob", "alice"]);
    }

    #[test]
    fn test_unbounded_range_keeps_non_numeric() {
        let data = people();
        let mut filters = Filters::new();
        filters.insert("age".to_string(), FilterSpec::range(None, None));
        assert_eq!(filter(&data.rows, &filters, &data.columns).len(), 4);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let data = people();
        let mut filters = Filters::new();
        filters.insert("name".to_string(), FilterSpec::text("ali"));
        filters.insert("age".to_string(), FilterSpec::range(None, Some(29.0)));
        let out = filter(&data.rows, &filters, &data.columns);
        assert_eq!(names(&out), vec!["alice"]);
    }

    #[test]
    fn test_select_is_exact() {
        let mut data = people();
        data.set_filter_type("name", FilterType::Select).unwrap();
        let mut filters = Filters::new();
        filters.insert("name".to_string(), FilterSpec::text("Alice"));
        let out = filter(&data.rows, &filters, &data.columns);
        assert_eq!(names(&out), vec!["Alice"]);
    }

    #[test]
    fn test_unknown_filter_key_is_ignored() {
        let data = people();
        let mut filters = Filters::new();
        filters.insert("nope".to_string(), FilterSpec::text("zzz"));
        assert_eq!(filter(&data.rows, &filters, &data.columns).len(), 4);
    }

    #[test]
    fn test_nan_bound_is_unbounded() {
        assert_eq!(
            FilterSpec::range(Some(f64::NAN), Some(3.0)),
            FilterSpec::Range {
                min: None,
                max: Some(3.0)
            }
        );
    }

    #[test]
    fn test_parse_range_input() {
        let parse = |s| FilterSpec::parse_input(FilterType::Range, s);
        assert_eq!(parse("10..20"), Some(FilterSpec::range(Some(10.0), Some(20.0))));
        assert_eq!(parse("50.."), Some(FilterSpec::range(Some(50.0), None)));
        assert_eq!(parse("..-2.5"), Some(FilterSpec::range(None, Some(-2.5))));
        assert_eq!(parse("7"), Some(FilterSpec::range(Some(7.0), None)));
        assert_eq!(parse("abc..9"), Some(FilterSpec::range(None, Some(9.0))));
        assert_eq!(parse("abc"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_parse_text_input() {
        assert_eq!(
            FilterSpec::parse_input(FilterType::Match, "  ali "),
            Some(FilterSpec::text("ali"))
        );
        assert_eq!(FilterSpec::parse_input(FilterType::Prefix, "   "), None);
    }

    #[test]
    fn test_summary() {
        assert_eq!(FilterSpec::text("ali").summary(FilterType::Match), "~ali");
        assert_eq!(
            FilterSpec::range(Some(50.0), None).summary(FilterType::Range),
            "50.."
        );
    }
}
