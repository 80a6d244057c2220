//! Dataset loaders for CSV, JSON and psql-formatted input, plus a
//! generated demo dataset.

use std::path::Path;

use tracing::{debug, info};

use crate::column::{Column, FilterType};
use crate::data::{Dataset, Value};
use crate::error::LoadError;

/// Load a file, choosing the format by extension (`.csv`, `.json`,
/// anything else is read as psql output).
pub fn load_path(path: &Path) -> Result<Dataset, LoadError> {
    let input = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let dataset = match ext.as_deref() {
        Some("csv") => parse_csv(&input)?,
        Some("json") => parse_json(&input)?,
        _ => parse_psql(&input)?,
    };
    info!(
        path = %path.display(),
        columns = dataset.column_count(),
        rows = dataset.row_count(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Parse CSV with a header row. Short records read as missing cells.
pub fn parse_csv(input: &str) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::EmptyInput);
    }

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record?;
        cells.push(record.iter().map(Value::from_raw).collect());
    }

    Ok(Dataset::new(
        headers.into_iter().map(Column::new).collect(),
        cells,
    ))
}

fn json_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

/// Parse a JSON array of objects. Columns are the object keys in
/// first-seen order across all records.
pub fn parse_json(input: &str) -> Result<Dataset, LoadError> {
    let parsed: serde_json::Value = serde_json::from_str(input)?;
    let records = parsed.as_array().ok_or(LoadError::NotAnArray)?;

    let mut keys: Vec<String> = Vec::new();
    for record in records {
        let object = record.as_object().ok_or(LoadError::NotAnArray)?;
        for key in object.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    if keys.is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let cells = records
        .iter()
        .filter_map(|record| record.as_object())
        .map(|object| {
            keys.iter()
                .map(|k| object.get(k).map(json_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(Dataset::new(keys.into_iter().map(Column::new).collect(), cells))
}

/// Parse psql header from the first few lines of output.
///
/// Returns `Some((headers, data_start_index))` where:
/// - `headers` is the parsed column names
/// - `data_start_index` is the line index after the separator where data rows begin
///
/// Returns `None` if headers or separator are missing/malformed.
pub fn parse_psql_header(lines: &[&str]) -> Option<(Vec<String>, usize)> {
    // Find the first non-empty line (header row)
    let (header_idx, header_line) = lines
        .iter()
        .enumerate()
        .find(|(_, line)| !line.trim().is_empty())?;

    let headers: Vec<String> = header_line
        .split('|')
        .map(|s| s.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return None;
    }

    // The next line should be the separator (contains ---)
    let separator_idx = header_idx + 1;
    if !lines.get(separator_idx)?.contains("---") {
        return None;
    }

    Some((headers, separator_idx + 1))
}

/// Parse a single data row from psql output.
///
/// Returns `None` for empty lines and footer lines (e.g., "(2 rows)").
pub fn parse_psql_line(line: &str) -> Option<Vec<Value>> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('(') && trimmed.ends_with(')') && trimmed.contains("row") {
        return None;
    }

    Some(line.split('|').map(Value::from_raw).collect())
}

/// Parse psql output format.
///
/// Expected format:
/// ```text
///  column1  | column2  | column3
/// ----------+----------+---------
///  value1   | value2   | value3
///  value4   | value5   | value6
/// (2 rows)
/// ```
pub fn parse_psql(input: &str) -> Result<Dataset, LoadError> {
    let lines: Vec<&str> = input.lines().collect();
    let (headers, data_start) = parse_psql_header(&lines).ok_or(LoadError::EmptyInput)?;

    let mut cells = Vec::new();
    for line in &lines[data_start..] {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // Stop at footer line
        match parse_psql_line(line) {
            Some(row) => cells.push(row),
            None => break,
        }
    }

    debug!(columns = headers.len(), rows = cells.len(), "parsed psql input");
    Ok(Dataset::new(
        headers.into_iter().map(Column::new).collect(),
        cells,
    ))
}

const DEMO_NAMES: [&str; 5] = ["Alice", "Bob", "Charlie", "David", "Eve"];

/// Position of `img` in the demo columns.
const DEMO_PREVIEW_COLUMN: usize = 4;

/// Deterministic demo table with `id, name, age, score, img` columns.
/// `age` and `score` use range filters and `img` is the preview column.
pub fn demo_dataset(rows: usize) -> Dataset {
    let columns = vec![
        Column::new("id").with_label("ID").with_filter_type(FilterType::Range),
        Column::new("name").with_label("Name"),
        Column::new("age").with_label("Age").with_filter_type(FilterType::Range),
        Column::new("score").with_label("Score").with_filter_type(FilterType::Range),
        Column::new("img").with_label("Image"),
    ];
    let cells = (1..=rows)
        .map(|i| {
            vec![
                Value::from(i as i64),
                Value::from(DEMO_NAMES[(i * 7) % DEMO_NAMES.len()]),
                Value::from((18 + (i * 37) % 50) as i64),
                Value::from(((i * 53 + 11) % 100) as i64),
                Value::Text(format!("img{}.jpg", i % 5 + 1)),
            ]
        })
        .collect();
    Dataset::new(columns, cells).with_preview(DEMO_PREVIEW_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(dataset: &Dataset, row: usize) -> Vec<String> {
        dataset.rows[row].cells.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_simple_table() {
        let input = " id | name  | age
----+-------+-----
 1  | Alice | 30
 2  | Bob   | 25
(2 rows)";

        let table = parse_psql(input).unwrap();
        let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "name", "age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(texts(&table, 0), vec!["1", "Alice", "30"]);
        assert_eq!(texts(&table, 1), vec!["2", "Bob", "25"]);
    }

    #[test]
    fn test_parse_psql_null_cell() {
        let input = " a | b
---+---
 1 |
(1 row)";
        let table = parse_psql(input).unwrap();
        assert_eq!(table.rows[0].value(1), &Value::Null);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse_psql(""), Err(LoadError::EmptyInput)));
        assert!(matches!(parse_psql("   \n  \n  "), Err(LoadError::EmptyInput)));
    }

    #[test]
    fn test_parse_no_separator() {
        let input = " a | b
 1 | 2";
        assert!(parse_psql(input).is_err());
    }

    #[test]
    fn test_parse_empty_table() {
        let input = " id | name
----+------
(0 rows)";
        let table = parse_psql(input).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_parse_with_leading_newlines() {
        let input = "

 a | b
---+---
 1 | 2
(1 rows)";
        let table = parse_psql(input).unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_parse_psql_header_valid() {
        let lines = vec![" id | name  | age", "----+-------+-----", " 1  | Alice | 30"];
        let (headers, data_start_index) = parse_psql_header(&lines).unwrap();
        assert_eq!(headers, vec!["id", "name", "age"]);
        assert_eq!(data_start_index, 2);
    }

    #[test]
    fn test_parse_psql_line_footer() {
        assert!(parse_psql_line("(2 rows)").is_none());
        assert!(parse_psql_line("   ").is_none());
    }

    #[test]
    fn test_parse_csv() {
        let input = "name,size\nreport.pdf,120\nnotes.txt,\nshort\n";
        let table = parse_csv(input).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[0].value(1).as_number(), Some(120.0));
        assert_eq!(table.rows[1].value(1), &Value::Null);
        assert_eq!(table.rows[2].value(1), &Value::Null);
    }

    #[test]
    fn test_parse_json_key_order_and_types() {
        let input = r#"[
            {"id": 1, "name": "Alice", "active": true},
            {"name": "Bob", "id": 2, "img": null, "extra": "x"}
        ]"#;
        let table = parse_json(input).unwrap();
        let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "name", "active", "img", "extra"]);
        assert_eq!(table.rows[0].value(0), &Value::Number(1.0));
        assert_eq!(table.rows[0].value(2), &Value::Text("true".to_string()));
        assert_eq!(table.rows[0].value(4), &Value::Null);
        assert_eq!(table.rows[1].value(3), &Value::Null);
    }

    #[test]
    fn test_parse_json_rejects_non_array() {
        assert!(matches!(parse_json("{\"a\": 1}"), Err(LoadError::NotAnArray)));
        assert!(matches!(parse_json("[1, 2]"), Err(LoadError::NotAnArray)));
        assert!(matches!(parse_json("[]"), Err(LoadError::EmptyInput)));
        assert!(matches!(parse_json("not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_demo_dataset() {
        let data = demo_dataset(50);
        assert_eq!(data.row_count(), 50);
        assert_eq!(data.column_count(), 5);
        assert_eq!(data.preview_column().map(|c| c.key.as_str()), Some("img"));
        assert_eq!(data.preview_of(&data.rows[0]), "img2.jpg");
        for row in &data.rows {
            let age = row.value(2).as_number().unwrap();
            assert!((18.0..68.0).contains(&age));
            let score = row.value(3).as_number().unwrap();
            assert!((0.0..100.0).contains(&score));
        }
    }
}
