use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::io::{self, Read};

use crate::dataset::{
    DefaultCategoryDataset, DefaultSliceDataset, IntervalXyCollection, IntervalXyItem, XySeries,
    XySeriesCollection,
};

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

pub fn read_csv<R: Read>(input: R) -> Result<CsvData> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    log::debug!("read {} CSV rows with headers {:?}", rows.len(), headers);
    Ok(CsvData { headers, rows })
}

pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin().lock())
}

pub fn parse_column_selector(input: &str) -> ColumnSelector {
    match input.parse::<usize>() {
        Ok(index) => ColumnSelector::Index(index),
        Err(_) => ColumnSelector::Name(input.to_string()),
    }
}

/// Resolve a selector to (index, header name).
fn resolve_column(data: &CsvData, selector: &ColumnSelector) -> Result<(usize, String)> {
    match selector {
        ColumnSelector::Index(idx) => {
            if *idx >= data.headers.len() {
                return Err(anyhow!(
                    "Column index {} out of bounds (available columns: {})",
                    idx,
                    data.headers.len()
                ));
            }
            Ok((*idx, data.headers[*idx].clone()))
        }
        ColumnSelector::Name(name) => {
            let idx = data
                .headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    anyhow!(
                        "Column '{}' not found. Available columns: {}",
                        name,
                        data.headers.join(", ")
                    )
                })?;
            Ok((idx, data.headers[idx].clone()))
        }
    }
}

fn cells<'a>(data: &'a CsvData, column_index: usize) -> Result<Vec<&'a str>> {
    data.rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            row.get(column_index).map(|s| s.as_str()).ok_or_else(|| {
                anyhow!(
                    "Row {} has only {} columns, expected at least {}",
                    row_idx + 1,
                    row.len(),
                    column_index + 1
                )
            })
        })
        .collect()
}

fn parse_number(value_str: &str, column_name: &str, row_idx: usize) -> Result<f64> {
    value_str.trim().parse::<f64>().with_context(|| {
        format!(
            "Failed to parse value '{}' as number in column '{}' at row {}",
            value_str,
            column_name,
            row_idx + 1
        )
    })
}

/// A numeric column where every cell must hold a number.
pub fn extract_column(data: &CsvData, selector: &ColumnSelector) -> Result<(String, Vec<f64>)> {
    let (column_index, column_name) = resolve_column(data, selector)?;
    let values = cells(data, column_index)?
        .into_iter()
        .enumerate()
        .map(|(row_idx, s)| parse_number(s, &column_name, row_idx))
        .collect::<Result<Vec<_>>>()?;
    Ok((column_name, values))
}

/// A numeric column where empty cells are missing values.
pub fn extract_optional_column(
    data: &CsvData,
    selector: &ColumnSelector,
) -> Result<(String, Vec<Option<f64>>)> {
    let (column_index, column_name) = resolve_column(data, selector)?;
    let values = cells(data, column_index)?
        .into_iter()
        .enumerate()
        .map(|(row_idx, s)| {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                parse_number(s, &column_name, row_idx).map(Some)
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((column_name, values))
}

pub fn extract_column_as_string(
    data: &CsvData,
    selector: &ColumnSelector,
) -> Result<(String, Vec<String>)> {
    let (column_index, column_name) = resolve_column(data, selector)?;
    let values = cells(data, column_index)?
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    Ok((column_name, values))
}

// =============================================================================
// Dataset builders
// =============================================================================

/// One series per y column, keyed by the column header, in file order.
pub fn series_from_csv(
    data: &CsvData,
    x: &ColumnSelector,
    ys: &[ColumnSelector],
) -> Result<XySeriesCollection> {
    let (_, x_values) = extract_column(data, x)?;
    let mut collection = XySeriesCollection::new();
    for y in ys {
        let (name, y_values) = extract_optional_column(data, y)?;
        let mut series = XySeries::unsorted(name);
        for (&xv, yv) in x_values.iter().zip(y_values) {
            series.add(xv, yv);
        }
        collection
            .add_series(series)
            .context("Failed to add series")?;
    }
    Ok(collection)
}

/// Start and end columns of an interval around the x or the y value.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalColumns {
    pub start: ColumnSelector,
    pub end: ColumnSelector,
}

fn interval_bounds(
    data: &CsvData,
    columns: Option<&IntervalColumns>,
) -> Result<Option<(Vec<Option<f64>>, Vec<Option<f64>>)>> {
    let Some(columns) = columns else {
        return Ok(None);
    };
    let (_, start) = extract_optional_column(data, &columns.start)?;
    let (_, end) = extract_optional_column(data, &columns.end)?;
    Ok(Some((start, end)))
}

/// A single interval series keyed by the y column header. Missing cells read
/// as NaN; an absent interval collapses onto the value.
pub fn interval_series_from_csv(
    data: &CsvData,
    x: &ColumnSelector,
    y: &ColumnSelector,
    x_interval: Option<&IntervalColumns>,
    y_interval: Option<&IntervalColumns>,
) -> Result<IntervalXyCollection> {
    let (_, x_values) = extract_column(data, x)?;
    let (name, y_values) = extract_optional_column(data, y)?;
    let x_bounds = interval_bounds(data, x_interval)?;
    let y_bounds = interval_bounds(data, y_interval)?;

    let nan = |v: Option<f64>| v.unwrap_or(f64::NAN);
    let items = (0..x_values.len())
        .map(|i| {
            let mut item = IntervalXyItem::point(x_values[i], nan(y_values[i]));
            if let Some((start, end)) = &x_bounds {
                item = item.with_x_interval(nan(start[i]), nan(end[i]));
            }
            if let Some((start, end)) = &y_bounds {
                item = item.with_y_interval(nan(start[i]), nan(end[i]));
            }
            item
        })
        .collect();

    let mut collection = IntervalXyCollection::new();
    collection
        .add_series(&name, items)
        .context("Failed to add interval series")?;
    Ok(collection)
}

/// A table with one row per value column and one column per category.
pub fn category_from_csv(
    data: &CsvData,
    category: &ColumnSelector,
    values: &[ColumnSelector],
) -> Result<DefaultCategoryDataset> {
    let (_, categories) = extract_column_as_string(data, category)?;
    let mut dataset = DefaultCategoryDataset::new();
    for selector in values {
        let (row_key, cells) = extract_optional_column(data, selector)?;
        for (i, (column_key, value)) in categories.iter().zip(cells).enumerate() {
            if categories[..i].contains(column_key) {
                log::warn!(
                    "Category '{}' repeats at row {}; keeping the later value",
                    column_key,
                    i + 1
                );
            }
            dataset.add_value(value, &row_key, column_key);
        }
    }
    Ok(dataset)
}

/// A slice dataset from a key column and a value column.
pub fn slice_from_csv(
    data: &CsvData,
    key: &ColumnSelector,
    value: &ColumnSelector,
) -> Result<DefaultSliceDataset> {
    let (_, keys) = extract_column_as_string(data, key)?;
    let (_, values) = extract_optional_column(data, value)?;
    let mut dataset = DefaultSliceDataset::new();
    for (k, v) in keys.iter().zip(values) {
        if dataset.keys().any(|existing| existing == k.as_str()) {
            log::warn!("Key '{}' repeats; keeping the later value", k);
        }
        dataset.set_value(k, v);
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CategoryDataset, SeriesDataset, SliceDataset};
    use std::io::Cursor;

    fn csv_from_string(content: &str) -> Result<CsvData> {
        read_csv(Cursor::new(content))
    }

    fn name(s: &str) -> ColumnSelector {
        ColumnSelector::Name(s.to_string())
    }

    #[test]
    fn test_parse_column_selector_by_index() {
        assert_eq!(parse_column_selector("0"), ColumnSelector::Index(0));
        assert_eq!(parse_column_selector("42"), ColumnSelector::Index(42));
    }

    #[test]
    fn test_parse_column_selector_by_name() {
        assert_eq!(parse_column_selector("temperature"), name("temperature"));
        assert_eq!(parse_column_selector("col_name"), name("col_name"));
    }

    #[test]
    fn test_extract_column_by_name() {
        let csv = csv_from_string("x,y,z\n1,10,100\n2,20,200\n3,30,300").unwrap();
        let (col, values) = extract_column(&csv, &name("y")).unwrap();
        assert_eq!(col, "y");
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_extract_column_by_index() {
        let csv = csv_from_string("x,y,z\n1,10,100\n2,20,200").unwrap();
        let (col, values) = extract_column(&csv, &ColumnSelector::Index(2)).unwrap();
        assert_eq!(col, "z");
        assert_eq!(values, vec![100.0, 200.0]);
    }

    #[test]
    fn test_extract_column_case_insensitive() {
        let csv = csv_from_string("temperature,humidity\n20.5,60\n22.0,55").unwrap();
        let (col, values) = extract_column(&csv, &name("Temperature")).unwrap();
        assert_eq!(col, "temperature"); // Returns actual header case
        assert_eq!(values, vec![20.5, 22.0]);
    }

    #[test]
    fn test_extract_column_not_found() {
        let csv = csv_from_string("x,y\n1,10").unwrap();
        let result = extract_column(&csv, &name("nonexistent"));
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_extract_column_index_out_of_bounds() {
        let csv = csv_from_string("x,y\n1,10").unwrap();
        let result = extract_column(&csv, &ColumnSelector::Index(99));
        assert!(result.unwrap_err().to_string().contains("out of bounds"));
    }

    #[test]
    fn test_extract_column_missing_value() {
        let csv = csv_from_string("x,y\n1,10\n2,\n3,30").unwrap();
        let result = extract_column(&csv, &name("y"));
        assert!(result.unwrap_err().to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_extract_optional_column() {
        let csv = csv_from_string("x,y\n1,10\n2,\n3, 30 \n4,NaN").unwrap();
        let (_, values) = extract_optional_column(&csv, &name("y")).unwrap();
        assert_eq!(values[..3], [Some(10.0), None, Some(30.0)]);
        assert!(values[3].unwrap().is_nan());

        let bad = csv_from_string("x,y\n1,ten").unwrap();
        assert!(extract_optional_column(&bad, &name("y")).is_err());
    }

    #[test]
    fn test_read_csv_short_row() {
        let result = csv_from_string("x,y,z\n1,10,100\n2,20");
        assert!(result.unwrap_err().to_string().contains("record"));
    }

    #[test]
    fn test_read_csv_empty_data() {
        let result = csv_from_string("x,y\n");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least one data row"));
    }

    #[test]
    fn test_read_csv_unicode() {
        let csv = csv_from_string("x,température\n1,20.5\n2,22.0").unwrap();
        assert_eq!(csv.headers, vec!["x", "température"]);
        assert_eq!(csv.rows.len(), 2);
    }

    #[test]
    fn test_series_from_csv() {
        let csv = csv_from_string("x,a,b\n1,100,103\n2,101,\n3,102,105").unwrap();
        let c = series_from_csv(&csv, &name("x"), &[name("a"), name("b")]).unwrap();
        assert_eq!(c.series_count(), 2);
        assert_eq!(c.series_key(1), "b");
        assert!(c.y_value(1, 1).is_nan());
        assert_eq!(c.x_value(0, 2), 3.0);
    }

    #[test]
    fn test_series_from_csv_rejects_repeated_column() {
        let csv = csv_from_string("x,a\n1,2").unwrap();
        assert!(series_from_csv(&csv, &name("x"), &[name("a"), name("A")]).is_err());
    }

    #[test]
    fn test_interval_series_from_csv() {
        let csv = csv_from_string("x,lo,hi,y\n1,0.9,1.1,5\n2,1.9,,6").unwrap();
        let columns = IntervalColumns {
            start: name("lo"),
            end: name("hi"),
        };
        let c = interval_series_from_csv(&csv, &name("x"), &name("y"), Some(&columns), None)
            .unwrap();
        let interval = c.as_interval().unwrap();
        assert_eq!(interval.start_x_value(0, 0), 0.9);
        assert!(interval.end_x_value(0, 1).is_nan());
        assert_eq!(interval.start_y_value(0, 1), 6.0);
        assert_eq!(c.series_key(0), "y");
    }

    #[test]
    fn test_category_from_csv() {
        let csv = csv_from_string("quarter,north,south\nQ1,1,3\nQ2,,4").unwrap();
        let t = category_from_csv(&csv, &name("quarter"), &[name("north"), name("south")])
            .unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.row_key(0), "north");
        assert_eq!(t.column_key(1), "Q2");
        assert_eq!(t.value(0, 1), None);
        assert_eq!(t.value(1, 1), Some(4.0));
    }

    #[test]
    fn test_slice_from_csv() {
        let csv = csv_from_string("name,share\nA,1\nB,\nA,3").unwrap();
        let d = slice_from_csv(&csv, &name("name"), &name("share")).unwrap();
        assert_eq!(d.item_count(), 2);
        assert_eq!(d.value_for("A"), Some(3.0));
        assert_eq!(d.value_for("B"), None);
    }
}
