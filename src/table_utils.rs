//! Helpers over whole tables: totals, cumulative percentages, sampling a
//! function into a series, building tables from arrays, and emptiness
//! checks.

use std::collections::HashSet;

use crate::dataset::{
    CategoryDataset, DefaultCategoryDataset, DefaultSliceDataset, SeriesDataset, SliceDataset,
    XySeries,
};
use crate::error::{DatasetError, Result};

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

fn check_column<D: CategoryDataset + ?Sized>(dataset: &D, column: usize) -> Result<()> {
    if column >= dataset.column_count() {
        return Err(DatasetError::InvalidArgument(format!(
            "column index {} out of range (columns: {})",
            column,
            dataset.column_count()
        )));
    }
    Ok(())
}

fn check_row<D: CategoryDataset + ?Sized>(dataset: &D, row: usize) -> Result<()> {
    if row >= dataset.row_count() {
        return Err(DatasetError::InvalidArgument(format!(
            "row index {} out of range (rows: {})",
            row,
            dataset.row_count()
        )));
    }
    Ok(())
}

/// Sum of one column, skipping missing and NaN cells.
pub fn calculate_column_total<D: CategoryDataset + ?Sized>(dataset: &D, column: usize) -> Result<f64> {
    check_column(dataset, column)?;
    Ok((0..dataset.row_count())
        .filter_map(|row| present(dataset.value(row, column)))
        .sum())
}

/// Sum of one column over the listed rows only. Row indices past the end of
/// the table are ignored.
pub fn calculate_column_total_for_rows<D: CategoryDataset + ?Sized>(
    dataset: &D,
    column: usize,
    rows: &[usize],
) -> Result<f64> {
    check_column(dataset, column)?;
    Ok(rows
        .iter()
        .filter(|&&row| row < dataset.row_count())
        .filter_map(|&row| present(dataset.value(row, column)))
        .sum())
}

/// Sum of one row, skipping missing and NaN cells.
pub fn calculate_row_total<D: CategoryDataset + ?Sized>(dataset: &D, row: usize) -> Result<f64> {
    check_row(dataset, row)?;
    Ok((0..dataset.column_count())
        .filter_map(|column| present(dataset.value(row, column)))
        .sum())
}

/// Sum of one row over the listed columns only. Column indices past the end
/// of the table are ignored.
pub fn calculate_row_total_for_columns<D: CategoryDataset + ?Sized>(
    dataset: &D,
    row: usize,
    columns: &[usize],
) -> Result<f64> {
    check_row(dataset, row)?;
    Ok(columns
        .iter()
        .filter(|&&column| column < dataset.column_count())
        .filter_map(|&column| present(dataset.value(row, column)))
        .sum())
}

/// Running share of the total at each entry, in entry order.
///
/// Missing values add nothing but still get an entry. Fails with
/// `DegenerateInput` when the values sum to zero.
pub fn cumulative_percentages<D: SliceDataset + ?Sized>(data: &D) -> Result<DefaultSliceDataset> {
    let total: f64 = (0..data.item_count())
        .filter_map(|i| present(data.value(i)))
        .sum();
    if total == 0.0 {
        return Err(DatasetError::DegenerateInput(
            "cumulative percentages of values summing to zero".to_string(),
        ));
    }

    let mut result = DefaultSliceDataset::new();
    let mut running_total = 0.0;
    for i in 0..data.item_count() {
        if let Some(v) = present(data.value(i)) {
            running_total += v;
        }
        result.set_value(data.key(i), running_total / total);
    }
    Ok(result)
}

/// Sample `f` at `samples` evenly spaced points from `start` to `end`
/// inclusive.
pub fn sample_function<F>(
    f: F,
    start: f64,
    end: f64,
    samples: usize,
    series_key: &str,
) -> Result<XySeries>
where
    F: Fn(f64) -> f64,
{
    if samples < 2 {
        return Err(DatasetError::DegenerateInput(format!(
            "need at least 2 samples, got {}",
            samples
        )));
    }
    if !(start < end) {
        return Err(DatasetError::DegenerateInput(format!(
            "sampling requires start < end, got [{}, {}]",
            start, end
        )));
    }

    let step = (end - start) / (samples - 1) as f64;
    let mut series = XySeries::new(series_key);
    for i in 0..samples {
        let x = start + step * i as f64;
        series.add(x, f(x));
    }
    Ok(series)
}

/// Build a table from row-major data, naming rows `{row_prefix}1..` and
/// columns `{column_prefix}1..`.
pub fn create_category_dataset(
    row_prefix: &str,
    column_prefix: &str,
    data: &[Vec<f64>],
) -> DefaultCategoryDataset {
    let mut dataset = DefaultCategoryDataset::new();
    for (r, row) in data.iter().enumerate() {
        let row_key = format!("{}{}", row_prefix, r + 1);
        for (c, value) in row.iter().enumerate() {
            let column_key = format!("{}{}", column_prefix, c + 1);
            dataset.add_value(*value, &row_key, &column_key);
        }
    }
    dataset
}

fn check_unique(keys: &[&str], what: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(*key) {
            return Err(DatasetError::InvalidArgument(format!(
                "duplicate {} key '{}'",
                what, key
            )));
        }
    }
    Ok(())
}

/// Build a table from row-major data with explicit keys.
///
/// There must be one row key per data row, and as many column keys as the
/// longest data row has values. Keys must be unique.
pub fn create_category_dataset_with_keys(
    row_keys: &[&str],
    column_keys: &[&str],
    data: &[Vec<f64>],
) -> Result<DefaultCategoryDataset> {
    check_unique(row_keys, "row")?;
    check_unique(column_keys, "column")?;
    if row_keys.len() != data.len() {
        return Err(DatasetError::InvalidArgument(format!(
            "{} row keys for {} data rows",
            row_keys.len(),
            data.len()
        )));
    }
    let width = data.iter().map(|row| row.len()).max().unwrap_or(0);
    if column_keys.len() != width {
        return Err(DatasetError::InvalidArgument(format!(
            "{} column keys for {} data columns",
            column_keys.len(),
            width
        )));
    }

    let mut dataset = DefaultCategoryDataset::new();
    for (row_key, row) in row_keys.iter().zip(data) {
        for (column_key, value) in column_keys.iter().zip(row) {
            dataset.add_value(*value, row_key, column_key);
        }
    }
    Ok(dataset)
}

/// True when no series holds any item.
pub fn is_series_empty<D: SeriesDataset + ?Sized>(dataset: &D) -> bool {
    (0..dataset.series_count()).all(|s| dataset.item_count(s) == 0)
}

/// True when the table has no rows, no columns, or only missing cells.
pub fn is_category_empty<D: CategoryDataset + ?Sized>(dataset: &D) -> bool {
    (0..dataset.row_count()).all(|row| {
        (0..dataset.column_count()).all(|column| dataset.value(row, column).is_none())
    })
}

/// True when no entry has a positive value.
pub fn is_slice_empty<D: SliceDataset + ?Sized>(dataset: &D) -> bool {
    !(0..dataset.item_count()).any(|i| dataset.value(i).map_or(false, |v| v > 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::XySeriesCollection;

    fn table() -> DefaultCategoryDataset {
        create_category_dataset("R", "C", &[vec![1.0, 2.0, f64::NAN], vec![4.0, 5.0, 6.0]])
    }

    #[test]
    fn test_create_category_dataset_names_keys() {
        let t = table();
        assert_eq!(t.row_key(1), "R2");
        assert_eq!(t.column_key(2), "C3");
        assert_eq!(t.value(1, 2), Some(6.0));
    }

    #[test]
    fn test_column_and_row_totals() {
        let t = table();
        assert_eq!(calculate_column_total(&t, 0), Ok(5.0));
        assert_eq!(calculate_column_total(&t, 2), Ok(6.0));
        assert_eq!(calculate_row_total(&t, 0), Ok(3.0));
        assert_eq!(calculate_row_total(&t, 1), Ok(15.0));
        assert!(calculate_column_total(&t, 3).is_err());
        assert!(calculate_row_total(&t, 2).is_err());
    }

    #[test]
    fn test_totals_over_selected_indices() {
        let t = table();
        assert_eq!(calculate_column_total_for_rows(&t, 1, &[1, 7]), Ok(5.0));
        assert_eq!(calculate_row_total_for_columns(&t, 1, &[0, 2]), Ok(10.0));
        assert_eq!(calculate_row_total_for_columns(&t, 0, &[]), Ok(0.0));
    }

    #[test]
    fn test_cumulative_percentages() {
        let mut d = DefaultSliceDataset::new();
        d.set_value("A", 5.0);
        d.set_value("B", None);
        d.set_value("C", 15.0);
        let p = cumulative_percentages(&d).unwrap();
        assert_eq!(p.value_for("A"), Some(0.25));
        assert_eq!(p.value_for("B"), Some(0.25));
        assert_eq!(p.value_for("C"), Some(1.0));

        let zero = DefaultSliceDataset::new();
        assert!(matches!(
            cumulative_percentages(&zero),
            Err(DatasetError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_sample_function() {
        let series = sample_function(|x| x * x, 0.0, 4.0, 5, "square").unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.x(2), 2.0);
        assert_eq!(series.y(4), Some(16.0));

        let mut c = XySeriesCollection::new();
        c.add_series(series).unwrap();
        assert_eq!(c.series_key(0), "square");
    }

    #[test]
    fn test_sample_function_rejects_degenerate_input() {
        assert!(matches!(
            sample_function(|x| x, 0.0, 1.0, 1, "f"),
            Err(DatasetError::DegenerateInput(_))
        ));
        assert!(matches!(
            sample_function(|x| x, 1.0, 1.0, 10, "f"),
            Err(DatasetError::DegenerateInput(_))
        ));
        assert!(matches!(
            sample_function(|x| x, 2.0, 1.0, 10, "f"),
            Err(DatasetError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_create_with_keys() {
        let t = create_category_dataset_with_keys(
            &["North", "South"],
            &["Q1", "Q2"],
            &[vec![1.0, 2.0], vec![3.0]],
        )
        .unwrap();
        assert_eq!(t.value(1, 0), Some(3.0));
        assert_eq!(t.value(1, 1), None);
    }

    #[test]
    fn test_create_with_keys_rejects_mismatch() {
        let data = [vec![1.0, 2.0]];
        assert!(create_category_dataset_with_keys(&["A", "B"], &["X", "Y"], &data).is_err());
        assert!(create_category_dataset_with_keys(&["A"], &["X"], &data).is_err());
        assert_eq!(
            create_category_dataset_with_keys(&["A"], &["X", "X"], &data).err(),
            Some(DatasetError::InvalidArgument("duplicate column key 'X'".to_string()))
        );
    }

    #[test]
    fn test_emptiness_checks() {
        let mut c = XySeriesCollection::new();
        assert!(is_series_empty(&c));
        c.add_series(XySeries::new("S")).unwrap();
        assert!(is_series_empty(&c));

        let mut t = DefaultCategoryDataset::new();
        assert!(is_category_empty(&t));
        t.add_value(None, "R", "C");
        assert!(is_category_empty(&t));
        t.add_value(0.0, "R", "C");
        assert!(!is_category_empty(&t));

        let mut s = DefaultSliceDataset::new();
        s.set_value("A", -1.0);
        s.set_value("B", None);
        assert!(is_slice_empty(&s));
        s.set_value("C", 0.5);
        assert!(!is_slice_empty(&s));
    }
}
