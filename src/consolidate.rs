//! Folding small slices of a key/value dataset into one "other" entry, and
//! building slice datasets from a category table.

use crate::dataset::{CategoryDataset, DefaultSliceDataset, SliceDataset};
use crate::error::{DatasetError, Result};

/// Sum of the positive values of a slice dataset.
pub fn calculate_slice_total<D: SliceDataset + ?Sized>(dataset: &D) -> f64 {
    (0..dataset.item_count())
        .filter_map(|i| dataset.value(i))
        .filter(|v| *v > 0.0)
        .sum()
}

/// Consolidate with the usual minimum of two small entries.
pub fn consolidate_default<D: SliceDataset + ?Sized>(
    source: &D,
    other_key: &str,
    minimum_percent: f64,
) -> Result<DefaultSliceDataset> {
    consolidate(source, other_key, minimum_percent, 2)
}

/// Replace the entries whose share of the positive total is below
/// `minimum_percent` with a single `other_key` entry holding their sum.
///
/// Nothing is merged unless at least `min_items` entries fall below the
/// threshold; the result is then a copy of `source`. Entries without a value
/// are never below the threshold. When the total is not positive, no entry
/// is.
pub fn consolidate<D: SliceDataset + ?Sized>(
    source: &D,
    other_key: &str,
    minimum_percent: f64,
    min_items: usize,
) -> Result<DefaultSliceDataset> {
    if minimum_percent.is_nan() || minimum_percent < 0.0 {
        return Err(DatasetError::DegenerateInput(format!(
            "minimum percent must be a non-negative number, got {}",
            minimum_percent
        )));
    }

    let total = calculate_slice_total(source);
    let below: Vec<bool> = (0..source.item_count())
        .map(|i| match source.value(i) {
            Some(v) if total > 0.0 && total.is_finite() => v / total < minimum_percent,
            _ => false,
        })
        .collect();
    let below_count = below.iter().filter(|b| **b).count();

    let mut result = DefaultSliceDataset::new();
    if below_count < min_items {
        log::debug!(
            "{} of {} entries below {}, fewer than {}: nothing merged",
            below_count,
            source.item_count(),
            minimum_percent,
            min_items
        );
        for i in 0..source.item_count() {
            result.set_value(source.key(i), source.value(i));
        }
        return Ok(result);
    }

    let mut other = 0.0;
    for (i, &is_below) in below.iter().enumerate() {
        if is_below {
            other += source.value(i).unwrap_or(0.0);
        } else {
            if source.key(i) == other_key {
                return Err(DatasetError::InvalidArgument(format!(
                    "key '{}' is retained and cannot also name the merged entry",
                    other_key
                )));
            }
            result.set_value(source.key(i), source.value(i));
        }
    }
    result.set_value(other_key, other);
    log::debug!(
        "merged {} entries into '{}' ({})",
        below_count,
        other_key,
        other
    );
    Ok(result)
}

/// One row of a category table as a slice dataset keyed by column.
pub fn slice_for_row<D: CategoryDataset + ?Sized>(
    dataset: &D,
    row_key: &str,
) -> Result<DefaultSliceDataset> {
    let row = dataset
        .row_index(row_key)
        .ok_or_else(|| DatasetError::UnknownKey(row_key.to_string()))?;
    let mut result = DefaultSliceDataset::new();
    for column in 0..dataset.column_count() {
        result.set_value(dataset.column_key(column), dataset.value(row, column));
    }
    Ok(result)
}

/// One column of a category table as a slice dataset keyed by row.
pub fn slice_for_column<D: CategoryDataset + ?Sized>(
    dataset: &D,
    column_key: &str,
) -> Result<DefaultSliceDataset> {
    let column = dataset
        .column_index(column_key)
        .ok_or_else(|| DatasetError::UnknownKey(column_key.to_string()))?;
    let mut result = DefaultSliceDataset::new();
    for row in 0..dataset.row_count() {
        result.set_value(dataset.row_key(row), dataset.value(row, column));
    }
    Ok(result)
}
