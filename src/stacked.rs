//! Extents of stacked, grouped-stacked and cumulative layouts.
//!
//! Stacking sums the positive and the negative values of one column (or one
//! item index) separately, so the bar grows away from the base in both
//! directions. Missing and NaN cells are skipped everywhere.

use crate::bounds::Extent;
use crate::dataset::{CategoryDataset, KeyToGroupMap, TableXyDataset};
use crate::error::{DatasetError, Result};
use crate::range::Range;

/// The plain value of a cell, treating NaN as missing.
fn cell<D: CategoryDataset + ?Sized>(dataset: &D, row: usize, column: usize) -> Option<f64> {
    dataset.value(row, column).filter(|v| !v.is_nan())
}

/// Positive and negative column sums, both starting from `base`.
#[derive(Debug, Clone, Copy)]
struct Stack {
    positive: f64,
    negative: f64,
}

impl Stack {
    fn new(base: f64) -> Self {
        Stack {
            positive: base,
            negative: base,
        }
    }

    fn push(&mut self, value: f64) {
        if value > 0.0 {
            self.positive += value;
        } else if value < 0.0 {
            self.negative += value;
        }
    }
}

/// Range bounds of a category table stacked column by column on `base`.
///
/// Returns `None` for a table with no columns.
pub fn find_stacked_range_bounds<D: CategoryDataset + ?Sized>(
    dataset: &D,
    base: f64,
) -> Option<Range> {
    let mut extent = Extent::new();
    for column in 0..dataset.column_count() {
        let mut stack = Stack::new(base);
        for row in 0..dataset.row_count() {
            if let Some(v) = cell(dataset, row, column) {
                stack.push(v);
            }
        }
        extent.include_lower(stack.negative);
        extent.include_upper(stack.positive);
    }
    let result = extent.into_range();
    log::trace!(
        "stacked {} columns on base {}: {:?}",
        dataset.column_count(),
        base,
        result
    );
    result
}

/// Range bounds when rows stack separately per group.
///
/// Each row joins the group `groups` assigns it. Every group keeps its own
/// stack per column, and its extent starts at zero. The result is the union
/// of the extents of the groups that saw at least one value.
pub fn find_grouped_stacked_range_bounds<D: CategoryDataset + ?Sized>(
    dataset: &D,
    groups: &KeyToGroupMap,
) -> Result<Option<Range>> {
    if let Some(missing) = groups
        .mapped_keys()
        .find(|key| dataset.row_index(key).is_none())
    {
        return Err(DatasetError::UnknownKey(missing.to_string()));
    }

    // group index of every row, resolved once
    let row_groups: Vec<usize> = (0..dataset.row_count())
        .map(|row| {
            let group = groups.group(dataset.row_key(row));
            groups.group_index(group).unwrap_or(0)
        })
        .collect();

    let group_count = groups.group_count();
    let mut minimum = vec![0.0_f64; group_count];
    let mut maximum = vec![0.0_f64; group_count];
    let mut observed = vec![false; group_count];

    for column in 0..dataset.column_count() {
        let mut stacks = vec![Stack::new(0.0); group_count];
        for (row, &g) in row_groups.iter().enumerate() {
            if let Some(v) = cell(dataset, row, column) {
                observed[g] = true;
                stacks[g].push(v);
            }
        }
        for (g, stack) in stacks.iter().enumerate() {
            minimum[g] = minimum[g].min(stack.negative);
            maximum[g] = maximum[g].max(stack.positive);
        }
    }

    let result = (0..group_count)
        .filter(|&g| observed[g])
        .map(|g| Range::ordered(minimum[g], maximum[g]))
        .fold(None, |acc, r| Range::combine(acc, Some(r)));
    log::trace!(
        "stacked {} rows in {} groups: {:?}",
        dataset.row_count(),
        group_count,
        result
    );
    Ok(result)
}

/// Range bounds of per-row running totals, walking columns left to right.
///
/// The extent always includes zero. Returns `None` only when every cell is
/// empty.
pub fn find_cumulative_range_bounds<D: CategoryDataset + ?Sized>(dataset: &D) -> Option<Range> {
    let mut minimum = 0.0_f64;
    let mut maximum = 0.0_f64;
    let mut all_empty = true;
    for row in 0..dataset.row_count() {
        let mut running_total = 0.0;
        for column in 0..dataset.column_count() {
            let Some(value) = dataset.value(row, column) else {
                continue;
            };
            all_empty = false;
            if !value.is_nan() {
                running_total += value;
                minimum = minimum.min(running_total);
                maximum = maximum.max(running_total);
            }
        }
    }
    if all_empty {
        None
    } else {
        Some(Range::ordered(minimum, maximum))
    }
}

/// Range bounds of a table-shaped series dataset stacked item by item on
/// `base`. An empty dataset yields `[base, base]`.
pub fn find_stacked_xy_range_bounds<D: TableXyDataset + ?Sized>(dataset: &D, base: f64) -> Range {
    let mut minimum = base;
    let mut maximum = base;
    for item in 0..dataset.shared_item_count() {
        let mut stack = Stack::new(base);
        for series in 0..dataset.series_count() {
            let y = dataset.y_value(series, item);
            if !y.is_nan() {
                stack.push(y);
            }
        }
        minimum = minimum.min(stack.negative);
        maximum = maximum.max(stack.positive);
    }
    Range::ordered(minimum, maximum)
}

/// Lowest stacked value of a category table: the most negative column sum,
/// never above zero. `None` when every cell is empty.
pub fn find_minimum_stacked_range_value<D: CategoryDataset + ?Sized>(dataset: &D) -> Option<f64> {
    let mut minimum = 0.0_f64;
    let mut seen = false;
    for column in 0..dataset.column_count() {
        let mut total = 0.0;
        for row in 0..dataset.row_count() {
            if let Some(v) = dataset.value(row, column) {
                seen = true;
                if v < 0.0 {
                    total += v;
                }
            }
        }
        minimum = minimum.min(total);
    }
    seen.then_some(minimum)
}

/// Highest stacked value of a category table: the largest positive column
/// sum, never below zero. `None` when every cell is empty.
pub fn find_maximum_stacked_range_value<D: CategoryDataset + ?Sized>(dataset: &D) -> Option<f64> {
    let mut maximum = 0.0_f64;
    let mut seen = false;
    for column in 0..dataset.column_count() {
        let mut total = 0.0;
        for row in 0..dataset.row_count() {
            if let Some(v) = dataset.value(row, column) {
                seen = true;
                if v > 0.0 {
                    total += v;
                }
            }
        }
        maximum = maximum.max(total);
    }
    seen.then_some(maximum)
}

/// Sum of the y values of every series at `item`, skipping NaN.
pub fn calculate_stack_total<D: TableXyDataset + ?Sized>(dataset: &D, item: usize) -> Result<f64> {
    if item >= dataset.shared_item_count() {
        return Err(DatasetError::InvalidArgument(format!(
            "item index {} out of range (items: {})",
            item,
            dataset.shared_item_count()
        )));
    }
    Ok((0..dataset.series_count())
        .map(|series| dataset.y_value(series, item))
        .filter(|y| !y.is_nan())
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DefaultCategoryDataset, DefaultTableXyDataset};

    fn range(lower: f64, upper: f64) -> Option<Range> {
        Some(Range::new(lower, upper).unwrap())
    }

    fn one_column(values: &[(&str, f64)]) -> DefaultCategoryDataset {
        let mut d = DefaultCategoryDataset::new();
        for (row, v) in values {
            d.add_value(*v, row, "C1");
        }
        d
    }

    #[test]
    fn test_stacked_bounds_split_positive_and_negative() {
        let mut d = DefaultCategoryDataset::new();
        d.add_value(1.0, "R1", "C1");
        d.add_value(-2.0, "R2", "C1");
        d.add_value(4.0, "R3", "C1");
        d.add_value(None, "R1", "C2");
        d.add_value(f64::NAN, "R2", "C2");
        d.add_value(-5.0, "R3", "C2");
        assert_eq!(find_stacked_range_bounds(&d, 0.0), range(-5.0, 5.0));
    }

    #[test]
    fn test_stacked_bounds_seeded_at_base() {
        let d = one_column(&[("R1", 2.0), ("R2", 3.0)]);
        assert_eq!(find_stacked_range_bounds(&d, 10.0), range(10.0, 15.0));
    }

    #[test]
    fn test_stacked_bounds_without_columns() {
        let d = DefaultCategoryDataset::new();
        assert_eq!(find_stacked_range_bounds(&d, 0.0), None);
    }

    #[test]
    fn test_grouped_stacking_takes_union_of_groups() {
        let d = one_column(&[("R1", 1.0), ("R2", 2.0), ("R3", 3.0), ("R4", 4.0)]);
        let mut groups = KeyToGroupMap::new("G0");
        groups.map_key_to_group("R1", Some("A"));
        groups.map_key_to_group("R2", Some("A"));
        groups.map_key_to_group("R3", Some("B"));
        groups.map_key_to_group("R4", Some("B"));
        assert_eq!(find_stacked_range_bounds(&d, 0.0), range(0.0, 10.0));
        assert_eq!(
            find_grouped_stacked_range_bounds(&d, &groups).unwrap(),
            range(0.0, 7.0)
        );
    }

    #[test]
    fn test_grouped_stacking_unmapped_rows_use_default_group() {
        let d = one_column(&[("R1", -1.0), ("R2", -2.0), ("R3", 6.0)]);
        let mut groups = KeyToGroupMap::new("G0");
        groups.map_key_to_group("R3", Some("B"));
        assert_eq!(
            find_grouped_stacked_range_bounds(&d, &groups).unwrap(),
            range(-3.0, 6.0)
        );
    }

    #[test]
    fn test_grouped_stacking_with_no_values() {
        let mut d = DefaultCategoryDataset::new();
        d.add_value(None, "R1", "C1");
        let groups = KeyToGroupMap::default();
        assert_eq!(find_grouped_stacked_range_bounds(&d, &groups).unwrap(), None);
    }

    #[test]
    fn test_grouped_stacking_rejects_unknown_mapped_key() {
        let d = one_column(&[("R1", 1.0)]);
        let mut groups = KeyToGroupMap::new("G0");
        groups.map_key_to_group("R9", Some("A"));
        assert_eq!(
            find_grouped_stacked_range_bounds(&d, &groups),
            Err(DatasetError::UnknownKey("R9".to_string()))
        );
    }

    #[test]
    fn test_cumulative_bounds_follow_running_total() {
        let mut d = DefaultCategoryDataset::new();
        d.add_value(1.0, "R1", "C1");
        d.add_value(-3.0, "R1", "C2");
        d.add_value(5.0, "R1", "C3");
        d.add_value(None, "R2", "C1");
        d.add_value(2.0, "R2", "C2");
        assert_eq!(find_cumulative_range_bounds(&d), range(-2.0, 3.0));
    }

    #[test]
    fn test_cumulative_bounds_always_include_zero() {
        let mut d = DefaultCategoryDataset::new();
        d.add_value(2.0, "R1", "C1");
        d.add_value(3.0, "R1", "C2");
        assert_eq!(find_cumulative_range_bounds(&d), range(0.0, 5.0));
    }

    #[test]
    fn test_cumulative_bounds_all_empty() {
        let mut d = DefaultCategoryDataset::new();
        d.add_value(None, "R1", "C1");
        d.add_value(None, "R2", "C2");
        assert_eq!(find_cumulative_range_bounds(&d), None);

        // a NaN cell is present, just not summed
        d.add_value(f64::NAN, "R1", "C2");
        assert_eq!(find_cumulative_range_bounds(&d), range(0.0, 0.0));
    }

    #[test]
    fn test_stacked_xy_bounds() {
        let mut d = DefaultTableXyDataset::new();
        d.add("S1", 1.0, 2.0);
        d.add("S2", 1.0, -1.0);
        d.add("S1", 2.0, 5.0);
        d.add("S2", 2.0, 4.0);
        d.add("S3", 2.0, f64::NAN);
        assert_eq!(find_stacked_xy_range_bounds(&d, 0.0), Range::new(-1.0, 9.0).unwrap());
    }

    #[test]
    fn test_empty_stacked_xy_is_base_range() {
        let d = DefaultTableXyDataset::new();
        assert_eq!(find_stacked_xy_range_bounds(&d, 0.0), Range::new(0.0, 0.0).unwrap());
        assert_eq!(find_stacked_xy_range_bounds(&d, 2.5), Range::new(2.5, 2.5).unwrap());
    }

    #[test]
    fn test_minimum_and_maximum_stacked_values() {
        let mut d = DefaultCategoryDataset::new();
        d.add_value(3.0, "R1", "C1");
        d.add_value(-1.0, "R2", "C1");
        d.add_value(-4.0, "R1", "C2");
        d.add_value(2.0, "R2", "C2");
        assert_eq!(find_minimum_stacked_range_value(&d), Some(-4.0));
        assert_eq!(find_maximum_stacked_range_value(&d), Some(3.0));

        let positive_only = one_column(&[("R1", 1.0)]);
        assert_eq!(find_minimum_stacked_range_value(&positive_only), Some(0.0));

        let empty = DefaultCategoryDataset::new();
        assert_eq!(find_maximum_stacked_range_value(&empty), None);
    }

    #[test]
    fn test_stack_total() {
        let mut d = DefaultTableXyDataset::new();
        d.add("S1", 1.0, 2.0);
        d.add("S2", 1.0, None);
        d.add("S3", 1.0, -0.5);
        assert_eq!(calculate_stack_total(&d, 0), Ok(1.5));
        assert!(matches!(
            calculate_stack_total(&d, 1),
            Err(DatasetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_stacking_is_idempotent() {
        let d = one_column(&[("R1", 0.1), ("R2", 0.2), ("R3", -0.3)]);
        let a = find_stacked_range_bounds(&d, 0.0).unwrap();
        let b = find_stacked_range_bounds(&d, 0.0).unwrap();
        assert_eq!(a.lower().to_bits(), b.lower().to_bits());
        assert_eq!(a.upper().to_bits(), b.upper().to_bits());
    }
}
