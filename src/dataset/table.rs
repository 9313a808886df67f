use super::category::{
    BoxWhiskerCategory, CategoryDataset, CategoryRangeInfo, IntervalCategory,
    MultiValueCategory, StatisticalCategory,
};
use super::xy::widen;
use crate::range::Range;

// ---------------------------------------------------------------------------
// KeyedTable – shared 2-D storage
// ---------------------------------------------------------------------------

/// A grid of optional cells addressed by row and column key. Keys keep their
/// insertion order; adding a new key pads the grid with empty cells.
#[derive(Debug, Clone)]
pub struct KeyedTable<T> {
    row_keys: Vec<String>,
    column_keys: Vec<String>,
    rows: Vec<Vec<Option<T>>>,
}

impl<T> Default for KeyedTable<T> {
    fn default() -> Self {
        KeyedTable {
            row_keys: Vec::new(),
            column_keys: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl<T> KeyedTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_keys.len()
    }

    pub fn row_key(&self, row: usize) -> &str {
        &self.row_keys[row]
    }

    pub fn column_key(&self, column: usize) -> &str {
        &self.column_keys[column]
    }

    pub fn row_index(&self, key: &str) -> Option<usize> {
        self.row_keys.iter().position(|k| k == key)
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.column_keys.iter().position(|k| k == key)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        self.rows[row][column].as_ref()
    }

    /// Store `value` at (row_key, column_key) and return the cell it replaced.
    pub fn set(&mut self, row_key: &str, column_key: &str, value: Option<T>) -> Option<T> {
        let column = match self.column_index(column_key) {
            Some(c) => c,
            None => {
                self.column_keys.push(column_key.to_string());
                for row in &mut self.rows {
                    row.push(None);
                }
                self.column_keys.len() - 1
            }
        };
        let row = match self.row_index(row_key) {
            Some(r) => r,
            None => {
                self.row_keys.push(row_key.to_string());
                let width = self.column_keys.len();
                self.rows.push(std::iter::repeat_with(|| None).take(width).collect());
                self.row_keys.len() - 1
            }
        };
        std::mem::replace(&mut self.rows[row][column], value)
    }
}

macro_rules! delegate_table_keys {
    () => {
        fn row_count(&self) -> usize {
            self.table.row_count()
        }

        fn column_count(&self) -> usize {
            self.table.column_count()
        }

        fn row_key(&self, row: usize) -> &str {
            self.table.row_key(row)
        }

        fn column_key(&self, column: usize) -> &str {
            self.table.column_key(column)
        }

        fn row_index(&self, key: &str) -> Option<usize> {
            self.table.row_index(key)
        }

        fn column_index(&self, key: &str) -> Option<usize> {
            self.table.column_index(key)
        }
    };
}

// ---------------------------------------------------------------------------
// DefaultCategoryDataset – plain values
// ---------------------------------------------------------------------------

/// Plain values with a running extent, so range bounds need no scan.
#[derive(Debug, Clone, Default)]
pub struct DefaultCategoryDataset {
    table: KeyedTable<f64>,
    extent: Option<(f64, f64)>,
}

impl DefaultCategoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(&mut self, value: impl Into<Option<f64>>, row_key: &str, column_key: &str) {
        let value = value.into();
        let replaced = self.table.set(row_key, column_key, value);
        if replaced.is_some_and(|v| !v.is_nan()) {
            // The old cell may have been an extreme.
            self.extent = self.table.rows.iter().flatten().flatten().copied().fold(None, widen);
        } else if let Some(v) = value {
            self.extent = widen(self.extent, v);
        }
    }
}

impl CategoryDataset for DefaultCategoryDataset {
    delegate_table_keys!();

    fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.table.get(row, column).copied()
    }

    fn range_info(&self) -> Option<&dyn CategoryRangeInfo> {
        Some(self)
    }
}

impl CategoryRangeInfo for DefaultCategoryDataset {
    fn range_bounds(&self, _include_interval: bool) -> Option<Range> {
        self.extent.map(|(lo, hi)| Range::ordered(lo, hi))
    }
}

// ---------------------------------------------------------------------------
// DefaultIntervalCategoryDataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntervalCell {
    pub value: Option<f64>,
    pub start: Option<f64>,
    pub end: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct DefaultIntervalCategoryDataset {
    table: KeyedTable<IntervalCell>,
}

impl DefaultIntervalCategoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, cell: IntervalCell, row_key: &str, column_key: &str) {
        self.table.set(row_key, column_key, Some(cell));
    }
}

impl CategoryDataset for DefaultIntervalCategoryDataset {
    delegate_table_keys!();

    fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.table.get(row, column).and_then(|c| c.value)
    }

    fn as_interval(&self) -> Option<&dyn IntervalCategory> {
        Some(self)
    }
}

impl IntervalCategory for DefaultIntervalCategoryDataset {
    fn start_value(&self, row: usize, column: usize) -> Option<f64> {
        self.table.get(row, column).and_then(|c| c.start)
    }

    fn end_value(&self, row: usize, column: usize) -> Option<f64> {
        self.table.get(row, column).and_then(|c| c.end)
    }
}

// ---------------------------------------------------------------------------
// DefaultMultiValueCategoryDataset
// ---------------------------------------------------------------------------

/// Cells hold a list of samples; the plain value of a cell is the mean of
/// its non-NaN samples.
#[derive(Debug, Clone, Default)]
pub struct DefaultMultiValueCategoryDataset {
    table: KeyedTable<Vec<f64>>,
}

impl DefaultMultiValueCategoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, values: Vec<f64>, row_key: &str, column_key: &str) {
        self.table.set(row_key, column_key, Some(values));
    }
}

impl CategoryDataset for DefaultMultiValueCategoryDataset {
    delegate_table_keys!();

    fn value(&self, row: usize, column: usize) -> Option<f64> {
        let values = self.table.get(row, column)?;
        let (sum, n) = values
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        if n == 0 {
            None
        } else {
            Some(sum / n as f64)
        }
    }

    fn as_multi_value(&self) -> Option<&dyn MultiValueCategory> {
        Some(self)
    }
}

impl MultiValueCategory for DefaultMultiValueCategoryDataset {
    fn values(&self, row: usize, column: usize) -> &[f64] {
        self.table
            .get(row, column)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// DefaultStatisticalCategoryDataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeanAndStdDev {
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct DefaultStatisticalCategoryDataset {
    table: KeyedTable<MeanAndStdDev>,
}

impl DefaultStatisticalCategoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        mean: impl Into<Option<f64>>,
        std_dev: impl Into<Option<f64>>,
        row_key: &str,
        column_key: &str,
    ) {
        let cell = MeanAndStdDev {
            mean: mean.into(),
            std_dev: std_dev.into(),
        };
        self.table.set(row_key, column_key, Some(cell));
    }
}

impl CategoryDataset for DefaultStatisticalCategoryDataset {
    delegate_table_keys!();

    fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.table.get(row, column).and_then(|c| c.mean)
    }

    fn as_statistical(&self) -> Option<&dyn StatisticalCategory> {
        Some(self)
    }
}

impl StatisticalCategory for DefaultStatisticalCategoryDataset {
    fn mean_value(&self, row: usize, column: usize) -> Option<f64> {
        self.table.get(row, column).and_then(|c| c.mean)
    }

    fn std_dev_value(&self, row: usize, column: usize) -> Option<f64> {
        self.table.get(row, column).and_then(|c| c.std_dev)
    }
}

// ---------------------------------------------------------------------------
// DefaultBoxWhiskerCategoryDataset
// ---------------------------------------------------------------------------

/// Summary statistics of one box-and-whisker cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxWhiskerItem {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub min_regular: Option<f64>,
    pub max_regular: Option<f64>,
}

impl BoxWhiskerItem {
    /// Compute the summary of a sample list. NaN samples are dropped.
    ///
    /// Regular values are the samples within 1.5 interquartile ranges of the
    /// quartiles. An empty sample list yields an all-`None` item.
    pub fn from_samples(samples: &[f64]) -> Self {
        let mut values: Vec<f64> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
        if values.is_empty() {
            return BoxWhiskerItem::default();
        }
        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let median = median_of(&values);
        let (q1, q3) = if count == 1 {
            (values[0], values[0])
        } else if count % 2 == 1 {
            (median_of(&values[..=count / 2]), median_of(&values[count / 2..]))
        } else {
            (median_of(&values[..count / 2]), median_of(&values[count / 2..]))
        };

        let iqr = q3 - q1;
        let upper_threshold = q3 + iqr * 1.5;
        let lower_threshold = q1 - iqr * 1.5;
        let regular = values
            .iter()
            .filter(|&&v| v >= lower_threshold && v <= upper_threshold);
        let min_regular = regular.clone().copied().reduce(f64::min);
        let max_regular = regular.copied().reduce(f64::max);

        BoxWhiskerItem {
            mean: Some(mean),
            median: Some(median),
            q1: Some(q1),
            q3: Some(q3),
            min_regular,
            max_regular,
        }
    }
}

/// Median of an already sorted, non-empty slice.
fn median_of(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Box-and-whisker cells; the plain value of a cell is its mean.
#[derive(Debug, Clone, Default)]
pub struct DefaultBoxWhiskerCategoryDataset {
    table: KeyedTable<BoxWhiskerItem>,
}

impl DefaultBoxWhiskerCategoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: BoxWhiskerItem, row_key: &str, column_key: &str) {
        self.table.set(row_key, column_key, Some(item));
    }

    pub fn add_samples(&mut self, samples: &[f64], row_key: &str, column_key: &str) {
        self.add(BoxWhiskerItem::from_samples(samples), row_key, column_key);
    }

    fn item(&self, row: usize, column: usize) -> Option<&BoxWhiskerItem> {
        self.table.get(row, column)
    }
}

impl CategoryDataset for DefaultBoxWhiskerCategoryDataset {
    delegate_table_keys!();

    fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.item(row, column).and_then(|i| i.mean)
    }

    fn as_box_whisker(&self) -> Option<&dyn BoxWhiskerCategory> {
        Some(self)
    }
}

impl BoxWhiskerCategory for DefaultBoxWhiskerCategoryDataset {
    fn mean_value(&self, row: usize, column: usize) -> Option<f64> {
        self.item(row, column).and_then(|i| i.mean)
    }

    fn median_value(&self, row: usize, column: usize) -> Option<f64> {
        self.item(row, column).and_then(|i| i.median)
    }

    fn q1_value(&self, row: usize, column: usize) -> Option<f64> {
        self.item(row, column).and_then(|i| i.q1)
    }

    fn q3_value(&self, row: usize, column: usize) -> Option<f64> {
        self.item(row, column).and_then(|i| i.q3)
    }

    fn min_regular_value(&self, row: usize, column: usize) -> Option<f64> {
        self.item(row, column).and_then(|i| i.min_regular)
    }

    fn max_regular_value(&self, row: usize, column: usize) -> Option<f64> {
        self.item(row, column).and_then(|i| i.max_regular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_table_pads_new_rows_and_columns() {
        let mut t: KeyedTable<f64> = KeyedTable::new();
        t.set("R1", "C1", Some(1.0));
        t.set("R2", "C2", Some(2.0));
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.get(0, 0), Some(&1.0));
        assert_eq!(t.get(0, 1), None);
        assert_eq!(t.get(1, 0), None);
        assert_eq!(t.get(1, 1), Some(&2.0));
    }

    #[test]
    fn test_keyed_table_overwrites_cell() {
        let mut t: KeyedTable<f64> = KeyedTable::new();
        t.set("R1", "C1", Some(1.0));
        t.set("R1", "C1", None);
        assert_eq!(t.get(0, 0), None);
        assert_eq!(t.row_count(), 1);
    }

    #[test]
    fn test_category_dataset_key_order() {
        let mut d = DefaultCategoryDataset::new();
        d.add_value(1.0, "S2", "B");
        d.add_value(2.0, "S1", "A");
        assert_eq!(d.row_key(0), "S2");
        assert_eq!(d.column_key(1), "A");
        assert_eq!(d.row_index("S1"), Some(1));
        assert_eq!(d.column_index("Z"), None);
    }

    #[test]
    fn test_category_dataset_tracks_extent_through_overwrites() {
        let mut d = DefaultCategoryDataset::new();
        assert_eq!(d.range_bounds(true), None);
        d.add_value(f64::NAN, "R1", "C1");
        d.add_value(None, "R1", "C2");
        assert_eq!(d.range_bounds(true), None);
        d.add_value(5.0, "R1", "C1");
        d.add_value(-2.0, "R2", "C1");
        assert_eq!(d.range_bounds(true), Range::new(-2.0, 5.0).ok());
        d.add_value(1.0, "R1", "C1");
        assert_eq!(d.range_bounds(true), Range::new(-2.0, 1.0).ok());
        d.add_value(None, "R2", "C1");
        assert_eq!(d.range_bounds(false), Range::new(1.0, 1.0).ok());
    }

    #[test]
    fn test_multi_value_plain_value_is_mean() {
        let mut d = DefaultMultiValueCategoryDataset::new();
        d.add(vec![1.0, f64::NAN, 3.0], "R", "C");
        d.add(vec![], "R", "D");
        assert_eq!(d.value(0, 0), Some(2.0));
        assert_eq!(d.value(0, 1), None);
        assert_eq!(d.values(0, 0).len(), 3);
    }

    #[test]
    fn test_box_whisker_from_samples() {
        let item = BoxWhiskerItem::from_samples(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0]);
        assert_eq!(item.median, Some(5.0));
        assert_eq!(item.q1, Some(3.0));
        assert_eq!(item.q3, Some(7.0));
        assert_eq!(item.min_regular, Some(1.0));
        // 100 is beyond q3 + 1.5 * iqr = 13
        assert_eq!(item.max_regular, Some(8.0));
    }

    #[test]
    fn test_box_whisker_from_even_samples() {
        let item = BoxWhiskerItem::from_samples(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(item.mean, Some(2.5));
        assert_eq!(item.median, Some(2.5));
        assert_eq!(item.q1, Some(1.5));
        assert_eq!(item.q3, Some(3.5));
    }

    #[test]
    fn test_box_whisker_from_no_samples() {
        let item = BoxWhiskerItem::from_samples(&[f64::NAN]);
        assert_eq!(item, BoxWhiskerItem::default());
    }
}
