use crate::range::Range;

/// A read-only table of values indexed by (row key, column key).
///
/// Rows are the series, columns are the categories. A cell may be empty.
pub trait CategoryDataset {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    fn row_key(&self, row: usize) -> &str;

    fn column_key(&self, column: usize) -> &str;

    fn row_index(&self, key: &str) -> Option<usize> {
        (0..self.row_count()).find(|&r| self.row_key(r) == key)
    }

    fn column_index(&self, key: &str) -> Option<usize> {
        (0..self.column_count()).find(|&c| self.column_key(c) == key)
    }

    /// The plain (center) value of a cell.
    fn value(&self, row: usize, column: usize) -> Option<f64>;

    fn as_interval(&self) -> Option<&dyn IntervalCategory> {
        None
    }

    fn as_multi_value(&self) -> Option<&dyn MultiValueCategory> {
        None
    }

    fn as_statistical(&self) -> Option<&dyn StatisticalCategory> {
        None
    }

    fn as_box_whisker(&self) -> Option<&dyn BoxWhiskerCategory> {
        None
    }

    /// Fast path for range bounds over all rows.
    fn range_info(&self) -> Option<&dyn CategoryRangeInfo> {
        None
    }
}

pub trait IntervalCategory {
    fn start_value(&self, row: usize, column: usize) -> Option<f64>;
    fn end_value(&self, row: usize, column: usize) -> Option<f64>;
}

pub trait MultiValueCategory {
    fn values(&self, row: usize, column: usize) -> &[f64];
}

pub trait StatisticalCategory {
    fn mean_value(&self, row: usize, column: usize) -> Option<f64>;
    fn std_dev_value(&self, row: usize, column: usize) -> Option<f64>;
}

pub trait BoxWhiskerCategory {
    fn mean_value(&self, row: usize, column: usize) -> Option<f64>;
    fn median_value(&self, row: usize, column: usize) -> Option<f64>;
    fn q1_value(&self, row: usize, column: usize) -> Option<f64>;
    fn q3_value(&self, row: usize, column: usize) -> Option<f64>;
    fn min_regular_value(&self, row: usize, column: usize) -> Option<f64>;
    fn max_regular_value(&self, row: usize, column: usize) -> Option<f64>;
}

/// A table that tracks its own value extent. Must agree with a scan.
pub trait CategoryRangeInfo {
    fn range_bounds(&self, include_interval: bool) -> Option<Range>;
}
