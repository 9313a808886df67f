use super::DomainOrder;
use crate::range::Range;

/// A read-only, series-based dataset: an ordered list of named series, each
/// an ordered list of (x, y) items.
///
/// Missing values are reported as NaN. Capabilities beyond plain x/y are
/// exposed through the `as_*` accessors.
pub trait SeriesDataset {
    fn series_count(&self) -> usize;

    fn series_key(&self, series: usize) -> &str;

    /// Index of the series with the given key.
    fn index_of(&self, key: &str) -> Option<usize> {
        (0..self.series_count()).find(|&s| self.series_key(s) == key)
    }

    fn item_count(&self, series: usize) -> usize;

    fn x_value(&self, series: usize, item: usize) -> f64;

    fn y_value(&self, series: usize, item: usize) -> f64;

    fn domain_order(&self) -> DomainOrder {
        DomainOrder::None
    }

    fn as_interval(&self) -> Option<&dyn IntervalXy> {
        None
    }

    fn as_high_low(&self) -> Option<&dyn HighLowXy> {
        None
    }

    fn as_box_whisker(&self) -> Option<&dyn BoxWhiskerXy> {
        None
    }

    fn as_xyz(&self) -> Option<&dyn XyzValues> {
        None
    }

    /// Fast path for domain bounds over all series.
    fn domain_info(&self) -> Option<&dyn DomainInfo> {
        None
    }

    /// Fast path for range bounds over all series.
    fn range_info(&self) -> Option<&dyn RangeInfo> {
        None
    }
}

/// Start/end bounds around both the x and the y value of each item.
pub trait IntervalXy {
    fn start_x_value(&self, series: usize, item: usize) -> f64;
    fn end_x_value(&self, series: usize, item: usize) -> f64;
    fn start_y_value(&self, series: usize, item: usize) -> f64;
    fn end_y_value(&self, series: usize, item: usize) -> f64;
}

/// High/low/open/close items. Only high and low take part in bounds.
pub trait HighLowXy {
    fn high_value(&self, series: usize, item: usize) -> f64;
    fn low_value(&self, series: usize, item: usize) -> f64;
    fn open_value(&self, series: usize, item: usize) -> f64;
    fn close_value(&self, series: usize, item: usize) -> f64;
}

/// Box-and-whisker items keyed by x. The y value is the mean.
pub trait BoxWhiskerXy {
    fn mean_value(&self, series: usize, item: usize) -> Option<f64>;
    fn median_value(&self, series: usize, item: usize) -> Option<f64>;
    fn min_regular_value(&self, series: usize, item: usize) -> Option<f64>;
    fn max_regular_value(&self, series: usize, item: usize) -> Option<f64>;
}

/// A third numeric dimension per item, with an optional interval.
pub trait XyzValues {
    fn z_value(&self, series: usize, item: usize) -> f64;

    fn start_z_value(&self, _series: usize, _item: usize) -> Option<f64> {
        None
    }

    fn end_z_value(&self, _series: usize, _item: usize) -> Option<f64> {
        None
    }
}

/// A dataset that tracks its own domain extent.
///
/// Answers must match what a scan of the dataset would produce.
pub trait DomainInfo {
    fn domain_bounds(&self, include_interval: bool) -> Option<Range>;

    fn domain_lower_bound(&self, include_interval: bool) -> Option<f64> {
        self.domain_bounds(include_interval).map(|r| r.lower())
    }

    fn domain_upper_bound(&self, include_interval: bool) -> Option<f64> {
        self.domain_bounds(include_interval).map(|r| r.upper())
    }
}

/// A dataset that tracks its own range extent.
pub trait RangeInfo {
    fn range_bounds(&self, include_interval: bool) -> Option<Range>;

    fn range_lower_bound(&self, include_interval: bool) -> Option<f64> {
        self.range_bounds(include_interval).map(|r| r.lower())
    }

    fn range_upper_bound(&self, include_interval: bool) -> Option<f64> {
        self.range_bounds(include_interval).map(|r| r.upper())
    }
}

/// A series dataset whose series all share the same x values, so items line
/// up by index across series.
pub trait TableXyDataset: SeriesDataset {
    fn shared_item_count(&self) -> usize;
}
