use super::series::{DomainInfo, RangeInfo, SeriesDataset, TableXyDataset};
use super::{or_nan, DomainOrder};
use crate::error::{DatasetError, Result};
use crate::range::Range;

/// A named sequence of (x, y) items. `y` may be missing.
///
/// The series keeps running x/y extents as items are added so collections
/// can answer bounds queries without a scan.
#[derive(Debug, Clone)]
pub struct XySeries {
    key: String,
    items: Vec<(f64, Option<f64>)>,
    auto_sort: bool,
    x_extent: Option<(f64, f64)>,
    y_extent: Option<(f64, f64)>,
}

impl XySeries {
    /// A series that keeps its items sorted by x.
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_sorting(key, true)
    }

    /// A series that keeps items in insertion order.
    pub fn unsorted(key: impl Into<String>) -> Self {
        Self::with_sorting(key, false)
    }

    fn with_sorting(key: impl Into<String>, auto_sort: bool) -> Self {
        XySeries {
            key: key.into(),
            items: Vec::new(),
            auto_sort,
            x_extent: None,
            y_extent: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn auto_sort(&self) -> bool {
        self.auto_sort
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn x(&self, item: usize) -> f64 {
        self.items[item].0
    }

    pub fn y(&self, item: usize) -> Option<f64> {
        self.items[item].1
    }

    /// Add an item. With auto-sort on, it lands after any items with an
    /// equal x, and items with a NaN x stay at the end.
    pub fn add(&mut self, x: f64, y: impl Into<Option<f64>>) {
        let y = y.into();
        if self.auto_sort {
            let at = self
                .items
                .partition_point(|(ix, _)| !ix.is_nan() && (x.is_nan() || *ix <= x));
            self.items.insert(at, (x, y));
        } else {
            self.items.push((x, y));
        }
        self.x_extent = widen(self.x_extent, x);
        if let Some(y) = y {
            self.y_extent = widen(self.y_extent, y);
        }
    }

    pub fn min_x(&self) -> Option<f64> {
        self.x_extent.map(|(lo, _)| lo)
    }

    pub fn max_x(&self) -> Option<f64> {
        self.x_extent.map(|(_, hi)| hi)
    }

    pub fn min_y(&self) -> Option<f64> {
        self.y_extent.map(|(lo, _)| lo)
    }

    pub fn max_y(&self) -> Option<f64> {
        self.y_extent.map(|(_, hi)| hi)
    }
}

pub(super) fn widen(extent: Option<(f64, f64)>, value: f64) -> Option<(f64, f64)> {
    if value.is_nan() {
        return extent;
    }
    match extent {
        None => Some((value, value)),
        Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
    }
}

/// An ordered collection of [`XySeries`] with unique keys.
#[derive(Debug, Clone, Default)]
pub struct XySeriesCollection {
    series: Vec<XySeries>,
    order_override: Option<DomainOrder>,
}

impl XySeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_series(&mut self, series: XySeries) -> Result<()> {
        if self.series.iter().any(|s| s.key == series.key) {
            return Err(DatasetError::InvalidArgument(format!(
                "Duplicate series key '{}'",
                series.key
            )));
        }
        self.series.push(series);
        Ok(())
    }

    pub fn series(&self, index: usize) -> &XySeries {
        &self.series[index]
    }

    /// Declare the domain order explicitly instead of deriving it from the
    /// series' sorting flags.
    pub fn set_domain_order(&mut self, order: Option<DomainOrder>) {
        self.order_override = order;
    }
}

impl SeriesDataset for XySeriesCollection {
    fn series_count(&self) -> usize {
        self.series.len()
    }

    fn series_key(&self, series: usize) -> &str {
        &self.series[series].key
    }

    fn item_count(&self, series: usize) -> usize {
        self.series[series].items.len()
    }

    fn x_value(&self, series: usize, item: usize) -> f64 {
        self.series[series].items[item].0
    }

    fn y_value(&self, series: usize, item: usize) -> f64 {
        or_nan(self.series[series].items[item].1)
    }

    fn domain_order(&self) -> DomainOrder {
        if let Some(order) = self.order_override {
            return order;
        }
        if self.series.iter().all(|s| s.auto_sort) {
            DomainOrder::Ascending
        } else {
            DomainOrder::None
        }
    }

    fn domain_info(&self) -> Option<&dyn DomainInfo> {
        Some(self)
    }

    fn range_info(&self) -> Option<&dyn RangeInfo> {
        Some(self)
    }
}

impl DomainInfo for XySeriesCollection {
    fn domain_bounds(&self, _include_interval: bool) -> Option<Range> {
        self.series
            .iter()
            .filter_map(|s| s.x_extent.map(|(lo, hi)| Range::ordered(lo, hi)))
            .fold(None, |acc, r| Range::combine(acc, Some(r)))
    }
}

impl RangeInfo for XySeriesCollection {
    fn range_bounds(&self, _include_interval: bool) -> Option<Range> {
        self.series
            .iter()
            .filter_map(|s| s.y_extent.map(|(lo, hi)| Range::ordered(lo, hi)))
            .fold(None, |acc, r| Range::combine(acc, Some(r)))
    }
}

/// Series sharing one ascending set of x values; a cell with no value reads
/// as NaN.
#[derive(Debug, Clone, Default)]
pub struct DefaultTableXyDataset {
    x_values: Vec<f64>,
    series: Vec<(String, Vec<Option<f64>>)>,
}

impl DefaultTableXyDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the y value of `series_key` at `x`, creating the series and the x
    /// slot as needed.
    pub fn add(&mut self, series_key: &str, x: f64, y: impl Into<Option<f64>>) {
        let item = match self.x_values.iter().position(|&v| v == x) {
            Some(i) => i,
            None => {
                let at = self
                    .x_values
                    .partition_point(|&v| !v.is_nan() && (x.is_nan() || v < x));
                self.x_values.insert(at, x);
                for (_, values) in &mut self.series {
                    values.insert(at, None);
                }
                at
            }
        };
        let series = match self.series.iter().position(|(k, _)| k == series_key) {
            Some(s) => s,
            None => {
                self.series
                    .push((series_key.to_string(), vec![None; self.x_values.len()]));
                self.series.len() - 1
            }
        };
        self.series[series].1[item] = y.into();
    }
}

impl SeriesDataset for DefaultTableXyDataset {
    fn series_count(&self) -> usize {
        self.series.len()
    }

    fn series_key(&self, series: usize) -> &str {
        &self.series[series].0
    }

    fn item_count(&self, _series: usize) -> usize {
        self.x_values.len()
    }

    fn x_value(&self, _series: usize, item: usize) -> f64 {
        self.x_values[item]
    }

    fn y_value(&self, series: usize, item: usize) -> f64 {
        or_nan(self.series[series].1[item])
    }

    fn domain_order(&self) -> DomainOrder {
        DomainOrder::Ascending
    }
}

impl TableXyDataset for DefaultTableXyDataset {
    fn shared_item_count(&self) -> usize {
        self.x_values.len()
    }
}
