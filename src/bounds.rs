//! Axis extents over series and category datasets.
//!
//! Every scan folds values into an [`Extent`]; NaN and missing values are
//! skipped. Which sub-values of an item are folded depends on the richest
//! capability the dataset exposes, resolved once per call in priority order
//! box-and-whisker, statistical, multi-value, interval/high-low, plain.

use crate::dataset::{
    BoxWhiskerCategory, BoxWhiskerXy, CategoryDataset, HighLowXy, IntervalCategory, IntervalXy,
    MultiValueCategory, SeriesDataset, StatisticalCategory, XyzValues,
};
use crate::error::{DatasetError, Result};
use crate::range::Range;

/// Running min/max over the folded values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    pub(crate) fn new() -> Self {
        Extent {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub(crate) fn include(&mut self, value: f64) {
        self.include_lower(value);
        self.include_upper(value);
    }

    /// Fold `value` as a candidate minimum only.
    pub(crate) fn include_lower(&mut self, value: f64) {
        if !value.is_nan() {
            self.min = self.min.min(value);
        }
    }

    /// Fold `value` as a candidate maximum only.
    pub(crate) fn include_upper(&mut self, value: f64) {
        if !value.is_nan() {
            self.max = self.max.max(value);
        }
    }

    pub(crate) fn include_opt(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.include(v);
        }
    }

    pub(crate) fn lower(&self) -> Option<f64> {
        (self.min != f64::INFINITY).then_some(self.min)
    }

    pub(crate) fn upper(&self) -> Option<f64> {
        (self.max != f64::NEG_INFINITY).then_some(self.max)
    }

    pub(crate) fn into_range(self) -> Option<Range> {
        if self.min > self.max {
            None
        } else {
            Some(Range::ordered(self.min, self.max))
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Domain,
    Range,
    Z,
}

/// What to measure and which items take part.
#[derive(Debug, Clone, Copy)]
pub struct BoundsQuery<'a> {
    pub axis: Axis,
    pub include_interval: bool,
    /// Restrict the scan to these series, in this order.
    pub visible_series: Option<&'a [String]>,
    /// Only items whose plain x value lies in this closed range count.
    /// Range and z queries only; domain queries ignore it.
    pub domain_filter: Option<Range>,
}

impl<'a> BoundsQuery<'a> {
    pub fn new(axis: Axis) -> Self {
        BoundsQuery {
            axis,
            include_interval: true,
            visible_series: None,
            domain_filter: None,
        }
    }

    pub fn domain() -> Self {
        Self::new(Axis::Domain)
    }

    pub fn range() -> Self {
        Self::new(Axis::Range)
    }

    pub fn z() -> Self {
        Self::new(Axis::Z)
    }

    pub fn include_interval(mut self, include: bool) -> Self {
        self.include_interval = include;
        self
    }

    pub fn visible(mut self, keys: &'a [String]) -> Self {
        self.visible_series = Some(keys);
        self
    }

    pub fn within(mut self, filter: Range) -> Self {
        self.domain_filter = Some(filter);
        self
    }

    /// Unrestricted queries may be answered by a dataset's own bounds.
    fn is_unrestricted(&self) -> bool {
        self.visible_series.is_none() && (self.axis == Axis::Domain || self.domain_filter.is_none())
    }
}

// =============================================================================
// Capability dispatch
// =============================================================================

enum SeriesShape<'a> {
    BoxWhisker(&'a dyn BoxWhiskerXy),
    Interval(&'a dyn IntervalXy),
    HighLow(&'a dyn HighLowXy),
    Plain,
}

fn classify_series<D: SeriesDataset + ?Sized>(dataset: &D, include_interval: bool) -> SeriesShape<'_> {
    if !include_interval {
        return SeriesShape::Plain;
    }
    if let Some(bw) = dataset.as_box_whisker() {
        SeriesShape::BoxWhisker(bw)
    } else if let Some(interval) = dataset.as_interval() {
        SeriesShape::Interval(interval)
    } else if let Some(hl) = dataset.as_high_low() {
        SeriesShape::HighLow(hl)
    } else {
        SeriesShape::Plain
    }
}

enum CategoryShape<'a> {
    BoxWhisker(&'a dyn BoxWhiskerCategory),
    Statistical(&'a dyn StatisticalCategory),
    MultiValue(&'a dyn MultiValueCategory),
    Interval(&'a dyn IntervalCategory),
    Plain,
}

fn classify_category<D: CategoryDataset + ?Sized>(
    dataset: &D,
    include_interval: bool,
) -> CategoryShape<'_> {
    if !include_interval {
        return CategoryShape::Plain;
    }
    if let Some(bw) = dataset.as_box_whisker() {
        CategoryShape::BoxWhisker(bw)
    } else if let Some(stat) = dataset.as_statistical() {
        CategoryShape::Statistical(stat)
    } else if let Some(mv) = dataset.as_multi_value() {
        CategoryShape::MultiValue(mv)
    } else if let Some(interval) = dataset.as_interval() {
        CategoryShape::Interval(interval)
    } else {
        CategoryShape::Plain
    }
}

/// Resolve the participating series indices, failing on unknown keys.
fn resolve_series<D: SeriesDataset + ?Sized>(
    dataset: &D,
    visible: Option<&[String]>,
) -> Result<Vec<usize>> {
    match visible {
        None => Ok((0..dataset.series_count()).collect()),
        Some(keys) => keys
            .iter()
            .map(|k| {
                dataset
                    .index_of(k)
                    .ok_or_else(|| DatasetError::UnknownKey(k.clone()))
            })
            .collect(),
    }
}

fn resolve_rows<D: CategoryDataset + ?Sized>(
    dataset: &D,
    visible: Option<&[String]>,
) -> Result<Vec<usize>> {
    match visible {
        None => Ok((0..dataset.row_count()).collect()),
        Some(keys) => keys
            .iter()
            .map(|k| {
                dataset
                    .row_index(k)
                    .ok_or_else(|| DatasetError::UnknownKey(k.clone()))
            })
            .collect(),
    }
}

// =============================================================================
// Series datasets
// =============================================================================

/// Find the bounds of a series dataset along the queried axis.
///
/// Returns `Ok(None)` when no foldable value exists.
pub fn find_bounds<D: SeriesDataset + ?Sized>(
    dataset: &D,
    query: &BoundsQuery<'_>,
) -> Result<Option<Range>> {
    let series = resolve_series(dataset, query.visible_series)?;

    if query.is_unrestricted() {
        let fast = match query.axis {
            Axis::Domain => dataset
                .domain_info()
                .map(|info| info.domain_bounds(query.include_interval)),
            Axis::Range => dataset
                .range_info()
                .map(|info| info.range_bounds(query.include_interval)),
            Axis::Z => None,
        };
        if let Some(result) = fast {
            log::debug!("{:?} bounds answered by dataset bounds info", query.axis);
            return Ok(result);
        }
    }

    let result = match query.axis {
        Axis::Domain => scan_domain(dataset, &series, query),
        Axis::Range => scan_range(dataset, &series, query),
        Axis::Z => {
            let z = dataset.as_xyz().ok_or_else(|| {
                DatasetError::InvalidArgument("dataset has no z values".to_string())
            })?;
            scan_z(dataset, z, &series, query)
        }
    };
    log::trace!(
        "scanned {} series for {:?} bounds: {:?}",
        series.len(),
        query.axis,
        result
    );
    Ok(result)
}

/// Domain bounds over every series, preferring the dataset's own bounds.
pub fn find_domain_bounds<D: SeriesDataset + ?Sized>(
    dataset: &D,
    include_interval: bool,
) -> Option<Range> {
    match dataset.domain_info() {
        Some(info) => info.domain_bounds(include_interval),
        None => iterate_domain_bounds(dataset, include_interval),
    }
}

/// Domain bounds over every series by scanning all items.
pub fn iterate_domain_bounds<D: SeriesDataset + ?Sized>(
    dataset: &D,
    include_interval: bool,
) -> Option<Range> {
    scan_domain(
        dataset,
        &all_series(dataset),
        &BoundsQuery::domain().include_interval(include_interval),
    )
}

/// Range bounds over every series, preferring the dataset's own bounds.
pub fn find_range_bounds<D: SeriesDataset + ?Sized>(
    dataset: &D,
    include_interval: bool,
) -> Option<Range> {
    match dataset.range_info() {
        Some(info) => info.range_bounds(include_interval),
        None => iterate_range_bounds(dataset, include_interval),
    }
}

/// Range bounds over every series by scanning all items.
pub fn iterate_range_bounds<D: SeriesDataset + ?Sized>(
    dataset: &D,
    include_interval: bool,
) -> Option<Range> {
    scan_range(
        dataset,
        &all_series(dataset),
        &BoundsQuery::range().include_interval(include_interval),
    )
}

fn all_series<D: SeriesDataset + ?Sized>(dataset: &D) -> Vec<usize> {
    (0..dataset.series_count()).collect()
}

/// Z bounds over every series; `None` for datasets without z values.
pub fn find_z_bounds<D: SeriesDataset + ?Sized>(
    dataset: &D,
    include_interval: bool,
) -> Option<Range> {
    let z = dataset.as_xyz()?;
    scan_z(
        dataset,
        z,
        &all_series(dataset),
        &BoundsQuery::z().include_interval(include_interval),
    )
}

fn passes_filter<D: SeriesDataset + ?Sized>(
    dataset: &D,
    series: usize,
    item: usize,
    filter: Option<Range>,
) -> bool {
    filter.map_or(true, |r| r.contains(dataset.x_value(series, item)))
}

fn scan_domain<D: SeriesDataset + ?Sized>(
    dataset: &D,
    series: &[usize],
    query: &BoundsQuery<'_>,
) -> Option<Range> {
    let interval = if query.include_interval {
        dataset.as_interval()
    } else {
        None
    };
    let mut extent = Extent::new();
    for &s in series {
        for item in 0..dataset.item_count(s) {
            extent.include(dataset.x_value(s, item));
            if let Some(iv) = interval {
                extent.include(iv.start_x_value(s, item));
                extent.include(iv.end_x_value(s, item));
            }
        }
    }
    extent.into_range()
}

fn scan_range<D: SeriesDataset + ?Sized>(
    dataset: &D,
    series: &[usize],
    query: &BoundsQuery<'_>,
) -> Option<Range> {
    let shape = classify_series(dataset, query.include_interval);
    let mut extent = Extent::new();
    for &s in series {
        for item in 0..dataset.item_count(s) {
            if !passes_filter(dataset, s, item, query.domain_filter) {
                continue;
            }
            match shape {
                SeriesShape::BoxWhisker(bw) => {
                    let center = bw.mean_value(s, item);
                    if let Some(lo) = bw.min_regular_value(s, item).or(center) {
                        extent.include_lower(lo);
                    }
                    if let Some(hi) = bw.max_regular_value(s, item).or(center) {
                        extent.include_upper(hi);
                    }
                }
                SeriesShape::Interval(iv) => {
                    extent.include(dataset.y_value(s, item));
                    extent.include(iv.start_y_value(s, item));
                    extent.include(iv.end_y_value(s, item));
                }
                SeriesShape::HighLow(hl) => {
                    extent.include_lower(hl.low_value(s, item));
                    extent.include_upper(hl.high_value(s, item));
                }
                SeriesShape::Plain => extent.include(dataset.y_value(s, item)),
            }
        }
    }
    extent.into_range()
}

fn scan_z<D: SeriesDataset + ?Sized>(
    dataset: &D,
    z: &dyn XyzValues,
    series: &[usize],
    query: &BoundsQuery<'_>,
) -> Option<Range> {
    let mut extent = Extent::new();
    for &s in series {
        for item in 0..dataset.item_count(s) {
            if !passes_filter(dataset, s, item, query.domain_filter) {
                continue;
            }
            extent.include(z.z_value(s, item));
            if query.include_interval {
                extent.include_opt(z.start_z_value(s, item));
                extent.include_opt(z.end_z_value(s, item));
            }
        }
    }
    extent.into_range()
}

// =============================================================================
// Category datasets
// =============================================================================

/// Range bounds of a category dataset, optionally restricted to the rows
/// named in `visible`.
pub fn find_category_range_bounds<D: CategoryDataset + ?Sized>(
    dataset: &D,
    include_interval: bool,
    visible: Option<&[String]>,
) -> Result<Option<Range>> {
    let rows = resolve_rows(dataset, visible)?;
    if visible.is_none() {
        if let Some(info) = dataset.range_info() {
            log::debug!("category range bounds answered by dataset bounds info");
            return Ok(info.range_bounds(include_interval));
        }
    }

    let shape = classify_category(dataset, include_interval);
    let mut extent = Extent::new();
    for &row in &rows {
        for column in 0..dataset.column_count() {
            match shape {
                CategoryShape::BoxWhisker(bw) => {
                    let center = dataset.value(row, column);
                    if let Some(lo) = bw.min_regular_value(row, column).or(center) {
                        extent.include_lower(lo);
                    }
                    if let Some(hi) = bw.max_regular_value(row, column).or(center) {
                        extent.include_upper(hi);
                    }
                }
                CategoryShape::Statistical(stat) => {
                    if let Some(mean) = stat.mean_value(row, column) {
                        let sd = stat
                            .std_dev_value(row, column)
                            .filter(|sd| !sd.is_nan())
                            .unwrap_or(0.0);
                        if !mean.is_nan() {
                            extent.include_lower(mean - sd);
                            extent.include_upper(mean + sd);
                        }
                    }
                }
                CategoryShape::MultiValue(mv) => {
                    for &v in mv.values(row, column) {
                        extent.include(v);
                    }
                }
                CategoryShape::Interval(iv) => {
                    extent.include_opt(dataset.value(row, column));
                    extent.include_opt(iv.start_value(row, column));
                    extent.include_opt(iv.end_value(row, column));
                }
                CategoryShape::Plain => extent.include_opt(dataset.value(row, column)),
            }
        }
    }
    Ok(extent.into_range())
}

// =============================================================================
// Single extremes
// =============================================================================

/// Smallest x value, using the interval start when the dataset has one.
pub fn find_minimum_domain_value<D: SeriesDataset + ?Sized>(dataset: &D) -> Option<f64> {
    if let Some(info) = dataset.domain_info() {
        return info.domain_lower_bound(true);
    }
    let interval = dataset.as_interval();
    let mut extent = Extent::new();
    for s in 0..dataset.series_count() {
        for item in 0..dataset.item_count(s) {
            extent.include_lower(match interval {
                Some(iv) => iv.start_x_value(s, item),
                None => dataset.x_value(s, item),
            });
        }
    }
    extent.lower()
}

/// Largest x value, using the interval end when the dataset has one.
pub fn find_maximum_domain_value<D: SeriesDataset + ?Sized>(dataset: &D) -> Option<f64> {
    if let Some(info) = dataset.domain_info() {
        return info.domain_upper_bound(true);
    }
    let interval = dataset.as_interval();
    let mut extent = Extent::new();
    for s in 0..dataset.series_count() {
        for item in 0..dataset.item_count(s) {
            extent.include_upper(match interval {
                Some(iv) => iv.end_x_value(s, item),
                None => dataset.x_value(s, item),
            });
        }
    }
    extent.upper()
}

/// Smallest y value: interval start, else low, else y.
pub fn find_minimum_range_value<D: SeriesDataset + ?Sized>(dataset: &D) -> Option<f64> {
    if let Some(info) = dataset.range_info() {
        return info.range_lower_bound(true);
    }
    let interval = dataset.as_interval();
    let high_low = dataset.as_high_low();
    let mut extent = Extent::new();
    for s in 0..dataset.series_count() {
        for item in 0..dataset.item_count(s) {
            let value = if let Some(iv) = interval {
                iv.start_y_value(s, item)
            } else if let Some(hl) = high_low {
                hl.low_value(s, item)
            } else {
                dataset.y_value(s, item)
            };
            extent.include_lower(value);
        }
    }
    extent.lower()
}

/// Largest y value: interval end, else high, else y.
pub fn find_maximum_range_value<D: SeriesDataset + ?Sized>(dataset: &D) -> Option<f64> {
    if let Some(info) = dataset.range_info() {
        return info.range_upper_bound(true);
    }
    let interval = dataset.as_interval();
    let high_low = dataset.as_high_low();
    let mut extent = Extent::new();
    for s in 0..dataset.series_count() {
        for item in 0..dataset.item_count(s) {
            let value = if let Some(iv) = interval {
                iv.end_y_value(s, item)
            } else if let Some(hl) = high_low {
                hl.high_value(s, item)
            } else {
                dataset.y_value(s, item)
            };
            extent.include_upper(value);
        }
    }
    extent.upper()
}

/// Smallest cell value of a category dataset (interval start if present).
pub fn find_minimum_category_value<D: CategoryDataset + ?Sized>(dataset: &D) -> Option<f64> {
    let interval = dataset.as_interval();
    let mut extent = Extent::new();
    for row in 0..dataset.row_count() {
        for column in 0..dataset.column_count() {
            let value = match interval {
                Some(iv) => iv.start_value(row, column),
                None => dataset.value(row, column),
            };
            if let Some(v) = value {
                extent.include_lower(v);
            }
        }
    }
    extent.lower()
}

/// Largest cell value of a category dataset (interval end if present).
pub fn find_maximum_category_value<D: CategoryDataset + ?Sized>(dataset: &D) -> Option<f64> {
    let interval = dataset.as_interval();
    let mut extent = Extent::new();
    for row in 0..dataset.row_count() {
        for column in 0..dataset.column_count() {
            let value = match interval {
                Some(iv) => iv.end_value(row, column),
                None => dataset.value(row, column),
            };
            if let Some(v) = value {
                extent.include_upper(v);
            }
        }
    }
    extent.upper()
}
