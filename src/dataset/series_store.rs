use super::series::{BoxWhiskerXy, HighLowXy, IntervalXy, SeriesDataset, XyzValues};
use super::{or_nan, DomainOrder};
use crate::error::{DatasetError, Result};

/// Items that can sit in a [`SeriesStore`]: anything with an x and a y.
pub trait StoredItem {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

/// Shared storage for the richer series collections: named series of items,
/// kept in insertion order.
#[derive(Debug, Clone)]
pub struct SeriesStore<T> {
    series: Vec<(String, Vec<T>)>,
    order: DomainOrder,
}

impl<T> Default for SeriesStore<T> {
    fn default() -> Self {
        SeriesStore {
            series: Vec::new(),
            order: DomainOrder::None,
        }
    }
}

impl<T: StoredItem> SeriesStore<T> {
    fn add_series(&mut self, key: &str, items: Vec<T>) -> Result<()> {
        if self.series.iter().any(|(k, _)| k == key) {
            return Err(DatasetError::InvalidArgument(format!(
                "Duplicate series key '{}'",
                key
            )));
        }
        self.series.push((key.to_string(), items));
        Ok(())
    }

    fn item(&self, series: usize, item: usize) -> &T {
        &self.series[series].1[item]
    }
}

macro_rules! series_collection {
    (@capability IntervalXyItem) => {
        fn as_interval(&self) -> Option<&dyn IntervalXy> {
            Some(self)
        }
    };
    (@capability OhlcItem) => {
        fn as_high_low(&self) -> Option<&dyn HighLowXy> {
            Some(self)
        }
    };
    (@capability BoxWhiskerXyItem) => {
        fn as_box_whisker(&self) -> Option<&dyn BoxWhiskerXy> {
            Some(self)
        }
    };
    (@capability XyzItem) => {
        fn as_xyz(&self) -> Option<&dyn XyzValues> {
            Some(self)
        }
    };
    ($name:ident, $item:ident) => {
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            store: SeriesStore<$item>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Append a series. Keys must be unique within the collection.
            pub fn add_series(&mut self, key: &str, items: Vec<$item>) -> Result<()> {
                self.store.add_series(key, items)
            }

            pub fn set_domain_order(&mut self, order: DomainOrder) {
                self.store.order = order;
            }

            pub fn item(&self, series: usize, item: usize) -> &$item {
                self.store.item(series, item)
            }
        }

        impl SeriesDataset for $name {
            fn series_count(&self) -> usize {
                self.store.series.len()
            }

            fn series_key(&self, series: usize) -> &str {
                &self.store.series[series].0
            }

            fn item_count(&self, series: usize) -> usize {
                self.store.series[series].1.len()
            }

            fn x_value(&self, series: usize, item: usize) -> f64 {
                self.store.item(series, item).x()
            }

            fn y_value(&self, series: usize, item: usize) -> f64 {
                self.store.item(series, item).y()
            }

            fn domain_order(&self) -> DomainOrder {
                self.store.order
            }

            series_collection!(@capability $item);
        }
    };
}

// ---------------------------------------------------------------------------
// Interval items
// ---------------------------------------------------------------------------

/// An (x, y) item with start/end bounds on both axes. NaN marks a missing
/// value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalXyItem {
    pub x: f64,
    pub x_start: f64,
    pub x_end: f64,
    pub y: f64,
    pub y_start: f64,
    pub y_end: f64,
}

impl IntervalXyItem {
    /// An item whose interval collapses onto its value on both axes.
    pub fn point(x: f64, y: f64) -> Self {
        IntervalXyItem {
            x,
            x_start: x,
            x_end: x,
            y,
            y_start: y,
            y_end: y,
        }
    }

    pub fn with_x_interval(mut self, start: f64, end: f64) -> Self {
        self.x_start = start;
        self.x_end = end;
        self
    }

    pub fn with_y_interval(mut self, start: f64, end: f64) -> Self {
        self.y_start = start;
        self.y_end = end;
        self
    }
}

impl StoredItem for IntervalXyItem {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

series_collection!(IntervalXyCollection, IntervalXyItem);

impl IntervalXy for IntervalXyCollection {
    fn start_x_value(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).x_start
    }

    fn end_x_value(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).x_end
    }

    fn start_y_value(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).y_start
    }

    fn end_y_value(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).y_end
    }
}

// ---------------------------------------------------------------------------
// Open/high/low/close items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhlcItem {
    pub x: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcItem {
    pub fn new(x: f64, open: f64, high: f64, low: f64, close: f64) -> Self {
        OhlcItem {
            x,
            open,
            high,
            low,
            close,
        }
    }
}

impl StoredItem for OhlcItem {
    fn x(&self) -> f64 {
        self.x
    }

    /// The close is the representative y of a high/low item.
    fn y(&self) -> f64 {
        self.close
    }
}

series_collection!(OhlcCollection, OhlcItem);

impl HighLowXy for OhlcCollection {
    fn high_value(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).high
    }

    fn low_value(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).low
    }

    fn open_value(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).open
    }

    fn close_value(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).close
    }
}

// ---------------------------------------------------------------------------
// Box-and-whisker items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxWhiskerXyItem {
    pub x: f64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min_regular: Option<f64>,
    pub max_regular: Option<f64>,
}

impl StoredItem for BoxWhiskerXyItem {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        or_nan(self.mean)
    }
}

series_collection!(BoxWhiskerXyCollection, BoxWhiskerXyItem);

impl BoxWhiskerXy for BoxWhiskerXyCollection {
    fn mean_value(&self, series: usize, item: usize) -> Option<f64> {
        self.item(series, item).mean
    }

    fn median_value(&self, series: usize, item: usize) -> Option<f64> {
        self.item(series, item).median
    }

    fn min_regular_value(&self, series: usize, item: usize) -> Option<f64> {
        self.item(series, item).min_regular
    }

    fn max_regular_value(&self, series: usize, item: usize) -> Option<f64> {
        self.item(series, item).max_regular
    }
}

// ---------------------------------------------------------------------------
// XYZ items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XyzItem {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Optional (start, end) interval around `z`.
    pub z_interval: Option<(f64, f64)>,
}

impl XyzItem {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        XyzItem {
            x,
            y,
            z,
            z_interval: None,
        }
    }
}

impl StoredItem for XyzItem {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

series_collection!(XyzCollection, XyzItem);

impl XyzValues for XyzCollection {
    fn z_value(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).z
    }

    fn start_z_value(&self, series: usize, item: usize) -> Option<f64> {
        self.item(series, item).z_interval.map(|(start, _)| start)
    }

    fn end_z_value(&self, series: usize, item: usize) -> Option<f64> {
        self.item(series, item).z_interval.map(|(_, end)| end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_collection_exposes_interval_capability() {
        let mut c = IntervalXyCollection::new();
        c.add_series(
            "S",
            vec![IntervalXyItem::point(1.0, 10.0).with_x_interval(0.5, 1.5)],
        )
        .unwrap();
        let interval = c.as_interval().expect("interval capability");
        assert_eq!(interval.start_x_value(0, 0), 0.5);
        assert_eq!(interval.end_y_value(0, 0), 10.0);
        assert!(c.as_high_low().is_none());
    }

    #[test]
    fn test_ohlc_y_is_close() {
        let mut c = OhlcCollection::new();
        c.add_series("S", vec![OhlcItem::new(1.0, 2.0, 5.0, 1.0, 3.0)])
            .unwrap();
        assert_eq!(c.y_value(0, 0), 3.0);
        assert_eq!(c.as_high_low().unwrap().high_value(0, 0), 5.0);
    }

    #[test]
    fn test_box_whisker_missing_mean_reads_nan() {
        let mut c = BoxWhiskerXyCollection::new();
        c.add_series(
            "S",
            vec![BoxWhiskerXyItem {
                x: 1.0,
                ..Default::default()
            }],
        )
        .unwrap();
        assert!(c.y_value(0, 0).is_nan());
    }

    #[test]
    fn test_duplicate_series_key_rejected() {
        let mut c = XyzCollection::new();
        c.add_series("S", vec![]).unwrap();
        assert!(c.add_series("S", vec![]).is_err());
    }
}
