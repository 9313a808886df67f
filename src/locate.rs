//! Finding the items around an x value, and interpolating y between them.

use crate::dataset::{DomainOrder, SeriesDataset};
use crate::error::{DatasetError, Result};

/// Where an x value falls within a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// Outside the series, or the series is empty.
    None,
    /// The item at this index has exactly the queried x.
    Exact(usize),
    /// The queried x lies strictly between these two adjacent items.
    Between(usize, usize),
}

impl Bracket {
    /// The bracket as an index pair: `(-1, -1)`, `(i, i)` or `(i, i + 1)`.
    pub fn indices(&self) -> (isize, isize) {
        match *self {
            Bracket::None => (-1, -1),
            Bracket::Exact(i) => (i as isize, i as isize),
            Bracket::Between(lo, hi) => (lo as isize, hi as isize),
        }
    }
}

/// Locate `x` within one series, using binary search when the dataset
/// declares an ascending or descending domain and a linear scan otherwise.
///
/// A NaN `x` is never bracketed.
pub fn locate_bracket<D: SeriesDataset + ?Sized>(
    dataset: &D,
    series: usize,
    x: f64,
) -> Result<Bracket> {
    if series >= dataset.series_count() {
        return Err(DatasetError::InvalidArgument(format!(
            "series index {} out of range (series: {})",
            series,
            dataset.series_count()
        )));
    }
    if x.is_nan() {
        return Ok(Bracket::None);
    }

    let count = dataset.item_count(series);
    let bracket = match count {
        0 => Bracket::None,
        1 if dataset.x_value(series, 0) == x => Bracket::Exact(0),
        1 => Bracket::None,
        _ => match dataset.domain_order() {
            DomainOrder::Ascending => search_ordered(dataset, series, count, x, |a, b| a < b),
            DomainOrder::Descending => search_ordered(dataset, series, count, x, |a, b| a > b),
            DomainOrder::None => scan_unordered(dataset, series, count, x),
        },
    };
    log::trace!("x={} in series {}: {:?}", x, series, bracket);
    Ok(bracket)
}

/// Binary search over a series sorted by `precedes`.
fn search_ordered<D, F>(dataset: &D, series: usize, count: usize, x: f64, precedes: F) -> Bracket
where
    D: SeriesDataset + ?Sized,
    F: Fn(f64, f64) -> bool,
{
    let mut low = 0;
    let mut high = count - 1;

    let first = dataset.x_value(series, low);
    if precedes(x, first) {
        return Bracket::None;
    }
    if x == first {
        return Bracket::Exact(low);
    }
    let last = dataset.x_value(series, high);
    if precedes(last, x) {
        return Bracket::None;
    }
    if x == last {
        return Bracket::Exact(high);
    }

    while high - low > 1 {
        let mid = low + (high - low) / 2;
        let value = dataset.x_value(series, mid);
        if x == value {
            return Bracket::Exact(mid);
        }
        if precedes(value, x) {
            low = mid;
        } else {
            high = mid;
        }
    }
    Bracket::Between(low, high)
}

/// First adjacent pair, from the start, that matches or straddles `x`.
fn scan_unordered<D: SeriesDataset + ?Sized>(
    dataset: &D,
    series: usize,
    count: usize,
    x: f64,
) -> Bracket {
    if dataset.x_value(series, 0) == x {
        return Bracket::Exact(0);
    }
    for i in 1..count {
        let previous = dataset.x_value(series, i - 1);
        let current = dataset.x_value(series, i);
        if x == current {
            return Bracket::Exact(i);
        }
        if (previous < x && x < current) || (current < x && x < previous) {
            return Bracket::Between(i - 1, i);
        }
    }
    Bracket::None
}

/// The y value at `x`, interpolated linearly between the bracketing items.
///
/// An exact hit returns the stored y; no bracket gives NaN.
pub fn interpolate_y<D: SeriesDataset + ?Sized>(dataset: &D, series: usize, x: f64) -> Result<f64> {
    Ok(match locate_bracket(dataset, series, x)? {
        Bracket::None => f64::NAN,
        Bracket::Exact(i) => dataset.y_value(series, i),
        Bracket::Between(lo, hi) => {
            let x0 = dataset.x_value(series, lo);
            let x1 = dataset.x_value(series, hi);
            let y0 = dataset.y_value(series, lo);
            let y1 = dataset.y_value(series, hi);
            y0 + (y1 - y0) * (x - x0) / (x1 - x0)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{XySeries, XySeriesCollection};

    fn collection(points: &[(f64, f64)], order: Option<DomainOrder>) -> XySeriesCollection {
        let mut s = XySeries::unsorted("S");
        for &(x, y) in points {
            s.add(x, y);
        }
        let mut c = XySeriesCollection::new();
        c.add_series(s).unwrap();
        c.set_domain_order(order);
        c
    }

    fn ascending() -> XySeriesCollection {
        collection(
            &[(1.0, 10.0), (2.0, 20.0), (4.0, 40.0), (8.0, 80.0), (9.0, 0.0)],
            Some(DomainOrder::Ascending),
        )
    }

    fn descending() -> XySeriesCollection {
        collection(
            &[(9.0, 0.0), (8.0, 80.0), (4.0, 40.0), (2.0, 20.0), (1.0, 10.0)],
            Some(DomainOrder::Descending),
        )
    }

    #[test]
    fn test_unordered_scan_finds_first_straddle() {
        let c = collection(&[(1.0, 5.0), (0.0, 10.0), (4.0, 20.0)], None);
        assert_eq!(c.domain_order(), DomainOrder::None);
        assert_eq!(locate_bracket(&c, 0, 3.0).unwrap(), Bracket::Between(1, 2));
        assert_eq!(interpolate_y(&c, 0, 3.0).unwrap(), 17.5);
    }

    #[test]
    fn test_unordered_exact_and_miss() {
        let c = collection(&[(1.0, 5.0), (0.0, 10.0), (4.0, 20.0)], None);
        assert_eq!(locate_bracket(&c, 0, 1.0).unwrap(), Bracket::Exact(0));
        assert_eq!(locate_bracket(&c, 0, 4.0).unwrap(), Bracket::Exact(2));
        assert_eq!(locate_bracket(&c, 0, 0.5).unwrap(), Bracket::Between(0, 1));
        assert_eq!(locate_bracket(&c, 0, 7.0).unwrap(), Bracket::None);
        assert!(interpolate_y(&c, 0, 7.0).unwrap().is_nan());
    }

    #[test]
    fn test_empty_and_single_item_series() {
        let empty = collection(&[], Some(DomainOrder::Ascending));
        assert_eq!(locate_bracket(&empty, 0, 1.0).unwrap(), Bracket::None);

        let single = collection(&[(2.0, 7.0)], Some(DomainOrder::Ascending));
        assert_eq!(locate_bracket(&single, 0, 2.0).unwrap(), Bracket::Exact(0));
        assert_eq!(locate_bracket(&single, 0, 2.5).unwrap(), Bracket::None);
        assert_eq!(interpolate_y(&single, 0, 2.0).unwrap(), 7.0);
    }

    #[test]
    fn test_ascending_search() {
        let c = ascending();
        assert_eq!(locate_bracket(&c, 0, 0.5).unwrap(), Bracket::None);
        assert_eq!(locate_bracket(&c, 0, 9.5).unwrap(), Bracket::None);
        assert_eq!(locate_bracket(&c, 0, 1.0).unwrap(), Bracket::Exact(0));
        assert_eq!(locate_bracket(&c, 0, 9.0).unwrap(), Bracket::Exact(4));
        assert_eq!(locate_bracket(&c, 0, 4.0).unwrap(), Bracket::Exact(2));
        assert_eq!(locate_bracket(&c, 0, 3.0).unwrap(), Bracket::Between(1, 2));
        assert_eq!(locate_bracket(&c, 0, 8.5).unwrap(), Bracket::Between(3, 4));
        assert_eq!(interpolate_y(&c, 0, 3.0).unwrap(), 30.0);
        assert_eq!(interpolate_y(&c, 0, 8.5).unwrap(), 40.0);
    }

    #[test]
    fn test_auto_sorted_series_with_nan_x() {
        let mut s = XySeries::new("S");
        for x in [1.0, 2.0, 3.0, f64::NAN, 0.5, 0.7, 0.8, 1.5] {
            s.add(x, x * 10.0);
        }
        let mut c = XySeriesCollection::new();
        c.add_series(s).unwrap();
        assert_eq!(c.domain_order(), DomainOrder::Ascending);
        assert_eq!(locate_bracket(&c, 0, 1.2).unwrap(), Bracket::Between(3, 4));
        assert_eq!(locate_bracket(&c, 0, 2.0).unwrap(), Bracket::Exact(5));
        assert!((interpolate_y(&c, 0, 1.2).unwrap() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_descending_search_mirrors_ascending() {
        let c = descending();
        assert_eq!(locate_bracket(&c, 0, 9.5).unwrap(), Bracket::None);
        assert_eq!(locate_bracket(&c, 0, 0.5).unwrap(), Bracket::None);
        assert_eq!(locate_bracket(&c, 0, 9.0).unwrap(), Bracket::Exact(0));
        assert_eq!(locate_bracket(&c, 0, 1.0).unwrap(), Bracket::Exact(4));
        assert_eq!(locate_bracket(&c, 0, 4.0).unwrap(), Bracket::Exact(2));
        assert_eq!(locate_bracket(&c, 0, 3.0).unwrap(), Bracket::Between(2, 3));
        assert_eq!(locate_bracket(&c, 0, 8.5).unwrap(), Bracket::Between(0, 1));
        assert_eq!(interpolate_y(&c, 0, 3.0).unwrap(), 30.0);
    }

    #[test]
    fn test_round_trip_at_every_knot() {
        for c in [ascending(), descending()] {
            for item in 0..c.item_count(0) {
                let x = c.x_value(0, item);
                assert_eq!(locate_bracket(&c, 0, x).unwrap(), Bracket::Exact(item));
                assert_eq!(interpolate_y(&c, 0, x).unwrap(), c.y_value(0, item));
            }
        }
    }

    #[test]
    fn test_bracket_indices() {
        assert_eq!(Bracket::None.indices(), (-1, -1));
        assert_eq!(Bracket::Exact(3).indices(), (3, 3));
        assert_eq!(Bracket::Between(3, 4).indices(), (3, 4));
    }

    #[test]
    fn test_nan_query_and_bad_series() {
        let c = ascending();
        assert_eq!(locate_bracket(&c, 0, f64::NAN).unwrap(), Bracket::None);
        assert!(matches!(
            locate_bracket(&c, 1, 2.0),
            Err(DatasetError::InvalidArgument(_))
        ));
        assert!(interpolate_y(&c, 5, 2.0).is_err());
    }
}
