//! Dataset capability model and in-memory implementations.
//!
//! Architecture:
//! ```text
//!   series-based                      table-based
//!   ┌───────────────┐                 ┌─────────────────┐
//!   │ SeriesDataset │                 │ CategoryDataset │
//!   └───────────────┘                 └─────────────────┘
//!     as_interval()                     as_interval()
//!     as_high_low()                     as_multi_value()
//!     as_box_whisker()                  as_statistical()
//!     as_xyz()                          as_box_whisker()
//!     domain_info() / range_info()      range_info()
//!
//!   SliceDataset: one key → one value (consolidation input/output)
//!   KeyToGroupMap: row key → stacking group
//! ```
//!
//! Every engine function takes these traits by reference and asks for the
//! richer capability through the `as_*` accessors, which default to `None`.

pub mod category;
pub mod group;
pub mod series;
pub mod series_store;
pub mod slice;
pub mod table;
pub mod xy;

pub use category::{
    BoxWhiskerCategory, CategoryDataset, CategoryRangeInfo, IntervalCategory, MultiValueCategory,
    StatisticalCategory,
};
pub use group::KeyToGroupMap;
pub use series::{
    BoxWhiskerXy, DomainInfo, HighLowXy, IntervalXy, RangeInfo, SeriesDataset, TableXyDataset,
    XyzValues,
};
pub use series_store::{
    BoxWhiskerXyCollection, BoxWhiskerXyItem, IntervalXyCollection, IntervalXyItem,
    OhlcCollection, OhlcItem, XyzCollection, XyzItem,
};
pub use slice::{DefaultSliceDataset, SliceDataset};
pub use table::{
    BoxWhiskerItem, DefaultBoxWhiskerCategoryDataset, DefaultCategoryDataset,
    DefaultIntervalCategoryDataset, DefaultMultiValueCategoryDataset,
    DefaultStatisticalCategoryDataset, IntervalCell, KeyedTable, MeanAndStdDev,
};
pub use xy::{DefaultTableXyDataset, XySeries, XySeriesCollection};

/// Ordering of the domain (x) values within each series of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainOrder {
    Ascending,
    Descending,
    /// No ordering guarantee.
    #[default]
    None,
}

impl std::str::FromStr for DomainOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(DomainOrder::Ascending),
            "descending" | "desc" => Ok(DomainOrder::Descending),
            "none" | "unordered" => Ok(DomainOrder::None),
            other => Err(format!("Unknown domain order: '{}'", other)),
        }
    }
}

/// Convert an optional value to the NaN-as-missing convention used by
/// series accessors.
pub(crate) fn or_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_order_from_str() {
        assert_eq!("ascending".parse::<DomainOrder>(), Ok(DomainOrder::Ascending));
        assert_eq!("DESC".parse::<DomainOrder>(), Ok(DomainOrder::Descending));
        assert_eq!("unordered".parse::<DomainOrder>(), Ok(DomainOrder::None));
        assert!("sideways".parse::<DomainOrder>().is_err());
    }
}
