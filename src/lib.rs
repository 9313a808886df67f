// Library exports for chartbounds

pub mod error;
pub mod range;
pub mod dataset;

// Engine
pub mod bounds;
pub mod stacked;
pub mod consolidate;
pub mod locate;
pub mod table_utils;

// Input
pub mod csv_reader;

pub use error::{DatasetError, Result};
pub use range::Range;
