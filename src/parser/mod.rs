pub mod percentile;
pub mod records;
pub mod validators;
