pub mod reading;
pub mod thresholds;
