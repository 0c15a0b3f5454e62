pub mod donors;
pub mod recipients;
