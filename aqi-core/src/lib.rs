pub mod conversion;
pub mod daily;
pub mod date_range;
pub mod error;
pub mod hourly;
pub mod index;
pub mod location;
pub mod pollutant;
pub mod source;
#[cfg(feature = "api")]
pub mod upstream;
