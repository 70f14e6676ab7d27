//! The seam between aggregation and whatever produces hourly data.

use crate::{date_range::DateRange, error::Result, hourly::HourlyPayload};
use async_trait::async_trait;

/// Parameters of a single hourly request covering every pollutant.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name the upstream localizes timestamps into.
    pub timezone: String,
    pub range: DateRange,
}

/// A producer of hourly air-quality series.
///
/// Implemented by the Open-Meteo client (feature `api`) and by in-memory
/// fakes in tests.
#[async_trait]
pub trait HourlySource: Send + Sync {
    async fn fetch_hourly(&self, request: &HourlyRequest) -> Result<HourlyPayload>;
}
