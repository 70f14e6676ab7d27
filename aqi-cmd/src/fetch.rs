//! Fetch orchestration: precomputed artifact, then cache, then upstream.

use aqi_core::{
    daily::{build_daily_records, DailyRecords},
    date_range::DateRange,
    error::{Result, UpstreamError},
    location::Location,
    source::{HourlyRequest, HourlySource},
};
use aqi_data::series::{build_annual_series, AnnualSeries};
use aqi_store::{
    cache::{Namespace, TimedCache},
    precomputed::PrecomputedLookup,
};
use aqi_utils::zone::ReportingZone;
use log::{debug, info};
use std::sync::Arc;

/// What to fetch and which shortcuts are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRequest {
    /// Needed for the precomputed lookup; anonymous points skip it.
    pub location_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    /// Cache identifier; `None` disables caching for this call.
    pub cache_key: Option<String>,
    pub skip_precomputed: bool,
}

impl DailyRequest {
    pub fn for_location(location: &Location, year: i32) -> Self {
        DailyRequest {
            location_id: Some(location.id.clone()),
            latitude: location.latitude,
            longitude: location.longitude,
            year,
            cache_key: Some(location.cache_key(year)),
            skip_precomputed: false,
        }
    }

    pub fn for_point(latitude: f64, longitude: f64, year: i32) -> Self {
        DailyRequest {
            location_id: None,
            latitude,
            longitude,
            year,
            cache_key: None,
            skip_precomputed: false,
        }
    }

    pub fn without_cache(mut self) -> Self {
        self.cache_key = None;
        self
    }

    pub fn without_precomputed(mut self) -> Self {
        self.skip_precomputed = true;
        self
    }
}

/// Produces daily records and annual series for a location/year.
///
/// Owns the cache and the precomputed memo; both live exactly as long as
/// the orchestrator.
pub struct FetchOrchestrator {
    source: Arc<dyn HourlySource>,
    cache: TimedCache,
    precomputed: PrecomputedLookup,
    zone: ReportingZone,
}

impl FetchOrchestrator {
    pub fn new(
        source: Arc<dyn HourlySource>,
        cache: TimedCache,
        precomputed: PrecomputedLookup,
        zone: ReportingZone,
    ) -> Self {
        FetchOrchestrator {
            source,
            cache,
            precomputed,
            zone,
        }
    }

    pub fn zone(&self) -> &ReportingZone {
        &self.zone
    }

    /// Daily records for the request, preferring precomputed artifacts, then
    /// the cache, then a live upstream fetch (which refreshes the cache).
    pub async fn fetch_daily(&self, request: &DailyRequest) -> Result<DailyRecords> {
        if !request.skip_precomputed {
            if let Some(id) = request.location_id.as_deref() {
                if let Some(records) = self.precomputed.lookup_daily(id, request.year).await {
                    debug!("Using precomputed daily records for {} {}", id, request.year);
                    return Ok(records);
                }
            }
        }

        let cache_key = request.cache_key.as_deref();
        if let Some(records) = self.cache.read::<DailyRecords>(Namespace::DAILY, cache_key) {
            debug!("Cache hit for {:?}", cache_key);
            return Ok(records);
        }

        let range = DateRange::for_year(request.year, self.zone.today())
            .ok_or(UpstreamError::InvalidYear(request.year))?;
        let hourly_request = HourlyRequest {
            latitude: request.latitude,
            longitude: request.longitude,
            timezone: self.zone.name.clone(),
            range,
        };
        let payload = self.source.fetch_hourly(&hourly_request).await?;
        let records = build_daily_records(&payload);
        info!(
            "Aggregated {} hours into {} of {} days for {},{}",
            payload.len(),
            records.len(),
            range.count(),
            request.latitude,
            request.longitude
        );
        self.cache.write(Namespace::DAILY, cache_key, &records);
        Ok(records)
    }

    /// Annual series for the request, cached in its own namespace.
    pub async fn fetch_series(&self, request: &DailyRequest) -> Result<AnnualSeries> {
        let cache_key = request.cache_key.as_deref();
        if let Some(series) = self.cache.read::<AnnualSeries>(Namespace::SERIES, cache_key) {
            return Ok(series);
        }
        let records = self.fetch_daily(request).await?;
        let series = build_annual_series(&records, request.year);
        self.cache.write(Namespace::SERIES, cache_key, &series);
        Ok(series)
    }
}
