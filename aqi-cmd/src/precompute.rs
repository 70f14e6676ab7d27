//! Batch precompute of daily artifacts and per-year maps.
//!
//! For each year the locations are drained from a shared queue by a fixed
//! number of workers. A location whose daily artifact already exists is
//! reused as-is; otherwise it is fetched (retrying on rate limits) and
//! written. The map for a year is written only if every location succeeded.

use crate::{
    fetch::{DailyRequest, FetchOrchestrator},
    query::{http_client, load_locations},
};
use aqi_core::{error::Result, location::Location, upstream::OpenMeteoClient};
use aqi_data::{map::MapArtifact, series::build_day_array};
use aqi_store::{
    artifacts::ArtifactStore,
    backend::MemoryStore,
    cache::TimedCache,
    error::StoreError,
    precomputed::{PrecomputedLookup, PRECOMPUTED_YEARS},
};
use aqi_utils::zone::ReportingZone;
use futures::future::join_all;
use log::{info, warn};
use rand::Rng;
use std::{
    collections::{BTreeMap, VecDeque},
    future::Future,
    path::Path,
    sync::Arc,
    time::Duration,
};
use thiserror::Error;
use tokio::{sync::Mutex, time::sleep};

/// Backoff schedule for rate-limited requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the random extra wait.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(1200),
            jitter: Duration::from_millis(400),
        }
    }
}

impl RetryPolicy {
    /// Wait before the retry that follows failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..jitter_ms)
        };
        self.base_delay * attempt + Duration::from_millis(extra)
    }
}

/// Runs `operation` until it succeeds, fails with anything other than a rate
/// limit, or runs out of attempts.
pub async fn fetch_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_rate_limited() && attempt < policy.max_attempts => {
                let wait = policy.backoff(attempt);
                warn!("  ↻ {} rate-limited, retrying in {}ms", label, wait.as_millis());
                sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrecomputeConfig {
    pub years: Vec<i32>,
    /// Number of locations processed at once.
    pub concurrency: usize,
    pub retry: RetryPolicy,
    /// Pause after each completed location.
    pub throttle: Duration,
}

impl Default for PrecomputeConfig {
    fn default() -> Self {
        PrecomputeConfig {
            years: PRECOMPUTED_YEARS.to_vec(),
            concurrency: 2,
            retry: RetryPolicy::default(),
            throttle: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationFailure {
    pub location_id: String,
    pub name: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum PrecomputeError {
    #[error("Failed to precompute {failed} districts for {year}.")]
    YearFailed {
        year: i32,
        failed: usize,
        failures: Vec<LocationFailure>,
    },

    #[error("failed to write map for {year}: {source}")]
    MapWrite { year: i32, source: StoreError },
}

/// Outcome of a successful year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearReport {
    pub year: i32,
    /// Locations fetched from upstream.
    pub fetched: usize,
    /// Locations whose daily artifact already existed.
    pub reused: usize,
    pub map: MapArtifact,
}

#[derive(Default)]
struct YearState {
    districts: BTreeMap<String, Vec<Option<u16>>>,
    failures: Vec<LocationFailure>,
    fetched: usize,
    reused: usize,
}

pub struct Precompute {
    orchestrator: Arc<FetchOrchestrator>,
    artifacts: ArtifactStore,
    locations: Vec<Location>,
    config: PrecomputeConfig,
}

impl Precompute {
    pub fn new(
        orchestrator: Arc<FetchOrchestrator>,
        artifacts: ArtifactStore,
        locations: Vec<Location>,
        config: PrecomputeConfig,
    ) -> Self {
        Precompute {
            orchestrator,
            artifacts,
            locations,
            config,
        }
    }

    /// Builds every configured year in order, stopping at the first failure.
    pub async fn run(&self) -> std::result::Result<Vec<YearReport>, PrecomputeError> {
        let mut reports = Vec::with_capacity(self.config.years.len());
        for &year in &self.config.years {
            reports.push(self.build_year(year).await?);
        }
        info!("Precompute complete.");
        Ok(reports)
    }

    pub async fn build_year(&self, year: i32) -> std::result::Result<YearReport, PrecomputeError> {
        info!("Precomputing AQI for {}...", year);
        let queue = Mutex::new(self.locations.iter().cloned().collect::<VecDeque<_>>());
        let state = Mutex::new(YearState::default());

        let workers = (0..self.config.concurrency.max(1))
            .map(|_| self.worker(year, &queue, &state));
        join_all(workers).await;

        let state = state.into_inner();
        if !state.failures.is_empty() {
            return Err(PrecomputeError::YearFailed {
                year,
                failed: state.failures.len(),
                failures: state.failures,
            });
        }

        let map = MapArtifact::new(year, state.districts);
        self.artifacts
            .write_map(&map)
            .await
            .map_err(|source| PrecomputeError::MapWrite { year, source })?;
        info!(
            "Wrote {} ({} fetched, {} reused)",
            self.artifacts.map_path(year).display(),
            state.fetched,
            state.reused
        );
        Ok(YearReport {
            year,
            fetched: state.fetched,
            reused: state.reused,
            map,
        })
    }

    async fn worker(
        &self,
        year: i32,
        queue: &Mutex<VecDeque<Location>>,
        state: &Mutex<YearState>,
    ) {
        loop {
            // the lock is released before the location is processed
            let Some(location) = queue.lock().await.pop_front() else {
                return;
            };
            match self.process_location(year, &location).await {
                Ok((days, reused)) => {
                    {
                        let mut state = state.lock().await;
                        state.districts.insert(location.id.clone(), days);
                        if reused {
                            state.reused += 1;
                        } else {
                            state.fetched += 1;
                        }
                    }
                    info!("  ✓ {}", location.name);
                    sleep(self.config.throttle).await;
                }
                Err(e) => {
                    warn!("  ✕ {}: {}", location.name, e);
                    state.lock().await.failures.push(LocationFailure {
                        location_id: location.id.clone(),
                        name: location.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    /// Day array for one location; the flag is true when the daily artifact
    /// was reused rather than fetched.
    async fn process_location(
        &self,
        year: i32,
        location: &Location,
    ) -> anyhow::Result<(Vec<Option<u16>>, bool)> {
        let (records, reused) = match self.artifacts.read_daily(year, &location.id).await? {
            Some(records) => (records, true),
            None => {
                let request = DailyRequest::for_location(location, year)
                    .without_cache()
                    .without_precomputed();
                let request = &request;
                let orchestrator = &self.orchestrator;
                let records = fetch_with_retry(&self.config.retry, &location.name, move || {
                    orchestrator.fetch_daily(request)
                })
                .await?;
                self.artifacts.write_daily(year, &location.id, &records).await?;
                (records, false)
            }
        };
        Ok((build_day_array(&records, year), reused))
    }
}

/// Precompute `years` into `output_dir` against the live API.
pub async fn run_precompute(
    output_dir: &Path,
    years: Vec<i32>,
    concurrency: usize,
    locations_csv: Option<&Path>,
    base_url: &str,
) -> anyhow::Result<()> {
    let locations = load_locations(locations_csv)?;
    info!(
        "Precomputing {} locations for {:?} into {}",
        locations.len(),
        years,
        output_dir.display()
    );

    let artifacts = ArtifactStore::new(output_dir);
    let orchestrator = FetchOrchestrator::new(
        Arc::new(OpenMeteoClient::new(http_client()?, base_url)),
        TimedCache::new(Arc::new(MemoryStore::default())),
        PrecomputedLookup::new(artifacts.clone(), PRECOMPUTED_YEARS),
        ReportingZone::default(),
    );
    let config = PrecomputeConfig {
        years,
        concurrency,
        ..PrecomputeConfig::default()
    };
    let pipeline = Precompute::new(Arc::new(orchestrator), artifacts, locations, config);
    for report in pipeline.run().await? {
        info!(
            "{}: {} locations ({} fetched, {} reused)",
            report.year,
            report.map.districts.len(),
            report.fetched,
            report.reused
        );
    }
    Ok(())
}
