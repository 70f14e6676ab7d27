//! One-off queries: daily records, annual series, maps and metadata.

use crate::{
    fetch::{DailyRequest, FetchOrchestrator},
    FetchArgs,
};
use anyhow::Context;
use aqi_core::{location::Location, pollutant::Pollutant, upstream::OpenMeteoClient};
use aqi_store::{
    artifacts::ArtifactStore,
    backend::{ByteStore, MemoryStore, SqliteStore},
    cache::TimedCache,
    precomputed::{PrecomputedLookup, PRECOMPUTED_YEARS},
};
use aqi_utils::zone::ReportingZone;
use log::info;
use serde::Serialize;
use std::{path::Path, sync::Arc, time::Duration};

/// The built-in location list, or the one in `path`.
pub fn load_locations(path: Option<&Path>) -> anyhow::Result<Vec<Location>> {
    match path {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Location::parse_location_csv(&data)
        }
        None => Location::get_location_vector(),
    }
}

pub fn http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?)
}

/// Resolves the command line to a request: a named location, or a bare
/// coordinate cached under `<lat>,<lon>-<year>`.
pub fn resolve_request(args: &FetchArgs) -> anyhow::Result<DailyRequest> {
    let request = match (&args.location, args.latitude, args.longitude) {
        (Some(id), _, _) => {
            let locations = load_locations(args.locations_csv.as_deref())?;
            let location = locations
                .iter()
                .find(|l| &l.id == id)
                .with_context(|| format!("Unknown location: {}", id))?;
            DailyRequest::for_location(location, args.year)
        }
        (None, Some(latitude), Some(longitude)) => DailyRequest {
            cache_key: Some(format!("{},{}-{}", latitude, longitude, args.year)),
            ..DailyRequest::for_point(latitude, longitude, args.year)
        },
        _ => anyhow::bail!("Either --location or --latitude/--longitude is required"),
    };
    Ok(if args.no_precomputed {
        request.without_precomputed()
    } else {
        request
    })
}

fn orchestrator(args: &FetchArgs) -> anyhow::Result<FetchOrchestrator> {
    let store: Arc<dyn ByteStore> = match &args.cache_db {
        Some(path) => Arc::new(SqliteStore::open(path)?),
        None => Arc::new(MemoryStore::default()),
    };
    let source = OpenMeteoClient::new(http_client()?, args.base_url.as_str());
    Ok(FetchOrchestrator::new(
        Arc::new(source),
        TimedCache::new(store),
        PrecomputedLookup::new(ArtifactStore::new(&args.artifacts_dir), PRECOMPUTED_YEARS),
        ReportingZone::default(),
    ))
}

pub fn write_output<T: Serialize>(output: Option<&Path>, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub async fn run_daily(args: &FetchArgs) -> anyhow::Result<()> {
    let request = resolve_request(args)?;
    let records = orchestrator(args)?.fetch_daily(&request).await?;
    info!("{} days for {}", records.len(), args.year);
    write_output(args.output.as_deref(), &records)
}

pub async fn run_series(args: &FetchArgs) -> anyhow::Result<()> {
    let request = resolve_request(args)?;
    let series = orchestrator(args)?.fetch_series(&request).await?;
    write_output(args.output.as_deref(), &series)
}

pub async fn run_map(
    year: i32,
    location: Option<&str>,
    artifacts_dir: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let lookup = PrecomputedLookup::new(ArtifactStore::new(artifacts_dir), PRECOMPUTED_YEARS);
    let map = lookup
        .lookup_map(year)
        .await
        .with_context(|| format!("No precomputed map for {}", year))?;
    match location {
        Some(id) => {
            let days = map
                .districts
                .get(id)
                .with_context(|| format!("Location {} not in map for {}", id, year))?;
            write_output(output, days)
        }
        None => write_output(output, &map),
    }
}

pub fn run_pollutants() -> anyhow::Result<()> {
    write_output(None, &Pollutant::meta())
}
