//! Command implementations for the AQI CLI.
//!
//! Provides the precompute pipeline, one-off daily/series queries and a
//! pollutant metadata listing.

use aqi_core::upstream::DEFAULT_BASE_URL;
use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod fetch;
pub mod precompute;
pub mod query;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Subcommand)]
pub enum Command {
    /// Precompute daily artifacts and per-year maps for every location
    Precompute {
        /// Directory receiving daily-<year>/<id>.json and map-<year>.json
        #[arg(short = 'o', long, default_value = "public/aqi")]
        output_dir: PathBuf,

        /// Years to build, in order
        #[arg(short = 'y', long, value_delimiter = ',', default_values_t = [2024, 2025])]
        years: Vec<i32>,

        /// Locations processed at once
        #[arg(short = 'c', long, default_value_t = 2)]
        concurrency: usize,

        /// CSV of locations (ID,NAME,LATITUDE,LONGITUDE) replacing the built-in list
        #[arg(long)]
        locations_csv: Option<PathBuf>,

        /// Air-quality API base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },

    /// Daily records for one location and year, as JSON
    Daily(FetchArgs),

    /// 365/366-day series and monthly averages for one location and year, as JSON
    Series(FetchArgs),

    /// Precomputed map for a year, optionally narrowed to one location
    Map {
        #[arg(short = 'y', long)]
        year: i32,

        #[arg(short = 'l', long)]
        location: Option<String>,

        #[arg(short = 'a', long, default_value = "public/aqi")]
        artifacts_dir: PathBuf,

        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },

    /// List the pollutants making up the index
    Pollutants,
}

/// Where to fetch from and how to cache.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    #[arg(short = 'y', long)]
    pub year: i32,

    /// Location id from the location list
    #[arg(short = 'l', long, conflicts_with_all = ["latitude", "longitude"])]
    pub location: Option<String>,

    #[arg(long, allow_hyphen_values = true, requires = "longitude")]
    pub latitude: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "latitude")]
    pub longitude: Option<f64>,

    /// CSV of locations replacing the built-in list
    #[arg(long)]
    pub locations_csv: Option<PathBuf>,

    /// Directory holding precomputed artifacts
    #[arg(short = 'a', long, default_value = "public/aqi")]
    pub artifacts_dir: PathBuf,

    /// SQLite file backing the cache; in-memory when omitted
    #[arg(long)]
    pub cache_db: Option<PathBuf>,

    /// Ignore precomputed artifacts
    #[arg(long)]
    pub no_precomputed: bool,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Write JSON here instead of stdout
    #[arg(short = 'O', long)]
    pub output: Option<PathBuf>,
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Precompute {
            output_dir,
            years,
            concurrency,
            locations_csv,
            base_url,
        } => {
            precompute::run_precompute(
                &output_dir,
                years,
                concurrency,
                locations_csv.as_deref(),
                &base_url,
            )
            .await
        }
        Command::Daily(args) => query::run_daily(&args).await,
        Command::Series(args) => query::run_series(&args).await,
        Command::Map {
            year,
            location,
            artifacts_dir,
            output,
        } => query::run_map(year, location.as_deref(), &artifacts_dir, output.as_deref()).await,
        Command::Pollutants => query::run_pollutants(),
    }
}
