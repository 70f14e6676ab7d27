//! Precomputed artifact files.
//!
//! - `daily-<year>/<locationId>.json`: the location's daily records
//! - `map-<year>.json`: `{year, districts: {<locationId>: [...]}}`

use crate::error::{Result, StoreError};
use aqi_core::daily::DailyRecords;
use aqi_data::map::MapArtifact;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Artifact files rooted at a single output directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn daily_path(&self, year: i32, location_id: &str) -> Result<PathBuf> {
        let valid = !location_id.is_empty()
            && location_id != ".."
            && !location_id.contains(['/', '\\']);
        if !valid {
            return Err(StoreError::InvalidId(location_id.to_string()));
        }
        Ok(self
            .root
            .join(format!("daily-{year}"))
            .join(format!("{location_id}.json")))
    }

    pub fn map_path(&self, year: i32) -> PathBuf {
        self.root.join(format!("map-{year}.json"))
    }

    /// Daily records for a location, `None` if the file does not exist.
    pub async fn read_daily(&self, year: i32, location_id: &str) -> Result<Option<DailyRecords>> {
        read_json_if_exists(&self.daily_path(year, location_id)?).await
    }

    pub async fn write_daily(
        &self,
        year: i32,
        location_id: &str,
        records: &DailyRecords,
    ) -> Result<()> {
        write_json(&self.daily_path(year, location_id)?, records).await
    }

    pub async fn read_map(&self, year: i32) -> Result<Option<MapArtifact>> {
        read_json_if_exists(&self.map_path(year)).await
    }

    pub async fn write_map(&self, artifact: &MapArtifact) -> Result<()> {
        write_json(&self.map_path(artifact.year), artifact).await
    }
}

async fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec(data)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
