//! Lookup of precomputed artifacts for known years.
//!
//! A hit returns immediately; anything else (not a precomputed year, file
//! missing, unreadable or malformed) is a miss so the caller falls through to
//! the live path.

use crate::artifacts::ArtifactStore;
use aqi_core::daily::DailyRecords;
use aqi_data::map::MapArtifact;
use log::debug;
use std::{
    collections::{BTreeSet, HashMap},
    sync::Mutex,
};

/// Years the build ships precomputed artifacts for.
pub const PRECOMPUTED_YEARS: [i32; 2] = [2024, 2025];

/// Precomputed artifact lookup with a memo of successful loads.
///
/// The memo lives as long as the lookup itself; construct one per run.
#[derive(Debug)]
pub struct PrecomputedLookup {
    years: BTreeSet<i32>,
    artifacts: ArtifactStore,
    memo: Mutex<HashMap<(String, i32), DailyRecords>>,
}

impl PrecomputedLookup {
    pub fn new(artifacts: ArtifactStore, years: impl IntoIterator<Item = i32>) -> Self {
        PrecomputedLookup {
            years: years.into_iter().collect(),
            artifacts,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_precomputed_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub async fn lookup_daily(&self, location_id: &str, year: i32) -> Option<DailyRecords> {
        if !self.is_precomputed_year(year) {
            return None;
        }
        let memo_key = (location_id.to_string(), year);
        if let Some(records) = self
            .memo
            .lock()
            .ok()
            .and_then(|memo| memo.get(&memo_key).cloned())
        {
            return Some(records);
        }
        match self.artifacts.read_daily(year, location_id).await {
            Ok(Some(records)) => {
                if let Ok(mut memo) = self.memo.lock() {
                    memo.insert(memo_key, records.clone());
                }
                Some(records)
            }
            Ok(None) => {
                debug!("No precomputed daily artifact for {} {}", location_id, year);
                None
            }
            Err(e) => {
                debug!(
                    "Precomputed daily artifact unavailable for {} {}: {}",
                    location_id, year, e
                );
                None
            }
        }
    }

    pub async fn lookup_map(&self, year: i32) -> Option<MapArtifact> {
        if !self.is_precomputed_year(year) {
            return None;
        }
        match self.artifacts.read_map(year).await {
            Ok(map) => map,
            Err(e) => {
                debug!("Precomputed map unavailable for {}: {}", year, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqi_core::daily::DailyRecord;
    use std::collections::BTreeMap;

    fn records(aqi: u16) -> DailyRecords {
        let mut records = DailyRecords::new();
        records.insert(
            "2024-07-04".to_string(),
            DailyRecord {
                aqi: Some(aqi),
                pollutants: BTreeMap::new(),
                hourly_aqi_min: None,
                hourly_aqi_max: None,
            },
        );
        records
    }

    #[tokio::test]
    async fn hit_for_precomputed_year() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = ArtifactStore::new(dir.path());
        artifacts.write_daily(2024, "sathon", &records(60)).await.unwrap();
        let lookup = PrecomputedLookup::new(artifacts, PRECOMPUTED_YEARS);
        assert_eq!(lookup.lookup_daily("sathon", 2024).await, Some(records(60)));
    }

    #[tokio::test]
    async fn ineligible_year_is_never_read() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = ArtifactStore::new(dir.path());
        artifacts.write_daily(2023, "sathon", &records(60)).await.unwrap();
        let lookup = PrecomputedLookup::new(artifacts, PRECOMPUTED_YEARS);
        assert_eq!(lookup.lookup_daily("sathon", 2023).await, None);
    }

    #[tokio::test]
    async fn missing_and_malformed_artifacts_are_misses() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = PrecomputedLookup::new(ArtifactStore::new(dir.path()), [2024]);
        assert_eq!(lookup.lookup_daily("sathon", 2024).await, None);

        std::fs::create_dir_all(dir.path().join("daily-2024")).unwrap();
        std::fs::write(dir.path().join("daily-2024").join("sathon.json"), "[1,").unwrap();
        assert_eq!(lookup.lookup_daily("sathon", 2024).await, None);
        std::fs::write(dir.path().join("map-2024.json"), "nope").unwrap();
        assert_eq!(lookup.lookup_map(2024).await, None);
    }

    #[tokio::test]
    async fn successful_loads_are_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = ArtifactStore::new(dir.path());
        artifacts.write_daily(2025, "sathon", &records(60)).await.unwrap();
        let lookup = PrecomputedLookup::new(artifacts.clone(), PRECOMPUTED_YEARS);
        assert_eq!(lookup.lookup_daily("sathon", 2025).await, Some(records(60)));

        artifacts.write_daily(2025, "sathon", &records(99)).await.unwrap();
        assert_eq!(lookup.lookup_daily("sathon", 2025).await, Some(records(60)));
    }
}
