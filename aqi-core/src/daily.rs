//! Reduction of an hourly series into per-day pollutant statistics and a
//! daily composite index.

use crate::{
    conversion::normalize,
    hourly::{HourlyPayload, HourlyReading},
    index::compute_index,
    pollutant::{Pollutant, PollutantId, POLLUTANTS},
};
use aqi_utils::{dates::date_key, numbers::round_to};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum number of valid hourly samples for a pollutant to be reported for a day.
pub const MIN_HOURLY_COUNT: usize = 10;

/// Daily statistics for one pollutant, in breakpoint-table units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantSummary {
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub aqi: Option<u16>,
}

/// One calendar day of aggregated data.
///
/// A pollutant mapped to `None` had too few valid samples that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub aqi: Option<u16>,
    pub pollutants: BTreeMap<PollutantId, Option<PollutantSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_aqi_min: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_aqi_max: Option<u16>,
}

impl DailyRecord {
    pub fn summary(&self, id: PollutantId) -> Option<&PollutantSummary> {
        self.pollutants.get(&id).and_then(|s| s.as_ref())
    }
}

/// Daily records keyed by `YYYY-MM-DD`.
pub type DailyRecords = BTreeMap<String, DailyRecord>;

#[derive(Debug, Clone, Copy, Default)]
struct RunningStat {
    sum: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl RunningStat {
    fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += value;
        self.count += 1;
    }

    fn summarize(&self, id: PollutantId) -> Option<PollutantSummary> {
        if self.count < MIN_HOURLY_COUNT {
            return None;
        }
        let avg = normalize(id, Some(self.sum / self.count as f64));
        let min = normalize(id, Some(self.min));
        let max = normalize(id, Some(self.max));
        let aqi = avg.and_then(|c| compute_index(c, Pollutant::get(id).breakpoints));
        Some(PollutantSummary {
            avg: avg.and_then(|v| round_to(v, 1)),
            min: min.and_then(|v| round_to(v, 1)),
            max: max.and_then(|v| round_to(v, 1)),
            aqi,
        })
    }
}

#[derive(Debug, Default)]
struct DayAccumulator {
    stats: [RunningStat; 6],
    hourly_min: Option<u16>,
    hourly_max: Option<u16>,
}

impl DayAccumulator {
    fn push(&mut self, reading: &HourlyReading<'_>) {
        for pollutant in POLLUTANTS.iter() {
            if let Some(value) = reading.value(pollutant.id) {
                self.stats[pollutant.id as usize].push(value);
            }
        }
        if let Some(index) = hourly_index(reading) {
            self.hourly_min = Some(self.hourly_min.map_or(index, |m| m.min(index)));
            self.hourly_max = Some(self.hourly_max.map_or(index, |m| m.max(index)));
        }
    }

    fn finish(self) -> DailyRecord {
        let pollutants: BTreeMap<PollutantId, Option<PollutantSummary>> = POLLUTANTS
            .iter()
            .map(|p| (p.id, self.stats[p.id as usize].summarize(p.id)))
            .collect();
        let aqi = composite(pollutants.values().flatten().map(|s| s.aqi));
        DailyRecord {
            aqi,
            pollutants,
            hourly_aqi_min: self.hourly_min,
            hourly_aqi_max: self.hourly_max,
        }
    }
}

/// Composite index: the maximum of the present values.
pub fn composite<I>(indices: I) -> Option<u16>
where
    I: IntoIterator<Item = Option<u16>>,
{
    indices.into_iter().flatten().max()
}

/// Composite index of a single hour, over every pollutant present that hour.
pub fn hourly_index(reading: &HourlyReading<'_>) -> Option<u16> {
    composite(POLLUTANTS.iter().map(|p| {
        normalize(p.id, reading.value(p.id)).and_then(|c| compute_index(c, p.breakpoints))
    }))
}

/// Aggregate an hourly payload into daily records.
///
/// Hours are bucketed by the date portion of their (already localized)
/// timestamp. Timestamps too short to carry a date are skipped.
pub fn build_daily_records(payload: &HourlyPayload) -> DailyRecords {
    let mut days: BTreeMap<String, DayAccumulator> = BTreeMap::new();
    for reading in payload.readings() {
        let Some(key) = date_key(reading.timestamp) else {
            continue;
        };
        days.entry(key.to_string()).or_default().push(&reading);
    }
    days.into_iter()
        .map(|(date, accumulator)| (date, accumulator.finish()))
        .collect()
}
