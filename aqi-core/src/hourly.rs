//! Hourly air-quality payloads as returned by the upstream API.

use crate::pollutant::{PollutantId, POLLUTANTS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level upstream response; only the `hourly` block is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirQualityResponse {
    #[serde(default)]
    pub hourly: HourlyPayload,
}

/// Column-oriented hourly data: a `time` array plus one array per field,
/// aligned by index. Timestamps are already localized to the reporting zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyPayload {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(flatten)]
    pub series: HashMap<String, Vec<Option<f64>>>,
}

/// One row of an [`HourlyPayload`]: raw concentrations per pollutant at a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyReading<'a> {
    pub timestamp: &'a str,
    values: [Option<f64>; 6],
}

impl HourlyReading<'_> {
    /// Raw reading in the pollutant's source unit, if present and finite.
    pub fn value(&self, id: PollutantId) -> Option<f64> {
        self.values[id as usize]
    }
}

impl HourlyPayload {
    pub fn new(time: Vec<String>) -> Self {
        HourlyPayload {
            time,
            series: HashMap::new(),
        }
    }

    pub fn with_series(mut self, field: &str, values: Vec<Option<f64>>) -> Self {
        self.series.insert(field.to_string(), values);
        self
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn value_at(&self, field: &str, i: usize) -> Option<f64> {
        self.series
            .get(field)
            .and_then(|values| values.get(i).copied().flatten())
            .filter(|v| v.is_finite())
    }

    /// Iterate the payload row by row, in timestamp order.
    pub fn readings(&self) -> impl Iterator<Item = HourlyReading<'_>> + '_ {
        self.time.iter().enumerate().map(move |(i, timestamp)| {
            let mut values = [None; 6];
            for pollutant in POLLUTANTS.iter() {
                values[pollutant.id as usize] = self.value_at(pollutant.hourly_field, i);
            }
            HourlyReading {
                timestamp: timestamp.as_str(),
                values,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STR_RESULT: &str = r#"{
        "latitude": 13.75,
        "longitude": 100.5,
        "timezone": "Asia/Bangkok",
        "hourly_units": {"time": "iso8601", "pm2_5": "μg/m³"},
        "hourly": {
            "time": ["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00"],
            "pm2_5": [31.2, null, 28.0],
            "ozone": [40.0, 42.5]
        }
    }"#;

    #[test]
    fn test_response_to_readings() {
        let response: AirQualityResponse = serde_json::from_str(STR_RESULT).unwrap();
        let readings: Vec<HourlyReading> = response.hourly.readings().collect();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].timestamp, "2024-01-01T00:00");
        assert_eq!(readings[0].value(PollutantId::Pm25), Some(31.2));
        assert_eq!(readings[1].value(PollutantId::Pm25), None);
        assert_eq!(readings[1].value(PollutantId::O3), Some(42.5));
        // shorter series and unrequested fields read as missing
        assert_eq!(readings[2].value(PollutantId::O3), None);
        assert_eq!(readings[2].value(PollutantId::Co), None);
    }

    #[test]
    fn test_non_finite_values_are_missing() {
        let payload = HourlyPayload::new(vec!["2024-01-01T00:00".to_string()])
            .with_series("pm10", vec![Some(f64::NAN)]);
        let reading = payload.readings().next().unwrap();
        assert_eq!(reading.value(PollutantId::Pm10), None);
    }

    #[test]
    fn test_missing_hourly_block_is_empty() {
        let response: AirQualityResponse = serde_json::from_str("{}").unwrap();
        assert!(response.hourly.is_empty());
    }
}
