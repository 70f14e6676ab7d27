//! Series building for daily AQI records.
//!
//! This crate turns sparse per-day records into the dense shapes the
//! front-end charts and map consume.

/// Dense per-year index arrays and monthly rollups.
pub mod series {
    use aqi_core::daily::DailyRecords;
    use aqi_utils::{
        dates::{day_of_year_offset, days_in_year, month_for_offset, parse_date},
        numbers::round_to,
    };
    use log::debug;
    use serde::{Deserialize, Serialize};

    /// One composite index (or absent) per calendar day of `year`, plus the
    /// twelve monthly averages.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct AnnualSeries {
        pub year: i32,
        pub days: Vec<Option<u16>>,
        pub monthly: Vec<Option<f64>>,
    }

    /// Expand daily records into the dense array for `year`.
    ///
    /// Records dated outside the year, or with unparsable keys, are dropped.
    pub fn build_day_array(records: &DailyRecords, year: i32) -> Vec<Option<u16>> {
        let len = days_in_year(year);
        let mut days = vec![None; len];
        for (key, record) in records {
            let offset = parse_date(key)
                .ok()
                .and_then(|date| day_of_year_offset(year, &date))
                .filter(|offset| (0..len as i64).contains(offset));
            match offset {
                Some(offset) => days[offset as usize] = record.aqi,
                None => debug!("Discarding record {} outside {}", key, year),
            }
        }
        days
    }

    /// Average of the present values of each calendar month, rounded to one decimal.
    pub fn monthly_averages(days: &[Option<u16>], year: i32) -> Vec<Option<f64>> {
        let mut sums = [0u32; 12];
        let mut counts = [0u32; 12];
        for (offset, value) in days.iter().enumerate() {
            let (Some(value), Some(month)) = (value, month_for_offset(year, offset)) else {
                continue;
            };
            let m = (month - 1) as usize;
            sums[m] += u32::from(*value);
            counts[m] += 1;
        }
        sums.iter()
            .zip(counts.iter())
            .map(|(sum, count)| {
                if *count == 0 {
                    None
                } else {
                    round_to(f64::from(*sum) / f64::from(*count), 1)
                }
            })
            .collect()
    }

    pub fn build_annual_series(records: &DailyRecords, year: i32) -> AnnualSeries {
        let days = build_day_array(records, year);
        let monthly = monthly_averages(&days, year);
        AnnualSeries {
            year,
            days,
            monthly,
        }
    }

}

/// Combined per-year map artifact.
pub mod map {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    /// `{year, districts: {<locationId>: [<index or null>; days]}}`
    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    pub struct MapArtifact {
        pub year: i32,
        pub districts: BTreeMap<String, Vec<Option<u16>>>,
    }

    impl MapArtifact {
        pub fn new(year: i32, districts: BTreeMap<String, Vec<Option<u16>>>) -> Self {
            MapArtifact { year, districts }
        }

        /// Index of `location_id` on the day at `offset`, if known.
        pub fn day(&self, location_id: &str, offset: usize) -> Option<u16> {
            self.districts
                .get(location_id)
                .and_then(|days| days.get(offset).copied().flatten())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::MapArtifact;
        use std::collections::BTreeMap;

        #[test]
        fn test_map_artifact_json_shape() {
            let mut districts = BTreeMap::new();
            districts.insert("bang-rak".to_string(), vec![Some(42), None]);
            let artifact = MapArtifact::new(2024, districts);
            let json = serde_json::to_string(&artifact).unwrap();
            assert_eq!(json, r#"{"year":2024,"districts":{"bang-rak":[42,null]}}"#);
            assert_eq!(artifact.day("bang-rak", 0), Some(42));
            assert_eq!(artifact.day("bang-rak", 1), None);
            assert_eq!(artifact.day("dusit", 0), None);
        }
    }
}
