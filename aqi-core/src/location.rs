use anyhow::Context;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Embedded CSV of Bangkok district centroids.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/districts.csv");

/// A point the index is computed for, typically the centroid of a map region.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Stable identifier used in artifact paths and cache keys (e.g. "bang-rak")
    pub id: String,
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Cache identifier for this location in a given year.
    pub fn cache_key(&self, year: i32) -> String {
        format!("{}-{}", self.id, year)
    }

    /// Get the location vector from the embedded district CSV.
    pub fn get_location_vector() -> anyhow::Result<Vec<Location>> {
        Location::parse_location_csv(CSV_OBJECT).context("failed to parse embedded districts csv")
    }

    /// Parse a CSV string of locations.
    ///
    /// Expected CSV columns (with headers): id, name, latitude, longitude
    pub fn parse_location_csv(csv_object: &str) -> anyhow::Result<Vec<Location>> {
        let mut location_list: Vec<Location> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for (line, row) in rdr.records().enumerate() {
            let record = row?;
            let field = |i: usize| record.get(i).map(str::trim).unwrap_or("");
            let id = field(0);
            if id.is_empty() {
                anyhow::bail!("row {}: missing location id", line + 1);
            }
            let latitude: f64 = field(2)
                .parse()
                .with_context(|| format!("row {}: bad latitude for {}", line + 1, id))?;
            let longitude: f64 = field(3)
                .parse()
                .with_context(|| format!("row {}: bad longitude for {}", line + 1, id))?;
            location_list.push(Location {
                id: id.to_string(),
                name: field(1).to_string(),
                latitude,
                longitude,
            });
        }
        Ok(location_list)
    }
}

#[cfg(test)]
mod tests {
    use crate::location::Location;

    #[test]
    fn test_location_vector() {
        let locations = Location::get_location_vector().unwrap();
        assert_eq!(locations.len(), 50);
        assert_eq!(locations[0].id, "phra-nakhon");
        let mut ids: Vec<&str> = locations.iter().map(|l| l.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_parse_location_csv() {
        let csv = "ID,NAME,LATITUDE,LONGITUDE\nbang-rak, Bang Rak ,13.7262,100.5240\n";
        let locations = Location::parse_location_csv(csv).unwrap();
        assert_eq!(
            locations,
            vec![Location {
                id: "bang-rak".into(),
                name: "Bang Rak".into(),
                latitude: 13.7262,
                longitude: 100.524,
            }]
        );
        assert_eq!(locations[0].cache_key(2024), "bang-rak-2024");
    }

    #[test]
    fn test_parse_location_csv_rejects_bad_coordinates() {
        let csv = "ID,NAME,LATITUDE,LONGITUDE\nbang-rak,Bang Rak,north,100.5\n";
        assert!(Location::parse_location_csv(csv).is_err());
    }
}
