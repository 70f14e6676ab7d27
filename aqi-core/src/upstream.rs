//! Open-Meteo air-quality API client.
//!
//! `GET {base}/v1/air-quality?latitude=..&longitude=..&timezone=..&start_date=..&end_date=..&hourly=pm2_5,pm10,...`
//!
//! The body carries an `hourly` object with a `time` array and one array per
//! requested field, aligned by index and localized to `timezone`.

use crate::{
    error::{Result, UpstreamError},
    hourly::{AirQualityResponse, HourlyPayload},
    pollutant::Pollutant,
    source::{HourlyRequest, HourlySource},
};
use aqi_utils::dates::format_date;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://air-quality-api.open-meteo.com";

/// HTTP client for the Open-Meteo air-quality endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        OpenMeteoClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/air-quality", self.base_url)
    }

    /// Query parameters for a request, in the order the API documents them.
    pub fn query_pairs(request: &HourlyRequest) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", request.latitude.to_string()),
            ("longitude", request.longitude.to_string()),
            ("timezone", request.timezone.clone()),
            ("start_date", format_date(&request.range.start())),
            ("end_date", format_date(&request.range.end())),
            ("hourly", Pollutant::hourly_fields()),
        ]
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        OpenMeteoClient::new(Client::new(), DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl HourlySource for OpenMeteoClient {
    async fn fetch_hourly(&self, request: &HourlyRequest) -> Result<HourlyPayload> {
        info!(
            "Fetching hourly air quality for {},{} from {} to {}",
            request.latitude,
            request.longitude,
            request.range.start(),
            request.range.end()
        );
        let response = self
            .client
            .get(self.endpoint())
            .query(&OpenMeteoClient::query_pairs(request))
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!("Bad response status from {}: {}", self.base_url, status);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let body: AirQualityResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::ResponseParse(e.to_string()))?;
        Ok(body.hourly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_range::DateRange;
    use chrono::NaiveDate;

    #[test]
    fn test_query_pairs() {
        let request = HourlyRequest {
            latitude: 13.7262,
            longitude: 100.524,
            timezone: "Asia/Bangkok".to_string(),
            range: DateRange(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            ),
        };
        let pairs = OpenMeteoClient::query_pairs(&request);
        assert_eq!(pairs[0], ("latitude", "13.7262".to_string()));
        assert_eq!(pairs[2], ("timezone", "Asia/Bangkok".to_string()));
        assert_eq!(pairs[3], ("start_date", "2024-01-01".to_string()));
        assert_eq!(pairs[4], ("end_date", "2024-12-31".to_string()));
        assert_eq!(
            pairs[5].1,
            "pm2_5,pm10,ozone,nitrogen_dioxide,sulphur_dioxide,carbon_monoxide"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = OpenMeteoClient::new(Client::new(), "http://localhost:8080/");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/air-quality");
    }
}
