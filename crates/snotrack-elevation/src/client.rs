//! Elevation profile service client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Duration;

use crate::error::ElevationError;
use crate::resolver::LatLon;

pub const DEFAULT_ELEVATION_URL: &str = "https://open.mapquestapi.com/elevation/v1/profile";

/// Feet.
pub const UNIT_FEET: &str = "f";
pub const SHAPE_FORMAT_RAW: &str = "raw";

/// One profile request: up to a chunk of `[lat, lon]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub coordinates: Vec<LatLon>,
    pub unit: &'static str,
    pub shape_format: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationProfileResponse {
    #[serde(default)]
    pub elevation_profile: Vec<ProfilePoint>,
    #[serde(default)]
    pub shape_points: Vec<f64>,
    #[serde(default)]
    pub info: Option<ResponseInfo>,
}

/// Service status block; a non-zero `statuscode` is an error even on HTTP 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseInfo {
    #[serde(default)]
    pub statuscode: i64,
    #[serde(default)]
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub height: f64,
    #[serde(default)]
    pub distance: f64,
}

impl ProfileRequest {
    pub fn new(coordinates: Vec<LatLon>) -> Self {
        Self {
            coordinates,
            unit: UNIT_FEET,
            shape_format: SHAPE_FORMAT_RAW,
        }
    }

    /// `lat,lon,lat,lon,...` as the service expects in `latLngCollection`.
    pub fn lat_lng_collection(&self) -> String {
        let mut buf = String::new();
        for (idx, [lat, lon]) in self.coordinates.iter().enumerate() {
            if idx > 0 {
                buf.push(',');
            }
            let _ = write!(buf, "{},{}", lat, lon);
        }
        buf
    }
}

/// Anything that can answer a single profile request.
#[async_trait]
pub trait ElevationSource: Send + Sync {
    async fn fetch_profile(
        &self,
        request: &ProfileRequest,
    ) -> Result<ElevationProfileResponse, ElevationError>;
}

/// HTTP client for the MapQuest elevation profile endpoint.
#[derive(Debug, Clone)]
pub struct MapquestClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl MapquestClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ElevationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ElevationSource for MapquestClient {
    async fn fetch_profile(
        &self,
        request: &ProfileRequest,
    ) -> Result<ElevationProfileResponse, ElevationError> {
        let mut params: Vec<(&str, String)> = vec![
            ("unit", request.unit.to_string()),
            ("shapeFormat", request.shape_format.to_string()),
            ("latLngCollection", request.lat_lng_collection()),
        ];
        if let Some(key) = self.api_key.as_deref() {
            params.insert(0, ("key", key.to_string()));
        }

        let response = self.client.get(&self.base_url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(ElevationError::Status(response.status().as_u16()));
        }

        let payload: ElevationProfileResponse = response.json().await?;
        if let Some(info) = payload.info.as_ref().filter(|info| info.statuscode != 0) {
            return Err(ElevationError::Service(format!(
                "status {}: {}",
                info.statuscode,
                info.messages.join("; ")
            )));
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_fixed_parameters() {
        let request = ProfileRequest::new(vec![[39.61, -106.55], [39.62, -106.56]]);
        assert_eq!(request.unit, "f");
        assert_eq!(request.shape_format, "raw");
        assert_eq!(request.lat_lng_collection(), "39.61,-106.55,39.62,-106.56");
    }

    #[test]
    fn lat_lng_collection_flattens_pairs_in_order() {
        assert_eq!(ProfileRequest::new(Vec::new()).lat_lng_collection(), "");
        assert_eq!(
            ProfileRequest::new(vec![[-33.5, 151.25]]).lat_lng_collection(),
            "-33.5,151.25"
        );
        let request = ProfileRequest::new(vec![[1.0, 2.0], [3.0, 4.5], [5.0, -6.0]]);
        assert_eq!(request.lat_lng_collection(), "1,2,3,4.5,5,-6");
    }

    #[test]
    fn response_parses_service_payload() {
        let payload = serde_json::json!({
            "elevationProfile": [
                { "distance": 0, "height": 8123 },
                { "distance": 0.4, "height": -32768 }
            ],
            "shapePoints": [39.61, -106.55, 39.62, -106.56],
            "info": { "statuscode": 0 }
        });
        let response: ElevationProfileResponse = serde_json::from_value(payload).unwrap();
        assert_eq!(response.elevation_profile.len(), 2);
        assert_eq!(response.elevation_profile[1].height, -32768.0);
        assert_eq!(response.shape_points.len(), 4);
        assert_eq!(response.info.map(|info| info.statuscode), Some(0));
    }

    #[test]
    fn blank_api_key_is_dropped() {
        let client = MapquestClient::with_client(
            Client::new(),
            DEFAULT_ELEVATION_URL,
            Some("  ".to_string()),
        );
        assert!(client.api_key.is_none());
        assert_eq!(client.base_url(), DEFAULT_ELEVATION_URL);
    }
}
