//! Kakao-backed [`LocalSearch`] implementation.
//!
//! Talks to the Kakao Local keyword-search REST endpoint. Configuration
//! is read once at startup into [`PlacesConfig`] and passed in
//! explicitly.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{GeoPoint, LocalSearch, Restaurant};
use crate::error::Error;

/// Local-search configuration.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// REST API key for the Kakao Local endpoint.
    pub api_key: String,
}

impl PlacesConfig {
    /// Build a config from the environment. `WAYFARER_KAKAO_API_KEY` is
    /// required.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("WAYFARER_KAKAO_API_KEY")
            .map_err(|_| anyhow::anyhow!("WAYFARER_KAKAO_API_KEY is not set"))?;
        Ok(Self { api_key })
    }
}

/// HTTP client for the Kakao Local keyword-search endpoint.
pub struct KakaoLocalClient {
    config: PlacesConfig,
    http: Client,
    base_url: String,
}

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com/v2/local";

/// Search radius for nearby-restaurant lookups, in meters.
const RESTAURANT_RADIUS_M: u32 = 3000;

impl KakaoLocalClient {
    pub fn new(config: PlacesConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client construction");
        Self {
            config,
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the endpoint base URL (used by tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search_keyword(
        &self,
        query: &str,
        position: Option<(f64, f64)>,
        size: u8,
    ) -> Result<Vec<Document>, Error> {
        let url = format!("{}/search/keyword.json", self.base_url);
        let mut request = self
            .http
            .get(&url)
            .header("Authorization", format!("KakaoAK {}", self.config.api_key))
            .query(&[("query", query)])
            .query(&[("size", size.to_string())]);

        if let Some((lat, lon)) = position {
            request = request
                .query(&[("x", lon.to_string()), ("y", lat.to_string())])
                .query(&[("radius", RESTAURANT_RADIUS_M.to_string())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "{} from local search: {detail}",
                status.as_u16()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("malformed local-search response: {e}")))?;

        Ok(parsed.documents)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    place_name: String,
    #[serde(default)]
    road_address_name: String,
    #[serde(default)]
    address_name: String,
    #[serde(default)]
    distance: String,
    #[serde(default)]
    x: String,
    #[serde(default)]
    y: String,
}

impl Document {
    fn into_restaurant(self) -> Restaurant {
        let address = if self.road_address_name.is_empty() {
            self.address_name
        } else {
            self.road_address_name
        };
        Restaurant {
            place_name: self.place_name,
            address,
            distance: format!("{}m", self.distance),
        }
    }
}

#[async_trait]
impl LocalSearch for KakaoLocalClient {
    async fn restaurants_near(
        &self,
        menu: &str,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<Restaurant>, Error> {
        // A qualified dish name ("매콤한 제육볶음") falls back to the bare
        // dish ("제육볶음") when the full phrase finds nothing.
        let mut keywords = vec![menu.to_string()];
        if let Some(last) = menu.split_whitespace().last() {
            if last != menu {
                keywords.push(last.to_string());
            }
        }

        for keyword in keywords {
            let query = format!("{keyword} 맛집");
            let documents = self.search_keyword(&query, Some((lat, lon)), 3).await?;
            if !documents.is_empty() {
                return Ok(documents
                    .into_iter()
                    .map(Document::into_restaurant)
                    .collect());
            }
        }

        Ok(Vec::new())
    }

    async fn locate_keyword(&self, keyword: &str) -> Result<Option<GeoPoint>, Error> {
        let documents = self.search_keyword(keyword, None, 1).await?;
        let Some(doc) = documents.into_iter().next() else {
            return Ok(None);
        };

        let lat = doc
            .y
            .parse()
            .map_err(|_| Error::Upstream(format!("unparseable latitude in place result: {}", doc.y)))?;
        let lon = doc
            .x
            .parse()
            .map_err(|_| Error::Upstream(format!("unparseable longitude in place result: {}", doc.x)))?;

        Ok(Some(GeoPoint { lat, lon }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document(road: &str, lot: &str) -> Document {
        serde_json::from_value(serde_json::json!({
            "place_name": "명동교자 본점",
            "road_address_name": road,
            "address_name": lot,
            "distance": "245",
            "x": "126.98544",
            "y": "37.56273",
        }))
        .unwrap()
    }

    #[test]
    fn response_shape_parses() {
        let raw = serde_json::json!({
            "documents": [
                { "place_name": "명동교자 본점", "road_address_name": "서울 중구 명동10길 29",
                  "address_name": "서울 중구 명동2가", "distance": "245",
                  "x": "126.98544", "y": "37.56273" }
            ]
        });
        let parsed: SearchResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.documents.len(), 1);
        assert_eq!(parsed.documents[0].place_name, "명동교자 본점");
    }

    #[test]
    fn response_without_documents_parses_to_empty() {
        let parsed: SearchResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.documents.is_empty());
    }

    #[test]
    fn restaurant_prefers_road_address() {
        let restaurant = sample_document("서울 중구 명동10길 29", "서울 중구 명동2가").into_restaurant();
        assert_eq!(restaurant.address, "서울 중구 명동10길 29");
        assert_eq!(restaurant.distance, "245m");
    }

    #[test]
    fn restaurant_falls_back_to_lot_address() {
        let restaurant = sample_document("", "서울 중구 명동2가").into_restaurant();
        assert_eq!(restaurant.address, "서울 중구 명동2가");
    }
}
