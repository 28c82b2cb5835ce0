//! Deezer flow client: the remote recommendation feed

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::RecommendationItem;

use super::RecommendationSource;

/// Client for the listener's flow feed
/// (`GET {base}/user/{listener_id}/flow`).
#[derive(Clone)]
pub struct FlowClient {
    http: reqwest::Client,
    base_url: String,
    listener_id: String,
}

/// Flow responses carry tracks under `data`; API-level failures come back
/// as HTTP 200 with an `error` object instead.
#[derive(Debug, Deserialize)]
struct FlowPayload {
    #[serde(default)]
    data: Vec<FlowEntry>,
    error: Option<FlowApiError>,
}

#[derive(Debug, Deserialize)]
struct FlowEntry {
    title: String,
    artist: FlowArtist,
}

#[derive(Debug, Deserialize)]
struct FlowArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FlowApiError {
    #[serde(rename = "type", default)]
    kind: String,
    message: String,
}

impl FlowClient {
    pub fn new(base_url: impl Into<String>, listener_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            listener_id: listener_id.into(),
        }
    }

    fn flow_url(&self) -> String {
        format!("{}/user/{}/flow", self.base_url, self.listener_id)
    }
}

#[async_trait]
impl RecommendationSource for FlowClient {
    async fn fetch_batch(&self) -> Result<Vec<RecommendationItem>> {
        let url = self.flow_url();
        tracing::debug!(%url, "API: fetch flow batch");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport("deezer", e))?
            .error_for_status()
            .map_err(|e| Error::transport("deezer", e))?;

        let payload: FlowPayload = response
            .json()
            .await
            .map_err(|e| Error::transport("deezer", e))?;

        if let Some(api_error) = payload.error {
            return Err(Error::transport(
                "deezer",
                format!("{}: {}", api_error.kind, api_error.message),
            ));
        }

        let items = items_from_payload(payload);
        tracing::info!(count = items.len(), "Flow batch fetched");
        Ok(items)
    }
}

fn items_from_payload(payload: FlowPayload) -> Vec<RecommendationItem> {
    payload
        .data
        .into_iter()
        .map(|entry| RecommendationItem::new(entry.artist.name, entry.title))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_maps_to_items_in_order() {
        let payload: FlowPayload = serde_json::from_str(
            r#"{
                "data": [
                    {"id": 1, "title": "Harder Better Faster Stronger", "artist": {"name": "Daft Punk"}},
                    {"id": 2, "title": "Midnight City", "artist": {"name": "M83"}}
                ],
                "total": 2
            }"#,
        )
        .unwrap();

        let items = items_from_payload(payload);
        assert_eq!(
            items,
            vec![
                RecommendationItem::new("Daft Punk", "Harder Better Faster Stronger"),
                RecommendationItem::new("M83", "Midnight City"),
            ]
        );
    }

    #[test]
    fn empty_payload_maps_to_empty_batch() {
        let payload: FlowPayload = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(items_from_payload(payload).is_empty());
    }

    #[test]
    fn api_error_payload_deserializes() {
        let payload: FlowPayload = serde_json::from_str(
            r#"{"error": {"type": "DataException", "message": "no data", "code": 800}}"#,
        )
        .unwrap();

        let error = payload.error.expect("error object");
        assert_eq!(error.kind, "DataException");
        assert_eq!(error.message, "no data");
        assert!(payload.data.is_empty());
    }

    #[test]
    fn flow_url_includes_listener_id() {
        let client = FlowClient::new("https://api.deezer.com/", "42");
        assert_eq!(client.flow_url(), "https://api.deezer.com/user/42/flow");
    }
}
