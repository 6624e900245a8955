//! Thin client for the Home Assistant REST API.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

use tally_domain::time::Timestamp;

use crate::config::HaConfig;
use crate::error::HaError;

#[derive(Debug, Deserialize)]
struct StateResponse {
    state: String,
}

/// Authenticated HTTP client scoped to one Home Assistant instance.
#[derive(Debug, Clone)]
pub struct HaClient {
    http: reqwest::Client,
    base_url: String,
}

impl HaClient {
    /// Build a client with the token installed as a default header.
    ///
    /// # Errors
    ///
    /// Returns [`HaError::InvalidToken`] when the token cannot be used as a
    /// header value, or [`HaError::Http`] when the client cannot be built.
    pub fn new(config: &HaConfig) -> Result<Self, HaError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| HaError::InvalidToken)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Read an entity's current state string.
    ///
    /// # Errors
    ///
    /// Returns [`HaError::UnknownEntity`] for a 404 and
    /// [`HaError::UnexpectedStatus`] for any other non-success answer.
    pub async fn get_state(&self, entity_id: &str) -> Result<String, HaError> {
        let url = format!("{}/api/states/{entity_id}", self.base_url);
        let response = self.http.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(HaError::UnknownEntity(entity_id.to_string())),
            status if !status.is_success() => Err(HaError::UnexpectedStatus { status, url }),
            _ => Ok(response.json::<StateResponse>().await?.state),
        }
    }

    /// Call a Home Assistant service with a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`HaError::UnexpectedStatus`] for a non-success answer.
    pub async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: serde_json::Value,
    ) -> Result<(), HaError> {
        let url = format!("{}/api/services/{domain}/{service}", self.base_url);
        tracing::debug!(%url, "calling service");
        let response = self.http.post(&url).json(&data).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(HaError::UnexpectedStatus { status, url })
        }
    }

    /// Set an `input_number` helper.
    pub async fn set_input_number(&self, entity_id: &str, value: f64) -> Result<(), HaError> {
        self.call_service(
            "input_number",
            "set_value",
            serde_json::json!({"entity_id": entity_id, "value": value}),
        )
        .await
    }

    /// Set an `input_text` helper.
    pub async fn set_input_text(&self, entity_id: &str, value: &str) -> Result<(), HaError> {
        self.call_service(
            "input_text",
            "set_value",
            serde_json::json!({"entity_id": entity_id, "value": value}),
        )
        .await
    }

    /// Set an `input_datetime` helper from a timestamp.
    pub async fn set_input_datetime(&self, entity_id: &str, ts: Timestamp) -> Result<(), HaError> {
        self.call_service(
            "input_datetime",
            "set_datetime",
            serde_json::json!({"entity_id": entity_id, "timestamp": ts.timestamp()}),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HaConfig;

    fn make_config(base_url: &str) -> HaConfig {
        serde_json::from_value(serde_json::json!({
            "base_url": base_url,
            "token": "secret",
        }))
        .unwrap()
    }

    #[test]
    fn should_strip_trailing_slash_from_base_url() {
        let client = HaClient::new(&make_config("http://ha.local:8123/")).unwrap();
        assert_eq!(client.base_url, "http://ha.local:8123");
    }

    #[test]
    fn should_reject_token_with_control_characters() {
        let mut config = make_config("http://ha.local:8123");
        config.token = "bad\ntoken".to_string();
        assert!(matches!(HaClient::new(&config), Err(HaError::InvalidToken)));
    }
}
