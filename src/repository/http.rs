//! Roster service client over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::domain::makler::{Makler, ReorderPayload};
use crate::models::config::ServerConfig;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{RosterReader, RosterWriter};

/// Talks to the remote roster REST API with bearer authentication.
#[derive(Clone, Debug)]
pub struct HttpRosterRepository {
    http: Client,
    roster_url: String,
    reorder_url: String,
}

impl HttpRosterRepository {
    pub fn new(
        roster_url: impl Into<String>,
        reorder_url: impl Into<String>,
        timeout: Duration,
    ) -> RepositoryResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            roster_url: roster_url.into(),
            reorder_url: reorder_url.into(),
        })
    }

    pub fn from_config(config: &ServerConfig) -> RepositoryResult<Self> {
        Self::new(
            config.roster_url(),
            config.reorder_url(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}

#[async_trait]
impl RosterReader for HttpRosterRepository {
    async fn fetch_roster(&self, token: &str) -> RepositoryResult<Vec<Makler>> {
        let body: Value = self
            .http
            .get(&self.roster_url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_roster(body)
    }
}

#[async_trait]
impl RosterWriter for HttpRosterRepository {
    async fn submit_positions(
        &self,
        token: &str,
        payload: &ReorderPayload,
    ) -> RepositoryResult<()> {
        let response = self
            .http
            .patch(&self.reorder_url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::ValidationError(validation_message(&body)));
        }
        Err(RepositoryError::UnexpectedStatus(status.as_u16()))
    }
}

/// Decodes a roster response, rejecting anything but a JSON array.
pub fn parse_roster(body: Value) -> RepositoryResult<Vec<Makler>> {
    if !body.is_array() {
        return Err(RepositoryError::MalformedResponse(
            "expected a list of brokers".to_string(),
        ));
    }
    Ok(serde_json::from_value(body)?)
}

/// Extracts a human readable reason from a 400 response body.
///
/// Prefers the `detail` field, falls back to the compact JSON body and finally
/// to the raw text.
pub fn validation_message(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            _ => Value::Object(map).to_string(),
        },
        Ok(other) => other.to_string(),
        Err(_) if trimmed.is_empty() => "invalid positions".to_string(),
        Err(_) => trimmed.to_string(),
    }
}
