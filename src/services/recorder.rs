//! Durable storage of completed intervals
//!
//! Recording is best effort. Callers log failures and never let them affect
//! the timer.

use chrono::{Local, NaiveDate};
use futures::future::BoxFuture;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::state::RecordKind;

/// A finished focus or meditation interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub kind: RecordKind,
    pub duration_seconds: u32,
    pub completed_at: NaiveDate,
}

impl SessionRecord {
    /// Record stamped with today's local date
    pub fn today(kind: RecordKind, duration_seconds: u32) -> Self {
        Self {
            kind,
            duration_seconds,
            completed_at: Local::now().date_naive(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend rejected record with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to encode record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Capability to store a completed interval
pub trait SessionRecorder: Send + Sync {
    fn record(&self, record: SessionRecord) -> BoxFuture<'_, Result<(), RecordError>>;
}

/// Recorder used when no backend is configured
#[derive(Debug, Default, Clone)]
pub struct LogRecorder;

impl SessionRecorder for LogRecorder {
    fn record(&self, record: SessionRecord) -> BoxFuture<'_, Result<(), RecordError>> {
        Box::pin(async move {
            info!(
                "Completed {} interval of {}s on {} (no backend configured)",
                record.kind.as_str(),
                record.duration_seconds,
                record.completed_at
            );
            Ok(())
        })
    }
}

/// Row inserted into the backend's session tables
#[derive(Debug, Serialize)]
struct SessionRow<'a> {
    duration: u32,
    completed_at: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

/// Stores records in a PostgREST-style hosted backend
#[derive(Debug, Clone)]
pub struct RestRecorder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    user_id: Option<String>,
}

impl RestRecorder {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            user_id,
        }
    }

    pub fn table_for(kind: RecordKind) -> &'static str {
        match kind {
            RecordKind::Work => "work_sessions",
            RecordKind::Meditation => "meditation_sessions",
        }
    }

    pub fn endpoint(&self, kind: RecordKind) -> String {
        format!("{}/rest/v1/{}", self.base_url, Self::table_for(kind))
    }

    async fn insert(&self, record: SessionRecord) -> Result<(), RecordError> {
        let url = self.endpoint(record.kind);
        let body = serde_json::to_vec(&SessionRow {
            duration: record.duration_seconds,
            completed_at: record.completed_at,
            user_id: self.user_id.as_deref(),
        })?;

        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .body(body);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        debug!("Posting {} record to {}", record.kind.as_str(), url);
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecordError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            "Recorded {} interval of {}s",
            record.kind.as_str(),
            record.duration_seconds
        );
        Ok(())
    }
}

impl SessionRecorder for RestRecorder {
    fn record(&self, record: SessionRecord) -> BoxFuture<'_, Result<(), RecordError>> {
        Box::pin(self.insert(record))
    }
}
