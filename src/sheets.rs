// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{SHEETS_READONLY_SCOPE, Settings};
use crate::error::{Result, SheetsError};
use crate::models::{ColumnMap, PettyCashRow, Snapshot};
use crate::normalize::normalize_rows;
use crate::utils::http_client;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

const TOKEN_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    properties: Option<SpreadsheetProperties>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    #[serde(rename = "modifiedTime", default)]
    modified_time: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Read-only Google Sheets access through a service account.
///
/// Build one per process and share it: the HTTP connection pool and the
/// bearer token are reused across fetches.
pub struct SheetsClient {
    http: reqwest::Client,
    settings: Settings,
    token: Mutex<Option<CachedToken>>,
}

impl SheetsClient {
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            settings,
            token: Mutex::new(None),
        })
    }

    /// Raw cell rows of the configured range, header row included.
    pub async fn fetch_values(&self) -> Result<Vec<Vec<Value>>> {
        let missing = self.settings.missing_for_rows();
        if !missing.is_empty() {
            return Err(SheetsError::MissingSettings(missing));
        }
        let sheet_id = self.settings.sheet_id.as_deref().unwrap_or_default();
        let range = self.settings.range.as_deref().unwrap_or_default();
        let url = self.api_url(&["v4", "spreadsheets", sheet_id, "values", range])?;

        let token = self.access_token().await?;
        let resp = self.http.get(url).bearer_auth(token).send().await?;
        let body: ValueRange = check_status("values.get", resp).await?.json().await?;
        debug!(rows = body.values.len(), "fetched sheet values");
        Ok(body.values)
    }

    /// `properties.modifiedTime` of the spreadsheet, when the API reports one.
    pub async fn fetch_modified_time(&self) -> Result<Option<String>> {
        let missing = self.settings.missing_for_metadata();
        if !missing.is_empty() {
            return Err(SheetsError::MissingSettings(missing));
        }
        let sheet_id = self.settings.sheet_id.as_deref().unwrap_or_default();
        let url = self.api_url(&["v4", "spreadsheets", sheet_id])?;

        let token = self.access_token().await?;
        let resp = self.http.get(url).bearer_auth(token).send().await?;
        let body: Spreadsheet = check_status("spreadsheets.get", resp).await?.json().await?;
        Ok(body.properties.and_then(|p| p.modified_time))
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let base = &self.settings.endpoints.api_base;
        let mut url = Url::parse(base).map_err(|_| SheetsError::Url(base.clone()))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::Url(base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        let now = Utc::now();
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at - Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) > now {
                return Ok(cached.token.clone());
            }
        }

        let assertion = self.sign_assertion(now)?;
        let token_uri = &self.settings.endpoints.token_uri;
        let resp = self
            .http
            .post(token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        let body: TokenResponse = check_status("oauth2.token", resp).await?.json().await?;
        let lifetime = body.expires_in.unwrap_or(TOKEN_LIFETIME_SECS);
        debug!(expires_in = lifetime, "obtained service account token");

        *guard = Some(CachedToken {
            token: body.access_token.clone(),
            expires_at: now + Duration::seconds(lifetime),
        });
        Ok(body.access_token)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let key = parse_key(&self.settings)?;
        let claims = Claims {
            iss: self.settings.client_email.as_deref().unwrap_or_default(),
            scope: SHEETS_READONLY_SCOPE,
            aud: &self.settings.endpoints.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(SheetsError::Signing)
    }
}

/// The service account key as an RS256 signing key.
pub fn parse_key(settings: &Settings) -> Result<EncodingKey> {
    let pem = settings.private_key_pem().unwrap_or_default();
    EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(SheetsError::InvalidKey)
}

async fn check_status(endpoint: &'static str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(SheetsError::Upstream {
        endpoint,
        status: status.as_u16(),
        body,
    })
}

/// Normalized rows, or none when the fetch cannot be made or fails.
pub async fn fetch_rows(client: &SheetsClient, columns: &ColumnMap) -> Vec<PettyCashRow> {
    match client.fetch_values().await {
        Ok(raw) => normalize_rows(&raw, columns),
        Err(SheetsError::MissingSettings(missing)) => {
            error!(missing = %missing.join(", "), "Missing Google Sheets environment variables");
            Vec::new()
        }
        Err(err) => {
            error!(error = %err, "Failed to fetch Google Sheets rows");
            Vec::new()
        }
    }
}

/// Last-modified stamp, or none when the lookup cannot be made or fails.
pub async fn fetch_last_updated(client: &SheetsClient) -> Option<String> {
    match client.fetch_modified_time().await {
        Ok(ts) => ts,
        Err(SheetsError::MissingSettings(missing)) => {
            error!(
                missing = %missing.join(", "),
                "Missing Google Sheets environment variables for last updated time"
            );
            None
        }
        Err(err) => {
            error!(error = %err, "Failed to fetch Google Sheets last updated time");
            None
        }
    }
}

/// One fetch cycle: rows and last-updated stamp, requested concurrently.
/// Never fails; problems are logged and yield empty values.
pub async fn load_snapshot(client: &SheetsClient, columns: &ColumnMap) -> Snapshot {
    let (rows, last_updated) =
        tokio::join!(fetch_rows(client, columns), fetch_last_updated(client));
    info!(rows = rows.len(), has_last_updated = last_updated.is_some(), "loaded snapshot");
    Snapshot { rows, last_updated }
}
