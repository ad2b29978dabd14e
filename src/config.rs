// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

pub const ENV_CLIENT_EMAIL: &str = "GOOGLE_SHEETS_CLIENT_EMAIL";
pub const ENV_PRIVATE_KEY: &str = "GOOGLE_SHEETS_PRIVATE_KEY";
pub const ENV_SHEET_ID: &str = "GOOGLE_SHEET_ID";
pub const ENV_SHEET_RANGE: &str = "GOOGLE_SHEET_RANGE";

pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_SHEETS_API: &str = "https://sheets.googleapis.com";
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Where the OAuth token exchange and the Sheets API live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token_uri: String,
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_uri: GOOGLE_TOKEN_URI.to_string(),
            api_base: GOOGLE_SHEETS_API.to_string(),
        }
    }
}

/// Service-account credentials and sheet location. Every field is optional
/// here; what is missing is reported when a fetch needs it.
#[derive(Clone, Default)]
pub struct Settings {
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    pub sheet_id: Option<String>,
    pub range: Option<String>,
    pub endpoints: Endpoints,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("client_email", &self.client_email)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("sheet_id", &self.sheet_id)
            .field("range", &self.range)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

fn present(v: &Option<String>) -> bool {
    v.as_deref().is_some_and(|s| !s.is_empty())
}

impl Settings {
    pub fn from_matches(m: &clap::ArgMatches) -> Self {
        let get = |id: &str| m.get_one::<String>(id).cloned();
        Self {
            client_email: get("client-email"),
            private_key: get("private-key"),
            sheet_id: get("sheet-id"),
            range: get("range"),
            endpoints: Endpoints::default(),
        }
    }

    /// Settings a metadata lookup needs that are absent or empty.
    pub fn missing_for_metadata(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !present(&self.client_email) {
            missing.push(ENV_CLIENT_EMAIL);
        }
        if !present(&self.private_key) {
            missing.push(ENV_PRIVATE_KEY);
        }
        if !present(&self.sheet_id) {
            missing.push(ENV_SHEET_ID);
        }
        missing
    }

    /// Settings a row fetch needs that are absent or empty.
    pub fn missing_for_rows(&self) -> Vec<&'static str> {
        let mut missing = self.missing_for_metadata();
        if !present(&self.range) {
            missing.push(ENV_SHEET_RANGE);
        }
        missing
    }

    /// PEM text of the key. Keys pasted into a single-line environment
    /// variable carry literal `\n` sequences instead of newlines.
    pub fn private_key_pem(&self) -> Option<String> {
        self.private_key.as_ref().map(|k| k.replace("\\n", "\n"))
    }
}
