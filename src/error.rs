// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("missing Google Sheets settings: {}", .0.join(", "))]
    MissingSettings(Vec<&'static str>),

    #[error("invalid service account key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign token assertion: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid endpoint URL '{0}'")]
    Url(String),

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Upstream {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, SheetsError>;
