// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Referer-based access gate.
//!
//! The dashboard is meant to be opened from the organization's SharePoint
//! portal, so every request whose `Referer` does not start with the portal
//! origin is turned away with a static notice. Referers are supplied by the
//! client and trivially forged: this is a hint that keeps casual visitors
//! out, NOT a security boundary. Anything sensitive must be protected by
//! real authentication in front of this service.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_TRUSTED_REFERER: &str = "https://ftiorth.sharepoint.com/";

/// Served with status 403 to every denied request.
pub const DENIED_PAGE: &str = include_str!("../templates/denied.html");

const STATIC_PREFIX: &str = "/static/";
const STATIC_FILES: [&str; 2] = ["/favicon.ico", "/fti-logo.png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Production,
    /// Local testing only; the gate lets everything through.
    Development,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(RunMode::Production),
            "development" | "dev" => Ok(RunMode::Development),
            other => Err(format!(
                "Unknown mode '{}', expected production|development",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    trusted_prefix: String,
    mode: RunMode,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(DEFAULT_TRUSTED_REFERER, RunMode::Production)
    }
}

impl AccessGate {
    pub fn new(trusted_prefix: impl Into<String>, mode: RunMode) -> Self {
        Self {
            trusted_prefix: trusted_prefix.into(),
            mode,
        }
    }

    pub fn decide(&self, referer: Option<&str>, path: &str) -> Decision {
        if self.mode == RunMode::Development || is_static_asset(path) {
            return Decision::Allow;
        }
        if referer.unwrap_or("").starts_with(&self.trusted_prefix) {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

pub fn is_static_asset(path: &str) -> bool {
    path.starts_with(STATIC_PREFIX) || STATIC_FILES.contains(&path)
}

pub fn denied_response() -> Response {
    (
        StatusCode::FORBIDDEN,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        )],
        DENIED_PAGE,
    )
        .into_response()
}

pub(crate) async fn referer_gate_middleware(
    State(gate): State<Arc<AccessGate>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    // A referer that is not valid visible ASCII counts as absent.
    let referer = request
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok());

    match gate.decide(referer, path) {
        Decision::Allow => next.run(request).await,
        Decision::Deny => {
            tracing::warn!(
                path = %path,
                referer = referer.unwrap_or(""),
                "request denied by referer gate"
            );
            denied_response()
        }
    }
}
