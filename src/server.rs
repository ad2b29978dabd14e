// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::filter::TableView;
use crate::gate::{AccessGate, referer_gate_middleware};
use crate::models::{ColumnMap, FilterState, PettyCashRow};
use crate::render::render_dashboard;
use crate::sheets::{SheetsClient, load_snapshot};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, error, info, info_span};

#[derive(Clone)]
pub struct AppState {
    pub sheets: Arc<SheetsClient>,
    pub columns: ColumnMap,
    pub gate: Arc<AccessGate>,
}

impl AppState {
    pub fn new(sheets: SheetsClient, gate: AccessGate) -> Self {
        Self {
            sheets: Arc::new(sheets),
            columns: ColumnMap::default(),
            gate: Arc::new(gate),
        }
    }
}

/// Decoded query string, read leniently: a malformed `selected` means no
/// selection and repeated keys keep their last value.
struct DashboardQuery {
    filter: FilterState,
    selected: Option<usize>,
}

impl DashboardQuery {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        let filter =
            FilterState::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let selected = pairs
            .iter()
            .rev()
            .find(|(k, _)| k == "selected")
            .and_then(|(_, v)| v.trim().parse().ok());
        Self { filter, selected }
    }
}

#[derive(Debug, Serialize)]
pub struct RowsResponse {
    pub rows: Vec<PettyCashRow>,
    pub last_updated: Option<String>,
    pub total: usize,
    pub matched: usize,
}

pub fn build_router(state: AppState) -> Router {
    let gate = state.gate.clone();
    Router::new()
        .route("/", get(dashboard))
        .route("/api/rows", get(api_rows))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(gate, referer_gate_middleware))
        .layer(middleware::from_fn(request_tracing_middleware))
}

async fn dashboard(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = DashboardQuery::from_pairs(&pairs);
    let snapshot = load_snapshot(&state.sheets, &state.columns).await;
    let mut view = TableView::with_filter(snapshot.rows, query.filter);
    view.select(query.selected);
    match render_dashboard(&view, snapshot.last_updated.as_deref()) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(error = %err, "failed to render dashboard");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn api_rows(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<RowsResponse> {
    let filter = DashboardQuery::from_pairs(&pairs).filter;
    let snapshot = load_snapshot(&state.sheets, &state.columns).await;
    let view = TableView::with_filter(snapshot.rows, filter);
    Json(RowsResponse {
        rows: view.rows().cloned().collect(),
        last_updated: snapshot.last_updated,
        total: view.total(),
        matched: view.matched(),
    })
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn request_tracing_middleware(request: Request<Body>, next: Next) -> Response {
    let span = info_span!(
        "http.request",
        method = %request.method(),
        path = %request.uri().path(),
    );
    let started = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        )
    });
    response
}
