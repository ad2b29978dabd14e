// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pettycash::config::{Endpoints, Settings};
use pettycash::gate::{AccessGate, RunMode};
use pettycash::server::{AppState, build_router};
use pettycash::sheets::SheetsClient;
use reqwest::header::{CONTENT_TYPE, REFERER};
use serde_json::{Value, json};
use std::net::SocketAddr;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY_PEM: &str = include_str!("fixtures/service_account_key.pem");
const TRUSTED: &str = "https://ftiorth.sharepoint.com/sites/finance";
// "ตุลาคม", percent-encoded.
const OCTOBER: &str = "%E0%B8%95%E0%B8%B8%E0%B8%A5%E0%B8%B2%E0%B8%84%E0%B8%A1";

async fn sheets_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok", "expires_in": 3600})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/A:M"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [
                ["header"],
                ["กันยายน 2568", "30 ก.ย. 2568", "PC-1", "ค่าอาหารว่าง", "งานประชุม", "29 ก.ย.",
                 "<Anan>", "500", "สวอ", "", "0", "0", ""],
                ["ตุลาคม 2568", "3 ต.ค. 2568", "PC-2", "ค่าพาหนะ", "งานนิทรรศการ", "1 ต.ค.",
                 "Suda", "1,250.75", "สส", "", "2000", "749.25", "ADV-1"]
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": {"modifiedTime": "2025-10-03T09:30:00Z"}
        })))
        .mount(&server)
        .await;
    server
}

fn client_for(server: &MockServer) -> SheetsClient {
    SheetsClient::new(Settings {
        client_email: Some("audit@example.iam.gserviceaccount.com".into()),
        private_key: Some(KEY_PEM.into()),
        sheet_id: Some("sheet-1".into()),
        range: Some("A:M".into()),
        endpoints: Endpoints {
            token_uri: format!("{}/token", server.uri()),
            api_base: server.uri(),
        },
    })
    .expect("sheets client")
}

async fn spawn(state: AppState) -> SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

#[tokio::test]
async fn untrusted_referer_gets_denial_page() {
    let backend = sheets_backend().await;
    let addr = spawn(AppState::new(client_for(&backend), AccessGate::default())).await;
    let http = reqwest::Client::new();

    let resp = http
        .get(format!("http://{addr}/report"))
        .header(REFERER, "https://evil.example/")
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 403);
    assert_eq!(
        resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("text/html; charset=utf-8")
    );
    let body = resp.text().await.expect("body");
    assert!(body.contains("ไม่สามารถเข้าใช้งานระบบได้"));
    assert!(!body.contains("fti-logo.png"));

    let resp = http.get(format!("http://{addr}/")).send().await.expect("request");
    assert_eq!(resp.status(), 403);

    // Denied requests never reach the sheet.
    assert!(backend.received_requests().await.expect("recorded").is_empty());
}

#[tokio::test]
async fn static_assets_and_trusted_referers_pass() {
    let backend = sheets_backend().await;
    let addr = spawn(AppState::new(client_for(&backend), AccessGate::default())).await;
    let http = reqwest::Client::new();

    // Allowlisted asset paths skip the gate; nothing is served there.
    let resp = http
        .get(format!("http://{addr}/favicon.ico"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404);

    let resp = http
        .get(format!("http://{addr}/report"))
        .header(REFERER, "https://ftiorth.sharepoint.com/x")
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn dashboard_renders_filtered_rows() {
    let backend = sheets_backend().await;
    let addr = spawn(AppState::new(client_for(&backend), AccessGate::default())).await;
    let http = reqwest::Client::new();

    let resp = http
        .get(format!("http://{addr}/"))
        .header(REFERER, TRUSTED)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(!body.contains("fti-logo.png"));
    assert!(body.contains("Suda"));
    assert!(body.contains("1,250.75"));
    assert!(body.contains("749.25"));
    assert!(body.contains("Anan"));
    assert!(!body.contains("<Anan>"));
    assert!(body.contains("2025-10-03T09:30:00Z"));
    // Newest fetch position comes first.
    let suda = body.find("Suda").expect("suda row");
    let anan = body.find("Anan").expect("anan row");
    assert!(suda < anan);

    let resp = http
        .get(format!("http://{addr}/"))
        .query(&[("month", "ตุลาคม"), ("selected", "1")])
        .header(REFERER, TRUSTED)
        .send()
        .await
        .expect("request");
    let body = resp.text().await.expect("body");
    assert!(body.contains("Suda"));
    assert!(!body.contains("Anan"));
    assert!(body.contains("class=\"selected\""));
}

#[tokio::test]
async fn malformed_query_still_renders_dashboard() {
    let backend = sheets_backend().await;
    let addr = spawn(AppState::new(client_for(&backend), AccessGate::default())).await;
    let http = reqwest::Client::new();

    let repeated = format!("month=a&month={OCTOBER}");
    for query in ["selected=", "selected=abc", repeated.as_str()] {
        let resp = http
            .get(format!("http://{addr}/?{query}"))
            .header(REFERER, TRUSTED)
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), 200, "query {query}");
        let body = resp.text().await.expect("body");
        assert!(!body.contains("class=\"selected\""), "query {query}");
        assert!(body.contains("Suda"), "query {query}");
    }

    // Repeated keys keep the last value.
    let resp = http
        .get(format!("http://{addr}/api/rows?{repeated}"))
        .header(REFERER, TRUSTED)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["matched"], 1);
}

#[tokio::test]
async fn api_rows_reports_matches() {
    let backend = sheets_backend().await;
    let addr = spawn(AppState::new(client_for(&backend), AccessGate::default())).await;
    let http = reqwest::Client::new();

    let resp = http
        .get(format!("http://{addr}/api/rows"))
        .query(&[("year", "2568"), ("institute", "สส")])
        .header(REFERER, TRUSTED)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["total"], 2);
    assert_eq!(body["matched"], 1);
    assert_eq!(body["rows"][0]["receiver"], "Suda");
    assert_eq!(body["rows"][0]["id"], 1);
    assert_eq!(body["last_updated"], "2025-10-03T09:30:00Z");
}

#[tokio::test]
async fn development_mode_skips_gate() {
    let backend = sheets_backend().await;
    let gate = AccessGate::new("https://ftiorth.sharepoint.com/", RunMode::Development);
    let addr = spawn(AppState::new(client_for(&backend), gate)).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/api/rows"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["matched"], 2);
}

#[tokio::test]
async fn missing_settings_render_empty_dashboard() {
    let client = SheetsClient::new(Settings::default()).expect("sheets client");
    let addr = spawn(AppState::new(client, AccessGate::default())).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/api/rows"))
        .header(REFERER, TRUSTED)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["total"], 0);
    assert!(body["last_updated"].is_null());
}
