// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pettycash::gate::{AccessGate, DENIED_PAGE, Decision, RunMode, is_static_asset};

#[test]
fn static_assets_pass_without_referer() {
    let gate = AccessGate::default();
    assert_eq!(gate.decide(None, "/favicon.ico"), Decision::Allow);
    assert_eq!(gate.decide(None, "/fti-logo.png"), Decision::Allow);
    assert_eq!(gate.decide(Some("https://evil.example/"), "/static/app.css"), Decision::Allow);
    assert!(!is_static_asset("/staticfile"));
}

#[test]
fn referer_must_start_with_trusted_origin() {
    let gate = AccessGate::default();
    assert_eq!(gate.decide(Some("https://evil.example/"), "/report"), Decision::Deny);
    assert_eq!(gate.decide(None, "/report"), Decision::Deny);
    assert_eq!(gate.decide(Some(""), "/"), Decision::Deny);
    assert_eq!(
        gate.decide(Some("https://ftiorth.sharepoint.com/x"), "/report"),
        Decision::Allow
    );
    // Prefix match only: a look-alike host does not pass.
    assert_eq!(
        gate.decide(Some("https://ftiorth.sharepoint.com.evil.example/"), "/report"),
        Decision::Deny
    );
}

#[test]
fn development_mode_bypasses_gate() {
    let gate = AccessGate::new("https://ftiorth.sharepoint.com/", RunMode::Development);
    assert_eq!(gate.decide(None, "/report"), Decision::Allow);
}

#[test]
fn run_mode_parsing_defaults_to_production() {
    assert_eq!(RunMode::default(), RunMode::Production);
    assert_eq!("development".parse::<RunMode>().unwrap(), RunMode::Development);
    assert_eq!("PRODUCTION".parse::<RunMode>().unwrap(), RunMode::Production);
    assert!("staging".parse::<RunMode>().is_err());
}

#[test]
fn denial_page_is_thai_notice() {
    assert!(DENIED_PAGE.starts_with("<!DOCTYPE html>"));
    assert!(DENIED_PAGE.contains("ไม่สามารถเข้าใช้งานระบบได้"));
}
