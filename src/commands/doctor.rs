// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::ColumnMap;
use crate::normalize::normalize_rows;
use crate::sheets::{SheetsClient, parse_key};
use crate::utils::pretty_table;
use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub check: &'static str,
    pub ok: bool,
    pub detail: String,
}

impl Finding {
    fn new(check: &'static str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            check,
            ok,
            detail: detail.into(),
        }
    }
}

pub async fn handle(settings: &Settings) -> Result<()> {
    let findings = diagnose(settings).await?;
    if findings.iter().all(|f| f.ok) {
        println!("doctor: no issues found");
    }
    let rows = findings
        .into_iter()
        .map(|f| {
            vec![
                f.check.to_string(),
                (if f.ok { "ok" } else { "FAIL" }).to_string(),
                f.detail,
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Check", "Status", "Detail"], rows));
    Ok(())
}

/// Settings first; the network checks only run once settings are complete.
pub async fn diagnose(settings: &Settings) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();

    let missing = settings.missing_for_rows();
    if !missing.is_empty() {
        findings.push(Finding::new("settings", false, missing.join(", ")));
        return Ok(findings);
    }
    findings.push(Finding::new("settings", true, "all present"));

    if let Err(err) = parse_key(settings) {
        findings.push(Finding::new("private_key", false, err.to_string()));
        return Ok(findings);
    }
    findings.push(Finding::new("private_key", true, "RSA key parsed"));

    let client = SheetsClient::new(settings.clone())?;
    match client.fetch_values().await {
        Ok(raw) => {
            let n = normalize_rows(&raw, &ColumnMap::default()).len();
            findings.push(Finding::new("rows", true, format!("{} data rows", n)));
        }
        Err(err) => findings.push(Finding::new("rows", false, err.to_string())),
    }
    match client.fetch_modified_time().await {
        Ok(Some(ts)) => findings.push(Finding::new("last_updated", true, ts)),
        Ok(None) => findings.push(Finding::new("last_updated", true, "not reported")),
        Err(err) => findings.push(Finding::new("last_updated", false, err.to_string())),
    }
    Ok(findings)
}
