// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod doctor;
pub mod exporter;
pub mod rows;
pub mod serve;

use crate::config::Settings;
use crate::models::{ColumnMap, PettyCashRow};
use crate::normalize::{normalize_rows, string_rows};
use crate::sheets::{SheetsClient, fetch_rows};
use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// Rows from `--csv` when given, otherwise from the sheet. A sheet that
/// cannot be reached yields no rows; an unreadable CSV file is an error.
pub async fn load_rows(settings: &Settings, m: &clap::ArgMatches) -> Result<Vec<PettyCashRow>> {
    let columns = ColumnMap::default();
    if let Some(path) = m.get_one::<String>("csv") {
        let raw = read_csv_rows(path.trim())?;
        return Ok(normalize_rows(&string_rows(raw), &columns));
    }
    let client = SheetsClient::new(settings.clone()).context("Build Google Sheets client")?;
    Ok(fetch_rows(&client, &columns).await)
}

/// Every record of the file, header line included, as plain strings.
pub fn read_csv_rows(path: &str) -> Result<Vec<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;
    let mut out = Vec::new();
    for result in rdr.records() {
        let rec = result.with_context(|| format!("Read CSV {}", path))?;
        out.push(rec.iter().map(|s| s.to_string()).collect());
    }
    Ok(out)
}
