// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::filter_from_matches;
use crate::config::Settings;
use crate::filter::filtered;
use crate::models::PettyCashRow;
use anyhow::{Context, Result, anyhow};

pub async fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let fmt = m
        .get_one::<String>("format")
        .ok_or_else(|| anyhow!("--format is required"))?
        .to_lowercase();
    let out = m
        .get_one::<String>("out")
        .ok_or_else(|| anyhow!("--out is required"))?;

    let rows = super::load_rows(settings, m).await?;
    let filter = filter_from_matches(m);
    let selected = filtered(&rows, &filter);
    write_rows(&fmt, out, &selected)?;
    println!("Exported {} rows to {}", selected.len(), out);
    Ok(())
}

pub fn write_rows(fmt: &str, out: &str, rows: &[&PettyCashRow]) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(rows)?)
                .with_context(|| format!("Write {}", out))?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    Ok(())
}
