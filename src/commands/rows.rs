// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::filter_from_matches;
use crate::config::Settings;
use crate::filter::filtered;
use crate::models::PettyCashRow;
use crate::render::{COLUMN_HEADERS, display_cells};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub async fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let data = query_rows(settings, m).await?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data.iter().map(display_cells).collect();
        println!("{}", pretty_table(&COLUMN_HEADERS, rows));
    }
    Ok(())
}

/// Filtered rows, most recent first, cut to `--limit` when given.
pub async fn query_rows(settings: &Settings, m: &clap::ArgMatches) -> Result<Vec<PettyCashRow>> {
    let rows = super::load_rows(settings, m).await?;
    let filter = filter_from_matches(m);
    let mut data: Vec<PettyCashRow> = filtered(&rows, &filter).into_iter().cloned().collect();
    if let Some(limit) = m.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}
