// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use pettycash::{cli, commands, config::Settings};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = cli::build_cli().get_matches();

    match matches.subcommand() {
        Some(("serve", sub)) => commands::serve::handle(Settings::from_matches(sub), sub).await?,
        Some(("rows", sub)) => commands::rows::handle(&Settings::from_matches(sub), sub).await?,
        Some(("export", sub)) => {
            commands::exporter::handle(&Settings::from_matches(sub), sub).await?
        }
        Some(("doctor", sub)) => commands::doctor::handle(&Settings::from_matches(sub)).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
