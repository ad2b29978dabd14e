// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{ENV_CLIENT_EMAIL, ENV_PRIVATE_KEY, ENV_SHEET_ID, ENV_SHEET_RANGE};
use crate::filter::FilterField;
use crate::gate::{DEFAULT_TRUSTED_REFERER, RunMode};
use crate::models::FilterState;
use clap::{Arg, ArgAction, ArgMatches, Command, crate_version, value_parser};

pub fn build_cli() -> Command {
    Command::new("pettycash")
        .version(crate_version!())
        .about("Petty cash audit dashboard backed by Google Sheets")
        .arg(
            Arg::new("client-email")
                .long("client-email")
                .env(ENV_CLIENT_EMAIL)
                .global(true)
                .help("Service account e-mail"),
        )
        .arg(
            Arg::new("private-key")
                .long("private-key")
                .env(ENV_PRIVATE_KEY)
                .hide_env_values(true)
                .global(true)
                .help("Service account private key (PEM, \\n escapes allowed)"),
        )
        .arg(
            Arg::new("sheet-id")
                .long("sheet-id")
                .env(ENV_SHEET_ID)
                .global(true)
                .help("Spreadsheet identifier"),
        )
        .arg(
            Arg::new("range")
                .long("range")
                .env(ENV_SHEET_RANGE)
                .global(true)
                .help("Cell range, e.g. 'Sheet1!A:M'"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the dashboard HTTP server")
                .arg(
                    Arg::new("bind")
                        .long("bind")
                        .env("PETTYCASH_BIND")
                        .default_value("127.0.0.1:3000"),
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .env("PETTYCASH_MODE")
                        .default_value("production")
                        .value_parser(|s: &str| s.parse::<RunMode>())
                        .help("development disables the referer gate"),
                )
                .arg(
                    Arg::new("trusted-referer")
                        .long("trusted-referer")
                        .env("PETTYCASH_TRUSTED_REFERER")
                        .default_value(DEFAULT_TRUSTED_REFERER),
                ),
        )
        .subcommand(
            Command::new("rows")
                .about("Print filtered rows")
                .args(filter_args())
                .arg(source_arg())
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                )
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("jsonl")
                        .long("jsonl")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("json"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write filtered rows to a file")
                .args(filter_args())
                .arg(source_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .required(true)
                        .value_parser(["csv", "json"]),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(Command::new("doctor").about("Check settings and connectivity"))
}

fn filter_args() -> Vec<Arg> {
    FilterField::ALL
        .iter()
        .map(|f| Arg::new(f.key()).long(f.key()))
        .collect()
}

fn source_arg() -> Arg {
    Arg::new("csv")
        .long("csv")
        .help("Read rows from a CSV export of the sheet instead of the API")
}

pub fn filter_from_matches(m: &ArgMatches) -> FilterState {
    let get = |f: FilterField| m.get_one::<String>(f.key()).cloned().unwrap_or_default();
    FilterState {
        receiver: get(FilterField::Receiver),
        institute: get(FilterField::Institute),
        detail: get(FilterField::Detail),
        group: get(FilterField::Group),
        date: get(FilterField::Date),
        month: get(FilterField::Month),
        year: get(FilterField::Year),
    }
}
