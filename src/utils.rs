// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

const UA: &str = concat!("pettycash-audit/", env!("CARGO_PKG_VERSION"));

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("static regex"));

pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()
}

/// Lenient decimal parse: thousands separators are dropped and anything
/// unparsable becomes zero.
pub fn parse_amount(s: &str) -> Decimal {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    cleaned
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO)
}

/// ASCII digits of `s`, everything else removed.
pub fn digits_only(s: &str) -> String {
    NON_DIGITS.replace_all(s, "").into_owned()
}

/// Two fraction digits, no grouping: `1234.5` -> `1234.50`.
pub fn fmt_fixed2(d: &Decimal) -> String {
    let r = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", r)
}

/// Two fraction digits with thousands grouping: `1234.5` -> `1,234.50`.
pub fn fmt_amount(d: &Decimal) -> String {
    let fixed = fmt_fixed2(d);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac_part}")
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn amount_grouping() {
        assert_eq!(fmt_amount(&Decimal::from_str("1234.5").unwrap()), "1,234.50");
        assert_eq!(fmt_amount(&Decimal::from_str("1234567").unwrap()), "1,234,567.00");
        assert_eq!(fmt_amount(&Decimal::from_str("999.999").unwrap()), "1,000.00");
        assert_eq!(fmt_amount(&Decimal::from_str("-1500.25").unwrap()), "-1,500.25");
        assert_eq!(fmt_amount(&Decimal::ZERO), "0.00");
    }

    #[test]
    fn fixed_two_digits_rounds_half_up() {
        assert_eq!(fmt_fixed2(&Decimal::from_str("2.345").unwrap()), "2.35");
        assert_eq!(fmt_fixed2(&Decimal::from_str("1234.5").unwrap()), "1234.50");
    }

    #[test]
    fn digits_only_keeps_ascii_digits() {
        assert_eq!(digits_only("พ.ศ. 2568"), "2568");
        assert_eq!(digits_only("๒๕๖๘"), "");
        assert_eq!(digits_only("'68"), "68");
    }
}
