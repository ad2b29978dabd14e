// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ColumnMap, PettyCashRow};
use crate::utils::parse_amount;
use rust_decimal::Decimal;
use serde_json::Value;

/// Converts raw sheet rows into records. The first row is the header and is
/// skipped; every other row yields exactly one record.
pub fn normalize_rows(raw: &[Vec<Value>], columns: &ColumnMap) -> Vec<PettyCashRow> {
    raw.iter()
        .skip(1)
        .enumerate()
        .map(|(id, cols)| normalize_row(id, cols, columns))
        .collect()
}

pub fn normalize_row(id: usize, cols: &[Value], columns: &ColumnMap) -> PettyCashRow {
    let text = |i: usize| cell_text(cols.get(i));
    let num = |i: usize| cell_amount(cols.get(i));

    PettyCashRow {
        id,
        month_label: text(columns.month_label),
        transfer_date: text(columns.transfer_date),
        doc_no: text(columns.doc_no),
        detail: text(columns.detail),
        group_name: text(columns.group_name),
        date: text(columns.date),
        receiver: text(columns.receiver),
        amount: num(columns.amount),
        institute: text(columns.institute),
        note: text(columns.note),
        advance: num(columns.advance),
        refund: num(columns.refund),
        adv_no: text(columns.adv_no),
    }
}

pub fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        // Whole floats print without a trailing ".0".
        Some(Value::Number(n)) if n.is_f64() => match n.as_f64() {
            Some(f) if f.is_finite() => f.to_string(),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

pub fn cell_amount(cell: Option<&Value>) -> Decimal {
    match cell {
        None | Some(Value::Null) => Decimal::ZERO,
        Some(Value::String(s)) => parse_amount(s),
        Some(Value::Number(n)) => parse_amount(&n.to_string()),
        Some(_) => Decimal::ZERO,
    }
}

/// Lifts plain string cells (e.g. from a CSV export) into sheet cell values.
pub fn string_rows(rows: Vec<Vec<String>>) -> Vec<Vec<Value>> {
    rows.into_iter()
        .map(|r| r.into_iter().map(Value::String).collect())
        .collect()
}
