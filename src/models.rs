// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One petty-cash transfer line as it appears in the source sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PettyCashRow {
    /// Zero-based position among the data rows of a single fetch.
    pub id: usize,
    pub month_label: String,
    pub transfer_date: String,
    pub doc_no: String,
    pub detail: String,
    pub group_name: String,
    pub date: String,
    pub receiver: String,
    pub amount: Decimal,
    pub institute: String,
    pub note: String,
    pub advance: Decimal,
    pub refund: Decimal,
    pub adv_no: String,
}

/// Column index of every field in the sheet range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub month_label: usize,
    pub transfer_date: usize,
    pub doc_no: usize,
    pub detail: usize,
    pub group_name: usize,
    pub date: usize,
    pub receiver: usize,
    pub amount: usize,
    pub institute: usize,
    pub note: usize,
    pub advance: usize,
    pub refund: usize,
    pub adv_no: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            month_label: 0,
            transfer_date: 1,
            doc_no: 2,
            detail: 3,
            group_name: 4,
            date: 5,
            receiver: 6,
            amount: 7,
            institute: 8,
            note: 9,
            advance: 10,
            refund: 11,
            adv_no: 12,
        }
    }
}

/// Active search keywords, one per filterable field. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub receiver: String,
    pub institute: String,
    pub detail: String,
    pub group: String,
    pub date: String,
    pub month: String,
    pub year: String,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
            && self.institute.is_empty()
            && self.detail.is_empty()
            && self.group.is_empty()
            && self.date.is_empty()
            && self.month.is_empty()
            && self.year.is_empty()
    }
}

/// Rows and the sheet's last-modified stamp from one fetch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub rows: Vec<PettyCashRow>,
    pub last_updated: Option<String>,
}

pub const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];
