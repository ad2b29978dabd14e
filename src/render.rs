// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::filter::{FilterField, TableView};
use crate::models::{FilterState, PettyCashRow, THAI_MONTHS};
use crate::utils::{fmt_amount, fmt_fixed2};
use askama::Template;
use reqwest::Url;

pub const COLUMN_HEADERS: [&str; 13] = [
    "เดือนที่เบิก",
    "วันที่โอน",
    "เลขที่ใบสำคัญจ่ายเงินสดย่อย",
    "รายละเอียดการเบิก",
    "กลุ่มฯ/งาน",
    "วันที่",
    "ผู้รับเงิน",
    "จำนวนเงิน",
    "ฝ่าย/สถาบัน",
    "หมายเหตุ",
    "เบิกล่วงหน้า",
    "คงเหลือคืน",
    "เลขที่ใบเบิกล่วงหน้า",
];

/// Display text of every column, in header order.
pub fn display_cells(row: &PettyCashRow) -> Vec<String> {
    vec![
        row.month_label.clone(),
        row.transfer_date.clone(),
        row.doc_no.clone(),
        row.detail.clone(),
        row.group_name.clone(),
        row.date.clone(),
        row.receiver.clone(),
        fmt_amount(&row.amount),
        row.institute.clone(),
        row.note.clone(),
        fmt_fixed2(&row.advance),
        fmt_fixed2(&row.refund),
        row.adv_no.clone(),
    ]
}

pub struct DisplayRow {
    pub cells: Vec<String>,
    pub class: &'static str,
    pub href: String,
}

pub struct MonthOption {
    pub name: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub headers: &'static [&'static str],
    pub rows: Vec<DisplayRow>,
    pub filter: FilterState,
    pub months: Vec<MonthOption>,
    pub last_updated: String,
    pub matched: usize,
    pub total: usize,
}

impl DashboardPage {
    pub fn new(view: &TableView, last_updated: Option<&str>) -> Self {
        let filter = view.filter().clone();
        let rows = view
            .rows()
            .enumerate()
            .map(|(i, row)| DisplayRow {
                cells: display_cells(row),
                class: if view.selected() == Some(row.id) {
                    "selected"
                } else if i % 2 == 0 {
                    "even"
                } else {
                    "odd"
                },
                href: selection_href(&filter, row.id),
            })
            .collect();
        let months = THAI_MONTHS
            .iter()
            .map(|&name| MonthOption {
                name,
                selected: filter.month == name,
            })
            .collect();
        Self {
            headers: &COLUMN_HEADERS,
            rows,
            filter,
            months,
            last_updated: last_updated.unwrap_or_default().to_string(),
            matched: view.matched(),
            total: view.total(),
        }
    }
}

/// Link that keeps the current keywords and selects row `id`.
pub fn selection_href(filter: &FilterState, id: usize) -> String {
    let id = id.to_string();
    let mut pairs: Vec<(&str, &str)> = FilterField::ALL
        .iter()
        .map(|&f| (f.key(), filter.get(f)))
        .filter(|(_, v)| !v.is_empty())
        .collect();
    pairs.push(("selected", id.as_str()));
    Url::parse_with_params("http://localhost/", &pairs)
        .ok()
        .and_then(|u| u.query().map(|q| format!("/?{q}")))
        .unwrap_or_else(|| format!("/?selected={id}"))
}

pub fn render_dashboard(
    view: &TableView,
    last_updated: Option<&str>,
) -> Result<String, askama::Error> {
    DashboardPage::new(view, last_updated).render()
}
