// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row filtering for the petty-cash table.
//!
//! Every active keyword narrows the view; a row is shown only when it passes
//! all of them. Text keywords are case-insensitive substrings of a single
//! field. The month keyword is looked up in the month label and in both date
//! columns, because the sheet writes month names into dates as often as into
//! the label. The year keyword only applies once it has four digits.

use crate::models::{FilterState, PettyCashRow};
use crate::utils::digits_only;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Receiver,
    Institute,
    Detail,
    Group,
    Date,
    Month,
    Year,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::Receiver,
        FilterField::Institute,
        FilterField::Detail,
        FilterField::Group,
        FilterField::Date,
        FilterField::Month,
        FilterField::Year,
    ];

    /// Query-string and command-line name of the field.
    pub fn key(self) -> &'static str {
        match self {
            FilterField::Receiver => "receiver",
            FilterField::Institute => "institute",
            FilterField::Detail => "detail",
            FilterField::Group => "group",
            FilterField::Date => "date",
            FilterField::Month => "month",
            FilterField::Year => "year",
        }
    }
}

impl FilterState {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Receiver => &self.receiver,
            FilterField::Institute => &self.institute,
            FilterField::Detail => &self.detail,
            FilterField::Group => &self.group,
            FilterField::Date => &self.date,
            FilterField::Month => &self.month,
            FilterField::Year => &self.year,
        }
    }

    /// Builds a filter from decoded query pairs. Unknown keys are ignored and
    /// a repeated key keeps its last value.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = FilterState::default();
        for (key, value) in pairs {
            if let Some(field) = FilterField::ALL.iter().find(|f| f.key() == key) {
                *state.slot(*field) = value.to_string();
            }
        }
        state
    }

    fn slot(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Receiver => &mut self.receiver,
            FilterField::Institute => &mut self.institute,
            FilterField::Detail => &mut self.detail,
            FilterField::Group => &mut self.group,
            FilterField::Date => &mut self.date,
            FilterField::Month => &mut self.month,
            FilterField::Year => &mut self.year,
        }
    }
}

/// Keywords prepared once per filter pass.
struct Predicates<'f> {
    receiver: String,
    institute: String,
    detail: String,
    group: String,
    date: String,
    month: &'f str,
    year: Option<String>,
}

impl<'f> Predicates<'f> {
    fn new(filter: &'f FilterState) -> Self {
        let year = digits_only(&filter.year);
        Self {
            receiver: filter.receiver.to_lowercase(),
            institute: filter.institute.to_lowercase(),
            detail: filter.detail.to_lowercase(),
            group: filter.group.to_lowercase(),
            date: filter.date.to_lowercase(),
            month: &filter.month,
            year: (year.len() >= 4).then_some(year),
        }
    }

    fn matches(&self, row: &PettyCashRow) -> bool {
        text_match(&row.receiver, &self.receiver)
            && text_match(&row.institute, &self.institute)
            && text_match(&row.detail, &self.detail)
            && text_match(&row.group_name, &self.group)
            && text_match(&row.date, &self.date)
            && self.month_match(row)
            && self.year_match(row)
    }

    fn month_match(&self, row: &PettyCashRow) -> bool {
        if self.month.is_empty() {
            return true;
        }
        row.month_label.contains(self.month)
            || row.transfer_date.contains(self.month)
            || row.date.contains(self.month)
    }

    fn year_match(&self, row: &PettyCashRow) -> bool {
        match &self.year {
            None => true,
            Some(y) => {
                row.transfer_date.contains(y.as_str())
                    || row.date.contains(y.as_str())
                    || row.month_label.contains(y.as_str())
            }
        }
    }
}

/// `keyword` must already be lowercased.
fn text_match(value: &str, keyword: &str) -> bool {
    keyword.is_empty() || value.to_lowercase().contains(keyword)
}

pub fn row_matches(row: &PettyCashRow, filter: &FilterState) -> bool {
    Predicates::new(filter).matches(row)
}

/// Rows passing `filter`, in the order they are given.
pub fn retain_matching<'a, I>(rows: I, filter: &FilterState) -> Vec<&'a PettyCashRow>
where
    I: IntoIterator<Item = &'a PettyCashRow>,
{
    let p = Predicates::new(filter);
    rows.into_iter().filter(|r| p.matches(r)).collect()
}

/// Rows passing `filter`, most recent fetch position first.
pub fn filtered<'a>(rows: &'a [PettyCashRow], filter: &FilterState) -> Vec<&'a PettyCashRow> {
    retain_matching(rows.iter().rev(), filter)
}

/// A viewing session over one snapshot: the rows, the current keywords and
/// the visible subset derived from them.
///
/// The visible subset is recomputed once per change of the keywords and
/// never otherwise.
#[derive(Debug, Clone)]
pub struct TableView {
    ordered: Vec<PettyCashRow>,
    filter: FilterState,
    visible: Vec<usize>,
    selected: Option<usize>,
    recomputations: u64,
}

impl TableView {
    pub fn new(mut rows: Vec<PettyCashRow>) -> Self {
        rows.reverse();
        let mut view = Self {
            ordered: rows,
            filter: FilterState::default(),
            visible: Vec::new(),
            selected: None,
            recomputations: 0,
        };
        view.recompute();
        view
    }

    pub fn with_filter(rows: Vec<PettyCashRow>, filter: FilterState) -> Self {
        let mut view = Self::new(rows);
        view.apply(filter);
        view
    }

    fn recompute(&mut self) {
        let p = Predicates::new(&self.filter);
        self.visible = self
            .ordered
            .iter()
            .enumerate()
            .filter(|(_, r)| p.matches(r))
            .map(|(i, _)| i)
            .collect();
        self.recomputations += 1;
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        let slot = self.filter.slot(field);
        if *slot == value {
            return;
        }
        *slot = value;
        self.recompute();
    }

    /// Replaces every keyword at once.
    pub fn apply(&mut self, filter: FilterState) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        self.recompute();
    }

    /// Empties all seven keywords in a single transition.
    pub fn clear_filters(&mut self) {
        self.apply(FilterState::default());
    }

    pub fn select(&mut self, id: Option<usize>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn rows(&self) -> impl Iterator<Item = &PettyCashRow> + '_ {
        self.visible.iter().map(|&i| &self.ordered[i])
    }

    pub fn matched(&self) -> usize {
        self.visible.len()
    }

    pub fn total(&self) -> usize {
        self.ordered.len()
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
