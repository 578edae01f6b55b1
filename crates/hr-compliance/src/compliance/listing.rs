use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::domain::{ComplianceRecord, DocumentCategory, EmployeeId};
use super::evaluator::{days_until, evaluate, BadgeTone, ComplianceStatus};

/// Action offered on a row of a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    /// No record yet: go to the renewal form.
    Renew,
    /// Existing record: open the update dialog.
    Update,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Soonest relevant date first; records without one go last.
    #[default]
    RelevantDate,
    SubjectName,
    /// Expired, expiring soon, missing, then active.
    Urgency,
}

/// Filter and sort options for a list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<ComplianceStatus>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// One evaluated row as rendered by a list screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceRow {
    pub subject_id: EmployeeId,
    pub subject_name: String,
    pub category: DocumentCategory,
    pub relevant_date: Option<NaiveDate>,
    pub days_remaining: Option<i64>,
    pub status: ComplianceStatus,
    pub status_label: &'static str,
    pub badge: BadgeTone,
    pub action: RowAction,
    pub record: ComplianceRecord,
}

impl ComplianceRow {
    pub fn evaluate(record: ComplianceRecord, threshold_days: u32, today: NaiveDate) -> Self {
        let status = evaluate(record.relevant_date, threshold_days, today);
        let category = record.category;
        Self {
            subject_id: record.subject_id.clone(),
            subject_name: record.subject_name.clone(),
            category,
            relevant_date: record.relevant_date,
            days_remaining: record
                .relevant_date
                .map(|relevant| days_until(relevant, today)),
            status,
            status_label: status.label(category),
            badge: status.badge(),
            action: if record.relevant_date.is_some() {
                RowAction::Update
            } else {
                RowAction::Renew
            },
            record,
        }
    }

    fn matches(&self, query: &ListQuery) -> bool {
        if let Some(status) = query.status {
            if self.status != status {
                return false;
            }
        }

        match query.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                self.subject_name.to_lowercase().contains(&needle)
                    || self.subject_id.0.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Per-status counts shown above a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub missing: usize,
    pub expired: usize,
    pub expiring_soon: usize,
    pub active: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ComplianceStatus) {
        match status {
            ComplianceStatus::Missing => self.missing += 1,
            ComplianceStatus::Expired => self.expired += 1,
            ComplianceStatus::ExpiringSoon => self.expiring_soon += 1,
            ComplianceStatus::Active => self.active += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing + self.expired + self.expiring_soon + self.active
    }

    pub fn needing_attention(&self) -> usize {
        self.missing + self.expired + self.expiring_soon
    }
}

/// An evaluated, filtered, sorted list screen for one category.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceListView {
    pub category: DocumentCategory,
    pub category_label: &'static str,
    pub relevant_date_label: &'static str,
    pub threshold_days: u32,
    pub today: NaiveDate,
    /// Counts across every fetched row, before filtering.
    pub counts: StatusCounts,
    pub rows: Vec<ComplianceRow>,
}

impl ComplianceListView {
    /// Evaluate every record fresh, then filter and sort for display.
    pub fn build(
        category: DocumentCategory,
        records: Vec<ComplianceRecord>,
        threshold_days: u32,
        today: NaiveDate,
        query: &ListQuery,
    ) -> Self {
        let mut counts = StatusCounts::default();
        let mut rows: Vec<ComplianceRow> = records
            .into_iter()
            .filter(|record| record.category == category)
            .map(|record| ComplianceRow::evaluate(record, threshold_days, today))
            .inspect(|row| counts.record(row.status))
            .filter(|row| row.matches(query))
            .collect();

        sort_rows(&mut rows, query.sort);

        Self {
            category,
            category_label: category.label(),
            relevant_date_label: category.relevant_date_label(),
            threshold_days,
            today,
            counts,
            rows,
        }
    }
}

fn compare_dates(left: Option<NaiveDate>, right: Option<NaiveDate>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive name order, falling back to the employee id.
fn compare_names(left: &ComplianceRow, right: &ComplianceRow) -> Ordering {
    left.subject_name
        .to_lowercase()
        .cmp(&right.subject_name.to_lowercase())
        .then_with(|| left.subject_id.cmp(&right.subject_id))
}

pub(crate) fn sort_rows(rows: &mut [ComplianceRow], order: SortOrder) {
    match order {
        SortOrder::RelevantDate => rows.sort_by(|left, right| {
            compare_dates(left.relevant_date, right.relevant_date)
                .then_with(|| compare_names(left, right))
        }),
        SortOrder::SubjectName => rows.sort_by(compare_names),
        SortOrder::Urgency => rows.sort_by(|left, right| {
            left.status
                .urgency_rank()
                .cmp(&right.status.urgency_rank())
                .then_with(|| compare_dates(left.relevant_date, right.relevant_date))
                .then_with(|| compare_names(left, right))
        }),
    }
}
