//! Tabular compliance reports laid out into fixed-size pages.
//!
//! The layout here is what a document renderer consumes: header cells repeated
//! on every page, already-formatted cells, and page numbering. Rendering to
//! bytes is left to the caller.

mod export;

pub use export::ReportExportError;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::DocumentCategory;
use super::listing::{ComplianceListView, ComplianceRow};

pub const DEFAULT_ROWS_PER_PAGE: usize = 25;

const EMPTY_CELL: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub rows_per_page: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPage {
    pub number: usize,
    pub header: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    pub title: String,
    pub category: DocumentCategory,
    pub generated_on: NaiveDate,
    pub threshold_days: u32,
    pub total_rows: usize,
    pub pages: Vec<ReportPage>,
}

impl ComplianceReport {
    /// Lay out a list view's rows (in their current order) into pages.
    pub fn from_view(view: &ComplianceListView, options: ReportOptions) -> Self {
        Self::build(
            view.category,
            &view.rows,
            view.threshold_days,
            view.today,
            options,
        )
    }

    pub fn build(
        category: DocumentCategory,
        rows: &[ComplianceRow],
        threshold_days: u32,
        generated_on: NaiveDate,
        options: ReportOptions,
    ) -> Self {
        let header = header_for(category);
        let body: Vec<ReportRow> = rows.iter().map(format_row).collect();
        let per_page = options.rows_per_page.max(1);

        let chunks: Vec<Vec<ReportRow>> = if body.is_empty() {
            vec![Vec::new()]
        } else {
            body.chunks(per_page).map(<[ReportRow]>::to_vec).collect()
        };

        let page_count = chunks.len();
        let pages = chunks
            .into_iter()
            .enumerate()
            .map(|(index, rows)| ReportPage {
                number: index + 1,
                header: header.clone(),
                rows,
                footer: format!("Page {} of {}", index + 1, page_count),
            })
            .collect();

        Self {
            title: format!("{} Compliance Report", category.label()),
            category,
            generated_on,
            threshold_days,
            total_rows: rows.len(),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn header(&self) -> Vec<String> {
        header_for(self.category)
    }
}

fn header_for(category: DocumentCategory) -> Vec<String> {
    vec![
        "Employee".to_string(),
        "Employee ID".to_string(),
        category.relevant_date_label().to_string(),
        "Days Remaining".to_string(),
        "Status".to_string(),
    ]
}

fn format_row(row: &ComplianceRow) -> ReportRow {
    ReportRow {
        cells: vec![
            row.subject_name.clone(),
            row.subject_id.0.clone(),
            row.relevant_date
                .map(|date| date.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            row.days_remaining
                .map(|days| days.to_string())
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            row.status_label.to_string(),
        ],
    }
}
