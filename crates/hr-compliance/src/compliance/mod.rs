//! Compliance expiry tracking for passport, DBS, immigration, right to work,
//! and spot-check records.
//!
//! [`evaluator`] is the pure status rule. The remaining modules feed it: the
//! schedule provider supplies per-company thresholds, the record source
//! supplies rows, and [`listing`] evaluates every row fresh for display.

pub mod domain;
pub mod evaluator;
pub mod listing;
pub mod report;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CompanyId, ComplianceRecord, DocumentCategory, DocumentReference, EmployeeId,
    UnknownCategory,
};
pub use evaluator::{
    days_until, evaluate, evaluate_at, evaluate_naive, today_utc, BadgeTone, ComplianceStatus,
};
pub use listing::{ComplianceListView, ComplianceRow, ListQuery, RowAction, SortOrder, StatusCounts};
pub use report::{ComplianceReport, ReportExportError, ReportOptions, DEFAULT_ROWS_PER_PAGE};
pub use repository::{
    ComplianceRecordSource, DocumentUpload, RecordUpdate, RepositoryError, UpdateError,
};
pub use router::compliance_router;
pub use schedule::{
    resolve_threshold, ScheduleInterval, ScheduleSettingsProvider, SettingsError,
    MAX_THRESHOLD_DAYS,
};
pub use service::{
    CategoryOverview, ComplianceOverview, ComplianceService, ComplianceServiceError, ListOutcome,
};
