use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{CompanyId, DocumentCategory, EmployeeId};
use super::listing::{ComplianceListView, ComplianceRow, ListQuery, StatusCounts};
use super::repository::{ComplianceRecordSource, RecordUpdate, RepositoryError, UpdateError};
use super::schedule::{self, ScheduleInterval, ScheduleSettingsProvider, SettingsError};

/// List view plus whether the record fetch failed and was replaced by an
/// empty list.
#[derive(Debug, Clone, Serialize)]
pub struct ListOutcome {
    #[serde(flatten)]
    pub view: ComplianceListView,
    pub degraded: bool,
}

/// Counts for one category on the company overview.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOverview {
    pub category: DocumentCategory,
    pub category_label: &'static str,
    pub threshold_days: u32,
    pub counts: StatusCounts,
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceOverview {
    pub company_id: CompanyId,
    pub today: NaiveDate,
    pub categories: Vec<CategoryOverview>,
}

impl ComplianceOverview {
    pub fn needing_attention(&self) -> usize {
        self.categories
            .iter()
            .map(|entry| entry.counts.needing_attention())
            .sum()
    }
}

/// Service composing schedule settings and the record source into list
/// screens. Status is computed on every call and never persisted.
pub struct ComplianceService<S, R> {
    settings: Arc<S>,
    records: Arc<R>,
}

impl<S, R> ComplianceService<S, R>
where
    S: ScheduleSettingsProvider + 'static,
    R: ComplianceRecordSource + 'static,
{
    pub fn new(settings: Arc<S>, records: Arc<R>) -> Self {
        Self { settings, records }
    }

    /// Build one category's list screen. A failed fetch yields an empty list.
    pub fn list(
        &self,
        company_id: &CompanyId,
        category: DocumentCategory,
        today: NaiveDate,
        query: &ListQuery,
    ) -> ListOutcome {
        let threshold = schedule::resolve_threshold(self.settings.as_ref(), company_id, category);
        self.list_with_threshold(company_id, category, threshold, today, query)
    }

    fn list_with_threshold(
        &self,
        company_id: &CompanyId,
        category: DocumentCategory,
        threshold: u32,
        today: NaiveDate,
        query: &ListQuery,
    ) -> ListOutcome {
        let (records, degraded) = match self.records.list(company_id, category) {
            Ok(records) => (records, false),
            Err(err) => {
                warn!(
                    company = %company_id.0,
                    category = category.slug(),
                    error = %err,
                    "compliance record fetch failed; showing empty list"
                );
                (Vec::new(), true)
            }
        };

        ListOutcome {
            view: ComplianceListView::build(category, records, threshold, today, query),
            degraded,
        }
    }

    /// Counts for all five categories, sharing one settings lookup.
    pub fn overview(&self, company_id: &CompanyId, today: NaiveDate) -> ComplianceOverview {
        let interval = schedule::resolve_all(self.settings.as_ref(), company_id);
        let categories = DocumentCategory::ordered()
            .into_iter()
            .map(|category| {
                let threshold = interval.threshold_for(category);
                let outcome = self.list_with_threshold(
                    company_id,
                    category,
                    threshold,
                    today,
                    &ListQuery::default(),
                );
                CategoryOverview {
                    category,
                    category_label: category.label(),
                    threshold_days: threshold,
                    counts: outcome.view.counts,
                    degraded: outcome.degraded,
                }
            })
            .collect();

        ComplianceOverview {
            company_id: company_id.clone(),
            today,
            categories,
        }
    }

    /// Apply the update dialog's submission and return the re-evaluated row.
    pub fn update(
        &self,
        company_id: &CompanyId,
        category: DocumentCategory,
        subject_id: &EmployeeId,
        update: RecordUpdate,
        today: NaiveDate,
    ) -> Result<ComplianceRow, ComplianceServiceError> {
        let document = update.validated_document(company_id, category, subject_id)?;
        let existing = self.records.fetch(company_id, category, subject_id)?;
        let renewed = existing.is_none();

        let record = update.apply(existing, category, subject_id.clone(), document);
        let stored = self.records.upsert(company_id, record)?;

        info!(
            company = %company_id.0,
            category = category.slug(),
            subject = %subject_id,
            renewed,
            "compliance record updated"
        );

        let threshold = schedule::resolve_threshold(self.settings.as_ref(), company_id, category);
        Ok(ComplianceRow::evaluate(stored, threshold, today))
    }

    /// Company schedule with defaults filled in for unset categories.
    pub fn schedule(&self, company_id: &CompanyId) -> ScheduleInterval {
        let interval = schedule::resolve_all(self.settings.as_ref(), company_id);
        ScheduleInterval {
            thresholds: interval.effective(),
            ..interval
        }
    }

    pub fn replace_schedule(
        &self,
        interval: ScheduleInterval,
    ) -> Result<ScheduleInterval, ComplianceServiceError> {
        interval.validate()?;
        let company_id = interval.company_id.clone();
        self.settings.store(interval)?;
        Ok(self.schedule(&company_id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComplianceServiceError {
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
