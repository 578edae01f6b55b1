use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{CompanyId, DocumentCategory};

/// Upper bound accepted for a configured threshold.
pub const MAX_THRESHOLD_DAYS: u32 = 3650;

/// Per-company warning windows, in days, keyed by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInterval {
    pub company_id: CompanyId,
    #[serde(default)]
    pub thresholds: BTreeMap<DocumentCategory, u32>,
}

impl ScheduleInterval {
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            thresholds: BTreeMap::new(),
        }
    }

    pub fn with_threshold(mut self, category: DocumentCategory, days: u32) -> Self {
        self.thresholds.insert(category, days);
        self
    }

    /// Configured threshold, or the category default when none is set.
    pub fn threshold_for(&self, category: DocumentCategory) -> u32 {
        self.thresholds
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_threshold_days())
    }

    /// Thresholds for every category with defaults filled in.
    pub fn effective(&self) -> BTreeMap<DocumentCategory, u32> {
        DocumentCategory::ordered()
            .into_iter()
            .map(|category| (category, self.threshold_for(category)))
            .collect()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        match self
            .thresholds
            .iter()
            .find(|(_, days)| **days > MAX_THRESHOLD_DAYS)
        {
            Some((category, days)) => Err(SettingsError::ThresholdOutOfRange {
                category: *category,
                days: *days,
            }),
            None => Ok(()),
        }
    }
}

/// Source of company schedule settings (the settings endpoint in the console).
pub trait ScheduleSettingsProvider: Send + Sync {
    fn thresholds(&self, company_id: &CompanyId) -> Result<Option<ScheduleInterval>, SettingsError>;
    fn store(&self, interval: ScheduleInterval) -> Result<(), SettingsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{category} threshold of {days} days exceeds the {max} day limit", max = MAX_THRESHOLD_DAYS)]
    ThresholdOutOfRange { category: DocumentCategory, days: u32 },
    #[error("schedule settings unavailable: {0}")]
    Unavailable(String),
}

/// Threshold for one category. Lookup failures fall back to the default and
/// are only logged.
pub fn resolve_threshold<P>(provider: &P, company_id: &CompanyId, category: DocumentCategory) -> u32
where
    P: ScheduleSettingsProvider + ?Sized,
{
    match provider.thresholds(company_id) {
        Ok(Some(interval)) => interval.threshold_for(category),
        Ok(None) => category.default_threshold_days(),
        Err(err) => {
            warn!(
                company = %company_id.0,
                category = category.slug(),
                error = %err,
                "schedule settings lookup failed; using category default"
            );
            category.default_threshold_days()
        }
    }
}

/// Resolve every category's threshold with a single provider call.
pub fn resolve_all<P>(provider: &P, company_id: &CompanyId) -> ScheduleInterval
where
    P: ScheduleSettingsProvider + ?Sized,
{
    match provider.thresholds(company_id) {
        Ok(Some(interval)) => interval,
        Ok(None) => ScheduleInterval::new(company_id.clone()),
        Err(err) => {
            warn!(
                company = %company_id.0,
                error = %err,
                "schedule settings lookup failed; using category defaults"
            );
            ScheduleInterval::new(company_id.clone())
        }
    }
}
