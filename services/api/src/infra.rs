use chrono::NaiveDate;
use hr_compliance::compliance::{
    CompanyId, ComplianceRecord, ComplianceRecordSource, DocumentCategory, EmployeeId,
    RepositoryError, ScheduleInterval, ScheduleSettingsProvider, SettingsError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScheduleSettings {
    intervals: Arc<Mutex<HashMap<CompanyId, ScheduleInterval>>>,
}

impl ScheduleSettingsProvider for InMemoryScheduleSettings {
    fn thresholds(&self, company_id: &CompanyId) -> Result<Option<ScheduleInterval>, SettingsError> {
        let guard = self
            .intervals
            .lock()
            .map_err(|_| SettingsError::Unavailable("settings store poisoned".to_string()))?;
        Ok(guard.get(company_id).cloned())
    }

    fn store(&self, interval: ScheduleInterval) -> Result<(), SettingsError> {
        let mut guard = self
            .intervals
            .lock()
            .map_err(|_| SettingsError::Unavailable("settings store poisoned".to_string()))?;
        guard.insert(interval.company_id.clone(), interval);
        Ok(())
    }
}

type RecordKey = (CompanyId, DocumentCategory, EmployeeId);

#[derive(Default, Clone)]
pub(crate) struct InMemoryComplianceRecords {
    records: Arc<Mutex<BTreeMap<RecordKey, ComplianceRecord>>>,
}

impl InMemoryComplianceRecords {
    fn poisoned() -> RepositoryError {
        RepositoryError::Unavailable("record store poisoned".to_string())
    }

    /// Load records for one company, replacing any stored row for the same employee.
    pub(crate) fn seed(
        &self,
        company_id: &CompanyId,
        records: Vec<ComplianceRecord>,
    ) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| Self::poisoned())?;
        let count = records.len();
        for record in records {
            guard.insert(
                (company_id.clone(), record.category, record.subject_id.clone()),
                record,
            );
        }
        Ok(count)
    }
}

impl ComplianceRecordSource for InMemoryComplianceRecords {
    fn list(
        &self,
        company_id: &CompanyId,
        category: DocumentCategory,
    ) -> Result<Vec<ComplianceRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| Self::poisoned())?;
        Ok(guard
            .iter()
            .filter(|((company, kind, _), _)| company == company_id && *kind == category)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn fetch(
        &self,
        company_id: &CompanyId,
        category: DocumentCategory,
        subject_id: &EmployeeId,
    ) -> Result<Option<ComplianceRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| Self::poisoned())?;
        Ok(guard
            .get(&(company_id.clone(), category, subject_id.clone()))
            .cloned())
    }

    fn upsert(
        &self,
        company_id: &CompanyId,
        record: ComplianceRecord,
    ) -> Result<ComplianceRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| Self::poisoned())?;
        guard.insert(
            (company_id.clone(), record.category, record.subject_id.clone()),
            record.clone(),
        );
        Ok(record)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_category(raw: &str) -> Result<DocumentCategory, String> {
    raw.parse::<DocumentCategory>()
        .map_err(|err| err.to_string())
}
