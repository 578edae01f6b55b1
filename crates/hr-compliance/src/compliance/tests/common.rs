use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::compliance::domain::{CompanyId, ComplianceRecord, DocumentCategory, EmployeeId};
use crate::compliance::report::ReportOptions;
use crate::compliance::repository::{
    ComplianceRecordSource, DocumentUpload, RecordUpdate, RepositoryError,
};
use crate::compliance::schedule::{ScheduleInterval, ScheduleSettingsProvider, SettingsError};
use crate::compliance::{compliance_router, ComplianceService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn company() -> CompanyId {
    CompanyId("acme".to_string())
}

pub(super) fn passport_records() -> Vec<ComplianceRecord> {
    vec![
        ComplianceRecord::new(
            "emp-001",
            "Ada Obi",
            DocumentCategory::Passport,
            Some(today() - Duration::days(14)),
        )
        .with_field("passport_number", "553219874"),
        ComplianceRecord::new(
            "emp-002",
            "Ben Carr",
            DocumentCategory::Passport,
            Some(today() + Duration::days(16)),
        ),
        ComplianceRecord::new("emp-003", "Chen Li", DocumentCategory::Passport, None),
        ComplianceRecord::new(
            "emp-004",
            "Dara Kemp",
            DocumentCategory::Passport,
            Some(today() + Duration::days(47)),
        ),
    ]
}

pub(super) fn spot_check_records() -> Vec<ComplianceRecord> {
    vec![
        ComplianceRecord::new(
            "emp-001",
            "Ada Obi",
            DocumentCategory::SpotCheck,
            Some(today() + Duration::days(10)),
        ),
        ComplianceRecord::new("emp-002", "Ben Carr", DocumentCategory::SpotCheck, None),
    ]
}

pub(super) fn pdf_update(relevant_date: NaiveDate) -> RecordUpdate {
    RecordUpdate {
        relevant_date,
        subject_name: None,
        document_fields: BTreeMap::from([(
            "passport_number".to_string(),
            "771100223".to_string(),
        )]),
        supporting_document: Some(DocumentUpload {
            file_name: "renewed-passport.pdf".to_string(),
            content_type: None,
            storage_key: None,
        }),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySettings {
    pub(super) intervals: Arc<Mutex<HashMap<CompanyId, ScheduleInterval>>>,
}

impl MemorySettings {
    pub(super) fn with(interval: ScheduleInterval) -> Self {
        let settings = Self::default();
        settings
            .intervals
            .lock()
            .expect("settings mutex poisoned")
            .insert(interval.company_id.clone(), interval);
        settings
    }
}

impl ScheduleSettingsProvider for MemorySettings {
    fn thresholds(&self, company_id: &CompanyId) -> Result<Option<ScheduleInterval>, SettingsError> {
        let guard = self.intervals.lock().expect("settings mutex poisoned");
        Ok(guard.get(company_id).cloned())
    }

    fn store(&self, interval: ScheduleInterval) -> Result<(), SettingsError> {
        let mut guard = self.intervals.lock().expect("settings mutex poisoned");
        guard.insert(interval.company_id.clone(), interval);
        Ok(())
    }
}

pub(super) struct OfflineSettings;

impl ScheduleSettingsProvider for OfflineSettings {
    fn thresholds(&self, _company_id: &CompanyId) -> Result<Option<ScheduleInterval>, SettingsError> {
        Err(SettingsError::Unavailable("settings endpoint timed out".to_string()))
    }

    fn store(&self, _interval: ScheduleInterval) -> Result<(), SettingsError> {
        Err(SettingsError::Unavailable("settings endpoint timed out".to_string()))
    }
}

type RecordKey = (CompanyId, DocumentCategory, EmployeeId);

#[derive(Default, Clone)]
pub(super) struct MemoryRecords {
    pub(super) records: Arc<Mutex<BTreeMap<RecordKey, ComplianceRecord>>>,
}

impl MemoryRecords {
    pub(super) fn seeded(company_id: &CompanyId, records: Vec<ComplianceRecord>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.records.lock().expect("records mutex poisoned");
            for record in records {
                guard.insert(
                    (company_id.clone(), record.category, record.subject_id.clone()),
                    record,
                );
            }
        }
        store
    }
}

impl ComplianceRecordSource for MemoryRecords {
    fn list(
        &self,
        company_id: &CompanyId,
        category: DocumentCategory,
    ) -> Result<Vec<ComplianceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("records mutex poisoned");
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
        let guard = self.records.lock().expect("records mutex poisoned");
        Ok(guard
            .get(&(company_id.clone(), category, subject_id.clone()))
            .cloned())
    }

    fn upsert(
        &self,
        company_id: &CompanyId,
        record: ComplianceRecord,
    ) -> Result<ComplianceRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("records mutex poisoned");
        guard.insert(
            (company_id.clone(), record.category, record.subject_id.clone()),
            record.clone(),
        );
        Ok(record)
    }
}

pub(super) struct UnavailableRecords;

impl ComplianceRecordSource for UnavailableRecords {
    fn list(
        &self,
        _company_id: &CompanyId,
        _category: DocumentCategory,
    ) -> Result<Vec<ComplianceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn fetch(
        &self,
        _company_id: &CompanyId,
        _category: DocumentCategory,
        _subject_id: &EmployeeId,
    ) -> Result<Option<ComplianceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn upsert(
        &self,
        _company_id: &CompanyId,
        _record: ComplianceRecord,
    ) -> Result<ComplianceRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    ComplianceService<MemorySettings, MemoryRecords>,
    Arc<MemorySettings>,
    Arc<MemoryRecords>,
) {
    let mut records = passport_records();
    records.extend(spot_check_records());

    let settings = Arc::new(MemorySettings::with(
        ScheduleInterval::new(company()).with_threshold(DocumentCategory::Passport, 30),
    ));
    let records = Arc::new(MemoryRecords::seeded(&company(), records));
    let service = ComplianceService::new(settings.clone(), records.clone());
    (service, settings, records)
}

pub(super) fn router_with_service(
    service: ComplianceService<MemorySettings, MemoryRecords>,
) -> axum::Router {
    compliance_router(Arc::new(service), ReportOptions { rows_per_page: 2 })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
