use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    CompanyId, ComplianceRecord, DocumentCategory, DocumentReference, EmployeeId,
};

/// Record storage seam; production deployments point this at the HR backend.
pub trait ComplianceRecordSource: Send + Sync {
    fn list(
        &self,
        company_id: &CompanyId,
        category: DocumentCategory,
    ) -> Result<Vec<ComplianceRecord>, RepositoryError>;

    fn fetch(
        &self,
        company_id: &CompanyId,
        category: DocumentCategory,
        subject_id: &EmployeeId,
    ) -> Result<Option<ComplianceRecord>, RepositoryError>;

    /// Insert or replace the record keyed by category and subject.
    fn upsert(
        &self,
        company_id: &CompanyId,
        record: ComplianceRecord,
    ) -> Result<ComplianceRecord, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record source unavailable: {0}")]
    Unavailable(String),
}

/// Document attached when renewing or updating a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

impl DocumentUpload {
    /// Declared content type, or one guessed from the file extension.
    pub fn resolved_content_type(&self) -> Option<String> {
        match self.content_type.as_deref().map(str::trim) {
            Some(declared) if !declared.is_empty() => Some(declared.to_ascii_lowercase()),
            _ => mime_guess::from_path(&self.file_name)
                .first()
                .map(|mime| mime.essence_str().to_string()),
        }
    }
}

/// Payload of the update dialog: a new relevant date, category fields, and a
/// mandatory supporting document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub relevant_date: NaiveDate,
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub document_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub supporting_document: Option<DocumentUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    #[error("a supporting document must be uploaded before submitting")]
    MissingDocument,
    #[error("supporting document file name is empty")]
    EmptyFileName,
    #[error("unsupported supporting document type '{0}' (expected PDF or image)")]
    UnsupportedDocumentType(String),
}

impl RecordUpdate {
    /// Validate the upload and return the reference to store on the record.
    pub fn validated_document(
        &self,
        company_id: &CompanyId,
        category: DocumentCategory,
        subject_id: &EmployeeId,
    ) -> Result<DocumentReference, UpdateError> {
        let upload = self
            .supporting_document
            .as_ref()
            .ok_or(UpdateError::MissingDocument)?;

        let file_name = upload.file_name.trim();
        if file_name.is_empty() {
            return Err(UpdateError::EmptyFileName);
        }

        let content_type = upload
            .resolved_content_type()
            .ok_or_else(|| UpdateError::UnsupportedDocumentType(file_name.to_string()))?;
        if content_type != "application/pdf" && !content_type.starts_with("image/") {
            return Err(UpdateError::UnsupportedDocumentType(content_type));
        }

        let storage_key = upload.storage_key.clone().unwrap_or_else(|| {
            format!(
                "{}/{}/{}/{}",
                company_id.0,
                category.slug(),
                subject_id.0,
                file_name
            )
        });

        Ok(DocumentReference {
            file_name: file_name.to_string(),
            content_type,
            storage_key,
        })
    }

    /// Apply the update onto an existing record, or start a fresh one.
    pub fn apply(
        self,
        existing: Option<ComplianceRecord>,
        category: DocumentCategory,
        subject_id: EmployeeId,
        document: DocumentReference,
    ) -> ComplianceRecord {
        let mut record = existing.unwrap_or_else(|| ComplianceRecord {
            subject_id: subject_id.clone(),
            subject_name: subject_id.0.clone(),
            category,
            relevant_date: None,
            document_fields: BTreeMap::new(),
            server_status: None,
            supporting_document: None,
        });

        record.relevant_date = Some(self.relevant_date);
        if let Some(name) = self.subject_name.filter(|name| !name.trim().is_empty()) {
            record.subject_name = name;
        }
        record.document_fields.extend(self.document_fields);
        record.supporting_document = Some(document);
        record.server_status = None;
        record
    }
}
