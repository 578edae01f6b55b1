use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Document families tracked by the compliance screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Passport,
    Dbs,
    Immigration,
    RightToWork,
    SpotCheck,
}

impl DocumentCategory {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Passport,
            Self::Dbs,
            Self::Immigration,
            Self::RightToWork,
            Self::SpotCheck,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Passport => "Passport",
            Self::Dbs => "DBS",
            Self::Immigration => "Immigration",
            Self::RightToWork => "Right to Work",
            Self::SpotCheck => "Spot Check",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::Dbs => "dbs",
            Self::Immigration => "immigration",
            Self::RightToWork => "right_to_work",
            Self::SpotCheck => "spot_check",
        }
    }

    /// Name of the date that drives the status for this category.
    pub const fn relevant_date_label(self) -> &'static str {
        match self {
            Self::Passport | Self::Dbs | Self::RightToWork => "Expiry Date",
            Self::Immigration => "Next Check Date",
            Self::SpotCheck => "Scheduled Date",
        }
    }

    /// Spot checks are forward-looking schedules rather than document expiries.
    pub const fn is_scheduling(self) -> bool {
        matches!(self, Self::SpotCheck)
    }

    /// Threshold applied when a company has not configured one.
    pub const fn default_threshold_days(self) -> u32 {
        match self {
            Self::SpotCheck => 30,
            Self::Passport | Self::Dbs | Self::Immigration | Self::RightToWork => 0,
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for DocumentCategory {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "passport" | "passports" => Ok(Self::Passport),
            "dbs" => Ok(Self::Dbs),
            "immigration" => Ok(Self::Immigration),
            "right_to_work" | "rtw" => Ok(Self::RightToWork),
            "spot_check" | "spot_checks" | "spotcheck" => Ok(Self::SpotCheck),
            _ => Err(UnknownCategory(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to the last supporting document attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub file_name: String,
    pub content_type: String,
    pub storage_key: String,
}

/// One employee's record for one category.
///
/// `server_status` mirrors whatever the backend reported and is never used for
/// classification; status is always recomputed from `relevant_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub subject_id: EmployeeId,
    pub subject_name: String,
    pub category: DocumentCategory,
    pub relevant_date: Option<NaiveDate>,
    #[serde(default)]
    pub document_fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporting_document: Option<DocumentReference>,
}

impl ComplianceRecord {
    pub fn new(
        subject_id: impl Into<String>,
        subject_name: impl Into<String>,
        category: DocumentCategory,
        relevant_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            subject_id: EmployeeId(subject_id.into()),
            subject_name: subject_name.into(),
            category,
            relevant_date,
            document_fields: BTreeMap::new(),
            server_status: None,
            supporting_document: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.document_fields.insert(key.into(), value.into());
        self
    }
}
