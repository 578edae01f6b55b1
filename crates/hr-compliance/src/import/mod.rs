//! CSV import of HR system exports into [`ComplianceRecord`]s.
//!
//! Exports carry one row per employee. The date column may be headed
//! `Relevant Date`, `Expiry Date`, `Next Check Date` or `Scheduled Date`;
//! anything that is not an id, name, date or status column is kept as a
//! category-specific document field.

mod parser;

pub use parser::parse_date;

use crate::compliance::domain::{ComplianceRecord, DocumentCategory};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingSubject { line: u64 },
    InvalidDate { line: u64, value: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read compliance export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid compliance CSV data: {}", err),
            ImportError::MissingSubject { line } => {
                write!(f, "row {} has no employee id", line)
            }
            ImportError::InvalidDate { line, value } => {
                write!(f, "row {} has an unreadable date '{}'", line, value)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::MissingSubject { .. } | ImportError::InvalidDate { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ComplianceCsvImporter;

impl ComplianceCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        category: DocumentCategory,
    ) -> Result<Vec<ComplianceRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, category)
    }

    /// Parses every row; a later row for the same employee replaces an earlier one.
    pub fn from_reader<R: Read>(
        reader: R,
        category: DocumentCategory,
    ) -> Result<Vec<ComplianceRecord>, ImportError> {
        let rows = parser::parse_rows(reader)?;
        let mut by_subject: BTreeMap<String, (u64, ComplianceRecord)> = BTreeMap::new();

        for row in rows {
            let mut record = ComplianceRecord::new(
                row.subject_id.as_str(),
                row.subject_name.as_str(),
                category,
                row.relevant_date,
            );
            record.server_status = row.server_status;
            record.document_fields = row.document_fields;

            if let Some((previous, _)) = by_subject.insert(row.subject_id, (row.line, record)) {
                warn!(
                    line = row.line,
                    previous_line = previous,
                    "duplicate employee row in compliance export; keeping the later row"
                );
            }
        }

        let mut records: Vec<(u64, ComplianceRecord)> = by_subject.into_values().collect();
        records.sort_by_key(|(line, _)| *line);
        debug!(
            category = category.slug(),
            count = records.len(),
            "imported compliance records"
        );

        Ok(records.into_iter().map(|(_, record)| record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    #[test]
    fn rows_become_records_in_file_order() {
        let csv = "Employee ID,Employee Name,Expiry Date,Certificate Number\n\
                   emp-2,Ben Carr,01/07/2025,DBS-2\n\
                   emp-1,Ada Obi,,\n";
        let records =
            ComplianceCsvImporter::from_reader(Cursor::new(csv), DocumentCategory::Dbs)
                .expect("import succeeds");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].subject_id.0, "emp-2");
        assert_eq!(records[0].category, DocumentCategory::Dbs);
        assert_eq!(records[0].relevant_date, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(
            records[0]
                .document_fields
                .get("certificate_number")
                .map(String::as_str),
            Some("DBS-2")
        );
        assert!(records[1].relevant_date.is_none());
    }

    #[test]
    fn later_duplicate_rows_replace_earlier_ones() {
        let csv = "Employee ID,Employee Name,Next Check Date\n\
                   emp-1,Ada Obi,2025-07-01\n\
                   emp-1,Ada Obi,2025-08-01\n";
        let records =
            ComplianceCsvImporter::from_reader(Cursor::new(csv), DocumentCategory::SpotCheck)
                .expect("import succeeds");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].relevant_date, NaiveDate::from_ymd_opt(2025, 8, 1));
    }

    #[test]
    fn rows_without_employee_id_are_rejected() {
        let csv = "Employee ID,Employee Name,Expiry Date\n,Ada Obi,2025-07-01\n";
        let error =
            ComplianceCsvImporter::from_reader(Cursor::new(csv), DocumentCategory::Passport)
                .expect_err("missing id rejected");
        assert!(matches!(error, ImportError::MissingSubject { line: 2 }));
        assert_eq!(error.to_string(), "row 2 has no employee id");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = ComplianceCsvImporter::from_path(
            "does/not/exist.csv",
            DocumentCategory::Passport,
        )
        .expect_err("missing file");
        assert!(matches!(error, ImportError::Io(_)));
    }
}
