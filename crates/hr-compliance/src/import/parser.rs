use super::ImportError;
use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;
use std::io::Read;

const ID_COLUMNS: [&str; 2] = ["employee id", "employee_id"];
const NAME_COLUMNS: [&str; 2] = ["employee name", "employee_name"];
/// Recognised date headers, most specific first.
const DATE_COLUMNS: [&str; 5] = [
    "relevant date",
    "expiry date",
    "next check date",
    "scheduled date",
    "date",
];
const STATUS_COLUMNS: [&str; 1] = ["status"];

/// One parsed row before it is attached to a category.
#[derive(Debug)]
pub(crate) struct ImportedRow {
    pub(crate) line: u64,
    pub(crate) subject_id: String,
    pub(crate) subject_name: String,
    pub(crate) relevant_date: Option<NaiveDate>,
    pub(crate) server_status: Option<String>,
    pub(crate) document_fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Column {
    Subject,
    Name,
    Date { rank: usize },
    Status,
    Field(String),
}

impl Column {
    fn classify(header: &str) -> Self {
        let key = normalize_header(header);
        if ID_COLUMNS.contains(&key.as_str()) {
            Self::Subject
        } else if NAME_COLUMNS.contains(&key.as_str()) {
            Self::Name
        } else if let Some(rank) = DATE_COLUMNS.iter().position(|name| *name == key) {
            Self::Date { rank }
        } else if STATUS_COLUMNS.contains(&key.as_str()) {
            Self::Status
        } else {
            Self::Field(key.replace(' ', "_"))
        }
    }
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ImportedRow>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let columns: Vec<Column> = csv_reader.headers()?.iter().map(Column::classify).collect();
    let mut rows = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // position is the physical line, so blank and multi-line rows are counted
        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or(index as u64 + 2);
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        rows.push(parse_row(line, &columns, &record)?);
    }

    Ok(rows)
}

fn parse_row(
    line: u64,
    columns: &[Column],
    record: &csv::StringRecord,
) -> Result<ImportedRow, ImportError> {
    let mut subject_id = None;
    let mut subject_name = None;
    let mut date_cell: Option<(usize, &str)> = None;
    let mut server_status = None;
    let mut document_fields = BTreeMap::new();

    for (column, value) in columns.iter().zip(record.iter()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match column {
            Column::Subject => subject_id = Some(value.to_string()),
            Column::Name => subject_name = Some(value.to_string()),
            Column::Date { rank } => {
                if date_cell.map_or(true, |(best, _)| *rank < best) {
                    date_cell = Some((*rank, value));
                }
            }
            Column::Status => server_status = Some(value.to_string()),
            Column::Field(key) => {
                document_fields.insert(key.clone(), value.to_string());
            }
        }
    }

    let relevant_date = date_cell
        .map(|(_, value)| {
            parse_date(value).ok_or_else(|| ImportError::InvalidDate {
                line,
                value: value.to_string(),
            })
        })
        .transpose()?;
    let subject_id = subject_id.ok_or(ImportError::MissingSubject { line })?;
    let subject_name = subject_name.unwrap_or_else(|| subject_id.clone());

    Ok(ImportedRow {
        line,
        subject_id,
        subject_name,
        relevant_date,
        server_status,
        document_fields,
    })
}

fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Accepts `YYYY-MM-DD`, RFC 3339 (UTC date taken), and UK `DD/MM/YYYY`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}
