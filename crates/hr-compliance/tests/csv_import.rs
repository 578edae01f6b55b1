use chrono::NaiveDate;
use hr_compliance::compliance::{ComplianceListView, DocumentCategory, ListQuery};
use hr_compliance::import::{ComplianceCsvImporter, ImportError};
use std::io::Cursor;

const SPOT_CHECK_EXPORT: &str = "\u{feff}Employee ID,Employee Name,Next Check Date,Status,Checked By\n\
emp-100,Ada Obi,2025-03-10,scheduled,J. Patel\n\
emp-101,Ben Carr,,not_scheduled,\n\
emp-102,Chen Li,15/02/2025,scheduled,J. Patel\n\
emp-103,Dara Kemp,2025-06-30T09:00:00Z,,\n";

#[test]
fn spot_check_export_drives_the_list_view() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
    let records = ComplianceCsvImporter::from_reader(
        Cursor::new(SPOT_CHECK_EXPORT),
        DocumentCategory::SpotCheck,
    )
    .expect("export imports");

    assert_eq!(records.len(), 4);
    assert_eq!(
        records[0].document_fields.get("checked_by").map(String::as_str),
        Some("J. Patel")
    );

    let view = ComplianceListView::build(
        DocumentCategory::SpotCheck,
        records,
        DocumentCategory::SpotCheck.default_threshold_days(),
        today,
        &ListQuery::default(),
    );

    assert_eq!(view.counts.expired, 1);
    assert_eq!(view.counts.expiring_soon, 1);
    assert_eq!(view.counts.missing, 1);
    assert_eq!(view.counts.active, 1);

    let labels: Vec<&str> = view.rows.iter().map(|row| row.status_label).collect();
    assert_eq!(labels, vec!["Overdue", "Due Soon", "Scheduled", "Not Scheduled"]);
}

#[test]
fn unreadable_dates_abort_the_import() {
    let export = "Employee ID,Employee Name,Expiry Date\nemp-1,Ada Obi,31/02/2025\n";
    let error = ComplianceCsvImporter::from_reader(Cursor::new(export), DocumentCategory::Passport)
        .expect_err("impossible date rejected");

    match error {
        ImportError::InvalidDate { line, value } => {
            assert_eq!(line, 2);
            assert_eq!(value, "31/02/2025");
        }
        other => panic!("expected invalid date, got {other:?}"),
    }
}

#[test]
fn date_parser_is_available_to_callers() {
    assert_eq!(
        hr_compliance::import::parse_date("30/09/2025"),
        NaiveDate::from_ymd_opt(2025, 9, 30)
    );
    assert_eq!(hr_compliance::import::parse_date("tomorrow"), None);
}

#[test]
fn exports_with_several_date_columns_import_consistently() {
    let export = "Employee ID,Employee Name,Date,Expiry Date\nemp-1,Ada Obi,2020-01-01,2030-01-01\n";
    for _ in 0..20 {
        let records =
            ComplianceCsvImporter::from_reader(Cursor::new(export), DocumentCategory::Passport)
                .expect("export imports");
        assert_eq!(records[0].relevant_date, NaiveDate::from_ymd_opt(2030, 1, 1));
    }
}
