use crate::infra::{parse_category, parse_date, InMemoryComplianceRecords, InMemoryScheduleSettings};
use chrono::{Duration, NaiveDate};
use clap::Args;
use hr_compliance::compliance::{
    days_until, evaluate, today_utc, CompanyId, ComplianceListView, ComplianceRecord,
    ComplianceReport, ComplianceService, DocumentCategory, DocumentUpload, EmployeeId, ListOutcome,
    ListQuery, RecordUpdate, ReportOptions, ScheduleInterval, DEFAULT_ROWS_PER_PAGE,
};
use hr_compliance::error::AppError;
use hr_compliance::import::ComplianceCsvImporter;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Relevant date (YYYY-MM-DD). Omit to evaluate a missing record.
    #[arg(long, value_parser = parse_date)]
    pub(crate) relevant_date: Option<NaiveDate>,
    /// Warning window in days; 0 disables the expiring-soon state
    #[arg(long)]
    pub(crate) threshold_days: u32,
    /// Evaluation date (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Category used for status wording
    #[arg(long, value_parser = parse_category, default_value = "passport")]
    pub(crate) category: DocumentCategory,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// CSV export with Employee ID, Employee Name, and a date column
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Category the export belongs to
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: DocumentCategory,
    /// Warning window in days (defaults to the category default)
    #[arg(long)]
    pub(crate) threshold_days: Option<u32>,
    /// Evaluation date for the report (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Rows printed on each report page
    #[arg(long, default_value_t = DEFAULT_ROWS_PER_PAGE)]
    pub(crate) rows_per_page: usize,
    /// Write the report as CSV to this path instead of printing it
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the record update walkthrough
    #[arg(long)]
    pub(crate) skip_update: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        relevant_date,
        threshold_days,
        today,
        category,
    } = args;

    let today = today.unwrap_or_else(today_utc);
    let status = evaluate(relevant_date, threshold_days, today);

    println!("{} evaluation as of {}", category.label(), today);
    match relevant_date {
        Some(relevant) => println!(
            "- {}: {} ({} days)",
            category.relevant_date_label(),
            relevant,
            days_until(relevant, today)
        ),
        None => println!("- {}: not recorded", category.relevant_date_label()),
    }
    println!("- Warning window: {} days", threshold_days);
    println!(
        "- Status: {} [{}]",
        status.label(category),
        status.badge().label()
    );

    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        csv,
        category,
        threshold_days,
        today,
        rows_per_page,
        export,
    } = args;

    let today = today.unwrap_or_else(today_utc);
    let threshold = threshold_days.unwrap_or_else(|| category.default_threshold_days());
    let records = ComplianceCsvImporter::from_path(&csv, category)?;
    let view = ComplianceListView::build(category, records, threshold, today, &ListQuery::default());
    let report = ComplianceReport::from_view(&view, ReportOptions { rows_per_page });

    match export {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            report.write_csv(file)?;
            println!(
                "Wrote {} rows across {} pages to {}",
                report.total_rows,
                report.page_count(),
                path.display()
            );
        }
        None => print!("{}", report.render_text()),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, skip_update } = args;
    let today = today.unwrap_or_else(today_utc);
    let company = CompanyId("northwind-care".to_string());

    let settings = Arc::new(InMemoryScheduleSettings::default());
    let records = Arc::new(InMemoryComplianceRecords::default());
    let service = ComplianceService::new(settings, records.clone());

    if let Err(err) = service.replace_schedule(
        ScheduleInterval::new(company.clone())
            .with_threshold(DocumentCategory::Passport, 60)
            .with_threshold(DocumentCategory::Dbs, 30)
            .with_threshold(DocumentCategory::Immigration, 14)
            .with_threshold(DocumentCategory::RightToWork, 45),
    ) {
        println!("Schedule settings unavailable ({}); using defaults", err);
    }

    let seeded = match records.seed(&company, demo_records(today)) {
        Ok(seeded) => seeded,
        Err(err) => {
            println!("Demo records unavailable: {}", err);
            return Ok(());
        }
    };
    info!(company = %company.0, seeded, "seeded demo compliance records");

    println!("HR compliance demo for {} as of {}", company.0, today);

    let overview = service.overview(&company, today);
    println!(
        "\nOverview: {} records need attention",
        overview.needing_attention()
    );
    for entry in &overview.categories {
        println!(
            "- {}: {} expired | {} expiring soon | {} missing | {} active (window {} days)",
            entry.category_label,
            entry.counts.expired,
            entry.counts.expiring_soon,
            entry.counts.missing,
            entry.counts.active,
            entry.threshold_days
        );
    }

    for category in DocumentCategory::ordered() {
        let outcome = service.list(&company, category, today, &ListQuery::default());
        render_screen(&outcome);
    }

    if !skip_update {
        println!("\nRenewing Chen Li's passport");
        let update = RecordUpdate {
            relevant_date: today + Duration::days(3650),
            subject_name: None,
            document_fields: BTreeMap::from([(
                "passport_number".to_string(),
                "925511834".to_string(),
            )]),
            supporting_document: Some(DocumentUpload {
                file_name: "chen-li-passport.pdf".to_string(),
                content_type: None,
                storage_key: None,
            }),
        };
        match service.update(
            &company,
            DocumentCategory::Passport,
            &EmployeeId("emp-003".to_string()),
            update,
            today,
        ) {
            Ok(row) => println!(
                "- {} now {} until {}",
                row.subject_name,
                row.status_label,
                row.relevant_date
                    .map(|date| date.format("%d/%m/%Y").to_string())
                    .unwrap_or_default()
            ),
            Err(err) => println!("- Update rejected: {}", err),
        }
    }

    let passports = service.list(
        &company,
        DocumentCategory::Passport,
        today,
        &ListQuery::default(),
    );
    let report = ComplianceReport::from_view(&passports.view, ReportOptions { rows_per_page: 3 });
    println!();
    print!("{}", report.render_text());

    Ok(())
}

fn render_screen(outcome: &ListOutcome) {
    let view = &outcome.view;
    println!(
        "\n{} ({} records, window {} days)",
        view.category_label,
        view.counts.total(),
        view.threshold_days
    );
    if outcome.degraded {
        println!("  Records unavailable; showing an empty list");
    }
    for row in &view.rows {
        let date = row
            .relevant_date
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "—".to_string());
        println!(
            "  - {:<10} {:<12} {}: {:<10} [{}] {}",
            row.subject_id.0,
            row.subject_name,
            view.relevant_date_label,
            date,
            row.badge.label(),
            row.status_label
        );
    }
}

fn demo_records(today: NaiveDate) -> Vec<ComplianceRecord> {
    let staff = [
        ("emp-001", "Ada Obi"),
        ("emp-002", "Ben Carr"),
        ("emp-003", "Chen Li"),
        ("emp-004", "Dara Kemp"),
    ];
    let offsets: [(DocumentCategory, [Option<i64>; 4]); 5] = [
        (DocumentCategory::Passport, [Some(-12), Some(40), None, Some(900)]),
        (DocumentCategory::Dbs, [Some(300), Some(-3), Some(20), None]),
        (DocumentCategory::Immigration, [Some(10), None, Some(120), Some(0)]),
        (DocumentCategory::RightToWork, [Some(500), Some(44), Some(-60), Some(46)]),
        (DocumentCategory::SpotCheck, [Some(7), Some(-1), None, Some(75)]),
    ];

    offsets
        .into_iter()
        .flat_map(|(category, days)| {
            staff
                .iter()
                .zip(days)
                .map(move |((id, name), offset)| {
                    ComplianceRecord::new(
                        *id,
                        *name,
                        category,
                        offset.map(|days| today + Duration::days(days)),
                    )
                })
        })
        .collect()
}
