use std::fmt::Write as _;
use std::io::Write;

use super::ComplianceReport;

#[derive(Debug, thiserror::Error)]
pub enum ReportExportError {
    #[error("failed to write report CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush report output: {0}")]
    Io(#[from] std::io::Error),
}

impl ComplianceReport {
    /// Write every page's rows as one CSV table with a single header.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.header())?;
        for page in &self.pages {
            for row in &page.rows {
                csv_writer.write_record(&row.cells)?;
            }
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, ReportExportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Plain-text rendering, one block per page, for terminal output.
    pub fn render_text(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(
            out,
            "Generated {} | warning window {} days | {} records",
            self.generated_on, self.threshold_days, self.total_rows
        );

        for page in &self.pages {
            out.push('\n');
            push_line(&mut out, &page.header, &widths);
            let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
            push_line(&mut out, &rule, &widths);
            if page.rows.is_empty() {
                out.push_str("(no records)\n");
            }
            for row in &page.rows {
                push_line(&mut out, &row.cells, &widths);
            }
            let _ = writeln!(out, "{}", page.footer);
        }

        out
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .header()
            .iter()
            .map(|cell| cell.chars().count())
            .collect();
        for row in self.pages.iter().flat_map(|page| page.rows.iter()) {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}
