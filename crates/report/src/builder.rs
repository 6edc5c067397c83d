// Workbook assembly for the audit report.
//
// Layout mirrors the reports the audit team already reads: an Outliers
// sheet (one row per flagged user), a Non-Outliers sheet (one row per
// group), then one breakdown sheet per (office, job title) pair with
// responsibility and group-membership tallies plus pie charts.

use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{Chart, ChartType, Format, FormatAlign, Workbook, Worksheet};

use roleaudit_analysis::model::{
    AuditResult, CanonicalRecord, NonOutlierSummaryRecord, OutlierUserRecord,
};

use crate::breakdown::{member_of_counts, office_title_groups, responsibility_counts, CountRow};
use crate::sheet_name::{breakdown_sheet_name, unique_name};

const OUTLIER_HEADERS: [&str; 5] = [
    "USER_NAME",
    "DEPARTMENT",
    "JOB_TITLE",
    "RESPONSIBILITY_NAME",
    "PERCENTAGE",
];
const OUTLIER_WIDTHS: [f64; 5] = [15.0, 15.0, 35.0, 42.0, 12.0];

const NON_OUTLIER_HEADERS: [&str; 4] = [
    "DEPARTMENT",
    "JOB_TITLE",
    "RESPONSIBILITY_NAME",
    "PERCENTAGE",
];
const NON_OUTLIER_WIDTHS: [f64; 4] = [15.0, 35.0, 32.0, 12.0];

// Breakdown sheets: title in A1, tallies starting at row 3 with a
// header row above, charts in column F.
const BREAKDOWN_HEADER_ROW: u32 = 2;
const BREAKDOWN_DATA_ROW: u32 = 3;
const RESPONSIBILITY_CHART_CELL: (u32, u16) = (2, 5); // F3
const MEMBER_OF_CHART_CELL: (u32, u16) = (17, 5); // F18

/// Render a full `AuditResult` to an xlsx file.
pub fn write_report(path: &Path, result: &AuditResult) -> Result<(), String> {
    let mut builder = ReportBuilder::new();
    builder.add_outlier_sheet(&result.outliers)?;
    builder.add_non_outlier_sheet(&result.non_outliers)?;
    builder.add_breakdown_sheets(&result.canonical)?;
    builder.save(path)
}

/// Incrementally builds the report workbook. Sheet names are deduped
/// across the whole workbook.
pub struct ReportBuilder {
    workbook: Workbook,
    used_names: HashSet<String>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            used_names: HashSet::new(),
        }
    }

    /// One row per outlier user, already sorted by the engine.
    pub fn add_outlier_sheet(&mut self, outliers: &[OutlierUserRecord]) -> Result<(), String> {
        let name = unique_name(&mut self.used_names, "Outliers".to_string());
        let header = header_format();
        let centered = centered_format();
        let percent = percent_format();

        let sheet = self.workbook.add_worksheet();
        sheet.set_name(&name).map_err(xlsx_err)?;
        write_headers(sheet, &OUTLIER_HEADERS, &OUTLIER_WIDTHS, &header)?;

        for (i, record) in outliers.iter().enumerate() {
            let row = i as u32 + 1;
            sheet
                .write_string_with_format(row, 0, &record.user_name, &centered)
                .map_err(xlsx_err)?;
            sheet
                .write_string_with_format(row, 1, &record.department, &centered)
                .map_err(xlsx_err)?;
            sheet
                .write_string_with_format(row, 2, &record.job_title, &centered)
                .map_err(xlsx_err)?;
            sheet
                .write_string_with_format(row, 3, &record.responsibility_name, &centered)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 4, record.percentage, &percent)
                .map_err(xlsx_err)?;
        }
        Ok(())
    }

    /// One summary row per group that cleared the threshold.
    pub fn add_non_outlier_sheet(
        &mut self,
        rows: &[NonOutlierSummaryRecord],
    ) -> Result<(), String> {
        let name = unique_name(&mut self.used_names, "Non-Outliers".to_string());
        let header = header_format();
        let centered = centered_format();
        let percent = percent_format();

        let sheet = self.workbook.add_worksheet();
        sheet.set_name(&name).map_err(xlsx_err)?;
        write_headers(sheet, &NON_OUTLIER_HEADERS, &NON_OUTLIER_WIDTHS, &header)?;

        for (i, record) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            sheet
                .write_string_with_format(row, 0, &record.department, &centered)
                .map_err(xlsx_err)?;
            sheet
                .write_string_with_format(row, 1, &record.job_title, &centered)
                .map_err(xlsx_err)?;
            sheet
                .write_string_with_format(row, 2, &record.responsibility_name, &centered)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 3, record.percentage, &percent)
                .map_err(xlsx_err)?;
        }
        Ok(())
    }

    /// One sheet per (office, job title): responsibility tallies in
    /// columns A/B, group memberships in D/E, a pie chart for each.
    pub fn add_breakdown_sheets(&mut self, records: &[CanonicalRecord]) -> Result<(), String> {
        let header = header_format();
        let centered = centered_format();

        for ((office, job_title), members) in office_title_groups(records) {
            let name = unique_name(
                &mut self.used_names,
                breakdown_sheet_name(&office, &job_title),
            );
            let responsibilities = responsibility_counts(&members);
            let memberships = member_of_counts(&members);

            let sheet = self.workbook.add_worksheet();
            sheet.set_name(&name).map_err(xlsx_err)?;
            sheet.write_string(0, 0, &job_title).map_err(xlsx_err)?;

            write_tally(
                sheet,
                0,
                ("RESPONSIBILITY_NAME", "COUNTS"),
                (45.0, 10.0),
                &responsibilities,
                &header,
                &centered,
            )?;
            write_tally(
                sheet,
                3,
                ("MEMBER_OF", "COUNTS"),
                (45.0, 20.0),
                &memberships,
                &header,
                &centered,
            )?;

            if !responsibilities.is_empty() {
                let chart = pie_chart(
                    &name,
                    0,
                    responsibilities.len(),
                    "Responsibility Distribution",
                );
                sheet
                    .insert_chart(RESPONSIBILITY_CHART_CELL.0, RESPONSIBILITY_CHART_CELL.1, &chart)
                    .map_err(xlsx_err)?;
            }
            if !memberships.is_empty() {
                let chart = pie_chart(&name, 3, memberships.len(), "Member Of Distribution");
                sheet
                    .insert_chart(MEMBER_OF_CHART_CELL.0, MEMBER_OF_CHART_CELL.1, &chart)
                    .map_err(xlsx_err)?;
            }
        }
        Ok(())
    }

    pub fn save(mut self, path: &Path) -> Result<(), String> {
        self.workbook
            .save(path)
            .map_err(|e| format!("cannot write {}: {e}", path.display()))
    }
}

fn write_headers(
    sheet: &mut Worksheet,
    headers: &[&str],
    widths: &[f64],
    format: &Format,
) -> Result<(), String> {
    for (col, (title, width)) in headers.iter().zip(widths).enumerate() {
        let col = col as u16;
        sheet
            .write_string_with_format(0, col, *title, format)
            .map_err(xlsx_err)?;
        sheet.set_column_width(col, *width).map_err(xlsx_err)?;
    }
    Ok(())
}

fn write_tally(
    sheet: &mut Worksheet,
    start_col: u16,
    headers: (&str, &str),
    widths: (f64, f64),
    rows: &[CountRow],
    header: &Format,
    centered: &Format,
) -> Result<(), String> {
    sheet
        .write_string_with_format(BREAKDOWN_HEADER_ROW, start_col, headers.0, header)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(BREAKDOWN_HEADER_ROW, start_col + 1, headers.1, header)
        .map_err(xlsx_err)?;
    sheet.set_column_width(start_col, widths.0).map_err(xlsx_err)?;
    sheet
        .set_column_width(start_col + 1, widths.1)
        .map_err(xlsx_err)?;

    for (i, row) in rows.iter().enumerate() {
        let r = BREAKDOWN_DATA_ROW + i as u32;
        sheet.write_string(r, start_col, &row.name).map_err(xlsx_err)?;
        sheet
            .write_number_with_format(r, start_col + 1, row.count as f64, centered)
            .map_err(xlsx_err)?;
    }
    Ok(())
}

fn pie_chart(sheet_name: &str, label_col: u16, rows: usize, title: &str) -> Chart {
    let first = BREAKDOWN_DATA_ROW;
    let last = BREAKDOWN_DATA_ROW + rows as u32 - 1;
    let mut chart = Chart::new(ChartType::Pie);
    chart
        .add_series()
        .set_categories((sheet_name, first, label_col, last, label_col))
        .set_values((sheet_name, first, label_col + 1, last, label_col + 1));
    chart.title().set_name(title);
    chart
}

fn header_format() -> Format {
    Format::new().set_bold().set_align(FormatAlign::Center)
}

fn centered_format() -> Format {
    Format::new().set_align(FormatAlign::Center)
}

fn percent_format() -> Format {
    Format::new()
        .set_align(FormatAlign::Center)
        .set_num_format("0.00")
}

fn xlsx_err(e: rust_xlsxwriter::XlsxError) -> String {
    format!("xlsx error: {e}")
}
