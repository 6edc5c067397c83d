use crate::config::{DirectoryColumns, RoleColumns};
use crate::error::AuditError;
use crate::model::{DirectoryRecord, RoleRecord};

/// A parsed tabular source: one header row plus data rows. `source`
/// identifies the file (or sheet) for error messages.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(source: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            source: source.into(),
            headers,
            rows,
        }
    }

    /// Position of a required column. Headers are matched after
    /// trimming, since spreadsheet exports often pad them.
    fn column(&self, name: &str) -> Result<usize, AuditError> {
        if self.headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AuditError::EmptyTable {
                source: self.source.clone(),
            });
        }
        self.headers
            .iter()
            .position(|h| h.trim() == name.trim())
            .ok_or_else(|| AuditError::MissingColumn {
                source: self.source.clone(),
                column: name.into(),
            })
    }
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Map the role table onto `RoleRecord`s. Extra columns are ignored;
/// a missing required column fails with the source identified.
pub fn load_role_records(table: &Table, columns: &RoleColumns) -> Result<Vec<RoleRecord>, AuditError> {
    let department_idx = table.column(&columns.department)?;
    let user_name_idx = table.column(&columns.user_name)?;
    let responsibility_idx = table.column(&columns.responsibility)?;
    let job_title_idx = table.column(&columns.job_title)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let record = RoleRecord {
            department: cell(row, department_idx),
            user_name: cell(row, user_name_idx),
            responsibility_name: cell(row, responsibility_idx),
            job_title: cell(row, job_title_idx),
        };
        // Skip fully blank rows (trailing padding in spreadsheet exports)
        if record.user_name.is_empty() && record.responsibility_name.is_empty() {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

/// Map the directory table onto `DirectoryRecord`s.
pub fn load_directory_records(
    table: &Table,
    columns: &DirectoryColumns,
) -> Result<Vec<DirectoryRecord>, AuditError> {
    let sam_idx = table.column(&columns.sam_account_name)?;
    let display_idx = table.column(&columns.display_name)?;
    let office_idx = table.column(&columns.office)?;
    let member_of_idx = table.column(&columns.member_of)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let record = DirectoryRecord {
            sam_account_name: cell(row, sam_idx),
            display_name: cell(row, display_idx),
            office: cell(row, office_idx),
            member_of: cell(row, member_of_idx),
        };
        if record.sam_account_name.is_empty() {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}
