use std::collections::{HashMap, HashSet};

use crate::config::AuditConfig;
use crate::model::{CanonicalRecord, Diagnostic, DirectoryRecord, RoleRecord};
use crate::normalize::join_key;

/// Sentinel some exports emit for a missing value.
const MISSING_SENTINEL: &str = "-";
const UNKNOWN: &str = "Unknown";

pub struct MergeOutput {
    pub records: Vec<CanonicalRecord>,
    /// Role rows with no matching directory account.
    pub role_rows_dropped: usize,
    /// Directory rows whose key matched no role row.
    pub directory_rows_dropped: usize,
}

/// Inner-join role rows with directory accounts on the normalized key.
/// Unmatched rows on either side are dropped (and counted); output
/// preserves role-row order.
pub fn merge(
    roles: &[RoleRecord],
    directory: &[DirectoryRecord],
    config: &AuditConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> MergeOutput {
    let mut keyed: Vec<(String, &DirectoryRecord)> = Vec::with_capacity(directory.len());
    let mut by_key: HashMap<&str, &DirectoryRecord> = HashMap::with_capacity(directory.len());

    for record in directory {
        let normalized = join_key(record, &config.normalizer.display_name_key_office);
        if let Some(diag) = normalized.fallback {
            diagnostics.push(diag);
        }
        keyed.push((normalized.key, record));
    }
    for (key, record) in &keyed {
        if by_key.contains_key(key.as_str()) {
            diagnostics.push(Diagnostic::DuplicateDirectoryKey { key: key.clone() });
            continue;
        }
        by_key.insert(key.as_str(), *record);
    }

    let mut records = Vec::new();
    let mut matched_keys: HashSet<String> = HashSet::new();

    for role in roles {
        // Role user names are expected to be uppercase already, but
        // case mismatches are the whole reason this join exists.
        let key = role.user_name.to_uppercase();
        let Some(account) = by_key.get(key.as_str()) else {
            continue;
        };
        records.push(CanonicalRecord {
            department: replace_missing(&role.department),
            user_name: key.clone(),
            responsibility_name: role.responsibility_name.clone(),
            job_title: replace_missing(&role.job_title),
            office: normalize_office(&account.office),
            member_of: account.member_of.to_uppercase(),
        });
        matched_keys.insert(key);
    }

    let directory_rows_dropped = keyed
        .iter()
        .filter(|(key, _)| !matched_keys.contains(key))
        .count();

    MergeOutput {
        role_rows_dropped: roles.len() - records.len(),
        directory_rows_dropped,
        records,
    }
}

fn replace_missing(value: &str) -> String {
    if value == MISSING_SENTINEL {
        UNKNOWN.into()
    } else {
        value.into()
    }
}

fn normalize_office(value: &str) -> String {
    if value == MISSING_SENTINEL {
        UNKNOWN.into()
    } else {
        value.to_uppercase()
    }
}
