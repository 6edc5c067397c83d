use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One EPGA row: a user holding one responsibility. A user appears once
/// per responsibility they hold.
#[derive(Debug, Clone)]
pub struct RoleRecord {
    pub department: String,
    pub user_name: String,
    pub responsibility_name: String,
    pub job_title: String,
}

/// One Active Directory export row, one per user account.
#[derive(Debug, Clone)]
pub struct DirectoryRecord {
    pub sam_account_name: String,
    pub display_name: String,
    pub office: String,
    pub member_of: String,
}

/// Pre-loaded input tables.
pub struct AuditInput {
    pub roles: Vec<RoleRecord>,
    pub directory: Vec<DirectoryRecord>,
}

// ---------------------------------------------------------------------------
// Join result
// ---------------------------------------------------------------------------

/// Inner-join of a role row with its directory account. `user_name` is
/// the normalized join key of exactly one directory record.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalRecord {
    pub department: String,
    pub user_name: String,
    pub responsibility_name: String,
    pub job_title: String,
    pub office: String,
    pub member_of: String,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Aggregate key = (department, job title, responsibility). `Ord` keeps
/// aggregator output deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub department: String,
    pub job_title: String,
    pub responsibility_name: String,
}

/// Count and group-relative share for one (department, job title,
/// responsibility) triple. `group_total` sums counts over every
/// responsibility sharing the (department, job title) bucket, so the
/// percentages of a bucket sum to 1.0.
#[derive(Debug, Clone, Serialize)]
pub struct GroupAggregate {
    pub department: String,
    pub job_title: String,
    pub responsibility_name: String,
    pub count: usize,
    pub group_total: usize,
    pub percentage: f64,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// One row per user whose group fell below the threshold. `percentage`
/// is on a 0-100 scale, rounded to 2 decimals.
#[derive(Debug, Clone, Serialize)]
pub struct OutlierUserRecord {
    pub user_name: String,
    pub department: String,
    pub job_title: String,
    pub responsibility_name: String,
    pub percentage: f64,
}

/// One row per group at or above the threshold (group-level, not
/// expanded per user).
#[derive(Debug, Clone, Serialize)]
pub struct NonOutlierSummaryRecord {
    pub department: String,
    pub job_title: String,
    pub responsibility_name: String,
    pub percentage: f64,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Recoverable per-run conditions. Collected in the result so callers
/// can report them; none of these aborts a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Display-name key derivation failed; the default rule was used.
    NameFallback { sam_account_name: String, reason: String },
    /// Threshold input was empty or unparsable; the default applied.
    ThresholdDefaulted { raw: String, effective_percent: f64 },
    /// Two directory rows normalized to the same join key; the first won.
    DuplicateDirectoryKey { key: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameFallback { sam_account_name, reason } => write!(
                f,
                "account '{sam_account_name}': display-name key failed ({reason}), using SAM account name"
            ),
            Self::ThresholdDefaulted { raw, effective_percent } => write!(
                f,
                "threshold {raw:?} is not a usable percentage, defaulting to {effective_percent}%"
            ),
            Self::DuplicateDirectoryKey { key } => {
                write!(f, "duplicate directory join key '{key}', keeping the first row")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub canonical_records: usize,
    pub role_rows_dropped: usize,
    pub directory_rows_dropped: usize,
    pub groups: usize,
    pub outlier_groups: usize,
    pub outlier_users: usize,
    pub non_outlier_groups: usize,
    pub name_fallbacks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditMeta {
    pub config_name: String,
    /// Effective threshold as a fraction in [0, 1].
    pub threshold: f64,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditResult {
    pub meta: AuditMeta,
    pub summary: AuditSummary,
    pub canonical: Vec<CanonicalRecord>,
    pub aggregates: Vec<GroupAggregate>,
    pub outliers: Vec<OutlierUserRecord>,
    pub non_outliers: Vec<NonOutlierSummaryRecord>,
    pub diagnostics: Vec<Diagnostic>,
}
