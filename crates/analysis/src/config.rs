use serde::Deserialize;

use crate::error::AuditError;

/// Threshold applied when the user-entered percentage is empty or
/// unparsable.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 7.0;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Audit configuration. Every field has a default so a config file is
/// optional; a file only needs the keys it overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_threshold_percent")]
    pub default_threshold_percent: f64,
    #[serde(default)]
    pub role_columns: RoleColumns,
    #[serde(default)]
    pub directory_columns: DirectoryColumns,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

fn default_name() -> String {
    "Role Audit".into()
}

fn default_threshold_percent() -> f64 {
    DEFAULT_THRESHOLD_PERCENT
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            default_threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            role_columns: RoleColumns::default(),
            directory_columns: DirectoryColumns::default(),
            normalizer: NormalizerConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Column headers expected in the EPGA role table.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleColumns {
    #[serde(default = "default_department")]
    pub department: String,
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default = "default_responsibility")]
    pub responsibility: String,
    #[serde(default = "default_job_title")]
    pub job_title: String,
}

fn default_department() -> String {
    "Department".into()
}

fn default_user_name() -> String {
    "USER_NAME".into()
}

fn default_responsibility() -> String {
    "RESPONSIBILITY_NAME".into()
}

fn default_job_title() -> String {
    "Title".into()
}

impl Default for RoleColumns {
    fn default() -> Self {
        Self {
            department: default_department(),
            user_name: default_user_name(),
            responsibility: default_responsibility(),
            job_title: default_job_title(),
        }
    }
}

/// Column headers expected in the Active Directory export.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryColumns {
    #[serde(default = "default_sam_account_name")]
    pub sam_account_name: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_office")]
    pub office: String,
    #[serde(default = "default_member_of")]
    pub member_of: String,
}

fn default_sam_account_name() -> String {
    "SAM Account Name".into()
}

fn default_display_name() -> String {
    "Display Name".into()
}

fn default_office() -> String {
    "Office".into()
}

fn default_member_of() -> String {
    "Member of".into()
}

impl Default for DirectoryColumns {
    fn default() -> Self {
        Self {
            sam_account_name: default_sam_account_name(),
            display_name: default_display_name(),
            office: default_office(),
            member_of: default_member_of(),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Username normalizer settings. Accounts at `display_name_key_office`
/// (case-sensitive match against the raw Office value) derive their
/// join key from the display name instead of the SAM account name.
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default = "default_key_office")]
    pub display_name_key_office: String,
}

fn default_key_office() -> String {
    "EPG Reynosa".into()
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            display_name_key_office: default_key_office(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, AuditError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| AuditError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if !self.default_threshold_percent.is_finite()
            || self.default_threshold_percent < 0.0
            || self.default_threshold_percent > 100.0
        {
            return Err(AuditError::ConfigValidation(format!(
                "default_threshold_percent must be in [0, 100], got {}",
                self.default_threshold_percent
            )));
        }

        let columns = [
            ("role_columns.department", &self.role_columns.department),
            ("role_columns.user_name", &self.role_columns.user_name),
            ("role_columns.responsibility", &self.role_columns.responsibility),
            ("role_columns.job_title", &self.role_columns.job_title),
            (
                "directory_columns.sam_account_name",
                &self.directory_columns.sam_account_name,
            ),
            (
                "directory_columns.display_name",
                &self.directory_columns.display_name,
            ),
            ("directory_columns.office", &self.directory_columns.office),
            ("directory_columns.member_of", &self.directory_columns.member_of),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(AuditError::ConfigValidation(format!(
                    "{key} must not be empty"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
