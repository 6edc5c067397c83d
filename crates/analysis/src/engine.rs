use crate::aggregate::aggregate;
use crate::classify::{classify, effective_threshold};
use crate::config::AuditConfig;
use crate::merge::merge;
use crate::model::{AuditInput, AuditMeta, AuditResult, AuditSummary, Diagnostic};

/// Run the full pipeline: threshold resolution, merge, aggregation,
/// classification, summary. Pure function of its inputs — no shared
/// state survives between invocations.
pub fn run(config: &AuditConfig, input: &AuditInput, raw_threshold: &str) -> AuditResult {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let (threshold, threshold_diag) =
        effective_threshold(raw_threshold, config.default_threshold_percent);
    if let Some(diag) = threshold_diag {
        diagnostics.push(diag);
    }

    let merged = merge(&input.roles, &input.directory, config, &mut diagnostics);
    let aggregates = aggregate(&merged.records);
    let (outliers, non_outliers) = classify(&aggregates, &merged.records, threshold);

    let name_fallbacks = diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::NameFallback { .. }))
        .count();

    let summary = AuditSummary {
        canonical_records: merged.records.len(),
        role_rows_dropped: merged.role_rows_dropped,
        directory_rows_dropped: merged.directory_rows_dropped,
        groups: aggregates.len(),
        outlier_groups: aggregates.len() - non_outliers.len(),
        outlier_users: outliers.len(),
        non_outlier_groups: non_outliers.len(),
        name_fallbacks,
    };

    AuditResult {
        meta: AuditMeta {
            config_name: config.name.clone(),
            threshold,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        canonical: merged.records,
        aggregates,
        outliers,
        non_outliers,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DirectoryRecord, RoleRecord};

    fn role(dept: &str, user: &str, resp: &str, title: &str) -> RoleRecord {
        RoleRecord {
            department: dept.into(),
            user_name: user.into(),
            responsibility_name: resp.into(),
            job_title: title.into(),
        }
    }

    fn account(sam: &str) -> DirectoryRecord {
        DirectoryRecord {
            sam_account_name: sam.into(),
            display_name: format!("{sam}, Test"),
            office: "EPG Mankato".into(),
            member_of: "Domain Users".into(),
        }
    }

    fn three_user_input() -> AuditInput {
        AuditInput {
            roles: vec![
                role("A", "X", "R1", "T1"),
                role("A", "Y", "R2", "T1"),
                role("A", "Z", "R1", "T1"),
            ],
            directory: vec![account("x"), account("y"), account("z")],
        }
    }

    #[test]
    fn end_to_end_outlier_scenario() {
        let result = run(&AuditConfig::default(), &three_user_input(), "50");

        assert_eq!(result.meta.threshold, 0.5);
        assert_eq!(result.summary.canonical_records, 3);
        assert_eq!(result.summary.groups, 2);
        assert_eq!(result.summary.outlier_groups, 1);

        assert_eq!(result.outliers.len(), 1);
        assert_eq!(result.outliers[0].user_name, "Y");
        assert_eq!(result.outliers[0].percentage, 33.33);

        assert_eq!(result.non_outliers.len(), 1);
        assert_eq!(result.non_outliers[0].responsibility_name, "R1");
        assert_eq!(result.non_outliers[0].percentage, 66.67);

        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn invalid_threshold_reported_and_defaulted() {
        let result = run(&AuditConfig::default(), &three_user_input(), "lots");
        assert_eq!(result.meta.threshold, 0.07);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            result.diagnostics[0],
            Diagnostic::ThresholdDefaulted { .. }
        ));
        // 33.33% > 7% — nothing qualifies
        assert!(result.outliers.is_empty());
        assert_eq!(result.non_outliers.len(), 2);
    }

    #[test]
    fn rerun_is_deterministic() {
        let input = three_user_input();
        let config = AuditConfig::default();
        let first = run(&config, &input, "50");
        let second = run(&config, &input, "50");
        assert_eq!(first.summary.canonical_records, second.summary.canonical_records);
        assert_eq!(first.outliers.len(), second.outliers.len());
        assert_eq!(
            first.outliers[0].user_name,
            second.outliers[0].user_name
        );
    }

    #[test]
    fn summary_counts_partition_the_groups() {
        let result = run(&AuditConfig::default(), &three_user_input(), "50");
        assert_eq!(
            result.summary.outlier_groups + result.summary.non_outlier_groups,
            result.summary.groups
        );
    }
}
