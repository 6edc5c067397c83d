use crate::model::{
    CanonicalRecord, Diagnostic, GroupAggregate, NonOutlierSummaryRecord, OutlierUserRecord,
};

/// Round a [0, 1] fraction to a 0-100 percentage with 2 decimals.
fn percent_rounded(fraction: f64) -> f64 {
    (fraction * 10_000.0).round() / 100.0
}

/// Partition aggregates by threshold. A group is an outlier iff its
/// percentage is strictly below the threshold; a group exactly at the
/// threshold is not. Outlier groups expand to one row per matching
/// canonical record; the rest emit one summary row each.
pub fn classify(
    aggregates: &[GroupAggregate],
    records: &[CanonicalRecord],
    threshold: f64,
) -> (Vec<OutlierUserRecord>, Vec<NonOutlierSummaryRecord>) {
    let mut outlier_users = Vec::new();
    let mut non_outliers = Vec::new();

    for agg in aggregates {
        if agg.percentage < threshold {
            let members = records.iter().filter(|r| {
                r.department == agg.department
                    && r.job_title == agg.job_title
                    && r.responsibility_name == agg.responsibility_name
            });
            for member in members {
                outlier_users.push(OutlierUserRecord {
                    user_name: member.user_name.clone(),
                    department: agg.department.clone(),
                    job_title: agg.job_title.clone(),
                    responsibility_name: agg.responsibility_name.clone(),
                    percentage: percent_rounded(agg.percentage),
                });
            }
        } else {
            non_outliers.push(NonOutlierSummaryRecord {
                department: agg.department.clone(),
                job_title: agg.job_title.clone(),
                responsibility_name: agg.responsibility_name.clone(),
                percentage: percent_rounded(agg.percentage),
            });
        }
    }

    (outlier_users, non_outliers)
}

/// Resolve the user-entered percentage string at the input boundary.
/// Empty or unparsable input substitutes `default_percent` and records
/// a diagnostic; valid input is `abs(value) / 100`.
pub fn effective_threshold(raw: &str, default_percent: f64) -> (f64, Option<Diagnostic>) {
    let defaulted = (
        default_percent / 100.0,
        Some(Diagnostic::ThresholdDefaulted {
            raw: raw.into(),
            effective_percent: default_percent,
        }),
    );

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return defaulted;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => ((value / 100.0).abs(), None),
        _ => defaulted,
    }
}
