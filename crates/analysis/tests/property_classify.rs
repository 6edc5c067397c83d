// Property-based tests for the aggregation and classification laws.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;

use roleaudit_analysis::aggregate::aggregate;
use roleaudit_analysis::classify::classify;
use roleaudit_analysis::config::AuditConfig;
use roleaudit_analysis::merge::merge;
use roleaudit_analysis::model::{CanonicalRecord, DirectoryRecord, RoleRecord};

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Small pools keep collisions frequent enough to exercise grouping.
fn arb_record() -> impl Strategy<Value = CanonicalRecord> {
    (
        prop_oneof![Just("Finance"), Just("Ops"), Just("IT")],
        prop_oneof![Just("Accountant"), Just("Technician")],
        prop_oneof![Just("R1"), Just("R2"), Just("R3"), Just("R4")],
        "[A-Z]{2,6}",
    )
        .prop_map(|(dept, title, resp, user)| CanonicalRecord {
            department: dept.into(),
            user_name: user,
            responsibility_name: resp.into(),
            job_title: title.into(),
            office: "EPG MANKATO".into(),
            member_of: String::new(),
        })
}

fn arb_records() -> impl Strategy<Value = Vec<CanonicalRecord>> {
    prop::collection::vec(arb_record(), 1..60)
}

fn outlier_group_keys(
    records: &[CanonicalRecord],
    threshold: f64,
) -> BTreeSet<(String, String, String)> {
    let aggregates = aggregate(records);
    aggregates
        .iter()
        .filter(|a| a.percentage < threshold)
        .map(|a| {
            (
                a.department.clone(),
                a.job_title.clone(),
                a.responsibility_name.clone(),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Laws
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// Percentages of each (department, job title) bucket sum to 1.
    #[test]
    fn percentage_partition_law(records in arb_records()) {
        let aggregates = aggregate(&records);
        let buckets: BTreeSet<(String, String)> = aggregates
            .iter()
            .map(|a| (a.department.clone(), a.job_title.clone()))
            .collect();
        for (dept, title) in buckets {
            let sum: f64 = aggregates
                .iter()
                .filter(|a| a.department == dept && a.job_title == title)
                .map(|a| a.percentage)
                .sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "bucket ({dept}, {title}) sums to {sum}");
        }
    }

    /// Raising the threshold never removes a group from the outlier set.
    #[test]
    fn threshold_monotonicity(records in arb_records(), t1 in 0.0..=1.0f64, t2 in 0.0..=1.0f64) {
        let (low, high) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        let at_low = outlier_group_keys(&records, low);
        let at_high = outlier_group_keys(&records, high);
        prop_assert!(at_low.is_subset(&at_high));
    }

    /// Every aggregate lands in exactly one of the two outputs.
    #[test]
    fn outlier_partition(records in arb_records(), threshold in 0.0..=1.0f64) {
        let aggregates = aggregate(&records);
        let (outlier_users, non_outliers) = classify(&aggregates, &records, threshold);

        let outlier_keys: BTreeSet<(String, String, String)> = outlier_users
            .iter()
            .map(|o| (o.department.clone(), o.job_title.clone(), o.responsibility_name.clone()))
            .collect();
        let non_outlier_keys: BTreeSet<(String, String, String)> = non_outliers
            .iter()
            .map(|n| (n.department.clone(), n.job_title.clone(), n.responsibility_name.clone()))
            .collect();
        let all_keys: BTreeSet<(String, String, String)> = aggregates
            .iter()
            .map(|a| (a.department.clone(), a.job_title.clone(), a.responsibility_name.clone()))
            .collect();

        prop_assert!(outlier_keys.is_disjoint(&non_outlier_keys));
        let union: BTreeSet<_> = outlier_keys.union(&non_outlier_keys).cloned().collect();
        prop_assert_eq!(union, all_keys);

        // One summary row per non-outlier group, one user row per member
        prop_assert_eq!(non_outliers.len(), non_outlier_keys.len());
        let expected_users: usize = aggregates
            .iter()
            .filter(|a| a.percentage < threshold)
            .map(|a| a.count)
            .sum();
        prop_assert_eq!(outlier_users.len(), expected_users);
    }

    /// A canonical record exists iff the uppercased role user matches a
    /// directory key (default-rule accounts, unique keys).
    #[test]
    fn join_correctness(
        role_users in prop::collection::vec("[a-z]{1,5}", 0..20),
        dir_users in prop::collection::hash_set("[a-z]{1,5}", 0..20),
    ) {
        let roles: Vec<RoleRecord> = role_users
            .iter()
            .map(|u| RoleRecord {
                department: "D".into(),
                user_name: u.clone(),
                responsibility_name: "R".into(),
                job_title: "T".into(),
            })
            .collect();
        let directory: Vec<DirectoryRecord> = dir_users
            .iter()
            .map(|u| DirectoryRecord {
                sam_account_name: u.clone(),
                display_name: String::new(),
                office: "EPG Mankato".into(),
                member_of: String::new(),
            })
            .collect();

        let mut diagnostics = Vec::new();
        let out = merge(&roles, &directory, &AuditConfig::default(), &mut diagnostics);

        let dir_keys: HashSet<String> = dir_users.iter().map(|u| u.to_uppercase()).collect();
        let expected: Vec<&RoleRecord> = roles
            .iter()
            .filter(|r| dir_keys.contains(&r.user_name.to_uppercase()))
            .collect();

        prop_assert_eq!(out.records.len(), expected.len());
        for (record, role) in out.records.iter().zip(expected) {
            prop_assert_eq!(&record.user_name, &role.user_name.to_uppercase());
        }
        prop_assert_eq!(out.role_rows_dropped, roles.len() - out.records.len());
    }
}
