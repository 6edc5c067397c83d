use std::collections::BTreeMap;

use crate::model::{CanonicalRecord, GroupAggregate, GroupKey};

/// Group records by (department, job title, responsibility), count
/// them, and compute each group's share of its (department, job title)
/// bucket. BTreeMap keys keep the output sorted and deterministic.
pub fn aggregate(records: &[CanonicalRecord]) -> Vec<GroupAggregate> {
    let mut counts: BTreeMap<GroupKey, usize> = BTreeMap::new();
    for record in records {
        let key = GroupKey {
            department: record.department.clone(),
            job_title: record.job_title.clone(),
            responsibility_name: record.responsibility_name.clone(),
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut bucket_totals: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for (key, count) in &counts {
        *bucket_totals
            .entry((key.department.as_str(), key.job_title.as_str()))
            .or_insert(0) += count;
    }

    let mut aggregates = Vec::with_capacity(counts.len());
    for (key, count) in &counts {
        // Every group has at least one record, so the total is nonzero.
        let group_total = bucket_totals[&(key.department.as_str(), key.job_title.as_str())];
        aggregates.push(GroupAggregate {
            department: key.department.clone(),
            job_title: key.job_title.clone(),
            responsibility_name: key.responsibility_name.clone(),
            count: *count,
            group_total,
            percentage: *count as f64 / group_total as f64,
        });
    }
    aggregates
}
