// Per-(office, job title) tallies that feed the breakdown sheets.

use std::collections::BTreeMap;

use roleaudit_analysis::model::CanonicalRecord;

/// One label/count pair for a pie chart data range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRow {
    pub name: String,
    pub count: usize,
}

/// Group canonical records by (office, job title), in stable order.
pub fn office_title_groups(
    records: &[CanonicalRecord],
) -> BTreeMap<(String, String), Vec<&CanonicalRecord>> {
    let mut groups: BTreeMap<(String, String), Vec<&CanonicalRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.office.clone(), record.job_title.clone()))
            .or_default()
            .push(record);
    }
    groups
}

/// Tally responsibilities held within one group.
pub fn responsibility_counts(records: &[&CanonicalRecord]) -> Vec<CountRow> {
    tally(records.iter().map(|r| r.responsibility_name.as_str()))
}

/// Tally directory group memberships within one group. `member_of` is a
/// semicolon-separated list; each entry counts once per record.
pub fn member_of_counts(records: &[&CanonicalRecord]) -> Vec<CountRow> {
    tally(
        records
            .iter()
            .flat_map(|r| r.member_of.split(';'))
            .map(str::trim)
            .filter(|g| !g.is_empty()),
    )
}

/// Count occurrences, sorted by count descending then name ascending so
/// chart slices come out largest-first and reruns are identical.
fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CountRow> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut rows: Vec<CountRow> = counts
        .into_iter()
        .map(|(name, count)| CountRow {
            name: name.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    rows
}
