use rankbook_core::Record;
use std::collections::BTreeMap;

/// Group receiving records that carry no group at all.
pub const UNCLASSIFIED_GROUP: &str = "unclassified";

/// Split a batch by destination group.
///
/// A record with N groups lands, unchanged, in N subsets; a record with none
/// lands in [`UNCLASSIFIED_GROUP`]. Batch order is kept within each subset.
#[must_use]
pub fn fan_out(records: &[Record]) -> BTreeMap<String, Vec<Record>> {
    let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
    for record in records {
        if record.groups.is_empty() {
            groups
                .entry(UNCLASSIFIED_GROUP.to_string())
                .or_default()
                .push(record.clone());
            continue;
        }
        for group in &record.groups {
            groups.entry(group.clone()).or_default().push(record.clone());
        }
    }
    groups
}
