use std::collections::HashMap;

use crate::model::{Group, Record};

/// The key a record is filed under: its collector exactly as given, or
/// `unassigned` when that is absent or empty. Keys are compared verbatim, so
/// `"North "` and `"North"` are different collectors.
pub fn group_key<'a>(record: &'a Record, unassigned: &'a str) -> &'a str {
    record
        .collector
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(unassigned)
}

/// Partition `records` by collector. Groups appear in the order their key is
/// first seen; members keep input order.
pub fn group_records<'a>(records: &'a [Record], unassigned: &str) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for record in records {
        let key = group_key(record, unassigned);
        match index.get(key) {
            Some(&gi) => groups[gi].members.push(record),
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(Group {
                    name: key.to_string(),
                    members: vec![record],
                });
            }
        }
    }
    log::debug!("grouped {} records into {} groups", records.len(), groups.len());
    groups
}
