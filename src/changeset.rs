//! Turns record sets read from one zone into a change batch for another.
use tracing::debug;

use crate::route53::types::{Change, ChangeAction, ResourceRecordSet};
use crate::validation::normalize;

/// Apex NS and SOA belong to whichever zone hosts them and are never copied
/// or deleted.
pub fn is_apex_infrastructure(apex: &str, record: &ResourceRecordSet) -> bool {
    (record.is_type("NS") || record.is_type("SOA")) && record.name == apex
}

/// Build one change per record set, in input order, skipping apex NS/SOA.
/// Routing fields are carried over untouched.
pub fn build_change_set(
    domain: &str,
    records: &[ResourceRecordSet],
    action: ChangeAction,
) -> Vec<Change> {
    let apex = normalize(domain);
    records
        .iter()
        .filter(|r| !is_apex_infrastructure(&apex, r))
        .map(|r| Change {
            action,
            record_set: r.clone(),
        })
        .collect()
}

/// The record sets a change batch touches.
pub fn records_of(changes: &[Change]) -> Vec<ResourceRecordSet> {
    changes.iter().map(|c| c.record_set.clone()).collect()
}

/// One line per record set: `name type ttl values [routing]`.
pub fn render_records(records: &[ResourceRecordSet]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            let ttl = r.ttl.map(|t| t.to_string()).unwrap_or_else(|| "-".into());
            let mut line = format!("{} {} {} {}", r.name, r.rrtype, ttl, r.values.join(","));
            if !r.routing.is_empty() {
                match serde_json::to_string(&r.routing) {
                    Ok(routing) => {
                        line.push(' ');
                        line.push_str(&routing);
                    }
                    Err(err) => debug!(name = %r.name, "failed to render routing fields: {err}"),
                }
            }
            line
        })
        .collect()
}
