//! Set difference between the records a hostname has and the addresses a
//! client asked for.
use std::collections::{BTreeSet, HashSet};

use crate::db::record_repo::RecordRow;
use crate::validation::{RecordType, canonical_content};

/// Mutations needed to converge one record set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    /// Row ids whose address is no longer wanted (or duplicates a kept row).
    pub delete: Vec<i64>,
    /// Addresses that have no row yet, ascending.
    pub insert: Vec<String>,
}

impl SyncPlan {
    pub fn is_noop(&self) -> bool {
        self.delete.is_empty() && self.insert.is_empty()
    }
}

/// Plan the sync of `current` towards `desired`.
///
/// Contents are compared in canonical address form. Of several rows holding
/// the same wanted address only the first survives.
pub fn plan_sync(family: RecordType, current: &[RecordRow], desired: &[String]) -> SyncPlan {
    let wanted: BTreeSet<String> = desired
        .iter()
        .map(|addr| canonical_content(addr, family))
        .collect();

    let mut kept = HashSet::new();
    let mut plan = SyncPlan::default();
    for row in current {
        let content = canonical_content(&row.content, family);
        if wanted.contains(&content) && kept.insert(content) {
            continue;
        }
        plan.delete.push(row.id);
    }

    plan.insert = wanted
        .into_iter()
        .filter(|addr| !kept.contains(addr))
        .collect();
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, content: &str) -> RecordRow {
        RecordRow {
            id,
            content: content.to_string(),
        }
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn equal_sets_need_nothing() {
        let current = [row(1, "192.168.1.1"), row(2, "10.0.0.1")];
        let plan = plan_sync(RecordType::A, &current, &list(&["10.0.0.1", "192.168.1.1"]));
        assert!(plan.is_noop());
    }

    #[test]
    fn diff_keeps_common_rows() {
        let current = [row(1, "192.168.1.1"), row(2, "192.168.1.2")];
        let plan = plan_sync(RecordType::A, &current, &list(&["192.168.1.1", "192.168.1.3"]));
        assert_eq!(plan.delete, vec![2]);
        assert_eq!(plan.insert, list(&["192.168.1.3"]));
    }

    #[test]
    fn empty_desired_clears_everything() {
        let current = [row(7, "2001:db8::1"), row(8, "2001:db8::2")];
        let plan = plan_sync(RecordType::Aaaa, &current, &[]);
        assert_eq!(plan.delete, vec![7, 8]);
        assert!(plan.insert.is_empty());
    }

    #[test]
    fn disjoint_sets_swap_completely() {
        let current = [row(1, "10.0.0.1"), row(2, "10.0.0.2")];
        let plan = plan_sync(RecordType::A, &current, &list(&["10.0.0.3", "10.0.0.4"]));
        assert_eq!(plan.delete, vec![1, 2]);
        assert_eq!(plan.insert, list(&["10.0.0.3", "10.0.0.4"]));
    }

    #[test]
    fn stored_content_is_compared_canonically() {
        let current = [row(1, "2001:0db8:0000::0001")];
        let plan = plan_sync(RecordType::Aaaa, &current, &list(&["2001:db8::1"]));
        assert!(plan.is_noop());
    }

    #[test]
    fn duplicate_rows_are_collapsed() {
        let current = [row(1, "10.0.0.1"), row(2, "10.0.0.1"), row(3, "junk")];
        let plan = plan_sync(RecordType::A, &current, &list(&["10.0.0.1"]));
        assert_eq!(plan.delete, vec![2, 3]);
        assert!(plan.insert.is_empty());
    }
}
