//! Per-role dashboard composition.
//!
//! Each role has a pure `build_*` function over an already loaded slice and
//! an async loader that reads that slice from a [`PlacementRepository`]
//! (batching the enrichment lookups) and then calls the builder. Nothing is
//! cached between calls.
//!
//! [`PlacementRepository`]: crate::repository::PlacementRepository

mod admin;
mod coordinator;
mod student;
mod supervisor;

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub use admin::{admin_dashboard, build_admin_dashboard};
pub use coordinator::{build_coordinator_analytics, coordinator_analytics};
pub use student::{
    build_student_evaluations, build_student_overview, student_evaluations, student_overview,
};
pub use supervisor::{
    build_supervisor_analytics, build_supervisor_overview, supervisor_analytics,
    supervisor_overview,
};

pub const TOP_COMPANIES: usize = 10;
pub const TOP_INTERNS: usize = 5;

/// `numerator / denominator` as a whole percent, halves rounded up. Zero when
/// the denominator is zero.
pub fn percent(numerator: usize, denominator: usize) -> u32 {
    if denominator == 0 {
        return 0;
    }
    ((numerator * 200 + denominator) / (denominator * 2)) as u32
}

pub(crate) fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Groups values by key, keeping groups in the order their key first
/// appeared so later stable ranking stays deterministic.
pub(crate) fn group_in_order<K, V, I>(pairs: I) -> Vec<(K, Vec<V>)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (K, V)>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<V>)> = Vec::new();

    for (key, value) in pairs {
        match index.get(&key) {
            Some(&position) => groups[position].1.push(value),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![value]));
            }
        }
    }

    groups
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_and_guards_zero() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 1), 100);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
    }

    #[test]
    fn groups_preserve_first_seen_order() {
        let groups = group_in_order(vec![("b", 1), ("a", 2), ("b", 3)]);
        assert_eq!(groups, vec![("b", vec![1, 3]), ("a", vec![2])]);
    }
}
