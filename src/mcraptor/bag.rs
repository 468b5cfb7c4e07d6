use crate::config::CriteriaSet;

use super::label::Label;

/// Inserts `candidate` into `bag`, removing any label it dominates. Returns
/// `false` (no-op) if an existing label already dominates `candidate`, or
/// if it ties with one and `keep_equal` is off. This is `pareto_merge` of
/// §4.4 specialized to inserting one label at a time.
pub fn insert(bag: &mut Vec<Label>, candidate: Label, criteria: CriteriaSet, keep_equal: bool) -> bool {
    for existing in bag.iter() {
        if existing.dominates(&candidate, criteria) {
            return false;
        }
        if !keep_equal && existing.ties_with(&candidate, criteria) {
            return false;
        }
    }
    bag.retain(|existing| !candidate.dominates(existing, criteria));
    bag.push(candidate);
    true
}

/// Merges every label of `incoming` into `bag`, in place. Returns `true` if
/// the bag changed as a result of any insertion.
pub fn merge(bag: &mut Vec<Label>, incoming: &[Label], criteria: CriteriaSet, keep_equal: bool) -> bool {
    let mut changed = false;
    for label in incoming {
        if insert(bag, label.clone(), criteria, keep_equal) {
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::Boarding;
    use crate::shared::time::Time;

    fn label(arrival: i32, fare: i32, n_trips: u32) -> Label {
        Label {
            arrival: Time::from_seconds(arrival),
            fare,
            n_trips,
            boarding: Boarding::Origin,
            from_stop: 0,
            departure: Time::from_seconds(arrival),
            predecessor: None,
        }
    }

    #[test]
    fn dominated_candidate_is_rejected() {
        let mut bag = vec![label(100, 0, 1)];
        let changed = insert(&mut bag, label(200, 5, 2), CriteriaSet::all(), false);
        assert!(!changed);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn dominating_candidate_evicts_existing() {
        let mut bag = vec![label(200, 5, 2)];
        let changed = insert(&mut bag, label(100, 0, 1), CriteriaSet::all(), false);
        assert!(changed);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag[0].arrival, Time::from_seconds(100));
    }

    #[test]
    fn incomparable_labels_coexist() {
        let mut bag = vec![label(100, 10, 2)];
        let changed = insert(&mut bag, label(110, 0, 1), CriteriaSet::all(), false);
        assert!(changed);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn ties_are_dropped_unless_keep_equal() {
        let mut bag = vec![label(100, 0, 1)];
        assert!(!insert(&mut bag, label(100, 0, 1), CriteriaSet::all(), false));
        assert!(insert(&mut bag, label(100, 0, 1), CriteriaSet::all(), true));
        assert_eq!(bag.len(), 2);
    }
}
