//! Ordered, coordinate-unique collection of completions.

use serde::{Deserialize, Serialize};

use crate::completion::Completion;
use crate::error::{Result, ScheduleError};

/// Completions of one well, unique by cell.
///
/// Adding a completion for a cell that is already present replaces it in
/// place, so a connection keeps its position however often it is
/// re-specified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Completion>", into = "Vec<Completion>")]
pub struct CompletionSet {
    completions: Vec<Completion>,
}

impl CompletionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completions.
    pub fn len(&self) -> usize {
        self.completions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.completions.is_empty()
    }

    /// Insert a completion, replacing any completion in the same cell.
    pub fn add(&mut self, completion: Completion) {
        match self
            .completions
            .iter_mut()
            .find(|existing| existing.same_coordinate(&completion))
        {
            Some(slot) => *slot = completion,
            None => self.completions.push(completion),
        }
    }

    /// Completion at an ordinal position.
    pub fn get(&self, index: usize) -> Result<&Completion> {
        self.completions.get(index).ok_or(ScheduleError::Range {
            what: "CompletionSet",
            index,
            size: self.completions.len(),
        })
    }

    /// Completion in cell `(i, j, k)`, if any.
    pub fn find(&self, i: i32, j: i32, k: i32) -> Option<&Completion> {
        self.completions
            .iter()
            .find(|completion| completion.coordinate() == (i, j, k))
    }

    /// Iterate in current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Completion> {
        self.completions.iter()
    }
}

impl<'a> IntoIterator for &'a CompletionSet {
    type Item = &'a Completion;
    type IntoIter = std::slice::Iter<'a, Completion>;

    fn into_iter(self) -> Self::IntoIter {
        self.completions.iter()
    }
}

impl Extend<Completion> for CompletionSet {
    fn extend<I: IntoIterator<Item = Completion>>(&mut self, iter: I) {
        for completion in iter {
            self.add(completion);
        }
    }
}

impl FromIterator<Completion> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = Completion>>(iter: I) -> Self {
        let mut set = CompletionSet::new();
        set.extend(iter);
        set
    }
}

impl From<Vec<Completion>> for CompletionSet {
    fn from(completions: Vec<Completion>) -> Self {
        completions.into_iter().collect()
    }
}

impl From<CompletionSet> for Vec<Completion> {
    fn from(set: CompletionSet) -> Self {
        set.completions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompletionState;

    fn completion(i: i32, j: i32, k: i32, state: CompletionState) -> Completion {
        Completion::at(i, j, k)
            .state(state)
            .transmissibility_factor(99.88)
            .diameter(22.33)
            .skin_factor(33.22)
            .sat_table_id(0)
            .build()
    }

    #[test]
    fn test_create_empty() {
        let set = CompletionSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_add_completion_size_correct() {
        let mut set = CompletionSet::new();
        let completion1 = completion(10, 10, 10, CompletionState::Open);
        let completion2 = completion(11, 10, 10, CompletionState::Open);

        set.add(completion1.clone());
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap(), &completion1);

        set.add(completion2);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut set = CompletionSet::new();
        assert!(matches!(set.get(0), Err(ScheduleError::Range { index: 0, size: 0, .. })));

        set.add(completion(10, 10, 10, CompletionState::Open));
        set.add(completion(11, 10, 10, CompletionState::Open));

        assert!(matches!(set.get(10), Err(ScheduleError::Range { index: 10, size: 2, .. })));
        assert!(set.get(2).is_err());
        assert!(set.get(1).is_ok());
    }

    #[test]
    fn test_add_same_cell_updates_in_place() {
        let mut set = CompletionSet::new();
        let first = completion(10, 10, 10, CompletionState::Open);
        let other = completion(10, 10, 11, CompletionState::Open);
        let replacement = completion(10, 10, 10, CompletionState::Shut);

        set.add(first);
        set.add(other.clone());
        set.add(replacement.clone());

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap(), &replacement);
        assert_eq!(set.get(1).unwrap(), &other);
    }

    #[test]
    fn test_first_seen_order_is_kept() {
        let set: CompletionSet = [(3, 0, 0), (1, 0, 0), (2, 0, 0), (1, 0, 0)]
            .into_iter()
            .map(|(i, j, k)| completion(i, j, k, CompletionState::Open))
            .collect();

        let order: Vec<i32> = set.iter().map(Completion::i).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(set.find(2, 0, 0).unwrap().i(), 2);
        assert!(set.find(4, 0, 0).is_none());
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut set = CompletionSet::new();
        set.add(completion(1, 1, 1, CompletionState::Open));
        set.add(completion(2, 1, 1, CompletionState::Auto));

        assert_eq!(set.iter().count(), 2);
        assert_eq!((&set).into_iter().count(), 2);
        let mut seen = Vec::new();
        for completion in &set {
            seen.push(completion.state());
        }
        assert_eq!(seen, vec![CompletionState::Open, CompletionState::Auto]);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut set = CompletionSet::new();
        let completion1 = completion(10, 10, 10, CompletionState::Open);
        let completion2 = completion(10, 10, 11, CompletionState::Shut);
        let completion3 = completion(10, 10, 12, CompletionState::Shut);

        set.add(completion1.clone());
        set.add(completion2.clone());
        set.add(completion3.clone());
        assert_eq!(set.len(), 3);

        let mut copy = set.clone();
        assert_eq!(copy.len(), 3);
        assert_eq!(copy.get(0).unwrap(), &completion1);
        assert_eq!(copy.get(1).unwrap(), &completion2);
        assert_eq!(copy.get(2).unwrap(), &completion3);
        assert!(!std::ptr::eq(copy.get(0).unwrap(), set.get(0).unwrap()));

        copy.add(completion(10, 10, 10, CompletionState::Shut));
        copy.add(completion(9, 9, 9, CompletionState::Open));
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(0).unwrap().state(), CompletionState::Open);
    }

    #[test]
    fn test_deserialize_merges_repeated_cells() {
        let open = completion(1, 1, 1, CompletionState::Open);
        let shut = completion(1, 1, 1, CompletionState::Shut);
        let other = completion(2, 1, 1, CompletionState::Open);
        let json = serde_json::to_string(&vec![open, other.clone(), shut.clone()]).unwrap();

        let set: CompletionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap(), &shut);
        assert_eq!(set.get(1).unwrap(), &other);

        let round_trip: CompletionSet =
            serde_json::from_str(&serde_json::to_string(&set).unwrap()).unwrap();
        assert_eq!(round_trip, set);
    }
}
