//! Uids whose on-disk state may lag the in-memory tree.

use std::collections::HashSet;

use arbor_domain::Uid;

/// Items touched by a mutation whose persistence has not been confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSet {
    uids: HashSet<Uid>,
}

impl PendingSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks uids as pending.
    pub fn mark(&mut self, uids: &[Uid]) {
        self.uids.extend(uids.iter().cloned());
    }

    /// Clears the given uids.
    pub fn clear(&mut self, uids: &[Uid]) {
        for uid in uids {
            self.uids.remove(uid);
        }
    }

    /// Clears everything.
    pub fn clear_all(&mut self) {
        self.uids.clear();
    }

    /// Returns true if the uid is pending.
    #[must_use]
    pub fn contains(&self, uid: &str) -> bool {
        self.uids.contains(uid)
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    /// Number of pending uids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_clear() {
        let mut pending = PendingSet::new();
        pending.mark(&["a".to_string(), "b".to_string(), "a".to_string()]);
        assert_eq!(pending.len(), 2);
        assert!(pending.contains("a"));

        pending.clear(&["a".to_string()]);
        assert!(!pending.contains("a"));
        assert!(pending.contains("b"));

        pending.clear_all();
        assert!(pending.is_empty());
    }
}
