//! Trigger identifiers

use std::fmt;

/// Highest trigger id a module may subscribe to
pub const MAX_TRIGGER_ID: u8 = 30;

/// Number of distinct trigger ids (0..=MAX_TRIGGER_ID)
pub const TRIGGER_COUNT: usize = MAX_TRIGGER_ID as usize + 1;

/// A validated trigger id in 0..=30
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(u8);

impl TriggerId {
    /// Validate a raw id, rejecting negative and out-of-range values
    pub fn new(raw: i64) -> Option<Self> {
        if (0..=i64::from(MAX_TRIGGER_ID)).contains(&raw) {
            Some(Self(raw as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Every valid trigger id in ascending order
    pub fn all() -> impl Iterator<Item = TriggerId> {
        (0..=MAX_TRIGGER_ID).map(TriggerId)
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_id_bounds() {
        assert_eq!(TriggerId::new(0).map(TriggerId::get), Some(0));
        assert_eq!(TriggerId::new(30).map(TriggerId::get), Some(30));
        assert!(TriggerId::new(31).is_none());
        assert!(TriggerId::new(-1).is_none());
        assert!(TriggerId::new(i64::MAX).is_none());
    }

    #[test]
    fn test_all_covers_range() {
        let ids: Vec<_> = TriggerId::all().collect();
        assert_eq!(ids.len(), TRIGGER_COUNT);
        assert_eq!(ids.first().map(|id| id.get()), Some(0));
        assert_eq!(ids.last().map(|id| id.get()), Some(MAX_TRIGGER_ID));
    }
}
