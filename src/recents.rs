use crate::hierarchy::LeafKind;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::path::PathBuf;

pub const RECENTS_CAPACITY: usize = 20;

/// Special query listing the recents instead of matching names.
pub const RECENT_QUERY: &str = "@recent";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RecentEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub name: String,
    pub kind: LeafKind,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

/// Most-recent-first list of opened leaves, bounded by [`RECENTS_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recents {
    entries: VecDeque<RecentEntry>,
}

impl Recents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, restoring ordering, uniqueness and the bound.
    pub fn from_entries(mut list: Vec<RecentEntry>) -> Self {
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let mut recents = Self::new();
        for entry in list {
            if recents.contains(&entry.path) || recents.entries.len() == RECENTS_CAPACITY {
                continue;
            }
            recents.entries.push_back(entry);
        }
        recents.restamp();
        recents
    }

    /// Put `entry` at the front, replacing any older entry for the same path.
    ///
    /// Timestamps stay strictly descending: an entry not newer than the current
    /// head is stamped one millisecond after it, and older entries are pushed
    /// down when the clock range is exhausted.
    pub fn push(&mut self, mut entry: RecentEntry) {
        if let Some(pos) = self.entries.iter().position(|e| e.path == entry.path) {
            self.entries.remove(pos);
        }
        if let Some(head) = self.entries.front() {
            if entry.timestamp <= head.timestamp {
                entry.timestamp = head.timestamp.saturating_add(1);
            }
        }
        self.entries.push_front(entry);
        self.restamp();
        while self.entries.len() > RECENTS_CAPACITY {
            self.entries.pop_back();
        }
    }

    /// Force strictly descending timestamps below the head.
    ///
    /// An entry that cannot be placed below its predecessor is dropped.
    fn restamp(&mut self) {
        let mut ceiling: Option<i64> = None;
        self.entries.retain_mut(|e| {
            let timestamp = match ceiling {
                Some(c) if e.timestamp >= c => match c.checked_sub(1) {
                    Some(ts) => ts,
                    None => return false,
                },
                _ => e.timestamp,
            };
            e.timestamp = timestamp;
            ceiling = Some(timestamp);
            true
        });
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecentEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&RecentEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<RecentEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// True when `query` is the recents pseudo-query.
pub fn is_recent_query(query: &str) -> bool {
    query.trim().eq_ignore_ascii_case(RECENT_QUERY)
}
