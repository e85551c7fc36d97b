use crate::favorites::Favorites;
use crate::hierarchy::HierarchyDoc;
use crate::recents::RecentEntry;
use anyhow::Context as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const HIERARCHY_FILE: &str = "hierarchy.json";
pub const FAVORITES_FILE: &str = "favorites.json";
pub const RECENTS_FILE: &str = "recents.json";

/// Durable home of the launcher state.
///
/// Loads may fail; callers treat a failed load as empty state.
pub trait PersistentStore {
    fn load_hierarchy(&self) -> anyhow::Result<HierarchyDoc>;
    fn save_hierarchy(&self, doc: &HierarchyDoc) -> anyhow::Result<()>;
    fn load_favorites(&self) -> anyhow::Result<Favorites>;
    fn save_favorites(&self, favorites: &Favorites) -> anyhow::Result<()>;
    fn load_recents(&self) -> anyhow::Result<Vec<RecentEntry>>;
    fn save_recents(&self, recents: &[RecentEntry]) -> anyhow::Result<()>;
}

/// Pretty-printed JSON files in a single directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load<T: DeserializeOwned + Default>(&self, file: &str) -> anyhow::Result<T> {
        let path = self.dir.join(file);
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    fn save<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.dir.join(file);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

impl PersistentStore for JsonStore {
    fn load_hierarchy(&self) -> anyhow::Result<HierarchyDoc> {
        self.load(HIERARCHY_FILE)
    }

    fn save_hierarchy(&self, doc: &HierarchyDoc) -> anyhow::Result<()> {
        self.save(HIERARCHY_FILE, doc)
    }

    fn load_favorites(&self) -> anyhow::Result<Favorites> {
        self.load(FAVORITES_FILE)
    }

    fn save_favorites(&self, favorites: &Favorites) -> anyhow::Result<()> {
        self.save(FAVORITES_FILE, favorites)
    }

    fn load_recents(&self) -> anyhow::Result<Vec<RecentEntry>> {
        self.load(RECENTS_FILE)
    }

    fn save_recents(&self, recents: &[RecentEntry]) -> anyhow::Result<()> {
        self.save(RECENTS_FILE, recents)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    hierarchy: HierarchyDoc,
    favorites: Favorites,
    recents: Vec<RecentEntry>,
    failing: FailingParts,
    saves: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct FailingParts {
    hierarchy: bool,
    favorites: bool,
    recents: bool,
}

#[derive(Debug, Clone, Copy)]
enum Part {
    Hierarchy,
    Favorites,
    Recents,
}

/// In-memory store; clones share the same state.
///
/// Saves can be made to fail to exercise rollback.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(hierarchy: HierarchyDoc, favorites: Favorites, recents: Vec<RecentEntry>) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.lock() {
            state.hierarchy = hierarchy;
            state.favorites = favorites;
            state.recents = recents;
        }
        store
    }

    /// Make every save fail, or succeed again.
    pub fn set_fail_saves(&self, fail: bool) {
        self.set_failing(FailingParts {
            hierarchy: fail,
            favorites: fail,
            recents: fail,
        });
    }

    /// Make only favorites saves fail.
    pub fn set_fail_favorites(&self, fail: bool) {
        self.set_failing(FailingParts {
            favorites: fail,
            ..FailingParts::default()
        });
    }

    /// Make only recents saves fail.
    pub fn set_fail_recents(&self, fail: bool) {
        self.set_failing(FailingParts {
            recents: fail,
            ..FailingParts::default()
        });
    }

    fn set_failing(&self, failing: FailingParts) {
        if let Ok(mut state) = self.state.lock() {
            state.failing = failing;
        }
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        self.state.lock().map(|s| s.saves).unwrap_or_default()
    }

    pub fn hierarchy(&self) -> HierarchyDoc {
        self.state
            .lock()
            .map(|s| s.hierarchy.clone())
            .unwrap_or_default()
    }

    pub fn favorites(&self) -> Favorites {
        self.state
            .lock()
            .map(|s| s.favorites.clone())
            .unwrap_or_default()
    }

    pub fn recents(&self) -> Vec<RecentEntry> {
        self.state
            .lock()
            .map(|s| s.recents.clone())
            .unwrap_or_default()
    }

    fn write(&self, part: Part, apply: impl FnOnce(&mut MemoryState)) -> anyhow::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        let failing = match part {
            Part::Hierarchy => state.failing.hierarchy,
            Part::Favorites => state.failing.favorites,
            Part::Recents => state.failing.recents,
        };
        if failing {
            anyhow::bail!("simulated {part:?} save failure");
        }
        apply(&mut state);
        state.saves += 1;
        Ok(())
    }

    fn read<T>(&self, get: impl FnOnce(&MemoryState) -> T) -> anyhow::Result<T> {
        let state = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(get(&state))
    }
}

impl PersistentStore for MemoryStore {
    fn load_hierarchy(&self) -> anyhow::Result<HierarchyDoc> {
        self.read(|s| s.hierarchy.clone())
    }

    fn save_hierarchy(&self, doc: &HierarchyDoc) -> anyhow::Result<()> {
        self.write(Part::Hierarchy, |s| s.hierarchy = doc.clone())
    }

    fn load_favorites(&self) -> anyhow::Result<Favorites> {
        self.read(|s| s.favorites.clone())
    }

    fn save_favorites(&self, favorites: &Favorites) -> anyhow::Result<()> {
        self.write(Part::Favorites, |s| s.favorites = favorites.clone())
    }

    fn load_recents(&self) -> anyhow::Result<Vec<RecentEntry>> {
        self.read(|s| s.recents.clone())
    }

    fn save_recents(&self, recents: &[RecentEntry]) -> anyhow::Result<()> {
        self.write(Part::Recents, |s| s.recents = recents.to_vec())
    }
}
