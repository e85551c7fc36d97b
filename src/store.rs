//! Owner of the hierarchy, favorites and recents.
//!
//! Every mutation is applied to memory and then written through the
//! [`PersistentStore`]. A failed write restores the previous state, so memory
//! never runs ahead of what is on disk.

use crate::error::{LauncherError, Result};
use crate::favorites::{FavoriteKey, Favorites};
use crate::hierarchy::{
    CascadePolicy, CategoryPath, Children, Hierarchy, HierarchyDoc, Leaf, LeafKind, NewLeaf,
    Removal, RemovalImpact,
};
use crate::recents::{RecentEntry, Recents};
use crate::storage::PersistentStore;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
struct State {
    hierarchy: Hierarchy,
    favorites: Favorites,
    recents: Recents,
}

/// Which persisted parts a mutation touched.
#[derive(Debug, Clone, Copy, Default)]
struct Parts {
    hierarchy: bool,
    favorites: bool,
    recents: bool,
}

impl Parts {
    const HIERARCHY: Parts = Parts { hierarchy: true, favorites: false, recents: false };
    const FAVORITES: Parts = Parts { hierarchy: false, favorites: true, recents: false };
    const STRUCTURE: Parts = Parts { hierarchy: true, favorites: true, recents: false };
    const OPENED: Parts = Parts { hierarchy: true, favorites: false, recents: true };
}

pub struct HierarchyStore {
    state: State,
    backend: Box<dyn PersistentStore>,
}

impl HierarchyStore {
    /// Load everything from `backend`. Unreadable parts start empty.
    pub fn open(backend: Box<dyn PersistentStore>) -> Self {
        let doc = backend.load_hierarchy().unwrap_or_else(|e| {
            tracing::warn!("failed to load hierarchy: {e:#}");
            HierarchyDoc::default()
        });
        let hierarchy = Hierarchy::from_doc(doc);
        let mut favorites = backend.load_favorites().unwrap_or_else(|e| {
            tracing::warn!("failed to load favorites: {e:#}");
            Favorites::default()
        });
        let stale = favorites.prune(&hierarchy);
        if stale > 0 {
            tracing::warn!("ignoring {stale} favorites of missing entries");
        }
        let recents = Recents::from_entries(backend.load_recents().unwrap_or_else(|e| {
            tracing::warn!("failed to load recents: {e:#}");
            Vec::new()
        }));
        tracing::info!(
            categories = hierarchy.category_count(),
            leaves = hierarchy.leaf_count(),
            recents = recents.len(),
            "hierarchy store opened"
        );
        Self {
            state: State { hierarchy, favorites, recents },
            backend,
        }
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.state.hierarchy
    }

    pub fn favorites(&self) -> &Favorites {
        &self.state.favorites
    }

    pub fn recents(&self) -> &Recents {
        &self.state.recents
    }

    pub fn list_children(&self, path: &CategoryPath) -> Option<Children<'_>> {
        self.state.hierarchy.list_children(path)
    }

    pub fn removal_impact(&self, path: &CategoryPath) -> Result<RemovalImpact> {
        self.state.hierarchy.removal_impact(path)
    }

    pub fn add_category(
        &mut self,
        parent: &CategoryPath,
        name: &str,
        icon: &str,
        description: &str,
    ) -> Result<CategoryPath> {
        let path = self.transact("add_category", Parts::HIERARCHY, |s| {
            s.hierarchy.insert_category(parent, name, icon, description)
        })?;
        tracing::info!("added category '{path}'");
        Ok(path)
    }

    pub fn update_category(
        &mut self,
        path: &CategoryPath,
        icon: &str,
        description: &str,
    ) -> Result<()> {
        self.transact("update_category", Parts::HIERARCHY, |s| {
            s.hierarchy.update_category(path, icon, description)
        })?;
        tracing::info!("updated category '{path}'");
        Ok(())
    }

    pub fn add_leaf(&mut self, category: &CategoryPath, leaf: NewLeaf) -> Result<PathBuf> {
        let kind = leaf.kind;
        let path = self.transact("add_leaf", Parts::HIERARCHY, |s| {
            s.hierarchy.insert_leaf(category, leaf)
        })?;
        tracing::info!("added {kind} '{}' to '{category}'", path.display());
        Ok(path)
    }

    pub fn remove_leaf(&mut self, path: &Path) -> Result<Leaf> {
        let leaf = self.transact("remove_leaf", Parts::STRUCTURE, |s| {
            let leaf = s.hierarchy.remove_leaf(path)?;
            s.favorites.forget(&[], &[leaf.path.clone()]);
            Ok(leaf)
        })?;
        tracing::info!("removed {} '{}'", leaf.kind, leaf.path.display());
        Ok(leaf)
    }

    pub fn move_leaf(&mut self, path: &Path, to: &CategoryPath) -> Result<()> {
        self.transact("move_leaf", Parts::HIERARCHY, |s| s.hierarchy.move_leaf(path, to))?;
        tracing::info!("moved '{}' to '{to}'", path.display());
        Ok(())
    }

    /// Change the display name of a leaf. Its path, and so its identity, stays.
    pub fn rename_leaf(&mut self, path: &Path, new_name: &str) -> Result<()> {
        self.transact("rename_leaf", Parts::HIERARCHY, |s| {
            s.hierarchy.rename_leaf(path, new_name)
        })?;
        tracing::info!("renamed '{}' to '{new_name}'", path.display());
        Ok(())
    }

    /// Rename a category, moving its descendants and their favorites along.
    ///
    /// Returns the (old, new) pair of every category path that changed.
    pub fn rename_category(
        &mut self,
        path: &CategoryPath,
        new_name: &str,
    ) -> Result<Vec<(CategoryPath, CategoryPath)>> {
        let renames = self.transact("rename_category", Parts::STRUCTURE, |s| {
            let renames = s.hierarchy.rename_category(path, new_name)?;
            s.favorites.rebase(&renames);
            Ok(renames)
        })?;
        tracing::info!("renamed category '{path}' ({} paths moved)", renames.len());
        Ok(renames)
    }

    pub fn remove_category(&mut self, path: &CategoryPath, policy: CascadePolicy) -> Result<Removal> {
        let removal = self.transact("remove_category", Parts::STRUCTURE, |s| {
            let removal = s.hierarchy.remove_category(path, policy)?;
            s.favorites
                .forget(&removal.removed_categories, &removal.removed_leaves);
            s.favorites.rebase(&removal.renamed_categories);
            Ok(removal)
        })?;
        tracing::info!(
            ?policy,
            categories = removal.removed_categories.len(),
            leaves = removal.removed_leaves.len(),
            "removed category '{path}'"
        );
        Ok(removal)
    }

    /// Flip the favorite status of an existing entity and return the new status.
    pub fn toggle_favorite(&mut self, key: FavoriteKey) -> Result<bool> {
        self.ensure_exists(&key)?;
        let status = self.transact("toggle_favorite", Parts::FAVORITES, |s| {
            Ok(s.favorites.toggle(key.clone()))
        })?;
        tracing::debug!(?key, status, "favorite toggled");
        Ok(status)
    }

    /// Note that a leaf was opened: stamp it and move it to the front of the recents.
    pub fn record_open(&mut self, path: &Path) -> Result<RecentEntry> {
        let now = chrono::Utc::now().timestamp_millis();
        let entry = self.transact("record_open", Parts::OPENED, |s| {
            let leaf = s
                .hierarchy
                .leaf(path)
                .ok_or_else(|| LauncherError::not_found(path.display()))?;
            let entry = RecentEntry {
                path: leaf.path.clone(),
                name: leaf.name.clone(),
                kind: leaf.kind,
                timestamp: now,
            };
            s.hierarchy.stamp_opened(path, now);
            s.recents.push(entry);
            s.recents
                .get(0)
                .cloned()
                .ok_or_else(|| LauncherError::not_found(path.display()))
        })?;
        tracing::debug!("recorded open of '{}'", entry.path.display());
        Ok(entry)
    }

    fn ensure_exists(&self, key: &FavoriteKey) -> Result<()> {
        let hierarchy = &self.state.hierarchy;
        let leaf_of_kind = |path: &Path, kind: LeafKind| {
            hierarchy.leaf(path).is_some_and(|leaf| leaf.kind == kind)
        };
        let exists = match key {
            FavoriteKey::Category(path) => !path.is_root() && hierarchy.contains_category(path),
            FavoriteKey::Project(path) => leaf_of_kind(path, LeafKind::Project),
            FavoriteKey::File(path) => leaf_of_kind(path, LeafKind::File),
        };
        if exists {
            Ok(())
        } else {
            Err(match key {
                FavoriteKey::Category(path) => LauncherError::not_found(path),
                FavoriteKey::Project(path) | FavoriteKey::File(path) => {
                    LauncherError::not_found(path.display())
                }
            })
        }
    }

    /// Apply `mutation` and persist `parts`, restoring the prior state on any failure.
    fn transact<T>(
        &mut self,
        op: &str,
        parts: Parts,
        mutation: impl FnOnce(&mut State) -> Result<T>,
    ) -> Result<T> {
        let snapshot = self.state.clone();
        let value = match mutation(&mut self.state) {
            Ok(value) => value,
            Err(e) => {
                self.state = snapshot;
                tracing::debug!("{op} rejected: {e}");
                return Err(e);
            }
        };
        let mut written = Parts::default();
        if let Err(e) = self.persist(parts, &mut written) {
            tracing::error!("{op} could not be saved, rolling back: {e:#}");
            self.state = snapshot;
            if let Err(restore) = self.persist(written, &mut Parts::default()) {
                tracing::error!("failed to restore saved state after {op}: {restore:#}");
            }
            return Err(LauncherError::Persistence(e));
        }
        Ok(value)
    }

    fn persist(&self, parts: Parts, written: &mut Parts) -> anyhow::Result<()> {
        if parts.hierarchy {
            self.backend.save_hierarchy(&self.state.hierarchy.to_doc())?;
            written.hierarchy = true;
        }
        if parts.favorites {
            self.backend.save_favorites(&self.state.favorites)?;
            written.favorites = true;
        }
        if parts.recents {
            self.backend.save_recents(&self.state.recents.to_vec())?;
            written.recents = true;
        }
        Ok(())
    }
}
