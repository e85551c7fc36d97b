use crate::hierarchy::{CategoryPath, Hierarchy, LeafKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Natural key of something that can be favorited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FavoriteKey {
    Category(CategoryPath),
    Project(PathBuf),
    File(PathBuf),
}

impl FavoriteKey {
    pub fn leaf(path: impl Into<PathBuf>, kind: LeafKind) -> Self {
        match kind {
            LeafKind::Project => FavoriteKey::Project(path.into()),
            LeafKind::File => FavoriteKey::File(path.into()),
        }
    }
}

/// Path-keyed favorite membership. Presence in a set is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(default)]
    pub categories: BTreeSet<CategoryPath>,
    #[serde(default)]
    pub projects: BTreeSet<PathBuf>,
    #[serde(default)]
    pub files: BTreeSet<PathBuf>,
}

impl Favorites {
    pub fn contains(&self, key: &FavoriteKey) -> bool {
        match key {
            FavoriteKey::Category(path) => self.categories.contains(path),
            FavoriteKey::Project(path) => self.projects.contains(path),
            FavoriteKey::File(path) => self.files.contains(path),
        }
    }

    pub fn is_category_favorite(&self, path: &CategoryPath) -> bool {
        self.categories.contains(path)
    }

    pub fn is_leaf_favorite(&self, path: &Path, kind: LeafKind) -> bool {
        match kind {
            LeafKind::Project => self.projects.contains(path),
            LeafKind::File => self.files.contains(path),
        }
    }

    /// Flip membership and return the new status.
    pub fn toggle(&mut self, key: FavoriteKey) -> bool {
        fn flip<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
            if set.remove(&value) {
                false
            } else {
                set.insert(value);
                true
            }
        }
        match key {
            FavoriteKey::Category(path) => flip(&mut self.categories, path),
            FavoriteKey::Project(path) => flip(&mut self.projects, path),
            FavoriteKey::File(path) => flip(&mut self.files, path),
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len() + self.projects.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop favorites of removed leaves and categories.
    pub fn forget(&mut self, categories: &[CategoryPath], leaves: &[PathBuf]) {
        for path in categories {
            self.categories.remove(path);
        }
        for path in leaves {
            self.projects.remove(path);
            self.files.remove(path);
        }
    }

    /// Rewrite category favorites after a subtree moved.
    pub fn rebase(&mut self, renames: &[(CategoryPath, CategoryPath)]) {
        for (old, new) in renames {
            if self.categories.remove(old) {
                self.categories.insert(new.clone());
            }
        }
    }

    /// Remove entries that no longer match an entity of the right kind.
    ///
    /// Returns how many were pruned.
    pub fn prune(&mut self, hierarchy: &Hierarchy) -> usize {
        let before = self.len();
        self.categories
            .retain(|path| !path.is_root() && hierarchy.contains_category(path));
        self.projects.retain(|path| {
            hierarchy
                .leaf(path)
                .is_some_and(|leaf| leaf.kind == LeafKind::Project)
        });
        self.files.retain(|path| {
            hierarchy
                .leaf(path)
                .is_some_and(|leaf| leaf.kind == LeafKind::File)
        });
        before - self.len()
    }
}
