use crate::error::{LauncherError, Result};
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_ICON: &str = "folder";

/// Icon names offered by the category editor.
pub const AVAILABLE_ICONS: &[&str] = &[
    "folder", "user-home", "document", "text-x-generic", "application-x-executable",
    "code", "office", "network", "education", "system", "utilities", "preferences",
    "internet-web-browser", "email", "calendar", "camera", "multimedia-player",
    "image-x-generic", "archive", "package", "download", "star", "favorite",
    "bookmark", "tag", "flag",
];

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// Known icon name for `icon`, falling back to [`DEFAULT_ICON`].
pub fn resolve_icon(icon: &str) -> &'static str {
    let icon = icon.trim();
    match AVAILABLE_ICONS.iter().copied().find(|known| *known == icon) {
        Some(known) => known,
        None => {
            if !icon.is_empty() {
                tracing::debug!("unknown icon '{icon}', using '{DEFAULT_ICON}'");
            }
            DEFAULT_ICON
        }
    }
}

/// Ordered name segments locating a category. The empty path is the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPath(Vec<String>);

impl CategoryPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Display name of the category, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn parent(&self) -> Option<CategoryPath> {
        if self.is_root() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn child(&self, name: &str) -> CategoryPath {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// True when `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &CategoryPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Swap the leading `from` segments for `to`; `None` if `from` is not a prefix.
    pub fn rebased(&self, from: &CategoryPath, to: &CategoryPath) -> Option<CategoryPath> {
        if !self.starts_with(from) {
            return None;
        }
        let mut segments = to.0.clone();
        segments.extend_from_slice(&self.0[from.0.len()..]);
        Some(Self(segments))
    }
}

impl From<&str> for CategoryPath {
    fn from(s: &str) -> Self {
        Self(
            s.split('/')
                .map(str::trim)
                .filter(|seg| !seg.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.0.join("/"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafKind {
    Project,
    File,
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafKind::Project => write!(f, "project"),
            LeafKind::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub icon: String,
    pub description: String,
    children: Vec<String>,
    leaves: Vec<PathBuf>,
}

impl Category {
    fn new(name: &str, icon: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: resolve_icon(icon).to_string(),
            description: description.to_string(),
            children: Vec::new(),
            leaves: Vec::new(),
        }
    }

    /// Child category names in insertion order.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Paths of the leaves attached directly to this category.
    pub fn leaf_paths(&self) -> &[PathBuf] {
        &self.leaves
    }
}

/// A project folder or file registered in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub category: CategoryPath,
    pub kind: LeafKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened: Option<i64>,
}

/// Input for registering a new leaf.
#[derive(Debug, Clone)]
pub struct NewLeaf {
    pub name: String,
    pub path: PathBuf,
    pub kind: LeafKind,
}

impl NewLeaf {
    pub fn project(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into(), kind: LeafKind::Project }
    }

    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into(), kind: LeafKind::File }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadePolicy {
    /// Children and attached leaves move up to the deleted category's parent.
    ReassignToParent,
    /// The whole subtree and every leaf attached inside it is removed.
    #[default]
    DeleteRecursive,
}

/// What a category removal did to the rest of the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    pub removed_categories: Vec<CategoryPath>,
    pub removed_leaves: Vec<PathBuf>,
    pub renamed_categories: Vec<(CategoryPath, CategoryPath)>,
}

/// Counts shown before a recursive delete is confirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalImpact {
    pub subcategories: usize,
    pub leaves: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryRef<'a> {
    pub path: &'a CategoryPath,
    pub category: &'a Category,
}

/// Unordered direct children of a category; ordering is the ranking engine's job.
#[derive(Debug, Default)]
pub struct Children<'a> {
    pub categories: Vec<CategoryRef<'a>>,
    pub leaves: Vec<&'a Leaf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub path: CategoryPath,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

/// Flat persisted form of the hierarchy. Categories are listed parents first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyDoc {
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub leaves: Vec<Leaf>,
}

/// Expand a leading `~` and fold `.`/`..` so equal targets compare equal.
pub fn normalize_target(path: &Path) -> PathBuf {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match dirs_next::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };
    let mut out = PathBuf::new();
    for component in expanded.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(LauncherError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

/// In-memory category tree with attached leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    categories: LinkedHashMap<CategoryPath, Category>,
    leaves: LinkedHashMap<PathBuf, Leaf>,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy {
    pub fn new() -> Self {
        let mut categories = LinkedHashMap::new();
        categories.insert(CategoryPath::root(), Category::new("", DEFAULT_ICON, ""));
        Self {
            categories,
            leaves: LinkedHashMap::new(),
        }
    }

    pub fn category(&self, path: &CategoryPath) -> Option<&Category> {
        self.categories.get(path)
    }

    pub fn contains_category(&self, path: &CategoryPath) -> bool {
        self.categories.contains_key(path)
    }

    pub fn leaf(&self, path: &Path) -> Option<&Leaf> {
        self.leaves.get(path)
    }

    /// All non-root categories, in no particular order.
    pub fn categories(&self) -> impl Iterator<Item = CategoryRef<'_>> {
        self.categories
            .iter()
            .filter(|(path, _)| !path.is_root())
            .map(|(path, category)| CategoryRef { path, category })
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.leaves.values()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len() - 1
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn list_children(&self, path: &CategoryPath) -> Option<Children<'_>> {
        let node = self.categories.get(path)?;
        let categories = node
            .children
            .iter()
            .filter_map(|name| self.categories.get_key_value(&path.child(name)))
            .map(|(path, category)| CategoryRef { path, category })
            .collect();
        let leaves = node.leaves.iter().filter_map(|p| self.leaves.get(p)).collect();
        Some(Children { categories, leaves })
    }

    /// Pre-order walk of `start` and everything below it.
    ///
    /// Uses an explicit work stack so depth is bounded only by memory.
    pub fn walk(&self, start: &CategoryPath) -> Walk<'_> {
        let stack = match self.categories.get_key_value(start) {
            Some((path, _)) => vec![path],
            None => Vec::new(),
        };
        Walk { hierarchy: self, stack }
    }

    pub fn removal_impact(&self, path: &CategoryPath) -> Result<RemovalImpact> {
        if path.is_root() || !self.contains_category(path) {
            return Err(LauncherError::not_found(path));
        }
        let mut impact = RemovalImpact::default();
        for node in self.walk(path) {
            if node.path != path {
                impact.subcategories += 1;
            }
            impact.leaves += node.category.leaves.len();
        }
        Ok(impact)
    }

    pub(crate) fn insert_category(
        &mut self,
        parent: &CategoryPath,
        name: &str,
        icon: &str,
        description: &str,
    ) -> Result<CategoryPath> {
        let name = validate_name(name)?;
        let Some(parent_node) = self.categories.get_mut(parent) else {
            return Err(LauncherError::InvalidParent(parent.clone()));
        };
        if parent_node.children.iter().any(|c| *c == name) {
            return Err(LauncherError::DuplicateName(name));
        }
        parent_node.children.push(name.clone());
        let path = parent.child(&name);
        self.categories
            .insert(path.clone(), Category::new(&name, icon, description));
        Ok(path)
    }

    pub(crate) fn update_category(
        &mut self,
        path: &CategoryPath,
        icon: &str,
        description: &str,
    ) -> Result<()> {
        match self.categories.get_mut(path) {
            Some(node) if !path.is_root() => {
                node.icon = resolve_icon(icon).to_string();
                node.description = description.to_string();
                Ok(())
            }
            _ => Err(LauncherError::not_found(path)),
        }
    }

    pub(crate) fn insert_leaf(&mut self, category: &CategoryPath, leaf: NewLeaf) -> Result<PathBuf> {
        let name = validate_name(&leaf.name)?;
        let path = normalize_target(&leaf.path);
        if !self.categories.contains_key(category) {
            return Err(LauncherError::InvalidParent(category.clone()));
        }
        if self.leaves.contains_key(&path) {
            return Err(LauncherError::DuplicateTarget(path));
        }
        if let Some(node) = self.categories.get_mut(category) {
            node.leaves.push(path.clone());
        }
        self.leaves.insert(
            path.clone(),
            Leaf {
                name,
                path: path.clone(),
                category: category.clone(),
                kind: leaf.kind,
                last_opened: None,
            },
        );
        Ok(path)
    }

    pub(crate) fn remove_leaf(&mut self, path: &Path) -> Result<Leaf> {
        let leaf = self
            .leaves
            .remove(path)
            .ok_or_else(|| LauncherError::not_found(path.display()))?;
        if let Some(node) = self.categories.get_mut(&leaf.category) {
            node.leaves.retain(|p| p != path);
        }
        Ok(leaf)
    }

    pub(crate) fn move_leaf(&mut self, path: &Path, to: &CategoryPath) -> Result<()> {
        if !self.categories.contains_key(to) {
            return Err(LauncherError::InvalidParent(to.clone()));
        }
        let Some(leaf) = self.leaves.get_mut(path) else {
            return Err(LauncherError::not_found(path.display()));
        };
        if leaf.category == *to {
            return Ok(());
        }
        let from = std::mem::replace(&mut leaf.category, to.clone());
        if let Some(node) = self.categories.get_mut(&from) {
            node.leaves.retain(|p| p != path);
        }
        if let Some(node) = self.categories.get_mut(to) {
            node.leaves.push(path.to_path_buf());
        }
        Ok(())
    }

    pub(crate) fn rename_leaf(&mut self, path: &Path, new_name: &str) -> Result<()> {
        let name = validate_name(new_name)?;
        let leaf = self
            .leaves
            .get_mut(path)
            .ok_or_else(|| LauncherError::not_found(path.display()))?;
        leaf.name = name;
        Ok(())
    }

    pub(crate) fn stamp_opened(&mut self, path: &Path, timestamp: i64) {
        if let Some(leaf) = self.leaves.get_mut(path) {
            leaf.last_opened = Some(timestamp);
        }
    }

    /// Rename the last segment of `path`, returning every (old, new) path pair.
    pub(crate) fn rename_category(
        &mut self,
        path: &CategoryPath,
        new_name: &str,
    ) -> Result<Vec<(CategoryPath, CategoryPath)>> {
        let name = validate_name(new_name)?;
        let (Some(parent), Some(old_name)) = (path.parent(), path.name()) else {
            return Err(LauncherError::not_found(path));
        };
        if !self.categories.contains_key(path) {
            return Err(LauncherError::not_found(path));
        }
        if old_name == name {
            return Ok(Vec::new());
        }
        let old_name = old_name.to_string();
        let Some(parent_node) = self.categories.get_mut(&parent) else {
            return Err(LauncherError::not_found(path));
        };
        if parent_node.children.iter().any(|c| *c == name) {
            return Err(LauncherError::DuplicateName(name));
        }
        if let Some(slot) = parent_node.children.iter_mut().find(|c| **c == old_name) {
            *slot = name.clone();
        }
        let target = parent.child(&name);
        let renames = self.rekey_subtree(path, &target);
        if let Some(node) = self.categories.get_mut(&target) {
            node.name = name;
        }
        Ok(renames)
    }

    pub(crate) fn remove_category(
        &mut self,
        path: &CategoryPath,
        policy: CascadePolicy,
    ) -> Result<Removal> {
        let Some(parent) = path.parent() else {
            return Err(LauncherError::not_found(path));
        };
        let Some(node) = self.categories.get(path).cloned() else {
            return Err(LauncherError::not_found(path));
        };
        let own_name = node.name.clone();
        let mut removal = Removal::default();

        match policy {
            CascadePolicy::DeleteRecursive => {
                let subtree: Vec<CategoryPath> =
                    self.walk(path).map(|n| n.path.clone()).collect();
                for cat in &subtree {
                    if let Some(removed) = self.categories.remove(cat) {
                        for leaf in removed.leaves {
                            self.leaves.remove(&leaf);
                            removal.removed_leaves.push(leaf);
                        }
                    }
                }
                if let Some(parent_node) = self.categories.get_mut(&parent) {
                    parent_node.children.retain(|c| *c != own_name);
                }
                removal.removed_categories = subtree;
            }
            CascadePolicy::ReassignToParent => {
                let Some(parent_node) = self.categories.get(&parent) else {
                    return Err(LauncherError::not_found(path));
                };
                if let Some(clash) = node
                    .children
                    .iter()
                    .find(|c| **c != own_name && parent_node.children.contains(c))
                {
                    return Err(LauncherError::DuplicateName(clash.clone()));
                }
                // Detach first so a child sharing the deleted node's name can take its key.
                self.categories.remove(path);
                // The namesake child lands on the deleted key, so its subtree moves last.
                let (namesake, others): (Vec<&String>, Vec<&String>) =
                    node.children.iter().partition(|c| **c == own_name);
                for child in others.into_iter().chain(namesake) {
                    let from = path.child(child);
                    let to = parent.child(child);
                    removal
                        .renamed_categories
                        .extend(self.rekey_subtree(&from, &to));
                }
                for leaf_path in &node.leaves {
                    if let Some(leaf) = self.leaves.get_mut(leaf_path) {
                        leaf.category = parent.clone();
                    }
                }
                if let Some(parent_node) = self.categories.get_mut(&parent) {
                    let idx = parent_node
                        .children
                        .iter()
                        .position(|c| *c == own_name)
                        .unwrap_or(parent_node.children.len());
                    parent_node.children.retain(|c| *c != own_name);
                    let idx = idx.min(parent_node.children.len());
                    parent_node
                        .children
                        .splice(idx..idx, node.children.iter().cloned());
                    parent_node.leaves.extend(node.leaves.iter().cloned());
                }
                removal.removed_categories.push(path.clone());
            }
        }
        Ok(removal)
    }

    /// Move every category under `from` to the same relative place under `to`.
    fn rekey_subtree(
        &mut self,
        from: &CategoryPath,
        to: &CategoryPath,
    ) -> Vec<(CategoryPath, CategoryPath)> {
        let subtree: Vec<CategoryPath> = self.walk(from).map(|n| n.path.clone()).collect();
        let mut renames = Vec::with_capacity(subtree.len());
        for old in subtree {
            let Some(new) = old.rebased(from, to) else {
                continue;
            };
            if let Some(node) = self.categories.remove(&old) {
                for leaf_path in &node.leaves {
                    if let Some(leaf) = self.leaves.get_mut(leaf_path) {
                        leaf.category = new.clone();
                    }
                }
                self.categories.insert(new.clone(), node);
            }
            renames.push((old, new));
        }
        renames
    }

    pub fn to_doc(&self) -> HierarchyDoc {
        let mut doc = HierarchyDoc::default();
        for node in self.walk(&CategoryPath::root()) {
            if !node.path.is_root() {
                doc.categories.push(CategoryRecord {
                    path: node.path.clone(),
                    icon: node.category.icon.clone(),
                    description: node.category.description.clone(),
                });
            }
            for leaf in &node.category.leaves {
                if let Some(leaf) = self.leaves.get(leaf) {
                    doc.leaves.push(leaf.clone());
                }
            }
        }
        doc
    }

    /// Build a tree from its persisted form, repairing what violates the invariants.
    pub fn from_doc(doc: HierarchyDoc) -> Self {
        let mut hierarchy = Self::new();
        let mut records = doc.categories;
        // Stable, so siblings keep their persisted order.
        records.sort_by_key(|r| r.path.depth());
        for record in records {
            let (Some(parent), Some(name)) = (record.path.parent(), record.path.name()) else {
                continue;
            };
            if let Err(e) =
                hierarchy.insert_category(&parent, name, &record.icon, &record.description)
            {
                tracing::warn!("dropping category '{}' on load: {e}", record.path);
            }
        }
        for leaf in doc.leaves {
            let owner = if hierarchy.contains_category(&leaf.category) {
                leaf.category.clone()
            } else {
                tracing::warn!(
                    "leaf '{}' references missing category '{}'; attaching to root",
                    leaf.path.display(),
                    leaf.category
                );
                CategoryPath::root()
            };
            let last_opened = leaf.last_opened;
            let new_leaf = NewLeaf {
                name: leaf.name,
                path: leaf.path,
                kind: leaf.kind,
            };
            match hierarchy.insert_leaf(&owner, new_leaf) {
                Ok(path) => {
                    if let Some(ts) = last_opened {
                        hierarchy.stamp_opened(&path, ts);
                    }
                }
                Err(e) => tracing::warn!("dropping leaf on load: {e}"),
            }
        }
        hierarchy
    }
}

/// Iterator returned by [`Hierarchy::walk`].
pub struct Walk<'a> {
    hierarchy: &'a Hierarchy,
    stack: Vec<&'a CategoryPath>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = CategoryRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.stack.pop()?;
        let category = self.hierarchy.categories.get(path)?;
        for name in category.children.iter().rev() {
            if let Some((child, _)) = self.hierarchy.categories.get_key_value(&path.child(name)) {
                self.stack.push(child);
            }
        }
        Some(CategoryRef { path, category })
    }
}
