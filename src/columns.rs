use crate::favorites::Favorites;
use crate::hierarchy::{CategoryPath, Hierarchy};
use crate::ranking::{rank_children, EntryTarget, RankedEntry};
use std::path::PathBuf;

/// A child of a pane: a category by name or a leaf by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildRef {
    Category(String),
    Leaf(PathBuf),
}

impl ChildRef {
    pub fn category(name: impl Into<String>) -> Self {
        ChildRef::Category(name.into())
    }

    pub fn leaf(path: impl Into<PathBuf>) -> Self {
        ChildRef::Leaf(path.into())
    }
}

impl From<&EntryTarget> for ChildRef {
    fn from(target: &EntryTarget) -> Self {
        match target {
            EntryTarget::Category(path) => {
                ChildRef::Category(path.name().unwrap_or_default().to_string())
            }
            EntryTarget::Leaf { path, .. } => ChildRef::Leaf(path.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    bound: CategoryPath,
    selected: Option<ChildRef>,
}

impl Pane {
    pub fn new(bound: CategoryPath) -> Self {
        Self { bound, selected: None }
    }

    pub fn bound(&self) -> &CategoryPath {
        &self.bound
    }

    pub fn selected(&self) -> Option<&ChildRef> {
        self.selected.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.bound.is_root()
    }
}

/// Result of [`ColumnStack::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A category was selected and a pane bound to it was appended.
    Expanded(CategoryPath),
    /// A leaf was selected; leaves never open a pane.
    Leaf(PathBuf),
    /// The pane or child no longer exists; nothing changed.
    Ignored,
}

/// Ranked content of one pane, as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneView {
    pub bound: CategoryPath,
    pub selected: Option<ChildRef>,
    pub entries: Vec<RankedEntry>,
}

/// Finder-style drill-down: pane `i + 1` is always bound to the category
/// selected in pane `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnStack {
    panes: Vec<Pane>,
}

impl Default for ColumnStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnStack {
    pub fn new() -> Self {
        Self {
            panes: vec![Pane::new(CategoryPath::root())],
        }
    }

    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn pane(&self, index: usize) -> Option<&Pane> {
        self.panes.get(index)
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Bound paths of every pane, root first.
    pub fn bound_paths(&self) -> Vec<CategoryPath> {
        self.panes.iter().map(|p| p.bound.clone()).collect()
    }

    pub fn reset(&mut self) {
        self.panes.truncate(1);
        self.panes[0].selected = None;
    }

    pub fn select(&mut self, hierarchy: &Hierarchy, index: usize, child: ChildRef) -> Selection {
        let Some(pane) = self.panes.get(index) else {
            tracing::debug!("select on missing pane {index}");
            return Selection::Ignored;
        };
        let Some(node) = hierarchy.category(&pane.bound) else {
            return Selection::Ignored;
        };
        let outcome = match &child {
            ChildRef::Category(name) => {
                if !node.children().iter().any(|c| c == name) {
                    return Selection::Ignored;
                }
                Selection::Expanded(pane.bound.child(name))
            }
            ChildRef::Leaf(path) => match hierarchy.leaf(path) {
                Some(leaf) if leaf.category == pane.bound => Selection::Leaf(path.clone()),
                _ => return Selection::Ignored,
            },
        };
        self.panes.truncate(index + 1);
        self.panes[index].selected = Some(child);
        if let Selection::Expanded(path) = &outcome {
            self.panes.push(Pane::new(path.clone()));
        }
        tracing::debug!(pane = index, depth = self.panes.len(), "column selection changed");
        outcome
    }

    /// Reset to the root and select each segment of `path` in turn.
    ///
    /// Returns false if some segment could not be selected; the stack then
    /// shows the deepest reachable ancestor.
    pub fn reveal(&mut self, hierarchy: &Hierarchy, path: &CategoryPath) -> bool {
        self.reset();
        for (index, segment) in path.segments().iter().enumerate() {
            if self.select(hierarchy, index, ChildRef::category(segment.as_str()))
                == Selection::Ignored
            {
                return false;
            }
        }
        true
    }

    /// Drop panes and selections that no longer resolve in `hierarchy`.
    ///
    /// Returns true if anything changed.
    pub fn prune(&mut self, hierarchy: &Hierarchy) -> bool {
        let before = self.clone();
        let mut keep = self.panes.len();
        for i in 0..self.panes.len() {
            let pane = &self.panes[i];
            if !hierarchy.contains_category(&pane.bound) {
                keep = i;
                break;
            }
            let valid = match &pane.selected {
                None => true,
                Some(ChildRef::Category(name)) => {
                    let child = pane.bound.child(name);
                    hierarchy.contains_category(&child)
                        && self.panes.get(i + 1).map_or(true, |next| next.bound == child)
                }
                Some(ChildRef::Leaf(path)) => hierarchy
                    .leaf(path)
                    .is_some_and(|leaf| leaf.category == pane.bound),
            };
            if !valid {
                self.panes[i].selected = None;
                keep = i + 1;
                break;
            }
        }
        // The root pane always exists.
        self.panes.truncate(keep.max(1));
        if self.panes[0].bound != CategoryPath::root() {
            *self = Self::new();
        }
        *self != before
    }

    /// Follow category renames so the open panes stay on the same nodes.
    pub fn rebase(&mut self, renames: &[(CategoryPath, CategoryPath)]) {
        let lookup = |path: &CategoryPath| {
            renames
                .iter()
                .find(|(old, _)| old == path)
                .map(|(_, new)| new.clone())
        };
        for pane in &mut self.panes {
            let old_bound = pane.bound.clone();
            if let Some(new) = lookup(&old_bound) {
                pane.bound = new;
            }
            if let Some(ChildRef::Category(name)) = &mut pane.selected {
                if let Some(new) = lookup(&old_bound.child(name)) {
                    if let Some(new_name) = new.name() {
                        *name = new_name.to_string();
                    }
                }
            }
        }
    }

    pub fn views(&self, hierarchy: &Hierarchy, favorites: &Favorites) -> Vec<PaneView> {
        self.panes
            .iter()
            .map(|pane| PaneView {
                bound: pane.bound.clone(),
                selected: pane.selected.clone(),
                entries: hierarchy
                    .list_children(&pane.bound)
                    .map(|children| rank_children(&children, favorites))
                    .unwrap_or_default(),
            })
            .collect()
    }
}
