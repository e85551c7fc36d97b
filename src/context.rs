//! Maps a pointer interaction onto the actions valid for it.

use crate::columns::Pane;
use crate::favorites::FavoriteKey;
use crate::hierarchy::{CategoryPath, LeafKind};
use crate::ranking::EntryTarget;
use std::path::PathBuf;

/// What a right-click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Empty area of the root pane.
    RootArea,
    /// Empty area of a pane bound to a non-root category.
    ChildArea(CategoryPath),
    CategoryItem(CategoryPath),
    LeafItem(PathBuf, LeafKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    CreateCategory { parent: CategoryPath },
    AddLeaf { category: CategoryPath },
    Open { path: PathBuf, kind: LeafKind },
    ToggleFavorite(FavoriteKey),
    Rename(EntryTarget),
    Delete(EntryTarget),
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::CreateCategory { .. } => "New category",
            MenuAction::AddLeaf { .. } => "Add project or file",
            MenuAction::Open { .. } => "Open",
            MenuAction::ToggleFavorite(_) => "Toggle favorite",
            MenuAction::Rename(_) => "Rename",
            MenuAction::Delete(_) => "Delete",
        }
    }
}

/// Classify a click on `pane`; `target` is the row under the pointer, if any.
pub fn detect(pane: &Pane, target: Option<&EntryTarget>) -> Context {
    let context = match target {
        Some(EntryTarget::Category(path)) => Context::CategoryItem(path.clone()),
        Some(EntryTarget::Leaf { path, kind }) => Context::LeafItem(path.clone(), *kind),
        None if pane.is_root() => Context::RootArea,
        None => Context::ChildArea(pane.bound().clone()),
    };
    tracing::debug!(?context, "detected context");
    context
}

impl Context {
    pub fn actions(&self) -> Vec<MenuAction> {
        match self {
            Context::RootArea => vec![
                MenuAction::CreateCategory { parent: CategoryPath::root() },
                MenuAction::AddLeaf { category: CategoryPath::root() },
            ],
            Context::ChildArea(path) => vec![
                MenuAction::CreateCategory { parent: path.clone() },
                MenuAction::AddLeaf { category: path.clone() },
            ],
            Context::CategoryItem(path) => {
                let target = EntryTarget::Category(path.clone());
                vec![
                    MenuAction::CreateCategory { parent: path.clone() },
                    MenuAction::ToggleFavorite(target.favorite_key()),
                    MenuAction::Rename(target.clone()),
                    MenuAction::Delete(target),
                ]
            }
            Context::LeafItem(path, kind) => {
                let target = EntryTarget::Leaf { path: path.clone(), kind: *kind };
                vec![
                    MenuAction::Open { path: path.clone(), kind: *kind },
                    MenuAction::ToggleFavorite(target.favorite_key()),
                    MenuAction::Rename(target.clone()),
                    MenuAction::Delete(target),
                ]
            }
        }
    }
}
