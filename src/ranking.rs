use crate::favorites::{FavoriteKey, Favorites};
use crate::hierarchy::{CategoryPath, Children, LeafKind};
use std::path::PathBuf;

pub const PROJECT_ICON: &str = "code";
pub const FILE_ICON: &str = "text-x-generic";

/// What a displayed row points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryTarget {
    Category(CategoryPath),
    Leaf { path: PathBuf, kind: LeafKind },
}

impl EntryTarget {
    pub fn favorite_key(&self) -> FavoriteKey {
        match self {
            EntryTarget::Category(path) => FavoriteKey::Category(path.clone()),
            EntryTarget::Leaf { path, kind } => FavoriteKey::leaf(path.clone(), *kind),
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self, EntryTarget::Category(_))
    }
}

/// An unranked row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub icon: String,
    pub target: EntryTarget,
}

impl Candidate {
    pub fn category(path: &CategoryPath, name: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            target: EntryTarget::Category(path.clone()),
        }
    }

    pub fn leaf(name: &str, path: PathBuf, kind: LeafKind) -> Self {
        let icon = match kind {
            LeafKind::Project => PROJECT_ICON,
            LeafKind::File => FILE_ICON,
        };
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            target: EntryTarget::Leaf { path, kind },
        }
    }
}

/// A row in display order, annotated with its favorite status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub name: String,
    pub icon: String,
    pub target: EntryTarget,
    pub favorite: bool,
}

/// Display tier: favorite categories, categories, favorite projects,
/// projects, favorite files, files.
pub fn tier(target: &EntryTarget, favorite: bool) -> u8 {
    let base = match target {
        EntryTarget::Category(_) => 0,
        EntryTarget::Leaf { kind: LeafKind::Project, .. } => 2,
        EntryTarget::Leaf { kind: LeafKind::File, .. } => 4,
    };
    if favorite {
        base
    } else {
        base + 1
    }
}

/// Order rows by tier, then case-insensitive name; equal keys keep input order.
pub fn order(candidates: Vec<Candidate>, favorites: &Favorites) -> Vec<RankedEntry> {
    let mut keyed: Vec<(u8, String, RankedEntry)> = candidates
        .into_iter()
        .map(|c| {
            let favorite = favorites.contains(&c.target.favorite_key());
            let key = (tier(&c.target, favorite), c.name.to_lowercase());
            (
                key.0,
                key.1,
                RankedEntry {
                    name: c.name,
                    icon: c.icon,
                    target: c.target,
                    favorite,
                },
            )
        })
        .collect();
    keyed.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
    keyed.into_iter().map(|(_, _, entry)| entry).collect()
}

pub fn candidates_of(children: &Children<'_>) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(children.categories.len() + children.leaves.len());
    for c in &children.categories {
        out.push(Candidate::category(c.path, &c.category.name, &c.category.icon));
    }
    for leaf in &children.leaves {
        out.push(Candidate::leaf(&leaf.name, leaf.path.clone(), leaf.kind));
    }
    out
}

/// Ranked content of a single pane.
pub fn rank_children(children: &Children<'_>, favorites: &Favorites) -> Vec<RankedEntry> {
    order(candidates_of(children), favorites)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorites_lead_their_tier() {
        let candidates = vec![
            Candidate::leaf("address-tagger", "/p/address".into(), LeafKind::Project),
            Candidate::leaf("EXTRA", "/p/extra".into(), LeafKind::Project),
            Candidate::leaf("ai", "/p/ai".into(), LeafKind::Project),
        ];
        let mut favs = Favorites::default();
        favs.toggle(FavoriteKey::Project("/p/extra".into()));
        let names: Vec<String> = order(candidates, &favs).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["EXTRA", "address-tagger", "ai"]);
    }

    #[test]
    fn equal_names_keep_input_order() {
        let candidates = vec![
            Candidate::leaf("Same", "/one".into(), LeafKind::File),
            Candidate::leaf("same", "/two".into(), LeafKind::File),
        ];
        let ranked = order(candidates, &Favorites::default());
        assert_eq!(
            ranked[0].target,
            EntryTarget::Leaf { path: "/one".into(), kind: LeafKind::File }
        );
    }
}
