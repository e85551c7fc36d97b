use code_launcher::error::LauncherError;
use code_launcher::favorites::FavoriteKey;
use code_launcher::hierarchy::{CascadePolicy, CategoryPath, LeafKind, NewLeaf};
use code_launcher::recents::RecentEntry;
use code_launcher::storage::MemoryStore;
use code_launcher::store::HierarchyStore;
use std::path::{Path, PathBuf};

fn root() -> CategoryPath {
    CategoryPath::root()
}

/// Work{Backend{api}, notes.txt}, Personal{}.
fn populated() -> (HierarchyStore, MemoryStore) {
    let backend = MemoryStore::new();
    let mut store = HierarchyStore::open(Box::new(backend.clone()));
    let work = store.add_category(&root(), "Work", "code", "day job").unwrap();
    let backend_cat = store.add_category(&work, "Backend", "", "").unwrap();
    store.add_category(&root(), "Personal", "", "").unwrap();
    store
        .add_leaf(&backend_cat, NewLeaf::project("api", "/src/api"))
        .unwrap();
    store
        .add_leaf(&work, NewLeaf::file("notes.txt", "/docs/notes.txt"))
        .unwrap();
    (store, backend)
}

#[test]
fn add_category_validates_parent_and_name() {
    let (mut store, _) = populated();
    assert!(matches!(
        store.add_category(&CategoryPath::from("Nope"), "X", "", ""),
        Err(LauncherError::InvalidParent(_))
    ));
    assert!(matches!(
        store.add_category(&root(), "Work", "", ""),
        Err(LauncherError::DuplicateName(_))
    ));
    assert!(matches!(
        store.add_category(&root(), "   ", "", ""),
        Err(LauncherError::InvalidName(_))
    ));
    assert!(matches!(
        store.add_category(&root(), "a/b", "", ""),
        Err(LauncherError::InvalidName(_))
    ));
}

#[test]
fn same_name_allowed_under_different_parents() {
    let (mut store, _) = populated();
    store
        .add_category(&CategoryPath::from("Personal"), "Backend", "", "")
        .unwrap();
    assert!(store
        .hierarchy()
        .contains_category(&CategoryPath::from("Personal/Backend")));
}

#[test]
fn duplicate_target_is_rejected_anywhere() {
    let (mut store, _) = populated();
    let err = store
        .add_leaf(
            &CategoryPath::from("Personal"),
            NewLeaf::project("again", "/src/./api"),
        )
        .unwrap_err();
    assert!(matches!(err, LauncherError::DuplicateTarget(p) if p == Path::new("/src/api")));
}

#[test]
fn category_gets_default_icon() {
    let (store, _) = populated();
    let personal = store.hierarchy().category(&CategoryPath::from("Personal")).unwrap();
    assert_eq!(personal.icon, "folder");
}

#[test]
fn reassign_to_parent_keeps_everything_below() {
    let (mut store, _) = populated();
    let removal = store
        .remove_category(&CategoryPath::from("Work"), CascadePolicy::ReassignToParent)
        .unwrap();
    assert_eq!(removal.removed_categories, vec![CategoryPath::from("Work")]);
    assert!(removal.removed_leaves.is_empty());

    let h = store.hierarchy();
    assert!(!h.contains_category(&CategoryPath::from("Work")));
    assert!(h.contains_category(&CategoryPath::from("Backend")));
    assert_eq!(h.leaf_count(), 2);
    assert_eq!(
        h.leaf(Path::new("/docs/notes.txt")).unwrap().category,
        root()
    );
    assert_eq!(
        h.leaf(Path::new("/src/api")).unwrap().category,
        CategoryPath::from("Backend")
    );
    let work = CategoryPath::from("Work");
    assert!(h.leaves().all(|l| !l.category.starts_with(&work)));
    assert!(h.categories().all(|c| !c.path.starts_with(&work)));
}

#[test]
fn reassign_reports_clash_with_parent_sibling() {
    let (mut store, _) = populated();
    store.add_category(&root(), "Backend", "", "").unwrap();
    let err = store
        .remove_category(&CategoryPath::from("Work"), CascadePolicy::ReassignToParent)
        .unwrap_err();
    assert!(matches!(err, LauncherError::DuplicateName(n) if n == "Backend"));
    assert!(store.hierarchy().contains_category(&CategoryPath::from("Work/Backend")));
}

#[test]
fn reassign_handles_child_named_like_parent() {
    let (mut store, _) = populated();
    let work = CategoryPath::from("Work");
    store.add_category(&work, "Work", "", "").unwrap();
    store
        .add_leaf(&CategoryPath::from("Work/Work"), NewLeaf::file("inner", "/inner"))
        .unwrap();
    store
        .remove_category(&work, CascadePolicy::ReassignToParent)
        .unwrap();
    let h = store.hierarchy();
    assert!(h.contains_category(&work));
    assert_eq!(h.leaf(Path::new("/inner")).unwrap().category, work);
    assert!(h.contains_category(&CategoryPath::from("Backend")));
}

#[test]
fn delete_recursive_removes_subtree_and_leaves() {
    let (mut store, _) = populated();
    let impact = store.removal_impact(&CategoryPath::from("Work")).unwrap();
    assert_eq!(impact.subcategories, 1);
    assert_eq!(impact.leaves, 2);

    let removal = store
        .remove_category(&CategoryPath::from("Work"), CascadePolicy::DeleteRecursive)
        .unwrap();
    assert_eq!(removal.removed_categories.len(), 2);
    assert_eq!(removal.removed_leaves.len(), 2);
    let h = store.hierarchy();
    assert_eq!(h.category_count(), 1);
    assert_eq!(h.leaf_count(), 0);
}

#[test]
fn root_cannot_be_removed() {
    let (mut store, _) = populated();
    assert!(matches!(
        store.remove_category(&root(), CascadePolicy::DeleteRecursive),
        Err(LauncherError::NotFound(_))
    ));
}

#[test]
fn rename_moves_favorites_and_descendants() {
    let (mut store, backend) = populated();
    store
        .toggle_favorite(FavoriteKey::Category(CategoryPath::from("Work/Backend")))
        .unwrap();
    store
        .rename_category(&CategoryPath::from("Work"), "Job")
        .unwrap();
    assert!(store
        .favorites()
        .is_category_favorite(&CategoryPath::from("Job/Backend")));
    assert!(!store
        .favorites()
        .is_category_favorite(&CategoryPath::from("Work/Backend")));
    assert_eq!(
        store.hierarchy().leaf(Path::new("/src/api")).unwrap().category,
        CategoryPath::from("Job/Backend")
    );
    assert!(backend
        .favorites()
        .categories
        .contains(&CategoryPath::from("Job/Backend")));
}

#[test]
fn rename_to_existing_sibling_fails() {
    let (mut store, _) = populated();
    assert!(matches!(
        store.rename_category(&CategoryPath::from("Work"), "Personal"),
        Err(LauncherError::DuplicateName(_))
    ));
}

#[test]
fn removing_leaf_drops_its_favorite() {
    let (mut store, backend) = populated();
    store
        .toggle_favorite(FavoriteKey::Project("/src/api".into()))
        .unwrap();
    store.remove_leaf(Path::new("/src/api")).unwrap();
    assert!(store.favorites().is_empty());
    assert!(backend.favorites().is_empty());
}

#[test]
fn move_and_rename_leaf() {
    let (mut store, _) = populated();
    let personal = CategoryPath::from("Personal");
    store.move_leaf(Path::new("/docs/notes.txt"), &personal).unwrap();
    store.rename_leaf(Path::new("/docs/notes.txt"), "Notes").unwrap();
    let leaf = store.hierarchy().leaf(Path::new("/docs/notes.txt")).unwrap();
    assert_eq!(leaf.category, personal);
    assert_eq!(leaf.name, "Notes");
    assert!(matches!(
        store.move_leaf(Path::new("/docs/notes.txt"), &CategoryPath::from("Gone")),
        Err(LauncherError::InvalidParent(_))
    ));
}

#[test]
fn toggle_favorite_checks_kind() {
    let (mut store, _) = populated();
    assert!(matches!(
        store.toggle_favorite(FavoriteKey::File("/src/api".into())),
        Err(LauncherError::NotFound(_))
    ));
    assert!(store
        .toggle_favorite(FavoriteKey::Project("/src/api".into()))
        .unwrap());
    assert!(!store
        .toggle_favorite(FavoriteKey::Project("/src/api".into()))
        .unwrap());
}

#[test]
fn failed_save_rolls_back_memory_and_store() {
    let (mut store, backend) = populated();
    let before_doc = backend.hierarchy();
    let before_children: Vec<String> = store
        .hierarchy()
        .category(&root())
        .unwrap()
        .children()
        .to_vec();

    backend.set_fail_saves(true);
    let err = store
        .remove_category(&CategoryPath::from("Work"), CascadePolicy::DeleteRecursive)
        .unwrap_err();
    assert!(matches!(err, LauncherError::Persistence(_)));
    assert_eq!(backend.hierarchy(), before_doc);
    assert_eq!(store.hierarchy().to_doc(), before_doc);
    assert_eq!(
        store.hierarchy().category(&root()).unwrap().children().to_vec(),
        before_children
    );

    backend.set_fail_saves(false);
    store
        .remove_category(&CategoryPath::from("Work"), CascadePolicy::DeleteRecursive)
        .unwrap();
    assert_eq!(backend.hierarchy().categories.len(), 1);
}

#[test]
fn record_open_stamps_leaf_and_recents() {
    let (mut store, backend) = populated();
    let entry = store.record_open(Path::new("/src/api")).unwrap();
    assert_eq!(entry.kind, LeafKind::Project);
    assert_eq!(entry.name, "api");
    assert_eq!(
        store.hierarchy().leaf(Path::new("/src/api")).unwrap().last_opened,
        Some(entry.timestamp)
    );
    assert_eq!(backend.recents().len(), 1);
    assert!(matches!(
        store.record_open(Path::new("/missing")),
        Err(LauncherError::NotFound(_))
    ));
}

#[test]
fn reopen_restores_state_and_prunes_stale_favorites() {
    let (mut store, backend) = populated();
    store
        .toggle_favorite(FavoriteKey::File("/docs/notes.txt".into()))
        .unwrap();
    store.record_open(Path::new("/docs/notes.txt")).unwrap();
    drop(store);

    let mut favorites = backend.favorites();
    favorites.projects.insert(PathBuf::from("/ghost"));
    let seeded = MemoryStore::with_state(backend.hierarchy(), favorites, backend.recents());

    let reopened = HierarchyStore::open(Box::new(seeded));
    assert_eq!(reopened.hierarchy().leaf_count(), 2);
    assert_eq!(reopened.favorites().len(), 1);
    assert_eq!(reopened.recents().len(), 1);
}

#[test]
fn update_category_edits_icon_and_description() {
    let (mut store, backend) = populated();
    let work = CategoryPath::from("Work");
    store.update_category(&work, "  ", "office stuff").unwrap();
    let node = store.hierarchy().category(&work).unwrap();
    assert_eq!(node.icon, "folder");
    assert_eq!(node.description, "office stuff");
    assert_eq!(backend.hierarchy().categories[0].description, "office stuff");
    assert!(matches!(
        store.update_category(&root(), "star", ""),
        Err(LauncherError::NotFound(_))
    ));
}

#[test]
fn partial_save_failure_rewrites_saved_parts() {
    let (mut store, backend) = populated();
    store
        .toggle_favorite(FavoriteKey::Category(CategoryPath::from("Work")))
        .unwrap();
    let before_doc = backend.hierarchy();
    let before_favorites = backend.favorites();
    let saves = backend.saves();

    backend.set_fail_favorites(true);
    let err = store
        .remove_category(&CategoryPath::from("Work"), CascadePolicy::DeleteRecursive)
        .unwrap_err();
    assert!(matches!(err, LauncherError::Persistence(_)));
    // Hierarchy was written, then written back from the snapshot.
    assert_eq!(backend.saves(), saves + 2);
    assert_eq!(backend.hierarchy(), before_doc);
    assert_eq!(backend.favorites(), before_favorites);
    assert_eq!(store.hierarchy().to_doc(), before_doc);
    assert!(store
        .favorites()
        .is_category_favorite(&CategoryPath::from("Work")));
}

#[test]
fn failed_recents_save_keeps_leaf_unstamped() {
    let (mut store, backend) = populated();
    backend.set_fail_recents(true);
    let err = store.record_open(Path::new("/src/api")).unwrap_err();
    assert!(matches!(err, LauncherError::Persistence(_)));
    assert!(backend.hierarchy().leaves.iter().all(|l| l.last_opened.is_none()));
    assert!(store.recents().is_empty());

    backend.set_fail_recents(false);
    store.record_open(Path::new("/src/api")).unwrap();
    assert_eq!(backend.recents().len(), 1);
}

#[test]
fn extreme_recent_timestamps_open_cleanly() {
    let entry = |path: &str, timestamp: i64| RecentEntry {
        path: path.into(),
        name: path.trim_start_matches('/').into(),
        kind: LeafKind::File,
        timestamp,
    };
    let seeded = MemoryStore::with_state(
        Default::default(),
        Default::default(),
        vec![entry("/a", i64::MIN), entry("/b", i64::MIN)],
    );
    let store = HierarchyStore::open(Box::new(seeded));
    assert_eq!(store.recents().len(), 1);

    let (_, backend) = populated();
    let seeded = MemoryStore::with_state(
        backend.hierarchy(),
        Default::default(),
        vec![entry("/head", i64::MAX)],
    );
    let mut store = HierarchyStore::open(Box::new(seeded.clone()));
    let opened = store.record_open(Path::new("/src/api")).unwrap();
    assert_eq!(opened.timestamp, i64::MAX);
    let stamps: Vec<i64> = seeded.recents().iter().map(|e| e.timestamp).collect();
    assert_eq!(stamps, vec![i64::MAX, i64::MAX - 1]);
}
