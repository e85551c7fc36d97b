use code_launcher::columns::{ChildRef, ColumnStack, Selection};
use code_launcher::favorites::Favorites;
use code_launcher::hierarchy::{CascadePolicy, CategoryPath, NewLeaf};
use code_launcher::storage::MemoryStore;
use code_launcher::store::HierarchyStore;

fn store() -> HierarchyStore {
    let mut store = HierarchyStore::open(Box::new(MemoryStore::new()));
    let root = CategoryPath::root();
    let work = store.add_category(&root, "Work", "", "").unwrap();
    store.add_category(&work, "Backend", "", "").unwrap();
    store.add_category(&root, "Personal", "", "").unwrap();
    store
        .add_leaf(&work, NewLeaf::file("notes.txt", "/work/notes.txt"))
        .unwrap();
    store
}

fn bound(stack: &ColumnStack) -> Vec<String> {
    stack.bound_paths().iter().map(|p| p.to_string()).collect()
}

#[test]
fn selecting_sibling_discards_deeper_panes() {
    let store = store();
    let h = store.hierarchy();
    let mut stack = ColumnStack::new();
    stack.select(h, 0, ChildRef::category("Work"));
    stack.select(h, 1, ChildRef::category("Backend"));
    assert_eq!(bound(&stack), vec!["/", "Work", "Work/Backend"]);

    let outcome = stack.select(h, 0, ChildRef::category("Personal"));
    assert_eq!(outcome, Selection::Expanded(CategoryPath::from("Personal")));
    assert_eq!(bound(&stack), vec!["/", "Personal"]);
    assert_eq!(
        stack.pane(0).unwrap().selected(),
        Some(&ChildRef::category("Personal"))
    );
    assert_eq!(stack.pane(1).unwrap().selected(), None);
}

#[test]
fn initial_stack_is_single_root_pane() {
    let stack = ColumnStack::new();
    assert_eq!(stack.len(), 1);
    assert!(stack.pane(0).unwrap().is_root());
    assert_eq!(stack.pane(0).unwrap().selected(), None);
}

#[test]
fn prune_after_delete_drops_vanished_panes() {
    let mut store = store();
    let mut stack = ColumnStack::new();
    stack.select(store.hierarchy(), 0, ChildRef::category("Work"));
    stack.select(store.hierarchy(), 1, ChildRef::category("Backend"));
    store
        .remove_category(&CategoryPath::from("Work/Backend"), CascadePolicy::DeleteRecursive)
        .unwrap();
    assert!(stack.prune(store.hierarchy()));
    assert_eq!(bound(&stack), vec!["/", "Work"]);
    assert_eq!(stack.pane(1).unwrap().selected(), None);
    assert!(!stack.prune(store.hierarchy()));
}

#[test]
fn rebase_follows_renamed_category() {
    let mut store = store();
    let mut stack = ColumnStack::new();
    stack.select(store.hierarchy(), 0, ChildRef::category("Work"));
    stack.select(store.hierarchy(), 1, ChildRef::category("Backend"));
    let renames = store
        .rename_category(&CategoryPath::from("Work"), "Job")
        .unwrap();
    stack.rebase(&renames);
    assert!(!stack.prune(store.hierarchy()));
    assert_eq!(bound(&stack), vec!["/", "Job", "Job/Backend"]);
    assert_eq!(
        stack.pane(0).unwrap().selected(),
        Some(&ChildRef::category("Job"))
    );
}

#[test]
fn reveal_and_views() {
    let store = store();
    let mut stack = ColumnStack::new();
    assert!(stack.reveal(store.hierarchy(), &CategoryPath::from("Work/Backend")));
    assert_eq!(bound(&stack), vec!["/", "Work", "Work/Backend"]);
    assert!(!stack.reveal(store.hierarchy(), &CategoryPath::from("Work/Nope")));
    assert_eq!(bound(&stack), vec!["/", "Work"]);

    let views = stack.views(store.hierarchy(), &Favorites::default());
    let work: Vec<&str> = views[1].entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(work, vec!["Backend", "notes.txt"]);
}
