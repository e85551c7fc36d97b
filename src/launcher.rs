//! The launcher session: store, column stack and search wired together.

use crate::columns::{ChildRef, ColumnStack, PaneView, Selection};
use crate::context::{self, Context, MenuAction};
use crate::error::{LauncherError, Result};
use crate::hierarchy::{CascadePolicy, CategoryPath, NewLeaf, Removal, RemovalImpact};
use crate::opener::{ExistenceChecker, FsExistence, SystemOpener, TargetOpener};
use crate::ranking::EntryTarget;
use crate::recents::RecentEntry;
use crate::search::{SearchController, SearchOptions, SearchResults, SearchState};
use crate::settings::Settings;
use crate::storage::JsonStore;
use crate::store::HierarchyStore;
use std::path::{Path, PathBuf};

/// Everything a view needs to draw the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub panes: Vec<PaneView>,
    pub search: SearchState,
    /// `None` while browsing.
    pub results: Option<SearchResults>,
}

/// Receives a fresh [`Snapshot`] after every change.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot);
}

pub struct Launcher {
    store: HierarchyStore,
    columns: ColumnStack,
    search: SearchController,
    opener: Box<dyn TargetOpener>,
    existence: Option<Box<dyn ExistenceChecker>>,
    renderer: Option<Box<dyn Renderer>>,
    delete_policy: CascadePolicy,
}

impl Launcher {
    pub fn new(store: HierarchyStore, opener: Box<dyn TargetOpener>) -> Self {
        Self {
            store,
            columns: ColumnStack::new(),
            search: SearchController::default(),
            opener,
            existence: None,
            renderer: None,
            delete_policy: CascadePolicy::default(),
        }
    }

    /// JSON store in the configured data directory, system opener and
    /// filesystem existence checks.
    pub fn from_settings(settings: &Settings) -> Self {
        let dir = settings.data_dir();
        tracing::debug!("using data directory {}", dir.display());
        let store = HierarchyStore::open(Box::new(JsonStore::new(dir)));
        Self::new(store, Box::new(SystemOpener::new(settings.default_editor.clone())))
            .with_existence_checker(Box::new(FsExistence))
            .with_search_options(settings.search_options())
            .with_delete_policy(settings.delete_policy)
    }

    pub fn with_existence_checker(mut self, checker: Box<dyn ExistenceChecker>) -> Self {
        self.existence = Some(checker);
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.search = SearchController::new(options);
        self
    }

    pub fn with_delete_policy(mut self, policy: CascadePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn store(&self) -> &HierarchyStore {
        &self.store
    }

    pub fn columns(&self) -> &ColumnStack {
        &self.columns
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn delete_policy(&self) -> CascadePolicy {
        self.delete_policy
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            panes: self
                .columns
                .views(self.store.hierarchy(), self.store.favorites()),
            search: self.search.state().clone(),
            results: self.results(),
        }
    }

    pub fn results(&self) -> Option<SearchResults> {
        self.search.results(
            self.store.hierarchy(),
            self.store.favorites(),
            self.store.recents(),
        )
    }

    fn notify(&mut self) {
        if self.renderer.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&snapshot);
        }
    }

    /// Drop panes invalidated by a mutation and redraw.
    fn settle(&mut self) {
        if self.columns.prune(self.store.hierarchy()) {
            tracing::debug!(depth = self.columns.len(), "column stack pruned");
        }
        self.notify();
    }

    pub fn select(&mut self, pane_index: usize, child: ChildRef) -> Selection {
        let outcome = self
            .columns
            .select(self.store.hierarchy(), pane_index, child);
        if outcome != Selection::Ignored {
            self.notify();
        }
        outcome
    }

    /// Select the first entry of the root pane and, if that opened a
    /// category, the first category of the new pane too.
    pub fn select_first_category(&mut self) -> bool {
        let mut selected = false;
        for pane_index in 0..2 {
            let views = self
                .columns
                .views(self.store.hierarchy(), self.store.favorites());
            let Some(first) = views.get(pane_index).and_then(|v| v.entries.first()) else {
                break;
            };
            if !first.target.is_category() {
                break;
            }
            let child = ChildRef::from(&first.target);
            match self.columns.select(self.store.hierarchy(), pane_index, child) {
                Selection::Expanded(_) => selected = true,
                _ => break,
            }
        }
        if selected {
            self.notify();
        }
        selected
    }

    /// Update the search query. The column stack is left as it was.
    pub fn set_query(&mut self, query: &str) -> &SearchState {
        self.search.set_query(query);
        self.notify();
        self.search.state()
    }

    pub fn clear_query(&mut self) {
        self.search.clear();
        self.notify();
    }

    /// Open a registered leaf and record it in the recents.
    ///
    /// A target that is missing on disk or that the opener rejects is not
    /// recorded.
    pub fn open(&mut self, path: &Path) -> Result<RecentEntry> {
        let leaf = self
            .store
            .hierarchy()
            .leaf(path)
            .ok_or_else(|| LauncherError::not_found(path.display()))?;
        let kind = leaf.kind;
        if let Some(checker) = &self.existence {
            if !checker.exists(path) {
                tracing::warn!("refusing to open missing target {}", path.display());
                return Err(LauncherError::TargetMissing(path.to_path_buf()));
            }
        }
        self.opener
            .open(path, kind)
            .map_err(|source| LauncherError::Launch {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!("opened {kind} {}", path.display());
        let entry = self.store.record_open(path)?;
        self.notify();
        Ok(entry)
    }

    /// Act on a search result: reveal a category or open a leaf.
    pub fn activate(&mut self, target: &EntryTarget) -> Result<()> {
        match target {
            EntryTarget::Category(path) => {
                if !self.store.hierarchy().contains_category(path) {
                    return Err(LauncherError::not_found(path));
                }
                self.search.clear();
                self.columns.reveal(self.store.hierarchy(), path);
                self.notify();
                Ok(())
            }
            EntryTarget::Leaf { path, .. } => self.open(path).map(|_| ()),
        }
    }

    pub fn toggle_favorite(&mut self, target: &EntryTarget) -> Result<bool> {
        let status = self.store.toggle_favorite(target.favorite_key())?;
        self.notify();
        Ok(status)
    }

    pub fn create_category(
        &mut self,
        parent: &CategoryPath,
        name: &str,
        icon: &str,
        description: &str,
    ) -> Result<CategoryPath> {
        let path = self.store.add_category(parent, name, icon, description)?;
        self.settle();
        Ok(path)
    }

    pub fn update_category(&mut self, path: &CategoryPath, icon: &str, description: &str) -> Result<()> {
        self.store.update_category(path, icon, description)?;
        self.settle();
        Ok(())
    }

    pub fn add_leaf(&mut self, category: &CategoryPath, leaf: NewLeaf) -> Result<PathBuf> {
        let path = self.store.add_leaf(category, leaf)?;
        self.settle();
        Ok(path)
    }

    pub fn move_leaf(&mut self, path: &Path, to: &CategoryPath) -> Result<()> {
        self.store.move_leaf(path, to)?;
        self.settle();
        Ok(())
    }

    pub fn rename(&mut self, target: &EntryTarget, new_name: &str) -> Result<()> {
        match target {
            EntryTarget::Category(path) => {
                let renames = self.store.rename_category(path, new_name)?;
                self.columns.rebase(&renames);
            }
            EntryTarget::Leaf { path, .. } => self.store.rename_leaf(path, new_name)?,
        }
        self.settle();
        Ok(())
    }

    pub fn removal_impact(&self, path: &CategoryPath) -> Result<RemovalImpact> {
        self.store.removal_impact(path)
    }

    /// Delete with the configured cascade policy.
    pub fn delete(&mut self, target: &EntryTarget) -> Result<Removal> {
        self.delete_with(target, self.delete_policy)
    }

    pub fn delete_with(&mut self, target: &EntryTarget, policy: CascadePolicy) -> Result<Removal> {
        let removal = match target {
            EntryTarget::Category(path) => {
                let removal = self.store.remove_category(path, policy)?;
                self.columns.rebase(&removal.renamed_categories);
                removal
            }
            EntryTarget::Leaf { path, .. } => {
                let leaf = self.store.remove_leaf(path)?;
                Removal {
                    removed_leaves: vec![leaf.path],
                    ..Removal::default()
                }
            }
        };
        self.settle();
        Ok(removal)
    }

    /// Context and menu for a right-click on `pane_index`; `None` for a stale pane.
    pub fn context_at(
        &self,
        pane_index: usize,
        target: Option<&EntryTarget>,
    ) -> Option<(Context, Vec<MenuAction>)> {
        let pane = self.columns.pane(pane_index)?;
        let context = context::detect(pane, target);
        let actions = context.actions();
        Some((context, actions))
    }
}
