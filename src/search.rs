use crate::favorites::Favorites;
use crate::hierarchy::{CategoryPath, Hierarchy};
use crate::matcher::Matcher;
use crate::ranking::{order, Candidate, RankedEntry};
use crate::recents::{is_recent_query, RecentEntry, Recents};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    /// The column stack drives the display.
    #[default]
    Browsing,
    Searching(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Report categories whose name matches, not just leaves.
    pub include_categories: bool,
    /// Also report every leaf filed anywhere under a matching category.
    pub expand_category_matches: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_categories: true,
            expand_category_matches: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentView {
    pub entry: RecentEntry,
    pub favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults {
    /// `@recent`: stored order, newest first.
    Recent(Vec<RecentView>),
    /// Ranked matches of a name query.
    Matches(Vec<RankedEntry>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Recent(list) => list.len(),
            SearchResults::Matches(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchController {
    state: SearchState,
    options: SearchOptions,
}

impl SearchController {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            state: SearchState::Browsing,
            options,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn query(&self) -> Option<&str> {
        match &self.state {
            SearchState::Browsing => None,
            SearchState::Searching(q) => Some(q),
        }
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state, SearchState::Searching(_))
    }

    /// Update the query. A blank query returns to browsing.
    pub fn set_query(&mut self, query: &str) -> &SearchState {
        self.state = if query.trim().is_empty() {
            SearchState::Browsing
        } else {
            SearchState::Searching(query.to_string())
        };
        tracing::debug!(state = ?self.state, "search state changed");
        &self.state
    }

    pub fn clear(&mut self) {
        self.state = SearchState::Browsing;
    }

    /// Results for the current query, `None` while browsing.
    pub fn results(
        &self,
        hierarchy: &Hierarchy,
        favorites: &Favorites,
        recents: &Recents,
    ) -> Option<SearchResults> {
        let query = self.query()?;
        if is_recent_query(query) {
            return Some(SearchResults::Recent(recent_views(recents, favorites)));
        }
        let candidates = scan(hierarchy, query, self.options);
        Some(SearchResults::Matches(order(candidates, favorites)))
    }
}

pub fn recent_views(recents: &Recents, favorites: &Favorites) -> Vec<RecentView> {
    recents
        .iter()
        .map(|entry| RecentView {
            favorite: favorites.is_leaf_favorite(&entry.path, entry.kind),
            entry: entry.clone(),
        })
        .collect()
}

/// Flat scan of the whole hierarchy for names matching `query`.
///
/// Every category and leaf is visited exactly once, without recursion.
pub fn scan(hierarchy: &Hierarchy, query: &str, options: SearchOptions) -> Vec<Candidate> {
    let matcher = Matcher::new(query);
    let mut out = Vec::new();
    // Depth of the shallowest matching ancestor whose subtree is being expanded.
    let mut expanding: Option<usize> = None;
    for node in hierarchy.walk(&CategoryPath::root()) {
        let depth = node.path.depth();
        if expanding.is_some_and(|d| depth <= d) {
            expanding = None;
        }
        if !node.path.is_root() && matcher.is_match(&node.category.name) {
            if options.include_categories {
                out.push(Candidate::category(
                    node.path,
                    &node.category.name,
                    &node.category.icon,
                ));
            }
            if options.expand_category_matches && expanding.is_none() {
                expanding = Some(depth);
            }
        }
        for path in node.category.leaf_paths() {
            let Some(leaf) = hierarchy.leaf(path) else {
                continue;
            };
            if expanding.is_some() || matcher.is_match(&leaf.name) {
                out.push(Candidate::leaf(&leaf.name, leaf.path.clone(), leaf.kind));
            }
        }
    }
    out
}
