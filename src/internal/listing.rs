//! Paginated story listings, one accumulated list per category.
//!
//! A page is fetched in three steps so the store is never borrowed across an
//! await: [`ListingStore::begin`] claims the single global in-flight slot,
//! [`ListingStore::fetch_page`] talks to the source, and
//! [`ListingStore::complete`] folds the result back in. `fetch_more` runs all
//! three for callers that own the store for the whole request.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use futures::future::join_all;

use crate::api::{ItemSource, StoryListType};
use crate::config::AppConfig;
use crate::internal::models::{Item, Story};

pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch stories. Please try again.";

#[derive(Debug, Default)]
struct CategoryState {
    stories: Vec<Story>,
    ids: HashSet<u32>,
    exhausted: bool,
    /// Bumped on reset so pages requested before the reset are discarded.
    generation: u64,
}

/// A claimed page fetch. Hand it back to [`ListingStore::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub list_type: StoryListType,
    pub offset: usize,
    pub limit: usize,
    generation: u64,
}

#[derive(Debug)]
pub struct ListingStore {
    categories: HashMap<StoryListType, CategoryState>,
    page_size: usize,
    loading: bool,
    error: Option<String>,
}

impl ListingStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            categories: HashMap::new(),
            page_size: page_size.max(1),
            loading: false,
            error: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.page_size)
    }

    pub fn stories(&self, list_type: StoryListType) -> &[Story] {
        self.categories
            .get(&list_type)
            .map(|state| state.stories.as_slice())
            .unwrap_or_default()
    }

    /// False once a page came back short; stays false until reset.
    pub fn has_more(&self, list_type: StoryListType) -> bool {
        self.categories
            .get(&list_type)
            .is_none_or(|state| !state.exhausted)
    }

    /// Shared across every category.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last fetch error from any category.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Claim the in-flight slot for the next page of `list_type`.
    ///
    /// Returns `None` while any fetch is outstanding or when the category is
    /// exhausted.
    pub fn begin(&mut self, list_type: StoryListType) -> Option<PageRequest> {
        if self.loading {
            tracing::debug!(%list_type, "fetch already in flight, skipping");
            return None;
        }
        if !self.has_more(list_type) {
            tracing::debug!(%list_type, "no more stories, skipping");
            return None;
        }

        let state = self.categories.entry(list_type).or_default();
        let request = PageRequest {
            list_type,
            offset: state.stories.len(),
            limit: self.page_size,
            generation: state.generation,
        };

        self.loading = true;
        self.error = None;
        Some(request)
    }

    /// Fetch the ranking and look up the requested slice of it.
    ///
    /// Only a failed ranking fetch fails the page. Ids that resolve to
    /// nothing, to a non-story, or whose lookup fails are dropped.
    pub async fn fetch_page<S>(source: &S, request: &PageRequest) -> Result<Vec<Story>>
    where
        S: ItemSource,
    {
        let ids = source.story_ids(request.list_type).await?;
        let start = request.offset.min(ids.len());
        let end = request.offset.saturating_add(request.limit).min(ids.len());

        let slice = &ids[start..end];
        let items = join_all(slice.iter().map(|&id| source.item(id))).await;

        Ok(slice
            .iter()
            .zip(items)
            .filter_map(|(&id, item)| match item {
                Ok(Some(Item::Story(story))) => Some(story),
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!(id, error = %format!("{e:#}"), "story lookup failed, skipping");
                    None
                }
            })
            .collect())
    }

    /// Fold a finished page into the store and release the in-flight slot.
    ///
    /// Returns how many stories were appended.
    pub fn complete(&mut self, request: PageRequest, result: Result<Vec<Story>>) -> usize {
        self.loading = false;

        let state = self.categories.entry(request.list_type).or_default();
        if state.generation != request.generation {
            tracing::debug!(list_type = %request.list_type, "category reset during fetch, dropping page");
            return 0;
        }

        match result {
            Ok(stories) => {
                let before = state.stories.len();
                for story in stories {
                    if state.ids.insert(story.id) {
                        state.stories.push(story);
                    }
                }
                let added = state.stories.len() - before;
                // A short page is taken to mean the ranking ran out
                state.exhausted = added != request.limit;
                self.error = None;

                tracing::info!(
                    list_type = %request.list_type,
                    offset = request.offset,
                    added,
                    has_more = !state.exhausted,
                    "fetched stories"
                );
                added
            }
            Err(e) => {
                tracing::warn!(
                    list_type = %request.list_type,
                    error = %format!("{e:#}"),
                    "failed to fetch stories"
                );
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
                0
            }
        }
    }

    /// Fetch and append the next page of `list_type`.
    ///
    /// A no-op returning 0 when another fetch is in flight or the category is
    /// exhausted.
    pub async fn fetch_more<S>(&mut self, source: &S, list_type: StoryListType) -> usize
    where
        S: ItemSource,
    {
        let Some(request) = self.begin(list_type) else {
            return 0;
        };
        let result = Self::fetch_page(source, &request).await;
        self.complete(request, result)
    }

    /// Forget everything loaded for `list_type` and clear the shared error.
    pub fn reset_category(&mut self, list_type: StoryListType) {
        let state = self.categories.entry(list_type).or_default();
        state.stories.clear();
        state.ids.clear();
        state.exhausted = false;
        state.generation += 1;
        self.error = None;
        tracing::debug!(%list_type, "category reset");
    }
}
