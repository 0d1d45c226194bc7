use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, bail};

use super::{ItemSource, StoryListType};
use crate::internal::models::{Comment, Item, Story};

/// In-memory item source for tests, benches and offline demos.
///
/// Lookups can be delayed per id to control completion order, and ids can be
/// marked as failing to simulate transport errors. Every completed lookup is
/// recorded in order.
#[derive(Default)]
pub struct MemorySource {
    items: HashMap<u32, Item>,
    rankings: HashMap<StoryListType, Vec<u32>>,
    failing_items: HashSet<u32>,
    failing_rankings: HashSet<StoryListType>,
    delays: HashMap<u32, Duration>,
    completed: Mutex<Vec<u32>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.insert(item);
        self
    }

    pub fn with_story(self, story: Story) -> Self {
        self.with_item(Item::Story(story))
    }

    pub fn with_comment(self, comment: Comment) -> Self {
        self.with_item(Item::Comment(comment))
    }

    pub fn with_ranking(mut self, list_type: StoryListType, ids: Vec<u32>) -> Self {
        self.set_ranking(list_type, ids);
        self
    }

    pub fn with_delay(mut self, id: u32, delay: Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    pub fn with_failing_item(mut self, id: u32) -> Self {
        self.failing_items.insert(id);
        self
    }

    pub fn insert(&mut self, item: Item) {
        if let Some(id) = item.id() {
            self.items.insert(id, item);
        }
    }

    pub fn set_ranking(&mut self, list_type: StoryListType, ids: Vec<u32>) {
        self.rankings.insert(list_type, ids);
    }

    pub fn set_ranking_failure(&mut self, list_type: StoryListType, failing: bool) {
        if failing {
            self.failing_rankings.insert(list_type);
        } else {
            self.failing_rankings.remove(&list_type);
        }
    }

    pub fn set_item_failure(&mut self, id: u32, failing: bool) {
        if failing {
            self.failing_items.insert(id);
        } else {
            self.failing_items.remove(&id);
        }
    }

    /// Ids whose lookups have finished, in completion order.
    pub fn completed_lookups(&self) -> Vec<u32> {
        self.completed
            .lock()
            .map(|completed| completed.clone())
            .unwrap_or_default()
    }

    pub fn lookup_count(&self) -> usize {
        self.completed
            .lock()
            .map(|completed| completed.len())
            .unwrap_or_default()
    }

    pub fn clear_lookups(&self) {
        if let Ok(mut completed) = self.completed.lock() {
            completed.clear();
        }
    }
}

impl ItemSource for MemorySource {
    async fn item(&self, id: u32) -> Result<Option<Item>> {
        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
        if let Ok(mut completed) = self.completed.lock() {
            completed.push(id);
        }
        if self.failing_items.contains(&id) {
            bail!("simulated transport failure for item {}", id);
        }
        Ok(self.items.get(&id).cloned())
    }

    async fn story_ids(&self, list_type: StoryListType) -> Result<Vec<u32>> {
        if self.failing_rankings.contains(&list_type) {
            bail!("simulated transport failure for list {}", list_type);
        }
        Ok(self.rankings.get(&list_type).cloned().unwrap_or_default())
    }
}

/// Story fixture with the given comment ids.
pub fn story(id: u32, kids: Vec<u32>) -> Story {
    Story {
        id,
        by: Some(format!("author{}", id)),
        time: 1_600_000_000,
        kids,
        title: format!("Story {}", id),
        score: 1,
        ..Default::default()
    }
}

/// Comment fixture with the given reply ids.
pub fn comment(id: u32, parent: u32, kids: Vec<u32>) -> Comment {
    Comment {
        id,
        by: Some(format!("user{}", id)),
        time: 1_600_000_000,
        kids,
        text: Some(format!("<p>comment {}</p>", id)),
        parent,
        ..Default::default()
    }
}
