use crate::api::ItemSource;
use crate::config::AppConfig;
use crate::error::{HnError, HnResult};
use crate::internal::models::{CommentNode, Story};
use crate::internal::resolver::{CommentResolver, DepthLimit};

/// State for a single opened story: a partial comment tree on open, then an
/// optional "show all comments" merge.
///
/// Nothing is cached across stories. Opening the same story again resolves it
/// from scratch.
#[derive(Debug)]
pub struct StoryDetailView {
    pub story: Option<Story>,
    pub comments: Vec<CommentNode>,
    pub loading: bool,
    pub error: Option<String>,
    pub expanded_all: bool,
    root_limit: usize,
    initial_depth: usize,
}

impl StoryDetailView {
    pub fn new(root_limit: usize, initial_depth: usize) -> Self {
        Self {
            story: None,
            comments: Vec::new(),
            loading: false,
            error: None,
            expanded_all: false,
            root_limit,
            initial_depth,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.comments_limit, config.initial_depth)
    }

    pub fn story_id(&self) -> Option<u32> {
        self.story.as_ref().map(|story| story.id)
    }

    /// Open a story with the initial breadth and depth limits.
    ///
    /// Also the retry path: calling it again after a failure starts over.
    pub async fn load<S>(&mut self, source: &S, id: u32) -> HnResult<()>
    where
        S: ItemSource,
    {
        self.reset();
        self.loading = true;

        let result = CommentResolver::new(source)
            .resolve_story(id, Some(self.root_limit), DepthLimit::Levels(self.initial_depth))
            .await;
        self.loading = false;

        match result {
            Ok(detail) => {
                self.story = Some(detail.story);
                self.comments = detail.comments;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Parse a raw identifier and open that story. Bad input fails before
    /// any lookup is issued.
    pub async fn load_raw<S>(&mut self, source: &S, raw_id: &str) -> HnResult<()>
    where
        S: ItemSource,
    {
        match crate::error::parse_story_id(raw_id) {
            Ok(id) => self.load(source, id).await,
            Err(e) => {
                self.reset();
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Resolve every comment of the open story and append the top-level ones
    /// not shown yet. Returns how many were added.
    ///
    /// On failure the current tree stays as it is and the error is recorded.
    pub async fn expand_all<S>(&mut self, source: &S) -> HnResult<usize>
    where
        S: ItemSource,
    {
        let Some(id) = self.story_id() else {
            return Err(HnError::InvalidInput("no story loaded".to_string()));
        };

        match CommentResolver::new(source)
            .expand_all(id, &mut self.comments)
            .await
        {
            Ok(added) => {
                self.expanded_all = true;
                self.error = None;
                Ok(added)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Whether a "show all comments" action is worth offering.
    pub fn can_show_all(&self) -> bool {
        match &self.story {
            Some(story) => !self.expanded_all && self.comments.len() < story.descendants as usize,
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.story = None;
        self.comments.clear();
        self.loading = false;
        self.error = None;
        self.expanded_all = false;
    }
}
