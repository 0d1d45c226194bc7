use serde::Deserialize;

/// A single entry from the item endpoint.
///
/// The API tags every item with a `type` field; only stories and comments are
/// browsed, everything else (jobs, polls, poll options) lands in `Other`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Story(Story),
    Comment(Comment),
    #[serde(other)]
    Other,
}

impl Item {
    pub fn id(&self) -> Option<u32> {
        match self {
            Self::Story(story) => Some(story.id),
            Self::Comment(comment) => Some(comment.id),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Story {
    pub id: u32,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub kids: Vec<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub score: u32,
    /// Total comment count reported by the API. Usually larger than what a
    /// depth- or breadth-limited resolve returns.
    #[serde(default)]
    pub descendants: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Comment {
    pub id: u32,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub kids: Vec<u32>,
    #[serde(default)]
    pub text: Option<String>,
    /// Removed by its author.
    #[serde(default)]
    pub deleted: bool,
    /// Removed by a moderator.
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub parent: u32,
}

impl Comment {
    pub fn is_removed(&self) -> bool {
        self.deleted || self.dead
    }
}

/// A comment with its replies resolved up to whatever depth cap was active.
///
/// Replies below the cap are simply not present; `comment.kids` still lists
/// every child id the API reported.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub comment: Comment,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn id(&self) -> u32 {
        self.comment.id
    }

    /// Number of resolved levels below this node (0 for a leaf).
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CommentNode::subtree_len)
            .sum::<usize>()
    }

    /// Depth-first walk over every id in the subtree.
    pub fn collect_ids(&self, out: &mut Vec<u32>) {
        out.push(self.id());
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryDetail {
    pub story: Story,
    pub comments: Vec<CommentNode>,
}
