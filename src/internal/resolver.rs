//! Comment tree materialization.
//!
//! Trees are built bottom-up from point lookups: each call produces a fresh,
//! owned subtree and nothing is shared between resolves. Sibling lookups run
//! concurrently on the caller's task via `join_all`, which yields results in
//! input order, so completion order never leaks into the tree.
//!
//! Only the root story lookup can fail an operation. Anything that goes wrong
//! below it (missing item, wrong type, removed comment, transport error)
//! prunes that branch and its whole subtree.

use std::collections::HashSet;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};

use crate::api::ItemSource;
use crate::error::{HnError, HnResult};
use crate::internal::models::{CommentNode, Item, StoryDetail};

/// Hard ceiling applied to `DepthLimit::Unbounded`.
///
/// Reply ids are assumed to form a tree but that is never verified; the
/// ceiling keeps an unexpected cycle from recursing forever.
pub const DEPTH_CEILING: usize = 128;

/// How many reply levels to resolve below each top-level comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthLimit {
    Levels(usize),
    Unbounded,
}

impl DepthLimit {
    pub fn max_depth(self) -> usize {
        match self {
            Self::Levels(levels) => levels.min(DEPTH_CEILING),
            Self::Unbounded => DEPTH_CEILING,
        }
    }
}

/// Resolves stories and their comment trees through an [`ItemSource`].
pub struct CommentResolver<'a, S> {
    source: &'a S,
}

impl<'a, S> CommentResolver<'a, S>
where
    S: ItemSource,
{
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Resolve one comment and, while `depth < max_depth`, its replies.
    ///
    /// Returns `None` when the branch is pruned.
    pub async fn resolve_node(
        &self,
        id: u32,
        depth: usize,
        max_depth: DepthLimit,
    ) -> Option<CommentNode> {
        resolve_node(self.source, id, depth, max_depth.max_depth()).await
    }

    /// Look up a story and resolve the first `root_limit` of its top-level
    /// comments (all of them when `None`), each down to `max_depth`.
    pub async fn resolve_story(
        &self,
        id: u32,
        root_limit: Option<usize>,
        max_depth: DepthLimit,
    ) -> HnResult<StoryDetail> {
        let story = match self.source.item(id).await {
            Ok(Some(Item::Story(story))) => story,
            Ok(_) => {
                tracing::warn!(id, "story lookup returned no story");
                return Err(HnError::NotFound(id));
            }
            Err(e) => {
                tracing::warn!(id, error = %format!("{e:#}"), "story lookup failed");
                return Err(HnError::Transport(e));
            }
        };

        let selected = match root_limit {
            Some(limit) => &story.kids[..limit.min(story.kids.len())],
            None => &story.kids[..],
        };

        let comments = resolve_siblings(self.source, selected, 0, max_depth.max_depth()).await;
        tracing::info!(
            id,
            requested = selected.len(),
            resolved = comments.len(),
            "resolved story comments"
        );

        Ok(StoryDetail { story, comments })
    }

    /// Fully resolve a story and append every top-level comment not already
    /// present in `existing`.
    ///
    /// Roots already in `existing` keep their current (possibly shallower)
    /// subtree. On failure `existing` is left untouched. Returns the number of
    /// roots appended.
    pub async fn expand_all(&self, id: u32, existing: &mut Vec<CommentNode>) -> HnResult<usize> {
        let detail = self.resolve_story(id, None, DepthLimit::Unbounded).await?;
        let added = merge_new_roots(existing, detail.comments);
        tracing::info!(id, added, total = existing.len(), "expanded comments");
        Ok(added)
    }
}

/// Append the roots of `incoming` whose ids are not yet in `existing`,
/// keeping `incoming` order. Returns the number appended.
pub fn merge_new_roots(existing: &mut Vec<CommentNode>, incoming: Vec<CommentNode>) -> usize {
    let mut present: HashSet<u32> = existing.iter().map(CommentNode::id).collect();
    let before = existing.len();
    existing.extend(
        incoming
            .into_iter()
            .filter(|node| present.insert(node.id())),
    );
    existing.len() - before
}

fn resolve_node<S>(
    source: &S,
    id: u32,
    depth: usize,
    max_depth: usize,
) -> BoxFuture<'_, Option<CommentNode>>
where
    S: ItemSource,
{
    async move {
        let comment = match source.item(id).await {
            Ok(Some(Item::Comment(comment))) => comment,
            Ok(Some(_)) => {
                tracing::debug!(id, "item is not a comment, pruning");
                return None;
            }
            Ok(None) => {
                tracing::debug!(id, "comment missing, pruning");
                return None;
            }
            Err(e) => {
                tracing::debug!(id, error = %format!("{e:#}"), "comment lookup failed, pruning");
                return None;
            }
        };

        if comment.is_removed() {
            tracing::debug!(
                id,
                deleted = comment.deleted,
                dead = comment.dead,
                "comment removed, pruning"
            );
            return None;
        }

        let children = if depth < max_depth && !comment.kids.is_empty() {
            resolve_siblings(source, &comment.kids, depth + 1, max_depth).await
        } else {
            Vec::new()
        };

        Some(CommentNode { comment, children })
    }
    .boxed()
}

/// Resolve a sibling list concurrently, keeping the list's order and dropping
/// pruned entries. A repeated id resolves once, at its first position.
async fn resolve_siblings<S>(
    source: &S,
    ids: &[u32],
    depth: usize,
    max_depth: usize,
) -> Vec<CommentNode>
where
    S: ItemSource,
{
    let mut seen = HashSet::with_capacity(ids.len());
    let lookups: Vec<_> = ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .map(|id| resolve_node(source, id, depth, max_depth))
        .collect();

    join_all(lookups).await.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::{MemorySource, comment, story};
    use crate::internal::models::Comment;
    use std::time::Duration;

    fn ids(nodes: &[CommentNode]) -> Vec<u32> {
        nodes.iter().map(CommentNode::id).collect()
    }

    /// Story 1 with roots 10..=15; root 10 has a three-level reply chain.
    fn wide_story() -> MemorySource {
        MemorySource::new()
            .with_story(story(1, vec![10, 11, 12, 13, 14, 15]))
            .with_comment(comment(10, 1, vec![100, 101]))
            .with_comment(comment(11, 1, vec![]))
            .with_comment(comment(12, 1, vec![]))
            .with_comment(comment(13, 1, vec![]))
            .with_comment(comment(14, 1, vec![]))
            .with_comment(comment(15, 1, vec![]))
            .with_comment(comment(100, 10, vec![1000]))
            .with_comment(comment(101, 10, vec![]))
            .with_comment(comment(1000, 100, vec![10000]))
            .with_comment(comment(10000, 1000, vec![]))
    }

    #[tokio::test]
    async fn root_limit_and_depth_cap_bound_the_tree() {
        let source = wide_story();
        let resolver = CommentResolver::new(&source);

        let detail = resolver
            .resolve_story(1, Some(5), DepthLimit::Levels(1))
            .await
            .unwrap();

        assert_eq!(ids(&detail.comments), vec![10, 11, 12, 13, 14]);
        for root in &detail.comments {
            assert!(root.height() <= 1);
        }
        assert_eq!(ids(&detail.comments[0].children), vec![100, 101]);
        assert!(detail.comments[0].children[0].children.is_empty());
        // Nothing below the cap was ever requested
        assert!(!source.completed_lookups().contains(&1000));
        assert!(!source.completed_lookups().contains(&15));
    }

    #[tokio::test]
    async fn zero_depth_fetches_no_children() {
        let source = wide_story();
        let resolver = CommentResolver::new(&source);

        let node = resolver.resolve_node(10, 0, DepthLimit::Levels(0)).await.unwrap();

        assert!(node.children.is_empty());
        assert_eq!(source.completed_lookups(), vec![10]);
    }

    #[tokio::test]
    async fn unbounded_depth_resolves_whole_chain() {
        let source = wide_story();
        let resolver = CommentResolver::new(&source);

        let node = resolver.resolve_node(10, 0, DepthLimit::Unbounded).await.unwrap();

        assert_eq!(node.height(), 3);
        assert_eq!(node.subtree_len(), 5);
    }

    #[tokio::test]
    async fn deleted_comment_is_pruned_at_any_depth() {
        let source = MemorySource::new()
            .with_comment(Comment {
                deleted: true,
                ..comment(20, 1, vec![21])
            })
            .with_comment(comment(21, 20, vec![]));
        let resolver = CommentResolver::new(&source);

        for (depth, max_depth) in [
            (0, DepthLimit::Levels(0)),
            (0, DepthLimit::Levels(3)),
            (5, DepthLimit::Unbounded),
        ] {
            assert_eq!(resolver.resolve_node(20, depth, max_depth).await, None);
        }
        // Children of a removed comment are never looked up
        assert!(!source.completed_lookups().contains(&21));
    }

    #[tokio::test]
    async fn dead_missing_and_failing_branches_are_pruned() {
        let source = MemorySource::new()
            .with_comment(comment(30, 1, vec![31, 32, 33, 34, 35]))
            .with_comment(Comment {
                dead: true,
                ..comment(31, 30, vec![])
            })
            // 32 does not exist
            .with_comment(comment(33, 30, vec![36]))
            .with_comment(comment(34, 30, vec![]))
            .with_story(story(35, vec![]))
            .with_comment(comment(36, 33, vec![]))
            .with_failing_item(34);
        let resolver = CommentResolver::new(&source);

        let node = resolver.resolve_node(30, 0, DepthLimit::Unbounded).await.unwrap();

        assert_eq!(ids(&node.children), vec![33]);
        assert_eq!(ids(&node.children[0].children), vec![36]);
    }

    #[tokio::test(start_paused = true)]
    async fn children_keep_source_order_when_completing_in_reverse() {
        let source = MemorySource::new()
            .with_comment(comment(40, 1, vec![41, 42, 43]))
            .with_comment(comment(41, 40, vec![]))
            .with_comment(comment(42, 40, vec![]))
            .with_comment(comment(43, 40, vec![]))
            .with_delay(41, Duration::from_millis(60))
            .with_delay(42, Duration::from_millis(30));
        let resolver = CommentResolver::new(&source);

        let node = resolver.resolve_node(40, 0, DepthLimit::Levels(1)).await.unwrap();

        assert_eq!(source.completed_lookups(), vec![40, 43, 42, 41]);
        assert_eq!(ids(&node.children), vec![41, 42, 43]);
    }

    #[tokio::test]
    async fn repeated_child_ids_resolve_once() {
        let source = MemorySource::new()
            .with_comment(comment(50, 1, vec![51, 52, 51]))
            .with_comment(comment(51, 50, vec![]))
            .with_comment(comment(52, 50, vec![]));
        let resolver = CommentResolver::new(&source);

        let node = resolver.resolve_node(50, 0, DepthLimit::Levels(1)).await.unwrap();

        assert_eq!(ids(&node.children), vec![51, 52]);
    }

    #[tokio::test]
    async fn self_referencing_reply_stops_at_ceiling() {
        let source = MemorySource::new().with_comment(comment(60, 60, vec![60]));
        let resolver = CommentResolver::new(&source);

        let node = resolver.resolve_node(60, 0, DepthLimit::Unbounded).await.unwrap();

        assert_eq!(node.height(), DEPTH_CEILING);
    }

    #[tokio::test]
    async fn story_lookup_failures_are_reported() {
        let source = MemorySource::new()
            .with_comment(comment(70, 1, vec![]))
            .with_failing_item(71);
        let resolver = CommentResolver::new(&source);

        let missing = resolver.resolve_story(404, None, DepthLimit::Levels(1)).await;
        assert!(matches!(missing, Err(HnError::NotFound(404))));

        let wrong_type = resolver.resolve_story(70, None, DepthLimit::Levels(1)).await;
        assert!(matches!(wrong_type, Err(HnError::NotFound(70))));

        let transport = resolver.resolve_story(71, None, DepthLimit::Levels(1)).await;
        assert!(matches!(transport, Err(HnError::Transport(_))));
    }

    #[tokio::test]
    async fn story_without_kids_has_no_comments() {
        let source = MemorySource::new().with_story(story(2, vec![]));
        let resolver = CommentResolver::new(&source);

        let detail = resolver.resolve_story(2, Some(5), DepthLimit::Levels(1)).await.unwrap();

        assert_eq!(detail.story.id, 2);
        assert!(detail.comments.is_empty());
    }

    #[tokio::test]
    async fn expand_all_appends_only_new_roots() {
        let mut source = MemorySource::new()
            .with_story(story(1, vec![10, 11]))
            .with_comment(comment(10, 1, vec![100]))
            .with_comment(comment(11, 1, vec![]))
            .with_comment(comment(100, 10, vec![1000]))
            .with_comment(comment(1000, 100, vec![]));
        let detail = CommentResolver::new(&source)
            .resolve_story(1, Some(5), DepthLimit::Levels(0))
            .await
            .unwrap();
        let mut comments = detail.comments;
        let before = comments.clone();

        // A new root shows up before the user asks for everything
        source.insert(Item::Story(story(1, vec![10, 11, 12])));
        source.insert(Item::Comment(comment(12, 1, vec![])));
        let resolver = CommentResolver::new(&source);

        let added = resolver.expand_all(1, &mut comments).await.unwrap();

        assert_eq!(added, 1);
        assert_eq!(ids(&comments), vec![10, 11, 12]);
        // 10 keeps its shallow subtree
        assert_eq!(comments[0], before[0]);
        assert!(comments[0].children.is_empty());
        assert_eq!(comments[1], before[1]);
    }

    #[tokio::test]
    async fn expand_all_twice_adds_nothing_new() {
        let source = wide_story();
        let resolver = CommentResolver::new(&source);
        let mut comments = resolver
            .resolve_story(1, Some(2), DepthLimit::Levels(1))
            .await
            .unwrap()
            .comments;

        let first = resolver.expand_all(1, &mut comments).await.unwrap();
        let after_first = ids(&comments);
        let second = resolver.expand_all(1, &mut comments).await.unwrap();

        assert_eq!(first, 4);
        assert_eq!(second, 0);
        assert_eq!(ids(&comments), after_first);
        assert_eq!(after_first, vec![10, 11, 12, 13, 14, 15]);
    }

    #[tokio::test]
    async fn expand_all_failure_leaves_tree_untouched() {
        let source = wide_story().with_failing_item(1);
        let resolver = CommentResolver::new(&source);
        let mut comments = vec![CommentNode {
            comment: comment(10, 1, vec![]),
            children: Vec::new(),
        }];

        let result = resolver.expand_all(1, &mut comments).await;

        assert!(matches!(result, Err(HnError::Transport(_))));
        assert_eq!(ids(&comments), vec![10]);
    }

    #[test]
    fn merge_skips_ids_already_present_and_duplicates_in_incoming() {
        let node = |id| CommentNode {
            comment: comment(id, 1, vec![]),
            children: Vec::new(),
        };
        let mut existing = vec![node(1), node(2)];

        let added = merge_new_roots(&mut existing, vec![node(2), node(3), node(1), node(3), node(4)]);

        assert_eq!(added, 2);
        assert_eq!(ids(&existing), vec![1, 2, 3, 4]);
    }

    #[test]
    fn depth_limit_is_clamped() {
        assert_eq!(DepthLimit::Levels(2).max_depth(), 2);
        assert_eq!(DepthLimit::Levels(10_000).max_depth(), DEPTH_CEILING);
        assert_eq!(DepthLimit::Unbounded.max_depth(), DEPTH_CEILING);
    }
}
