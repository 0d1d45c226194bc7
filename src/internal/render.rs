//! Plain-text rendering of stories and comment trees.
//!
//! Replies start collapsed; [`CommentView`] remembers which nodes the user
//! opened. Rendering never fetches anything, it only walks what the resolver
//! already produced.

use std::collections::HashSet;

use jiff::Timestamp;

use crate::internal::models::{CommentNode, Story};
use crate::utils::datetime::format_relative_time;
use crate::utils::html::html_to_text;
use crate::utils::url::display_host;

pub const DELETED_MESSAGE: &str = "This comment was deleted by the author.";
pub const DEAD_MESSAGE: &str = "This comment was removed by a moderator.";
const MIN_BODY_WIDTH: usize = 20;

/// Which comment nodes currently show their replies.
#[derive(Debug, Default, Clone)]
pub struct CommentView {
    expanded: HashSet<u32>,
}

impl CommentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: u32) -> bool {
        self.expanded.contains(&id)
    }

    /// Flip a node's toggle. Returns the new state.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    /// Open every node in the given trees.
    pub fn expand_all(&mut self, nodes: &[CommentNode]) {
        let mut ids = Vec::new();
        for node in nodes {
            node.collect_ids(&mut ids);
        }
        self.expanded.extend(ids);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub width: usize,
    pub indent: usize,
    pub now: Timestamp,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            indent: 2,
            now: Timestamp::now(),
        }
    }
}

pub fn reply_toggle_label(count: usize, expanded: bool) -> String {
    match (expanded, count) {
        (true, _) => "Hide replies ▲".to_string(),
        (false, 1) => "View 1 reply ▼".to_string(),
        (false, n) => format!("View {} replies ▼", n),
    }
}

/// Render one node and, if it is expanded, its replies.
pub fn render_comment(
    node: &CommentNode,
    depth: usize,
    view: &CommentView,
    opts: &RenderOptions,
) -> Vec<String> {
    let pad = " ".repeat(depth * opts.indent);
    let comment = &node.comment;
    let mut lines = Vec::new();

    if comment.deleted {
        lines.push(format!("{}{}", pad, DELETED_MESSAGE));
    } else if comment.dead {
        lines.push(format!("{}{}", pad, DEAD_MESSAGE));
    } else {
        let author = comment.by.as_deref().unwrap_or("unknown");
        let age = format_relative_time(comment.time, opts.now);
        if age.is_empty() {
            lines.push(format!("{}{}", pad, author));
        } else {
            lines.push(format!("{}{} • {}", pad, author, age));
        }

        if let Some(text) = comment.text.as_deref() {
            let width = opts.width.saturating_sub(pad.len()).max(MIN_BODY_WIDTH);
            let body = html_to_text(text, width);
            lines.extend(body.lines().map(|line| format!("{}{}", pad, line)));
        }
    }

    if !node.children.is_empty() {
        let expanded = view.is_expanded(node.id());
        lines.push(format!(
            "{}{}",
            pad,
            reply_toggle_label(node.children.len(), expanded)
        ));
        if expanded {
            for child in &node.children {
                lines.extend(render_comment(child, depth + 1, view, opts));
            }
        }
    }

    lines
}

/// Render top-level comments separated by blank lines.
pub fn render_comments(
    nodes: &[CommentNode],
    view: &CommentView,
    opts: &RenderOptions,
) -> Vec<String> {
    if nodes.is_empty() {
        return vec!["No comments available.".to_string()];
    }

    let mut lines = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(render_comment(node, 0, view, opts));
    }
    lines
}

/// Title block shown above a story's comments.
pub fn render_story_header(story: &Story, opts: &RenderOptions) -> Vec<String> {
    let mut lines: Vec<String> = textwrap::wrap(&story.title, opts.width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();

    let mut meta = format!(
        "by {} | score: {} | {} comments",
        story.by.as_deref().unwrap_or("unknown"),
        story.score,
        story.descendants
    );
    let age = format_relative_time(story.time, opts.now);
    if !age.is_empty() {
        meta.push_str(" | ");
        meta.push_str(&age);
    }
    lines.push(meta);

    if let Some(url) = story.url.as_deref() {
        let host = display_host(url).unwrap_or_else(|| url.to_string());
        lines.push(format!("{} ↗", host));
    }

    if let Some(text) = story.text.as_deref() {
        lines.push(String::new());
        lines.extend(html_to_text(text, opts.width).lines().map(str::to_string));
    }

    lines
}

/// Two-line listing row: numbered title with host, then score and age.
pub fn render_story_row(position: usize, story: &Story, opts: &RenderOptions) -> Vec<String> {
    let prefix = format!("{:>3}. ", position);
    let mut title = story.title.clone();
    if let Some(host) = story.url.as_deref().and_then(display_host) {
        title.push_str(&format!(" ({})", host));
    }

    let wrap_opts = textwrap::Options::new(opts.width.max(prefix.len() + MIN_BODY_WIDTH))
        .initial_indent(&prefix)
        .subsequent_indent("     ");
    let mut lines: Vec<String> = textwrap::wrap(&title, wrap_opts)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();

    lines.push(format!(
        "     {} points by {} {} | {} comments",
        story.score,
        story.by.as_deref().unwrap_or("unknown"),
        format_relative_time(story.time, opts.now),
        story.descendants
    ));
    lines
}
