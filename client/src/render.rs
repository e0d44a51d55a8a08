//! Plain-text rendering of boards, scrolls and mark threads.

use std::fmt::Write;

use chrono::NaiveDateTime;
use owo_colors::OwoColorize;

use crate::{
    boards::Board,
    models::{Comment, Post, PostDetail},
    thread::CommentNode,
    view::ThreadView,
};

const INDENT: &str = "    ";

/// How far a reply is indented relative to its true depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndentPolicy {
    /// Indent grows with depth up to the given level.
    Capped(usize),
    Proportional,
}

impl Default for IndentPolicy {
    fn default() -> Self {
        IndentPolicy::Capped(1)
    }
}

impl IndentPolicy {
    pub fn level(self, depth: usize) -> usize {
        match self {
            IndentPolicy::Capped(max) => depth.min(max),
            IndentPolicy::Proportional => depth,
        }
    }
}

/// `just now`, `5m ago`, `3h ago`, `2d ago`, then the calendar date.
pub fn relative_time(created_at: NaiveDateTime, now: NaiveDateTime) -> String {
    let elapsed = now.signed_duration_since(created_at);

    if elapsed.num_minutes() < 1 {
        "just now".into()
    } else if elapsed.num_hours() < 1 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        created_at.format("%Y-%m-%d").to_string()
    }
}

pub struct Renderer<'a> {
    identity: &'a str,
    view: &'a ThreadView,
    policy: IndentPolicy,
    color: bool,
    now: NaiveDateTime,
}

impl<'a> Renderer<'a> {
    /// `identity` decides which marks get edit and delete affordances.
    pub fn new(identity: &'a str, view: &'a ThreadView, now: NaiveDateTime) -> Self {
        Renderer {
            identity,
            view,
            policy: IndentPolicy::default(),
            color: false,
            now,
        }
    }

    pub fn policy(mut self, policy: IndentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn colored(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn accent(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn render_boards(&self, boards: &[Board]) -> String {
        let mut out = String::new();
        for board in boards {
            let _ = writeln!(out, "{}", self.accent(&format!("r/{}", board.name)));
            let _ = writeln!(out, "{INDENT}{}", board.description);
        }
        out
    }

    pub fn render_listing(&self, posts: &[Post]) -> String {
        if posts.is_empty() {
            return "No scrolls here yet.\n".into();
        }

        let mut out = String::new();
        for post in posts {
            let _ = writeln!(
                out,
                "{:>5} {} {}",
                self.dim(&format!("#{}", post.id)),
                self.accent(&format!("{:+}", post.upvotes)),
                self.bold(&post.title),
            );
            let _ = writeln!(
                out,
                "{INDENT}  {}",
                self.dim(&format!(
                    "r/{} · u/{} · {} · {} marks",
                    post.board,
                    post.author.username,
                    relative_time(post.created_at, self.now),
                    post.mark_count(),
                )),
            );
        }
        out
    }

    /// The scroll header followed by its thread.
    pub fn render_post(&self, detail: &PostDetail, thread: &[CommentNode]) -> String {
        let post = &detail.post;
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.accent(&format!("r/{}", post.board)));
        let _ = writeln!(out, "{}", self.bold(&post.title));
        let _ = writeln!(
            out,
            "{}",
            self.dim(&format!(
                "#{} · posted by u/{} · {}",
                post.id,
                post.author.username,
                relative_time(post.created_at, self.now),
            )),
        );
        if !post.link.is_empty() {
            let _ = writeln!(out, "{}", post.link);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", post.content);
        let _ = writeln!(out);

        let vote = match detail.user_vote {
            1 => " (you voted up)",
            -1 => " (you voted down)",
            _ => "",
        };
        let _ = writeln!(
            out,
            "{} votes{vote} · {} marks",
            self.accent(&format!("{:+}", post.upvotes)),
            post.mark_count(),
        );
        let _ = writeln!(out);

        out.push_str(&self.render_thread(thread));
        out
    }

    pub fn render_thread(&self, roots: &[CommentNode]) -> String {
        let mut out = String::new();
        for root in roots {
            self.render_node(&mut out, root, 0);
        }
        out
    }

    /// Renders `node` at `depth` followed by its replies, each one level
    /// deeper than its parent.
    pub fn render_node(&self, out: &mut String, node: &CommentNode, depth: usize) {
        for (node, depth) in node.depth_first(depth) {
            self.render_mark(out, &node.comment, depth);
        }
    }

    fn render_mark(&self, out: &mut String, comment: &Comment, depth: usize) {
        let indent = INDENT.repeat(self.policy.level(depth));

        let _ = writeln!(
            out,
            "{indent}{} {} {}",
            self.dim(&format!("#{}", comment.id)),
            self.bold(&comment.author.username),
            self.dim(&format!("· {}", relative_time(comment.created_at, self.now))),
        );

        match self.view.amend() {
            Some(draft) if draft.target == comment.id => {
                let _ = writeln!(out, "{indent}  {} {}", self.accent("[amending]"), draft.text);
            }
            _ => self.render_content(out, &indent, comment),
        }

        let _ = writeln!(out, "{indent}  {}", self.dim(&self.affordances(comment)));

        if let Some(draft) = self.view.reply() {
            if draft.target == comment.id {
                let _ = writeln!(out, "{indent}  {} {}", self.accent("[replying]"), draft.text);
            }
        }
    }

    fn render_content(&self, out: &mut String, indent: &str, comment: &Comment) {
        for line in comment.content.lines() {
            let _ = writeln!(out, "{indent}  {line}");
        }
    }

    fn affordances(&self, comment: &Comment) -> String {
        if comment.author.username == self.identity {
            "[reply] [edit] [delete]".into()
        } else {
            "[reply]".into()
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::{
        models::{Author, Comment},
        thread::build_thread,
    };

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 14)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
    }

    fn comment(id: i32, parent_id: Option<i32>, author: &str, content: &str) -> Comment {
        Comment {
            id,
            content: content.into(),
            post_id: 1,
            parent_id,
            author: Author {
                id: 1,
                username: author.into(),
            },
            created_at: now() - Duration::minutes(5),
        }
    }

    fn thread() -> Vec<CommentNode> {
        build_thread(&[
            comment(1, None, "jon", "Winter is coming"),
            comment(2, Some(1), "sam", "It is"),
            comment(3, Some(2), "jon", "Told you"),
        ])
    }

    #[test]
    fn test_relative_time() {
        let now = now();
        assert_eq!(relative_time(now, now), "just now");
        assert_eq!(relative_time(now + Duration::minutes(3), now), "just now");
        assert_eq!(relative_time(now - Duration::seconds(59), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d ago");
        assert_eq!(relative_time(now - Duration::days(30), now), "2024-03-15");
    }

    #[test]
    fn test_indent_policy() {
        assert_eq!(IndentPolicy::default().level(0), 0);
        assert_eq!(IndentPolicy::default().level(1), 1);
        assert_eq!(IndentPolicy::default().level(5), 1);
        assert_eq!(IndentPolicy::Proportional.level(5), 5);
    }

    #[test]
    fn test_capped_indent_flattens_grandchildren() {
        let view = ThreadView::new();
        let out = Renderer::new("jon", &view, now()).render_thread(&thread());

        assert!(out.contains("\n    #2 sam"));
        assert!(out.contains("\n    #3 jon"));
        assert!(!out.contains("        #3"));
    }

    #[test]
    fn test_proportional_indent_follows_depth() {
        let view = ThreadView::new();
        let out = Renderer::new("jon", &view, now())
            .policy(IndentPolicy::Proportional)
            .render_thread(&thread());

        assert!(out.starts_with("#1 jon · 5m ago\n"));
        assert!(out.contains("\n        #3 jon"));
    }

    #[test]
    fn test_affordances_follow_identity() {
        let view = ThreadView::new();
        let out = Renderer::new("sam", &view, now()).render_thread(&thread());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[2].trim(), "[reply]");
        assert_eq!(lines[5].trim(), "[reply] [edit] [delete]");
    }

    #[test]
    fn test_amend_draft_replaces_content() {
        let mut view = ThreadView::new();
        view.start_amend(2, "It is, truly");
        view.write_amend("It is, truly and deeply");

        let out = Renderer::new("sam", &view, now()).render_thread(&thread());

        assert!(out.contains("[amending] It is, truly and deeply"));
        assert!(!out.contains("  It is\n"));
    }

    #[test]
    fn test_reply_draft_is_shown_under_target() {
        let mut view = ThreadView::new();
        view.toggle_reply(1);
        view.write_reply("And the night is dark");

        let out = Renderer::new("sam", &view, now()).render_thread(&thread());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[3].trim(), "[replying] And the night is dark");
        assert!(lines[4].contains("#2 sam"));
    }

    #[test]
    fn test_deep_reply_chain_renders() {
        const DEPTH: i32 = 100_000;

        let marks: Vec<Comment> = (1..=DEPTH)
            .map(|id| comment(id, (id > 1).then_some(id - 1), "jon", "deeper"))
            .collect();
        let roots = build_thread(&marks);
        let view = ThreadView::new();
        let out = Renderer::new("sam", &view, now()).render_thread(&roots);

        assert_eq!(out.lines().count(), 3 * DEPTH as usize);
        assert!(out.starts_with("#1 jon"));
        assert!(out.contains(&format!("\n    #{DEPTH} jon")));
    }
}
