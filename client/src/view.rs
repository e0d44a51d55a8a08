//! Transient state of an open thread: which mark is being replied to and
//! which one is being amended. Kept apart from the tree, which is rebuilt
//! after every fetch.

use crate::thread::CommentNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub target: i32,
    pub text: String,
}

impl Draft {
    fn new(target: i32, text: impl Into<String>) -> Self {
        Draft {
            target,
            text: text.into(),
        }
    }
}

/// The reply slot and the amend slot are independent. Each holds at most one
/// target; choosing a new target replaces the previous one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ThreadView {
    reply: Option<Draft>,
    amend: Option<Draft>,
}

impl ThreadView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selecting the current reply target closes it. Any other target opens
    /// with an empty draft. Returns whether a reply is open afterwards.
    pub fn toggle_reply(&mut self, target: i32) -> bool {
        if self.replying_to(target) {
            self.reply = None;
            return false;
        }

        self.reply = Some(Draft::new(target, ""));
        true
    }

    /// Starts amending `target`, with the draft pre-filled from its content.
    pub fn start_amend(&mut self, target: i32, content: &str) {
        self.amend = Some(Draft::new(target, content));
    }

    pub fn cancel_reply(&mut self) {
        self.reply = None;
    }

    pub fn cancel_amend(&mut self) {
        self.amend = None;
    }

    pub fn reply(&self) -> Option<&Draft> {
        self.reply.as_ref()
    }

    pub fn amend(&self) -> Option<&Draft> {
        self.amend.as_ref()
    }

    pub fn replying_to(&self, id: i32) -> bool {
        self.reply.as_ref().is_some_and(|d| d.target == id)
    }

    pub fn amending(&self, id: i32) -> bool {
        self.amend.as_ref().is_some_and(|d| d.target == id)
    }

    /// Returns false when no reply is open.
    pub fn write_reply(&mut self, text: &str) -> bool {
        match self.reply.as_mut() {
            Some(draft) => {
                draft.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Returns false when no amend is open.
    pub fn write_amend(&mut self, text: &str) -> bool {
        match self.amend.as_mut() {
            Some(draft) => {
                draft.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Call once the reply was accepted by the server. A failed submission
    /// must leave the draft alone.
    pub fn reply_submitted(&mut self) {
        self.reply = None;
    }

    pub fn amend_submitted(&mut self) {
        self.amend = None;
    }

    /// Closes the slots whose target is no longer part of the thread.
    pub fn forget_missing<C: crate::thread::Threaded>(&mut self, roots: &[CommentNode<C>]) {
        if let Some(draft) = &self.reply {
            if !contains(roots, draft.target) {
                tracing::debug!(target_id = draft.target, "reply target is gone");
                self.reply = None;
            }
        }

        if let Some(draft) = &self.amend {
            if !contains(roots, draft.target) {
                tracing::debug!(target_id = draft.target, "amend target is gone");
                self.amend = None;
            }
        }
    }
}

fn contains<C: crate::thread::Threaded>(nodes: &[CommentNode<C>], id: i32) -> bool {
    nodes
        .iter()
        .any(|root| root.depth_first(0).any(|(n, _)| n.comment.id() == id))
}
