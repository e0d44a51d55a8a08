//! Turns the flat list of marks returned with a scroll into reply threads.

use std::collections::HashMap;

use crate::models::Comment;

/// A record that can be placed in a reply thread.
pub trait Threaded {
    fn id(&self) -> i32;
    fn parent_id(&self) -> Option<i32>;
}

impl Threaded for Comment {
    fn id(&self) -> i32 {
        self.id
    }

    fn parent_id(&self) -> Option<i32> {
        self.parent_id
    }
}

#[derive(Debug, PartialEq)]
pub struct CommentNode<C = Comment> {
    pub comment: C,
    pub children: Vec<CommentNode<C>>,
}

impl<C> CommentNode<C> {
    /// Pre-order walk of this subtree, yielding each node with its depth
    /// relative to `depth`. Children come in order.
    pub fn depth_first(&self, depth: usize) -> DepthFirst<'_, C> {
        DepthFirst {
            stack: vec![(self, depth)],
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn subtree_len(&self) -> usize {
        self.depth_first(0).count()
    }
}

// Reply chains can be arbitrarily deep, so dropping must not recurse.
impl<C> Drop for CommentNode<C> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

pub struct DepthFirst<'a, C> {
    stack: Vec<(&'a CommentNode<C>, usize)>,
}

impl<'a, C> Iterator for DepthFirst<'a, C> {
    type Item = (&'a CommentNode<C>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}

/// Builds the forest of reply threads.
///
/// Roots are the records without a parent and every node's children are
/// the records naming it as parent. Both keep the order of `comments`. A
/// record whose parent is not in `comments` is left out together with its
/// replies. When ids repeat, the last record with that id is the one
/// replies attach to.
pub fn build_thread<C: Threaded + Clone>(comments: &[C]) -> Vec<CommentNode<C>> {
    let mut slots: HashMap<i32, usize> = HashMap::with_capacity(comments.len());
    for (i, comment) in comments.iter().enumerate() {
        slots.insert(comment.id(), i);
    }

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];

    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_id() {
            None => roots.push(i),
            Some(parent_id) => match slots.get(&parent_id) {
                Some(&parent) => children[parent].push(i),
                None => tracing::trace!(id = comment.id(), parent_id, "dropping orphaned mark"),
            },
        }
    }

    // Every index sits in at most one list and roots sit in none, so the
    // walk from the roots is a tree: self-parents and cycles are never reached.
    let mut order = Vec::with_capacity(comments.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev());
    }

    // Children follow their parent in `order`, so building in reverse finds
    // every child already built.
    let mut built: Vec<Option<CommentNode<C>>> = (0..comments.len()).map(|_| None).collect();
    for &i in order.iter().rev() {
        let node = CommentNode {
            comment: comments[i].clone(),
            children: children[i]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect(),
        };
        built[i] = Some(node);
    }

    roots
        .into_iter()
        .filter_map(|i| built[i].take())
        .collect()
}
