//! The trie node and its traversals.

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A node of a prefix trie keyed by segments of type `K`.
///
/// Each node exclusively owns its children, so the structure is strictly a
/// tree. A node is *terminal* when it ends a sequence that was passed to
/// [`insert`](TrieNode::insert); nodes that only exist to carry a longer
/// sequence are *implicit*.
///
/// After any [`remove`](TrieNode::remove) completes, every non-root leaf is
/// terminal.
#[derive(Debug, Clone)]
pub struct TrieNode<K> {
    children: HashMap<K, TrieNode<K>>,
    is_terminal: bool,
}

impl<K> Default for TrieNode<K> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            is_terminal: false,
        }
    }
}

/// Outcome of a successful [`TrieNode::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    /// Depth of the node whose terminal flag was cleared.
    pub depth: usize,
    /// Number of dead-end nodes detached on the way back up.
    pub pruned: usize,
}

impl<K> TrieNode<K> {
    /// Create an empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if this node ends an explicitly inserted sequence.
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// True if this node is a leaf.
    pub fn has_no_children(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Keys of the direct children, in no particular order.
    pub fn children_keys(&self) -> impl Iterator<Item = &K> {
        self.children.keys()
    }

    /// True if this node may be reported by a query.
    ///
    /// With `leaf_only` set, only terminal nodes qualify; otherwise every
    /// node does.
    pub fn qualifies(&self, leaf_only: bool) -> bool {
        !leaf_only || self.is_terminal
    }

    /// True if nothing was inserted anywhere in this subtree.
    pub fn is_empty(&self) -> bool {
        !self.has_nested_terminal_descendant(true)
    }

    fn is_dead_end(&self) -> bool {
        !self.is_terminal && self.children.is_empty()
    }

    /// Breadth-first collection of the nodes in this subtree.
    ///
    /// A node is collected when it passes the terminal filter and is either
    /// not this node or `include_self` is set. With `stop_after_first`, the
    /// walk ends at the first collected node. Sibling order is unspecified.
    pub fn descendants(
        &self,
        must_be_terminal: bool,
        include_self: bool,
        stop_after_first: bool,
    ) -> Vec<&TrieNode<K>> {
        let mut found = Vec::new();
        let mut queue = VecDeque::from([self]);
        let mut at_start = true;

        while let Some(front) = queue.pop_front() {
            if front.qualifies(must_be_terminal) && (include_self || !at_start) {
                found.push(front);
                if stop_after_first {
                    break;
                }
            }
            at_start = false;
            queue.extend(front.children.values());
        }
        found
    }

    /// True if some terminal node lives in this subtree.
    ///
    /// Stops at the first hit instead of enumerating the subtree.
    pub fn has_nested_terminal_descendant(&self, include_self: bool) -> bool {
        !self.descendants(true, include_self, true).is_empty()
    }
}

impl<K: Eq + Hash> TrieNode<K> {
    /// Insert a sequence, creating missing nodes, and mark its last node
    /// terminal.
    ///
    /// Inserting the same sequence again reuses the existing branch. The empty
    /// sequence marks this node itself.
    pub fn insert<I>(&mut self, sequence: I) -> &mut TrieNode<K>
    where
        I: IntoIterator<Item = K>,
    {
        let mut current = self;
        for key in sequence {
            current = current.children.entry(key).or_default();
        }
        current.is_terminal = true;
        current
    }

    /// Get a direct child.
    pub fn child<Q>(&self, key: &Q) -> Option<&TrieNode<K>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.children.get(key)
    }

    /// Get a direct child (mutable).
    pub fn child_mut<Q>(&mut self, key: &Q) -> Option<&mut TrieNode<K>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.children.get_mut(key)
    }

    /// Attach a child under `key`, returning the subtree it replaced.
    pub fn add_child(&mut self, key: K, node: TrieNode<K>) -> Option<TrieNode<K>> {
        self.children.insert(key, node)
    }

    /// Detach and return the child under `key`.
    pub fn remove_child<Q>(&mut self, key: &Q) -> Option<TrieNode<K>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.children.remove(key)
    }

    /// Find the lowest node matched by `sequence`.
    ///
    /// A node qualifies when `!leaf_only || node.is_terminal()`.
    ///
    /// Without `complete_match` this is the longest-prefix query: the walk
    /// consumes segments while a matching child exists and returns the deepest
    /// qualifying node seen, this node included. A missing segment just ends
    /// the walk.
    ///
    /// With `complete_match`, any missing segment yields `None`, and only the
    /// node reached after consuming the whole sequence can be returned.
    pub fn lowest_matched_node<'q, Q, I>(
        &self,
        sequence: I,
        leaf_only: bool,
        complete_match: bool,
    ) -> Option<&TrieNode<K>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
    {
        self.lowest_match(sequence, leaf_only, complete_match)
            .map(|(_, node)| node)
    }

    /// Same query as [`lowest_matched_node`](TrieNode::lowest_matched_node),
    /// but reports how many segments lead to the matched node.
    ///
    /// Nodes do not know their own key, so this is how a caller recovers the
    /// matched prefix of its sequence.
    pub fn lowest_matched_depth<'q, Q, I>(
        &self,
        sequence: I,
        leaf_only: bool,
        complete_match: bool,
    ) -> Option<usize>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
    {
        self.lowest_match(sequence, leaf_only, complete_match)
            .map(|(depth, _)| depth)
    }

    fn lowest_match<'q, Q, I>(
        &self,
        sequence: I,
        leaf_only: bool,
        complete_match: bool,
    ) -> Option<(usize, &TrieNode<K>)>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
    {
        let mut current = self;
        let mut depth = 0;
        let mut matched = (!complete_match && self.qualifies(leaf_only)).then_some((0, self));

        for key in sequence {
            match current.children.get(key) {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None if complete_match => return None,
                None => break,
            }
            if !complete_match && current.qualifies(leaf_only) {
                matched = Some((depth, current));
            }
        }

        if complete_match {
            return current.qualifies(leaf_only).then_some((depth, current));
        }
        matched
    }

    /// Remove an explicitly inserted sequence.
    ///
    /// Returns `None` if the sequence is absent or only exists as an implicit
    /// path. Otherwise clears the terminal flag of its last node and detaches
    /// every ancestor left childless and non-terminal, stopping at the first
    /// one still in use. This node is never detached.
    pub fn remove<'q, Q, I>(&mut self, sequence: I) -> Option<Removed>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
    {
        let mut keys = sequence.into_iter();
        self.remove_along(&mut keys, 0)
    }

    // The recursion is the (parent, key) stack: each frame holds its node
    // and the key it descended through, and prunes that child on the way out.
    fn remove_along<'q, Q, I>(&mut self, keys: &mut I, depth: usize) -> Option<Removed>
    where
        I: Iterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
    {
        let Some(key) = keys.next() else {
            if !self.is_terminal {
                return None;
            }
            self.is_terminal = false;
            return Some(Removed { depth, pruned: 0 });
        };

        let child = self.children.get_mut(key)?;
        let mut removed = child.remove_along(keys, depth + 1)?;
        if child.is_dead_end() {
            self.children.remove(key);
            removed.pruned += 1;
        }
        Some(removed)
    }
}
