//! Generic prefix-matching trie.
//!
//! A [`TrieNode<K>`] indexes sequences of hashable segments (path components,
//! inode ids, ACL path entries) and answers three kinds of questions:
//!
//! - membership: was this exact sequence inserted?
//! - ancestry: what is the deepest inserted prefix of this sequence?
//! - nesting: does anything inserted live beneath this node?
//!
//! The trie imposes no meaning on its keys beyond `Eq + Hash`, and performs no
//! normalization of the sequences handed to it.
//!
//! # Example
//!
//! ```rust
//! use mountpath_trie::Trie;
//!
//! let mut trie: Trie<&str> = Trie::new();
//! trie.insert(["mnt"]);
//! trie.insert(["mnt", "s3", "bucket"]);
//!
//! // Deepest explicitly inserted ancestor of mnt/s3
//! let node = trie.lowest_matched_node(["mnt", "s3"].iter(), true, false).unwrap();
//! assert!(std::ptr::eq(node, trie.child(&"mnt").unwrap()));
//!
//! // mnt/s3 exists only as an intermediate node
//! assert!(trie.lowest_matched_node(["mnt", "s3"].iter(), true, true).is_none());
//! ```
//!
//! The trie is not internally synchronized. Owners that share one across
//! threads must hold their own lock for the whole of a lookup-then-mutate
//! sequence.

mod node;

pub use node::{Removed, TrieNode};

/// A trie is its root node.
pub type Trie<K> = TrieNode<K>;
