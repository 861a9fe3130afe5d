//! Secondary index: binary search tree ordered by name.

use crate::error::{CoreError, CoreResult};
use crate::types::Locator;
use std::cmp::Ordering;

/// Handle of a node in the index arena.
type NodeId = usize;

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

#[derive(Debug)]
struct Node {
    name: String,
    id: String,
    locator: Locator,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl Node {
    fn cmp_key(&self, name: &str, id: &str) -> Ordering {
        (name, id).cmp(&(self.name.as_str(), self.id.as_str()))
    }

    fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Binary search tree from record name to locator.
///
/// Names are not unique. Entries are keyed by `(name, id)`: two records
/// with the same name are ordered by id, so every entry has exactly one
/// position and insert, find and remove are well defined among duplicates.
/// An equal name never descends left of a smaller id, which places
/// duplicates to the right of the first one inserted when ids ascend.
///
/// Nodes live in an arena and link to each other by integer handle.
/// Removed nodes are recycled through a free list. The tree is not
/// rebalanced.
///
/// # Example
///
/// ```rust
/// use regstore_core::{Locator, NameIndex};
///
/// let mut index = NameIndex::new();
/// index.insert("Ana", "A2", Locator::new(1, 0)).unwrap();
/// index.insert("Ana", "A1", Locator::new(0, 0)).unwrap();
/// index.insert("Bo", "B1", Locator::new(2, 0)).unwrap();
///
/// let ids: Vec<_> = index.iter().map(|(_, id, _)| id).collect();
/// assert_eq!(ids, ["A1", "A2", "B1"]);
/// ```
#[derive(Debug, Default)]
pub struct NameIndex {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl NameIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry for record `id` under `name`.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if `(name, id)` is already indexed.
    pub fn insert(&mut self, name: &str, id: &str, locator: Locator) -> CoreResult<()> {
        let mut parent: Option<(NodeId, Side)> = None;
        let mut cursor = self.root;

        while let Some(current) = cursor {
            let node = &self.nodes[current];
            let side = match node.cmp_key(name, id) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    return Err(CoreError::invariant(format!(
                        "name index already holds ({name}, {id})"
                    )));
                }
            };
            parent = Some((current, side));
            cursor = node.child(side);
        }

        let handle = self.alloc(Node {
            name: name.to_owned(),
            id: id.to_owned(),
            locator,
            left: None,
            right: None,
        });
        self.link(parent, Some(handle));
        self.len += 1;
        Ok(())
    }

    /// Returns the locator indexed under exactly `(name, id)`.
    #[must_use]
    pub fn find(&self, name: &str, id: &str) -> Option<Locator> {
        self.locate(name, id).map(|(handle, _)| self.nodes[handle].locator)
    }

    /// Removes the entry for exactly `(name, id)` and returns its locator.
    ///
    /// A node with two children takes over its in-order successor's key and
    /// locator; the successor node is then unlinked.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if `(name, id)` is not indexed.
    pub fn remove(&mut self, name: &str, id: &str) -> CoreResult<Locator> {
        let (target, parent) = self
            .locate(name, id)
            .ok_or_else(|| CoreError::invariant(format!("name index has no ({name}, {id})")))?;

        let (left, right) = (self.nodes[target].left, self.nodes[target].right);
        let replacement = match (left, right) {
            (Some(_), Some(right)) => {
                let removed = self.nodes[target].locator;
                let successor = self.detach_min(target, right);
                let Node {
                    name, id, locator, ..
                } = self.release(successor);
                let node = &mut self.nodes[target];
                node.name = name;
                node.id = id;
                node.locator = locator;
                self.len -= 1;
                return Ok(removed);
            }
            (Some(child), None) | (None, Some(child)) => Some(child),
            (None, None) => None,
        };

        self.link(parent, replacement);
        let node = self.release(target);
        self.len -= 1;
        Ok(node.locator)
    }

    /// Moves record `id` from `old_name` to `new_name`.
    ///
    /// Both keys are checked before anything is changed, so on error the
    /// index is untouched and the record is never indexed under neither
    /// or both names.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if `(old_name, id)` is missing or
    /// `(new_name, id)` is already present.
    pub fn rekey(
        &mut self,
        old_name: &str,
        id: &str,
        new_name: &str,
        locator: Locator,
    ) -> CoreResult<()> {
        if self.locate(old_name, id).is_none() {
            return Err(CoreError::invariant(format!(
                "cannot rekey ({old_name}, {id}): not indexed"
            )));
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.locate(new_name, id).is_some() {
            return Err(CoreError::invariant(format!(
                "cannot rekey {id} to {new_name}: already indexed"
            )));
        }
        self.remove(old_name, id)?;
        self.insert(new_name, id, locator)
    }

    /// Iterates `(name, id, locator)` in ascending `(name, id)` order.
    ///
    /// The iterator is lazy; call `iter` again to restart.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            index: self,
            stack: Vec::new(),
            cursor: self.root,
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut pending: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((handle, depth)) = pending.pop() {
            height = height.max(depth);
            let node = &self.nodes[handle];
            pending.extend(node.left.map(|l| (l, depth + 1)));
            pending.extend(node.right.map(|r| (r, depth + 1)));
        }
        height
    }

    /// Finds the node for `(name, id)` together with its parent link.
    fn locate(&self, name: &str, id: &str) -> Option<(NodeId, Option<(NodeId, Side)>)> {
        let mut parent = None;
        let mut cursor = self.root;
        while let Some(current) = cursor {
            let node = &self.nodes[current];
            let side = match node.cmp_key(name, id) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Some((current, parent)),
            };
            parent = Some((current, side));
            cursor = node.child(side);
        }
        None
    }

    /// Unlinks the leftmost node of the subtree at `start` (the right child
    /// of `owner`) and returns its handle.
    fn detach_min(&mut self, owner: NodeId, start: NodeId) -> NodeId {
        let mut parent = (owner, Side::Right);
        let mut current = start;
        while let Some(left) = self.nodes[current].left {
            parent = (current, Side::Left);
            current = left;
        }
        let right = self.nodes[current].right;
        self.link(Some(parent), right);
        current
    }

    /// Points `parent`'s child slot (or the root) at `child`.
    fn link(&mut self, parent: Option<(NodeId, Side)>, child: Option<NodeId>) {
        match parent {
            None => self.root = child,
            Some((handle, Side::Left)) => self.nodes[handle].left = child,
            Some((handle, Side::Right)) => self.nodes[handle].right = child,
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(handle) => {
                self.nodes[handle] = node;
                handle
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Returns a node's contents and puts its slot on the free list.
    fn release(&mut self, handle: NodeId) -> Node {
        let slot = &mut self.nodes[handle];
        let node = Node {
            name: std::mem::take(&mut slot.name),
            id: std::mem::take(&mut slot.id),
            locator: slot.locator,
            left: slot.left.take(),
            right: slot.right.take(),
        };
        self.free.push(handle);
        node
    }
}

/// In-order iterator over a [`NameIndex`].
#[derive(Debug)]
pub struct Iter<'a> {
    index: &'a NameIndex,
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str, Locator);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.cursor {
            self.stack.push(current);
            self.cursor = self.index.nodes[current].left;
        }
        let handle = self.stack.pop()?;
        let node = &self.index.nodes[handle];
        self.cursor = node.right;
        Some((node.name.as_str(), node.id.as_str(), node.locator))
    }
}

impl<'a> IntoIterator for &'a NameIndex {
    type Item = (&'a str, &'a str, Locator);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
