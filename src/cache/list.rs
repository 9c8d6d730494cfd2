//! Recency List Module
//!
//! Doubly-linked list of cache nodes ordered from most recently used (head
//! side) to least recently used (tail side).
//!
//! Nodes live in an arena and link to each other by [`NodeId`] handle instead
//! of by reference. Slots 0 and 1 are the head and tail sentinels; they never
//! hold a key or value and are never handed out. Freed slots are recycled.

// == Node Handle ==
/// Handle to a node slot in the [`RecencyList`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

const HEAD: NodeId = NodeId(0);
const TAIL: NodeId = NodeId(1);

// == Node ==
#[derive(Debug, Default)]
struct Node {
    key: String,
    value: Vec<u8>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

// == Recency List ==
/// Arena-backed intrusive list with sentinel head and tail.
#[derive(Debug)]
pub struct RecencyList {
    nodes: Vec<Node>,
    /// Slots released by `remove`/`remove_tail`, reused by `alloc`
    free: Vec<NodeId>,
    /// Count of real (non-sentinel) linked nodes
    len: usize,
}

impl Default for RecencyList {
    fn default() -> Self {
        Self::new()
    }
}

impl RecencyList {
    // == Constructor ==
    /// Creates an empty list whose sentinels point at each other.
    pub fn new() -> Self {
        let head = Node {
            next: Some(TAIL),
            ..Node::default()
        };
        let tail = Node {
            prev: Some(HEAD),
            ..Node::default()
        };
        Self {
            nodes: vec![head, tail],
            free: Vec::new(),
            len: 0,
        }
    }

    // == Alloc ==
    /// Creates an unlinked node holding `key` and `value`.
    pub fn alloc(&mut self, key: String, value: Vec<u8>) -> NodeId {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    // == Add To Head ==
    /// Links an unlinked node right after the head sentinel.
    pub fn add_to_head(&mut self, id: NodeId) {
        debug_assert!(self.is_real(id) && self.node(id).prev.is_none());
        self.link_after_head(id);
        self.len += 1;
    }

    // == Move To Head ==
    /// Relinks a linked node right after the head sentinel.
    pub fn move_to_head(&mut self, id: NodeId) {
        if self.node(HEAD).next == Some(id) {
            return;
        }
        self.unlink(id);
        self.link_after_head(id);
    }

    // == Remove Tail ==
    /// Unlinks the least recently used node and frees its slot.
    ///
    /// Returns the node's key, or None if the list is empty.
    pub fn remove_tail(&mut self) -> Option<String> {
        if self.len == 0 {
            return None;
        }
        let id = self.node(TAIL).prev?;
        Some(self.remove(id).0)
    }

    // == Remove ==
    /// Unlinks a linked node, frees its slot and hands back its key and value.
    pub fn remove(&mut self, id: NodeId) -> (String, Vec<u8>) {
        debug_assert!(self.is_real(id));
        self.unlink(id);
        self.len -= 1;
        let node = std::mem::take(&mut self.nodes[id.0]);
        self.free.push(id);
        (node.key, node.value)
    }

    // == Accessors ==
    pub fn key(&self, id: NodeId) -> &str {
        &self.node(id).key
    }

    pub fn value(&self, id: NodeId) -> &[u8] {
        &self.node(id).value
    }

    /// Replaces a node's value in place; its position is unchanged.
    pub fn set_value(&mut self, id: NodeId, value: Vec<u8>) {
        self.nodes[id.0].value = value;
    }

    /// Returns the number of real nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Walks real nodes from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.walk(HEAD, |node| node.next)
    }

    /// Walks real nodes from least to most recently used.
    pub fn iter_from_tail(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.walk(TAIL, |node| node.prev)
    }

    fn walk<F>(&self, from: NodeId, step: F) -> impl Iterator<Item = NodeId> + '_
    where
        F: Fn(&Node) -> Option<NodeId> + 'static,
    {
        let mut current = step(self.node(from));
        std::iter::from_fn(move || {
            let id = current.filter(|id| self.is_real(*id))?;
            current = step(self.node(id));
            Some(id)
        })
    }

    // == Internal Linking ==
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn is_real(&self, id: NodeId) -> bool {
        id != HEAD && id != TAIL
    }

    fn link_after_head(&mut self, id: NodeId) {
        let first = self.node(HEAD).next.unwrap_or(TAIL);
        self.nodes[id.0].prev = Some(HEAD);
        self.nodes[id.0].next = Some(first);
        self.nodes[first.0].prev = Some(id);
        self.nodes[HEAD.0].next = Some(id);
    }

    fn unlink(&mut self, id: NodeId) {
        let prev = self.nodes[id.0].prev.take().unwrap_or(HEAD);
        let next = self.nodes[id.0].next.take().unwrap_or(TAIL);
        self.nodes[prev.0].next = Some(next);
        self.nodes[next.0].prev = Some(prev);
    }
}
