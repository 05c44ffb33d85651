//! Recency Index Module
//!
//! Tracks access order for LRU eviction.
//!
//! The index is a doubly-linked list laid out in an arena: nodes live in a
//! backing `Vec`, links are indices rather than pointers, and freed slots are
//! recycled through a free list. Handles stay stable for the lifetime of a
//! node, giving O(1) touch, O(1) removal and O(1) evict-oldest.
//!
//! - Front = most recently used
//! - Back = least recently used

/// Sentinel index marking the absence of a neighbor.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node {
    key: String,
    prev: usize,
    next: usize,
}

// == Recency Index ==
/// Arena-backed recency list with stable `usize` handles.
#[derive(Debug)]
pub struct RecencyIndex {
    /// Backing store; freed slots keep their position and are reused
    nodes: Vec<Node>,
    /// Indices of freed slots available for reuse
    free: Vec<usize>,
    /// Most recently used node, or NIL when empty
    head: usize,
    /// Least recently used node, or NIL when empty
    tail: usize,
    /// Number of live nodes
    len: usize,
}

impl RecencyIndex {
    // == Constructor ==
    /// Creates a new empty recency index.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a key at the front (most recent) and returns its handle.
    ///
    /// The handle remains valid until the node is removed.
    pub fn push_front(&mut self, key: String) -> usize {
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id].key = key;
                id
            }
            None => {
                self.nodes.push(Node {
                    key,
                    prev: NIL,
                    next: NIL,
                });
                self.nodes.len() - 1
            }
        };
        self.link_front(id);
        self.len += 1;
        id
    }

    // == Touch ==
    /// Marks a node as most recently used (moves it to the front).
    pub fn touch(&mut self, id: usize) {
        if self.head == id {
            return;
        }
        self.unlink(id);
        self.link_front(id);
    }

    // == Remove ==
    /// Removes a node and returns its key. The handle becomes invalid.
    pub fn remove(&mut self, id: usize) -> String {
        self.unlink(id);
        self.len -= 1;
        self.free.push(id);
        std::mem::take(&mut self.nodes[id].key)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used key.
    ///
    /// Returns None if the index is empty.
    pub fn pop_back(&mut self) -> Option<String> {
        if self.tail == NIL {
            None
        } else {
            Some(self.remove(self.tail))
        }
    }

    // == Iterate ==
    /// Iterates keys front-to-back (most recently used first).
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        RecencyIter {
            index: self,
            cursor: self.head,
        }
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Detaches a node from its neighbors without freeing its slot.
    fn unlink(&mut self, id: usize) {
        let (prev, next) = (self.nodes[id].prev, self.nodes[id].next);
        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
    }

    /// Links a detached node in at the front.
    fn link_front(&mut self, id: usize) {
        self.nodes[id].prev = NIL;
        self.nodes[id].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = id;
        } else {
            self.tail = id;
        }
        self.head = id;
    }
}

impl Default for RecencyIndex {
    fn default() -> Self {
        Self::new()
    }
}

struct RecencyIter<'a> {
    index: &'a RecencyIndex,
    cursor: usize,
}

impl<'a> Iterator for RecencyIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.index.nodes[self.cursor];
        self.cursor = node.next;
        Some(node.key.as_str())
    }
}
