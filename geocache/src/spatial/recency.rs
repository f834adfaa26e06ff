//! Index-addressed recency list for cached tiles.
//!
//! A doubly-linked list stored in a slot arena. Each cached tile owns a
//! [`Handle`] into the arena, so promoting a tile to most-recently-used and
//! popping the least-recently-used tile are both O(1).

use crate::coord::TilePos;

/// Opaque slot index of a tile in the recency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Handle(usize);

#[derive(Debug, Clone)]
struct Node {
    tile: TilePos,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Least-recently-used ordering over tiles.
///
/// `head` is the least recently used tile, `tail` the most recently used.
#[derive(Debug, Default)]
pub(crate) struct RecencyList {
    slots: Vec<Option<Node>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl RecencyList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Append a tile as most recently used.
    pub(crate) fn push_back(&mut self, tile: TilePos) -> Handle {
        let node = Node {
            tile,
            prev: self.tail,
            next: None,
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        };

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
        Handle(idx)
    }

    /// Move a tile to the most recently used position.
    pub(crate) fn move_to_back(&mut self, handle: Handle) {
        if self.tail == Some(handle.0) {
            return;
        }
        self.unlink(handle.0);

        let tail = self.tail;
        {
            let node = self.node_mut(handle.0);
            node.prev = tail;
            node.next = None;
        }
        match tail {
            Some(tail) => self.node_mut(tail).next = Some(handle.0),
            None => self.head = Some(handle.0),
        }
        self.tail = Some(handle.0);
    }

    /// Remove and return the least recently used tile.
    pub(crate) fn pop_front(&mut self) -> Option<TilePos> {
        let head = self.head?;
        Some(self.remove(Handle(head)))
    }

    /// Remove a tile from the list, freeing its slot.
    pub(crate) fn remove(&mut self, handle: Handle) -> TilePos {
        self.unlink(handle.0);
        let node = self.slots[handle.0]
            .take()
            .expect("recency handle refers to a freed slot");
        self.free_list.push(handle.0);
        self.len -= 1;
        node.tile
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Tiles from least to most recently used.
    pub(crate) fn iter(&self) -> impl Iterator<Item = TilePos> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let idx = cursor?;
            let node = self.slots[idx].as_ref()?;
            cursor = node.next;
            Some(node.tile)
        })
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node {
        self.slots[idx]
            .as_mut()
            .expect("recency handle refers to a freed slot")
    }

    /// Detach a node from its neighbours, leaving its own links stale.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node_mut(idx);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }
}
