//! Arena-backed doubly linked list
//!
//! Nodes live in a `Vec` and link to each other by index, so detaching and
//! re-attaching a node is O(1) without shared ownership. Index 0 is the head
//! sentinel and index 1 the tail sentinel; neither holds an element.
//!
//! Each allocation stamps its slot with a fresh generation. A [`NodeId`]
//! from a removed node never matches the slot's next occupant.

/// Handle to a node in a [`DoublyLinkedList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u64,
}

const HEAD: usize = 0;
const TAIL: usize = 1;

/// Link value of a node that is not currently in the list
const DETACHED: usize = usize::MAX;

#[derive(Debug)]
struct Node<E> {
    element: Option<E>,
    generation: u64,
    prev: usize,
    next: usize,
}

impl<E> Node<E> {
    fn sentinel() -> Self {
        Self {
            element: None,
            generation: 0,
            prev: DETACHED,
            next: DETACHED,
        }
    }
}

/// Doubly linked list ordered from first (head side) to last (tail side)
#[derive(Debug)]
pub struct DoublyLinkedList<E> {
    nodes: Vec<Node<E>>,
    free_list: Vec<usize>,
    len: usize,
    /// Last generation handed to an allocation; sentinels use 0
    generation: u64,
}

impl<E> DoublyLinkedList<E> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 2);
        nodes.push(Node::sentinel());
        nodes.push(Node::sentinel());
        nodes[HEAD].next = TAIL;
        nodes[TAIL].prev = HEAD;

        Self {
            nodes,
            free_list: Vec::new(),
            len: 0,
            generation: 0,
        }
    }

    /// Allocate a node for `element` and append it at the last position
    pub fn push_back(&mut self, element: E) -> NodeId {
        self.generation += 1;
        let node = Node {
            element: Some(element),
            generation: self.generation,
            prev: DETACHED,
            next: DETACHED,
        };
        let index = match self.free_list.pop() {
            Some(index) => {
                self.nodes[index] = node;
                index
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        let id = NodeId {
            index,
            generation: self.generation,
        };
        self.attach_last(id);
        id
    }

    /// Splice a detached node in just before the tail sentinel
    ///
    /// # Panics
    /// If `id` is stale or the node is already attached
    pub fn attach_last(&mut self, id: NodeId) {
        assert!(self.is_live(id), "node {:?} has been removed", id);
        assert!(!self.is_attached(id), "node {:?} already attached", id);

        let idx = id.index;
        let prev = self.nodes[TAIL].prev;
        self.nodes[prev].next = idx;
        self.nodes[idx].prev = prev;
        self.nodes[idx].next = TAIL;
        self.nodes[TAIL].prev = idx;
        self.len += 1;
    }

    /// Unlink a node from its neighbors, keeping its slot allocated
    ///
    /// # Panics
    /// If `id` is stale or the node is not attached
    pub fn detach(&mut self, id: NodeId) {
        assert!(self.is_attached(id), "node {:?} is not attached", id);

        let idx = id.index;
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[idx].prev = DETACHED;
        self.nodes[idx].next = DETACHED;
        self.len -= 1;
    }

    /// Move an attached node to the last position
    pub fn move_to_back(&mut self, id: NodeId) {
        if self.last() == Some(id) {
            return;
        }
        self.detach(id);
        self.attach_last(id);
    }

    /// Detach a node, free its slot and return its element
    ///
    /// # Panics
    /// If `id` is stale
    pub fn remove(&mut self, id: NodeId) -> E {
        if self.is_attached(id) {
            self.detach(id);
        }
        let element = match self.live_node_mut(id).and_then(|node| node.element.take()) {
            Some(element) => element,
            None => panic!("node {:?} has already been removed", id),
        };
        self.free_list.push(id.index);
        element
    }

    /// First node (head side), if any
    pub fn first(&self) -> Option<NodeId> {
        self.id_at(self.nodes[HEAD].next)
    }

    /// Last node (tail side), if any
    pub fn last(&self) -> Option<NodeId> {
        self.id_at(self.nodes[TAIL].prev)
    }

    /// Element held by a node; `None` once the node is removed
    pub fn get(&self, id: NodeId) -> Option<&E> {
        self.live_node(id).and_then(|node| node.element.as_ref())
    }

    /// Whether a node is currently linked into the list
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.live_node(id).map_or(false, |node| node.prev != DETACHED)
    }

    /// Number of attached elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list has no attached elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every element and release all slots
    pub fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD].next = TAIL;
        self.nodes[TAIL].prev = HEAD;
        self.free_list.clear();
        self.len = 0;
    }

    /// Iterate elements from first to last
    pub fn iter(&self) -> Iter<'_, E> {
        Iter {
            list: self,
            cursor: self.nodes[HEAD].next,
        }
    }

    fn is_live(&self, id: NodeId) -> bool {
        self.live_node(id).is_some()
    }

    fn live_node(&self, id: NodeId) -> Option<&Node<E>> {
        self.nodes
            .get(id.index)
            .filter(|node| node.element.is_some() && node.generation == id.generation)
    }

    fn live_node_mut(&mut self, id: NodeId) -> Option<&mut Node<E>> {
        self.nodes
            .get_mut(id.index)
            .filter(|node| node.element.is_some() && node.generation == id.generation)
    }

    fn id_at(&self, index: usize) -> Option<NodeId> {
        if index == HEAD || index == TAIL {
            return None;
        }
        Some(NodeId {
            index,
            generation: self.nodes[index].generation,
        })
    }
}

impl<E> Default for DoublyLinkedList<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over list elements, first to last
pub struct Iter<'a, E> {
    list: &'a DoublyLinkedList<E>,
    cursor: usize,
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.next;
        node.element.as_ref()
    }
}
