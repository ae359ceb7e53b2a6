//! Chain: one bucket's entries as an arena-backed singly linked list.
//!
//! Entries live in a `Vec` of slots and link to their successor by slot
//! index. Freed slots form an intrusive free list and are reused before
//! the arena grows; growth goes through `try_reserve`, so running out of
//! memory is reported instead of aborting. An empty chain owns no heap
//! memory. The chain tracks both ends so inserts append at the tail
//! without a second walk. Lookups scan from head to tail.

use core::marker::PhantomData;
use std::collections::TryReserveError;

/// Result of a successful `put`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PutOutcome<V> {
    /// The key was new; an entry was appended.
    Inserted,
    /// The key existed; carries the value it held before.
    Replaced(V),
}

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    next: Option<usize>,
}

#[derive(Debug)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Free { next_free: Option<usize> },
}

#[derive(Debug)]
pub(crate) struct Chain<K, V> {
    head: Option<usize>,
    tail: Option<usize>,
    free: Option<usize>,
    len: usize,
    slots: Vec<Slot<K, V>>,
}

/// Iterator over a chain's entries in link order.
pub(crate) struct Iter<'a, K, V> {
    slots: &'a [Slot<K, V>],
    cursor: Option<usize>,
    _pd: PhantomData<&'a (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self.slots.get(self.cursor?)? {
            Slot::Occupied(node) => {
                self.cursor = node.next;
                Some((&node.key, &node.value))
            }
            Slot::Free { .. } => None,
        }
    }
}

impl<K, V> Chain<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            free: None,
            len: 0,
            slots: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            cursor: self.head,
            _pd: PhantomData,
        }
    }

    fn node(&self, slot: usize) -> Option<&Node<K, V>> {
        match self.slots.get(slot)? {
            Slot::Occupied(node) => Some(node),
            Slot::Free { .. } => None,
        }
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node<K, V>> {
        match self.slots.get_mut(slot)? {
            Slot::Occupied(node) => Some(node),
            Slot::Free { .. } => None,
        }
    }

    /// Store `node` in a free slot, or in a new slot at the end of the arena.
    /// The arena is grown with `try_reserve` before anything is modified.
    fn alloc(&mut self, node: Node<K, V>) -> Result<usize, TryReserveError> {
        if let Some(slot) = self.free {
            if let Some(entry) = self.slots.get_mut(slot) {
                if let Slot::Free { next_free } = *entry {
                    self.free = next_free;
                    *entry = Slot::Occupied(node);
                    return Ok(slot);
                }
            }
        }
        self.slots.try_reserve(1)?;
        self.slots.push(Slot::Occupied(node));
        Ok(self.slots.len() - 1)
    }

    /// Take the node out of `slot` and thread the slot onto the free list.
    fn release(&mut self, slot: usize) -> Option<Node<K, V>> {
        let entry = self.slots.get_mut(slot)?;
        let freed = Slot::Free {
            next_free: self.free,
        };
        match core::mem::replace(entry, freed) {
            Slot::Occupied(node) => {
                self.free = Some(slot);
                Some(node)
            }
            already_free => {
                *entry = already_free;
                None
            }
        }
    }
}

impl<K, V> Chain<K, V>
where
    K: Eq,
    V: Copy,
{
    /// Walk from the head; returns `(predecessor, slot)` of the entry for `key`.
    fn locate(&self, key: &K) -> Option<(Option<usize>, usize)> {
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = self.node(slot)?;
            if node.key == *key {
                return Some((prev, slot));
            }
            prev = Some(slot);
            cursor = node.next;
        }
        None
    }

    pub(crate) fn get(&self, key: &K) -> Option<V> {
        let (_, slot) = self.locate(key)?;
        self.node(slot).map(|n| n.value)
    }

    /// Overwrite the value for `key` in place, or append a new entry at the
    /// tail. Storage for a new entry is obtained before any link changes, so
    /// an allocation failure leaves the chain untouched.
    pub(crate) fn put(&mut self, key: K, value: V) -> Result<PutOutcome<V>, TryReserveError> {
        if let Some((_, slot)) = self.locate(&key) {
            if let Some(node) = self.node_mut(slot) {
                let old = core::mem::replace(&mut node.value, value);
                return Ok(PutOutcome::Replaced(old));
            }
        }

        let slot = self.alloc(Node {
            key,
            value,
            next: None,
        })?;
        match self.tail.and_then(|t| self.node_mut(t)) {
            Some(last) => last.next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
        Ok(PutOutcome::Inserted)
    }

    /// Unlink and drop the entry for `key`, returning its value.
    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let (prev, slot) = self.locate(key)?;
        let node = self.release(slot)?;

        match prev.and_then(|p| self.node_mut(p)) {
            Some(before) => before.next = node.next,
            None => self.head = node.next,
        }
        if self.tail == Some(slot) {
            self.tail = prev;
        }
        self.len -= 1;
        Some(node.value)
    }
}
