//! Array-backed binary heaps for the search frontier.
//!
//! [`PriorityQueue`] is a plain heap ordered by a caller-supplied
//! "more important than" relation. [`PrioritySet`] adds an index from
//! world-state key to heap slot so that at most one entry per key is
//! held and an entry can be replaced in place (decrease-key).
//!
//! Both use 0-based indexing: the parent of slot `i` is `(i - 1) / 2`
//! and its children are `2i + 1` and `2i + 2`.

use std::collections::HashMap;
use std::hash::Hash;

/// Strict ordering used by the heaps: `more_important(a, b)` is true when
/// `a` must leave the heap before `b`.
pub trait MoreImportant<T> {
    fn more_important(&self, a: &T, b: &T) -> bool;
}

impl<T, F> MoreImportant<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn more_important(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Items stored in a [`PrioritySet`] are identified by a key.
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
}

/// What a [`PrioritySet`] push did with the item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Inserted,
    Replaced,
    Rejected,
}

fn parent(index: usize) -> usize {
    (index - 1) / 2
}

fn left(index: usize) -> usize {
    2 * index + 1
}

/// Move the entry at `index` towards the root while it outranks its
/// parent. Returns whether it moved.
fn sift_up<T, C, S>(heap: &mut [T], comparator: &C, mut index: usize, mut on_swap: S) -> bool
where
    C: MoreImportant<T>,
    S: FnMut(&[T], usize, usize),
{
    let mut moved = false;
    while index > 0 {
        let up = parent(index);
        if !comparator.more_important(&heap[index], &heap[up]) {
            break;
        }
        heap.swap(index, up);
        on_swap(heap, index, up);
        index = up;
        moved = true;
    }
    moved
}

/// Move the entry at `index` towards the leaves. At each level the more
/// important child is chosen and swapped only if it outranks the entry.
fn sink_down<T, C, S>(heap: &mut [T], comparator: &C, mut index: usize, mut on_swap: S)
where
    C: MoreImportant<T>,
    S: FnMut(&[T], usize, usize),
{
    loop {
        let l = left(index);
        if l >= heap.len() {
            break;
        }
        let r = l + 1;
        let child = if r < heap.len() && comparator.more_important(&heap[r], &heap[l]) {
            r
        } else {
            l
        };
        if !comparator.more_important(&heap[child], &heap[index]) {
            break;
        }
        heap.swap(index, child);
        on_swap(heap, index, child);
        index = child;
    }
}

/// Binary heap. Duplicates are allowed.
pub struct PriorityQueue<T, C> {
    heap: Vec<T>,
    comparator: C,
}

impl<T, C: MoreImportant<T>> PriorityQueue<T, C> {
    pub fn new(comparator: C) -> Self {
        Self {
            heap: Vec::new(),
            comparator,
        }
    }

    pub fn push(&mut self, item: T) {
        self.heap.push(item);
        let last = self.heap.len() - 1;
        sift_up(&mut self.heap, &self.comparator, last, |_, _, _| {});
    }

    /// Remove and return the most important item.
    pub fn pop(&mut self) -> Option<T> {
        match self.heap.len() {
            0 => None,
            1 => self.heap.pop(),
            _ => {
                let top = self.heap.swap_remove(0);
                sink_down(&mut self.heap, &self.comparator, 0, |_, _, _| {});
                Some(top)
            }
        }
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Heap contents in slot order
    pub fn as_slice(&self) -> &[T] {
        &self.heap
    }
}

/// Binary heap holding at most one item per key.
pub struct PrioritySet<T: Keyed, C> {
    heap: Vec<T>,
    index: HashMap<T::Key, usize>,
    comparator: C,
}

impl<T: Keyed, C: MoreImportant<T>> PrioritySet<T, C> {
    pub fn new(comparator: C) -> Self {
        Self {
            heap: Vec::new(),
            index: HashMap::new(),
            comparator,
        }
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.index.contains_key(key)
    }

    /// The stored item with this key, if any
    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.index.get(key).map(|&slot| &self.heap[slot])
    }

    /// Insert `item`, or overwrite the entry with the same key. The most
    /// recent push for a key always wins, whatever its priority.
    pub fn push(&mut self, item: T) -> PushOutcome {
        let key = item.key();
        match self.index.get(&key) {
            Some(&slot) => {
                self.heap[slot] = item;
                if !self.sift_up(slot) {
                    self.sink_down(slot);
                }
                PushOutcome::Replaced
            }
            None => {
                self.heap.push(item);
                let slot = self.heap.len() - 1;
                self.index.insert(key, slot);
                self.sift_up(slot);
                PushOutcome::Inserted
            }
        }
    }

    /// Like [`push`](Self::push), but an existing entry is only replaced
    /// when `item` is strictly more important than it.
    pub fn push_if_better(&mut self, item: T) -> PushOutcome {
        if let Some(existing) = self.find(&item.key()) {
            if !self.comparator.more_important(&item, existing) {
                return PushOutcome::Rejected;
            }
        }
        self.push(item)
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(0);
        self.index.remove(&top.key());
        if !self.heap.is_empty() {
            self.index.insert(self.heap[0].key(), 0);
            self.sink_down(0);
        }
        Some(top)
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.heap
    }

    fn sift_up(&mut self, slot: usize) -> bool {
        let index = &mut self.index;
        sift_up(&mut self.heap, &self.comparator, slot, |heap, a, b| {
            index.insert(heap[a].key(), a);
            index.insert(heap[b].key(), b);
        })
    }

    fn sink_down(&mut self, slot: usize) {
        let index = &mut self.index;
        sink_down(&mut self.heap, &self.comparator, slot, |heap, a, b| {
            index.insert(heap[a].key(), a);
            index.insert(heap[b].key(), b);
        });
    }
}
