//! Doubly linked list with in-place reordering, used by the queue backend.
//!
//! The list owns its nodes; the cache's key index holds raw node pointers
//! purely for O(1) lookup and never for lifetime decisions. Sentinel (sigil)
//! nodes at both ends keep every unlink and relink branch-free. The front of
//! the list is the most recently touched position; the back is the eviction
//! candidate.
//!
//! This module is internal infrastructure: it exposes unsafe raw pointer
//! operations that require careful invariant maintenance. Use the cache
//! backends instead.

extern crate alloc;

use alloc::boxed::Box;
use alloc::fmt;
use core::mem;
use core::num::NonZeroUsize;
use core::ptr::{self, NonNull};

/// A node in the doubly linked list.
///
/// Holds a value and links to the neighboring nodes. Sigil nodes leave the
/// value uninitialized, which is why it lives in a `MaybeUninit`.
pub struct Node<T> {
    value: mem::MaybeUninit<T>,
    prev: *mut Node<T>,
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Node {
            value: mem::MaybeUninit::new(value),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Creates a sentinel node without initializing the value.
    fn new_sigil() -> Self {
        Node {
            value: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Returns a reference to the stored value.
    ///
    /// # Safety
    ///
    /// Must only be called on non-sigil nodes; the value is assumed
    /// initialized.
    pub unsafe fn value(&self) -> &T {
        // SAFETY: per the contract above, the value is initialized.
        unsafe { self.value.assume_init_ref() }
    }

    /// Consumes a detached node and moves its value out.
    ///
    /// # Safety
    ///
    /// Must only be called on non-sigil nodes that have been removed from
    /// the list; the value is assumed initialized and is read exactly once.
    pub unsafe fn into_value(self: Box<Self>) -> T {
        // SAFETY: per the contract above, the value is initialized. The box
        // is dropped afterwards without running T's destructor because the
        // value sits in a MaybeUninit.
        unsafe { self.value.assume_init() }
    }
}

/// A doubly linked list with a fixed capacity and O(1) reordering.
///
/// Adding places the node at the front (most recent); [`List::remove_last`]
/// takes the node at the back (least recent). [`List::move_to_front`]
/// refreshes a node's position without traversal.
pub struct List<T> {
    /// Maximum number of items the list can hold.
    cap: NonZeroUsize,
    /// Current number of items in the list.
    len: usize,
    /// Head sentinel; its `next` is the most recent node.
    head: *mut Node<T>,
    /// Tail sentinel; its `prev` is the least recent node.
    tail: *mut Node<T>,
}

impl<T> List<T> {
    /// Creates a new list that holds at most `cap` items.
    pub fn new(cap: NonZeroUsize) -> List<T> {
        let head = Box::into_raw(Box::new(Node::new_sigil()));
        let tail = Box::into_raw(Box::new(Node::new_sigil()));

        let list = List {
            cap,
            len: 0,
            head,
            tail,
        };

        // SAFETY: head and tail are freshly allocated valid pointers.
        unsafe {
            (*list.head).next = list.tail;
            (*list.tail).prev = list.head;
        }

        list
    }

    /// Returns the maximum number of items the list can hold.
    pub fn cap(&self) -> NonZeroUsize {
        self.cap
    }

    /// Returns the current number of items in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Unlinks a node from its neighbors without deallocating it.
    ///
    /// # Safety
    ///
    /// `node` must be a valid non-sigil node currently linked into this
    /// list.
    unsafe fn detach(&mut self, node: *mut Node<T>) {
        // SAFETY: a linked node always has valid prev and next pointers
        // (possibly the sentinels).
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// Links a node in directly behind the head sentinel, making it the most
    /// recent item.
    ///
    /// # Safety
    ///
    /// `node` must be a valid node that is not currently linked into any
    /// list.
    unsafe fn attach_front(&mut self, node: *mut Node<T>) {
        // SAFETY: head is valid for the lifetime of the list and the caller
        // guarantees node is valid and unlinked.
        unsafe {
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*self.head).next = node;
            (*(*node).next).prev = node;
        }
    }

    /// Adds a value at the front of the list.
    ///
    /// Returns a pointer to the new node, or `None` if the list is full.
    /// The pointer stays valid until the node is removed or the list is
    /// dropped.
    pub fn add(&mut self, value: T) -> Option<*mut Node<T>> {
        if self.len == self.cap.get() {
            return None;
        }
        // SAFETY: Box::into_raw never returns null.
        let node = unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Node::new(value)))) };
        // SAFETY: node is freshly allocated and not linked anywhere yet.
        unsafe { self.attach_front(node.as_ptr()) };
        self.len += 1;
        Some(node.as_ptr())
    }

    /// Moves a node to the front of the list, making it the most recent
    /// item.
    ///
    /// # Safety
    ///
    /// `node` must point to a valid node currently linked into this list.
    pub unsafe fn move_to_front(&mut self, node: *mut Node<T>) {
        if node.is_null() || node == self.head || node == self.tail {
            return;
        }
        // SAFETY: head is always valid.
        if unsafe { (*self.head).next } == node {
            return;
        }
        // SAFETY: caller guarantees node is linked into this list.
        unsafe {
            self.detach(node);
            self.attach_front(node);
        }
    }

    /// Removes and returns the last (least recent) item, if any.
    pub fn remove_last(&mut self) -> Option<Box<Node<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: tail is valid, and a non-empty list has at least one node
        // between the sentinels.
        let prev = unsafe { (*self.tail).prev };
        if prev == self.head {
            return None;
        }
        // SAFETY: prev is a linked non-sigil node.
        unsafe {
            self.detach(prev);
            self.len -= 1;
            Some(Box::from_raw(prev))
        }
    }

    /// Removes a specific node from the list.
    ///
    /// # Safety
    ///
    /// `node` must point to a valid node currently linked into this list.
    pub unsafe fn remove(&mut self, node: *mut Node<T>) -> Option<Box<Node<T>>> {
        if self.is_empty() || node.is_null() || node == self.head || node == self.tail {
            return None;
        }
        // SAFETY: caller guarantees node is linked into this list.
        unsafe {
            self.detach(node);
            self.len -= 1;
            Some(Box::from_raw(node))
        }
    }

    /// Replaces the value of a node in place and returns the old value.
    ///
    /// # Safety
    ///
    /// `node` must point to a valid non-sigil node in this list.
    pub unsafe fn update(&mut self, node: *mut Node<T>, value: T) -> T {
        // SAFETY: caller guarantees node is a non-sigil node, so its value
        // is initialized.
        unsafe { mem::replace(&mut (*node).value, mem::MaybeUninit::new(value)).assume_init() }
    }

    /// Removes all items from the list.
    pub fn clear(&mut self) {
        while let Some(node) = self.remove_last() {
            // SAFETY: remove_last only returns non-sigil nodes.
            drop(unsafe { node.into_value() });
        }
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();

        // SAFETY: the sentinels were allocated in `new` and are only freed
        // here; null checks guard against double free.
        unsafe {
            if !self.head.is_null() {
                let _ = Box::from_raw(self.head);
                self.head = ptr::null_mut();
            }
            if !self.tail.is_null() {
                let _ = Box::from_raw(self.tail);
                self.tail = ptr::null_mut();
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("capacity", &self.cap)
            .field("length", &self.len)
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node").finish_non_exhaustive()
    }
}
