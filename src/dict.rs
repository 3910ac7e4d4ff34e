//! Sorted dictionary keyed by byte strings.
//!
//! `VDict` is a red-black tree of heap nodes linked through raw child
//! pointers. Nodes carry no parent pointer; every mutating operation
//! records the root-to-node path in a fixed stack ([`MAX_HEIGHT`] entries)
//! and rebalances by walking that stack back up. This keeps the node small
//! and the rebalancing logic iterative.
//!
//! Two per-dictionary options are fixed at construction:
//!
//! - **Insertion-order tracking** threads nodes on an intrusive doubly
//!   linked list, so [`VDict::iter_ordered`] can replay insertions without
//!   touching the tree order.
//! - A **key comparator** replaces the default bytewise comparison. All
//!   lookups and the sorted iteration follow whatever order the comparator
//!   defines.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::ptr;

use crate::string::VString;
use crate::value::Value;

/// Tree-height bound for the path stacks: `2 * log2(max node count)` is
/// the classic red-black height limit, and a tree can never hold more than
/// `usize::MAX` nodes.
const MAX_HEIGHT: usize = 2 * 8 * core::mem::size_of::<usize>();

/// Key comparator. Receives the two keys as byte slices; the returned
/// ordering defines the dictionary's sort order.
pub type KeyCmp = fn(&[u8], &[u8]) -> Ordering;

struct Node {
    left: *mut Node,
    right: *mut Node,
    red: bool,
    // Intrusive insertion-order list; only maintained when the dictionary
    // tracks order.
    order_prev: *mut Node,
    order_next: *mut Node,
    key: VString,
    value: Value,
}

/// A dictionary mapping byte-string keys to [`Value`], sorted by key.
pub struct VDict {
    root: *mut Node,
    size: usize,
    order_head: *mut Node,
    order_tail: *mut Node,
    track_order: bool,
    cmp: Option<KeyCmp>,
}

// Safety: all nodes are exclusively owned by the dictionary; nothing is
// aliased outside of borrows handed out through &self / &mut self.
unsafe impl Send for VDict {}
unsafe impl Sync for VDict {}

/// Pushes `node` and its whole left spine onto `path`, returning how many
/// entries were written.
unsafe fn leftmost_path(path: &mut [*mut Node], mut node: *mut Node) -> usize {
    let mut n = 0;
    while !node.is_null() {
        path[n] = node;
        n += 1;
        node = unsafe { (*node).left };
    }
    n
}

impl VDict {
    /// Creates an empty dictionary with bytewise key order and no
    /// insertion-order tracking.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(false, None)
    }

    /// Creates an empty dictionary that additionally records insertion
    /// order for [`VDict::iter_ordered`].
    #[must_use]
    pub fn with_order_tracking() -> Self {
        Self::with_options(true, None)
    }

    /// Creates an empty dictionary sorted by `cmp` instead of bytewise
    /// comparison.
    #[must_use]
    pub fn with_comparator(cmp: KeyCmp) -> Self {
        Self::with_options(false, Some(cmp))
    }

    /// Creates an empty dictionary with both options explicit.
    #[must_use]
    pub fn with_options(track_order: bool, cmp: Option<KeyCmp>) -> Self {
        VDict {
            root: ptr::null_mut(),
            size: 0,
            order_head: ptr::null_mut(),
            order_tail: ptr::null_mut(),
            track_order,
            cmp,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the dictionary holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if insertion order is being recorded.
    #[must_use]
    pub fn tracks_order(&self) -> bool {
        self.track_order
    }

    /// Returns `true` if a custom key comparator is installed.
    #[must_use]
    pub fn has_comparator(&self) -> bool {
        self.cmp.is_some()
    }

    fn cmp_keys(&self, a: &[u8], b: &[u8]) -> Ordering {
        match self.cmp {
            Some(f) => f(a, b),
            None => a.cmp(b),
        }
    }

    /// Returns the value stored under `key`, or `None`.
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        let key = key.as_ref();
        let mut node = self.root;
        unsafe {
            while !node.is_null() {
                match self.cmp_keys(key, (*node).key.as_bytes()) {
                    Ordering::Less => node = (*node).left,
                    Ordering::Greater => node = (*node).right,
                    Ordering::Equal => return Some(&(*node).value),
                }
            }
        }
        None
    }

    /// Mutable counterpart of [`VDict::get`].
    #[must_use]
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut Value> {
        let key = key.as_ref();
        let mut node = self.root;
        unsafe {
            while !node.is_null() {
                match self.cmp_keys(key, (*node).key.as_bytes()) {
                    Ordering::Less => node = (*node).left,
                    Ordering::Greater => node = (*node).right,
                    Ordering::Equal => return Some(&mut (*node).value),
                }
            }
        }
        None
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Returns the slot for `key`, creating it if absent.
    ///
    /// A newly created slot holds a fresh null (see [`Value::is_fresh`]),
    /// so the caller can tell whether the key existed before and build the
    /// value in place either way.
    pub fn get_or_add(&mut self, key: impl AsRef<[u8]>) -> &mut Value {
        let key = key.as_ref();
        unsafe {
            let mut path = [ptr::null_mut::<Node>(); MAX_HEIGHT];
            let mut path_len = 0usize;
            let mut last_cmp = Ordering::Equal;
            let mut node = self.root;

            while !node.is_null() {
                last_cmp = self.cmp_keys(key, (*node).key.as_bytes());
                path[path_len] = node;
                path_len += 1;
                match last_cmp {
                    Ordering::Less => node = (*node).left,
                    Ordering::Greater => node = (*node).right,
                    Ordering::Equal => return &mut (*node).value,
                }
            }

            // Not found: hang a red leaf off the last visited node.
            let new = Box::into_raw(Box::new(Node {
                left: ptr::null_mut(),
                right: ptr::null_mut(),
                red: true,
                order_prev: ptr::null_mut(),
                order_next: ptr::null_mut(),
                key: VString::new(key),
                value: Value::fresh(),
            }));

            if self.track_order {
                (*new).order_prev = self.order_tail;
                if !self.order_tail.is_null() {
                    (*self.order_tail).order_next = new;
                } else {
                    self.order_head = new;
                }
                self.order_tail = new;
            }

            if path_len > 0 {
                if last_cmp == Ordering::Less {
                    (*path[path_len - 1]).left = new;
                } else {
                    (*path[path_len - 1]).right = new;
                }
            } else {
                self.root = new;
            }

            path[path_len] = new;
            path_len += 1;
            self.fix_after_insert(&path, path_len);

            self.size += 1;
            &mut (*new).value
        }
    }

    /// Adds `key` with `value`. Returns `false` (dictionary unchanged
    /// apart from tree shape) if the key already exists.
    pub fn add(&mut self, key: impl AsRef<[u8]>, value: impl Into<Value>) -> bool {
        let slot = self.get_or_add(key);
        if slot.is_fresh() {
            *slot = value.into();
            true
        } else {
            false
        }
    }

    /// Stores `value` under `key`, replacing any existing value.
    pub fn set(&mut self, key: impl AsRef<[u8]>, value: impl Into<Value>) {
        *self.get_or_add(key) = value.into();
    }

    /// Removes `key` and returns its value, or `None` if absent.
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Option<Value> {
        let key = key.as_ref();
        unsafe {
            let mut path = [ptr::null_mut::<Node>(); MAX_HEIGHT];
            let mut path_len = 0usize;
            let mut node = self.root;

            while !node.is_null() {
                let ord = self.cmp_keys(key, (*node).key.as_bytes());
                path[path_len] = node;
                path_len += 1;
                match ord {
                    Ordering::Less => node = (*node).left,
                    Ordering::Greater => node = (*node).right,
                    Ordering::Equal => break,
                }
            }
            if node.is_null() {
                return None;
            }

            // Removal is easy at the bottom of the tree. If the node has a
            // right subtree, swap it with its in-order successor by pointer
            // surgery (the successor carries the node's place, color and
            // path slot; the node sinks to where the successor was).
            if !(*node).right.is_null() {
                let node_index = path_len - 1;
                let successor: *mut Node;

                if !(*(*node).right).left.is_null() {
                    path_len += leftmost_path(&mut path[path_len..], (*node).right);
                    successor = path[path_len - 1];

                    let tmp = (*successor).right;
                    (*successor).right = (*node).right;
                    (*node).right = tmp;

                    if (*path[path_len - 2]).left == successor {
                        (*path[path_len - 2]).left = node;
                    } else {
                        (*path[path_len - 2]).right = node;
                    }

                    path[node_index] = successor;
                    path[path_len - 1] = node;
                } else if !(*node).left.is_null() {
                    // The right child itself is the successor; the general
                    // swap above would entangle the pointers.
                    successor = (*node).right;

                    (*node).right = (*successor).right;
                    (*successor).right = node;

                    path[path_len - 1] = successor;
                    path[path_len] = node;
                    path_len += 1;
                } else {
                    // No left child: the node already has at most one child
                    // and the detach below handles it directly.
                    successor = ptr::null_mut();
                }

                if !successor.is_null() {
                    (*successor).left = (*node).left;
                    (*node).left = ptr::null_mut();

                    if node_index > 0 {
                        if (*path[node_index - 1]).left == node {
                            (*path[node_index - 1]).left = successor;
                        } else {
                            (*path[node_index - 1]).right = successor;
                        }
                    } else {
                        self.root = successor;
                    }

                    if (*successor).red != (*node).red {
                        (*successor).red = !(*successor).red;
                        (*node).red = !(*node).red;
                    }
                }
            }

            // The node now has at most one child; splice that child into
            // the node's place. The path slot may become null.
            let single_child = if !(*node).left.is_null() {
                (*node).left
            } else {
                (*node).right
            };
            if path_len > 1 {
                if (*path[path_len - 2]).left == node {
                    (*path[path_len - 2]).left = single_child;
                } else {
                    (*path[path_len - 2]).right = single_child;
                }
            } else {
                self.root = single_child;
            }
            path[path_len - 1] = single_child;

            // Removing a black node leaves its path one black short.
            if !(*node).red {
                self.fix_after_remove(&mut path, path_len);
            }

            if self.track_order {
                if !(*node).order_prev.is_null() {
                    (*(*node).order_prev).order_next = (*node).order_next;
                } else {
                    self.order_head = (*node).order_next;
                }
                if !(*node).order_next.is_null() {
                    (*(*node).order_next).order_prev = (*node).order_prev;
                } else {
                    self.order_tail = (*node).order_prev;
                }
            }

            let boxed = Box::from_raw(node);
            self.size -= 1;
            Some(boxed.value)
        }
    }

    /// Removes all entries. The order-tracking and comparator options are
    /// kept, so the dictionary is reusable as configured.
    pub fn clear(&mut self) {
        unsafe {
            let mut stack = [ptr::null_mut::<Node>(); MAX_HEIGHT];
            let mut stack_len = leftmost_path(&mut stack, self.root);

            while stack_len > 0 {
                stack_len -= 1;
                let node = stack[stack_len];
                let right = (*node).right;

                drop(Box::from_raw(node));

                stack_len += leftmost_path(&mut stack[stack_len..], right);
            }
        }

        self.root = ptr::null_mut();
        self.size = 0;
        self.order_head = ptr::null_mut();
        self.order_tail = ptr::null_mut();
    }

    /// Rotates the subtree rooted at `node` to the left. `parent` is the
    /// node's parent, or null when `node` is the root.
    unsafe fn rotate_left(&mut self, parent: *mut Node, node: *mut Node) {
        unsafe {
            let tmp = (*node).right;
            (*node).right = (*tmp).left;
            (*tmp).left = node;

            if !parent.is_null() {
                if (*parent).left == node {
                    (*parent).left = tmp;
                } else if (*parent).right == node {
                    (*parent).right = tmp;
                }
            } else {
                self.root = tmp;
            }
        }
    }

    unsafe fn rotate_right(&mut self, parent: *mut Node, node: *mut Node) {
        unsafe {
            let tmp = (*node).left;
            (*node).left = (*tmp).right;
            (*tmp).right = node;

            if !parent.is_null() {
                if (*parent).right == node {
                    (*parent).right = tmp;
                } else if (*parent).left == node {
                    (*parent).left = tmp;
                }
            } else {
                self.root = tmp;
            }
        }
    }

    /// Restores the red-black invariants after inserting the red node at
    /// `path[path_len - 1]`.
    unsafe fn fix_after_insert(&mut self, path: &[*mut Node; MAX_HEIGHT], mut path_len: usize) {
        unsafe {
            loop {
                let mut node = path[path_len - 1];
                let mut parent = if path_len > 1 {
                    path[path_len - 2]
                } else {
                    ptr::null_mut()
                };
                if parent.is_null() {
                    (*node).red = false;
                    self.root = node;
                    break;
                }

                if !(*parent).red {
                    break;
                }

                // Double red: node and parent are both red. A red parent
                // cannot be the root, so the grandparent exists.
                let grandparent = path[path_len - 3];
                let uncle = if (*grandparent).left == parent {
                    (*grandparent).right
                } else {
                    (*grandparent).left
                };

                if uncle.is_null() || !(*uncle).red {
                    // Black uncle: one or two rotations settle it.
                    let grandgrandparent = if path_len > 3 {
                        path[path_len - 4]
                    } else {
                        ptr::null_mut()
                    };

                    // Straighten a zig-zag first.
                    if !(*grandparent).left.is_null() && (*(*grandparent).left).right == node {
                        self.rotate_left(grandparent, parent);
                        parent = node;
                        node = (*node).left;
                    } else if !(*grandparent).right.is_null()
                        && (*(*grandparent).right).left == node
                    {
                        self.rotate_right(grandparent, parent);
                        parent = node;
                        node = (*node).right;
                    }
                    if (*parent).left == node {
                        self.rotate_right(grandgrandparent, grandparent);
                    } else {
                        self.rotate_left(grandgrandparent, grandparent);
                    }

                    // After the rotations `parent` sits where the
                    // grandparent was; swap their colors so the subtree
                    // root is black again.
                    (*parent).red = false;
                    (*grandparent).red = true;
                    break;
                }

                // Red uncle: recolor and push the double-red issue two
                // levels up.
                (*parent).red = false;
                (*uncle).red = false;
                (*grandparent).red = true;
                path_len -= 2;
            }
        }
    }

    /// Restores the red-black invariants after the path has been made one
    /// black node shorter. `path[path_len - 1]` may be null when the
    /// removed node had no child.
    unsafe fn fix_after_remove(&mut self, path: &mut [*mut Node; MAX_HEIGHT], mut path_len: usize) {
        unsafe {
            loop {
                let node = path[path_len - 1];
                if !node.is_null() && (*node).red {
                    (*node).red = false;
                    break;
                }

                let parent = if path_len > 1 {
                    path[path_len - 2]
                } else {
                    ptr::null_mut()
                };
                if parent.is_null() {
                    break;
                }

                // The sibling must exist: its subtree has our black count
                // plus one.
                let mut sibling = if (*parent).left == node {
                    (*parent).right
                } else {
                    (*parent).left
                };
                let grandparent = if path_len > 2 {
                    path[path_len - 3]
                } else {
                    ptr::null_mut()
                };

                if (*sibling).red {
                    // Red sibling: convert to a black-sibling case.
                    if (*parent).left == node {
                        self.rotate_left(grandparent, parent);
                    } else {
                        self.rotate_right(grandparent, parent);
                    }
                    (*sibling).red = false;
                    (*parent).red = true;

                    path[path_len - 2] = sibling;
                    path[path_len - 1] = parent;
                    path[path_len] = node;
                    path_len += 1;
                    continue;
                }

                let left_red = !(*sibling).left.is_null() && (*(*sibling).left).red;
                let right_red = !(*sibling).right.is_null() && (*(*sibling).right).red;
                if left_red || right_red {
                    // Black sibling with at least one red child.
                    if node == (*parent).left
                        && ((*sibling).right.is_null() || !(*(*sibling).right).red)
                    {
                        (*sibling).red = true;
                        (*(*sibling).left).red = false;
                        self.rotate_right(parent, sibling);
                        sibling = (*parent).right;
                    } else if node == (*parent).right
                        && ((*sibling).left.is_null() || !(*(*sibling).left).red)
                    {
                        (*sibling).red = true;
                        (*(*sibling).right).red = false;
                        self.rotate_left(parent, sibling);
                        sibling = (*parent).left;
                    }

                    if (*sibling).red != (*parent).red {
                        (*sibling).red = !(*sibling).red;
                    }
                    (*parent).red = false;
                    if node == (*parent).left {
                        (*(*sibling).right).red = false;
                        self.rotate_left(grandparent, parent);
                    } else {
                        (*(*sibling).left).red = false;
                        self.rotate_right(grandparent, parent);
                    }
                    break;
                }

                // Black sibling with both children black: shorten its
                // subtree to match ours and move the black deficit to the
                // parent level.
                if (*parent).red {
                    (*sibling).red = true;
                    (*parent).red = false;
                    break;
                }
                (*sibling).red = true;
                path_len -= 1;
            }
        }
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> Iter<'_> {
        let mut stack = Vec::with_capacity(MAX_HEIGHT);
        unsafe {
            push_leftmost(&mut stack, self.root);
        }
        Iter {
            stack,
            _dict: PhantomData,
        }
    }

    /// Mutable counterpart of [`VDict::iter`].
    pub fn iter_mut(&mut self) -> IterMut<'_> {
        let mut stack = Vec::with_capacity(MAX_HEIGHT);
        unsafe {
            push_leftmost(&mut stack, self.root);
        }
        IterMut {
            stack,
            _dict: PhantomData,
        }
    }

    /// Iterates over keys in key order.
    pub fn keys(&self) -> Keys<'_> {
        Keys { inner: self.iter() }
    }

    /// Iterates over entries in insertion order. Returns `None` when the
    /// dictionary was created without order tracking.
    pub fn iter_ordered(&self) -> Option<OrderedIter<'_>> {
        if !self.track_order {
            return None;
        }
        Some(OrderedIter {
            node: self.order_head,
            _dict: PhantomData,
        })
    }

    /// Iterates over keys in insertion order. Returns `None` when the
    /// dictionary was created without order tracking.
    pub fn keys_ordered(&self) -> Option<OrderedKeys<'_>> {
        Some(OrderedKeys {
            inner: self.iter_ordered()?,
        })
    }
}

unsafe fn push_leftmost(stack: &mut Vec<*mut Node>, mut node: *mut Node) {
    while !node.is_null() {
        stack.push(node);
        node = unsafe { (*node).left };
    }
}

impl Drop for VDict {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Default for VDict {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for VDict {
    fn clone(&self) -> Self {
        let mut copy = VDict::with_options(self.track_order, self.cmp);
        if let Some(ordered) = self.iter_ordered() {
            // Replay insertions so the copy's order list matches.
            for (key, value) in ordered {
                *copy.get_or_add(key) = value.clone();
            }
        } else {
            for (key, value) in self.iter() {
                *copy.get_or_add(key) = value.clone();
            }
        }
        copy
    }
}

impl PartialEq for VDict {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Debug for VDict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: AsRef<[u8]>, V: Into<Value>> FromIterator<(K, V)> for VDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = VDict::new();
        dict.extend(iter);
        dict
    }
}

impl<K: AsRef<[u8]>, V: Into<Value>> Extend<(K, V)> for VDict {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a VDict {
    type Item = (&'a VString, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sorted iterator over `(&key, &value)` pairs.
///
/// Walks the tree with an explicit stack: pop a node, visit it, then push
/// the left spine of its right subtree.
pub struct Iter<'a> {
    stack: Vec<*mut Node>,
    _dict: PhantomData<&'a VDict>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a VString, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        unsafe {
            push_leftmost(&mut self.stack, (*node).right);
            Some((&(*node).key, &(*node).value))
        }
    }
}

/// Sorted iterator over `(&key, &mut value)` pairs.
pub struct IterMut<'a> {
    stack: Vec<*mut Node>,
    _dict: PhantomData<&'a mut VDict>,
}

impl<'a> Iterator for IterMut<'a> {
    type Item = (&'a VString, &'a mut Value);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        unsafe {
            push_leftmost(&mut self.stack, (*node).right);
            Some((&(*node).key, &mut (*node).value))
        }
    }
}

/// Sorted iterator over keys.
pub struct Keys<'a> {
    inner: Iter<'a>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a VString;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

/// Insertion-order iterator over `(&key, &value)` pairs.
pub struct OrderedIter<'a> {
    node: *mut Node,
    _dict: PhantomData<&'a VDict>,
}

impl<'a> Iterator for OrderedIter<'a> {
    type Item = (&'a VString, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.node.is_null() {
            return None;
        }
        unsafe {
            let node = self.node;
            self.node = (*node).order_next;
            Some((&(*node).key, &(*node).value))
        }
    }
}

/// Insertion-order iterator over keys.
pub struct OrderedKeys<'a> {
    inner: OrderedIter<'a>,
}

impl<'a> Iterator for OrderedKeys<'a> {
    type Item = &'a VString;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

#[cfg(test)]
impl VDict {
    /// Asserts the red-black invariants: black root, no red node with a
    /// red child, equal black height on every root-to-leaf path.
    fn check_invariants(&self) {
        if self.root.is_null() {
            return;
        }
        unsafe {
            assert!(!(*self.root).red, "root must be black");
            assert!(black_height(self.root) > 0, "black height mismatch");
        }
    }
}

/// Black height of the subtree, or -1 on a violated invariant.
#[cfg(test)]
unsafe fn black_height(node: *mut Node) -> i32 {
    unsafe {
        let left_height = if !(*node).left.is_null() {
            if (*node).red && (*(*node).left).red {
                return -1;
            }
            let h = black_height((*node).left);
            if h < 0 {
                return h;
            }
            h
        } else {
            1
        };

        let right_height = if !(*node).right.is_null() {
            if (*node).red && (*(*node).right).red {
                return -1;
            }
            let h = black_height((*node).right);
            if h < 0 {
                return h;
            }
            h
        } else {
            1
        };

        if left_height != right_height {
            return -1;
        }

        left_height + if (*node).red { 0 } else { 1 }
    }
}


#[cfg(all(test, feature = "bolero-inline-tests"))]
mod bolero_props {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;
    use bolero::check;

    #[test]
    fn bolero_dict_matches_btreemap() {
        check!().with_type::<Vec<(u8, bool)>>().for_each(|ops: &Vec<(u8, bool)>| {
            let mut dict = VDict::new();
            let mut model: BTreeMap<Vec<u8>, i32> = BTreeMap::new();

            for (i, (key_byte, is_insert)) in ops.iter().take(64).enumerate() {
                let key = alloc::vec![*key_byte % 16];
                if *is_insert {
                    dict.set(&key, i as i32);
                    model.insert(key, i as i32);
                } else {
                    assert_eq!(dict.remove(&key).is_some(), model.remove(&key).is_some());
                }
                dict.check_invariants();
            }

            assert_eq!(dict.len(), model.len());
            for ((dk, dv), (mk, mv)) in dict.iter().zip(model.iter()) {
                assert_eq!(dk.as_bytes(), &mk[..]);
                assert_eq!(dv.as_i32(), *mv);
            }
        });
    }
}
