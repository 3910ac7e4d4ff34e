//! Growable array of values.
//!
//! `VArray` manages a single contiguous heap buffer of [`Value`] with the
//! classic doubling policy: capacity doubles when full (starting at 1) and
//! halves once occupancy drops below a quarter. Elements keep their order;
//! insertion and removal shift the tail.
//!
//! [`VArray::append`] and [`VArray::insert`] hand out the new slot as
//! `&mut Value` holding a fresh null, so a caller can build the element in
//! place.

use alloc::alloc::{Layout, alloc, dealloc, handle_alloc_error, realloc};
use core::fmt::{self, Debug, Formatter};
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr::{self, NonNull};
use core::slice;

use crate::value::Value;

/// A growable array of [`Value`].
pub struct VArray {
    buf: NonNull<Value>,
    len: usize,
    cap: usize,
}

// Safety: the buffer is exclusively owned; Value itself is Send + Sync.
unsafe impl Send for VArray {}
unsafe impl Sync for VArray {}

impl VArray {
    fn layout(cap: usize) -> Layout {
        Layout::array::<Value>(cap).unwrap()
    }

    /// Creates an empty array without allocating.
    #[must_use]
    pub const fn new() -> Self {
        VArray {
            buf: NonNull::dangling(),
            len: 0,
            cap: 0,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current capacity in elements.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Reallocates the buffer to exactly `new_cap` elements.
    /// `new_cap >= self.len` must hold.
    fn set_capacity(&mut self, new_cap: usize) {
        debug_assert!(new_cap >= self.len);
        if new_cap == self.cap {
            return;
        }

        unsafe {
            if new_cap == 0 {
                dealloc(self.buf.as_ptr().cast(), Self::layout(self.cap));
                self.buf = NonNull::dangling();
            } else if self.cap == 0 {
                let new_layout = Self::layout(new_cap);
                let raw = alloc(new_layout).cast::<Value>();
                let Some(ptr) = NonNull::new(raw) else {
                    handle_alloc_error(new_layout);
                };
                self.buf = ptr;
            } else {
                let old_layout = Self::layout(self.cap);
                let new_layout = Self::layout(new_cap);
                let raw =
                    realloc(self.buf.as_ptr().cast(), old_layout, new_layout.size()).cast::<Value>();
                let Some(ptr) = NonNull::new(raw) else {
                    handle_alloc_error(new_layout);
                };
                self.buf = ptr;
            }
        }
        self.cap = new_cap;
    }

    /// Returns the element at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.as_slice().get(index)
    }

    /// Mutable counterpart of [`VArray::get`].
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.as_mut_slice().get_mut(index)
    }

    /// All elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// All elements as a mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [Value] {
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Appends a fresh null slot at the end and returns it for in-place
    /// initialization.
    pub fn append(&mut self) -> &mut Value {
        let index = self.len;
        match self.insert(index) {
            Some(slot) => slot,
            // Inserting at len never fails.
            None => unreachable!(),
        }
    }

    /// Inserts a fresh null slot at `index`, shifting the tail right.
    /// Returns `None` (array unchanged) if `index > len`.
    pub fn insert(&mut self, index: usize) -> Option<&mut Value> {
        if index > self.len {
            return None;
        }

        if self.len == self.cap {
            let new_cap = if self.cap > 0 { self.cap * 2 } else { 1 };
            self.set_capacity(new_cap);
        }

        unsafe {
            let base = self.buf.as_ptr();
            if index < self.len {
                ptr::copy(base.add(index), base.add(index + 1), self.len - index);
            }
            ptr::write(base.add(index), Value::fresh());
            self.len += 1;
            Some(&mut *base.add(index))
        }
    }

    /// Appends `value` at the end.
    pub fn push(&mut self, value: impl Into<Value>) {
        *self.append() = value.into();
    }

    /// Removes the element at `index` and returns it, shifting the tail
    /// left. Returns `None` (array unchanged) past the end.
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index >= self.len {
            return None;
        }

        unsafe {
            let base = self.buf.as_ptr();
            let removed = ptr::read(base.add(index));
            ptr::copy(base.add(index + 1), base.add(index), self.len - index - 1);
            self.len -= 1;
            self.maybe_shrink();
            Some(removed)
        }
    }

    /// Removes `count` elements starting at `index`, dropping them and
    /// shifting the tail left. Returns `false` (array unchanged) if the
    /// range reaches past the end.
    pub fn remove_range(&mut self, index: usize, count: usize) -> bool {
        let Some(end) = index.checked_add(count) else {
            return false;
        };
        if end > self.len {
            return false;
        }

        unsafe {
            let base = self.buf.as_ptr();
            for i in index..end {
                ptr::drop_in_place(base.add(i));
            }
            ptr::copy(base.add(end), base.add(index), self.len - end);
            self.len -= count;
        }
        self.maybe_shrink();
        true
    }

    /// Halves the capacity once occupancy drops below a quarter.
    fn maybe_shrink(&mut self) {
        if 4 * self.len < self.cap {
            let new_cap = self.cap / 2;
            self.set_capacity(new_cap);
        }
    }

    /// Drops all elements and releases the buffer.
    pub fn clear(&mut self) {
        unsafe {
            for i in 0..self.len {
                ptr::drop_in_place(self.buf.as_ptr().add(i));
            }
        }
        self.len = 0;
        self.set_capacity(0);
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.as_slice().iter()
    }

    /// Mutable counterpart of [`VArray::iter`].
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Value> {
        self.as_mut_slice().iter_mut()
    }
}

impl Drop for VArray {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Default for VArray {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for VArray {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl PartialEq for VArray {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Debug for VArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Deref for VArray {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        self.as_slice()
    }
}

impl DerefMut for VArray {
    fn deref_mut(&mut self) -> &mut [Value] {
        self.as_mut_slice()
    }
}

impl Index<usize> for VArray {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for VArray {
    fn index_mut(&mut self, index: usize) -> &mut Value {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: Into<Value>> FromIterator<T> for VArray {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = VArray::new();
        arr.extend(iter);
        arr
    }
}

impl<T: Into<Value>> Extend<T> for VArray {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a> IntoIterator for &'a VArray {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut VArray {
    type Item = &'a mut Value;
    type IntoIter = slice::IterMut<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
