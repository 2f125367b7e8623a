//! Scoped buffers for marshaling arrays across a single native call.

use std::cell::Cell;
use std::ops::{Deref, DerefMut};

use bytemuck::Zeroable;

thread_local! {
    static OUTSTANDING: Cell<usize> = const { Cell::new(0) };
}

/// Number of scratch buffers alive on the current thread.
pub fn outstanding() -> usize {
    OUTSTANDING.with(|c| c.get())
}

/// A buffer of exactly `len` native elements, released when it goes out of
/// scope on every exit path.
pub struct ScratchBuffer<T> {
    items: Vec<T>,
}

impl<T: Copy + Zeroable> ScratchBuffer<T> {
    /// A zeroed buffer for the native side to fill.
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![T::zeroed(); len])
    }
}

impl<T> ScratchBuffer<T> {
    /// A buffer populated element-wise from managed values.
    pub fn from_iter_exact<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = iter.into_iter();
        let mut items = Vec::with_capacity(iter.len());
        items.extend(iter);
        Self::from_vec(items)
    }

    fn from_vec(items: Vec<T>) -> Self {
        OUTSTANDING.with(|c| c.set(c.get() + 1));
        Self { items }
    }

    /// Pointer for the native call; null when empty.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        if self.items.is_empty() {
            std::ptr::null_mut()
        } else {
            self.items.as_mut_ptr()
        }
    }

    pub fn as_ptr(&self) -> *const T {
        if self.items.is_empty() {
            std::ptr::null()
        } else {
            self.items.as_ptr()
        }
    }
}

impl<T> Deref for ScratchBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for ScratchBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T> Drop for ScratchBuffer<T> {
    fn drop(&mut self) {
        OUTSTANDING.with(|c| c.set(c.get() - 1));
    }
}
