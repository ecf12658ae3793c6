//! Reusable scratch memory for the matching algorithms.
//!
//! A [`Slab`] is created once per worker and handed to every match call. Each
//! call takes a fresh [`SlabCursor`] over it and carves disjoint sub-slices
//! with a bump allocator, so no heap allocation happens per candidate.

/// Default number of 16-bit cells (200KB).
pub const SLAB_16_SIZE: usize = 100 * 1024;
/// Default number of 32-bit cells (8KB).
pub const SLAB_32_SIZE: usize = 2048;

/// Two preallocated typed buffers.
///
/// A slab must not be shared between concurrently running calls; give every
/// worker thread its own.
#[derive(Debug, Clone)]
pub struct Slab {
    i16: Vec<i16>,
    u32: Vec<u32>,
}

impl Default for Slab {
    fn default() -> Self {
        Self::new(SLAB_16_SIZE, SLAB_32_SIZE)
    }
}

impl Slab {
    /// Allocates a slab with `size16` 16-bit cells and `size32` 32-bit cells.
    pub fn new(size16: usize, size32: usize) -> Self {
        Self {
            i16: vec![0; size16],
            u32: vec![0; size32],
        }
    }

    /// Number of 16-bit cells.
    pub fn capacity16(&self) -> usize {
        self.i16.len()
    }

    /// Number of 32-bit cells.
    pub fn capacity32(&self) -> usize {
        self.u32.len()
    }

    /// Starts a new allocation pass at offset zero.
    pub fn cursor(&mut self) -> SlabCursor<'_> {
        SlabCursor {
            i16: &mut self.i16,
            u32: &mut self.u32,
        }
    }
}

/// Bump allocator over a [`Slab`] for the duration of one call.
///
/// Handed-out slices are disjoint and keep whatever the previous call left in
/// them; callers initialize what they read.
#[derive(Debug)]
pub struct SlabCursor<'a> {
    i16: &'a mut [i16],
    u32: &'a mut [u32],
}

impl<'a> SlabCursor<'a> {
    /// Takes the next `size` 16-bit cells, or `None` if fewer remain.
    pub fn alloc16(&mut self, size: usize) -> Option<&'a mut [i16]> {
        if self.i16.len() < size {
            return None;
        }
        let (head, tail) = std::mem::take(&mut self.i16).split_at_mut(size);
        self.i16 = tail;
        Some(head)
    }

    /// Takes the next `size` 32-bit cells, or `None` if fewer remain.
    pub fn alloc32(&mut self, size: usize) -> Option<&'a mut [u32]> {
        if self.u32.len() < size {
            return None;
        }
        let (head, tail) = std::mem::take(&mut self.u32).split_at_mut(size);
        self.u32 = tail;
        Some(head)
    }

    /// Remaining 16-bit cells.
    pub fn remaining16(&self) -> usize {
        self.i16.len()
    }

    /// Remaining 32-bit cells.
    pub fn remaining32(&self) -> usize {
        self.u32.len()
    }
}
