use std::ops::Range;

use crate::config::RendererConfig;

use super::{sector::ViewVertex, wall::WallColumn};

/// Fixed-capacity bump pool handing out index ranges.
///
/// Storage is allocated once; `rewind` just moves the cursor back, so the
/// traversal never allocates.
#[derive(Clone, Debug, Default)]
pub struct Pool<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T: Copy + Default> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: vec![T::default(); capacity],
            cursor: 0,
        }
    }

    /// Reserve `len` consecutive slots, or `None` if the pool is exhausted.
    pub fn alloc(&mut self, len: usize) -> Option<Range<usize>> {
        let start = self.cursor;
        let end = start.checked_add(len)?;
        if end > self.items.len() {
            return None;
        }
        self.cursor = end;
        Some(start..end)
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn used(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn slice(&self, r: Range<usize>) -> &[T] {
        &self.items[r]
    }

    #[inline(always)]
    pub fn slice_mut(&mut self, r: Range<usize>) -> &mut [T] {
        &mut self.items[r]
    }

    fn ensure_capacity(&mut self, capacity: usize) {
        if self.items.len() != capacity {
            self.items = vec![T::default(); capacity];
        }
        self.cursor = 0;
    }
}

/// Geometry scratch for one frame.
#[derive(Clone, Debug, Default)]
pub struct Arena {
    pub vertices: Pool<ViewVertex>,
    pub columns: Pool<WallColumn>,
}

impl Arena {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            vertices: Pool::with_capacity(config.arena_vertices),
            columns: Pool::with_capacity(config.arena_columns),
        }
    }

    /// Level load: resize to the configured capacities and empty both pools.
    pub fn reset(&mut self, config: &RendererConfig) {
        self.vertices.ensure_capacity(config.arena_vertices);
        self.columns.ensure_capacity(config.arena_columns);
    }

    /// Start of every frame.
    pub fn rewind(&mut self) {
        self.vertices.rewind();
        self.columns.rewind();
    }
}
