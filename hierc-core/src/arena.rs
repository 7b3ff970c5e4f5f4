//! Fixed-capacity bump arena for allocations scoped to a single parse.
//!
//! Allocations are never freed individually. The whole arena is either
//! reset (offset back to zero) between passes or dropped with its owner.

use crate::error::CoreError;

/// Capacity used when a zero capacity is requested.
pub const DEFAULT_ARENA_CAPACITY: usize = 0x100000;

const ALIGN: usize = 8;

/// Handle to a region handed out by [`MemArena::allocate`].
///
/// A span is only meaningful for the arena that produced it, and only until
/// that arena is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaSpan {
    offset: usize,
    len: usize,
}

impl ArenaSpan {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug)]
pub struct MemArena {
    buffer: Box<[u8]>,
    consumed: usize,
}

impl MemArena {
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_ARENA_CAPACITY
        } else {
            capacity
        };
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            consumed: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes handed out so far, including alignment padding.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Reserve `size` bytes, rounded up to an 8-byte boundary.
    pub fn allocate(&mut self, size: usize) -> Result<ArenaSpan, CoreError> {
        let overage = (ALIGN - (size % ALIGN)) % ALIGN;
        let amount = size
            .checked_add(overage)
            .ok_or(CoreError::ArenaExhausted {
                requested: size,
                capacity: self.capacity(),
            })?;
        if amount > self.capacity() - self.consumed {
            return Err(CoreError::ArenaExhausted {
                requested: size,
                capacity: self.capacity(),
            });
        }
        let span = ArenaSpan {
            offset: self.consumed,
            len: size,
        };
        self.consumed += amount;
        Ok(span)
    }

    pub fn bytes(&self, span: ArenaSpan) -> &[u8] {
        &self.buffer[span.offset..span.offset + span.len]
    }

    pub fn bytes_mut(&mut self, span: ArenaSpan) -> &mut [u8] {
        &mut self.buffer[span.offset..span.offset + span.len]
    }

    /// Copy `text` into the arena and return the arena-backed copy.
    pub fn alloc_str(&mut self, text: &str) -> Result<&str, CoreError> {
        let span = self.allocate(text.len())?;
        let bytes = self.bytes_mut(span);
        bytes.copy_from_slice(text.as_bytes());
        // Only ever filled from a `&str`, so the bytes are valid UTF-8.
        Ok(std::str::from_utf8(bytes).unwrap_or_default())
    }

    /// Release every allocation at once.
    pub fn reset(&mut self) {
        self.consumed = 0;
    }
}

impl Default for MemArena {
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_CAPACITY)
    }
}
