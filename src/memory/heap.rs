//! Heap implementation for the interpreter
//!
//! A single contiguous byte region of fixed capacity with a bump-pointer
//! allocation offset:
//! - Allocation hands out consecutive byte ranges and never reuses them
//! - `free` is accepted but reclaims nothing
//! - Integers are stored as 4 little-endian bytes at any byte offset
//!
//! Exceeding the capacity is fatal; the simulated heap has no paging.

use super::{Address, MemoryError};
use crate::interpreter::constants::{DEFAULT_HEAP_CAPACITY, INT_SIZE, POINTER_SIZE};
use tracing::debug;

/// The heap
#[derive(Debug, Clone)]
pub struct Heap {
    bytes: Vec<u8>,
    offset: usize,
}

impl Heap {
    /// Create a zero-filled heap of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Heap {
            bytes: vec![0; capacity],
            offset: 0,
        }
    }

    /// Reserve `size` bytes and return the address of the first one
    pub fn allocate(&mut self, size: i32) -> Result<Address, MemoryError> {
        let requested =
            usize::try_from(size).map_err(|_| MemoryError::InvalidAllocationSize(size))?;

        let end = self.offset + requested;
        if end > self.bytes.len() {
            return Err(MemoryError::HeapExhausted {
                requested: size,
                used: self.offset,
                capacity: self.bytes.len(),
            });
        }

        let addr = Address::try_from(self.offset)
            .map_err(|_| MemoryError::InvalidAllocationSize(size))?;
        self.offset = end;
        debug!(addr, size, used = self.offset, "heap allocate");
        Ok(addr)
    }

    /// Release a block. Space is never reclaimed.
    pub fn free(&mut self, addr: Address) {
        debug!(addr, "heap free (no reclamation)");
    }

    /// Read the integer stored at `addr`
    pub fn read(&self, addr: Address) -> Result<i32, MemoryError> {
        let start = self.checked_range(addr)?;
        let mut word = [0u8; INT_SIZE as usize];
        word.copy_from_slice(&self.bytes[start..start + INT_SIZE as usize]);
        Ok(i32::from_le_bytes(word))
    }

    /// Store `value` at `addr`
    pub fn write(&mut self, addr: Address, value: i32) -> Result<(), MemoryError> {
        let start = self.checked_range(addr)?;
        self.bytes[start..start + INT_SIZE as usize].copy_from_slice(&value.to_le_bytes());
        debug!(addr, value, "heap write");
        Ok(())
    }

    /// Size of a pointer value in bytes
    pub fn ptr_size(&self) -> i32 {
        POINTER_SIZE
    }

    /// Byte distance covered by stepping a pointer over `n` elements
    pub fn step_to_size(&self, n: i32) -> i32 {
        n.wrapping_mul(INT_SIZE)
    }

    /// Total capacity in bytes
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes handed out so far
    #[cfg(test)]
    pub(crate) fn used(&self) -> usize {
        self.offset
    }

    /// Start index of the integer at `addr`, if all of its bytes are inside the region
    fn checked_range(&self, addr: Address) -> Result<usize, MemoryError> {
        usize::try_from(addr)
            .ok()
            .filter(|start| start + INT_SIZE as usize <= self.bytes.len())
            .ok_or(MemoryError::InvalidHeapAccess(addr))
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(DEFAULT_HEAP_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_is_monotonic() {
        let mut heap = Heap::new(64);
        let a = heap.allocate(16).unwrap();
        let b = heap.allocate(8).unwrap();
        assert_eq!(a, 0);
        assert_eq!(b - a, 16);
        assert_eq!(heap.used(), 24);
    }

    #[test]
    fn test_free_does_not_reuse_space() {
        let mut heap = Heap::new(64);
        let a = heap.allocate(8).unwrap();
        heap.free(a);
        let b = heap.allocate(8).unwrap();
        assert_eq!(b, a + 8);
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let mut heap = Heap::new(16);
        heap.allocate(12).unwrap();
        assert_eq!(
            heap.allocate(8),
            Err(MemoryError::HeapExhausted {
                requested: 8,
                used: 12,
                capacity: 16,
            })
        );
        // Filling the heap exactly is fine
        assert_eq!(heap.allocate(4), Ok(12));
    }

    #[test]
    fn test_negative_allocation_rejected() {
        let mut heap = Heap::new(16);
        assert_eq!(heap.allocate(-4), Err(MemoryError::InvalidAllocationSize(-4)));
    }

    #[test]
    fn test_read_write_integers() {
        let mut heap = Heap::new(16);
        heap.write(0, 42).unwrap();
        heap.write(4, -7).unwrap();
        assert_eq!(heap.read(0).unwrap(), 42);
        assert_eq!(heap.read(4).unwrap(), -7);
        // Unaligned reads see the little-endian byte layout
        heap.write(8, 0x0102_0304).unwrap();
        assert_eq!(heap.read(9).unwrap() & 0xff, 0x03);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut heap = Heap::new(8);
        assert_eq!(heap.read(5), Err(MemoryError::InvalidHeapAccess(5)));
        assert_eq!(heap.write(-1, 3), Err(MemoryError::InvalidHeapAccess(-1)));
        assert!(heap.write(4, 3).is_ok());
    }

    #[test]
    fn test_sizes() {
        let heap = Heap::default();
        assert_eq!(heap.capacity(), 4096);
        assert_eq!(heap.ptr_size(), 4);
        assert_eq!(heap.step_to_size(3), 12);
    }
}
