//! Array store
//!
//! Fixed-length integer arrays declared in the program. Each array remembers
//! the call-stack depth that created it, but arrays are never removed: their
//! storage lives as long as the interpreter, even after the declaring call
//! has returned.

use super::MemoryError;
use tracing::debug;

/// Index of an array in the store; the value bound to the declaring variable
pub type ArrayId = i32;

#[derive(Debug, Clone)]
struct Array {
    elements: Vec<i32>,
    scope_depth: usize,
}

/// Registry of every array created during a run
#[derive(Debug, Clone, Default)]
pub struct ArrayStore {
    arrays: Vec<Array>,
}

impl ArrayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-filled array of `len` elements
    pub fn create(&mut self, len: usize, scope_depth: usize) -> ArrayId {
        let id = self.arrays.len() as ArrayId;
        self.arrays.push(Array {
            elements: vec![0; len],
            scope_depth,
        });
        debug!(id, len, scope_depth, "array create");
        id
    }

    pub fn get(&self, id: ArrayId, index: i32) -> Result<i32, MemoryError> {
        let array = self.array(id)?;
        let slot = Self::slot(array, index)?;
        Ok(array.elements[slot])
    }

    pub fn set(&mut self, id: ArrayId, index: i32, value: i32) -> Result<(), MemoryError> {
        let array = self.array_mut(id)?;
        let slot = Self::slot(array, index)?;
        array.elements[slot] = value;
        debug!(id, index, value, "array write");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn len(&self, id: ArrayId) -> Result<usize, MemoryError> {
        Ok(self.array(id)?.elements.len())
    }

    /// Call-stack depth at which the array was declared
    pub fn scope_depth(&self, id: ArrayId) -> Result<usize, MemoryError> {
        Ok(self.array(id)?.scope_depth)
    }

    /// Number of arrays created so far
    #[cfg(test)]
    pub(crate) fn count(&self) -> usize {
        self.arrays.len()
    }

    fn array(&self, id: ArrayId) -> Result<&Array, MemoryError> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.arrays.get(i))
            .ok_or(MemoryError::InvalidArray(id))
    }

    fn array_mut(&mut self, id: ArrayId) -> Result<&mut Array, MemoryError> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.arrays.get_mut(i))
            .ok_or(MemoryError::InvalidArray(id))
    }

    fn slot(array: &Array, index: i32) -> Result<usize, MemoryError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < array.elements.len())
            .ok_or(MemoryError::ArrayIndexOutOfBounds {
                index,
                len: array.elements.len(),
            })
    }
}
