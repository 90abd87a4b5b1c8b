//! Interpreter configuration

use crate::interpreter::constants::{DEFAULT_HEAP_CAPACITY, DEFAULT_MAX_CALL_DEPTH};

/// Settings for one interpreter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Size of the simulated heap in bytes
    pub heap_capacity: usize,

    /// Abort on unsupported constructs instead of reporting them and continuing
    pub strict: bool,

    /// Nested user function calls allowed before the run is aborted
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            heap_capacity: DEFAULT_HEAP_CAPACITY,
            strict: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}
