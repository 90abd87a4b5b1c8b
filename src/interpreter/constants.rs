// Constants for the C interpreter

/// Size in bytes of an `int` (and of every scalar integer in the model)
pub const INT_SIZE: i32 = 4;

/// Size in bytes of a pointer, whatever it points to
pub const POINTER_SIZE: i32 = 4;

/// Default capacity of the simulated heap in bytes
pub const DEFAULT_HEAP_CAPACITY: usize = 4 * 1024;

/// Default limit on nested user function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Name of the entry function
pub const ENTRY_FUNCTION: &str = "main";

/// Built-in reading one integer from the input stream
pub const BUILTIN_GET: &str = "GET";

/// Built-in writing one integer to the output stream
pub const BUILTIN_PRINT: &str = "PRINT";

/// Built-in allocating heap bytes
pub const BUILTIN_MALLOC: &str = "MALLOC";

/// Built-in releasing heap bytes (never reclaimed)
pub const BUILTIN_FREE: &str = "FREE";

/// Prompt written before every integer read from standard input
pub const INPUT_PROMPT: &str = "please input an integer value: ";
