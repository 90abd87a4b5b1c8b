pub mod access;
pub mod assign;
pub mod binary;
pub mod unary;

// Operator handlers are `impl Environment` blocks; each reads the values of
// already-evaluated children from the top frame and binds the node's result.
