use thiserror::Error;

/// Precondition violations reported by the fallible forest operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LinkCutError {
    #[error("all {capacity} vertex slots are already in use")]
    OutOfCapacity { capacity: usize },

    #[error("({u}, {v}) is not an edge of the forest")]
    InvalidEdge { u: usize, v: usize },

    #[error("subtree aggregation requires a commutative monoid")]
    NonCommutativeSubtreeQuery,

    #[error("{u} and {v} are already connected")]
    AlreadyConnected { u: usize, v: usize },
}
