use std::fmt;

use num_bigint::BigInt;

#[derive(Debug)]
pub enum CollatzError {
    LowerBoundNotPositive(BigInt),
    EmptyInterval { lower: BigInt, upper: BigInt },
    InvalidWorkerCount(usize),
    ThreadSpawn(std::io::Error),
    WorkerPanicked(usize),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Other(String),
}

impl fmt::Display for CollatzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollatzError::LowerBoundNotPositive(_) => {
                write!(f, "Lower bound must be greater than zero")
            }
            CollatzError::EmptyInterval { .. } => {
                write!(f, "Lower bound must be smaller than upper bound")
            }
            CollatzError::InvalidWorkerCount(n) => {
                write!(f, "Worker count must be at least 1 (got {})", n)
            }
            CollatzError::ThreadSpawn(e) => write!(f, "Error creating threads: {}", e),
            CollatzError::WorkerPanicked(id) => {
                write!(f, "Error joining threads: worker {} panicked", id)
            }
            CollatzError::Io(e) => write!(f, "IO error: {}", e),
            CollatzError::Serialization(e) => write!(f, "Serialization error: {}", e),
            CollatzError::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for CollatzError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollatzError::ThreadSpawn(e) | CollatzError::Io(e) => Some(e),
            CollatzError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl CollatzError {
    /// Errors caused by the bounds the user supplied, as opposed to failures of the run itself.
    pub fn is_bound_error(&self) -> bool {
        matches!(
            self,
            CollatzError::LowerBoundNotPositive(_) | CollatzError::EmptyInterval { .. }
        )
    }
}

impl From<std::io::Error> for CollatzError {
    fn from(err: std::io::Error) -> Self {
        CollatzError::Io(err)
    }
}

impl From<serde_json::Error> for CollatzError {
    fn from(err: serde_json::Error) -> Self {
        CollatzError::Serialization(err)
    }
}
