//! Results of mutating operations.
//!
//! Instead of refetching from inside the mutation, each mutation reports
//! which cached list it made stale and the owning screen decides what to
//! reload.

/// Which cached view a mutation invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    Bugs,
    Projects,
    Profile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome<T> {
    pub value: T,
    pub invalidates: Invalidation,
}

impl<T> MutationOutcome<T> {
    pub fn new(value: T, invalidates: Invalidation) -> Self {
        Self { value, invalidates }
    }
}
