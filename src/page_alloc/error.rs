//! Error type returned by the reservation path. `spec.md` §8, "errors vs
//! assertions": reservation failures are a caller mistake the caller can
//! recover from (the target address was already spoken for), so they are
//! reported through `Result` rather than panicking.

use core::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ReserveError {
    /// No initialized area's usable range covers the requested page.
    NoArea,
    /// The page is already `Allocated`.
    AlreadyAllocated,
    /// The page is already `Reserved`.
    AlreadyReserved,
}

impl fmt::Display for ReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReserveError::NoArea => write!(f, "page is outside any initialized area"),
            ReserveError::AlreadyAllocated => write!(f, "page is already allocated"),
            ReserveError::AlreadyReserved => write!(f, "page is already reserved"),
        }
    }
}
