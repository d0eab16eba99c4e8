//! Low-level synchronization primitives assumed, rather than designed, by
//! the page allocator: see `spec.md` §1 ("spin locking primitives ... their
//! semantic contracts are stated where used but their implementation is
//! assumed").

pub mod sync;
