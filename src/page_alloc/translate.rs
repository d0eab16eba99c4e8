//! Physical frame number <-> address translation.
//!
//! `spec.md` §1 assumes an identity mapping between the physical addresses
//! the allocator hands out and the virtual addresses it dereferences to
//! read/write free-list nodes and metadata bytes — the same assumption the
//! teacher's own `mem` module made of its heap range.

use super::config::{PAGE_SHIFT, PAGE_SIZE};

#[inline]
pub const fn pfn_to_vaddr(pfn: usize) -> usize {
    pfn << PAGE_SHIFT
}

/// # Panics
/// Panics if `addr` is not page-aligned — a misaligned pointer is a fatal
/// condition (`spec.md` §7), not one that may silently truncate in
/// release builds.
#[inline]
pub fn vaddr_to_pfn(addr: usize) -> usize {
    assert_eq!(addr & (PAGE_SIZE - 1), 0, "address is not page-aligned: {addr:#x}");
    addr >> PAGE_SHIFT
}
