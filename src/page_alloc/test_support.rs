//! Host-side test harness: hands out disjoint, page-aligned regions of a
//! static arena so `#[test]`s can exercise [`super::area::AreaManager`]
//! against real backing memory instead of arbitrary pfn numbers (the
//! free-list machinery writes [`super::freelist::ListNode`]s directly into
//! the pages it manages). Grounded on the static aligned memory buffer
//! pattern used by the teacher's own test pack
//! (`slakpi-Propeller-Kernel/src/mm/page_allocator/tests.rs`).

use core::sync::atomic::{AtomicUsize, Ordering};

use super::config::PAGE_SIZE;

const ARENA_PAGES: usize = 4096;
/// Regions are rounded up to this many pages so every region handed out
/// has its base pfn's low 4 bits clear, reproducing the same relative
/// seeding pattern the worked examples use for a 16-page area starting at
/// an already-16-aligned pfn.
const REGION_ALIGN_PAGES: usize = 16;

#[repr(align(65536))]
struct Arena([u8; ARENA_PAGES * PAGE_SIZE]);

static ARENA: Arena = Arena([0u8; ARENA_PAGES * PAGE_SIZE]);
static CURSOR: AtomicUsize = AtomicUsize::new(0);

/// Returns the base pfn of a fresh, non-overlapping region of `pages`
/// pages. Tests that run concurrently on the host never alias memory
/// because each call claims a disjoint slice of the arena.
///
/// # Panics
/// Panics if the arena is exhausted.
pub fn reserve_region(pages: usize) -> usize {
    let arena_base_pfn = (ARENA.0.as_ptr() as usize) >> super::config::PAGE_SHIFT;
    let region_pages = pages.div_ceil(REGION_ALIGN_PAGES) * REGION_ALIGN_PAGES;
    let start = CURSOR.fetch_add(region_pages, Ordering::Relaxed);
    assert!(start + region_pages <= ARENA_PAGES, "test arena exhausted");
    arena_base_pfn + start
}
