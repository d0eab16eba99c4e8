//! Split, coalesce, and allocate/free on top of an [`Area`]'s free lists.
//! `spec.md` §4.3.

use crate::page_alloc::area::Area;
use crate::page_alloc::config::MAX_ORDER;
use crate::page_alloc::freelist;
use crate::page_alloc::metadata::PageState;

/// Splits the free block of `order` at `pfn` into two blocks of
/// `order - 1`. `pfn` must currently be linked in `area.free_lists[order]`;
/// `split` unlinks it from there itself before relinking both halves one
/// order down, linking the buddy half first so `pfn`'s half ends up at
/// the head of the `order - 1` free list.
///
/// # Panics
/// Panics if `order` is 0.
pub fn split(area: &mut Area, order: usize, pfn: usize) {
    assert!(order > 0, "cannot split an order-0 block");
    let half = 1usize << (order - 1);
    let buddy_pfn = pfn + half;

    unsafe { freelist::unlink_free(pfn) };

    for p in pfn..pfn + (1usize << order) {
        area.set_page_state(p, PageState::Free { order: (order - 1) as u8 });
    }

    unsafe {
        freelist::link_free(area.free_list_mut(order - 1), buddy_pfn);
        freelist::link_free(area.free_list_mut(order - 1), pfn);
    }
}

/// Attempts one coalescing step of the block of `order` at `pfn` with its
/// buddy. Returns the merged block's `(order + 1, base_pfn)` on success.
fn coalesce_once(area: &mut Area, order: usize, pfn: usize) -> Option<usize> {
    if order + 1 >= MAX_ORDER {
        return None;
    }
    let buddy_pfn = pfn ^ (1usize << order);
    let p1 = pfn.min(buddy_pfn);
    let p2 = pfn.max(buddy_pfn);

    if !area.usable_area_contains_pfn(p1) || p2 + (1usize << order) > area.top() {
        return None;
    }
    let s1 = area.page_state(p1);
    let s2 = area.page_state(p2);
    let expected = PageState::Free { order: order as u8 };
    if s1 != expected || s2 != expected {
        return None;
    }

    unsafe {
        freelist::unlink_free(p1);
        freelist::unlink_free(p2);
    }
    for p in p1..p1 + (1usize << (order + 1)) {
        area.set_page_state(p, PageState::Free { order: (order + 1) as u8 });
    }
    unsafe {
        freelist::link_free(area.free_list_mut(order + 1), p1);
    }
    Some(p1)
}

/// Frees the block of `order` at `pfn`, marking it `Free` and coalescing
/// upward as far as possible.
pub fn free_block(area: &mut Area, order: usize, pfn: usize) {
    for p in pfn..pfn + (1usize << order) {
        area.set_page_state(p, PageState::Free { order: order as u8 });
    }
    unsafe {
        freelist::link_free(area.free_list_mut(order), pfn);
    }

    let mut cur_order = order;
    let mut cur_pfn = pfn;
    while cur_order + 1 < MAX_ORDER {
        match coalesce_once(area, cur_order, cur_pfn) {
            Some(merged_pfn) => {
                cur_order += 1;
                cur_pfn = merged_pfn;
            }
            None => break,
        }
    }
}

/// Finds and removes a free block whose order satisfies both an alignment
/// requirement (`alignment_order`) and a size requirement (`size_order`),
/// splitting down from the smallest sufficiently large free block. Marks
/// the returned block `Allocated`.
pub fn page_memalign_order(area: &mut Area, alignment_order: usize, size_order: usize) -> Option<usize> {
    let start = alignment_order.max(size_order);
    let mut found_order = None;
    for order in start..MAX_ORDER {
        if !area.free_list(order).is_empty() {
            found_order = Some(order);
            break;
        }
    }
    let mut order = found_order?;
    let mut pfn = freelist::peek_free(area.free_list(order)).expect("non-empty free list has a front");

    while order > size_order {
        split(area, order, pfn);
        order -= 1;
        pfn = freelist::peek_free(area.free_list(order)).expect("split leaves a block at this order");
    }

    unsafe { freelist::unlink_free(pfn) };
    for p in pfn..pfn + (1usize << size_order) {
        area.set_page_state(p, PageState::Allocated { order: size_order as u8 });
    }
    Some(pfn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_alloc::area::AreaManager;
    use crate::page_alloc::test_support::reserve_region;

    /// Sets up a 16-page area like `spec.md` S1 (`[16, 32)` there), just
    /// shifted to whatever base pfn the test arena hands out. `base` is
    /// always 16-page aligned, so the relative seeding pattern (order 0 at
    /// `base+1`, order 1 at `base+2`, order 2 at `base+4`, order 3 at
    /// `base+8`) matches the worked example exactly.
    fn area_with_16_pages() -> (AreaManager, usize, usize) {
        let base = reserve_region(16);
        let mut mgr = AreaManager::new();
        mgr.area_init(0, base, base + 16);
        (mgr, 0, base)
    }

    #[test]
    fn alloc_then_free_round_trips() {
        let (mut mgr, n, _base) = area_with_16_pages();
        let area = mgr.area_mut(n);
        let pfn = page_memalign_order(area, 0, 0).expect("allocation succeeds");
        assert!(area.page_state(pfn).is_alloc());
        free_block(area, 0, pfn);
        assert!(area.page_state(pfn).is_free());
    }

    #[test]
    fn split_then_coalesce_restores_original_free_list() {
        let (mut mgr, n, base) = area_with_16_pages();
        let area = mgr.area_mut(n);
        let order3_pfn = base + 8;
        assert_eq!(area.page_state(order3_pfn), PageState::Free { order: 3 });
        split(area, 3, order3_pfn);
        assert_eq!(area.page_state(order3_pfn), PageState::Free { order: 2 });
        assert_eq!(area.page_state(base + 12), PageState::Free { order: 2 });
        assert_eq!(coalesce_once(area, 2, order3_pfn), Some(order3_pfn));
        assert_eq!(area.page_state(order3_pfn), PageState::Free { order: 3 });
    }
}
