//! Reservation layer: carving a single page out of the buddy system without
//! allocating it, and giving it back. `spec.md` §4.5.

use crate::page_alloc::area::AreaManager;
use crate::page_alloc::buddy;
use crate::page_alloc::error::ReserveError;
use crate::page_alloc::freelist;
use crate::page_alloc::metadata::PageState;

/// Reserves the single page at `pfn`: splits its containing free block
/// down to order 0, unlinks the resulting order-0 block from its free
/// list, and stamps it `Reserved`.
pub fn reserve_one(areas: &mut AreaManager, pfn: usize) -> Result<(), ReserveError> {
    let area = areas.get_area_mut(pfn).ok_or(ReserveError::NoArea)?;
    match area.page_state(pfn) {
        PageState::Allocated { .. } => return Err(ReserveError::AlreadyAllocated),
        PageState::Reserved => return Err(ReserveError::AlreadyReserved),
        PageState::Free { order } => {
            let mut order = order as usize;
            let mut block = pfn & !((1usize << order) - 1);
            while order > 0 {
                buddy::split(area, order, block);
                order -= 1;
                block = pfn & !((1usize << order) - 1);
            }
            debug_assert_eq!(block, pfn);
            unsafe { freelist::unlink_free(pfn) };
            area.set_page_state(pfn, PageState::Reserved);
            Ok(())
        }
    }
}

/// Gives back a page reserved by [`reserve_one`]: clears `Reserved`,
/// stamps it `Allocated { order: 0 }` transiently, then runs it through
/// the normal internal free path so it coalesces with its neighbours.
///
/// # Panics
/// Panics if `pfn` is outside every initialized area's usable range, or if
/// it is not currently `Reserved` — both are programmer errors, not
/// recoverable runtime conditions (`spec.md` §8).
pub fn unreserve_one(areas: &mut AreaManager, pfn: usize) {
    let area = areas.get_area_mut(pfn).expect("unreserve of a page outside any area");
    assert_eq!(area.page_state(pfn), PageState::Reserved, "unreserve of a page that was not reserved");
    area.set_page_state(pfn, PageState::Allocated { order: 0 });
    buddy::free_block(area, 0, pfn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_alloc::test_support::reserve_region;

    /// Mirrors `spec.md` S5 (area `[16, 32)`, reserve pfn 24), shifted to
    /// the test arena's base. `24 - 16 == 8`, so `base + 8` is the
    /// order-3 block the order-24-aligned reservation splits down.
    fn reserved_area() -> (AreaManager, usize) {
        let base = reserve_region(16);
        let mut mgr = AreaManager::new();
        mgr.area_init(0, base, base + 16);
        (mgr, base)
    }

    #[test]
    fn reserve_splits_down_and_leaves_siblings_free() {
        let (mut areas, base) = reserved_area();
        let target = base + 8;
        reserve_one(&mut areas, target).unwrap();

        let area = areas.area(0);
        assert_eq!(area.page_state(target), PageState::Reserved);
        assert_eq!(area.page_state(target + 1), PageState::Free { order: 0 });
        assert_eq!(area.page_state(target + 2), PageState::Free { order: 1 });
        assert_eq!(area.page_state(target + 4), PageState::Free { order: 2 });
    }

    #[test]
    fn reserve_then_unreserve_restores_original_free_block() {
        let (mut areas, base) = reserved_area();
        let target = base + 8;
        reserve_one(&mut areas, target).unwrap();
        unreserve_one(&mut areas, target);
        assert_eq!(areas.area(0).page_state(target), PageState::Free { order: 3 });
    }

    #[test]
    fn reserve_twice_is_an_error() {
        let (mut areas, base) = reserved_area();
        let target = base + 8;
        reserve_one(&mut areas, target).unwrap();
        assert_eq!(reserve_one(&mut areas, target), Err(ReserveError::AlreadyReserved));
    }

    #[test]
    fn reserve_outside_any_area_is_an_error() {
        let (mut areas, base) = reserved_area();
        assert_eq!(reserve_one(&mut areas, base + 1000), Err(ReserveError::NoArea));
    }
}
