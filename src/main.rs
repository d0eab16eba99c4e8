#![no_main]
#![no_std]

#[macro_use]
extern crate pmm;

use core::arch::asm;

use pmm::driver::uart::Uart;
use pmm::page_alloc::{self, PAGE_ALLOCATOR};

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    println_k!("{}", info);
    abort();
}

#[no_mangle]
extern "C" fn abort() -> ! {
    loop {
        unsafe {
            asm!("wfi");
        }
    }
}

/// A real boot stub hands this the physical pfn range discovered from the
/// firmware (device tree, memory map, whatever the platform provides);
/// that discovery is out of scope here. The range below stands in for it:
/// it sits well inside the QEMU `virt` machine's default 128 MiB RAM,
/// starting past the kernel image load address.
const DEMO_BASE_PFN: usize = 0x8020_0000 >> page_alloc::config::PAGE_SHIFT;
const DEMO_TOP_PFN: usize = 0x8800_0000 >> page_alloc::config::PAGE_SHIFT;

#[no_mangle]
extern "C" fn kmain() -> ! {
    let uart = Uart::default();
    uart.init_default();
    pmm::logk::init();

    println_k!("pmm: buddy page allocator boot harness");
    log::info!(
        "initializing page areas [{:#x}, {:#x})",
        DEMO_BASE_PFN << page_alloc::config::PAGE_SHIFT,
        DEMO_TOP_PFN << page_alloc::config::PAGE_SHIFT
    );

    PAGE_ALLOCATOR.area_init(page_alloc::AREA_ANY_NUMBER, DEMO_BASE_PFN, DEMO_TOP_PFN);
    PAGE_ALLOCATOR.enable();

    for n in 0..4 {
        PAGE_ALLOCATOR.debug_dump_area(n);
    }

    if let Some(addr) = PAGE_ALLOCATOR.alloc_pages_area(u64::MAX, 0) {
        log::info!("allocated a demo page at {addr:#x}");
        PAGE_ALLOCATOR.free_pages(addr);
    }

    println_k!("Start typing, I'll show what you typed!");
    loop {
        if let Some(c) = uart.get() {
            match c {
                10 | 13 => println_k!(),
                _ => print_k!("{}", (c as char).escape_default()),
            }
        }
    }
}
