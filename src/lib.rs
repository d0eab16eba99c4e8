//! `pmm` — a small RISC-V teaching kernel's physical memory manager, pulled
//! out into its own library so the buddy/area/reservation allocator in
//! [`page_alloc`] can be exercised with `cargo test` on the host.
//!
//! The `pmm` binary (`src/main.rs`) links against this library and supplies
//! the boot-time glue (UART bring-up, logger install, handing the firmware's
//! memory map to [`page_alloc`]).

#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod macros;

pub mod base;
pub mod driver;
pub mod logk;
pub mod page_alloc;
