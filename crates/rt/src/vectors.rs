// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! The nRF51 exception and interrupt vector table.
//!
//! The hardware fetches the initial stack pointer and all handler entry
//! points from a fixed 48-slot table at the start of flash. The table is
//! modeled as a `#[repr(C)]` struct so slot order and width are pinned at
//! compile time instead of relying on linker weak-symbol tricks. Handler
//! slots are `Option<Handler>`: `None` is the reserved sentinel and encodes
//! as a zero word through the null-pointer optimization.
//!
//! Applications place the table with struct-update syntax:
//!
//! ```ignore
//! #[link_section = ".vectors"]
//! #[no_mangle]
//! pub static VECTORS: VectorTable = VectorTable {
//!     uart0: Some(uart0_handler),
//!     ..VectorTable::new(STACK_TOP, startup::Reset)
//! };
//! ```

use crate::fault::default_handler;

/// Interrupt and exception handlers are plain C-ABI functions.
pub type Handler = extern "C" fn();

/// The reset vector never returns; it is `unsafe` because it rewrites all
/// of RAM before the world exists.
pub type ResetHandler = unsafe extern "C" fn() -> !;

/// Number of words in the hardware table (0xC0 bytes on the nRF51).
pub const VECTOR_COUNT: usize = 48;

/// The complete vector table: 16 ARMv6-M system slots followed by the 32
/// device slots in nRF51 interrupt-number order. Do not reorder fields;
/// the layout is the hardware ABI.
#[repr(C)]
pub struct VectorTable {
    /// Initial stack pointer, loaded by hardware before the reset vector.
    pub initial_stack: *const u32,
    /// Reset entry, invoked on power-up.
    pub reset: ResetHandler,

    pub nmi: Option<Handler>,
    pub hard_fault: Option<Handler>,
    /// MemManage/BusFault/UsageFault do not fire on the M0 but the slots
    /// exist in the architectural table and keep their positions.
    pub mem_manage: Option<Handler>,
    pub bus_fault: Option<Handler>,
    pub usage_fault: Option<Handler>,
    pub _reserved0: Option<Handler>,
    pub _reserved1: Option<Handler>,
    pub _reserved2: Option<Handler>,
    pub _reserved3: Option<Handler>,
    pub sv_call: Option<Handler>,
    pub debug_monitor: Option<Handler>,
    pub _reserved4: Option<Handler>,
    pub pend_sv: Option<Handler>,
    pub sys_tick: Option<Handler>,

    // Device interrupts, one slot per nRF51 interrupt number.
    pub power_clock: Option<Handler>,
    pub radio: Option<Handler>,
    pub uart0: Option<Handler>,
    pub spi0_twi0: Option<Handler>,
    pub spi1_twi1: Option<Handler>,
    pub _reserved5: Option<Handler>,
    pub gpiote: Option<Handler>,
    pub adc: Option<Handler>,
    pub timer0: Option<Handler>,
    pub timer1: Option<Handler>,
    pub timer2: Option<Handler>,
    pub rtc0: Option<Handler>,
    pub temp: Option<Handler>,
    pub rng: Option<Handler>,
    pub ecb: Option<Handler>,
    pub ccm_aar: Option<Handler>,
    pub wdt: Option<Handler>,
    pub rtc1: Option<Handler>,
    pub qdec: Option<Handler>,
    pub lpcomp: Option<Handler>,
    pub swi0: Option<Handler>,
    pub swi1: Option<Handler>,
    pub swi2: Option<Handler>,
    pub swi3: Option<Handler>,
    pub swi4: Option<Handler>,
    pub swi5: Option<Handler>,
    pub _reserved6: Option<Handler>,
    pub _reserved7: Option<Handler>,
    pub _reserved8: Option<Handler>,
    pub _reserved9: Option<Handler>,
    pub _reserved10: Option<Handler>,
    pub _reserved11: Option<Handler>,
}

// The table is immutable for the process lifetime and only ever read by
// the hardware, so sharing the raw stack pointer is sound.
unsafe impl Sync for VectorTable {}

impl VectorTable {
    /// A table with every non-reserved slot bound to the shared
    /// [`default_handler`]. Reserved slots stay `None` and must never be
    /// invoked.
    pub const fn new(initial_stack: *const u32, reset: ResetHandler) -> Self {
        VectorTable {
            initial_stack,
            reset,

            nmi: Some(default_handler),
            hard_fault: Some(default_handler),
            mem_manage: Some(default_handler),
            bus_fault: Some(default_handler),
            usage_fault: Some(default_handler),
            _reserved0: None,
            _reserved1: None,
            _reserved2: None,
            _reserved3: None,
            sv_call: Some(default_handler),
            debug_monitor: Some(default_handler),
            _reserved4: None,
            pend_sv: Some(default_handler),
            sys_tick: Some(default_handler),

            power_clock: Some(default_handler),
            radio: Some(default_handler),
            uart0: Some(default_handler),
            spi0_twi0: Some(default_handler),
            spi1_twi1: Some(default_handler),
            _reserved5: None,
            gpiote: Some(default_handler),
            adc: Some(default_handler),
            timer0: Some(default_handler),
            timer1: Some(default_handler),
            timer2: Some(default_handler),
            rtc0: Some(default_handler),
            temp: Some(default_handler),
            rng: Some(default_handler),
            ecb: Some(default_handler),
            ccm_aar: Some(default_handler),
            wdt: Some(default_handler),
            rtc1: Some(default_handler),
            qdec: Some(default_handler),
            lpcomp: Some(default_handler),
            swi0: Some(default_handler),
            swi1: Some(default_handler),
            swi2: Some(default_handler),
            swi3: Some(default_handler),
            swi4: Some(default_handler),
            swi5: Some(default_handler),
            _reserved6: None,
            _reserved7: None,
            _reserved8: None,
            _reserved9: None,
            _reserved10: None,
            _reserved11: None,
        }
    }
}
