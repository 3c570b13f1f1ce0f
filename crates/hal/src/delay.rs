// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Bounded blocking waits.
//!
//! The UART admission logic only needs an opaque "block for about this
//! long" capability, so it is a trait rather than a fixed busy loop;
//! tests substitute a non-waiting spy.

/// An opaque blocking-wait capability.
pub trait BlockingWait {
    fn wait_us(&mut self, us: u32);
}

/// Cycle-counted busy wait for the 16 MHz core: 16 cycles per
/// microsecond.
pub struct CycleDelay;

#[cfg(all(target_arch = "arm", target_os = "none"))]
const CYCLES_PER_US: u32 = 16;

impl BlockingWait for CycleDelay {
    #[allow(unused_variables)]
    fn wait_us(&mut self, us: u32) {
        #[cfg(all(target_arch = "arm", target_os = "none"))]
        cortex_m::asm::delay(us.saturating_mul(CYCLES_PER_US));
    }
}

/// Millisecond wait built on the microsecond primitive.
pub fn delay_ms<W: BlockingWait>(wait: &mut W, ms: u32) {
    for _ in 0..ms {
        wait.wait_us(1_000);
    }
}
