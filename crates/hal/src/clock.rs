// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Low-frequency clock bring-up.

const CLOCK_BASE: usize = 0x4000_0000;

const TASKS_LFCLKSTART: usize = CLOCK_BASE + 0x008;
const TASKS_LFCLKSTOP: usize = CLOCK_BASE + 0x00C;
const LFCLKSTAT: usize = CLOCK_BASE + 0x418;
const LFCLKSRC: usize = CLOCK_BASE + 0x518;

/// LFCLKSTAT.STATE: the clock is running.
const LFCLKSTAT_RUNNING: u32 = 1 << 16;

/// External 32.768 kHz crystal source.
const LFCLKSRC_XTAL: u32 = 1;

pub fn lfclk_is_running() -> bool {
    unsafe { crate::mmio::read(LFCLKSTAT) & LFCLKSTAT_RUNNING != 0 }
}

/// Restart the low-frequency clock from the external crystal.
///
/// The source register may only change while the clock is stopped, so
/// the sequence is stop, wait, select, start, wait.
pub fn init_lfclk() {
    unsafe {
        crate::mmio::write(TASKS_LFCLKSTOP, 1);
        while lfclk_is_running() {}

        crate::mmio::write(LFCLKSRC, LFCLKSRC_XTAL);

        crate::mmio::write(TASKS_LFCLKSTART, 1);
        while !lfclk_is_running() {}
    }
}
