// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! RTC0 as a coarse uptime counter.

use crate::clock;

const RTC0_BASE: usize = 0x4000_B000;

const TASKS_START: usize = RTC0_BASE + 0x000;
const TASKS_STOP: usize = RTC0_BASE + 0x004;
const TASKS_CLEAR: usize = RTC0_BASE + 0x008;
const COUNTER: usize = RTC0_BASE + 0x504;
const PRESCALER: usize = RTC0_BASE + 0x508;

/// 32768 Hz / (327 + 1) gives one tick per ~10 ms.
const PRESCALER_10MS: u32 = 327;
const MS_PER_TICK: u32 = 10;

/// Configure RTC0 as a 10 ms counter. Brings the low-frequency clock up
/// first if it is not running.
pub fn init_rtc() {
    if !clock::lfclk_is_running() {
        clock::init_lfclk();
    }
    unsafe {
        crate::mmio::write(TASKS_STOP, 1);
        crate::mmio::write(TASKS_CLEAR, 1);
        crate::mmio::write(PRESCALER, PRESCALER_10MS);
        crate::mmio::write(TASKS_START, 1);
    }
}

/// Milliseconds since [`init_rtc`], at 10 ms resolution.
pub fn uptime_ms() -> u32 {
    let ticks = unsafe { crate::mmio::read(COUNTER) };
    ticks.wrapping_mul(MS_PER_TICK)
}
