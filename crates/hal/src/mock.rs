// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Recording test doubles for the UART register interface.
//!
//! The mock mirrors the pieces of hardware behavior the driver relies
//! on (INTENSET/INTENCLR folding into INTEN, write-1-to-clear on
//! ERRORSRC, TXD capture, RXD feeding) and logs every access so tests
//! can assert mandatory orderings.

use crate::delay::BlockingWait;
use crate::uart::{Reg, UartRegisters};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

/// One recorded register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read(Reg),
    Write(Reg, u32),
}

/// Backing store shared between the driver-owned [`MockUart`] handle and
/// the test, which keeps its own `Rc` to inspect and drive the state.
#[derive(Default)]
pub struct MockState {
    regs: RefCell<BTreeMap<u32, u32>>,
    ops: RefCell<Vec<Op>>,
    rx_data: RefCell<VecDeque<u8>>,
    tx_data: RefCell<Vec<u8>>,
    waited_us: Cell<u32>,
}

impl MockState {
    pub fn reg(&self, reg: Reg) -> u32 {
        *self.regs.borrow().get(&(reg as u32)).unwrap_or(&0)
    }

    pub fn set_reg(&self, reg: Reg, value: u32) {
        self.regs.borrow_mut().insert(reg as u32, value);
    }

    /// Queue a byte for the next RXD read.
    pub fn push_rx(&self, byte: u8) {
        self.rx_data.borrow_mut().push_back(byte);
    }

    /// Everything written to TXD so far.
    pub fn tx(&self) -> Vec<u8> {
        self.tx_data.borrow().clone()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    /// Microseconds spent in the blocking-wait collaborator.
    pub fn waited_us(&self) -> u32 {
        self.waited_us.get()
    }

    /// Register-file snapshot for idempotence comparisons.
    pub fn snapshot(&self) -> BTreeMap<u32, u32> {
        self.regs.borrow().clone()
    }
}

pub struct MockUart {
    state: Rc<MockState>,
}

impl MockUart {
    pub fn new() -> (Self, Rc<MockState>) {
        let state = Rc::new(MockState::default());
        (
            MockUart {
                state: state.clone(),
            },
            state,
        )
    }
}

impl UartRegisters for MockUart {
    fn read(&self, reg: Reg) -> u32 {
        self.state.ops.borrow_mut().push(Op::Read(reg));
        match reg {
            Reg::Rxd => u32::from(self.state.rx_data.borrow_mut().pop_front().unwrap_or(0)),
            _ => self.state.reg(reg),
        }
    }

    fn write(&mut self, reg: Reg, value: u32) {
        self.state.ops.borrow_mut().push(Op::Write(reg, value));
        match reg {
            Reg::Txd => self.state.tx_data.borrow_mut().push((value & 0xFF) as u8),
            // Set/clear views fold into the combined INTEN register.
            Reg::IntEnSet => {
                let inten = self.state.reg(Reg::IntEn) | value;
                self.state.set_reg(Reg::IntEn, inten);
            }
            Reg::IntEnClr => {
                let inten = self.state.reg(Reg::IntEn) & !value;
                self.state.set_reg(Reg::IntEn, inten);
            }
            // ERRORSRC is write-1-to-clear.
            Reg::ErrorSrc => {
                let src = self.state.reg(Reg::ErrorSrc) & !value;
                self.state.set_reg(Reg::ErrorSrc, src);
            }
            _ => self.state.set_reg(reg, value),
        }
    }
}

/// Blocking-wait collaborator that only accounts for the time asked of
/// it; nothing drains while it "waits", which is exactly what the
/// backpressure tests need.
pub struct SpyWait {
    state: Rc<MockState>,
}

impl SpyWait {
    pub fn new(state: Rc<MockState>) -> Self {
        SpyWait { state }
    }
}

impl BlockingWait for SpyWait {
    fn wait_us(&mut self, us: u32) {
        self.state.waited_us.set(self.state.waited_us.get() + us);
    }
}
