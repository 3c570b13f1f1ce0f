// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Interrupt-driven UART transport.
//!
//! Two execution contexts share this driver: the foreground program and
//! the UART interrupt handler. The foreground is the sole writer of the
//! outbound queue and sole reader of the inbound queue; the handler is
//! the opposite on each. Every foreground cursor/count update runs with
//! the corresponding interrupt source masked, so the handler never
//! observes a half-updated queue.
//!
//! Both paths exist side by side: a synchronous busy-wait fallback
//! (`*_blocking`) for early bring-up, and the buffered path (`send` /
//! `receive` / [`Uart::on_interrupt`]) for normal operation.

use bitflags::bitflags;

use crate::config::UartConfig;
use crate::delay::BlockingWait;
use crate::fifo::Fifo;
use crate::{HalError, HalResult};

/// UART0 peripheral base address.
pub const UART0_BASE: usize = 0x4000_2000;

/// Worst-case busy-wait budget for one byte: at the slowest supported
/// rate (1200 baud) a 10-bit frame (start + 8 data + stop) takes
/// 16e6 / (1200 / 10) cycles on the 16 MHz core.
pub const BYTE_TIMEOUT_CYCLES: u32 = 133_333;

/// Buffered-send admission policy: retry while the outbound queue is
/// full, waiting [`ADMISSION_WAIT_US`] between retries, sharing one
/// budget across the whole call.
const ADMISSION_RETRIES: u32 = 10;
const ADMISSION_WAIT_US: u32 = 100;

/// Registers of the UART peripheral, as offsets from the base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Reg {
    /// Start UART receiver.
    TaskStartRx = 0x000,
    /// Stop UART receiver.
    TaskStopRx = 0x004,
    /// Start UART transmitter.
    TaskStartTx = 0x008,
    /// Stop UART transmitter.
    TaskStopTx = 0x00C,
    /// Suspend UART.
    TaskSuspend = 0x01C,
    /// Data received in RXD.
    EventRxdRdy = 0x108,
    /// Data sent from TXD.
    EventTxdRdy = 0x11C,
    /// Error detected.
    EventError = 0x124,
    /// Receiver timeout.
    EventRxTo = 0x144,
    /// Interrupt enable state.
    IntEn = 0x300,
    /// Write 1s to enable interrupt sources.
    IntEnSet = 0x304,
    /// Write 1s to disable interrupt sources.
    IntEnClr = 0x308,
    /// Error source, write 1 to clear.
    ErrorSrc = 0x480,
    /// Enable UART.
    Enable = 0x500,
    /// Pin select for RTS.
    PselRts = 0x508,
    /// Pin select for TXD.
    PselTxd = 0x50C,
    /// Pin select for CTS.
    PselCts = 0x510,
    /// Pin select for RXD.
    PselRxd = 0x514,
    /// Receive data register.
    Rxd = 0x518,
    /// Transmit data register.
    Txd = 0x51C,
    /// Baud rate.
    BaudRate = 0x524,
    /// Parity and hardware flow control.
    Config = 0x56C,
}

bitflags! {
    /// Interrupt source bits in INTEN/INTENSET/INTENCLR.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Inten: u32 {
        const CTS = 1 << 0;
        const NCTS = 1 << 1;
        const RXDRDY = 1 << 2;
        const TXDRDY = 1 << 7;
        const ERROR = 1 << 9;
        const RXTO = 1 << 17;
    }
}

bitflags! {
    /// ERRORSRC bits. Captured by the interrupt handler for diagnostics;
    /// not decoded into recovery actions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ErrorSource: u32 {
        const OVERRUN = 1 << 0;
        const PARITY = 1 << 1;
        const FRAMING = 1 << 2;
        const BREAK = 1 << 3;
    }
}

// CONFIG register fields.
const CONFIG_HWFC: u32 = 1 << 0;
const CONFIG_PARITY_INCLUDED: u32 = 0x7 << 1;

// ENABLE register: low three bits select the mode, 0x4 enables.
const ENABLE_MASK: u32 = 0x7;
const ENABLE_ENABLED: u32 = 0x4;

/// Register interface of one UART instance. The hardware implementation
/// is [`Uart0`]; tests substitute a recording mock.
pub trait UartRegisters {
    fn read(&self, reg: Reg) -> u32;
    fn write(&mut self, reg: Reg, value: u32);
}

/// The UART0 register block at [`UART0_BASE`].
pub struct Uart0;

impl UartRegisters for Uart0 {
    fn read(&self, reg: Reg) -> u32 {
        unsafe { crate::mmio::read(UART0_BASE + reg as usize) }
    }

    fn write(&mut self, reg: Reg, value: u32) {
        unsafe { crate::mmio::write(UART0_BASE + reg as usize, value) }
    }
}

/// Transmitter state. Owned by the interrupt handler except for the one
/// Idle -> Transmitting transition driven by the foreground's first
/// enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartState {
    Idle,
    Transmitting,
}

/// One UART instance: register interface, blocking-wait collaborator,
/// transmit state and both transfer queues. Owning the queues here (and
/// not in free statics) is what lets the interrupt handler be registered
/// against a concrete instance and lets tests run against a double.
pub struct Uart<R: UartRegisters, W: BlockingWait, const N: usize> {
    regs: R,
    wait: W,
    state: UartState,
    tx_queue: Fifo<N>,
    rx_queue: Fifo<N>,
    local_echo: bool,
    error_bits: u32,
}

impl<R: UartRegisters, W: BlockingWait, const N: usize> Uart<R, W, N> {
    pub fn new(regs: R, wait: W) -> Self {
        Uart {
            regs,
            wait,
            state: UartState::Idle,
            tx_queue: Fifo::new(),
            rx_queue: Fifo::new(),
            local_echo: true,
            error_bits: 0,
        }
    }

    pub fn state(&self) -> UartState {
        self.state
    }

    pub fn is_transmitting(&self) -> bool {
        self.state == UartState::Transmitting
    }

    /// Program the peripheral from `config` and start it.
    ///
    /// Must run before any send/receive call. Reconfiguration while a
    /// transmission is in flight is rejected with
    /// [`HalError::TransmitterBusy`]; calling again with the same config
    /// while idle reprograms the identical register state.
    pub fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        if self.state == UartState::Transmitting {
            return Err(HalError::TransmitterBusy);
        }
        config.validate()?;

        self.regs.write(Reg::PselRxd, UartConfig::psel(config.rx_pin));
        self.regs.write(Reg::PselTxd, UartConfig::psel(config.tx_pin));

        // Flow control is switched off while pins move, then re-enabled
        // only on request together with its pin routing.
        let mut cfg = self.regs.read(Reg::Config) & !(CONFIG_HWFC | CONFIG_PARITY_INCLUDED);
        self.regs.write(Reg::Config, cfg);
        if config.flow_control {
            self.regs.write(Reg::PselRts, UartConfig::psel(config.rts_pin));
            self.regs.write(Reg::PselCts, UartConfig::psel(config.cts_pin));
            cfg |= CONFIG_HWFC;
        }
        if config.parity {
            cfg |= CONFIG_PARITY_INCLUDED;
        }
        self.regs.write(Reg::Config, cfg);

        self.regs.write(Reg::BaudRate, config.baud.register_value());

        // Prime the status flags: transmitter reports ready, receiver
        // reports nothing pending.
        self.regs.write(Reg::EventTxdRdy, 1);
        self.regs.write(Reg::EventRxdRdy, 0);

        self.regs.write(Reg::TaskStartRx, 1);
        self.regs.write(Reg::TaskStartTx, 1);
        let enable = (self.regs.read(Reg::Enable) & !ENABLE_MASK) | ENABLE_ENABLED;
        self.regs.write(Reg::Enable, enable);

        self.local_echo = config.local_echo;
        Ok(())
    }

    /// Arm the receive-side interrupt sources for buffered operation.
    /// Enabling the NVIC line itself is the application's step.
    pub fn start_buffered(&mut self) {
        self.regs
            .write(Reg::IntEnSet, (Inten::RXDRDY | Inten::RXTO | Inten::ERROR).bits());
    }

    // ------------------------------------------------------------------
    // Unbuffered synchronous path
    // ------------------------------------------------------------------

    /// Send one byte, busy-waiting for the transmitter. On timeout the
    /// data register is not written.
    pub fn send_char_blocking(&mut self, byte: u8) -> HalResult<()> {
        self.wait_for_event(Reg::EventTxdRdy)?;
        self.regs.write(Reg::EventTxdRdy, 0);
        self.regs.write(Reg::Txd, u32::from(byte));
        Ok(())
    }

    /// Receive one byte, busy-waiting for the receiver.
    pub fn receive_char_blocking(&mut self) -> HalResult<u8> {
        self.wait_for_event(Reg::EventRxdRdy)?;
        // The ready flag must be cleared before RXD is read (nRF51
        // Series Reference Manual, UART chapter).
        self.regs.write(Reg::EventRxdRdy, 0);
        Ok((self.regs.read(Reg::Rxd) & 0xFF) as u8)
    }

    pub fn send_bytes_blocking(&mut self, bytes: &[u8]) -> HalResult<()> {
        for &byte in bytes {
            self.send_char_blocking(byte)?;
        }
        Ok(())
    }

    pub fn send_str_blocking(&mut self, s: &str) -> HalResult<()> {
        self.send_bytes_blocking(s.as_bytes())
    }

    fn wait_for_event(&mut self, event: Reg) -> HalResult<()> {
        let mut budget = BYTE_TIMEOUT_CYCLES;
        while self.regs.read(event) == 0 {
            if budget == 0 {
                return Err(HalError::Timeout);
            }
            budget -= 1;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Buffered asynchronous path
    // ------------------------------------------------------------------

    /// Enqueue `data` for interrupt-driven transmission.
    ///
    /// Returns the number of caller bytes actually enqueued; a short
    /// count means the admission budget expired against a full queue.
    /// A line feed is followed by an automatic carriage return under the
    /// same admission policy. If the transmitter was idle, the first
    /// byte is written to the data register directly to start the cycle.
    pub fn send(&mut self, data: &[u8]) -> usize {
        let mut budget = ADMISSION_RETRIES;
        let mut sent = 0;

        for &byte in data {
            if !self.admit(&mut budget) {
                break;
            }
            self.enqueue_tx(byte);
            sent += 1;
            if byte == b'\n' {
                if !self.admit(&mut budget) {
                    break;
                }
                self.enqueue_tx(b'\r');
            }
        }

        // An ongoing transmission picks queued bytes up on its own.
        if self.state == UartState::Idle && !self.tx_queue.is_empty() {
            self.start_transmission();
        }
        sent
    }

    /// Drain buffered inbound bytes into `buf`. Never blocks: the queue
    /// is filled asynchronously, so an empty queue yields 0.
    pub fn receive(&mut self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        while count < buf.len() {
            match self.with_source_masked(Inten::RXDRDY, |uart| uart.rx_queue.read()) {
                Ok(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                Err(_) => break,
            }
        }
        count
    }

    /// Error sources latched by the interrupt handler since the last
    /// call. Diagnostic only.
    pub fn take_error_source(&mut self) -> ErrorSource {
        let bits = self.error_bits;
        self.error_bits = 0;
        ErrorSource::from_bits_truncate(bits)
    }

    /// Wait for room in the outbound queue, burning `budget` retries.
    fn admit(&mut self, budget: &mut u32) -> bool {
        while self.tx_queue.is_full() {
            if *budget == 0 {
                return false;
            }
            *budget -= 1;
            self.wait.wait_us(ADMISSION_WAIT_US);
        }
        true
    }

    fn enqueue_tx(&mut self, byte: u8) {
        self.with_source_masked(Inten::TXDRDY, |uart| {
            // Room was checked by admission and only this context fills
            // the queue.
            let _ = uart.tx_queue.write(byte);
        });
    }

    /// Idle -> Transmitting. Runs with the TXDRDY source masked until
    /// the transmitter is started and the first byte is on its way;
    /// arming the interrupt is the last step.
    fn start_transmission(&mut self) {
        self.regs.write(Reg::IntEnClr, Inten::TXDRDY.bits());
        self.state = UartState::Transmitting;
        self.regs.write(Reg::TaskStartTx, 1);
        if let Ok(byte) = self.tx_queue.read() {
            self.regs.write(Reg::Txd, u32::from(byte));
        }
        self.regs.write(Reg::IntEnSet, Inten::TXDRDY.bits());
    }

    /// Scoped critical section: mask one interrupt source, run `f`,
    /// restore the source if it was armed. The restore runs on every
    /// exit path; the span covers exactly the queue update.
    fn with_source_masked<T>(&mut self, source: Inten, f: impl FnOnce(&mut Self) -> T) -> T {
        let was_armed = Inten::from_bits_truncate(self.regs.read(Reg::IntEn)).contains(source);
        self.regs.write(Reg::IntEnClr, source.bits());
        let out = f(self);
        if was_armed {
            self.regs.write(Reg::IntEnSet, source.bits());
        }
        out
    }

    // ------------------------------------------------------------------
    // Interrupt context
    // ------------------------------------------------------------------

    /// Service routine body, invoked from the UART0 vector slot.
    ///
    /// Reads each status flag once on entry; a flag may change while the
    /// handler runs and must not be re-sampled. Never blocks and never
    /// touches the blocking-wait collaborator.
    pub fn on_interrupt(&mut self) {
        let transmitted = self.regs.read(Reg::EventTxdRdy) != 0;
        let received = self.regs.read(Reg::EventRxdRdy) != 0;
        let rx_timeout = self.regs.read(Reg::EventRxTo) != 0;
        let error = self.regs.read(Reg::EventError) != 0;

        if transmitted {
            match self.tx_queue.read() {
                Ok(byte) => self.regs.write(Reg::Txd, u32::from(byte)),
                Err(_) => {
                    // Outbound queue drained: stop the transmitter and
                    // silence TXDRDY, further interrupts would be
                    // spurious.
                    self.regs.write(Reg::TaskStopTx, 1);
                    self.state = UartState::Idle;
                    self.regs.write(Reg::IntEnClr, Inten::TXDRDY.bits());
                }
            }
            self.regs.write(Reg::EventTxdRdy, 0);
        }

        if received {
            if !self.rx_queue.is_full() {
                // The ready flag must be cleared before RXD is read.
                self.regs.write(Reg::EventRxdRdy, 0);
                let byte = (self.regs.read(Reg::Rxd) & 0xFF) as u8;
                if self.local_echo {
                    self.regs.write(Reg::Txd, u32::from(byte));
                }
                let _ = self.rx_queue.write(byte);
            }
            // Full queue: leave the byte and the flag in place. The
            // hardware keeps RXDRDY raised and eventually reports an
            // overrun; buffered data is never overwritten.
        }

        if rx_timeout {
            self.regs.write(Reg::EventRxTo, 0);
        }

        if error {
            let source = self.regs.read(Reg::ErrorSrc);
            self.error_bits |= source;
            self.regs.write(Reg::ErrorSrc, source);
            self.regs.write(Reg::EventError, 0);
        }
    }
}
