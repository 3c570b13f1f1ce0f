// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Serial echo firmware for the nRFduino.
//!
//! Configures UART0 at 115200 baud on the board's serial header pins and
//! echoes whatever arrives. Everything received flows through the
//! interrupt-driven buffered path; the driver instance is shared with
//! the UART0 vector slot through a critical-section cell.

#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m::interrupt::{self, Mutex};
use panic_halt as _;

use barewired_hal::config::{BaudRate, UartConfig};
use barewired_hal::delay::CycleDelay;
use barewired_hal::gpio::{self, Pull};
use barewired_hal::power;
use barewired_hal::uart::{Uart, Uart0};
use barewired_rt::nvic::{self, Irq};
use barewired_rt::startup;
use barewired_rt::vectors::VectorTable;

/// Serial header pins on the nRFduino.
const PIN_RXD: u8 = 11;
const PIN_TXD: u8 = 9;

/// Queue depth per direction.
const UART_BUFFER: usize = 64;

type EchoUart = Uart<Uart0, CycleDelay, UART_BUFFER>;

/// Driver instance shared between the foreground loop and the UART0
/// interrupt.
static UART: Mutex<RefCell<Option<EchoUart>>> = Mutex::new(RefCell::new(None));

extern "C" {
    static __stack_end: u32;
}

#[link_section = ".vectors"]
#[no_mangle]
pub static VECTORS: VectorTable = VectorTable {
    uart0: Some(uart0_handler),
    ..VectorTable::new(
        unsafe { core::ptr::addr_of!(__stack_end) },
        startup::Reset,
    )
};

extern "C" fn uart0_handler() {
    interrupt::free(|cs| {
        if let Some(uart) = UART.borrow(cs).borrow_mut().as_mut() {
            uart.on_interrupt();
        }
    });
}

#[no_mangle]
fn main() {
    power::enable_all_ram_banks();

    // Pin directions are the GPIO block's business; the UART only
    // routes its signals there.
    gpio::config_input(PIN_RXD, Pull::None);
    gpio::config_output(PIN_TXD);

    let config = UartConfig {
        rx_pin: Some(PIN_RXD),
        tx_pin: Some(PIN_TXD),
        baud: BaudRate::Baud115200,
        // The loop below echoes at the application level already.
        local_echo: false,
        ..UartConfig::default()
    };

    let mut uart: EchoUart = Uart::new(Uart0, CycleDelay);
    if uart.configure(&config).is_err() {
        startup::park();
    }
    uart.start_buffered();

    interrupt::free(|cs| {
        UART.borrow(cs).replace(Some(uart));
    });
    nvic::enable(Irq::Uart0);

    with_uart(|uart| {
        uart.send(b"nRFduino echo ready\n");
    });

    loop {
        let mut buf = [0u8; 16];
        let n = with_uart(|uart| uart.receive(&mut buf));
        if n > 0 {
            with_uart(|uart| uart.send(&buf[..n]));
        }
        cortex_m::asm::wfi();
    }
}

/// Run `f` on the shared driver with interrupts held off.
fn with_uart<T: Default>(f: impl FnOnce(&mut EchoUart) -> T) -> T {
    interrupt::free(|cs| {
        if let Some(uart) = UART.borrow(cs).borrow_mut().as_mut() {
            f(uart)
        } else {
            T::default()
        }
    })
}
