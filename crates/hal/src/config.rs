// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! UART configuration: pin assignment, baud-rate selection, framing flags.

use crate::{HalError, HalResult};

/// PSEL value meaning "signal not routed to any pin".
pub const PSEL_DISCONNECTED: u32 = 0xFFFF_FFFF;

/// Baud rates supported by the peripheral, with their BAUDRATE register
/// encodings. Anything outside this set is rejected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudRate {
    Baud1200,
    Baud2400,
    Baud4800,
    Baud9600,
    Baud14400,
    Baud19200,
    Baud28800,
    Baud38400,
    Baud57600,
    Baud76800,
    Baud115200,
    Baud230400,
    Baud250000,
    Baud460800,
    Baud921600,
    Baud1M,
}

impl BaudRate {
    /// Hardware encoding for the BAUDRATE register.
    pub const fn register_value(self) -> u32 {
        match self {
            BaudRate::Baud1200 => 0x0004_F000,
            BaudRate::Baud2400 => 0x0009_D000,
            BaudRate::Baud4800 => 0x0013_B000,
            BaudRate::Baud9600 => 0x0027_5000,
            BaudRate::Baud14400 => 0x003B_0000,
            BaudRate::Baud19200 => 0x004E_A000,
            BaudRate::Baud28800 => 0x0075_F000,
            BaudRate::Baud38400 => 0x009D_5000,
            BaudRate::Baud57600 => 0x00EB_F000,
            BaudRate::Baud76800 => 0x013A_9000,
            BaudRate::Baud115200 => 0x01D7_E000,
            BaudRate::Baud230400 => 0x03AF_B000,
            BaudRate::Baud250000 => 0x0400_0000,
            BaudRate::Baud460800 => 0x075F_7000,
            BaudRate::Baud921600 => 0x0EBE_D000,
            BaudRate::Baud1M => 0x1000_0000,
        }
    }

    /// Map a nominal bits-per-second figure onto the supported set.
    pub fn from_bps(bps: u32) -> Option<Self> {
        match bps {
            1_200 => Some(BaudRate::Baud1200),
            2_400 => Some(BaudRate::Baud2400),
            4_800 => Some(BaudRate::Baud4800),
            9_600 => Some(BaudRate::Baud9600),
            14_400 => Some(BaudRate::Baud14400),
            19_200 => Some(BaudRate::Baud19200),
            28_800 => Some(BaudRate::Baud28800),
            38_400 => Some(BaudRate::Baud38400),
            57_600 => Some(BaudRate::Baud57600),
            76_800 => Some(BaudRate::Baud76800),
            115_200 => Some(BaudRate::Baud115200),
            230_400 => Some(BaudRate::Baud230400),
            250_000 => Some(BaudRate::Baud250000),
            460_800 => Some(BaudRate::Baud460800),
            921_600 => Some(BaudRate::Baud921600),
            1_000_000 => Some(BaudRate::Baud1M),
            _ => None,
        }
    }
}

/// UART line configuration. Validated once by
/// [`crate::uart::Uart::configure`]; immutable afterwards. A `None` pin
/// routes the signal to [`PSEL_DISCONNECTED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    pub rx_pin: Option<u8>,
    pub tx_pin: Option<u8>,
    pub rts_pin: Option<u8>,
    pub cts_pin: Option<u8>,
    pub baud: BaudRate,
    /// Include a parity bit in each frame.
    pub parity: bool,
    /// Gate transmission on RTS/CTS handshaking.
    pub flow_control: bool,
    /// Echo received bytes straight back to the transmitter.
    pub local_echo: bool,
}

impl UartConfig {
    pub fn validate(&self) -> HalResult<()> {
        for pin in [self.rx_pin, self.tx_pin, self.rts_pin, self.cts_pin]
            .into_iter()
            .flatten()
        {
            if pin > 31 {
                return Err(HalError::InvalidPin(pin));
            }
        }
        Ok(())
    }

    pub(crate) fn psel(pin: Option<u8>) -> u32 {
        match pin {
            Some(pin) => u32::from(pin),
            None => PSEL_DISCONNECTED,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        UartConfig {
            rx_pin: None,
            tx_pin: None,
            rts_pin: None,
            cts_pin: None,
            baud: BaudRate::Baud115200,
            parity: false,
            flow_control: false,
            local_echo: true,
        }
    }
}
