// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

#[cfg(test)]
mod integration_tests {
    use crate::config::{BaudRate, UartConfig};
    use crate::mock::{MockState, MockUart, Op, SpyWait};
    use crate::uart::{Reg, Uart, UartState};
    use std::rc::Rc;

    type EchoUart = Uart<MockUart, SpyWait, 8>;

    fn bring_up(config: UartConfig) -> (EchoUart, Rc<MockState>) {
        let (mock, state) = MockUart::new();
        let wait = SpyWait::new(state.clone());
        let mut uart = Uart::new(mock, wait);
        uart.configure(&config).unwrap();
        (uart, state)
    }

    fn quiet_config() -> UartConfig {
        UartConfig {
            rx_pin: Some(11),
            tx_pin: Some(9),
            baud: BaudRate::Baud115200,
            local_echo: false,
            ..UartConfig::default()
        }
    }

    /// Drive the transmit side the way the hardware would: raise
    /// TXDRDY after every byte until the driver stops the transmitter.
    fn drain_tx(uart: &mut EchoUart, state: &MockState) {
        while uart.is_transmitting() {
            state.set_reg(Reg::EventTxdRdy, 1);
            uart.on_interrupt();
        }
    }

    #[test]
    fn test_buffered_send_reaches_the_wire_in_order() {
        let (mut uart, state) = bring_up(quiet_config());

        let sent = uart.send(b"wired");
        assert_eq!(sent, 5);
        assert_eq!(uart.state(), UartState::Transmitting);

        drain_tx(&mut uart, &state);
        assert_eq!(state.tx(), b"wired");
        assert_eq!(uart.state(), UartState::Idle);
        // The transmitter was stopped when the queue drained.
        assert_eq!(state.reg(Reg::TaskStopTx), 1);
    }

    #[test]
    fn test_interleaved_sends_extend_a_running_transmission() {
        let (mut uart, state) = bring_up(quiet_config());

        uart.send(b"ab");
        // One byte is on the wire; enqueue more mid-transmission.
        uart.send(b"cd");
        drain_tx(&mut uart, &state);
        assert_eq!(state.tx(), b"abcd");
    }

    #[test]
    fn test_received_bytes_come_back_through_receive() {
        let (mut uart, state) = bring_up(quiet_config());
        state.set_reg(Reg::EventTxdRdy, 0);

        for &byte in b"ok\r" {
            state.push_rx(byte);
            state.set_reg(Reg::EventRxdRdy, 1);
            uart.on_interrupt();
        }

        let mut buf = [0u8; 8];
        assert_eq!(uart.receive(&mut buf), 3);
        assert_eq!(&buf[..3], b"ok\r");
        // A second drain finds nothing and does not block.
        assert_eq!(uart.receive(&mut buf), 0);
    }

    #[test]
    fn test_local_echo_mirrors_received_bytes() {
        let config = UartConfig {
            local_echo: true,
            ..quiet_config()
        };
        let (mut uart, state) = bring_up(config);
        state.set_reg(Reg::EventTxdRdy, 0);

        state.push_rx(b'x');
        state.set_reg(Reg::EventRxdRdy, 1);
        uart.on_interrupt();

        assert_eq!(state.tx(), b"x");
        let mut buf = [0u8; 1];
        assert_eq!(uart.receive(&mut buf), 1);
        assert_eq!(buf[0], b'x');
    }

    #[test]
    fn test_full_inbound_queue_applies_backpressure() {
        let (mut uart, state) = bring_up(quiet_config());
        state.set_reg(Reg::EventTxdRdy, 0);

        // Ten arrivals against a capacity of eight.
        for byte in 0u8..10 {
            state.push_rx(byte);
            state.set_reg(Reg::EventRxdRdy, 1);
            uart.on_interrupt();
        }

        // Only eight RXD reads happened; the overflow bytes were left
        // in the hardware register, not read and dropped.
        let rxd_reads = state
            .ops()
            .iter()
            .filter(|op| matches!(op, Op::Read(Reg::Rxd)))
            .count();
        assert_eq!(rxd_reads, 8);
        // The ready flag was left standing for the hardware to report.
        assert_eq!(state.reg(Reg::EventRxdRdy), 1);

        // Buffered data survived with order and cursors intact.
        let mut buf = [0u8; 16];
        assert_eq!(uart.receive(&mut buf), 8);
        assert_eq!(&buf[..8], &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_line_feed_expansion_end_to_end() {
        let (mut uart, state) = bring_up(quiet_config());

        let sent = uart.send(b"A\n");
        assert_eq!(sent, 2);
        drain_tx(&mut uart, &state);
        assert_eq!(state.tx(), b"A\n\r");
    }
}
