#![no_std]
#![no_main]

//! # Track stream
//!
//! Sends one `lat,lon` CSV record per valid GGA fix over the host link, for
//! drawing the route on a live map. No race logic runs in this binary.
//!
//! ## Usage
//! ```sh
//! cargo run --release --bin track_stream
//! # then, on the host
//! cat /dev/ttyUSB0 > track.csv
//! ```

#[path = "../board.rs"]                mod board;
#[path = "../tasks/host_tx_task.rs"]   mod host_tx_task;

use embassy_executor::Spawner;
use embassy_stm32::usart::Uart;
use embassy_stm32::{bind_interrupts, peripherals};
use race_timer_core::report::track_line;
use race_timer_core::{nmea, LineReceiver, OutputSink, Outbox, SentenceKind};
use {defmt_rtt as _, panic_probe as _};

use crate::board::{serial_config, Board, GPS_BAUD, HOST_BAUD};

static TRACK_OUT: Outbox = Outbox::new();

bind_interrupts!(struct Irqs {
    UART4  => embassy_stm32::usart::InterruptHandler<peripherals::UART4>;
    USART3 => embassy_stm32::usart::InterruptHandler<peripherals::USART3>;
});

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = Board::init().p;

    let mut gps_uart = Uart::new(
        p.USART3, p.PB11, p.PB10,
        Irqs,
        p.DMA1_CH3, p.DMA1_CH1,
        serial_config(GPS_BAUD),
    ).unwrap();
    let (host_tx, _host_rx) = Uart::new(
        p.UART4, p.PA1, p.PA0,
        Irqs,
        p.DMA1_CH4, p.DMA1_CH2,
        serial_config(HOST_BAUD),
    ).unwrap().split();
    spawner.spawn(host_tx_task::host_tx_task(host_tx, &TRACK_OUT)).unwrap();
    let mut host = &TRACK_OUT;

    let mut receiver = LineReceiver::new();
    let mut buf = [0u8; 256];
    let mut points: u32 = 0;
    defmt::info!("track stream started");

    loop {
        let n = match gps_uart.read_until_idle(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                defmt::warn!("gps uart: {}", defmt::Debug2Format(&e));
                continue;
            }
        };

        for &byte in &buf[..n] {
            let Some(sentence) = receiver.on_byte(byte) else { continue };
            let Some(Ok(fix)) = sentence.as_str().map(nmea::parse) else { continue };
            if fix.kind != SentenceKind::Gga {
                continue;
            }
            host.write_text(&track_line(&fix.position()));

            points = points.wrapping_add(1);
            if points % 60 == 0 {
                defmt::debug!("{} track points, {} truncated lines", points, receiver.truncated());
            }
        }
    }
}
