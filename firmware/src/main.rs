#![no_std]
#![no_main]

mod board;
mod tasks;

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::usart::Uart;
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Duration, Timer};
use race_timer_core::{Clock, Outbox, SentenceHandoff};
use {defmt_rtt as _, panic_probe as _};

use crate::board::{serial_config, Board, GPS_BAUD, HOST_BAUD};

// ── Shared state ──────────────────────────────────────────────────────────────
//  CLOCK: written by clock_task only, read by race_task.
//  GPS_LINES: cap=1; gps_task waits for race_task to take each line.
//  HOST_OUT: status text queued by race_task, sent by host_tx_task.
static CLOCK: Clock = Clock::new();
static GPS_LINES: SentenceHandoff = SentenceHandoff::new();
static HOST_OUT: Outbox = Outbox::new();

// ── Interrupt bindings ────────────────────────────────────────────────────────
bind_interrupts!(struct Irqs {
    UART4  => embassy_stm32::usart::InterruptHandler<peripherals::UART4>;
    USART3 => embassy_stm32::usart::InterruptHandler<peripherals::USART3>;
});

// ── Main ──────────────────────────────────────────────────────────────────────
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // 1. Board init (168 MHz PLL)
    let board = Board::init();
    let p = board.p;
    defmt::info!("race-timer boot");

    // 2. GPS USART3 (RX=PB11, TX=PB10)
    let gps_uart = Uart::new(
        p.USART3, p.PB11, p.PB10,
        Irqs,
        p.DMA1_CH3, p.DMA1_CH1,
        serial_config(GPS_BAUD),
    ).unwrap();

    // 3. Host link UART4 (TX=PA0, RX=PA1). Only TX is used; RX is held so the
    //    peripheral stays configured.
    let host_uart = Uart::new(
        p.UART4, p.PA1, p.PA0,
        Irqs,
        p.DMA1_CH4, p.DMA1_CH2,
        serial_config(HOST_BAUD),
    ).unwrap();
    let (host_tx, _host_rx) = host_uart.split();

    // 4. Heartbeat LED (PC13)
    let mut led = Output::new(p.PC13, Level::High, Speed::Low);

    // 5. Spawn tasks; the clock runs before any sentence can arrive
    spawner.spawn(tasks::clock_task::clock_task(&CLOCK)).unwrap();

    spawner.spawn(tasks::host_tx_task::host_tx_task(host_tx, &HOST_OUT)).unwrap();

    spawner.spawn(tasks::race_task::race_task(
        &HOST_OUT,
        &GPS_LINES,
        &CLOCK,
    )).unwrap();

    spawner.spawn(tasks::gps_task::gps_task(
        gps_uart,
        &GPS_LINES,
    )).unwrap();

    // 6. Main task: LED heartbeat @ 1 Hz
    loop {
        led.toggle();
        Timer::after(Duration::from_millis(500)).await;
    }
}
