use embassy_executor::task;
use embassy_stm32::peripherals::{DMA1_CH1, DMA1_CH3, USART3};
use embassy_stm32::usart::Uart;
use race_timer_core::{LineReceiver, SentenceHandoff};

/// GPS task: reads NMEA bursts from USART3 and hands every completed line
/// to the race task.
#[task]
pub async fn gps_task(
    mut gps_uart: Uart<'static, USART3, DMA1_CH3, DMA1_CH1>,
    lines: &'static SentenceHandoff,
) {
    let mut receiver = LineReceiver::new();
    let mut buf = [0u8; 256];

    loop {
        // One burst per navigation epoch; idle line marks its end.
        match gps_uart.read_until_idle(&mut buf).await {
            Ok(n) => {
                for &byte in &buf[..n] {
                    if let Some(sentence) = receiver.on_byte(byte) {
                        // A burst holds several lines; let the race task take
                        // each one before handing over the next.
                        lines.publish_when_free(sentence).await;
                    }
                }
            }
            Err(e) => {
                // Framing/overrun noise: drop the burst, the receiver resyncs on the next LF.
                defmt::warn!("gps uart: {}", defmt::Debug2Format(&e));
            }
        }
    }
}
