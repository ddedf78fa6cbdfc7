use embassy_executor::task;
use embassy_stm32::peripherals::{DMA1_CH4, UART4};
use embassy_stm32::usart::UartTx;
use race_timer_core::Outbox;

/// Host TX task: drains the outbox onto UART4 by DMA, one chunk at a time.
#[task]
pub async fn host_tx_task(
    mut host_tx: UartTx<'static, UART4, DMA1_CH4>,
    outbox: &'static Outbox,
) {
    loop {
        let chunk = outbox.next().await;
        if let Err(e) = host_tx.write(&chunk).await {
            defmt::warn!("host link write failed: {}", defmt::Debug2Format(&e));
        }
    }
}
