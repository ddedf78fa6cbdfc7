use embassy_executor::task;
use embassy_time::{Duration, Ticker};
use race_timer_core::config::TICK_PERIOD_MS;
use race_timer_core::Clock;

/// Millisecond tick source for race timing.
#[task]
pub async fn clock_task(clock: &'static Clock) {
    let mut ticker = Ticker::every(Duration::from_millis(TICK_PERIOD_MS));
    loop {
        ticker.next().await;
        clock.tick();
    }
}
