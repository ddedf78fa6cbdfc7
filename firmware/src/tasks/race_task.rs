use embassy_executor::task;
use race_timer_core::{Clock, Outbox, Pipeline, SentenceHandoff};

/// Log a diagnostics snapshot every this many sentences.
const DIAG_EVERY: u32 = 100;

/// Race task: the main loop. Sleeps until a sentence is ready, then parses
/// it, steps the race and queues status lines for the host.
#[task]
pub async fn race_task(
    outbox: &'static Outbox,
    lines: &'static SentenceHandoff,
    clock: &'static Clock,
) {
    let mut host = outbox;
    let mut pipeline = Pipeline::new();
    pipeline.start(&mut host);

    loop {
        let sentence = lines.take().await;
        pipeline.process(&sentence, clock.now_ms(), &mut host);

        let diag = pipeline.diagnostics();
        if diag.sentences % DIAG_EVERY == 0 {
            defmt::debug!(
                "{} state={} overruns={} output_dropped={}",
                diag,
                pipeline.state(),
                lines.overruns(),
                outbox.dropped()
            );
        }
    }
}
