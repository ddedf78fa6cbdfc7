use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use crate::config::OUTBOX_DEPTH;
use crate::report::{OutputSink, LINE_CAPACITY};

/// One queued piece of output text.
pub type Chunk = Vec<u8, LINE_CAPACITY>;

/// Queue between the main loop and the task that owns the output UART.
///
/// Writing never waits on the wire: text goes into the queue and the TX task
/// sends it at line rate. When the queue is full the text is dropped and
/// counted, so a slow or absent host never holds up reception or timing.
pub struct Outbox {
    queue: Channel<CriticalSectionRawMutex, Chunk, OUTBOX_DEPTH>,
    dropped: AtomicU32,
}

impl Outbox {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue `bytes`, split into [`LINE_CAPACITY`]-sized chunks.
    pub fn push(&self, bytes: &[u8]) {
        for part in bytes.chunks(LINE_CAPACITY) {
            let Ok(chunk) = Chunk::from_slice(part) else {
                continue;
            };
            if self.queue.try_send(chunk).is_err() {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
                warn!("output dropped, queue full ({} total)", total);
            }
        }
    }

    /// TX side: wait for the next chunk.
    pub async fn next(&self) -> Chunk {
        self.queue.receive().await
    }

    pub fn try_next(&self) -> Option<Chunk> {
        self.queue.try_receive().ok()
    }

    /// Chunks lost to a full queue since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for Outbox {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for &Outbox {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.push(bytes);
    }
}
