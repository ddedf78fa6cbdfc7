use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use crate::config::SENTENCE_CAPACITY;

/// Longest sentence body kept. The last slot of the wire buffer is reserved
/// for the terminator, so a line never fills the full capacity.
pub const MAX_SENTENCE_LEN: usize = SENTENCE_CAPACITY - 1;

// ── RawSentence ───────────────────────────────────────────────────────────────

/// One received line, CR/LF stripped, at most [`MAX_SENTENCE_LEN`] bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawSentence {
    bytes: Vec<u8, MAX_SENTENCE_LEN>,
}

impl RawSentence {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Copy `bytes`, dropping whatever does not fit.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut sentence = Self::new();
        for &b in bytes {
            if !sentence.push(b) {
                break;
            }
        }
        sentence
    }

    /// Returns `false` (and keeps the byte out) once the buffer is full.
    fn push(&mut self, byte: u8) -> bool {
        self.bytes.push(byte).is_ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `None` if the line is not valid UTF-8 (line noise, split multibyte char).
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ── LineReceiver ──────────────────────────────────────────────────────────────

/// Assembles a raw UART byte stream into newline-terminated sentences.
///
/// Owned by the reception context. Each call is O(1) and never blocks, so it
/// can run straight from a UART interrupt or an RX task.
pub struct LineReceiver {
    capture: RawSentence,
    overflowing: bool,
    truncated: u32,
}

impl LineReceiver {
    pub const fn new() -> Self {
        Self {
            capture: RawSentence::new(),
            overflowing: false,
            truncated: 0,
        }
    }

    /// Feed one byte. Returns the finished sentence when `byte` is a line feed.
    ///
    /// Carriage returns are ignored. Bytes beyond [`MAX_SENTENCE_LEN`] are
    /// dropped silently; the line is still delivered, truncated.
    pub fn on_byte(&mut self, byte: u8) -> Option<RawSentence> {
        match byte {
            b'\r' => None,
            b'\n' => {
                if self.overflowing {
                    self.overflowing = false;
                    self.truncated = self.truncated.wrapping_add(1);
                    warn!("nmea line truncated at {} bytes", MAX_SENTENCE_LEN);
                }
                // Taking the capture resets the write index for the next line.
                Some(core::mem::take(&mut self.capture))
            }
            _ => {
                if !self.capture.push(byte) {
                    self.overflowing = true;
                }
                None
            }
        }
    }

    /// Bytes currently held for the line in progress.
    pub fn pending(&self) -> usize {
        self.capture.len()
    }

    /// Number of lines delivered truncated since boot.
    pub fn truncated(&self) -> u32 {
        self.truncated
    }
}

impl Default for LineReceiver {
    fn default() -> Self {
        Self::new()
    }
}

// ── SentenceHandoff ───────────────────────────────────────────────────────────

/// Single-slot hand-off between the reception context and the main loop.
///
/// Cap=1: a full slot is the "data ready" flag. While it is full,
/// [`publish`](Self::publish) drops newer sentences and counts them, and
/// [`publish_when_free`](Self::publish_when_free) waits; the pending one is
/// never overwritten.
/// Moving a sentence in or out is one bounded copy inside the channel's
/// critical section.
pub struct SentenceHandoff {
    slot: Channel<CriticalSectionRawMutex, RawSentence, 1>,
    overruns: AtomicU32,
}

impl SentenceHandoff {
    pub const fn new() -> Self {
        Self {
            slot: Channel::new(),
            overruns: AtomicU32::new(0),
        }
    }

    /// Reception side. Wakes a pending [`take`](Self::take).
    pub fn publish(&self, sentence: RawSentence) -> bool {
        match self.slot.try_send(sentence) {
            Ok(()) => true,
            Err(_) => {
                let total = self.overruns.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
                warn!("sentence dropped, main loop busy ({} total)", total);
                false
            }
        }
    }

    /// Reception side, for a task that can wait: parks until the main loop
    /// has taken the pending sentence, so a burst reaches it line by line.
    /// Never counts an overrun.
    pub async fn publish_when_free(&self, sentence: RawSentence) {
        self.slot.send(sentence).await;
    }

    /// Main-loop side, non-blocking: move out the pending sentence and clear
    /// the flag.
    pub fn take_if_ready(&self) -> Option<RawSentence> {
        self.slot.try_receive().ok()
    }

    /// Main-loop side: idle until a sentence is published.
    pub async fn take(&self) -> RawSentence {
        self.slot.receive().await
    }

    pub fn is_ready(&self) -> bool {
        self.slot.is_full()
    }

    /// Number of completed sentences dropped because the slot was full.
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}

impl Default for SentenceHandoff {
    fn default() -> Self {
        Self::new()
    }
}
