use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::TARGET_DISTANCE_M;
use crate::geo::Position;
use crate::race::RaceEvent;

/// Longest block emitted in one go (the finish block).
pub const LINE_CAPACITY: usize = 128;

pub type Line = String<LINE_CAPACITY>;

/// Blocking byte writer towards the host or a display.
///
/// Writes are best-effort: the measurement never waits on, or fails because
/// of, the output side.
pub trait OutputSink {
    fn write_bytes(&mut self, bytes: &[u8]);

    fn write_text(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }
}

/// In-memory sink; extra bytes past `N` are dropped.
impl<const N: usize> OutputSink for Vec<u8, N> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.push(b).is_err() {
                break;
            }
        }
    }
}

pub fn banner() -> Line {
    let mut m = Line::new();
    let _ = write!(
        m,
        "\r\n--- GPS {:.0}m Timer Started ---\r\nWaiting for a valid GPS signal...\r\n",
        TARGET_DISTANCE_M
    );
    m
}

/// Text for one race event.
pub fn render(event: &RaceEvent) -> Line {
    let mut m = Line::new();
    let _ = match *event {
        RaceEvent::Waiting => m.write_str("."),
        RaceEvent::FixAcquired => m.write_str("GPS FIX! Ready to start.\r\n"),
        RaceEvent::Started { .. } => m.write_str(">>> START DETECTED! <<<\r\n"),
        RaceEvent::Progress {
            distance_m,
            elapsed_ms,
        } => write!(
            m,
            "Dist: {:.2}m | Tempo: {}.{:02}s\r\n",
            distance_m,
            elapsed_ms / 1000,
            (elapsed_ms % 1000) / 10
        ),
        RaceEvent::Finished { elapsed_ms, .. } => write!(
            m,
            "\r\n=== FINISH ===\r\nFinal Time: {}.{:03} seconds.\r\nRestart the microcontroller for a new run.\r\n",
            elapsed_ms / 1000,
            elapsed_ms % 1000
        ),
    };
    m
}

/// `lat,lon` CSV record (6 decimal places) for the track plotter.
pub fn track_line(position: &Position) -> Line {
    let mut m = Line::new();
    let _ = writeln!(m, "{:.6},{:.6}", position.latitude_deg, position.longitude_deg);
    m
}
