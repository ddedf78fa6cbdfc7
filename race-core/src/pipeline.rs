use crate::nmea::{parse, Rejected};
use crate::race::{RaceMachine, RaceState};
use crate::receiver::RawSentence;
use crate::report::{self, OutputSink};

/// Counters for what the main loop has seen. Never affect race timing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    pub sentences: u32,
    pub rejected: u32,
}

/// Main-loop body: sentence in, status text out.
///
/// Holds the race machine and is owned by the one task that runs the loop;
/// nothing in here is shared with the reception side.
pub struct Pipeline {
    race: RaceMachine,
    diagnostics: Diagnostics,
}

impl Pipeline {
    pub const fn new() -> Self {
        Self {
            race: RaceMachine::new(),
            diagnostics: Diagnostics {
                sentences: 0,
                rejected: 0,
            },
        }
    }

    /// Boot banner.
    pub fn start(&self, sink: &mut impl OutputSink) {
        info!("race timer started");
        sink.write_text(&report::banner());
    }

    /// Parse one sentence, step the race and write whatever it reports.
    pub fn process(&mut self, sentence: &RawSentence, now_ms: u32, sink: &mut impl OutputSink) {
        self.diagnostics.sentences = self.diagnostics.sentences.wrapping_add(1);

        let parsed = sentence.as_str().ok_or(Rejected::NotText).and_then(parse);
        if let Err(rejected) = &parsed {
            self.diagnostics.rejected = self.diagnostics.rejected.wrapping_add(1);
            debug!("sentence rejected: {}", rejected);
        }

        for event in self.race.update(&parsed, now_ms) {
            sink.write_text(&report::render(&event));
        }
    }

    pub fn state(&self) -> RaceState {
        self.race.state()
    }

    pub fn race(&self) -> &RaceMachine {
        &self.race
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
