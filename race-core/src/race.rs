use heapless::Vec;

use crate::config::{SPEED_TRIGGER_KMH, TARGET_DISTANCE_M};
use crate::geo::Position;
use crate::nmea::{Fix, Rejected, SentenceKind};

/// Race phase. Only moves forward; leaving `Finished` takes a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RaceState {
    AwaitingFix,
    Ready,
    Running,
    Finished,
}

/// Captured once at the start, then updated every fix while running.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RaceContext {
    pub start: Position,
    pub start_ms: u32,
    /// Straight-line distance from `start` at the latest fix.
    pub distance_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RaceEvent {
    /// Velocity sentence rejected while still waiting for a fix.
    Waiting,
    FixAcquired,
    Started { start: Position },
    Progress { distance_m: f64, elapsed_ms: u32 },
    Finished { distance_m: f64, elapsed_ms: u32 },
}

/// A single fix yields at most a progress report plus the finish.
pub type RaceEvents = Vec<RaceEvent, 2>;

/// Strictly above [`SPEED_TRIGGER_KMH`]; exactly at the trigger is not a start.
pub fn is_start_speed(speed_kmh: f64) -> bool {
    speed_kmh > SPEED_TRIGGER_KMH
}

/// Start/finish detection over a stream of fixes.
///
/// Only velocity fixes (RMC) drive the race; position-only fixes are ignored.
pub struct RaceMachine {
    state: RaceState,
    context: Option<RaceContext>,
}

impl RaceMachine {
    pub const fn new() -> Self {
        Self {
            state: RaceState::AwaitingFix,
            context: None,
        }
    }

    pub fn state(&self) -> RaceState {
        self.state
    }

    /// `None` until the start has been detected.
    pub fn context(&self) -> Option<&RaceContext> {
        self.context.as_ref()
    }

    /// Feed one parse outcome, stamped with the current clock reading.
    pub fn update(&mut self, parsed: &Result<Fix<'_>, Rejected>, now_ms: u32) -> RaceEvents {
        match parsed {
            Ok(fix) => self.on_fix(fix, now_ms),
            Err(rejected) => self.on_rejected(rejected).into_iter().collect(),
        }
    }

    pub fn on_fix(&mut self, fix: &Fix<'_>, now_ms: u32) -> RaceEvents {
        let mut events = RaceEvents::new();
        let Some(speed_kmh) = fix.speed_kmh() else {
            return events;
        };
        let position = fix.position();

        match self.state {
            RaceState::AwaitingFix => {
                info!("gps fix acquired");
                self.state = RaceState::Ready;
                let _ = events.push(RaceEvent::FixAcquired);
            }
            RaceState::Ready => {
                if is_start_speed(speed_kmh) {
                    info!("start detected at {} km/h", speed_kmh);
                    self.context = Some(RaceContext {
                        start: position,
                        start_ms: now_ms,
                        distance_m: 0.0,
                    });
                    self.state = RaceState::Running;
                    let _ = events.push(RaceEvent::Started { start: position });
                }
            }
            RaceState::Running => {
                let Some(ctx) = self.context.as_mut() else {
                    return events;
                };
                ctx.distance_m = ctx.start.distance_to(&position);
                let elapsed_ms = now_ms.wrapping_sub(ctx.start_ms);
                let distance_m = ctx.distance_m;

                let _ = events.push(RaceEvent::Progress {
                    distance_m,
                    elapsed_ms,
                });
                if distance_m >= TARGET_DISTANCE_M {
                    info!("finish: {} m in {} ms", distance_m, elapsed_ms);
                    self.state = RaceState::Finished;
                    let _ = events.push(RaceEvent::Finished {
                        distance_m,
                        elapsed_ms,
                    });
                }
            }
            RaceState::Finished => {}
        }
        events
    }

    /// Rejected velocity sentences keep the "still waiting" indicator going
    /// until the first fix; everything else is silent.
    pub fn on_rejected(&self, rejected: &Rejected) -> Option<RaceEvent> {
        let waiting = self.state == RaceState::AwaitingFix
            && rejected.kind() == Some(SentenceKind::Rmc);
        waiting.then_some(RaceEvent::Waiting)
    }
}

impl Default for RaceMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
