//! GPS race timer core: NMEA line reception, fix parsing, great-circle
//! distance and the start/finish state machine.
//!
//! Everything here is `no_std`, allocation-free and hardware-agnostic. The
//! firmware crate wires it to UARTs and a 1 ms tick; tests run it on the host.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod clock;
pub mod config;
pub mod coord;
pub mod geo;
pub mod nmea;
pub mod outbox;
pub mod pipeline;
pub mod race;
pub mod receiver;
pub mod report;

pub use clock::Clock;
pub use coord::to_decimal_degrees;
pub use geo::{haversine_m, Position};
pub use nmea::{parse, Fix, RawCoordinate, Rejected, SentenceKind, Talker};
pub use outbox::Outbox;
pub use pipeline::{Diagnostics, Pipeline};
pub use race::{RaceContext, RaceEvent, RaceEvents, RaceMachine, RaceState};
pub use receiver::{LineReceiver, RawSentence, SentenceHandoff};
pub use report::OutputSink;
