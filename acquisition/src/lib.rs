//! Acquisition core of the SmartVit sensor node.
//!
//! A single thread of control walks a fixed sequence of measurements, packs
//! the results into a 40-byte frame for the gateway and sleeps until the next
//! cycle. All peripheral access goes through [`hal::Hardware`], so the whole
//! cycle runs unchanged against the RP2350 board or the test double.
//!
//! ## Features
//!
//! - `defmt`: log through the `defmt` framework. Without it logging compiles away.

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod config;
pub mod error;
pub mod frame;
pub mod hal;
pub mod record;
pub mod scheduler;
pub mod sensor;
pub mod sleep;
pub mod transmitter;
pub mod units;

pub use config::{Config, PinMap};
pub use error::Error;
pub use frame::ErrorEncoding;
pub use hal::{AnalogChannel, Hardware, Interrupt, PulsePin};
pub use record::{Field, Measurement, ReadingRecord};
pub use scheduler::{Context, Scheduler, State};
