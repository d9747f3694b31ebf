//! Measurement primitives.
//!
//! Each one drives the hardware through a single blocking wait and hands back a
//! [`Measurement`](crate::record::Measurement). None of them retry, and none of
//! them fail: a sensor number the board does not know is reported in-band.

pub mod analog;
pub mod ph;
pub mod pulse;

pub use analog::sample_channel;
pub use ph::{median_window_sum, read_ph};
pub use pulse::count_pulses;
