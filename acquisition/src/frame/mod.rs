//! Wire format shared with the gateway.
//!
//! A frame is the eight record fields back to back, each one identifier byte
//! followed by an IEEE-754 single, most significant byte first. There are no
//! delimiters, no length and no checksum: both ends know the layout.
//!
//! | offset | size | content          |
//! |--------|------|------------------|
//! | 5 * n  | 1    | field identifier |
//! | 5 * n + 1 | 4 | value, big endian |

use crate::error::Error;
use crate::record::{Field, Measurement, ReadingRecord};

pub const FIELD_LEN: usize = 5;
pub const FRAME_LEN: usize = FIELD_LEN * Field::COUNT;

/// Wire value for a pulse pin the board does not know about, legacy encoding.
pub const DIGITAL_SENTINEL: f32 = 401.0;
/// Wire value for an unwired analog channel, legacy encoding.
pub const ANALOG_SENTINEL: f32 = 402.0;

// Quiet NaNs carrying the legacy codes in their payload
const UNSUPPORTED_PIN_BITS: u32 = 0x7fc0_0191;
const UNSUPPORTED_CHANNEL_BITS: u32 = 0x7fc0_0192;

/// How measurement errors are written into the value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorEncoding {
    /// Errors become NaNs with a distinct payload per failure domain, which
    /// no reading can collide with.
    #[default]
    Tagged,
    /// Errors become the plain numbers 401.0 and 402.0, as older receivers
    /// expect. A receiver cannot tell these apart from real readings.
    Sentinel,
}

impl ErrorEncoding {
    pub fn encode(self, value: Measurement) -> f32 {
        match (self, value) {
            (_, Measurement::Value(value)) => value,
            (ErrorEncoding::Tagged, Measurement::UnsupportedPin) => f32::from_bits(UNSUPPORTED_PIN_BITS),
            (ErrorEncoding::Tagged, Measurement::UnsupportedChannel) => f32::from_bits(UNSUPPORTED_CHANNEL_BITS),
            (ErrorEncoding::Sentinel, Measurement::UnsupportedPin) => DIGITAL_SENTINEL,
            (ErrorEncoding::Sentinel, Measurement::UnsupportedChannel) => ANALOG_SENTINEL,
        }
    }

    pub fn decode(self, value: f32) -> Measurement {
        match (self, value.to_bits()) {
            (ErrorEncoding::Tagged, UNSUPPORTED_PIN_BITS) => Measurement::UnsupportedPin,
            (ErrorEncoding::Tagged, UNSUPPORTED_CHANNEL_BITS) => Measurement::UnsupportedChannel,
            _ => Measurement::Value(value),
        }
    }
}

/// Lays the record out as it goes on the wire.
pub fn encode(record: &ReadingRecord, encoding: ErrorEncoding) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];

    for (chunk, (id, value)) in frame.chunks_exact_mut(FIELD_LEN).zip(record.entries()) {
        chunk[0] = id;
        chunk[1..].copy_from_slice(&encoding.encode(value).to_be_bytes());
    }

    frame
}

/// Receiving side: checks the layout and rebuilds the record.
pub fn decode(frame: &[u8], encoding: ErrorEncoding) -> Result<ReadingRecord, Error> {
    if frame.len() != FRAME_LEN {
        return Err(Error::FrameLength(frame.len()));
    }

    let mut record = ReadingRecord::new();
    record.assign_ids();

    for (position, (chunk, field)) in frame.chunks_exact(FIELD_LEN).zip(Field::ALL).enumerate() {
        if chunk[0] != field.id() {
            return Err(Error::UnexpectedIdentifier {
                position,
                expected: field.id(),
                found: chunk[0],
            });
        }

        let value = f32::from_be_bytes([chunk[1], chunk[2], chunk[3], chunk[4]]);
        record.store(field, encoding.decode(value))?;
    }

    Ok(record)
}
