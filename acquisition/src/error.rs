use crate::record::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Digital input number with no pulse sensor behind it
    UnsupportedPin(u8),
    /// Analog input number with no sensor behind it
    UnsupportedChannel(u8),
    /// Field was already written during the current cycle
    FieldAlreadyWritten(Field),
    /// Frame is not exactly `FRAME_LEN` bytes long
    FrameLength(usize),
    /// Identifier byte at the given record position does not match the field order
    UnexpectedIdentifier { position: usize, expected: u8, found: u8 },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::UnsupportedPin(pin) => write!(f, "no pulse sensor on pin {}", pin),
            Error::UnsupportedChannel(channel) => write!(f, "no analog sensor on channel {}", channel),
            Error::FieldAlreadyWritten(field) => write!(f, "field {:?} already written this cycle", field),
            Error::FrameLength(len) => write!(f, "frame is {} bytes long", len),
            Error::UnexpectedIdentifier { position, expected, found } => write!(
                f,
                "record {} carries identifier {:#04x}, expected {:#04x}",
                position, found, expected
            ),
        }
    }
}
