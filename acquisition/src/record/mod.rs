use crate::error::Error;

/// Result of one measurement.
///
/// Configuration errors travel in the same slot as readings but stay
/// distinguishable from them all the way to the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Measurement {
    Value(f32),
    /// Pulse counting was asked for on a pin without a pulse sensor
    UnsupportedPin,
    /// A conversion was asked for on an unwired analog channel
    UnsupportedChannel,
}

impl Measurement {
    pub const NEUTRAL: Measurement = Measurement::Value(0.0);

    pub fn value(self) -> Option<f32> {
        match self {
            Measurement::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_error(self) -> bool {
        !matches!(self, Measurement::Value(_))
    }
}

impl From<Error> for Measurement {
    fn from(value: Error) -> Self {
        match value {
            Error::UnsupportedPin(_) => Measurement::UnsupportedPin,
            _ => Measurement::UnsupportedChannel,
        }
    }
}

/// Fields of a reading record, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    WindDirection,
    WindSpeed,
    RainQuantity,
    SoilTemperature,
    SoilPh,
    SoilMoisture1,
    SoilMoisture2,
    SoilMoisture3,
}

impl Field {
    pub const COUNT: usize = 8;

    pub const ALL: [Field; Field::COUNT] = [
        Field::WindDirection,
        Field::WindSpeed,
        Field::RainQuantity,
        Field::SoilTemperature,
        Field::SoilPh,
        Field::SoilMoisture1,
        Field::SoilMoisture2,
        Field::SoilMoisture3,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Identifier byte sent ahead of the value.
    pub const fn id(self) -> u8 {
        match self {
            Field::WindDirection => b'a',
            Field::WindSpeed => b'b',
            Field::RainQuantity => b'c',
            Field::SoilTemperature => b'd',
            Field::SoilMoisture1 => b'e',
            Field::SoilMoisture2 => b'f',
            Field::SoilMoisture3 => b'g',
            Field::SoilPh => b'h',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Slot {
    id: u8,
    value: Measurement,
    written: bool,
}

/// One reading per sensor, overwritten every acquisition cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadingRecord {
    slots: [Slot; Field::COUNT],
}

impl ReadingRecord {
    /// Record with unassigned (zero) identifiers and neutral values.
    pub const fn new() -> Self {
        Self {
            slots: [Slot {
                id: 0,
                value: Measurement::NEUTRAL,
                written: false,
            }; Field::COUNT],
        }
    }

    /// Gives every field its identifier byte. Done once, at setup.
    pub fn assign_ids(&mut self) {
        for field in Field::ALL {
            self.slots[field.index()].id = field.id();
        }
    }

    /// Resets every value to neutral and opens the record for a new cycle.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.value = Measurement::NEUTRAL;
            slot.written = false;
        }
    }

    /// Writes a field. Each field takes exactly one write per cycle; later
    /// writes are refused and leave the first value in place.
    pub fn store(&mut self, field: Field, value: Measurement) -> Result<(), Error> {
        let slot = &mut self.slots[field.index()];

        if slot.written {
            return Err(Error::FieldAlreadyWritten(field));
        }

        slot.value = value;
        slot.written = true;
        Ok(())
    }

    pub fn get(&self, field: Field) -> Measurement {
        self.slots[field.index()].value
    }

    pub fn id(&self, field: Field) -> u8 {
        self.slots[field.index()].id
    }

    pub fn is_written(&self, field: Field) -> bool {
        self.slots[field.index()].written
    }

    /// True once every field has been written this cycle.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.written)
    }

    /// `(identifier, value)` pairs in wire order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, Measurement)> + '_ {
        self.slots.iter().map(|slot| (slot.id, slot.value))
    }
}

impl Default for ReadingRecord {
    fn default() -> Self {
        Self::new()
    }
}
