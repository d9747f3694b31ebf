//! Gateway-side interpretation of frame values.
//!
//! The node ships raw counts and conversions. These helpers turn them into
//! physical quantities the way the receiving board does.

use embassy_time::Duration;

use crate::sensor::ph::PH_KEPT;

/// Converter reference voltage
pub const VREF: f32 = 1.25;
/// Full-scale conversion value
pub const ADC_FULL_SCALE: u16 = 1023;
/// Radius of the anemometer cups, metres
pub const ANEMOMETER_RADIUS_M: f32 = 0.147;
/// Rain collected per bucket tip, millimetres
pub const RAIN_PER_TIP_MM: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl WindDirection {
    const SECTORS: [WindDirection; 8] = [
        WindDirection::North,
        WindDirection::NorthEast,
        WindDirection::East,
        WindDirection::SouthEast,
        WindDirection::South,
        WindDirection::SouthWest,
        WindDirection::West,
        WindDirection::NorthWest,
    ];

    /// Splits the conversion range into eight equal sectors.
    pub fn from_raw(raw: f32) -> WindDirection {
        let clamped = raw.clamp(0.0, ADC_FULL_SCALE as f32);
        let sector = (clamped * 8.0 / (ADC_FULL_SCALE as f32 + 1.0)) as usize;
        Self::SECTORS[sector.min(Self::SECTORS.len() - 1)]
    }
}

/// Voltage at the converter input for a raw conversion.
pub fn voltage(raw: f32) -> f32 {
    raw * VREF / ADC_FULL_SCALE as f32
}

/// Mean pH conversion from the filtered sum the node sends.
pub fn ph_mean(sum: f32) -> f32 {
    sum / PH_KEPT as f32
}

/// Rainfall during one counting window, millimetres.
pub fn rainfall_mm(tips: f32) -> f32 {
    tips * RAIN_PER_TIP_MM
}

/// Cup speed over one counting window, metres per second.
pub fn wind_speed_ms(revolutions: f32, window: Duration) -> f32 {
    let seconds = window.as_millis() as f32 / 1000.0;
    if seconds == 0.0 {
        return 0.0;
    }
    2.0 * core::f32::consts::PI * ANEMOMETER_RADIUS_M * revolutions / seconds
}
