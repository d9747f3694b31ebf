use embassy_time::Duration;

use crate::frame::ErrorEncoding;

/// Build-time input numbers for every sensor.
///
/// Digital numbers are port bits, analog numbers are converter input channels.
/// A number the hardware layer does not know about is not rejected here: the
/// corresponding measurement reports it at run time instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    pub anemometer: u8,
    pub pluviometer: u8,
    pub wind_vane: u8,
    pub soil_temperature: u8,
    pub soil_ph: u8,
    pub soil_moisture: [u8; 3],
}

impl PinMap {
    pub const fn new() -> Self {
        Self {
            anemometer: 3,
            pluviometer: 4,
            wind_vane: 0,
            soil_temperature: 3,
            soil_ph: 4,
            soil_moisture: [5, 6, 7],
        }
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Length of the edge counting window for both pulse sensors
    pub pulse_window: Duration,
    /// Period of the duty cycle timer
    pub sleep_period: Duration,
    /// Timer firings per duty cycle off phase
    pub sleep_ticks: u32,
    pub error_encoding: ErrorEncoding,
    pub pins: PinMap,
}

impl Config {
    // 30720 ticks of a 4096 Hz clock
    pub const PULSE_WINDOW: Duration = Duration::from_millis(7_500);
    pub const SLEEP_PERIOD: Duration = Duration::from_millis(7_500);
    // 15 * 7.5 s = 112.5 s off
    pub const SLEEP_TICKS: u32 = 15;

    pub const fn new() -> Self {
        Self {
            pulse_window: Self::PULSE_WINDOW,
            sleep_period: Self::SLEEP_PERIOD,
            sleep_ticks: Self::SLEEP_TICKS,
            error_encoding: ErrorEncoding::Tagged,
            pins: PinMap::new(),
        }
    }

    /// Total time spent suspended between two acquisition cycles.
    pub fn sleep_duration(&self) -> Duration {
        self.sleep_period * self.sleep_ticks
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
