//! Hardware abstraction for the acquisition firmware.
//!
//! The firmware never touches registers directly. A [`Hardware`] implementation
//! exposes the handful of peripheral controls the measurements need plus one
//! primitive, [`Hardware::suspend`], which halts the core in a low-power state
//! until some enabled interrupt has run and reports which one it was.
//!
//! [`suspend_until`] turns that primitive into an event-keyed wait: rising edges
//! on the armed pulse input are counted without resuming the caller, and every
//! other interrupt except the awaited one is recorded as spurious.

#[cfg(test)]
pub(crate) mod mock;

use embassy_time::Duration;

use crate::error::Error;

/// Digital inputs that carry pulse sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulsePin {
    Anemometer,
    Pluviometer,
}

impl PulsePin {
    pub const fn number(self) -> u8 {
        match self {
            PulsePin::Anemometer => 3,
            PulsePin::Pluviometer => 4,
        }
    }
}

impl TryFrom<u8> for PulsePin {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(PulsePin::Anemometer),
            4 => Ok(PulsePin::Pluviometer),
            other => Err(Error::UnsupportedPin(other)),
        }
    }
}

/// Analog inputs wired to a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogChannel {
    WindVane,
    SoilTemperature,
    SoilPh,
    SoilMoisture1,
    SoilMoisture2,
    SoilMoisture3,
}

impl AnalogChannel {
    pub const ALL: [AnalogChannel; 6] = [
        AnalogChannel::WindVane,
        AnalogChannel::SoilTemperature,
        AnalogChannel::SoilPh,
        AnalogChannel::SoilMoisture1,
        AnalogChannel::SoilMoisture2,
        AnalogChannel::SoilMoisture3,
    ];

    /// Converter input number
    pub const fn number(self) -> u8 {
        match self {
            AnalogChannel::WindVane => 0,
            AnalogChannel::SoilTemperature => 3,
            AnalogChannel::SoilPh => 4,
            AnalogChannel::SoilMoisture1 => 5,
            AnalogChannel::SoilMoisture2 => 6,
            AnalogChannel::SoilMoisture3 => 7,
        }
    }

    /// Position in [`AnalogChannel::ALL`], handy for indexing per-channel tables.
    pub const fn index(self) -> usize {
        match self {
            AnalogChannel::WindVane => 0,
            AnalogChannel::SoilTemperature => 1,
            AnalogChannel::SoilPh => 2,
            AnalogChannel::SoilMoisture1 => 3,
            AnalogChannel::SoilMoisture2 => 4,
            AnalogChannel::SoilMoisture3 => 5,
        }
    }
}

impl TryFrom<u8> for AnalogChannel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        AnalogChannel::ALL
            .into_iter()
            .find(|channel| channel.number() == value)
            .ok_or(Error::UnsupportedChannel(value))
    }
}

/// Interrupt that ran while the core was suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interrupt {
    RisingEdge(PulsePin),
    Timer,
    ConversionComplete,
    TxReady,
}

/// Interrupts allowed to resume a waiting primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeEvent {
    Timer,
    ConversionComplete,
    TxReady,
}

impl WakeEvent {
    fn matches(self, irq: Interrupt) -> bool {
        matches!(
            (self, irq),
            (WakeEvent::Timer, Interrupt::Timer)
                | (WakeEvent::ConversionComplete, Interrupt::ConversionComplete)
                | (WakeEvent::TxReady, Interrupt::TxReady)
        )
    }
}

/// Peripheral controls and the low-power suspension primitive.
///
/// Implementations own every peripheral the acquisition cycle uses. Only one
/// primitive drives them at any time, so none of these methods need to guard
/// against concurrent use.
#[allow(async_fn_in_trait)]
pub trait Hardware {
    /// Fixed peripheral bring-up. Must be idempotent.
    fn init(&mut self);

    /// Enables the rising-edge interrupt of a pulse input.
    fn enable_edge_interrupt(&mut self, pin: PulsePin);

    fn disable_edge_interrupt(&mut self, pin: PulsePin);

    /// Arms the timer to fire once after `window`.
    fn arm_window(&mut self, window: Duration);

    /// Arms the timer to fire every `period` until disarmed.
    fn arm_periodic(&mut self, period: Duration);

    fn disarm_timer(&mut self);

    fn select_channel(&mut self, channel: AnalogChannel);

    /// Powers the converter and enables its conversion-complete interrupt.
    fn enable_adc(&mut self);

    fn start_conversion(&mut self);

    /// Result register of the last completed conversion, 0-1023.
    fn conversion_result(&mut self) -> u16;

    /// Powers the converter down and disables its interrupt.
    fn disable_adc(&mut self);

    /// Enables the transmit-register-empty interrupt of the serial port.
    fn enable_tx_interrupt(&mut self);

    fn disable_tx_interrupt(&mut self);

    /// Places one byte in the transmit register.
    fn load_tx(&mut self, byte: u8);

    /// Halts the core until an enabled interrupt has run and returns it.
    ///
    /// With no wake source enabled this never returns.
    async fn suspend(&mut self) -> Interrupt;
}

/// Bookkeeping that interrupt handlers update while the scheduler waits.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Counters {
    /// Edges seen on the armed pulse input during the current window
    pub pulses: u32,
    /// Timer firings during the current off phase
    pub ticks: u32,
    /// Pulse input whose edges are currently counted
    pub armed_pin: Option<PulsePin>,
    /// Interrupts that ran during a wait without being the awaited event
    pub spurious: u32,
}

impl Counters {
    pub const fn new() -> Self {
        Self {
            pulses: 0,
            ticks: 0,
            armed_pin: None,
            spurious: 0,
        }
    }
}

/// Suspends until `event` fires.
///
/// Edges on the armed pin bump the pulse counter and go straight back to
/// sleep. Nothing but `event` resumes the caller.
pub async fn suspend_until<H: Hardware>(hw: &mut H, counters: &mut Counters, event: WakeEvent) {
    loop {
        let irq = hw.suspend().await;

        if event.matches(irq) {
            return;
        }

        match irq {
            Interrupt::RisingEdge(pin) if counters.armed_pin == Some(pin) => {
                counters.pulses = counters.pulses.wrapping_add(1);
            }
            other => {
                counters.spurious = counters.spurious.wrapping_add(1);
                warn!("hal: {:?} while waiting for {:?}, staying suspended", other, event);
            }
        }
    }
}
