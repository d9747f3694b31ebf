use embassy_time::Duration;

use crate::hal::{suspend_until, Counters, Hardware, PulsePin, WakeEvent};
use crate::record::Measurement;

/// Counts rising edges on `pin` during one `window`.
///
/// The core sleeps for the whole window; edges only bump the counter. An
/// unknown pin comes back as [`Measurement::UnsupportedPin`] without any
/// interrupt having been enabled.
pub async fn count_pulses<H: Hardware>(hw: &mut H, counters: &mut Counters, pin: u8, window: Duration) -> Measurement {
    let pin = match PulsePin::try_from(pin) {
        Ok(pin) => pin,
        Err(e) => {
            warn!("pulse: {:?}", e);
            return e.into();
        }
    };

    counters.pulses = 0;
    counters.armed_pin = Some(pin);
    hw.enable_edge_interrupt(pin);
    hw.arm_window(window);

    suspend_until(hw, counters, WakeEvent::Timer).await;

    hw.disable_edge_interrupt(pin);
    counters.armed_pin = None;

    debug!("pulse: {:?} counted {=u32} edges", pin, counters.pulses);

    Measurement::Value(counters.pulses as f32)
}
