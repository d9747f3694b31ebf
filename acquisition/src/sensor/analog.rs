use crate::hal::{suspend_until, AnalogChannel, Counters, Hardware, WakeEvent};
use crate::record::Measurement;

/// Runs one conversion on `channel` and returns its raw value.
///
/// Unwired channels come back as [`Measurement::UnsupportedChannel`] with the
/// converter left off.
pub async fn sample_channel<H: Hardware>(hw: &mut H, counters: &mut Counters, channel: u8) -> Measurement {
    match AnalogChannel::try_from(channel) {
        Ok(channel) => Measurement::Value(convert(hw, counters, channel).await as f32),
        Err(e) => {
            warn!("adc: {:?}", e);
            e.into()
        }
    }
}

/// Single conversion on a known channel. Not reentrant.
pub(crate) async fn convert<H: Hardware>(hw: &mut H, counters: &mut Counters, channel: AnalogChannel) -> u16 {
    hw.select_channel(channel);
    hw.enable_adc();
    hw.start_conversion();

    suspend_until(hw, counters, WakeEvent::ConversionComplete).await;

    let raw = hw.conversion_result();
    hw.disable_adc();

    trace!("adc: {:?} raw {=u16}", channel, raw);

    raw
}
