use crate::hal::{AnalogChannel, Counters, Hardware};
use crate::record::Measurement;

use super::analog::convert;

/// Conversions taken per pH reading
pub const PH_SAMPLES: usize = 10;
/// Highest and lowest conversions dropped from each end
pub const PH_DISCARDED: usize = 2;
/// Conversions that make it into the sum
pub const PH_KEPT: usize = PH_SAMPLES - 2 * PH_DISCARDED;

/// Samples the pH probe [`PH_SAMPLES`] times and returns the sum of the
/// middle-ranked conversions.
///
/// The result is a sum, not a mean. The receiver divides by [`PH_KEPT`].
pub async fn read_ph<H: Hardware>(hw: &mut H, counters: &mut Counters, channel: u8) -> Measurement {
    let channel = match AnalogChannel::try_from(channel) {
        Ok(channel) => channel,
        Err(e) => {
            warn!("ph: {:?}", e);
            return e.into();
        }
    };

    let mut samples = [0u16; PH_SAMPLES];
    for sample in samples.iter_mut() {
        *sample = convert(hw, counters, channel).await;
    }

    let sum = median_window_sum(samples);
    debug!("ph: samples {:?} sum {=u32}", samples, sum);

    Measurement::Value(sum as f32)
}

/// Sorts descending and adds up positions 3 to 8 (one-based).
pub fn median_window_sum(mut samples: [u16; PH_SAMPLES]) -> u32 {
    samples.sort_unstable_by(|a, b| b.cmp(a));

    samples[PH_DISCARDED..PH_SAMPLES - PH_DISCARDED]
        .iter()
        .map(|&sample| u32::from(sample))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::{Call, MockHardware};
    use embassy_futures::block_on;

    #[test]
    fn sums_the_six_middle_ranked_samples() {
        assert_eq!(median_window_sum([10, 9, 8, 7, 6, 5, 4, 3, 2, 1]), 33);
        assert_eq!(median_window_sum([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]), 33);
        assert_eq!(median_window_sum([1023, 0, 500, 501, 502, 0, 1023, 499, 498, 503]), 3003);
    }

    #[test]
    fn outliers_do_not_reach_the_sum() {
        let quiet = median_window_sum([400; PH_SAMPLES]);
        let spiky = median_window_sum([400, 1023, 400, 0, 400, 400, 1023, 400, 0, 400]);

        assert_eq!(quiet, 2400);
        assert_eq!(spiky, quiet);
    }

    #[test]
    fn takes_ten_conversions_on_the_ph_channel() {
        let mut hw = MockHardware::new();
        let mut counters = Counters::new();
        for raw in [7, 3, 9, 1, 5, 2, 8, 4, 6, 10] {
            hw.script_conversion(raw);
        }

        let value = block_on(read_ph(&mut hw, &mut counters, 4));

        assert_eq!(value, Measurement::Value(33.0));
        let conversions = hw.calls().iter().filter(|c| **c == Call::StartConversion).count();
        assert_eq!(conversions, PH_SAMPLES);
        assert!(hw
            .calls()
            .iter()
            .all(|c| !matches!(c, Call::SelectChannel(ch) if *ch != AnalogChannel::SoilPh)));
        assert!(!hw.adc_enabled());
    }

    #[test]
    fn unwired_channel_takes_no_samples() {
        let mut hw = MockHardware::new();
        let mut counters = Counters::new();

        let value = block_on(read_ph(&mut hw, &mut counters, 9));

        assert_eq!(value, Measurement::UnsupportedChannel);
        assert!(hw.calls().is_empty());
    }
}
