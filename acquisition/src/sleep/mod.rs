use embassy_time::Duration;

use crate::hal::{suspend_until, Counters, Hardware, WakeEvent};

/// Keeps the node suspended for `ticks` firings of a `period` timer.
///
/// This is the off half of the duty cycle and the only place the node saves
/// power between acquisitions.
pub async fn sleep<H: Hardware>(hw: &mut H, counters: &mut Counters, period: Duration, ticks: u32) {
    counters.ticks = 0;

    if ticks == 0 {
        return;
    }

    hw.arm_periodic(period);

    while counters.ticks < ticks {
        suspend_until(hw, counters, WakeEvent::Timer).await;
        counters.ticks += 1;
    }

    hw.disarm_timer();

    debug!("sleep: woke after {=u32} ticks", counters.ticks);
}
