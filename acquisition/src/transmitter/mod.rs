use crate::frame::{self, ErrorEncoding};
use crate::hal::{suspend_until, Counters, Hardware, WakeEvent};
use crate::record::ReadingRecord;

/// Writes the record to the serial port one byte at a time.
///
/// The transmit register holds a single byte, so every byte waits for the
/// previous one to drain. Returns once the last byte has left the register.
/// Nothing is acknowledged.
pub async fn send<H: Hardware>(hw: &mut H, counters: &mut Counters, record: &ReadingRecord, encoding: ErrorEncoding) {
    let frame = frame::encode(record, encoding);

    hw.enable_tx_interrupt();

    for byte in frame {
        suspend_until(hw, counters, WakeEvent::TxReady).await;
        hw.load_tx(byte);
    }
    suspend_until(hw, counters, WakeEvent::TxReady).await;

    hw.disable_tx_interrupt();

    debug!("serial: sent {=usize} bytes", frame.len());
}
