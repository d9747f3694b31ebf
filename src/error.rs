#[derive(Debug, defmt::Format)]
pub enum Error {
    AdcFailed,
    UartFailed,
}

impl From<embassy_rp::adc::Error> for Error {
    fn from(value: embassy_rp::adc::Error) -> Self {
        match value {
            embassy_rp::adc::Error::ConversionFailed => Error::AdcFailed,
        }
    }
}

impl From<embassy_rp::uart::Error> for Error {
    fn from(_: embassy_rp::uart::Error) -> Self {
        Error::UartFailed
    }
}
