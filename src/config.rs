use smartvit_acquisition::Config as AcquisitionConfig;

pub struct Config;

impl Config {
    /// Serial link to the gateway, 8N1
    pub const UART_BAUD_RATE: u32 = 9600;

    /// The converter is 12 bit, the gateway expects 0-1023
    pub const ADC_RESOLUTION_SHIFT: u16 = 2;

    pub const ACQUISITION: AcquisitionConfig = AcquisitionConfig::new();
}
