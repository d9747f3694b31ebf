use core::future::pending;

use embassy_futures::select::{select4, Either4};
use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::uart::{self, UartTx};
use embassy_time::{Duration, Instant, Ticker, Timer};
use smartvit_acquisition::hal::{AnalogChannel, Hardware, Interrupt, PulsePin};

use crate::config::Config;
use crate::error::Error;
use crate::{AnalogRes, Irqs, PulseRes, SerialRes};

enum TimerState {
    Off,
    Window(Instant),
    Periodic(Ticker),
}

/// RP2350B wiring of the node.
///
/// Register-level interrupt enables become flags here: `suspend` only awaits
/// the sources whose flag is set, and the executor parks the core with WFE
/// while none of them is ready.
pub struct Board {
    anemometer: Input<'static>,
    pluviometer: Input<'static>,
    edge_irq: Option<PulsePin>,

    adc: Adc<'static, adc::Async>,
    channels: [adc::Channel<'static>; 6], // indexed by AnalogChannel::index
    selected: Option<AnalogChannel>,
    adc_on: bool,
    converting: bool,
    result: u16,

    uart: UartTx<'static, uart::Async>,
    tx_irq: bool,
    tx_pending: Option<u8>,

    timer: TimerState,
}

impl Board {
    pub fn build(pulse: PulseRes, analog: AnalogRes, serial: SerialRes) -> Board {
        let anemometer = Input::new(pulse.anemometer, Pull::Down);
        let pluviometer = Input::new(pulse.pluviometer, Pull::Down);

        let adc = Adc::new(analog.adc, Irqs, adc::Config::default());
        let channels = [
            adc::Channel::new_pin(analog.wind_vane, Pull::None),
            adc::Channel::new_pin(analog.soil_temperature, Pull::None),
            adc::Channel::new_pin(analog.soil_ph, Pull::None),
            adc::Channel::new_pin(analog.soil_moisture_1, Pull::None),
            adc::Channel::new_pin(analog.soil_moisture_2, Pull::None),
            adc::Channel::new_pin(analog.soil_moisture_3, Pull::None),
        ];

        let mut uart_config = uart::Config::default();
        uart_config.baudrate = Config::UART_BAUD_RATE;
        let uart = UartTx::new(serial.uart, serial.tx, serial.dma, uart_config);

        Board {
            anemometer,
            pluviometer,
            edge_irq: None,
            adc,
            channels,
            selected: None,
            adc_on: false,
            converting: false,
            result: 0,
            uart,
            tx_irq: false,
            tx_pending: None,
            timer: TimerState::Off,
        }
    }
}

impl Hardware for Board {
    fn init(&mut self) {
        self.edge_irq = None;
        self.selected = None;
        self.adc_on = false;
        self.converting = false;
        self.tx_irq = false;
        self.tx_pending = None;
        self.timer = TimerState::Off;

        defmt::info!("board: peripherals idle, uart at {=u32} baud", Config::UART_BAUD_RATE);
    }

    fn enable_edge_interrupt(&mut self, pin: PulsePin) {
        self.edge_irq = Some(pin);
    }

    fn disable_edge_interrupt(&mut self, pin: PulsePin) {
        if self.edge_irq == Some(pin) {
            self.edge_irq = None;
        }
    }

    fn arm_window(&mut self, window: Duration) {
        self.timer = TimerState::Window(Instant::now() + window);
    }

    fn arm_periodic(&mut self, period: Duration) {
        self.timer = TimerState::Periodic(Ticker::every(period));
    }

    fn disarm_timer(&mut self) {
        self.timer = TimerState::Off;
    }

    fn select_channel(&mut self, channel: AnalogChannel) {
        self.selected = Some(channel);
    }

    fn enable_adc(&mut self) {
        self.adc_on = true;
    }

    fn start_conversion(&mut self) {
        if self.adc_on && self.selected.is_some() {
            self.converting = true;
        } else {
            defmt::warn!("board: conversion requested with the converter off");
        }
    }

    fn conversion_result(&mut self) -> u16 {
        self.result
    }

    fn disable_adc(&mut self) {
        self.adc_on = false;
        self.converting = false;
    }

    fn enable_tx_interrupt(&mut self) {
        self.tx_irq = true;
    }

    fn disable_tx_interrupt(&mut self) {
        self.tx_irq = false;
    }

    fn load_tx(&mut self, byte: u8) {
        self.tx_pending = Some(byte);
    }

    async fn suspend(&mut self) -> Interrupt {
        let Board {
            anemometer,
            pluviometer,
            edge_irq,
            adc,
            channels,
            selected,
            converting,
            result,
            uart,
            tx_irq,
            tx_pending,
            timer,
            ..
        } = self;

        let edge = async {
            let Some(pin) = *edge_irq else {
                return pending().await;
            };
            match pin {
                PulsePin::Anemometer => anemometer.wait_for_rising_edge().await,
                PulsePin::Pluviometer => pluviometer.wait_for_rising_edge().await,
            }
            Interrupt::RisingEdge(pin)
        };

        let conversion = async {
            let (true, Some(channel)) = (*converting, *selected) else {
                return pending().await;
            };
            match adc.read(&mut channels[channel.index()]).await {
                Ok(raw) => *result = raw >> Config::ADC_RESOLUTION_SHIFT,
                Err(e) => {
                    defmt::error!("board: conversion on {:?} failed: {:?}", channel, Error::from(e));
                    *result = 0;
                }
            }
            *converting = false;
            Interrupt::ConversionComplete
        };

        let transmit = async {
            if !*tx_irq {
                return pending().await;
            }
            let sent = match tx_pending.take() {
                Some(byte) => uart.write(&[byte]).await,
                // nothing loaded: wait for the shift register to empty
                None => uart.blocking_flush(),
            };
            if let Err(e) = sent {
                defmt::error!("board: uart failed: {:?}", Error::from(e));
            }
            Interrupt::TxReady
        };

        let expiry = async {
            match timer {
                TimerState::Off => return pending().await,
                TimerState::Window(deadline) => {
                    let deadline = *deadline;
                    Timer::at(deadline).await;
                    *timer = TimerState::Off;
                }
                TimerState::Periodic(ticker) => ticker.next().await,
            }
            Interrupt::Timer
        };

        // polled in order, so edges are counted before a window closes
        match select4(edge, conversion, transmit, expiry).await {
            Either4::First(irq) | Either4::Second(irq) | Either4::Third(irq) | Either4::Fourth(irq) => irq,
        }
    }
}
