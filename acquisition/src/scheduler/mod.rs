//! Acquisition state machine.
//!
//! Setup runs once, then the node loops forever:
//!
//! ```text
//! ClearOutput -> GetAnemometer -> GetPluviometer -> GetWindVane -> GetTemperature -> GetPh
//!     ^                                                                               |
//!     |                                                                               v
//! SleepMode <- SendData <- GetMoisture3 <- GetMoisture2 <- GetMoisture1 <-------------+
//! ```
//!
//! Every transition is unconditional. A failed measurement is stored like any
//! other value and the cycle carries on.

use crate::config::Config;
use crate::hal::{Counters, Hardware};
use crate::record::{Field, Measurement, ReadingRecord};
use crate::{sensor, sleep, transmitter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum State {
    Setup,
    ClearOutput,
    GetAnemometer,
    GetPluviometer,
    GetWindVane,
    GetTemperature,
    GetPh,
    GetMoisture1,
    GetMoisture2,
    GetMoisture3,
    SendData,
    SleepMode,
}

impl State {
    const ALL: [State; 12] = [
        State::Setup,
        State::ClearOutput,
        State::GetAnemometer,
        State::GetPluviometer,
        State::GetWindVane,
        State::GetTemperature,
        State::GetPh,
        State::GetMoisture1,
        State::GetMoisture2,
        State::GetMoisture3,
        State::SendData,
        State::SleepMode,
    ];

    /// Decodes a state register value; `None` if it names no state.
    pub fn from_raw(raw: u8) -> Option<State> {
        State::ALL.get(usize::from(raw)).copied()
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Unconditional successor.
    pub const fn next(self) -> State {
        match self {
            State::Setup => State::ClearOutput,
            State::ClearOutput => State::GetAnemometer,
            State::GetAnemometer => State::GetPluviometer,
            State::GetPluviometer => State::GetWindVane,
            State::GetWindVane => State::GetTemperature,
            State::GetTemperature => State::GetPh,
            State::GetPh => State::GetMoisture1,
            State::GetMoisture1 => State::GetMoisture2,
            State::GetMoisture2 => State::GetMoisture3,
            State::GetMoisture3 => State::SendData,
            State::SendData => State::SleepMode,
            State::SleepMode => State::ClearOutput,
        }
    }
}

/// Everything interrupt handlers and measurements share, owned by the scheduler.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Context {
    pub record: ReadingRecord,
    pub counters: Counters,
}

impl Context {
    pub const fn new() -> Self {
        Self {
            record: ReadingRecord::new(),
            counters: Counters::new(),
        }
    }
}

pub struct Scheduler<H: Hardware> {
    hw: H,
    config: Config,
    ctx: Context,
    state: u8,
}

impl<H: Hardware> Scheduler<H> {
    pub fn new(hw: H, config: Config) -> Self {
        Self {
            hw,
            config,
            ctx: Context::new(),
            state: State::Setup.raw(),
        }
    }

    /// State evaluated by the next [`step`](Self::step), `None` if the register is corrupt.
    pub fn state(&self) -> Option<State> {
        State::from_raw(self.state)
    }

    /// Overwrites the state register with an arbitrary value.
    pub fn set_raw_state(&mut self, raw: u8) {
        self.state = raw;
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Runs the acquisition cycle until power is lost.
    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    /// Evaluates the current state once and returns the state that follows.
    pub async fn step(&mut self) -> State {
        let next = match self.state() {
            Some(state) => {
                self.execute(state).await;
                state.next()
            }
            None => {
                warn!("scheduler: corrupt state {=u8}, falling back to sleep", self.state);
                State::SleepMode
            }
        };

        self.state = next.raw();
        next
    }

    async fn execute(&mut self, state: State) {
        let Self { hw, config, ctx, .. } = self;
        let pins = config.pins;

        match state {
            State::Setup => {
                hw.init();
                ctx.record.assign_ids();
                info!("scheduler: node ready, {:?}", config);
            }
            State::ClearOutput => ctx.record.clear(),
            State::GetAnemometer => {
                let count = sensor::count_pulses(hw, &mut ctx.counters, pins.anemometer, config.pulse_window).await;
                store(&mut ctx.record, Field::WindSpeed, count);
            }
            State::GetPluviometer => {
                let count = sensor::count_pulses(hw, &mut ctx.counters, pins.pluviometer, config.pulse_window).await;
                store(&mut ctx.record, Field::RainQuantity, count);
            }
            State::GetWindVane => {
                let raw = sensor::sample_channel(hw, &mut ctx.counters, pins.wind_vane).await;
                store(&mut ctx.record, Field::WindDirection, raw);
            }
            State::GetTemperature => {
                let raw = sensor::sample_channel(hw, &mut ctx.counters, pins.soil_temperature).await;
                store(&mut ctx.record, Field::SoilTemperature, raw);
            }
            State::GetPh => {
                let sum = sensor::read_ph(hw, &mut ctx.counters, pins.soil_ph).await;
                store(&mut ctx.record, Field::SoilPh, sum);
            }
            State::GetMoisture1 => {
                let raw = sensor::sample_channel(hw, &mut ctx.counters, pins.soil_moisture[0]).await;
                store(&mut ctx.record, Field::SoilMoisture1, raw);
            }
            State::GetMoisture2 => {
                let raw = sensor::sample_channel(hw, &mut ctx.counters, pins.soil_moisture[1]).await;
                store(&mut ctx.record, Field::SoilMoisture2, raw);
            }
            State::GetMoisture3 => {
                let raw = sensor::sample_channel(hw, &mut ctx.counters, pins.soil_moisture[2]).await;
                store(&mut ctx.record, Field::SoilMoisture3, raw);
            }
            State::SendData => {
                if !ctx.record.is_complete() {
                    warn!("scheduler: sending a record with unwritten fields");
                }
                transmitter::send(hw, &mut ctx.counters, &ctx.record, config.error_encoding).await;
            }
            State::SleepMode => {
                sleep::sleep(hw, &mut ctx.counters, config.sleep_period, config.sleep_ticks).await;
            }
        }
    }
}

fn store(record: &mut ReadingRecord, field: Field, value: Measurement) {
    match record.store(field, value) {
        Ok(()) => debug!("scheduler: {:?} = {:?}", field, value),
        Err(e) => error!("scheduler: {:?}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PinMap;
    use crate::frame::{self, ErrorEncoding, FRAME_LEN};
    use crate::hal::mock::{Call, MockHardware};
    use crate::hal::PulsePin;
    use embassy_futures::block_on;
    use embassy_time::Duration;

    fn quick_config() -> Config {
        Config {
            sleep_ticks: 2,
            ..Config::new()
        }
    }

    fn scheduler(hw: MockHardware) -> Scheduler<MockHardware> {
        Scheduler::new(hw, quick_config())
    }

    #[test]
    fn one_cycle_is_eleven_transitions_past_setup() {
        let mut s = scheduler(MockHardware::new());
        assert_eq!(s.state(), Some(State::Setup));

        assert_eq!(block_on(s.step()), State::ClearOutput);

        let visited: Vec<State> = (0..11).map(|_| block_on(s.step())).collect();
        assert_eq!(
            visited,
            [
                State::GetAnemometer,
                State::GetPluviometer,
                State::GetWindVane,
                State::GetTemperature,
                State::GetPh,
                State::GetMoisture1,
                State::GetMoisture2,
                State::GetMoisture3,
                State::SendData,
                State::SleepMode,
                State::ClearOutput,
            ]
        );
    }

    #[test]
    fn setup_runs_only_once() {
        let mut s = scheduler(MockHardware::new());

        for _ in 0..(1 + 2 * 11) {
            block_on(s.step());
        }

        let inits = s.hardware().calls().iter().filter(|c| **c == Call::Init).count();
        assert_eq!(inits, 1);
        assert_eq!(s.state(), Some(State::ClearOutput));
    }

    #[test]
    fn corrupt_state_falls_back_to_sleep() {
        let mut s = scheduler(MockHardware::new());
        s.set_raw_state(0xa5);
        assert_eq!(s.state(), None);

        assert_eq!(block_on(s.step()), State::SleepMode);
        assert!(s.hardware().calls().is_empty());

        assert_eq!(block_on(s.step()), State::ClearOutput);
        assert_eq!(s.hardware().timer_fires(), 2);
    }

    #[test]
    fn every_field_is_written_once_per_cycle() {
        let mut s = scheduler(MockHardware::new());
        block_on(s.step());
        block_on(s.step());
        for field in Field::ALL {
            assert!(!s.context().record.is_written(field));
            assert_eq!(s.context().record.get(field), Measurement::NEUTRAL);
        }

        while s.state() != Some(State::SendData) {
            block_on(s.step());
        }

        assert!(s.context().record.is_complete());
    }

    #[test]
    fn each_state_reads_its_own_sensor() {
        let mut hw = MockHardware::new();
        hw.script_edges(9);
        hw.script_edges(4);
        for raw in [100, 200] {
            hw.script_conversion(raw);
        }
        for _ in 0..10 {
            hw.script_conversion(50);
        }
        for raw in [600, 700, 800] {
            hw.script_conversion(raw);
        }
        let mut s = scheduler(hw);

        while s.state() != Some(State::SendData) {
            block_on(s.step());
        }

        let record = &s.context().record;
        assert_eq!(record.get(Field::WindSpeed), Measurement::Value(9.0));
        assert_eq!(record.get(Field::RainQuantity), Measurement::Value(4.0));
        assert_eq!(record.get(Field::WindDirection), Measurement::Value(100.0));
        assert_eq!(record.get(Field::SoilTemperature), Measurement::Value(200.0));
        assert_eq!(record.get(Field::SoilPh), Measurement::Value(300.0));
        assert_eq!(record.get(Field::SoilMoisture1), Measurement::Value(600.0));
        assert_eq!(record.get(Field::SoilMoisture2), Measurement::Value(700.0));
        assert_eq!(record.get(Field::SoilMoisture3), Measurement::Value(800.0));
    }

    #[test]
    fn disconnected_anemometer_and_ph_probe() {
        let mut hw = MockHardware::new();
        hw.set_default_conversion(37);
        let mut s = scheduler(hw);

        // Setup through SleepMode
        for _ in 0..12 {
            block_on(s.step());
        }

        let record = frame::decode(s.hardware().sent(), ErrorEncoding::Tagged).unwrap();
        assert_eq!(record.get(Field::WindSpeed), Measurement::Value(0.0));
        assert_eq!(record.get(Field::SoilPh), Measurement::Value(6.0 * 37.0));
        assert_eq!(s.state(), Some(State::ClearOutput));
    }

    #[test]
    fn miswired_build_reports_errors_without_stopping() {
        let config = Config {
            pins: PinMap {
                anemometer: 7,
                soil_ph: 1,
                ..PinMap::new()
            },
            ..quick_config()
        };
        let mut s = Scheduler::new(MockHardware::new(), config);

        for _ in 0..12 {
            block_on(s.step());
        }

        let record = frame::decode(s.hardware().sent(), ErrorEncoding::Tagged).unwrap();
        assert_eq!(record.get(Field::WindSpeed), Measurement::UnsupportedPin);
        assert_eq!(record.get(Field::SoilPh), Measurement::UnsupportedChannel);
        assert_eq!(record.get(Field::RainQuantity), Measurement::Value(0.0));
        assert!(!s.hardware().calls().contains(&Call::EnableEdge(PulsePin::Anemometer)));
    }

    #[test]
    fn each_cycle_sends_one_frame_then_sleeps() {
        let mut s = scheduler(MockHardware::new());

        for _ in 0..(1 + 3 * 11) {
            block_on(s.step());
        }

        assert_eq!(s.hardware().sent().len(), 3 * FRAME_LEN);
        let periodic = s
            .hardware()
            .calls()
            .iter()
            .filter(|c| **c == Call::ArmPeriodic(Duration::from_millis(7_500)))
            .count();
        assert_eq!(periodic, 3);
    }
}
