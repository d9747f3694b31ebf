//! Scripted stand-in for the board, used by the unit tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use embassy_time::Duration;

use super::{AnalogChannel, Hardware, Interrupt, PulsePin};

/// Every HAL call, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Init,
    EnableEdge(PulsePin),
    DisableEdge(PulsePin),
    ArmWindow(Duration),
    ArmPeriodic(Duration),
    DisarmTimer,
    SelectChannel(AnalogChannel),
    EnableAdc,
    StartConversion,
    DisableAdc,
    EnableTx,
    DisableTx,
    LoadTx(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerMode {
    Off,
    OneShot,
    Periodic,
}

pub struct MockHardware {
    calls: Vec<Call>,
    injected: VecDeque<Interrupt>,
    edge_script: VecDeque<u32>,
    pending_edges: u32,
    edge_enabled: Option<PulsePin>,
    timer: TimerMode,
    timer_fires: u32,
    adc_enabled: bool,
    selected: Option<AnalogChannel>,
    converting: bool,
    conversions: VecDeque<u16>,
    default_conversion: u16,
    result: u16,
    tx_enabled: bool,
    tx_busy: bool,
    sent: Vec<u8>,
    suspensions: u32,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            injected: VecDeque::new(),
            edge_script: VecDeque::new(),
            pending_edges: 0,
            edge_enabled: None,
            timer: TimerMode::Off,
            timer_fires: 0,
            adc_enabled: false,
            selected: None,
            converting: false,
            conversions: VecDeque::new(),
            default_conversion: 0,
            result: 0,
            tx_enabled: false,
            tx_busy: false,
            sent: Vec::new(),
            suspensions: 0,
        }
    }

    /// Delivers `irq` on a coming suspension, ahead of anything scripted.
    pub fn inject(&mut self, irq: Interrupt) {
        self.injected.push_back(irq);
    }

    /// Edges produced during the next pulse window; unscripted windows see none.
    pub fn script_edges(&mut self, edges: u32) {
        self.edge_script.push_back(edges);
    }

    /// Result of the next conversion; unscripted conversions use the default.
    pub fn script_conversion(&mut self, raw: u16) {
        self.conversions.push_back(raw);
    }

    pub fn set_default_conversion(&mut self, raw: u16) {
        self.default_conversion = raw;
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    pub fn timer_fires(&self) -> u32 {
        self.timer_fires
    }

    pub fn suspensions(&self) -> u32 {
        self.suspensions
    }

    pub fn edge_enabled(&self) -> Option<PulsePin> {
        self.edge_enabled
    }

    pub fn adc_enabled(&self) -> bool {
        self.adc_enabled
    }

    pub fn tx_enabled(&self) -> bool {
        self.tx_enabled
    }

    pub fn timer_armed(&self) -> bool {
        self.timer != TimerMode::Off
    }
}

impl Hardware for MockHardware {
    fn init(&mut self) {
        self.calls.push(Call::Init);
    }

    fn enable_edge_interrupt(&mut self, pin: PulsePin) {
        self.calls.push(Call::EnableEdge(pin));
        self.edge_enabled = Some(pin);
        self.pending_edges = self.edge_script.pop_front().unwrap_or(0);
    }

    fn disable_edge_interrupt(&mut self, pin: PulsePin) {
        self.calls.push(Call::DisableEdge(pin));
        if self.edge_enabled == Some(pin) {
            self.edge_enabled = None;
            self.pending_edges = 0;
        }
    }

    fn arm_window(&mut self, window: Duration) {
        self.calls.push(Call::ArmWindow(window));
        self.timer = TimerMode::OneShot;
    }

    fn arm_periodic(&mut self, period: Duration) {
        self.calls.push(Call::ArmPeriodic(period));
        self.timer = TimerMode::Periodic;
    }

    fn disarm_timer(&mut self) {
        self.calls.push(Call::DisarmTimer);
        self.timer = TimerMode::Off;
    }

    fn select_channel(&mut self, channel: AnalogChannel) {
        self.calls.push(Call::SelectChannel(channel));
        self.selected = Some(channel);
    }

    fn enable_adc(&mut self) {
        self.calls.push(Call::EnableAdc);
        self.adc_enabled = true;
    }

    fn start_conversion(&mut self) {
        self.calls.push(Call::StartConversion);
        assert!(self.adc_enabled, "conversion started with the converter off");
        assert!(self.selected.is_some(), "conversion started with no channel selected");
        self.converting = true;
    }

    fn conversion_result(&mut self) -> u16 {
        self.result
    }

    fn disable_adc(&mut self) {
        self.calls.push(Call::DisableAdc);
        self.adc_enabled = false;
        self.converting = false;
    }

    fn enable_tx_interrupt(&mut self) {
        self.calls.push(Call::EnableTx);
        self.tx_enabled = true;
    }

    fn disable_tx_interrupt(&mut self) {
        self.calls.push(Call::DisableTx);
        self.tx_enabled = false;
    }

    fn load_tx(&mut self, byte: u8) {
        self.calls.push(Call::LoadTx(byte));
        assert!(!self.tx_busy, "byte {:#04x} loaded before the previous one drained", byte);
        self.sent.push(byte);
        self.tx_busy = true;
    }

    async fn suspend(&mut self) -> Interrupt {
        self.suspensions += 1;

        if let Some(irq) = self.injected.pop_front() {
            return irq;
        }

        if let Some(pin) = self.edge_enabled {
            if self.pending_edges > 0 {
                self.pending_edges -= 1;
                return Interrupt::RisingEdge(pin);
            }
        }

        if self.converting {
            self.converting = false;
            self.result = self.conversions.pop_front().unwrap_or(self.default_conversion);
            return Interrupt::ConversionComplete;
        }

        if self.tx_enabled {
            self.tx_busy = false;
            return Interrupt::TxReady;
        }

        match self.timer {
            TimerMode::OneShot => {
                self.timer = TimerMode::Off;
                self.timer_fires += 1;
                Interrupt::Timer
            }
            TimerMode::Periodic => {
                self.timer_fires += 1;
                Interrupt::Timer
            }
            TimerMode::Off => panic!("suspended with no wake source enabled, the node would never resume"),
        }
    }
}
