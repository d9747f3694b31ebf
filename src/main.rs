#![no_std]
#![no_main]

mod board;
mod config;
mod error;

use assign_resources::assign_resources;
use board::Board;
use config::Config;
use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::{adc, bind_interrupts, peripherals, Peri};
use smartvit_acquisition::Scheduler;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
});

// GPIO40-47 are ADC inputs 0-7 on the RP2350B
assign_resources! {
    pulse: PulseRes {
        anemometer: PIN_2,
        pluviometer: PIN_3,
    },
    analog: AnalogRes {
        adc: ADC,
        wind_vane: PIN_40,
        soil_temperature: PIN_43,
        soil_ph: PIN_44,
        soil_moisture_1: PIN_45,
        soil_moisture_2: PIN_46,
        soil_moisture_3: PIN_47,
    },
    serial: SerialRes {
        uart: UART0,
        tx: PIN_0,
        dma: DMA_CH0,
    }
}

static SCHEDULER: StaticCell<Scheduler<Board>> = StaticCell::new();

#[embassy_executor::main]
async fn main(s: Spawner) {
    let p = embassy_rp::init(Default::default());
    let r = split_resources! {p};

    let board = Board::build(r.pulse, r.analog, r.serial);
    let scheduler = SCHEDULER.init(Scheduler::new(board, Config::ACQUISITION));

    info!("node: starting acquisition");

    s.spawn(acquisition(scheduler)).expect("executor should be initialized")
}

#[embassy_executor::task]
async fn acquisition(scheduler: &'static mut Scheduler<Board>) {
    scheduler.run().await
}
