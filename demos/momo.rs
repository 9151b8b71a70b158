#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};

use embassy_executor::Spawner;
use embassy_rp::{
    bind_interrupts,
    gpio::{Input, Level, Output, Pull},
    i2c::{self, I2c},
    peripherals::PIO0,
    pio::{InterruptHandler, Pio},
    pio_programs::ws2812::{PioWs2812, PioWs2812Program},
};
use momo_keypad::{
    Error, Result,
    keyboard::{Keyboard, KeyboardConfig},
};
use ssd1306::{
    I2CDisplayInterface, Ssd1306,
    prelude::{DisplayConfig, DisplayRotation, DisplaySize128x64},
};
use {defmt_rtt as _, panic_probe as _};

// 4 columns × 3 rows, one LED per key.
const KEY_COUNT: usize = 12;
const COLUMN_COUNT: usize = 4;
const ROW_COUNT: usize = 3;

const CONFIG: KeyboardConfig<5> = KeyboardConfig::DEFAULT;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

// Nice trick: Two "mains" let's us use Results.
#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    let err = inner_main().await.unwrap_err();
    panic!("{err}");
}

async fn inner_main() -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // Status display: SSD1306 at 0x3C on I2C0 (SDA GPIO12, SCL GPIO13), mounted upside down.
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_13, p.PIN_12, i2c_config);
    let mut display = Ssd1306::new(
        I2CDisplayInterface::new(i2c),
        DisplaySize128x64,
        DisplayRotation::Rotate180,
    )
    .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;

    // Key matrix: columns drive GPIO5..=8, rows sense GPIO9..=11 (pulled low when idle).
    let columns = [
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
    ];
    let rows = [
        Input::new(p.PIN_9, Pull::Down),
        Input::new(p.PIN_10, Pull::Down),
        Input::new(p.PIN_11, Pull::Down),
    ];

    // Per-key LEDs: WS2812 chain on GPIO1 through PIO0.
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let leds = PioWs2812::<_, 0, KEY_COUNT, _>::new(&mut common, sm0, p.DMA_CH0, p.PIN_1, &program);

    defmt::info!("Momo keypad starting");
    let keyboard: Keyboard<_, _, _, _, _, KEY_COUNT, COLUMN_COUNT, ROW_COUNT, 5> =
        Keyboard::new(columns, rows, leds, display, embassy_time::Delay, &CONFIG);
    keyboard.run().await
}
