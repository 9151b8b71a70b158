//! [`StatusDisplay`] for the 128×64 SSD1306 OLED on I2C.

use embedded_hal::i2c::I2c;
use ssd1306::Ssd1306;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::{DisplaySize128x64, I2CInterface};

use super::StatusDisplay;
use crate::{Error, Result};

impl<I2C> StatusDisplay
    for Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>
where
    I2C: I2c,
{
    fn clear_buffer(&mut self) {
        Ssd1306::clear_buffer(self);
    }

    fn flush(&mut self) -> Result<()> {
        Ssd1306::flush(self).map_err(|_| Error::Display)
    }
}
