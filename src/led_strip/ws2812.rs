//! [`LedTransport`] for the RP2040 PIO WS2812 driver.

use embassy_rp::pio::Instance;
use embassy_rp::pio_programs::ws2812::{PioWs2812, RgbColorOrder};

use super::{LedTransport, Rgb};

impl<PIO, const SM: usize, const N: usize, ORDER> LedTransport<N>
    for PioWs2812<'_, PIO, SM, N, ORDER>
where
    PIO: Instance,
    ORDER: RgbColorOrder,
{
    async fn write(&mut self, colors: &[Rgb; N]) {
        // DMA clocks the colors out in strip order; returns once the transfer completes.
        PioWs2812::write(self, colors).await;
    }
}
