//! Status LEDs: the white side LED and the WS2812 pixel.

use embedded_hal::{digital::OutputPin, spi::SpiBus};
use watch_core::display::{IndicatorLight, RgbIndicator};

/// SPI clock that makes four SPI bits one WS2812 bit (1.25 us).
pub const WS2812_SPI_HZ: u32 = 3_200_000;

const BIT_ZERO: u8 = 0b1000;
const BIT_ONE: u8 = 0b1110;
const FRAME_BYTES: usize = 12;
/// Low time that latches the pixel, 100 us at the SPI clock above.
const RESET_BYTES: usize = 40;

/// Side LED wired between the supply and the pin.
#[derive(Debug)]
pub struct WhiteLed<P> {
    pin: P,
}

impl<P> WhiteLed<P>
where
    P: OutputPin,
{
    /// Takes the pin and switches the LED off.
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_high()?;
        Ok(Self { pin })
    }
}

impl<P> IndicatorLight for WhiteLed<P>
where
    P: OutputPin,
{
    type Error = P::Error;

    fn set_on(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn set_off(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

/// One WS2812 pixel clocked out on the MOSI line.
#[derive(Debug)]
pub struct Ws2812<SPI> {
    spi: SPI,
}

impl<SPI> Ws2812<SPI>
where
    SPI: SpiBus<u8>,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }
}

impl<SPI> RgbIndicator for Ws2812<SPI>
where
    SPI: SpiBus<u8>,
{
    type Error = SPI::Error;

    fn set_color(&mut self, red: u8, green: u8, blue: u8) -> Result<(), Self::Error> {
        self.spi.write(&encode_grb(red, green, blue))?;
        self.spi.write(&[0u8; RESET_BYTES])?;
        self.spi.flush()
    }
}

/// Pixel wire order is green, red, blue, most significant bit first; each
/// data bit becomes one nibble.
fn encode_grb(red: u8, green: u8, blue: u8) -> [u8; FRAME_BYTES] {
    let mut out = [0u8; FRAME_BYTES];
    for (channel, value) in [green, red, blue].into_iter().enumerate() {
        for pair in 0..4 {
            let high = (value >> (7 - pair * 2)) & 1;
            let low = (value >> (6 - pair * 2)) & 1;
            out[channel * 4 + pair] = (nibble(high) << 4) | nibble(low);
        }
    }
    out
}

#[inline]
fn nibble(bit: u8) -> u8 {
    if bit == 1 { BIT_ONE } else { BIT_ZERO }
}
