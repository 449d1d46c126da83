#![cfg_attr(not(test), no_std)]

//! SH1106 (128x64 monochrome OLED, I2C) driver primitives.

mod framebuffer;
pub mod protocol;

#[cfg(feature = "embedded-graphics")]
mod graphics;

pub use framebuffer::FrameBuffer;

use embedded_hal::i2c::I2c;

/// Panel mounting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Orientation {
    Normal,
    /// Panel mounted upside down.
    Rotated180,
}

/// Driver configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// 7-bit I2C address.
    pub address: u8,
    pub orientation: Orientation,
    /// First visible RAM column.
    pub column_offset: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: protocol::DEFAULT_ADDRESS,
            orientation: Orientation::Normal,
            column_offset: protocol::DEFAULT_COLUMN_OFFSET,
        }
    }
}

/// Driver errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error<I2cErr> {
    /// Bus transfer failed.
    I2c(I2cErr),
    /// Input parameters are outside supported bounds.
    InvalidInput,
}

pub type DriverResult<I2cErr> = Result<(), Error<I2cErr>>;

/// SH1106 driver.
#[derive(Debug)]
pub struct Sh1106<I2C> {
    i2c: I2C,
    config: Config,
    display_on: bool,
}

impl<I2C> Sh1106<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, config: Config) -> Self {
        Self {
            i2c,
            config,
            display_on: false,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    /// Releases the owned bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write(&mut self, bytes: &[u8]) -> DriverResult<I2C::Error> {
        self.i2c.write(self.config.address, bytes).map_err(Error::I2c)
    }

    /// Sends the register setup and applies the configured orientation.
    /// The panel stays dark until [`Self::display_on`].
    pub fn init(&mut self) -> DriverResult<I2C::Error> {
        self.write(&protocol::INIT_SEQUENCE)?;
        self.display_on = false;
        self.set_orientation(self.config.orientation)
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> DriverResult<I2C::Error> {
        self.config.orientation = orientation;
        let packet = protocol::orientation_packet(orientation == Orientation::Rotated180);
        self.write(&packet)
    }

    pub fn display_on(&mut self) -> DriverResult<I2C::Error> {
        self.write(&protocol::command(protocol::DISPLAY_ON))?;
        self.display_on = true;
        Ok(())
    }

    /// Panel goes dark; RAM content is kept.
    pub fn display_off(&mut self) -> DriverResult<I2C::Error> {
        self.write(&protocol::command(protocol::DISPLAY_OFF))?;
        self.display_on = false;
        Ok(())
    }

    pub fn set_contrast(&mut self, level: u8) -> DriverResult<I2C::Error> {
        self.write(&protocol::contrast_packet(level))
    }

    /// Writes one page (0..8).
    pub fn write_page(
        &mut self,
        page: usize,
        data: &[u8; protocol::PAGE_BYTES],
    ) -> DriverResult<I2C::Error> {
        let address = protocol::page_address_packet(page, self.config.column_offset)
            .ok_or(Error::InvalidInput)?;

        self.write(&address)?;
        self.write(&protocol::page_data_packet(data))
    }

    /// Sends only the pages changed since the last flush.
    pub fn flush(&mut self, buffer: &mut FrameBuffer) -> DriverResult<I2C::Error> {
        for page in 0..protocol::PAGES {
            if !buffer.is_page_dirty(page) {
                continue;
            }
            let data = buffer.page(page).ok_or(Error::InvalidInput)?;
            self.write_page(page, data)?;
            buffer.mark_page_clean(page);
        }

        Ok(())
    }

    /// Sends every page regardless of dirty state.
    pub fn flush_full(&mut self, buffer: &mut FrameBuffer) -> DriverResult<I2C::Error> {
        buffer.mark_all_dirty();
        self.flush(buffer)
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    use super::*;

    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for operation in operations {
                if let Operation::Write(bytes) = operation {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    fn driver() -> Sh1106<RecordingBus> {
        Sh1106::new(RecordingBus::default(), Config::default())
    }

    #[test]
    fn init_sends_setup_then_orientation() {
        let mut oled = driver();
        oled.init().unwrap();

        let bus = oled.release();
        assert_eq!(bus.writes.len(), 2);
        assert_eq!(bus.writes[0].0, protocol::DEFAULT_ADDRESS);
        assert_eq!(bus.writes[0].1, protocol::INIT_SEQUENCE);
        assert_eq!(bus.writes[1].1, [0x00, 0xA1, 0xC8]);
    }

    #[test]
    fn power_commands_track_state() {
        let mut oled = driver();

        oled.display_on().unwrap();
        assert!(oled.is_display_on());
        oled.display_off().unwrap();
        assert!(!oled.is_display_on());

        let bus = oled.release();
        assert_eq!(bus.writes[0].1, [0x00, protocol::DISPLAY_ON]);
        assert_eq!(bus.writes[1].1, [0x00, protocol::DISPLAY_OFF]);
    }

    #[test]
    fn flush_sends_dirty_pages_only_once() {
        let mut oled = driver();
        let mut fb = FrameBuffer::new();

        oled.flush(&mut fb).unwrap();
        fb.set_pixel(10, 30, true);
        oled.flush(&mut fb).unwrap();
        oled.flush(&mut fb).unwrap();

        let bus = oled.release();
        // Eight pages on the first flush, one on the second, none on the third.
        assert_eq!(bus.writes.len(), 2 * 9);
        let (_, last_address) = &bus.writes[16];
        assert_eq!(last_address, &[0x00, 0xB3, 0x02, 0x10]);
        let (_, last_data) = &bus.writes[17];
        assert_eq!(last_data[0], protocol::CONTROL_DATA);
        assert_eq!(last_data[1 + 10], 1 << (30 % 8));
    }

    #[test]
    fn flush_full_resends_everything() {
        let mut oled = driver();
        let mut fb = FrameBuffer::new();

        oled.flush(&mut fb).unwrap();
        oled.flush_full(&mut fb).unwrap();

        assert_eq!(oled.release().writes.len(), 2 * 2 * protocol::PAGES);
    }

    #[test]
    fn bus_errors_propagate_and_keep_pages_dirty() {
        let mut oled = Sh1106::new(
            RecordingBus {
                fail: true,
                ..RecordingBus::default()
            },
            Config::default(),
        );
        let mut fb = FrameBuffer::new();

        assert_eq!(oled.flush(&mut fb), Err(Error::I2c(ErrorKind::Other)));
        assert!(fb.is_page_dirty(0));
    }

    #[test]
    fn invalid_page_is_rejected() {
        let mut oled = driver();
        assert_eq!(
            oled.write_page(protocol::PAGES, &[0; protocol::PAGE_BYTES]),
            Err(Error::InvalidInput)
        );
    }
}
