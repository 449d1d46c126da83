use embedded_graphics::{
    Drawable,
    geometry::{Point, Size},
    pixelcolor::BinaryColor,
    primitives::{Primitive, PrimitiveStyle, Rectangle, RoundedRectangle},
};
use embedded_hal::i2c::I2c;
use sh1106::{Config, FrameBuffer, Sh1106};
use u8g2_fonts::{
    FontRenderer, fonts,
    types::{FontColor, HorizontalAlignment, VerticalPosition},
};
use watch_core::display::{Align, Color, DisplaySurface, Font};

const SMALL_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_helvR08_tf>();
const NORMAL_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_helvR10_tf>();
const LARGE_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_helvR14_tf>();
const XLARGE_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_helvR24_tf>();

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DisplayError<I2cErr> {
    Driver(sh1106::Error<I2cErr>),
    /// Text contained a glyph missing from the active font.
    Text,
}

impl<I2cErr> From<sh1106::Error<I2cErr>> for DisplayError<I2cErr> {
    fn from(err: sh1106::Error<I2cErr>) -> Self {
        Self::Driver(err)
    }
}

/// Text-oriented surface over the SH1106 frame buffer.
#[derive(Debug)]
pub struct OledDisplay<I2C> {
    driver: Sh1106<I2C>,
    frame: FrameBuffer,
    font: Font,
    align: Align,
    color: Color,
}

impl<I2C> OledDisplay<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, config: Config) -> Self {
        Self {
            driver: Sh1106::new(i2c, config),
            frame: FrameBuffer::new(),
            font: Font::Normal,
            align: Align::Left,
            color: Color::White,
        }
    }

    /// Configures the controller, blanks the panel and turns it on.
    pub fn init(&mut self, brightness: u8) -> Result<(), DisplayError<I2C::Error>> {
        self.driver.init()?;
        self.frame.clear(false);
        self.driver.flush_full(&mut self.frame)?;
        self.driver.set_contrast(brightness)?;
        self.driver.display_on()?;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.driver.is_display_on()
    }

    fn renderer(&self) -> &'static FontRenderer {
        match self.font {
            Font::Small => &SMALL_FONT,
            Font::Normal => &NORMAL_FONT,
            Font::Large => &LARGE_FONT,
            Font::XLarge => &XLARGE_FONT,
        }
    }

    fn pen(&self) -> BinaryColor {
        binary(self.color)
    }
}

fn binary(color: Color) -> BinaryColor {
    match color {
        Color::White => BinaryColor::On,
        Color::Black => BinaryColor::Off,
    }
}

fn placement(align: Align) -> (VerticalPosition, HorizontalAlignment) {
    match align {
        Align::Left => (VerticalPosition::Top, HorizontalAlignment::Left),
        Align::Right => (VerticalPosition::Top, HorizontalAlignment::Right),
        Align::Center => (VerticalPosition::Top, HorizontalAlignment::Center),
        Align::CenterBoth => (VerticalPosition::Center, HorizontalAlignment::Center),
    }
}

impl<I2C> DisplaySurface for OledDisplay<I2C>
where
    I2C: I2c,
{
    type Error = DisplayError<I2C::Error>;

    fn clear(&mut self) {
        self.frame.clear(false);
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn set_alignment(&mut self, align: Align) {
        self.align = align;
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), Self::Error> {
        let (vertical, horizontal) = placement(self.align);
        let color = self.pen();
        self.renderer()
            .render_aligned(
                text,
                Point::new(x, y),
                vertical,
                horizontal,
                FontColor::Transparent(color),
                &mut self.frame,
            )
            .map(|_| ())
            .map_err(|_| DisplayError::Text)
    }

    fn draw_progress_bar(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        percent: u8,
    ) -> Result<(), Self::Error> {
        let color = self.pen();
        let radius = height / 2;
        let outline = Rectangle::new(Point::new(x, y), Size::new(width, height));
        let _ = RoundedRectangle::with_equal_corners(outline, Size::new(radius, radius))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.frame);

        let inner_width = width.saturating_sub(4) * u32::from(percent.min(100)) / 100;
        let inner_height = height.saturating_sub(4);
        if inner_width > 0 && inner_height > 0 {
            let inner = Rectangle::new(
                Point::new(x + 2, y + 2),
                Size::new(inner_width, inner_height),
            );
            let inner_radius = inner_height / 2;
            let _ = RoundedRectangle::with_equal_corners(
                inner,
                Size::new(inner_radius, inner_radius),
            )
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.frame);
        }

        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), Self::Error> {
        let _ = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(binary(color)))
            .draw(&mut self.frame);
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.driver.flush(&mut self.frame)?;
        Ok(())
    }

    fn power_on(&mut self) -> Result<(), Self::Error> {
        self.driver.display_on()?;
        Ok(())
    }

    fn power_off(&mut self) -> Result<(), Self::Error> {
        self.driver.display_off()?;
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), Self::Error> {
        self.driver.set_contrast(level)?;
        Ok(())
    }
}
