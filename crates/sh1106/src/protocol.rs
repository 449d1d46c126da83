//! I2C command set and packet layout for the SH1106.

/// Visible width in pixels.
pub const WIDTH: usize = 128;
/// Visible height in pixels.
pub const HEIGHT: usize = 64;
/// Eight pixel rows per page, one bit each.
pub const PAGES: usize = HEIGHT / 8;
/// Bytes in one page: one column byte per pixel column.
pub const PAGE_BYTES: usize = WIDTH;
pub const BUFFER_SIZE: usize = PAGE_BYTES * PAGES;

/// 7-bit bus address with SA0 low.
pub const DEFAULT_ADDRESS: u8 = 0x3C;
/// The controller has 132 columns of RAM; 128-pixel panels sit in the middle.
pub const DEFAULT_COLUMN_OFFSET: u8 = 2;

/// Control byte: the rest of the transfer is commands.
pub const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: the rest of the transfer is display RAM data.
pub const CONTROL_DATA: u8 = 0x40;

pub const DISPLAY_OFF: u8 = 0xAE;
pub const DISPLAY_ON: u8 = 0xAF;
pub const SET_CONTRAST: u8 = 0x81;
pub const SEGMENT_REMAP_NORMAL: u8 = 0xA0;
pub const SEGMENT_REMAP_REVERSED: u8 = 0xA1;
pub const COM_SCAN_INC: u8 = 0xC0;
pub const COM_SCAN_DEC: u8 = 0xC8;
pub const NORMAL_DISPLAY: u8 = 0xA6;
pub const RESUME_FROM_RAM: u8 = 0xA4;
pub const SET_PAGE_ADDRESS: u8 = 0xB0;
pub const SET_LOW_COLUMN: u8 = 0x00;
pub const SET_HIGH_COLUMN: u8 = 0x10;
pub const SET_START_LINE: u8 = 0x40;

/// Power-up register setup, display left off. Sent as one command transfer.
pub const INIT_SEQUENCE: [u8; 23] = [
    CONTROL_COMMAND,
    DISPLAY_OFF,
    0xD5, // clock divide / oscillator
    0x80,
    0xA8, // multiplex ratio
    (HEIGHT - 1) as u8,
    0xD3, // display offset
    0x00,
    SET_START_LINE,
    0xAD, // DC-DC control
    0x8B, // on
    SEGMENT_REMAP_REVERSED,
    COM_SCAN_DEC,
    0xDA, // COM pins
    0x12,
    SET_CONTRAST,
    0xCF,
    0xD9, // pre-charge period
    0x1F,
    0xDB, // VCOM deselect level
    0x40,
    RESUME_FROM_RAM,
    NORMAL_DISPLAY,
];

/// Single-command transfer.
#[inline]
pub const fn command(cmd: u8) -> [u8; 2] {
    [CONTROL_COMMAND, cmd]
}

/// Contrast is a two-byte command.
#[inline]
pub const fn contrast_packet(level: u8) -> [u8; 3] {
    [CONTROL_COMMAND, SET_CONTRAST, level]
}

/// Orientation commands: segment remap and COM scan direction.
#[inline]
pub const fn orientation_packet(rotated: bool) -> [u8; 3] {
    if rotated {
        [CONTROL_COMMAND, SEGMENT_REMAP_NORMAL, COM_SCAN_INC]
    } else {
        [CONTROL_COMMAND, SEGMENT_REMAP_REVERSED, COM_SCAN_DEC]
    }
}

/// Points the RAM write cursor at column 0 of `page`.
///
/// Returns `None` for pages past the panel.
#[inline]
pub fn page_address_packet(page: usize, column_offset: u8) -> Option<[u8; 4]> {
    if page >= PAGES {
        return None;
    }

    Some([
        CONTROL_COMMAND,
        SET_PAGE_ADDRESS | page as u8,
        SET_LOW_COLUMN | (column_offset & 0x0F),
        SET_HIGH_COLUMN | (column_offset >> 4),
    ])
}

/// Data transfer for one page.
#[inline]
pub fn page_data_packet(data: &[u8; PAGE_BYTES]) -> [u8; PAGE_BYTES + 1] {
    let mut packet = [0u8; PAGE_BYTES + 1];
    packet[0] = CONTROL_DATA;
    packet[1..].copy_from_slice(data);
    packet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_sequence_is_a_command_stream_that_keeps_the_panel_off() {
        assert_eq!(INIT_SEQUENCE[0], CONTROL_COMMAND);
        assert_eq!(INIT_SEQUENCE[1], DISPLAY_OFF);
        assert!(!INIT_SEQUENCE.contains(&DISPLAY_ON));
    }

    #[test]
    fn page_address_includes_column_offset() {
        assert_eq!(
            page_address_packet(0, DEFAULT_COLUMN_OFFSET),
            Some([0x00, 0xB0, 0x02, 0x10])
        );
        assert_eq!(page_address_packet(7, 0x12), Some([0x00, 0xB7, 0x02, 0x11]));
    }

    #[test]
    fn page_past_the_panel_is_rejected() {
        assert_eq!(page_address_packet(PAGES, 0), None);
    }

    #[test]
    fn page_data_is_prefixed_with_data_control_byte() {
        let mut data = [0u8; PAGE_BYTES];
        data[0] = 0xAA;
        data[PAGE_BYTES - 1] = 0x55;

        let packet = page_data_packet(&data);
        assert_eq!(packet[0], CONTROL_DATA);
        assert_eq!(packet[1], 0xAA);
        assert_eq!(packet[PAGE_BYTES], 0x55);
    }

    #[test]
    fn contrast_and_orientation_packets() {
        assert_eq!(contrast_packet(0x7F), [0x00, 0x81, 0x7F]);
        assert_eq!(orientation_packet(false), [0x00, 0xA1, 0xC8]);
        assert_eq!(orientation_packet(true), [0x00, 0xA0, 0xC0]);
    }
}
