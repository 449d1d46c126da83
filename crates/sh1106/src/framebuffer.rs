//! In-memory framebuffer in SH1106 page layout.

use core::convert::TryFrom;

use crate::protocol::{BUFFER_SIZE, HEIGHT, PAGE_BYTES, PAGES, WIDTH};

/// 1bpp framebuffer, one byte per column per page.
///
/// Bit `y % 8` of byte `(y / 8) * WIDTH + x` is pixel `(x, y)`. Pages touched
/// since the last flush are tracked so a small update only resends those.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_SIZE],
    dirty: u8,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Creates a dark framebuffer with every page marked dirty.
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; BUFFER_SIZE],
            dirty: 0xFF,
        }
    }

    pub fn bytes(&self) -> &[u8; BUFFER_SIZE] {
        &self.bytes
    }

    /// Clears to dark (`on = false`) or lit (`on = true`).
    pub fn clear(&mut self, on: bool) {
        self.bytes.fill(if on { 0xFF } else { 0x00 });
        self.dirty = 0xFF;
    }

    /// Returns `true` when the pixel is in bounds.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }

        let page = y / 8;
        let byte_index = page * PAGE_BYTES + x;
        let bit_mask = 1u8 << (y % 8);
        let before = self.bytes[byte_index];

        if on {
            self.bytes[byte_index] |= bit_mask;
        } else {
            self.bytes[byte_index] &= !bit_mask;
        }

        if self.bytes[byte_index] != before {
            self.dirty |= 1 << page;
        }
        true
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }

        let byte_index = (y / 8) * PAGE_BYTES + x;
        Some(self.bytes[byte_index] & (1u8 << (y % 8)) != 0)
    }

    /// Page payload for page 0..8.
    pub fn page(&self, page: usize) -> Option<&[u8; PAGE_BYTES]> {
        if page >= PAGES {
            return None;
        }

        let start = page * PAGE_BYTES;
        <&[u8; PAGE_BYTES]>::try_from(&self.bytes[start..start + PAGE_BYTES]).ok()
    }

    pub fn is_page_dirty(&self, page: usize) -> bool {
        page < PAGES && self.dirty & (1 << page) != 0
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty = 0xFF;
    }

    pub(crate) fn mark_page_clean(&mut self, page: usize) {
        if page < PAGES {
            self.dirty &= !(1 << page);
        }
    }
}
