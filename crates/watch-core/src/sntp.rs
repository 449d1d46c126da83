//! SNTPv3 client packets.

use crate::sync::TimeReading;

pub const PORT: u16 = 123;
pub const PACKET_LEN: usize = 48;

/// Seconds from 1900-01-01 (NTP era 0) to 1970-01-01.
pub const NTP_UNIX_OFFSET: i64 = 2_208_988_800;

const VERSION: u8 = 3;
const MODE_CLIENT: u8 = 3;
const MODE_SERVER: u8 = 4;
const TRANSMIT_SECONDS: usize = 40;

/// Client request: everything zero except LI/VN/mode.
pub const fn request() -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];
    packet[0] = (VERSION << 3) | MODE_CLIENT;
    packet
}

/// Reads the server transmit timestamp as a Unix epoch.
///
/// Replies that are short, not from a server, a kiss-o'-death (stratum 0) or
/// with an alarm leap indicator come back as [`TimeReading::INVALID`].
pub fn parse_reply(reply: &[u8]) -> TimeReading {
    if reply.len() < PACKET_LEN {
        return TimeReading::INVALID;
    }

    let leap = reply[0] >> 6;
    let mode = reply[0] & 0x07;
    let stratum = reply[1];
    if mode != MODE_SERVER || stratum == 0 || leap == 3 {
        return TimeReading::INVALID;
    }

    let seconds = u32::from_be_bytes([
        reply[TRANSMIT_SECONDS],
        reply[TRANSMIT_SECONDS + 1],
        reply[TRANSMIT_SECONDS + 2],
        reply[TRANSMIT_SECONDS + 3],
    ]);
    if seconds == 0 {
        return TimeReading::INVALID;
    }

    TimeReading::new(i64::from(seconds) - NTP_UNIX_OFFSET, true)
}
