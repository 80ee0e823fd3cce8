//! SPI datagram framing.
//!
//! Every datagram is five bytes. The host sends an address byte (bit 7 set for
//! a write) followed by four payload bytes; the chip answers with its status
//! byte followed by four payload bytes. Read data arrives one datagram late:
//! the payload returned for a read request belongs to the previous request.

use crate::registers::SpiStatus;

/// Length of one datagram in bytes.
pub const FRAME_LEN: usize = 5;

/// One SPI datagram.
pub type Frame = [u8; FRAME_LEN];

const WRITE_FLAG: u8 = 0x80;
const ADDRESS_MASK: u8 = 0x7F;

/// A parsed response datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    /// Status flags from the first byte.
    pub status: SpiStatus,
    /// Register payload, decoded by the caller with the register's codec.
    pub payload: [u8; 4],
}

/// Build a read request for `address`.
#[inline]
pub const fn build_read_frame(address: u8) -> Frame {
    [address & ADDRESS_MASK, 0, 0, 0, 0]
}

/// Build a write request carrying `payload` for `address`.
#[inline]
pub const fn build_write_frame(address: u8, payload: [u8; 4]) -> Frame {
    [
        WRITE_FLAG | (address & ADDRESS_MASK),
        payload[0],
        payload[1],
        payload[2],
        payload[3],
    ]
}

/// Split a response datagram into status and payload.
#[inline]
pub fn parse_response(frame: &Frame) -> Response {
    Response {
        status: SpiStatus::from_bits(frame[0]),
        payload: [frame[1], frame[2], frame[3], frame[4]],
    }
}
