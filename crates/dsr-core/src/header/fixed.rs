//! The protocol's non-extensible 8-byte frame.
//!
//! Wire layout (multi-byte fields big-endian):
//!
//! ```text
//! offset 0: next_header   (1 byte)
//! offset 1: message_type  (1 byte)
//! offset 2: source        (2 bytes)
//! offset 4: destination   (2 bytes)
//! offset 6: payload_len   (2 bytes)
//! ```

extern crate alloc;

use alloc::vec::Vec;

use crate::constants::FIXED_HEADER_SIZE;
use crate::error::WireError;
use crate::types::NodeAddress;

/// The fixed header frame. Serialized size is always 8 bytes.
///
/// `message_type` is kept as a raw byte: the decoder is permissive and
/// unknown values ride through unchanged (see
/// [`MessageType`](crate::constants::MessageType) for the assigned ones).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FixedHeader {
    pub next_header: u8,
    pub message_type: u8,
    pub source: NodeAddress,
    pub destination: NodeAddress,
    pub payload_len: u16,
}

impl FixedHeader {
    pub const SERIALIZED_SIZE: usize = FIXED_HEADER_SIZE;

    /// Append the 8-byte wire image to `out`.
    pub fn serialize_into(&self, out: &mut Vec<u8>) {
        out.push(self.next_header);
        out.push(self.message_type);
        out.extend_from_slice(&self.source.to_be_bytes());
        out.extend_from_slice(&self.destination.to_be_bytes());
        out.extend_from_slice(&self.payload_len.to_be_bytes());
    }

    /// Parse the fixed frame from the front of `raw`.
    pub fn parse(raw: &[u8]) -> Result<Self, WireError> {
        if raw.len() < FIXED_HEADER_SIZE {
            return Err(WireError::TooShort {
                min: FIXED_HEADER_SIZE,
                actual: raw.len(),
            });
        }
        Ok(Self {
            next_header: raw[0],
            message_type: raw[1],
            source: NodeAddress::from_be_bytes([raw[2], raw[3]]),
            destination: NodeAddress::from_be_bytes([raw[4], raw[5]]),
            payload_len: u16::from_be_bytes([raw[6], raw[7]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MessageType;

    #[test]
    fn test_wire_image() {
        let header = FixedHeader {
            next_header: 17,
            message_type: MessageType::WithOptions as u8,
            source: NodeAddress::new(0x0102),
            destination: NodeAddress::new(0x0304),
            payload_len: 12,
        };

        let mut out = Vec::new();
        header.serialize_into(&mut out);
        assert_eq!(out, hex::decode("110201020304000c").unwrap());
        assert_eq!(out.len(), FixedHeader::SERIALIZED_SIZE);
    }

    #[test]
    fn test_parse_round_trip() {
        let header = FixedHeader {
            next_header: 6,
            message_type: 1,
            source: NodeAddress::new(0xFFFE),
            destination: NodeAddress::new(1),
            payload_len: 0xABCD,
        };

        let mut out = Vec::new();
        header.serialize_into(&mut out);
        assert_eq!(FixedHeader::parse(&out).unwrap(), header);
    }

    #[test]
    fn test_parse_ignores_trailing_bytes() {
        let mut raw = hex::decode("110201020304000c").unwrap();
        raw.extend_from_slice(&[0xDE, 0xAD]);
        let header = FixedHeader::parse(&raw).unwrap();
        assert_eq!(header.payload_len, 12);
    }

    #[test]
    fn test_parse_too_short() {
        let err = FixedHeader::parse(&[0u8; 7]).unwrap_err();
        assert_eq!(err, WireError::TooShort { min: 8, actual: 7 });
    }

    #[test]
    fn test_unknown_message_type_rides_through() {
        let raw = hex::decode("00ff000000000000").unwrap();
        let header = FixedHeader::parse(&raw).unwrap();
        assert_eq!(header.message_type, 0xFF);
        assert_eq!(MessageType::from_u8(header.message_type), None);
    }
}
