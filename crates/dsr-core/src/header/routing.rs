//! The routing header: fixed frame plus extensible option stream.
//!
//! Plain composition — the wire format is statically known, so there is
//! no header class hierarchy or runtime type registration. Total size is
//! always `8 + option stream size` and the option stream's base offset is
//! fixed at the size of the fixed frame.

extern crate alloc;

use alloc::vec::Vec;

use crate::constants::{FIXED_HEADER_SIZE, MessageType};
use crate::error::WireError;
use crate::header::fixed::FixedHeader;
use crate::option::RoutingOption;
use crate::option::field::OptionField;
use crate::types::NodeAddress;

/// A fixed header and its option stream, serialized as one wire unit.
///
/// `payload_len` on the embedded fixed header is refreshed from the
/// option stream at serialization time, so the producer contract — the
/// declared length equals the emitted stream size, trailing pad included
/// — holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct RoutingHeader {
    fixed: FixedHeader,
    options: OptionField,
}

impl RoutingHeader {
    pub fn new(next_header: u8, source: NodeAddress, destination: NodeAddress) -> Self {
        Self {
            fixed: FixedHeader {
                next_header,
                message_type: MessageType::WithOptions as u8,
                source,
                destination,
                payload_len: 0,
            },
            options: OptionField::new(FIXED_HEADER_SIZE),
        }
    }

    /// The embedded fixed frame. `payload_len` reflects the option stream
    /// as of the last serialization.
    #[must_use]
    pub fn fixed(&self) -> &FixedHeader {
        &self.fixed
    }

    #[must_use]
    pub fn options(&self) -> &OptionField {
        &self.options
    }

    /// Append an option, inserting alignment filler as required.
    pub fn add_option(&mut self, option: &RoutingOption) -> Result<(), WireError> {
        self.options.append_option(option)
    }

    /// Total wire size: fixed frame plus padded option stream.
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        FIXED_HEADER_SIZE + self.options.serialized_size()
    }

    /// Emit the full wire image.
    ///
    /// Fails with [`WireError::PayloadTooLong`] when the option stream
    /// cannot be described by the 16-bit payload-length field.
    pub fn serialize(&mut self) -> Result<Vec<u8>, WireError> {
        let stream_size = self.options.serialized_size();
        if stream_size > u16::MAX as usize {
            return Err(WireError::PayloadTooLong {
                max: u16::MAX as usize,
                actual: stream_size,
            });
        }
        self.fixed.payload_len = stream_size as u16;

        let mut out = Vec::with_capacity(FIXED_HEADER_SIZE + stream_size);
        self.fixed.serialize_into(&mut out);
        self.options.serialize_into(&mut out)?;
        Ok(out)
    }

    /// Parse a routing header from the front of `raw`, returning it with
    /// the total bytes consumed (`8 + payload_len`).
    ///
    /// The declared payload length is trusted as the option-stream size;
    /// the only check is that `raw` actually holds that many bytes.
    pub fn parse(raw: &[u8]) -> Result<(Self, usize), WireError> {
        let fixed = FixedHeader::parse(raw)?;
        let mut options = OptionField::new(FIXED_HEADER_SIZE);
        let consumed =
            options.deserialize(&raw[FIXED_HEADER_SIZE..], fixed.payload_len as usize)?;
        Ok((Self { fixed, options }, FIXED_HEADER_SIZE + consumed))
    }
}
