//! Protocol constants and enumerations for the DSR wire format.

use crate::option::Alignment;

/// Serialized size of the fixed (non-extensible) header frame.
pub const FIXED_HEADER_SIZE: usize = 8;

// Reserved filler option type tags
pub const OPTION_TYPE_PAD1: u8 = 1;
pub const OPTION_TYPE_PADN: u8 = 2;

/// Trailing alignment of the whole option stream: the total routing
/// header size must come out a multiple of 4.
pub const STREAM_ALIGNMENT: Alignment = Alignment {
    factor: 4,
    offset: 0,
};

/// Known message type values of the fixed header.
///
/// The decoder never rejects unknown values — `message_type` rides through
/// as a raw `u8` on the wire struct; this enum only names the assigned
/// values for producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Base frame carrying raw payload, no option stream.
    Base = 1,
    /// Frame whose payload is an extensible option stream.
    WithOptions = 2,
}

impl MessageType {
    #[must_use]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(MessageType::Base),
            2 => Some(MessageType::WithOptions),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_round_trip() {
        assert_eq!(MessageType::from_u8(1), Some(MessageType::Base));
        assert_eq!(MessageType::from_u8(2), Some(MessageType::WithOptions));
        assert_eq!(MessageType::from_u8(0), None);
        assert_eq!(MessageType::from_u8(3), None);
        assert_eq!(MessageType::WithOptions as u8, 2);
    }
}
