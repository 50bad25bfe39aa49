//! Self-describing option TLVs and alignment padding.
//!
//! Each option is encoded as `type(1) || length(1) || payload`, with two
//! reserved zero-payload filler kinds used purely for alignment:
//!
//! ```text
//! Pad1: [ PAD1 ]                       1 byte, no length octet
//! PadN: [ PADN, n-2, 0 x (n-2) ]       n bytes total, n >= 2
//! ```
//!
//! An option's alignment contract is relative to the start of the
//! *enclosing* header, not the option stream itself.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::constants::{OPTION_TYPE_PAD1, OPTION_TYPE_PADN};
use crate::error::WireError;

pub mod field;

/// Padding rule for a wire element: the element's start offset within the
/// enclosing stream, modulo `factor`, must equal `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Alignment {
    pub factor: u8,
    pub offset: u8,
}

impl Alignment {
    pub const fn new(factor: u8, offset: u8) -> Self {
        Self { factor, offset }
    }

    /// No alignment requirement.
    pub const fn none() -> Self {
        Self {
            factor: 1,
            offset: 0,
        }
    }
}

/// Compute the padding needed so an element starting at `position` (bytes
/// from the enclosing header's start) satisfies `alignment`.
///
/// The result is in `[0, factor)` and `(position + pad) % factor ==
/// offset % factor`. A factor of 0 or 1 means no requirement.
#[must_use]
pub fn calculate_pad(alignment: Alignment, position: usize) -> usize {
    if alignment.factor <= 1 {
        return 0;
    }
    let factor = alignment.factor as usize;
    let offset = alignment.offset as usize % factor;
    (offset + factor - position % factor) % factor
}

/// A single option: type tag, payload bytes, and the alignment contract
/// its start address must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct RoutingOption {
    pub option_type: u8,
    pub payload: Vec<u8>,
    pub alignment: Alignment,
}

impl RoutingOption {
    pub fn new(option_type: u8, payload: Vec<u8>, alignment: Alignment) -> Self {
        Self {
            option_type,
            payload,
            alignment,
        }
    }

    /// The 1-byte Pad1 filler.
    pub fn pad1() -> Self {
        Self {
            option_type: OPTION_TYPE_PAD1,
            payload: Vec::new(),
            alignment: Alignment::none(),
        }
    }

    /// The n-byte PadN filler (`n >= 2`): a length octet of `n - 2`
    /// followed by `n - 2` zero bytes.
    pub fn padn(n: usize) -> Self {
        debug_assert!(n >= 2, "PadN covers 2 or more bytes");
        Self {
            option_type: OPTION_TYPE_PADN,
            payload: vec![0u8; n - 2],
            alignment: Alignment::none(),
        }
    }

    /// Whether this is one of the two reserved filler kinds.
    #[must_use]
    pub fn is_padding(&self) -> bool {
        self.option_type == OPTION_TYPE_PAD1 || self.option_type == OPTION_TYPE_PADN
    }

    /// Encoded size in bytes.
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        if self.option_type == OPTION_TYPE_PAD1 {
            1
        } else {
            2 + self.payload.len()
        }
    }

    /// Append the encoded option to `out`.
    ///
    /// Fails with [`WireError::PayloadTooLong`] when the payload cannot be
    /// described by the single length octet.
    pub fn serialize_into(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        out.push(self.option_type);
        if self.option_type == OPTION_TYPE_PAD1 {
            return Ok(());
        }
        let len = self.payload.len();
        if len > u8::MAX as usize {
            return Err(WireError::PayloadTooLong {
                max: u8::MAX as usize,
                actual: len,
            });
        }
        out.push(len as u8);
        out.extend_from_slice(&self.payload);
        Ok(())
    }

    /// Decode one option from the front of `src`, returning it together
    /// with the number of bytes consumed.
    ///
    /// `offset` is the option's position in the stream, used only for
    /// error reporting. Parsed options carry no alignment contract; the
    /// contract applies at append time, and any padding the producer
    /// inserted is decoded as explicit Pad1/PadN options.
    pub fn parse(src: &[u8], offset: usize) -> Result<(Self, usize), WireError> {
        let Some(&option_type) = src.first() else {
            return Err(WireError::TruncatedOption { offset });
        };
        if option_type == OPTION_TYPE_PAD1 {
            return Ok((Self::pad1(), 1));
        }
        let Some(&len) = src.get(1) else {
            return Err(WireError::TruncatedOption { offset });
        };
        let end = 2 + len as usize;
        let Some(payload) = src.get(2..end) else {
            return Err(WireError::TruncatedOption { offset });
        };
        Ok((
            Self {
                option_type,
                payload: payload.to_vec(),
                alignment: Alignment::none(),
            },
            end,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_pad_basic() {
        // Position already aligned: no pad.
        assert_eq!(calculate_pad(Alignment::new(4, 0), 8), 0);
        // One byte short of the next 4-boundary.
        assert_eq!(calculate_pad(Alignment::new(4, 0), 9), 3);
        assert_eq!(calculate_pad(Alignment::new(4, 0), 11), 1);
    }

    #[test]
    fn test_calculate_pad_with_offset() {
        // Element must start at 4n + 2.
        assert_eq!(calculate_pad(Alignment::new(4, 2), 8), 2);
        assert_eq!(calculate_pad(Alignment::new(4, 2), 10), 0);
        assert_eq!(calculate_pad(Alignment::new(4, 2), 13), 1);
    }

    #[test]
    fn test_calculate_pad_no_requirement() {
        assert_eq!(calculate_pad(Alignment::none(), 13), 0);
        assert_eq!(calculate_pad(Alignment::new(0, 0), 13), 0);
    }

    #[test]
    fn test_pad1_encoding() {
        let mut out = Vec::new();
        RoutingOption::pad1().serialize_into(&mut out).unwrap();
        assert_eq!(out, [OPTION_TYPE_PAD1]);
    }

    #[test]
    fn test_padn_encoding() {
        let mut out = Vec::new();
        RoutingOption::padn(5).serialize_into(&mut out).unwrap();
        assert_eq!(out, [OPTION_TYPE_PADN, 3, 0, 0, 0]);
        assert_eq!(RoutingOption::padn(5).serialized_size(), 5);

        // Smallest PadN: bare type + zero-length octet.
        let mut out = Vec::new();
        RoutingOption::padn(2).serialize_into(&mut out).unwrap();
        assert_eq!(out, [OPTION_TYPE_PADN, 0]);
    }

    #[test]
    fn test_option_encoding() {
        let opt = RoutingOption::new(96, vec![0xAA, 0xBB], Alignment::new(4, 0));
        assert_eq!(opt.serialized_size(), 4);
        let mut out = Vec::new();
        opt.serialize_into(&mut out).unwrap();
        assert_eq!(out, [96, 2, 0xAA, 0xBB]);
    }

    #[test]
    fn test_option_payload_too_long() {
        let opt = RoutingOption::new(96, vec![0; 256], Alignment::none());
        let mut out = Vec::new();
        let err = opt.serialize_into(&mut out).unwrap_err();
        assert_eq!(
            err,
            WireError::PayloadTooLong {
                max: 255,
                actual: 256
            }
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let opt = RoutingOption::new(96, vec![1, 2, 3], Alignment::none());
        let mut out = Vec::new();
        opt.serialize_into(&mut out).unwrap();

        let (parsed, used) = RoutingOption::parse(&out, 0).unwrap();
        assert_eq!(used, out.len());
        assert_eq!(parsed.option_type, 96);
        assert_eq!(parsed.payload, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_truncated() {
        assert_eq!(
            RoutingOption::parse(&[], 7).unwrap_err(),
            WireError::TruncatedOption { offset: 7 }
        );
        // Type byte but no length octet.
        assert!(RoutingOption::parse(&[96], 0).is_err());
        // Declared 4 payload bytes, only 2 present.
        assert!(RoutingOption::parse(&[96, 4, 1, 2], 0).is_err());
    }

    #[test]
    fn test_is_padding() {
        assert!(RoutingOption::pad1().is_padding());
        assert!(RoutingOption::padn(3).is_padding());
        assert!(!RoutingOption::new(96, vec![], Alignment::none()).is_padding());
    }
}
