//! The extensible option stream of a routing header.
//!
//! An [`OptionField`] is an ordered byte stream of concatenated options.
//! Appending an option first inserts whatever Pad1/PadN filler its
//! alignment contract requires, so every option except required leading
//! padding starts alignment-compliant. Serialization adds one trailing
//! filler so the enclosing header's total size lands on a 4-byte boundary.

extern crate alloc;

use alloc::vec::Vec;

use crate::constants::STREAM_ALIGNMENT;
use crate::error::WireError;
use crate::option::{RoutingOption, calculate_pad};

/// An ordered, append-only stream of serialized options.
///
/// Owns its raw byte buffer exclusively. `base_offset` is the stream's
/// start position within the enclosing header; alignment is computed
/// against the header start, not the stream's own start.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct OptionField {
    data: Vec<u8>,
    base_offset: usize,
}

impl OptionField {
    pub fn new(base_offset: usize) -> Self {
        Self {
            data: Vec::new(),
            base_offset,
        }
    }

    /// Size of the raw option bytes appended so far, excluding the
    /// trailing stream padding.
    #[must_use]
    pub fn raw_size(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn base_offset(&self) -> usize {
        self.base_offset
    }

    /// Padding needed after the current contents so an element with
    /// `alignment` starts compliant.
    fn pad_for(&self, alignment: crate::option::Alignment) -> usize {
        calculate_pad(alignment, self.data.len() + self.base_offset)
    }

    /// Append `option`, preceded by the Pad1/PadN filler its alignment
    /// contract requires.
    pub fn append_option(&mut self, option: &RoutingOption) -> Result<(), WireError> {
        let pad = self.pad_for(option.alignment);
        if pad == 1 {
            RoutingOption::pad1().serialize_into(&mut self.data)?;
        } else if pad > 1 {
            RoutingOption::padn(pad).serialize_into(&mut self.data)?;
        }
        option.serialize_into(&mut self.data)
    }

    /// Trailing padding that serialization will emit, recomputed per call.
    #[must_use]
    pub fn trailing_pad(&self) -> usize {
        self.pad_for(STREAM_ALIGNMENT)
    }

    /// Emitted size: raw bytes plus trailing stream padding.
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        self.data.len() + self.trailing_pad()
    }

    /// Write the raw option bytes followed by a single trailing
    /// Pad1/PadN filler.
    pub fn serialize_into(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        out.extend_from_slice(&self.data);
        let pad = self.trailing_pad();
        if pad == 1 {
            RoutingOption::pad1().serialize_into(out)?;
        } else if pad > 1 {
            RoutingOption::padn(pad).serialize_into(out)?;
        }
        Ok(())
    }

    /// Replace the stream contents with exactly `length` bytes from `src`.
    ///
    /// The declared length comes from the enclosing header's payload-length
    /// field; there is no self-describing terminator. Returns the bytes
    /// consumed, or [`WireError::TooShort`] when `src` cannot cover the
    /// declared length.
    pub fn deserialize(&mut self, src: &[u8], length: usize) -> Result<usize, WireError> {
        let Some(bytes) = src.get(..length) else {
            return Err(WireError::TooShort {
                min: length,
                actual: src.len(),
            });
        };
        self.data.clear();
        self.data.extend_from_slice(bytes);
        Ok(length)
    }

    /// Iterate over the decoded TLVs in the owned byte stream, padding
    /// fillers included.
    pub fn options(&self) -> OptionIter<'_> {
        OptionIter {
            data: &self.data,
            pos: 0,
        }
    }
}

/// Iterator over the options of an [`OptionField`].
///
/// Fuses after yielding a decode error.
pub struct OptionIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Iterator for OptionIter<'_> {
    type Item = Result<RoutingOption, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        match RoutingOption::parse(&self.data[self.pos..], self.pos) {
            Ok((option, used)) => {
                self.pos += used;
                Some(Ok(option))
            }
            Err(e) => {
                self.pos = self.data.len();
                Some(Err(e))
            }
        }
    }
}
