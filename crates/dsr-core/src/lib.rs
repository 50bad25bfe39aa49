//! Core types, constants, and wire formats for the DSR source-routing
//! codec.
//!
//! This crate defines the protocol newtypes, the opaque packet handle,
//! the alignment-padded option TLV encoding, and the fixed/routing header
//! wire formats consumed by the correlation buffers in `dsr-transport`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod constants;
pub mod error;
pub mod header;
pub mod option;
pub mod types;

pub use constants::MessageType;
pub use error::WireError;
pub use header::{FixedHeader, RoutingHeader};
pub use option::field::OptionField;
pub use option::{Alignment, RoutingOption, calculate_pad};
pub use types::{AckId, NodeAddress, Packet, PacketUid};
