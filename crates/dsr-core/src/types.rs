//! Newtype wrappers for protocol scalar fields and the opaque packet handle.
//!
//! These types provide type safety, preventing accidental mixing of node
//! addresses, acknowledgment ids, and packet uids that share the same
//! underlying integer representation.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
#[cfg(feature = "std")]
use core::sync::atomic::{AtomicU64, Ordering};

/// A 16-bit protocol node identifier, big-endian on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct NodeAddress(pub(crate) u16);

impl NodeAddress {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// The raw 16-bit identifier.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Wire representation (network byte order).
    #[must_use]
    pub const fn to_be_bytes(&self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeAddress({})", self.0)
    }
}

/// A 16-bit network-acknowledgment request identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct AckId(pub(crate) u16);

impl AckId {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for AckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AckId({})", self.0)
    }
}

/// A process-local unique identifier for an in-flight packet handle.
///
/// Uids never repeat within a process; they are the packet-identity half
/// of the passive buffer's correlation key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct PacketUid(pub(crate) u64);

impl PacketUid {
    pub const fn new(uid: u64) -> Self {
        Self(uid)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PacketUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PacketUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PacketUid({})", self.0)
    }
}

#[cfg(feature = "std")]
static NEXT_PACKET_UID: AtomicU64 = AtomicU64::new(1);

/// The opaque payload handle carried through the correlation buffers.
///
/// Equality is by uid: two handles compare equal only when they refer to
/// the same in-flight packet, regardless of payload contents. Without the
/// `std` feature the process-wide uid counter is unavailable (it needs a
/// 64-bit atomic); callers allocate uids themselves via [`Packet::with_uid`].
#[derive(Clone)]
#[must_use]
pub struct Packet {
    uid: PacketUid,
    payload: Vec<u8>,
}

impl Packet {
    /// Wrap a payload with a fresh process-unique uid.
    #[cfg(feature = "std")]
    pub fn new(payload: Vec<u8>) -> Self {
        let uid = PacketUid(NEXT_PACKET_UID.fetch_add(1, Ordering::Relaxed));
        Self { uid, payload }
    }

    /// Wrap a payload with an explicit uid (deterministic tests, replay,
    /// no_std callers).
    pub const fn with_uid(uid: PacketUid, payload: Vec<u8>) -> Self {
        Self { uid, payload }
    }

    pub fn uid(&self) -> PacketUid {
        self.uid
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the handle, yielding the payload bytes.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Packet {}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet(uid={}, len={})", self.uid, self.payload.len())
    }
}
