//! Passive buffer: packets overheard promiscuously, awaiting evidence
//! that a neighbor forwarded them.
//!
//! Entries are keyed by the 7-tuple (packet uid, source, destination,
//! next hop, identification, fragment offset, segments left). The same
//! packet overheard one hop further along its path carries a
//! segments-left value one lower; both duplicate suppression at enqueue
//! and the consuming match in [`PassiveBuffer::all_equal`] apply that
//! off-by-one rule.
//!
//! Unlike the maintenance buffer, every involuntary removal — capacity
//! eviction, expiry, link invalidation — is reported through the drop
//! notification hook so the routing layer can react to the loss.

use std::collections::VecDeque;
use std::fmt;

use dsr_core::{NodeAddress, Packet};

use crate::config::PassiveSection;

/// Why a passive entry was removed without being matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Evicted oldest-first to admit a new entry at capacity.
    CapacityEvicted,
    /// Deadline passed before any confirming observation.
    Expired,
    /// Removed by a caller-invoked link invalidation.
    LinkBroken,
}

/// Callback invoked for each involuntarily dropped entry.
pub type DropNotify = Box<dyn FnMut(&PassiveEntry, DropReason)>;

/// A promiscuously overheard packet awaiting forwarding confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PassiveEntry {
    packet: Packet,
    source: NodeAddress,
    destination: NodeAddress,
    next_hop: NodeAddress,
    identification: u16,
    fragment_offset: u16,
    segments_left: u8,
    /// Absolute virtual-time deadline, stamped at enqueue.
    expires_at: u64,
}

impl PassiveEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        packet: Packet,
        source: NodeAddress,
        destination: NodeAddress,
        next_hop: NodeAddress,
        identification: u16,
        fragment_offset: u16,
        segments_left: u8,
    ) -> Self {
        Self {
            packet,
            source,
            destination,
            next_hop,
            identification,
            fragment_offset,
            segments_left,
            expires_at: 0,
        }
    }

    #[must_use]
    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    #[must_use]
    pub fn into_packet(self) -> Packet {
        self.packet
    }

    pub fn source(&self) -> NodeAddress {
        self.source
    }

    pub fn destination(&self) -> NodeAddress {
        self.destination
    }

    pub fn next_hop(&self) -> NodeAddress {
        self.next_hop
    }

    #[must_use]
    pub fn identification(&self) -> u16 {
        self.identification
    }

    #[must_use]
    pub fn fragment_offset(&self) -> u16 {
        self.fragment_offset
    }

    #[must_use]
    pub fn segments_left(&self) -> u8 {
        self.segments_left
    }

    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at
    }

    /// Key fields other than segments-left.
    fn same_flow(&self, other: &Self) -> bool {
        self.packet.uid() == other.packet.uid()
            && self.source == other.source
            && self.destination == other.destination
            && self.next_hop == other.next_hop
            && self.identification == other.identification
            && self.fragment_offset == other.fragment_offset
    }

    /// `other` is the same packet observed one hop further along.
    fn forwarded_once(&self, other: &Self) -> bool {
        self.same_flow(other) && other.segments_left.checked_add(1) == Some(self.segments_left)
    }
}

/// FIFO of overheard packets with capacity eviction, expiry purging, and
/// drop notification.
#[must_use]
pub struct PassiveBuffer {
    entries: VecDeque<PassiveEntry>,
    max_len: usize,
    timeout: u64,
    drop_notify: Option<DropNotify>,
}

impl fmt::Debug for PassiveBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassiveBuffer")
            .field("entries", &self.entries)
            .field("max_len", &self.max_len)
            .field("timeout", &self.timeout)
            .field("drop_notify", &self.drop_notify.is_some())
            .finish()
    }
}

impl PassiveBuffer {
    pub fn new(max_len: usize, timeout: u64) -> Self {
        Self {
            entries: VecDeque::new(),
            max_len,
            timeout,
            drop_notify: None,
        }
    }

    pub fn from_config(config: &PassiveSection) -> Self {
        Self::new(config.max_len, config.timeout_ms)
    }

    /// Install the hook invoked for every involuntarily dropped entry.
    pub fn set_drop_notify(&mut self, notify: DropNotify) {
        self.drop_notify = Some(notify);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len;
    }

    #[must_use]
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: u64) {
        self.timeout = timeout;
    }

    /// Admit an overheard packet.
    ///
    /// Returns `false` when the buffer already holds the same packet with
    /// a segments-left exactly one higher — a re-observation of a packet
    /// that has moved one hop on, not a new entry. An observation with
    /// *equal* segments-left is a fresh entry.
    pub fn enqueue(&mut self, mut entry: PassiveEntry, now: u64) -> bool {
        self.purge(now);
        if self.entries.iter().any(|e| e.forwarded_once(&entry)) {
            return false;
        }
        entry.expires_at = now + self.timeout;
        // Evict enough of the oldest to keep len <= max_len after the
        // push; a set_max_len shrink can leave more than one over.
        while self.entries.len() >= self.max_len {
            match self.entries.pop_front() {
                Some(evicted) => {
                    tracing::debug!(
                        next_hop = %evicted.next_hop,
                        identification = evicted.identification,
                        "passive buffer full, evicting oldest entry"
                    );
                    self.notify(&evicted, DropReason::CapacityEvicted);
                }
                None => {
                    // max_len == 0: nothing fits, nothing to evict.
                    return false;
                }
            }
        }
        self.entries.push_back(entry);
        true
    }

    /// Consume the first live entry for which the probe is the same
    /// packet one hop further along — the stored segments-left is exactly
    /// one higher than the probe's. Confirms a neighbor forwarded the
    /// packet. Expired entries are swept first and never match.
    pub fn all_equal(&mut self, probe: &PassiveEntry, now: u64) -> bool {
        self.purge(now);
        match self.entries.iter().position(|e| e.forwarded_once(probe)) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove and return the first entry bound for `next_hop`.
    pub fn dequeue(&mut self, next_hop: NodeAddress, now: u64) -> Option<PassiveEntry> {
        self.purge(now);
        let idx = self.entries.iter().position(|e| e.next_hop == next_hop)?;
        self.entries.remove(idx)
    }

    /// Whether any live entry is bound for `next_hop`. Does not purge.
    #[must_use]
    pub fn find(&self, next_hop: NodeAddress) -> bool {
        self.entries.iter().any(|e| e.next_hop == next_hop)
    }

    /// Caller-invoked link invalidation: drop-notify and remove every
    /// live entry matching both `source` and `next_hop`. Returns the
    /// number of entries removed. Expired entries are swept first and
    /// report as `Expired`, not `LinkBroken`.
    pub fn drop_link(&mut self, source: NodeAddress, next_hop: NodeAddress, now: u64) -> usize {
        self.purge(now);
        let dropped =
            self.extract_matching(|e| e.source == source && e.next_hop == next_hop);
        for entry in &dropped {
            self.notify(entry, DropReason::LinkBroken);
        }
        if !dropped.is_empty() {
            tracing::debug!(
                %source,
                %next_hop,
                removed = dropped.len(),
                "dropped passive entries for broken link"
            );
        }
        dropped.len()
    }

    /// Sweep-remove every expired entry, drop-notifying each one.
    pub fn purge(&mut self, now: u64) {
        let expired = self.extract_matching(|e| e.is_expired(now));
        for entry in &expired {
            self.notify(entry, DropReason::Expired);
        }
        if !expired.is_empty() {
            tracing::trace!(removed = expired.len(), "purged expired passive entries");
        }
    }

    /// Invoke the drop hook, if one is installed.
    fn notify(&mut self, entry: &PassiveEntry, reason: DropReason) {
        if let Some(cb) = self.drop_notify.as_mut() {
            cb(entry, reason);
        }
    }

    /// Remove every matching entry, preserving order, and return them.
    fn extract_matching(&mut self, pred: impl Fn(&PassiveEntry) -> bool) -> Vec<PassiveEntry> {
        let mut removed = Vec::new();
        let mut kept = VecDeque::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if pred(&entry) {
                removed.push(entry);
            } else {
                kept.push_back(entry);
            }
        }
        self.entries = kept;
        removed
    }
}
