//! Maintenance buffer: packets awaiting network-layer acknowledgment.
//!
//! Entries are keyed by the 6-tuple (our address, next hop, source,
//! destination, ack id, segments left). An outstanding entry is consumed
//! either by [`MaintenanceBuffer::dequeue`] when a link-level signal for
//! its next hop arrives, or by one of the four correlation predicates
//! when delivery is confirmed through a different observation channel
//! than the one that created it.
//!
//! Time-bounded FIFO: entries expire `timeout` virtual milliseconds after
//! enqueue, and the oldest entry is evicted silently when the buffer is
//! at capacity.

use std::collections::VecDeque;

use dsr_core::{AckId, NodeAddress, Packet};

use crate::config::MaintenanceSection;

/// A packet in flight toward `next_hop`, awaiting acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct MaintainEntry {
    packet: Packet,
    our_address: NodeAddress,
    next_hop: NodeAddress,
    source: NodeAddress,
    destination: NodeAddress,
    ack_id: AckId,
    segments_left: u8,
    /// Absolute virtual-time deadline, stamped at enqueue.
    expires_at: u64,
}

impl MaintainEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        packet: Packet,
        our_address: NodeAddress,
        next_hop: NodeAddress,
        source: NodeAddress,
        destination: NodeAddress,
        ack_id: AckId,
        segments_left: u8,
    ) -> Self {
        Self {
            packet,
            our_address,
            next_hop,
            source,
            destination,
            ack_id,
            segments_left,
            expires_at: 0,
        }
    }

    #[must_use]
    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    /// Consume the entry, yielding the packet handle for retransmission.
    #[must_use]
    pub fn into_packet(self) -> Packet {
        self.packet
    }

    pub fn our_address(&self) -> NodeAddress {
        self.our_address
    }

    pub fn next_hop(&self) -> NodeAddress {
        self.next_hop
    }

    pub fn source(&self) -> NodeAddress {
        self.source
    }

    pub fn destination(&self) -> NodeAddress {
        self.destination
    }

    pub fn ack_id(&self) -> AckId {
        self.ack_id
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

    /// Full 6-tuple key equality.
    fn key_eq(&self, other: &Self) -> bool {
        self.our_address == other.our_address
            && self.next_hop == other.next_hop
            && self.source == other.source
            && self.destination == other.destination
            && self.ack_id == other.ack_id
            && self.segments_left == other.segments_left
    }
}

/// FIFO of packets awaiting network-layer acknowledgment, with duplicate
/// suppression, capacity eviction, and expiry purging.
#[derive(Debug)]
#[must_use]
pub struct MaintenanceBuffer {
    entries: VecDeque<MaintainEntry>,
    max_len: usize,
    timeout: u64,
}

impl MaintenanceBuffer {
    pub fn new(max_len: usize, timeout: u64) -> Self {
        Self {
            entries: VecDeque::new(),
            max_len,
            timeout,
        }
    }

    pub fn from_config(config: &MaintenanceSection) -> Self {
        Self::new(config.max_len, config.timeout_ms)
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

    /// Admit an entry.
    ///
    /// Returns `false` without touching state when an entry with the same
    /// 6-tuple key is already buffered. At capacity, the oldest entry is
    /// evicted silently before the new one is appended.
    pub fn enqueue(&mut self, mut entry: MaintainEntry, now: u64) -> bool {
        self.purge(now);
        if self.entries.iter().any(|e| e.key_eq(&entry)) {
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
                        ack_id = %evicted.ack_id,
                        "maintenance buffer full, evicting oldest entry"
                    );
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

    /// Remove and return the first entry bound for `next_hop`.
    pub fn dequeue(&mut self, next_hop: NodeAddress, now: u64) -> Option<MaintainEntry> {
        self.purge(now);
        let idx = self.entries.iter().position(|e| e.next_hop == next_hop)?;
        self.entries.remove(idx)
    }

    /// Whether any live entry is bound for `next_hop`. Does not purge.
    #[must_use]
    pub fn find(&self, next_hop: NodeAddress) -> bool {
        self.entries.iter().any(|e| e.next_hop == next_hop)
    }

    /// Remove every entry bound for `next_hop` (bulk invalidation on a
    /// route break). Returns whether anything was removed.
    pub fn drop_packets_with_next_hop(&mut self, next_hop: NodeAddress, now: u64) -> bool {
        self.purge(now);
        let before = self.entries.len();
        self.entries.retain(|e| e.next_hop != next_hop);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(%next_hop, removed, "dropped maintenance entries for broken next hop");
        }
        removed > 0
    }

    /// Consume the first live entry matching the probe's full 6-tuple.
    pub fn all_equal(&mut self, probe: &MaintainEntry, now: u64) -> bool {
        self.purge(now);
        self.remove_first(|e| e.key_eq(probe))
    }

    /// Consume the first live entry matching the probe on the 5-tuple
    /// that drops segments-left.
    pub fn network_equal(&mut self, probe: &MaintainEntry, now: u64) -> bool {
        self.purge(now);
        self.remove_first(|e| {
            e.our_address == probe.our_address
                && e.next_hop == probe.next_hop
                && e.source == probe.source
                && e.destination == probe.destination
                && e.ack_id == probe.ack_id
        })
    }

    /// Consume the first live entry whose (source, destination,
    /// segments-left, ack id) match the probe — for acknowledgments
    /// observed promiscuously, where our own address and next hop are
    /// irrelevant.
    pub fn promisc_equal(&mut self, probe: &MaintainEntry, now: u64) -> bool {
        self.purge(now);
        self.remove_first(|e| {
            e.source == probe.source
                && e.destination == probe.destination
                && e.segments_left == probe.segments_left
                && e.ack_id == probe.ack_id
        })
    }

    /// Consume the first live entry whose (source, destination, our
    /// address, next hop) match the probe — for link-level delivery
    /// confirmation, where the ack id and segments-left are irrelevant.
    pub fn link_equal(&mut self, probe: &MaintainEntry, now: u64) -> bool {
        self.purge(now);
        self.remove_first(|e| {
            e.source == probe.source
                && e.destination == probe.destination
                && e.our_address == probe.our_address
                && e.next_hop == probe.next_hop
        })
    }

    /// Sweep-remove every expired entry.
    pub fn purge(&mut self, now: u64) {
        let before = self.entries.len();
        self.entries.retain(|e| !e.is_expired(now));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::trace!(removed, "purged expired maintenance entries");
        }
    }

    /// Remove at most one matching entry, front-most first.
    fn remove_first(&mut self, pred: impl Fn(&MaintainEntry) -> bool) -> bool {
        match self.entries.iter().position(pred) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }
}
