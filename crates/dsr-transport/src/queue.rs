//! Per-next-hop bounded send queue with a maximum residency delay.
//!
//! A single global capacity is shared across all next-hops. Unlike the
//! two correlation buffers, a full queue rejects the new packet instead
//! of evicting the oldest — backpressure belongs at the send side, not
//! on packets already accepted. Residency is bounded by an absolute
//! deadline: `inserted_at + max_delay`.

use std::collections::VecDeque;

use dsr_core::{NodeAddress, Packet};

use crate::config::QueueSection;

/// A packet queued for transmission toward `next_hop`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct NetworkQueueEntry {
    packet: Packet,
    next_hop: NodeAddress,
    /// Virtual time the entry was admitted, stamped by the queue.
    inserted_at: u64,
}

impl NetworkQueueEntry {
    pub fn new(packet: Packet, next_hop: NodeAddress) -> Self {
        Self {
            packet,
            next_hop,
            inserted_at: 0,
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

    pub fn next_hop(&self) -> NodeAddress {
        self.next_hop
    }

    #[must_use]
    pub fn inserted_at(&self) -> u64 {
        self.inserted_at
    }
}

/// Bounded send-side FIFO with per-entry insertion timestamps.
#[derive(Debug)]
#[must_use]
pub struct NetworkQueue {
    queue: VecDeque<NetworkQueueEntry>,
    max_size: usize,
    max_delay: u64,
}

impl NetworkQueue {
    pub fn new(max_size: usize, max_delay: u64) -> Self {
        Self {
            queue: VecDeque::new(),
            max_size,
            max_delay,
        }
    }

    pub fn from_config(config: &QueueSection) -> Self {
        Self::new(config.max_size, config.max_delay_ms)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    #[must_use]
    pub fn max_delay(&self) -> u64 {
        self.max_delay
    }

    pub fn set_max_delay(&mut self, max_delay: u64) {
        self.max_delay = max_delay;
    }

    /// Admit an entry, stamping it with the current virtual time.
    ///
    /// Returns `false` when the queue is at its global capacity.
    pub fn enqueue(&mut self, mut entry: NetworkQueueEntry, now: u64) -> bool {
        if self.queue.len() >= self.max_size {
            tracing::debug!(
                next_hop = %entry.next_hop,
                "network queue full, rejecting packet"
            );
            return false;
        }
        entry.inserted_at = now;
        self.queue.push_back(entry);
        true
    }

    /// Remove stale entries, then pop the front of the FIFO.
    pub fn dequeue(&mut self, now: u64) -> Option<NetworkQueueEntry> {
        self.cleanup(now);
        self.queue.pop_front()
    }

    /// Whether any entry is bound for `next_hop`.
    #[must_use]
    pub fn find(&self, next_hop: NodeAddress) -> bool {
        self.queue.iter().any(|e| e.next_hop == next_hop)
    }

    /// Remove and return the first entry bound for `next_hop`.
    pub fn find_packet_with_next_hop(&mut self, next_hop: NodeAddress) -> Option<NetworkQueueEntry> {
        let idx = self.queue.iter().position(|e| e.next_hop == next_hop)?;
        self.queue.remove(idx)
    }

    /// Remove every entry whose residency deadline has passed.
    pub fn cleanup(&mut self, now: u64) {
        let max_delay = self.max_delay;
        let before = self.queue.len();
        self.queue.retain(|e| now <= e.inserted_at + max_delay);
        let removed = before - self.queue.len();
        if removed > 0 {
            tracing::trace!(removed, "dropped stale network queue entries");
        }
    }

    /// Clear unconditionally.
    pub fn flush(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsr_core::PacketUid;

    fn make_entry(uid: u64, next_hop: u16) -> NetworkQueueEntry {
        NetworkQueueEntry::new(
            Packet::with_uid(PacketUid::new(uid), vec![0xEF; 20]),
            NodeAddress::new(next_hop),
        )
    }

    #[test]
    fn test_enqueue_stamps_time() {
        let mut queue = NetworkQueue::new(10, 1000);
        assert!(queue.enqueue(make_entry(1, 20), 777));
        assert_eq!(queue.dequeue(777).unwrap().inserted_at(), 777);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = NetworkQueue::new(10, 1000);
        queue.enqueue(make_entry(1, 20), 100);
        queue.enqueue(make_entry(2, 21), 100);

        assert_eq!(queue.dequeue(100).unwrap().packet().uid(), PacketUid::new(1));
        assert_eq!(queue.dequeue(100).unwrap().packet().uid(), PacketUid::new(2));
        assert!(queue.dequeue(100).is_none());
    }

    #[test]
    fn test_full_queue_rejects() {
        let mut queue = NetworkQueue::new(1, 1000);
        assert!(queue.enqueue(make_entry(1, 20), 100));
        assert!(!queue.enqueue(make_entry(2, 20), 100));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_capacity_is_global_not_per_hop() {
        let mut queue = NetworkQueue::new(2, 1000);
        assert!(queue.enqueue(make_entry(1, 20), 100));
        assert!(queue.enqueue(make_entry(2, 21), 100));
        // Different next hop, but the cap is shared.
        assert!(!queue.enqueue(make_entry(3, 22), 100));
    }

    #[test]
    fn test_find_and_extract() {
        let mut queue = NetworkQueue::new(10, 1000);
        queue.enqueue(make_entry(1, 20), 100);
        queue.enqueue(make_entry(2, 21), 100);

        assert!(queue.find(NodeAddress::new(21)));

        let entry = queue.find_packet_with_next_hop(NodeAddress::new(21)).unwrap();
        assert_eq!(entry.packet().uid(), PacketUid::new(2));
        assert_eq!(queue.len(), 1);
        assert!(!queue.find(NodeAddress::new(21)));
        assert!(queue.find_packet_with_next_hop(NodeAddress::new(21)).is_none());
    }

    #[test]
    fn test_cleanup_removes_stale_entries() {
        let mut queue = NetworkQueue::new(10, 1000);
        queue.enqueue(make_entry(1, 20), 100); // deadline 1100
        queue.enqueue(make_entry(2, 21), 900); // deadline 1900

        queue.cleanup(1500);
        assert_eq!(queue.len(), 1);
        assert!(queue.find(NodeAddress::new(21)));
    }

    #[test]
    fn test_dequeue_skips_stale_front() {
        let mut queue = NetworkQueue::new(10, 1000);
        queue.enqueue(make_entry(1, 20), 100);
        queue.enqueue(make_entry(2, 21), 2000);

        // Front entry went stale; dequeue cleans it up and pops the live one.
        let entry = queue.dequeue(2500).unwrap();
        assert_eq!(entry.packet().uid(), PacketUid::new(2));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_flush() {
        let mut queue = NetworkQueue::new(10, 1000);
        queue.enqueue(make_entry(1, 20), 100);
        queue.enqueue(make_entry(2, 21), 100);
        queue.flush();
        assert!(queue.is_empty());
    }

    // ================================================================== //
    // Boundary: residency deadline strict > semantics
    // ================================================================== //

    #[test]
    fn entry_at_exact_deadline_survives() {
        let mut queue = NetworkQueue::new(10, 1000);
        queue.enqueue(make_entry(1, 20), 100);
        queue.cleanup(1100);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn entry_one_past_deadline_is_removed() {
        let mut queue = NetworkQueue::new(10, 1000);
        queue.enqueue(make_entry(1, 20), 100);
        queue.cleanup(1101);
        assert!(queue.is_empty());
    }

    // ================================================================== //
    // Concrete scenario: reject-then-admit walk at capacity one
    // ================================================================== //

    #[test]
    fn reject_then_admit_walk() {
        let mut queue = NetworkQueue::new(1, 30_000);
        let p1 = make_entry(1, 20);
        let p2 = make_entry(2, 21);

        assert!(queue.enqueue(p1, 100));
        assert!(!queue.enqueue(p2.clone(), 200));

        let out = queue.dequeue(300).unwrap();
        assert_eq!(out.packet().uid(), PacketUid::new(1));
        assert!(queue.is_empty());

        assert!(queue.enqueue(p2, 400));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = QueueSection {
            max_size: 2,
            max_delay_ms: 100,
        };
        let mut queue = NetworkQueue::from_config(&config);
        assert_eq!(queue.max_size(), 2);
        assert_eq!(queue.max_delay(), 100);

        queue.enqueue(make_entry(1, 20), 0);
        queue.cleanup(101);
        assert!(queue.is_empty());
    }
}
