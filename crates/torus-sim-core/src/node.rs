//! Per-node state: the blocked-packet queue and port-occupancy array
//! (spec §4.3).

use std::collections::VecDeque;

use crate::packet::Packet;
use crate::topology::{port_dimension, port_direction};

pub struct Node {
    queue: VecDeque<Packet>,
    pub port_pkt: Vec<Option<Packet>>,
}

impl Node {
    pub fn new(n_ports: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            port_pkt: (0..n_ports).map(|_| None).collect(),
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn enqueue(&mut self, packet: Packet) {
        self.queue.push_back(packet);
    }

    /// Scan the blocked queue head-to-tail and remove the first packet whose
    /// preferred next hop for `np` is satisfied: `da[dim(np)] != 0` and
    /// `sign(da[dim(np)]) == direction(np)`. This is the sole way a blocked
    /// packet leaves the queue (spec §4.3).
    pub fn take_first_for_port(&mut self, np: usize) -> Option<Packet> {
        let dim = port_dimension(np);
        let dir = port_direction(np);
        let pos = self
            .queue
            .iter()
            .position(|p| p.da[dim] != 0 && p.da[dim].signum() == dir)?;
        self.queue.remove(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet_with_da(da: Vec<i64>) -> Packet {
        let mut p = Packet::new(vec![0; da.len()], vec![0; da.len()], 0);
        p.da = da;
        p
    }

    #[test]
    fn take_first_for_port_scans_in_order() {
        let mut node = Node::new(4);
        node.enqueue(packet_with_da(vec![0, -1])); // wants port for dim 1, dir -1 -> np 2
        node.enqueue(packet_with_da(vec![1, 0])); // wants port for dim 0, dir +1 -> np 1
        node.enqueue(packet_with_da(vec![1, 0])); // also wants np 1

        assert_eq!(node.queue_len(), 3);
        let taken = node.take_first_for_port(1).unwrap();
        assert_eq!(taken.da, vec![1, 0]);
        assert_eq!(node.queue_len(), 2);
        // the second packet wanting np 1 is still queued behind the np-2 packet
        let taken2 = node.take_first_for_port(1).unwrap();
        assert_eq!(taken2.da, vec![1, 0]);
        assert_eq!(node.queue_len(), 1);
    }

    #[test]
    fn take_first_for_port_returns_none_when_no_match() {
        let mut node = Node::new(4);
        node.enqueue(packet_with_da(vec![1, 0]));
        assert!(node.take_first_for_port(2).is_none());
        assert_eq!(node.queue_len(), 1);
    }
}
