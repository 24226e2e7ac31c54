//! The event dispatcher and packet handler (spec §4.5, §4.6) tying the
//! topology, node state, routing rules, and statistics together.

use torus_sim_types::{SimConfig, SimError};

use crate::node::Node;
use crate::packet::Packet;
use crate::queue::{EventKind, EventQueue};
use crate::rng::{exponential_interval, Rng64};
use crate::routing;
use crate::stats::{Report, Stats};
use crate::topology::{address_difference, neighbor, next_index, node_number};

use tracing::{debug, info, trace};

pub struct Simulator<R: Rng64> {
    config: SimConfig,
    rng: R,
    nodes: Vec<Node>,
    queue: EventQueue,
    time: u64,
    stats: Stats,
}

impl<R: Rng64> Simulator<R> {
    /// Bootstrap: allocate one `Node` per torus address and seed each with
    /// its first packet-generation event (spec §2 "Bootstrap").
    pub fn new(config: SimConfig, mut rng: R) -> Self {
        let n_nodes = config.n_nodes() as usize;
        let n_ports = config.n_ports();
        let mut nodes = Vec::with_capacity(n_nodes);
        let mut queue = EventQueue::new();

        let mut addr = vec![0i64; config.d];
        loop {
            nodes.push(Node::new(n_ports));
            let dt = exponential_interval(&mut rng, config.lambda);
            queue.insert(dt, addr.clone(), EventKind::Generate);
            if !next_index(&mut addr, config.k) {
                break;
            }
        }

        info!(
            d = config.d,
            k = config.k,
            rule = %config.r,
            lambda = config.lambda,
            "bootstrapped torus simulator"
        );

        Self {
            config,
            rng,
            nodes,
            queue,
            time: 0,
            stats: Stats::default(),
        }
    }

    pub fn current_time(&self) -> u64 {
        self.time
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Total packets currently occupying a port slot across every node —
    /// the "in transit" term of the accounting invariant (spec §8 invariant 1).
    pub fn occupied_port_count(&self) -> u64 {
        self.nodes
            .iter()
            .map(|n| n.port_pkt.iter().filter(|p| p.is_some()).count() as u64)
            .sum()
    }

    /// Sum of every node's blocked-queue depth right now.
    pub fn queued_depth(&self) -> u64 {
        self.nodes.iter().map(|n| n.queue_len() as u64).sum()
    }

    /// The largest blocked-queue depth among all nodes right now (spec §8
    /// invariant 2: this must never exceed `bl`).
    pub fn max_queue_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.queue_len()).max().unwrap_or(0)
    }

    fn node_index(&self, addr: &[i64]) -> usize {
        node_number(addr, self.config.k) as usize
    }

    /// Run the main dispatch loop (spec §4.6) to completion and produce the
    /// final statistics report.
    pub fn run(&mut self) -> Result<Report, SimError> {
        while self.time <= self.config.maxst {
            self.step()?;
            while self
                .queue
                .peek_time()
                .map(|t| t <= self.time)
                .unwrap_or(false)
            {
                self.step()?;
            }
        }
        info!(time = self.time, "simulation reached maxst");
        Ok(self.stats.report(self.time, self.config.n_chan()))
    }

    /// Dispatch a single event (generation or channel-free). Exposed alongside
    /// `run` so tests can drive the loop one event at a time and inspect
    /// mid-simulation state.
    pub fn step(&mut self) -> Result<(), SimError> {
        let event = self.queue.pop_min().ok_or(SimError::EmptyEventQueue)?;
        self.time = event.at;
        if self.config.dbg > 0 {
            debug!(time = self.time, node = ?event.node, "dispatch event");
        }
        match event.kind {
            EventKind::Generate => self.dispatch_generate(event.node),
            EventKind::Free { np } => self.dispatch_free(event.node, np),
        }
    }

    /// Generation dispatch (spec §4.6): create a fresh packet, reschedule
    /// the node's next generation event, then hand the packet to `admit`.
    fn dispatch_generate(&mut self, addr: Vec<i64>) -> Result<(), SimError> {
        let dest = self.random_destination(&addr);
        let packet = Packet::new(addr.clone(), dest, self.time);
        self.stats.generated += 1;

        let dt = exponential_interval(&mut self.rng, self.config.lambda);
        self.queue.insert(self.time + dt, addr.clone(), EventKind::Generate);

        self.admit(packet, addr)
    }

    /// Channel-free dispatch (spec §4.6): the packet occupying port `np`
    /// finishes transmission and is handed to the neighbor; the freed port
    /// is then refilled from the blocked queue if a candidate exists.
    fn dispatch_free(&mut self, addr: Vec<i64>, np: usize) -> Result<(), SimError> {
        let nn = self.node_index(&addr);
        self.stats.chan_work_time += self.config.cht as f64;

        let packet = self.nodes[nn].port_pkt[np]
            .take()
            .ok_or(SimError::PortOccupied { node: nn as u64, port: np })?;
        let next = neighbor(&addr, np, self.config.k);
        self.admit(packet, next)?;

        if let Some(refill) = self.nodes[nn].take_first_for_port(np) {
            self.stats.queued -= 1;
            if self.config.dbg > 0 {
                debug!(node = nn, port = np, "refilled port from blocked queue");
            }
            self.nodes[nn].port_pkt[np] = Some(refill);
            self.queue
                .insert(self.time + self.config.cht, addr, EventKind::Free { np });
        }
        Ok(())
    }

    /// Inject a packet directly at `source`, addressed to `dest`, bypassing
    /// the Poisson generator — for tests that need precise control over a
    /// single packet's path (spec §8, scenario S4/S5 style setups).
    pub fn inject_packet(&mut self, source: Vec<i64>, dest: Vec<i64>) -> Result<(), SimError> {
        let packet = Packet::new(source.clone(), dest, self.time);
        self.stats.generated += 1;
        self.admit(packet, source)
    }

    /// Packet handler (spec §4.5): deliver, drop, enqueue, or transmit.
    fn admit(&mut self, mut packet: Packet, at_node: Vec<i64>) -> Result<(), SimError> {
        packet.da = address_difference(&packet.dest, &at_node, self.config.k);

        if packet.at_destination() {
            self.stats.delivered += 1;
            self.stats.sum_of_hops += packet.hops as f64;
            if packet.hops > 0 {
                self.stats.sum_of_packet_avg_chan_time +=
                    (self.time - packet.send_time) as f64 / packet.hops as f64;
            }
            if self.config.dbg > 0 {
                debug!(
                    hops = packet.hops,
                    transit = self.time - packet.send_time,
                    "packet delivered"
                );
            }
            return Ok(());
        }

        let nn = self.node_index(&at_node);
        let np = routing::decide(self.config.r, &packet, &self.nodes[nn].port_pkt, &mut self.rng)?;
        packet.hops += 1;

        if self.config.dbg > 1 {
            trace!(node = nn, da = ?packet.da, chosen_port = ?np, "routing decision");
        }

        match np {
            None => {
                if self.nodes[nn].queue_len() < self.config.bl {
                    self.nodes[nn].enqueue(packet);
                    self.stats.queued += 1;
                } else {
                    self.stats.dropped += 1;
                    if self.config.dbg > 0 {
                        debug!(node = nn, "packet dropped: blocked queue full");
                    }
                }
            }
            Some(np) => {
                self.nodes[nn].port_pkt[np] = Some(packet);
                self.queue
                    .insert(self.time + self.config.cht, at_node, EventKind::Free { np });
            }
        }
        Ok(())
    }

    fn random_destination(&mut self, source: &[i64]) -> Vec<i64> {
        loop {
            let dest: Vec<i64> = (0..self.config.d)
                .map(|_| self.rng.rand_below(self.config.k) as i64)
                .collect();
            if dest != source {
                return dest;
            }
        }
    }
}
