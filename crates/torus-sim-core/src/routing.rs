//! The six local switching rules (spec §4.4).
//!
//! Every rule receives the packet's freshly computed `da` and the node's
//! port-occupancy slice, and returns `Ok(Some(np))` (commit to port `np`,
//! guaranteed empty), `Ok(None)` (refuse — the handler enqueues or drops),
//! or `Err` if an invariant is violated (rules b/c invoked with no
//! productive dimension; spec's defense-in-depth requirement).

use torus_sim_types::{Rule, SimError};

use crate::packet::Packet;
use crate::rng::Rng64;
use crate::topology::port_number;

pub fn decide(
    rule: Rule,
    packet: &Packet,
    ports: &[Option<Packet>],
    rng: &mut dyn Rng64,
) -> Result<Option<usize>, SimError> {
    match rule {
        Rule::A => Ok(rule_a(packet, ports)),
        Rule::B => rule_b(packet, ports, rng),
        Rule::C => rule_c(packet, ports, rng),
        Rule::D => Ok(rule_d(packet, ports)),
        Rule::E => Ok(rule_e(packet, ports, rng)),
        Rule::F => Ok(rule_f(packet, ports, rng)),
    }
}

fn preferred_port(da: &[i64], j: usize) -> usize {
    port_number(j, da[j].signum())
}

/// Rule a: first productive dimension by index order; refuse if its
/// preferred port is busy (no further dimensions are tried).
fn rule_a(packet: &Packet, ports: &[Option<Packet>]) -> Option<usize> {
    let j = packet.productive_dims().next()?;
    let np = preferred_port(&packet.da, j);
    ports[np].is_none().then_some(np)
}

/// Rule b: uniform random choice among productive dimensions; refuse if
/// that dimension's preferred port is busy.
fn rule_b(
    packet: &Packet,
    ports: &[Option<Packet>],
    rng: &mut dyn Rng64,
) -> Result<Option<usize>, SimError> {
    let dims: Vec<usize> = packet.productive_dims().collect();
    if dims.is_empty() {
        return Err(SimError::EmptyProductiveSet { rule: 'b' });
    }
    let j = dims[rng.rand_below(dims.len())];
    let np = preferred_port(&packet.da, j);
    Ok(ports[np].is_none().then_some(np))
}

/// Rule c: weighted random choice among productive dimensions, weight
/// `|da[j]|`. Sampling uses the source's `r <= w[j]` boundary (not the
/// textbook `r < w[j]`), which slightly favors lower-indexed dimensions
/// (spec §9) — preserved for fidelity to the reference statistics.
fn rule_c(
    packet: &Packet,
    ports: &[Option<Packet>],
    rng: &mut dyn Rng64,
) -> Result<Option<usize>, SimError> {
    let dims: Vec<usize> = packet.productive_dims().collect();
    if dims.is_empty() {
        return Err(SimError::EmptyProductiveSet { rule: 'c' });
    }
    let total: i64 = dims.iter().map(|&j| packet.da[j].abs()).sum();
    let mut r = rng.rand_below(total as usize) as i64;
    for &j in &dims {
        let w = packet.da[j].abs();
        if r <= w {
            let np = preferred_port(&packet.da, j);
            return Ok(ports[np].is_none().then_some(np));
        }
        r -= w;
    }
    unreachable!("weighted selection over productive dimensions must terminate in-loop")
}

/// Rule d: scan productive dimensions in index order, skipping busy
/// preferred ports; refuse only once every productive dimension has been
/// tried and found busy. (The reference `ts.c` implements exactly this —
/// its loop body has no `else` branch after the busy check, so it falls
/// through to the next dimension rather than returning immediately, unlike
/// rule a. See DESIGN.md for this Open Question's resolution.)
fn rule_d(packet: &Packet, ports: &[Option<Packet>]) -> Option<usize> {
    for j in packet.productive_dims() {
        let np = preferred_port(&packet.da, j);
        if ports[np].is_none() {
            return Some(np);
        }
    }
    None
}

/// Rule e: uniform random choice among productive dimensions whose
/// preferred port is currently free.
fn rule_e(packet: &Packet, ports: &[Option<Packet>], rng: &mut dyn Rng64) -> Option<usize> {
    let free: Vec<usize> = packet
        .productive_dims()
        .filter(|&j| ports[preferred_port(&packet.da, j)].is_none())
        .collect();
    if free.is_empty() {
        return None;
    }
    let j = free[rng.rand_below(free.len())];
    Some(preferred_port(&packet.da, j))
}

/// Rule f: weighted random choice (weight `|da[j]|`, `<=` boundary as in
/// rule c) among productive dimensions whose preferred port is free.
fn rule_f(packet: &Packet, ports: &[Option<Packet>], rng: &mut dyn Rng64) -> Option<usize> {
    let free: Vec<usize> = packet
        .productive_dims()
        .filter(|&j| ports[preferred_port(&packet.da, j)].is_none())
        .collect();
    if free.is_empty() {
        return None;
    }
    let total: i64 = free.iter().map(|&j| packet.da[j].abs()).sum();
    let mut r = rng.rand_below(total as usize) as i64;
    for &j in &free {
        let w = packet.da[j].abs();
        if r <= w {
            return Some(preferred_port(&packet.da, j));
        }
        r -= w;
    }
    unreachable!("weighted selection over free productive dimensions must terminate in-loop")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::StdRng64;

    fn packet_with_da(da: Vec<i64>) -> Packet {
        let mut p = Packet::new(vec![0; da.len()], vec![0; da.len()], 0);
        p.da = da;
        p
    }

    fn free_ports(n: usize) -> Vec<Option<Packet>> {
        (0..n).map(|_| None).collect()
    }

    #[test]
    fn rule_a_picks_first_productive_dim() {
        let p = packet_with_da(vec![2, -3]);
        let ports = free_ports(4);
        // dim 0, sign +1 -> port_number(0,1) = 1
        assert_eq!(rule_a(&p, &ports), Some(1));
    }

    #[test]
    fn rule_a_refuses_on_busy_first_dim_even_if_second_is_free() {
        let p = packet_with_da(vec![2, -3]);
        let mut ports = free_ports(4);
        ports[1] = Some(packet_with_da(vec![0]));
        assert_eq!(rule_a(&p, &ports), None);
    }

    #[test]
    fn rule_d_skips_busy_and_tries_next_dim() {
        let p = packet_with_da(vec![2, -3]);
        let mut ports = free_ports(4);
        ports[1] = Some(packet_with_da(vec![0])); // dim 0's port busy
        // dim 1, sign -1 -> port_number(1,-1) = 2, free
        assert_eq!(rule_d(&p, &ports), Some(2));
    }

    #[test]
    fn rule_d_refuses_only_when_all_productive_ports_busy() {
        let p = packet_with_da(vec![2, -3]);
        let mut ports = free_ports(4);
        ports[1] = Some(packet_with_da(vec![0]));
        ports[2] = Some(packet_with_da(vec![0]));
        assert_eq!(rule_d(&p, &ports), None);
    }

    #[test]
    fn rule_b_errors_on_empty_productive_set() {
        let p = packet_with_da(vec![0, 0]);
        let ports = free_ports(4);
        let mut rng = StdRng64::seed_from_u64(1);
        assert!(rule_b(&p, &ports, &mut rng).is_err());
    }

    #[test]
    fn rule_e_only_considers_free_productive_ports() {
        let p = packet_with_da(vec![1, 1]);
        let mut ports = free_ports(4);
        // dim 0 sign+1 -> port 1; dim 1 sign+1 -> port 3
        ports[1] = Some(packet_with_da(vec![0]));
        let mut rng = StdRng64::seed_from_u64(3);
        assert_eq!(rule_e(&p, &ports, &mut rng), Some(3));
    }

    #[test]
    fn rule_f_refuses_when_all_productive_ports_busy() {
        let p = packet_with_da(vec![1, -1]);
        let mut ports = free_ports(4);
        ports[1] = Some(packet_with_da(vec![0]));
        ports[2] = Some(packet_with_da(vec![0]));
        let mut rng = StdRng64::seed_from_u64(5);
        assert_eq!(rule_f(&p, &ports, &mut rng), None);
    }
}
