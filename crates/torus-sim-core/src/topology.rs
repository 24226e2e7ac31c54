//! Index arithmetic on the d-dimensional k-ary torus (spec §4.1).
//!
//! An address is `d` coordinates, each in `[0, k)`. Port `np` for dimension
//! `j` and direction `r` (`-1` or `+1`) is `2*j + (0 if r == -1 else 1)`.

/// `node_number(i)`: base-k positional encoding, first coordinate most
/// significant.
pub fn node_number(addr: &[i64], k: usize) -> u64 {
    let k = k as u64;
    addr.iter().fold(0u64, |acc, &c| acc * k + c as u64)
}

/// Enumerate every address in `[0,k)^d` in lexicographic order by mutating
/// `addr` in place (odometer increment). Returns `false` once the sequence
/// has wrapped back past the last address.
pub fn next_index(addr: &mut [i64], k: usize) -> bool {
    let k = k as i64;
    for j in (0..addr.len()).rev() {
        addr[j] += 1;
        if addr[j] < k {
            return true;
        }
        addr[j] = 0;
    }
    false
}

/// Port dimension and direction, inverse of `port_number`.
pub fn port_dimension(np: usize) -> usize {
    np / 2
}

pub fn port_direction(np: usize) -> i64 {
    if np % 2 == 0 {
        -1
    } else {
        1
    }
}

/// Port number for dimension `dim` and signed direction `dir` (`-1` or `+1`).
pub fn port_number(dim: usize, dir: i64) -> usize {
    2 * dim + if dir == -1 { 0 } else { 1 }
}

/// The neighbor reached by leaving node `addr` on port `np`, wrapping at the
/// torus boundary.
pub fn neighbor(addr: &[i64], np: usize, k: usize) -> Vec<i64> {
    let mut out = addr.to_vec();
    let dim = port_dimension(np);
    let dir = port_direction(np);
    let k = k as i64;
    let v = addr[dim] + dir;
    out[dim] = if v < 0 {
        k - 1
    } else if v >= k {
        0
    } else {
        v
    };
    out
}

/// `da[j]`: signed shortest torus offset from `curr` to `dest` along each
/// dimension. `Δ = dest[j] - curr[j]` (already in `(-k, k)` since both
/// coordinates live in `[0, k)`, so no reduction is needed before taking its
/// sign). Magnitude is `min(|Δ|, k - |Δ|)`. On a tie (only possible for even
/// `k`, `|Δ| = k/2`) the wrap-around branch is taken, which gives the tie a
/// sign *opposite* `sign(Δ)` — this is the reference implementation's actual
/// behavior (its `da1 < da2` tie-break falls into the `else` arm) and is
/// preserved here rather than corrected (spec §9).
pub fn address_difference(dest: &[i64], curr: &[i64], k: usize) -> Vec<i64> {
    let k = k as i64;
    dest.iter()
        .zip(curr.iter())
        .map(|(&di, &si)| {
            let delta = di - si;
            let sign = delta.signum();
            let da1 = delta.abs();
            let da2 = k - da1;
            if da1 < da2 {
                da1 * sign
            } else {
                da2 * -sign
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_number_is_base_k_positional() {
        assert_eq!(node_number(&[1, 2, 3], 4), 1 * 16 + 2 * 4 + 3);
    }

    #[test]
    fn next_index_enumerates_all_addresses_then_stops() {
        let mut addr = vec![0i64, 0];
        let mut count = 1;
        while next_index(&mut addr, 3) {
            count += 1;
        }
        assert_eq!(count, 9);
        assert_eq!(addr, vec![0, 0]);
    }

    #[test]
    fn neighbor_wraps_at_boundary() {
        // dimension 0, direction -1 (port 0), at coordinate 0 wraps to k-1
        assert_eq!(neighbor(&[0, 1], 0, 4), vec![3, 1]);
        // dimension 0, direction +1 (port 1), at coordinate k-1 wraps to 0
        assert_eq!(neighbor(&[3, 1], 1, 4), vec![0, 1]);
    }

    #[test]
    fn address_difference_is_zero_at_destination() {
        let da = address_difference(&[2, 2], &[2, 2], 4);
        assert_eq!(da, vec![0, 0]);
    }

    #[test]
    fn address_difference_shortest_path_on_k4() {
        // from (0,0) to (3,3) on k=4: delta=3 each way, shortest wrap is 1 (negative direction)
        let da = address_difference(&[3, 3], &[0, 0], 4);
        assert_eq!(da, vec![-1, -1]);
    }

    #[test]
    fn address_difference_tie_break_matches_reference_wrap_branch() {
        // k=8, delta=4 exactly half way: reference takes the wrap branch,
        // whose sign is opposite the raw delta's sign.
        let da = address_difference(&[4], &[0], 8);
        assert_eq!(da, vec![-4]);
        let da = address_difference(&[0], &[4], 8);
        assert_eq!(da, vec![4]);
    }

    #[test]
    fn port_number_round_trips_with_dimension_and_direction() {
        for dim in 0..4 {
            for &dir in &[-1i64, 1] {
                let np = port_number(dim, dir);
                assert_eq!(port_dimension(np), dim);
                assert_eq!(port_direction(np), dir);
            }
        }
    }
}
