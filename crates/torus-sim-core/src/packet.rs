//! Packet data model (spec §3).

/// A packet in flight. `source`/`dest` are fixed at creation; `da` is the
/// residual signed address-difference vector, recomputed on entry to every
/// node before any routing decision is made.
#[derive(Debug, Clone)]
pub struct Packet {
    pub source: Vec<i64>,
    pub dest: Vec<i64>,
    pub send_time: u64,
    pub hops: u32,
    pub da: Vec<i64>,
}

impl Packet {
    pub fn new(source: Vec<i64>, dest: Vec<i64>, send_time: u64) -> Self {
        let da = vec![0; source.len()];
        Self {
            source,
            dest,
            send_time,
            hops: 0,
            da,
        }
    }

    /// Dimensions where `da != 0` — candidates for forward progress.
    pub fn productive_dims(&self) -> impl Iterator<Item = usize> + '_ {
        self.da
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(j, _)| j)
    }

    pub fn at_destination(&self) -> bool {
        self.da.iter().all(|&v| v == 0)
    }
}
