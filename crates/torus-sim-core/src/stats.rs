//! Running counters and the final statistics report (spec §4.7, §6).

use serde::Serialize;

/// Running counters, updated as the simulation progresses.
#[derive(Debug, Default, Clone)]
pub struct Stats {
    pub generated: u64,
    pub delivered: u64,
    /// Current total depth of all per-node blocked queues (not cumulative).
    pub queued: u64,
    pub dropped: u64,
    pub sum_of_hops: f64,
    pub sum_of_packet_avg_chan_time: f64,
    pub chan_work_time: f64,
}

/// Final statistics sink (spec §4.7/§6): every running counter plus the
/// derived metrics, and the simulated time at which the run stopped.
/// Metrics that divide by `delivered` report `None` rather than `NaN` or
/// a divide-by-zero when no packet has been delivered yet (spec §9).
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub simulated_time: u64,
    pub generated: u64,
    pub delivered: u64,
    pub queued: u64,
    pub dropped: u64,
    pub throughput: f64,
    pub load: f64,
    pub avg_hops: Option<f64>,
    pub avg_chan_time: Option<f64>,
    pub drop_ratio: Option<f64>,
}

impl Stats {
    pub fn report(&self, simulated_time: u64, n_chan: u64) -> Report {
        let throughput = if simulated_time > 0 {
            self.delivered as f64 / simulated_time as f64
        } else {
            0.0
        };
        let load = if simulated_time > 0 && n_chan > 0 {
            self.chan_work_time / (simulated_time as f64 * n_chan as f64)
        } else {
            0.0
        };
        let (avg_hops, avg_chan_time, drop_ratio) = if self.delivered > 0 {
            (
                Some(self.sum_of_hops / self.delivered as f64),
                Some(self.sum_of_packet_avg_chan_time / self.delivered as f64),
                Some(self.dropped as f64 / self.delivered as f64),
            )
        } else {
            (None, None, None)
        };
        Report {
            simulated_time,
            generated: self.generated,
            delivered: self.delivered,
            queued: self.queued,
            dropped: self.dropped,
            throughput,
            load,
            avg_hops,
            avg_chan_time,
            drop_ratio,
        }
    }
}

impl Report {
    /// Human-readable rendering matching the shape of the reference tool's
    /// `print_statistics()`.
    pub fn render(&self) -> String {
        let drop_pct = self
            .drop_ratio
            .map(|r| format!("{:.6} %", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        let avg_hops = self
            .avg_hops
            .map(|v| format!("{v:.6}"))
            .unwrap_or_else(|| "n/a".to_string());
        let avg_chan_time = self
            .avg_chan_time
            .map(|v| format!("{v:.6}"))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "***** Simulation Statistics *****\n\
             simulation time: {} (mtu)\n\
             generated packets: {}\n\
             delivered packets: {}\n\
             queued packets: {}\n\
             dropped packets: {} ({})\n\
             torus performance: {:.6e} (pkt/mtu)\n\
             torus load: {:.6} %\n\
             average hops per packet: {}\n\
             average packet channel time: {} (mtu)\n",
            self.simulated_time,
            self.generated,
            self.delivered,
            self.queued,
            self.dropped,
            drop_pct,
            self.throughput,
            self.load * 100.0,
            avg_hops,
            avg_chan_time,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_guards_against_delivered_zero() {
        let stats = Stats::default();
        let report = stats.report(100, 8);
        assert_eq!(report.avg_hops, None);
        assert_eq!(report.avg_chan_time, None);
        assert_eq!(report.drop_ratio, None);
        assert!(report.render().contains("n/a"));
    }

    #[test]
    fn report_computes_derived_metrics() {
        let stats = Stats {
            generated: 10,
            delivered: 5,
            queued: 1,
            dropped: 2,
            sum_of_hops: 15.0,
            sum_of_packet_avg_chan_time: 500.0,
            chan_work_time: 800.0,
        };
        let report = stats.report(1000, 8);
        assert_eq!(report.throughput, 0.005);
        assert_eq!(report.load, 0.0001);
        assert_eq!(report.avg_hops, Some(3.0));
        assert_eq!(report.avg_chan_time, Some(100.0));
        assert_eq!(report.drop_ratio, Some(0.4));
    }
}
