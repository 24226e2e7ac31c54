use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rule::Rule;

/// Configuration value object consumed by the simulation core (spec §6).
///
/// `SimConfig::build` is the single validation choke point: every field is
/// checked once, at construction, so the engine itself never has to guard
/// against a malformed `d`, `k`, or `lambda`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub d: usize,
    pub k: usize,
    pub r: Rule,
    pub cht: u64,
    pub bl: usize,
    pub lambda: f64,
    pub maxst: u64,
    pub dbg: u8,
}

impl SimConfig {
    /// Construct and validate a configuration. `lambda` has no default in
    /// the reference implementation and must always be supplied explicitly.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        d: usize,
        k: usize,
        r: char,
        cht: u64,
        bl: usize,
        lambda: f64,
        maxst: u64,
        dbg: u8,
    ) -> Result<Self, ConfigError> {
        if d == 0 {
            return Err(ConfigError::InvalidValue {
                field: "d",
                reason: "must be at least 1".into(),
            });
        }
        if k < 2 {
            return Err(ConfigError::InvalidValue {
                field: "k",
                reason: "must be at least 2".into(),
            });
        }
        if cht < 1 {
            return Err(ConfigError::InvalidValue {
                field: "cht",
                reason: "must be at least 1".into(),
            });
        }
        if bl < 1 {
            return Err(ConfigError::InvalidValue {
                field: "bl",
                reason: "must be at least 1".into(),
            });
        }
        if !(lambda > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "lambda",
                reason: "must be strictly positive".into(),
            });
        }
        let r = Rule::parse(r)?;
        Ok(Self {
            d,
            k,
            r,
            cht,
            bl,
            lambda,
            maxst,
            dbg,
        })
    }

    pub fn n_nodes(&self) -> u64 {
        (self.k as u64).pow(self.d as u32)
    }

    pub fn n_ports(&self) -> usize {
        2 * self.d
    }

    pub fn n_chan(&self) -> u64 {
        self.n_nodes() * self.n_ports() as u64
    }
}

/// Partial overlay applied from a `--config` TOML file before CLI flags are
/// layered on top, in the manner of the teacher's `SimConfigOverride`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimConfigOverride {
    pub d: Option<usize>,
    pub k: Option<usize>,
    pub r: Option<char>,
    pub cht: Option<u64>,
    pub bl: Option<usize>,
    pub lambda: Option<f64>,
    pub maxst: Option<u64>,
    pub dbg: Option<u8>,
}

/// Defaults matching the reference tool's documented `--help` text.
pub struct RawConfig {
    pub d: usize,
    pub k: usize,
    pub r: char,
    pub cht: u64,
    pub bl: usize,
    pub lambda: Option<f64>,
    pub maxst: u64,
    pub dbg: u8,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            d: 3,
            k: 4,
            r: 'a',
            cht: 100,
            bl: 1000,
            lambda: None,
            maxst: 1_000_000,
            dbg: 0,
        }
    }
}

impl SimConfigOverride {
    pub fn apply_to(&self, raw: &mut RawConfig) {
        if let Some(v) = self.d {
            raw.d = v;
        }
        if let Some(v) = self.k {
            raw.k = v;
        }
        if let Some(v) = self.r {
            raw.r = v;
        }
        if let Some(v) = self.cht {
            raw.cht = v;
        }
        if let Some(v) = self.bl {
            raw.bl = v;
        }
        if let Some(v) = self.lambda {
            raw.lambda = Some(v);
        }
        if let Some(v) = self.maxst {
            raw.maxst = v;
        }
        if let Some(v) = self.dbg {
            raw.dbg = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_help_text() {
        let raw = RawConfig::default();
        assert_eq!(raw.d, 3);
        assert_eq!(raw.k, 4);
        assert_eq!(raw.r, 'a');
        assert_eq!(raw.cht, 100);
        assert_eq!(raw.bl, 1000);
        assert_eq!(raw.maxst, 1_000_000);
        assert_eq!(raw.dbg, 0);
    }

    #[test]
    fn rejects_unknown_rule() {
        let err = SimConfig::build(3, 4, 'z', 100, 1000, 1.0, 1000, 0).unwrap_err();
        assert_eq!(err, ConfigError::UnknownRule('z'));
    }

    #[test]
    fn rejects_non_positive_lambda() {
        let err = SimConfig::build(3, 4, 'a', 100, 1000, 0.0, 1000, 0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "lambda", .. }));
    }

    #[test]
    fn derives_node_port_channel_counts() {
        let cfg = SimConfig::build(2, 4, 'a', 100, 1000, 1.0, 1000, 0).unwrap();
        assert_eq!(cfg.n_nodes(), 16);
        assert_eq!(cfg.n_ports(), 4);
        assert_eq!(cfg.n_chan(), 64);
    }
}
