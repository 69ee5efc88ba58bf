//! Simulated telemetry ticker
//!
//! Produces cosmetic, non-authoritative KPI snapshots for the live strip.
//! Nothing here is a measurement and nothing here feeds the scoring engine.
//!
//! Global invariants enforced:
//! - All state lives in the `Ticker` value; no globals
//! - Identical config yields an identical snapshot sequence
//! - Every snapshot is flagged `simulated`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const AUTH_PER_SEC_BASE: f64 = 1240.0;
const AUTH_PER_SEC_AMPLITUDE: f64 = 140.0;
const RETRY_INDEX_BASE: f64 = 1.42;
const RETRY_INDEX_AMPLITUDE: f64 = 0.18;
const MIX_LOW_BASE: f64 = 0.18;
const MIX_HIGH_BASE: f64 = 0.22;
const MIX_AMPLITUDE: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerConfig {
    pub seed: u64,
    pub interval_ms: u64,
    /// Wall-clock time of tick 0, in ms since the Unix epoch
    pub start_ms: u64,
}

/// Share of Low/Medium/High in the simulated mix; sums to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMix {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// One immutable frame of simulated telemetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TickerSnapshot {
    pub tick: u64,
    pub timestamp_ms: u64,
    pub auth_per_sec: f64,
    pub retry_index: f64,
    pub mix: RiskMix,
    pub simulated: bool,
}

/// Seeded producer of [`TickerSnapshot`]s
pub struct Ticker {
    config: TickerConfig,
    rng: StdRng,
    tick: u64,
}

impl Ticker {
    pub fn new(config: TickerConfig) -> Self {
        Ticker {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            tick: 0,
        }
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// Uniform sample in [base - amplitude, base + amplitude], floored at 0
    fn jitter(&mut self, base: f64, amplitude: f64) -> f64 {
        let offset = self.rng.gen_range(-1.0f64..=1.0) * amplitude;
        (base + offset).max(0.0)
    }

    fn next_snapshot(&mut self) -> TickerSnapshot {
        let auth_per_sec = self.jitter(AUTH_PER_SEC_BASE, AUTH_PER_SEC_AMPLITUDE);
        let retry_index = self.jitter(RETRY_INDEX_BASE, RETRY_INDEX_AMPLITUDE);
        let low = self.jitter(MIX_LOW_BASE, MIX_AMPLITUDE);
        let high = self.jitter(MIX_HIGH_BASE, MIX_AMPLITUDE);

        let snapshot = TickerSnapshot {
            tick: self.tick,
            timestamp_ms: self
                .config
                .start_ms
                .saturating_add(self.tick.saturating_mul(self.config.interval_ms)),
            auth_per_sec,
            retry_index,
            mix: RiskMix {
                low,
                medium: 1.0 - low - high,
                high,
            },
            simulated: true,
        };
        self.tick += 1;
        snapshot
    }
}

impl Iterator for Ticker {
    type Item = TickerSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_snapshot())
    }
}
