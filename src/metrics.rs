//! Settlement counters

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub wagers_settled: u64,
    pub wagers_won: u64,
    pub wagers_rejected: u64,
    pub volume_staked: u64,
    pub volume_paid_out: u64,
    pub fees_collected: u64,
}

impl MetricsSnapshot {
    pub fn wagers_lost(&self) -> u64 {
        self.wagers_settled.saturating_sub(self.wagers_won)
    }

    pub fn win_rate(&self) -> f64 {
        if self.wagers_settled == 0 {
            return 0.0;
        }
        self.wagers_won as f64 / self.wagers_settled as f64
    }
}

pub struct SettlementMetrics {
    start_time: Instant,
    wagers_settled: AtomicU64,
    wagers_won: AtomicU64,
    wagers_rejected: AtomicU64,
    volume_staked: AtomicU64,
    volume_paid_out: AtomicU64,
    fees_collected: AtomicU64,
}

impl SettlementMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            wagers_settled: AtomicU64::new(0),
            wagers_won: AtomicU64::new(0),
            wagers_rejected: AtomicU64::new(0),
            volume_staked: AtomicU64::new(0),
            volume_paid_out: AtomicU64::new(0),
            fees_collected: AtomicU64::new(0),
        }
    }

    pub fn record_settled(&self, stake: u64, fee: u64, payout: Option<u64>) {
        self.wagers_settled.fetch_add(1, Ordering::SeqCst);
        self.volume_staked.fetch_add(stake, Ordering::Relaxed);
        self.fees_collected.fetch_add(fee, Ordering::Relaxed);
        if let Some(paid) = payout {
            self.wagers_won.fetch_add(1, Ordering::SeqCst);
            self.volume_paid_out.fetch_add(paid, Ordering::Relaxed);
        }
    }

    pub fn record_rejected(&self) {
        self.wagers_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Wins are read before settlements; `record_settled` bumps them in the
    /// opposite order, so a snapshot never shows more wins than settlements.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let wagers_won = self.wagers_won.load(Ordering::SeqCst);
        MetricsSnapshot {
            wagers_settled: self.wagers_settled.load(Ordering::SeqCst),
            wagers_won,
            wagers_rejected: self.wagers_rejected.load(Ordering::Relaxed),
            volume_staked: self.volume_staked.load(Ordering::Relaxed),
            volume_paid_out: self.volume_paid_out.load(Ordering::Relaxed),
            fees_collected: self.fees_collected.load(Ordering::Relaxed),
        }
    }

    /// Render counters in the Prometheus text exposition format
    pub fn to_prometheus_format(&self) -> String {
        let s = self.snapshot();
        let mut out = String::new();
        let counters = [
            ("wager_settled_total", "Wagers settled", s.wagers_settled),
            ("wager_won_total", "Wagers won by the player", s.wagers_won),
            ("wager_rejected_total", "Wagers rejected before any transfer", s.wagers_rejected),
            ("wager_staked_volume_total", "Stake volume in smallest units", s.volume_staked),
            ("wager_payout_volume_total", "Payout volume in smallest units", s.volume_paid_out),
            ("wager_fees_total", "Fees collected in smallest units", s.fees_collected),
        ];
        for (name, help, value) in counters {
            let _ = writeln!(out, "# HELP {} {}", name, help);
            let _ = writeln!(out, "# TYPE {} counter", name);
            let _ = writeln!(out, "{} {}", name, value);
        }
        let _ = writeln!(out, "# TYPE wager_uptime_seconds gauge");
        let _ = writeln!(out, "wager_uptime_seconds {}", self.start_time.elapsed().as_secs());
        out
    }
}

impl Default for SettlementMetrics {
    fn default() -> Self {
        Self::new()
    }
}
