use chrono::{DateTime, Local};
use serde::Serialize;

/// Cumulative CPU time accounting for one logical unit, in ticks since boot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuTimes {
    pub const FIELD_COUNT: usize = 10;

    /// Builds a snapshot from fields in kernel column order. Missing
    /// trailing columns read as zero.
    pub fn from_fields(fields: &[u64]) -> Self {
        let at = |i: usize| fields.get(i).copied().unwrap_or(0);
        CpuTimes {
            user: at(0),
            nice: at(1),
            system: at(2),
            idle: at(3),
            iowait: at(4),
            irq: at(5),
            softirq: at(6),
            steal: at(7),
            guest: at(8),
            guest_nice: at(9),
        }
    }

    pub fn idle_ticks(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn total_ticks(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
            self.guest,
            self.guest_nice,
        ]
        .iter()
        .fold(0u64, |acc, v| acc.saturating_add(*v))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuReading {
    pub aggregate: CpuTimes,
    pub per_core: Vec<CpuTimes>,
}

impl CpuReading {
    pub fn with_capacity(cores: usize) -> Self {
        CpuReading {
            aggregate: CpuTimes::default(),
            per_core: Vec::with_capacity(cores),
        }
    }

    pub fn core_count(&self) -> usize {
        self.per_core.len()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total: u64,
    pub free: u64,
    pub available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

pub const UNKNOWN_MODEL: &str = "unknown";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HostIdentity {
    pub logical_cpus: usize,
    pub physical_cores: usize,
    pub model_name: String,
}

impl Default for HostIdentity {
    fn default() -> Self {
        HostIdentity {
            logical_cpus: 0,
            physical_cores: 0,
            model_name: UNKNOWN_MODEL.to_string(),
        }
    }
}

/// `Stale` marks an interval whose counters went backwards (reset or
/// wrap); it serializes as `null` and reads as 0.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CpuUsage {
    Measured(f64),
    Stale,
}

impl CpuUsage {
    pub fn percent(self) -> f64 {
        match self {
            CpuUsage::Measured(p) => p,
            CpuUsage::Stale => 0.0,
        }
    }

    pub fn is_stale(self) -> bool {
        matches!(self, CpuUsage::Stale)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MemoryUsage {
    pub total_kb: u64,
    pub used_kb: u64,
    pub used_percent: f64,
    pub swap_total_kb: u64,
    pub swap_used_kb: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UtilizationSnapshot {
    pub taken_at: DateTime<Local>,
    pub cpu: CpuUsage,
    pub per_core: Vec<CpuUsage>,
    pub memory: MemoryUsage,
}
