use crate::system::snapshot::{CpuTimes, CpuUsage, MemorySnapshot, MemoryUsage};

/// Counters that went backwards, or idle outrunning total, yield `Stale`.
pub fn cpu_usage(prev: &CpuTimes, curr: &CpuTimes) -> CpuUsage {
    let (prev_total, curr_total) = (prev.total_ticks(), curr.total_ticks());
    let (prev_idle, curr_idle) = (prev.idle_ticks(), curr.idle_ticks());

    let (Some(delta_total), Some(delta_idle)) = (
        curr_total.checked_sub(prev_total),
        curr_idle.checked_sub(prev_idle),
    ) else {
        return CpuUsage::Stale;
    };

    if delta_total == 0 {
        return CpuUsage::Measured(0.0);
    }
    if delta_idle > delta_total {
        return CpuUsage::Stale;
    }

    CpuUsage::Measured((delta_total - delta_idle) as f64 * 100.0 / delta_total as f64)
}

pub fn usage_percent(prev: &CpuTimes, curr: &CpuTimes) -> f64 {
    cpu_usage(prev, curr).percent()
}

pub fn used_kb(m: &MemorySnapshot) -> u64 {
    if m.available > 0 {
        m.total.saturating_sub(m.available)
    } else {
        m.total
            .saturating_sub(m.free)
            .saturating_sub(m.buffers)
            .saturating_sub(m.cached)
    }
}

pub fn used_percent(m: &MemorySnapshot) -> f64 {
    if m.total == 0 {
        return 0.0;
    }
    used_kb(m) as f64 * 100.0 / m.total as f64
}

pub fn swap_used_kb(m: &MemorySnapshot) -> u64 {
    m.swap_total.saturating_sub(m.swap_free)
}

pub fn memory_usage(m: &MemorySnapshot) -> MemoryUsage {
    MemoryUsage {
        total_kb: m.total,
        used_kb: used_kb(m),
        used_percent: used_percent(m),
        swap_total_kb: m.swap_total,
        swap_used_kb: swap_used_kb(m),
    }
}
