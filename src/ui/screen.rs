//! Full-screen layout expressed as positioned text.
//!
//! The interactive renderer draws whatever this produces; nothing here
//! touches the terminal.

use crate::format::{format_kb_as_gb, format_usage};
use crate::system::snapshot::{CpuUsage, HostIdentity, UtilizationSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Title,
    Label,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Plain(Tone),
    Heat(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub paint: Paint,
}

impl Placed {
    fn new(row: u16, col: u16, text: impl Into<String>, paint: Paint) -> Self {
        Placed {
            row,
            col,
            text: text.into(),
            paint,
        }
    }
}

const QUIT_HINT: &str = "q/Esc: quit";

fn heat_of(usage: CpuUsage) -> Paint {
    match usage {
        CpuUsage::Measured(pct) => Paint::Heat(pct),
        CpuUsage::Stale => Paint::Plain(Tone::Muted),
    }
}

fn host_lines(host: &HostIdentity) -> Vec<Placed> {
    vec![
        Placed::new(0, 0, format!("CPU: {}", host.model_name), Paint::Plain(Tone::Title)),
        Placed::new(
            1,
            0,
            format!(
                "Logical processors: {} | Physical cores: {}",
                host.logical_cpus, host.physical_cores
            ),
            Paint::Plain(Tone::Label),
        ),
    ]
}

pub fn waiting_layout(host: &HostIdentity) -> Vec<Placed> {
    let mut out = host_lines(host);
    out.push(Placed::new(3, 0, "Sampling...", Paint::Plain(Tone::Muted)));
    out.push(Placed::new(5, 0, QUIT_HINT, Paint::Plain(Tone::Muted)));
    out
}

pub fn layout(host: &HostIdentity, snapshot: &UtilizationSnapshot) -> Vec<Placed> {
    let mut out = host_lines(host);
    out.reserve(snapshot.per_core.len() + 5);

    out.push(Placed::new(
        3,
        0,
        format!("Total CPU usage: {}", format_usage(snapshot.cpu, 2)),
        heat_of(snapshot.cpu),
    ));

    let mut row: u16 = 4;
    for (i, usage) in snapshot.per_core.iter().enumerate() {
        out.push(Placed::new(
            row,
            0,
            format!("Core {i}: {}", format_usage(*usage, 2)),
            heat_of(*usage),
        ));
        row = row.saturating_add(1);
    }

    let mem = &snapshot.memory;
    out.push(Placed::new(
        row,
        0,
        format!(
            "RAM total: {} | RAM used: {} ({:.1}%)",
            format_kb_as_gb(mem.total_kb),
            format_kb_as_gb(mem.used_kb),
            mem.used_percent
        ),
        Paint::Heat(mem.used_percent),
    ));
    out.push(Placed::new(
        row.saturating_add(1),
        0,
        format!(
            "Swap used: {} of {}",
            format_kb_as_gb(mem.swap_used_kb),
            format_kb_as_gb(mem.swap_total_kb)
        ),
        Paint::Plain(Tone::Label),
    ));
    out.push(Placed::new(
        row.saturating_add(3),
        0,
        format!(
            "{QUIT_HINT}  |  updated {}",
            snapshot.taken_at.format("%H:%M:%S")
        ),
        Paint::Plain(Tone::Muted),
    ));
    out
}
