use std::io::{self, Write};
use std::time::Duration;

use crate::format::{format_kb_as_gb, format_usage};
use crate::system::sampler::Renderer;
use crate::system::snapshot::{HostIdentity, UtilizationSnapshot};

pub struct PlainRenderer<W: Write> {
    out: W,
    interval: Duration,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(out: W, interval: Duration) -> Self {
        Self { out, interval }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn banner(host: &HostIdentity, interval: Duration) -> String {
    format!(
        "CPU: {}\nLogical processors: {} | Physical cores: {}\nSampling every {}s. Press Ctrl+C to exit.",
        host.model_name,
        host.logical_cpus,
        host.physical_cores,
        interval.as_secs()
    )
}

pub fn format_line(snapshot: &UtilizationSnapshot) -> String {
    let mem = &snapshot.memory;
    let mut line = format!(
        "[{}] CPU: {} | RAM total: {} | RAM used: {} ({:.2}%) | Swap used: {}",
        snapshot.taken_at.format("%Y-%m-%d %H:%M:%S"),
        format_usage(snapshot.cpu, 2),
        format_kb_as_gb(mem.total_kb),
        format_kb_as_gb(mem.used_kb),
        mem.used_percent,
        format_kb_as_gb(mem.swap_used_kb),
    );
    if !snapshot.per_core.is_empty() {
        let cores: Vec<String> = snapshot
            .per_core
            .iter()
            .map(|u| format_usage(*u, 1))
            .collect();
        line.push_str(" | Cores: ");
        line.push_str(&cores.join(" "));
    }
    line
}

impl<W: Write> Renderer for PlainRenderer<W> {
    fn start(&mut self, host: &HostIdentity) -> io::Result<()> {
        writeln!(self.out, "{}", banner(host, self.interval))?;
        self.out.flush()
    }

    fn render(&mut self, _host: &HostIdentity, snapshot: &UtilizationSnapshot) -> io::Result<()> {
        writeln!(self.out, "{}", format_line(snapshot))?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// A `{"host": ...}` header line, then one JSON object per tick.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn start(&mut self, host: &HostIdentity) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &serde_json::json!({ "host": host }))?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    fn render(&mut self, _host: &HostIdentity, snapshot: &UtilizationSnapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
