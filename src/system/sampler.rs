use std::io;
use std::mem;
use std::time::Duration;

use chrono::Local;

use crate::error::{RunError, SourceError};
use crate::shutdown::Shutdown;
use crate::system::snapshot::{CpuReading, CpuUsage, HostIdentity, UtilizationSnapshot};
use crate::system::source::{CounterSource, TableSource};
use crate::system::usage;

pub const MAX_TRACKED_CORES: usize = 4096;

pub trait Renderer {
    fn start(&mut self, _host: &HostIdentity) -> io::Result<()> {
        Ok(())
    }

    fn render(&mut self, host: &HostIdentity, snapshot: &UtilizationSnapshot) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    pub interval: Duration,
    /// `None` tracks as many cores as the host reports.
    pub max_cores: Option<usize>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            interval: Duration::from_secs(2),
            max_cores: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerState {
    Initializing,
    Sampling,
    Draining,
    Stopped,
}

pub struct Sampler<S> {
    source: CounterSource<S>,
    host: HostIdentity,
    interval: Duration,
    max_cores: usize,
    prev: CpuReading,
    curr: CpuReading,
    state: SamplerState,
}

fn resolve_max_cores(configured: Option<usize>, logical_cpus: usize) -> usize {
    let wanted = match configured {
        Some(n) if n > 0 => n,
        _ if logical_cpus > 0 => logical_cpus,
        _ => MAX_TRACKED_CORES,
    };
    wanted.min(MAX_TRACKED_CORES)
}

impl<S: TableSource> Sampler<S> {
    pub fn initialize(source: CounterSource<S>, config: &SamplerConfig) -> Result<Self, SourceError> {
        let host = source.read_host_identity()?;
        let max_cores = resolve_max_cores(config.max_cores, host.logical_cpus);
        let prev = source.read_cpu_times(max_cores)?;
        let curr = CpuReading::with_capacity(prev.core_count());

        tracing::info!(
            model = %host.model_name,
            logical_cpus = host.logical_cpus,
            physical_cores = host.physical_cores,
            tracked_cores = prev.core_count(),
            max_cores,
            "sampler initialized"
        );

        Ok(Sampler {
            source,
            host,
            interval: config.interval,
            max_cores,
            prev,
            curr,
            state: SamplerState::Initializing,
        })
    }

    pub fn host(&self) -> &HostIdentity {
        &self.host
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_cores(&self) -> usize {
        self.max_cores
    }

    pub fn tracked_cores(&self) -> usize {
        self.prev.core_count()
    }

    fn transition(&mut self, next: SamplerState) {
        tracing::debug!(from = ?self.state, to = ?next, "sampler state");
        self.state = next;
    }

    pub fn tick(&mut self) -> Result<UtilizationSnapshot, SourceError> {
        self.source
            .read_cpu_times_into(self.max_cores, &mut self.curr)?;

        let cpu = usage::cpu_usage(&self.prev.aggregate, &self.curr.aggregate);
        if cpu.is_stale() {
            tracing::warn!("aggregate cpu counters went backwards, reporting stale");
        }

        let per_core: Vec<CpuUsage> = self
            .curr
            .per_core
            .iter()
            .enumerate()
            .map(|(i, curr)| match self.prev.per_core.get(i) {
                Some(prev) => usage::cpu_usage(prev, curr),
                None => CpuUsage::Stale,
            })
            .collect();

        if self.curr.core_count() != self.prev.core_count() {
            tracing::warn!(
                before = self.prev.core_count(),
                after = self.curr.core_count(),
                "core count changed between samples"
            );
        }

        let memory = usage::memory_usage(&self.source.read_memory()?);

        mem::swap(&mut self.prev, &mut self.curr);

        tracing::trace!(
            cpu = cpu.percent(),
            cores = per_core.len(),
            mem_percent = memory.used_percent,
            "tick"
        );

        Ok(UtilizationSnapshot {
            taken_at: Local::now(),
            cpu,
            per_core,
            memory,
        })
    }

    /// Samples until `shutdown` is set or a read fails, then releases the
    /// renderer. Returns the number of rendered ticks.
    pub async fn run(
        &mut self,
        renderer: &mut dyn Renderer,
        shutdown: &Shutdown,
    ) -> Result<u64, RunError> {
        self.transition(SamplerState::Sampling);
        let outcome = self.sample_until_stopped(renderer, shutdown).await;

        self.transition(SamplerState::Draining);
        if let Err(err) = &outcome {
            tracing::error!(error = %err, "sampling stopped");
        }
        let released = renderer.finish();
        self.prev = CpuReading::default();
        self.curr = CpuReading::default();
        self.transition(SamplerState::Stopped);

        match (outcome, released) {
            (Ok(ticks), Ok(())) => Ok(ticks),
            (Ok(_), Err(err)) => Err(RunError::Render(err)),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(release_err)) => {
                tracing::warn!(error = %release_err, "renderer release failed");
                Err(err)
            }
        }
    }

    async fn sample_until_stopped(
        &mut self,
        renderer: &mut dyn Renderer,
        shutdown: &Shutdown,
    ) -> Result<u64, RunError> {
        renderer.start(&self.host).map_err(RunError::Render)?;

        let mut ticks = 0u64;
        loop {
            if shutdown.wait(self.interval).await {
                tracing::debug!(ticks, "shutdown observed");
                return Ok(ticks);
            }
            let snapshot = self.tick()?;
            renderer
                .render(&self.host, &snapshot)
                .map_err(RunError::Render)?;
            ticks += 1;
        }
    }
}
