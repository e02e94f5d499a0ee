use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::system::snapshot::{CpuReading, CpuTimes, HostIdentity, MemorySnapshot, UNKNOWN_MODEL};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    CpuTimes,
    MemInfo,
    CpuInfo,
}

impl Table {
    pub fn file_name(self) -> &'static str {
        match self {
            Table::CpuTimes => "stat",
            Table::MemInfo => "meminfo",
            Table::CpuInfo => "cpuinfo",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/proc/{}", self.file_name())
    }
}

pub trait TableSource {
    fn read(&self, table: Table) -> io::Result<String>;
}

impl<T: TableSource + ?Sized> TableSource for &T {
    fn read(&self, table: Table) -> io::Result<String> {
        (**self).read(table)
    }
}

#[derive(Clone, Debug)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcFs {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    pub fn with_root(root: impl AsRef<Path>) -> Self {
        ProcFs {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_of(&self, table: Table) -> PathBuf {
        self.root.join(table.file_name())
    }
}

impl TableSource for ProcFs {
    fn read(&self, table: Table) -> io::Result<String> {
        std::fs::read_to_string(self.path_of(table))
    }
}

#[derive(Clone, Debug, Default)]
pub struct CounterSource<S> {
    tables: S,
}

impl<S: TableSource> CounterSource<S> {
    pub fn new(tables: S) -> Self {
        CounterSource { tables }
    }

    fn fetch(&self, table: Table) -> Result<String, SourceError> {
        self.tables
            .read(table)
            .map_err(|source| SourceError::Unavailable { table, source })
    }

    pub fn read_cpu_times(&self, max_cores: usize) -> Result<CpuReading, SourceError> {
        let mut reading = CpuReading::default();
        self.read_cpu_times_into(max_cores, &mut reading)?;
        Ok(reading)
    }

    /// Overwrites `reading` in place and returns the number of per-core
    /// lines kept. Lines past `max_cores` are dropped.
    pub fn read_cpu_times_into(
        &self,
        max_cores: usize,
        reading: &mut CpuReading,
    ) -> Result<usize, SourceError> {
        let text = self.fetch(Table::CpuTimes)?;
        if !parse_cpu_table(&text, max_cores, reading) {
            return Err(SourceError::MissingHeader {
                table: Table::CpuTimes,
            });
        }
        Ok(reading.core_count())
    }

    pub fn read_memory(&self) -> Result<MemorySnapshot, SourceError> {
        let text = self.fetch(Table::MemInfo)?;
        Ok(parse_meminfo(&text))
    }

    pub fn read_host_identity(&self) -> Result<HostIdentity, SourceError> {
        let text = self.fetch(Table::CpuInfo)?;
        Ok(parse_cpuinfo(&text))
    }
}

/// user, nice, system, idle: older kernels stop there.
const REQUIRED_AGGREGATE_FIELDS: usize = 4;

/// Fills `out` from a CPU time table. Returns false when the aggregate
/// `cpu` line is absent or lacks numeric user/nice/system/idle columns.
pub fn parse_cpu_table(text: &str, max_cores: usize, out: &mut CpuReading) -> bool {
    out.per_core.clear();
    let mut saw_aggregate = false;

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        let Some(label) = tokens.next() else {
            continue;
        };
        let Some(suffix) = label.strip_prefix("cpu") else {
            continue;
        };

        if suffix.is_empty() {
            if !saw_aggregate {
                let (times, numeric) = parse_times(tokens);
                if numeric < REQUIRED_AGGREGATE_FIELDS {
                    return false;
                }
                out.aggregate = times;
                saw_aggregate = true;
            }
        } else if suffix.bytes().all(|b| b.is_ascii_digit()) && out.per_core.len() < max_cores {
            out.per_core.push(parse_times(tokens).0);
        }
    }

    saw_aggregate
}

/// Unparseable or missing columns read as zero. Also returns how many
/// leading columns were numeric.
fn parse_times<'a>(tokens: impl Iterator<Item = &'a str>) -> (CpuTimes, usize) {
    let mut fields = [0u64; CpuTimes::FIELD_COUNT];
    let mut numeric = 0;
    let mut leading = true;
    for (slot, tok) in fields.iter_mut().zip(tokens) {
        match tok.parse() {
            Ok(value) => {
                *slot = value;
                if leading {
                    numeric += 1;
                }
            }
            Err(_) => leading = false,
        }
    }
    (CpuTimes::from_fields(&fields), numeric)
}

type MemSlot = fn(&mut MemorySnapshot) -> &mut u64;

const MEMINFO_SCHEMA: [(&str, MemSlot); 7] = [
    ("MemTotal", |m| &mut m.total),
    ("MemFree", |m| &mut m.free),
    ("MemAvailable", |m| &mut m.available),
    ("Buffers", |m| &mut m.buffers),
    ("Cached", |m| &mut m.cached),
    ("SwapTotal", |m| &mut m.swap_total),
    ("SwapFree", |m| &mut m.swap_free),
];

/// Keyed `Name: value kB` lines. Keys outside the schema are skipped and
/// schema keys that never appear stay zero.
pub fn parse_meminfo(text: &str) -> MemorySnapshot {
    let mut mem = MemorySnapshot::default();
    let mut seen = [false; MEMINFO_SCHEMA.len()];

    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let Some(idx) = MEMINFO_SCHEMA.iter().position(|(k, _)| *k == key) else {
            continue;
        };
        // first occurrence wins
        if seen[idx] {
            continue;
        }
        let Some(value) = rest.split_whitespace().next().and_then(|v| v.parse().ok()) else {
            continue;
        };
        *(MEMINFO_SCHEMA[idx].1)(&mut mem) = value;
        seen[idx] = true;
    }

    mem
}

pub fn parse_cpuinfo(text: &str) -> HostIdentity {
    let mut identity = HostIdentity {
        logical_cpus: 0,
        physical_cores: 0,
        model_name: String::new(),
    };
    let mut saw_cores = false;

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "processor" => identity.logical_cpus += 1,
            "cpu cores" if !saw_cores => {
                if let Ok(cores) = value.parse() {
                    identity.physical_cores = cores;
                    saw_cores = true;
                }
            }
            "model name" if identity.model_name.is_empty() => {
                identity.model_name = value.to_string();
            }
            _ => {}
        }
    }

    if identity.model_name.is_empty() {
        identity.model_name = UNKNOWN_MODEL.to_string();
    }
    identity
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "\
cpu  100 0 50 850 0 0 0 0 0 0
cpu0 25 0 10 215 0 0 0 0 0 0
cpu1 25 0 15 210 0 0 0 0 0 0
cpu2 25 0 10 215 0 0 0 0 0 0
cpu3 25 0 15 210 0 0 0 0 0 0
intr 12345 0 0
ctxt 99999
btime 1700000000
";

    #[test]
    fn parses_aggregate_and_cores() {
        let mut reading = CpuReading::default();
        assert!(parse_cpu_table(STAT, 8, &mut reading));
        assert_eq!(reading.aggregate.user, 100);
        assert_eq!(reading.aggregate.idle, 850);
        assert_eq!(reading.core_count(), 4);
        assert_eq!(reading.per_core[1].system, 15);
    }

    #[test]
    fn extra_core_lines_are_dropped() {
        let mut reading = CpuReading::default();
        assert!(parse_cpu_table(STAT, 2, &mut reading));
        assert_eq!(reading.core_count(), 2);
    }

    #[test]
    fn missing_aggregate_is_reported() {
        let mut reading = CpuReading::default();
        assert!(!parse_cpu_table("cpu0 1 2 3 4\nintr 5\n", 8, &mut reading));
        assert!(!parse_cpu_table("", 8, &mut reading));
    }

    #[test]
    fn short_and_garbled_cpu_lines_default_to_zero() {
        let mut reading = CpuReading::default();
        assert!(parse_cpu_table("cpu 10 0 30 40 x 6\ncpu0 7 y 9\n", 4, &mut reading));
        assert_eq!(reading.aggregate.user, 10);
        assert_eq!(reading.aggregate.system, 30);
        assert_eq!(reading.aggregate.idle, 40);
        assert_eq!(reading.aggregate.iowait, 0);
        assert_eq!(reading.aggregate.irq, 6);
        assert_eq!(reading.aggregate.steal, 0);
        assert_eq!(reading.per_core[0].user, 7);
        assert_eq!(reading.per_core[0].nice, 0);
        assert_eq!(reading.per_core[0].system, 9);
    }

    #[test]
    fn malformed_aggregate_is_rejected() {
        let mut reading = CpuReading::default();
        assert!(!parse_cpu_table("cpu\ncpu0 1 2 3 4\n", 8, &mut reading));
        assert!(!parse_cpu_table("cpu x y z w\n", 8, &mut reading));
        assert!(!parse_cpu_table("cpu 10 x 30 40\n", 8, &mut reading));
        assert!(!parse_cpu_table("cpu 10 20 30\n", 8, &mut reading));
        // four columns is the oldest layout still accepted
        assert!(parse_cpu_table("cpu 10 20 30 40\n", 8, &mut reading));
        assert_eq!(reading.aggregate.idle, 40);
    }

    #[test]
    fn empty_aggregate_is_missing_header() {
        struct Fixed(&'static str);
        impl TableSource for Fixed {
            fn read(&self, _table: Table) -> io::Result<String> {
                Ok(self.0.to_string())
            }
        }

        let err = CounterSource::new(Fixed("cpu\n"))
            .read_cpu_times(4)
            .unwrap_err();
        assert!(matches!(
            err,
            SourceError::MissingHeader {
                table: Table::CpuTimes
            }
        ));
    }

    #[test]
    fn reuses_core_buffer_between_reads() {
        let mut reading = CpuReading::with_capacity(8);
        parse_cpu_table(STAT, 8, &mut reading);
        let ptr = reading.per_core.as_ptr();
        parse_cpu_table(STAT, 8, &mut reading);
        assert_eq!(reading.per_core.as_ptr(), ptr);
        assert_eq!(reading.core_count(), 4);
    }

    #[test]
    fn meminfo_reads_schema_fields() {
        let text = "\
MemTotal:       16000000 kB
MemFree:         4000000 kB
MemAvailable:    8000000 kB
Buffers:          500000 kB
Cached:          1500000 kB
SwapCached:         1000 kB
SwapTotal:       2000000 kB
SwapFree:        1500000 kB
";
        let mem = parse_meminfo(text);
        assert_eq!(mem.total, 16_000_000);
        assert_eq!(mem.available, 8_000_000);
        assert_eq!(mem.cached, 1_500_000);
        assert_eq!(mem.swap_total, 2_000_000);
        assert_eq!(mem.swap_free, 1_500_000);
    }

    #[test]
    fn meminfo_fills_every_schema_field_once() {
        let text = "\
MemTotal: 7 kB
MemFree: 6 kB
MemAvailable: 5 kB
Buffers: 4 kB
Cached: 3 kB
SwapTotal: 2 kB
SwapFree: 1 kB
MemTotal: 99 kB
";
        let mem = parse_meminfo(text);
        assert_eq!(
            mem,
            MemorySnapshot {
                total: 7,
                free: 6,
                available: 5,
                buffers: 4,
                cached: 3,
                swap_total: 2,
                swap_free: 1,
            }
        );
    }

    #[test]
    fn meminfo_missing_fields_are_zero() {
        let mem = parse_meminfo("MemTotal: 1024 kB\nbogus line\nMemFree: nope kB\n");
        assert_eq!(mem.total, 1024);
        assert_eq!(mem.free, 0);
        assert_eq!(mem.available, 0);
    }

    #[test]
    fn cpuinfo_counts_processors() {
        let text = "\
processor\t: 0
model name\t: Example CPU @ 3.00GHz
cpu cores\t: 2

processor\t: 1
model name\t: Example CPU @ 3.00GHz
cpu cores\t: 2
";
        let id = parse_cpuinfo(text);
        assert_eq!(id.logical_cpus, 2);
        assert_eq!(id.physical_cores, 2);
        assert_eq!(id.model_name, "Example CPU @ 3.00GHz");
    }

    #[test]
    fn cpuinfo_defaults_when_fields_absent() {
        let id = parse_cpuinfo("processor : 0\nBogoMIPS : 50.00\n");
        assert_eq!(id.logical_cpus, 1);
        assert_eq!(id.physical_cores, 0);
        assert_eq!(id.model_name, UNKNOWN_MODEL);
    }

    #[test]
    fn unreadable_table_is_unavailable() {
        let source = CounterSource::new(ProcFs::with_root("/nonexistent/hostmon"));
        let err = source.read_cpu_times(4).unwrap_err();
        assert!(matches!(
            err,
            SourceError::Unavailable {
                table: Table::CpuTimes,
                ..
            }
        ));
        assert!(source.read_host_identity().is_err());
        assert!(source.read_memory().is_err());
    }
}
