use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hostmon::shutdown::Shutdown;
use hostmon::system::sampler::Renderer;
use hostmon::system::snapshot::{HostIdentity, UtilizationSnapshot};

pub const CPUINFO_4: &str = "\
processor\t: 0
model name\t: Fixture CPU @ 2.40GHz
cpu cores\t: 2

processor\t: 1
model name\t: Fixture CPU @ 2.40GHz
cpu cores\t: 2

processor\t: 2
model name\t: Fixture CPU @ 2.40GHz
cpu cores\t: 2

processor\t: 3
model name\t: Fixture CPU @ 2.40GHz
cpu cores\t: 2
";

pub const STAT_4: &str = "\
cpu  100 0 50 850 0 0 0 0 0 0
cpu0 25 0 10 215 0 0 0 0 0 0
cpu1 25 0 15 210 0 0 0 0 0 0
cpu2 25 0 10 215 0 0 0 0 0 0
cpu3 25 0 15 210 0 0 0 0 0 0
intr 1 2 3
";

pub const STAT_4_LATER: &str = "\
cpu  110 0 55 935 0 0 0 0 0 0
cpu0 30 0 10 235 0 0 0 0 0 0
cpu1 25 0 15 235 0 0 0 0 0 0
cpu2 30 0 15 230 0 0 0 0 0 0
cpu3 25 0 15 235 0 0 0 0 0 0
intr 1 2 3
";

pub const MEMINFO_FALLBACK: &str = "\
MemTotal:       16000000 kB
MemFree:         4000000 kB
Buffers:          500000 kB
Cached:          1500000 kB
SwapTotal:       2000000 kB
SwapFree:        2000000 kB
";

/// A throwaway directory laid out like `/proc`.
pub struct Fixture {
    pub root: PathBuf,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("hostmon_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        Fixture { root }
    }

    pub fn write(&self, file: &str, contents: &str) -> &Self {
        fs::write(self.root.join(file), contents).unwrap();
        self
    }

    pub fn remove(&self, file: &str) {
        fs::remove_file(self.root.join(file)).unwrap();
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Keeps every frame; optionally acts after a number of frames.
#[derive(Default)]
pub struct Recording<'a> {
    pub started: bool,
    pub finished: bool,
    pub frames: Vec<UtilizationSnapshot>,
    pub stop_after: Option<(usize, Shutdown)>,
    pub after_first: Option<Box<dyn FnMut() + 'a>>,
}

impl Renderer for Recording<'_> {
    fn start(&mut self, _host: &HostIdentity) -> io::Result<()> {
        self.started = true;
        Ok(())
    }

    fn render(&mut self, _host: &HostIdentity, snapshot: &UtilizationSnapshot) -> io::Result<()> {
        self.frames.push(snapshot.clone());
        if self.frames.len() == 1
            && let Some(hook) = self.after_first.as_mut()
        {
            hook();
        }
        if let Some((n, shutdown)) = &self.stop_after
            && self.frames.len() >= *n
        {
            shutdown.trigger();
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}
