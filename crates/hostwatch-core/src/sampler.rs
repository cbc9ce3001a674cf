//! Local host sampler backed by `sysinfo`.
//!
//! Keeps one `System` and one `Disks` instance alive so CPU usage is computed
//! against the previous refresh, the same way the OS counters are meant to be
//! read. The very first CPU reading after construction may be 0.

use std::path::Path;
use std::time::Duration;

use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

use crate::metrics::{clamp_percent, percent_of, round_to, LocalMetrics};

/// Shortest window over which a CPU reading is meaningful.
pub fn cpu_sample_window() -> Duration {
    Duration::from_millis(200).max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)
}

pub struct LocalSampler {
    sys: System,
    disks: Disks,
}

impl Default for LocalSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSampler {
    pub fn new() -> Self {
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
                .with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let disks = Disks::new_with_refreshed_list();
        Self { sys, disks }
    }

    /// Refresh CPU counters only. Call, wait `cpu_sample_window()`, then
    /// `sample()` to get a reading over that window.
    pub fn prime_cpu(&mut self) {
        self.sys.refresh_cpu_usage();
    }

    /// Refresh and return CPU %, memory % and root filesystem %.
    pub fn sample(&mut self) -> LocalMetrics {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();
        self.disks.refresh(true);

        let cpu = clamp_percent(f64::from(self.sys.global_cpu_usage()));

        let total = self.sys.total_memory();
        let memory = percent_of(total.saturating_sub(self.sys.available_memory()), total);

        LocalMetrics {
            cpu: round_to(cpu, 1),
            memory: round_to(memory, 1),
            disk: round_to(self.root_disk_percent(), 1),
        }
    }

    fn root_disk_percent(&self) -> f64 {
        let list = self.disks.list();
        let disk = list
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| list.first());

        match disk {
            Some(d) => percent_of(
                d.total_space().saturating_sub(d.available_space()),
                d.total_space(),
            ),
            None => {
                tracing::debug!("no disks listed; reporting 0% disk usage");
                0.0
            }
        }
    }
}
