//! System info report (§10.8), ported from the prototype's
//! `log_system_info`: logical CPU count and total/available memory,
//! logged at `trace` level (`OUTPUT_LEVEL >= 3`).

use sysinfo::System;

/// A snapshot of the host's CPU and memory, formatted for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemInfo {
    /// Logical CPU count.
    pub logical_cpus: usize,
    /// Total system memory, in megabytes.
    pub total_memory_mb: u64,
    /// Available system memory, in megabytes.
    pub available_memory_mb: u64,
}

impl SystemInfo {
    /// Probes the current host via `sysinfo`.
    pub fn probe() -> Self {
        let mut system = System::new_all();
        system.refresh_memory();
        system.refresh_cpu_all();
        Self {
            logical_cpus: system.cpus().len(),
            total_memory_mb: system.total_memory() / (1024 * 1024),
            available_memory_mb: system.available_memory() / (1024 * 1024),
        }
    }

    /// Logs the report at `trace` level, one field per line as the
    /// prototype did.
    pub fn log(&self) {
        tracing::trace!("実行環境情報");
        tracing::trace!(logical_cpus = self.logical_cpus, "CPU論理コア数");
        tracing::trace!(total_memory_mb = self.total_memory_mb, "総メモリ");
        tracing::trace!(
            available_memory_mb = self.available_memory_mb,
            "利用可能メモリ"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_reports_at_least_one_logical_cpu() {
        let info = SystemInfo::probe();
        assert!(info.logical_cpus >= 1);
    }

    #[test]
    fn available_memory_does_not_exceed_total() {
        let info = SystemInfo::probe();
        assert!(info.available_memory_mb <= info.total_memory_mb);
    }
}
