//! GC telemetry.
//!
//! Gated behind `#[cfg(feature = "telemetry")]`. When the feature is disabled
//! this module is not compiled and the heaps carry no instrumentation.

use std::time::{Duration, Instant};

use crate::heap::object::ObjectKind;

/// Cumulative allocation statistics for one object kind.
#[derive(Debug, Clone, Default)]
pub struct KindStats {
    pub alloc_count: usize,
    pub alloc_bytes: usize,
}

/// Metrics captured for a single collection cycle.
#[derive(Debug, Clone)]
pub struct CycleMetrics {
    pub cycle_index: usize,
    pub duration: Duration,
    pub live_before: usize,
    pub live_after: usize,
    pub collected_count: usize,
}

/// Telemetry collector shared by both heap variants.
///
/// Tracks per-kind allocation statistics and per-cycle collection metrics.
pub struct GcTelemetry {
    kind_stats: [KindStats; 2],
    cycles: Vec<CycleMetrics>,
    cycle_start: Option<Instant>,
    live_before: usize,
}

impl GcTelemetry {
    pub fn new() -> Self {
        Self {
            kind_stats: [KindStats::default(), KindStats::default()],
            cycles: Vec::new(),
            cycle_start: None,
            live_before: 0,
        }
    }

    /// Record a new allocation of the given kind and size.
    #[inline]
    pub fn record_alloc(&mut self, kind: ObjectKind, size_bytes: usize) {
        let idx = kind as usize;
        self.kind_stats[idx].alloc_count += 1;
        self.kind_stats[idx].alloc_bytes += size_bytes;
    }

    /// Call before starting a collection cycle.
    pub fn begin_cycle(&mut self, live_before: usize) {
        self.cycle_start = Some(Instant::now());
        self.live_before = live_before;
    }

    /// Call after a collection cycle completes.
    pub fn end_cycle(&mut self, live_after: usize, collected: usize) {
        let duration = self
            .cycle_start
            .map(|start| start.elapsed())
            .unwrap_or_default();
        let cycle_index = self.cycles.len();
        self.cycles.push(CycleMetrics {
            cycle_index,
            duration,
            live_before: self.live_before,
            live_after,
            collected_count: collected,
        });
        self.cycle_start = None;
    }

    pub fn kind_stats(&self, kind: ObjectKind) -> &KindStats {
        &self.kind_stats[kind as usize]
    }

    pub fn cycles(&self) -> &[CycleMetrics] {
        &self.cycles
    }

    pub fn total_alloc_count(&self) -> usize {
        self.kind_stats.iter().map(|s| s.alloc_count).sum()
    }

    pub fn total_alloc_bytes(&self) -> usize {
        self.kind_stats.iter().map(|s| s.alloc_bytes).sum()
    }

    /// Formatted report of per-kind allocation statistics.
    pub fn report_allocation_stats(&self) -> String {
        let mut out = String::from("=== GC Allocation Stats ===\n");
        out.push_str(&format!(
            "{:<8} {:>10} {:>12}\n",
            "Kind", "Allocs", "AllocBytes"
        ));
        out.push_str(&"-".repeat(32));
        out.push('\n');
        for kind in ObjectKind::ALL {
            let s = self.kind_stats(kind);
            out.push_str(&format!(
                "{:<8} {:>10} {:>12}\n",
                kind.label(),
                s.alloc_count,
                s.alloc_bytes,
            ));
        }
        out.push_str(&"-".repeat(32));
        out.push('\n');
        out.push_str(&format!(
            "{:<8} {:>10} {:>12}\n",
            "TOTAL",
            self.total_alloc_count(),
            self.total_alloc_bytes(),
        ));
        out
    }

    /// Formatted report of collection cycle history.
    pub fn report_cycles(&self) -> String {
        if self.cycles.is_empty() {
            return "=== GC Cycles ===\nNo collections performed.\n".to_string();
        }
        let mut out = String::from("=== GC Cycles ===\n");
        out.push_str(&format!(
            "{:>5} {:>10} {:>8} {:>8} {:>9}\n",
            "Cycle", "Duration", "Before", "After", "Collected"
        ));
        out.push_str(&"-".repeat(48));
        out.push('\n');
        for c in &self.cycles {
            out.push_str(&format!(
                "{:>5} {:>8}us {:>8} {:>8} {:>9}\n",
                c.cycle_index,
                c.duration.as_micros(),
                c.live_before,
                c.live_after,
                c.collected_count,
            ));
        }
        out
    }

    /// Full report combining all sections.
    pub fn report_full(&self) -> String {
        let mut out = self.report_allocation_stats();
        out.push('\n');
        out.push_str(&self.report_cycles());
        out
    }
}

impl Default for GcTelemetry {
    fn default() -> Self {
        Self::new()
    }
}
