//! Aggregate fetch-stage statistics, snapshotted from a [`Processor`] for
//! reporting.
//!
//! Counters live on [`crate::thread::Thread`] throughout the simulation;
//! this module only collects and formats them, following this lineage's
//! convention of a section-oriented stats report rather than ad hoc
//! `println!`s scattered through the hot path.

use std::fmt;

use crate::processor::Processor;

/// Snapshot of one hardware thread's fetch counters and queue occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadFetchStats {
    /// Total uops fetched.
    pub fetched: u64,
    /// Total uops committed (maintained downstream; read-only here).
    pub committed: u64,
    /// Total instruction-cache block accesses opened.
    pub btb_reads: u64,
    /// Current byte-count fetch-queue occupancy.
    pub fetchq_occ: u32,
    /// Current uop-count trace-cache sub-queue occupancy.
    pub trace_cache_queue_occ: u32,
}

/// Snapshot of one core's per-thread fetch statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreFetchStats {
    /// Per-thread snapshots, in thread index order.
    pub threads: Vec<ThreadFetchStats>,
}

impl CoreFetchStats {
    /// Total uops fetched by every thread on this core.
    #[must_use]
    pub fn total_fetched(&self) -> u64 {
        self.threads.iter().map(|t| t.fetched).sum()
    }
}

/// A full fetch-stage statistics snapshot across every core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStats {
    /// Simulated cycle this snapshot was taken at.
    pub cycle: u64,
    /// Per-core snapshots, in core index order.
    pub cores: Vec<CoreFetchStats>,
}

impl FetchStats {
    /// Collects a snapshot of `processor`'s current fetch counters.
    #[must_use]
    pub fn collect(processor: &Processor) -> Self {
        let cores = processor
            .cores
            .iter()
            .map(|core| CoreFetchStats {
                threads: core
                    .threads
                    .iter()
                    .map(|thread| ThreadFetchStats {
                        fetched: thread.fetched,
                        committed: thread.committed,
                        btb_reads: thread.btb_reads,
                        fetchq_occ: thread.fetchq_occ,
                        trace_cache_queue_occ: thread.trace_cache_queue_occ,
                    })
                    .collect(),
            })
            .collect();

        Self {
            cycle: processor.cycle,
            cores,
        }
    }

    /// Total uops fetched across every core.
    #[must_use]
    pub fn total_fetched(&self) -> u64 {
        self.cores.iter().map(CoreFetchStats::total_fetched).sum()
    }
}

impl fmt::Display for FetchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ Fetch ]")?;
        writeln!(f, "Cycle = {}", self.cycle)?;
        for (core_idx, core) in self.cores.iter().enumerate() {
            for (thread_idx, thread) in core.threads.iter().enumerate() {
                writeln!(
                    f,
                    "core.{core_idx}.thread.{thread_idx}.Fetched = {}",
                    thread.fetched
                )?;
                writeln!(
                    f,
                    "core.{core_idx}.thread.{thread_idx}.Committed = {}",
                    thread.committed
                )?;
                writeln!(
                    f,
                    "core.{core_idx}.thread.{thread_idx}.BtbReads = {}",
                    thread.btb_reads
                )?;
                writeln!(
                    f,
                    "core.{core_idx}.thread.{thread_idx}.FetchQueueOcc = {}",
                    thread.fetchq_occ
                )?;
                writeln!(
                    f,
                    "core.{core_idx}.thread.{thread_idx}.TraceCacheQueueOcc = {}",
                    thread.trace_cache_queue_occ
                )?;
            }
        }
        Ok(())
    }
}
