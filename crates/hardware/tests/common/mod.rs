//! Shared test doubles and builders for the fetch-stage integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use fetchcore::{
    AccessHandle, Btb, DirectionPredictor, GuestContext, InstMemory, LongLatencyEvents, Mmu,
    PageAccessKind, RegisterFile, Thread, TraceCache, TraceCacheHit, Uinst, UinstStagingList, Uop,
};

/// Installs the test-scoped `log` subscriber so `log::trace!` calls made by
/// collaborators under test (if any) surface under `--nocapture`. Harmless,
/// and idempotent, to call from every test that touches this module.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct IdentityMmu {
    pub access_log: Vec<(u64, PageAccessKind)>,
}

impl IdentityMmu {
    pub fn new() -> Self {
        Self {
            access_log: Vec::new(),
        }
    }
}

impl Mmu for IdentityMmu {
    fn translate(&mut self, _asid: u64, vaddr: u64) -> u64 {
        vaddr
    }

    fn access_page(&mut self, paddr: u64, kind: PageAccessKind) {
        self.access_log.push((paddr, kind));
    }
}

pub struct OneDepRegisterFile;

impl RegisterFile for OneDepRegisterFile {
    fn count_deps(&mut self, uop: &mut Uop, _uinst: &Uinst) {
        uop.deps.int = 1;
    }
}

pub struct NoLongLatency;

impl LongLatencyEvents for NoLongLatency {
    fn has_long_latency(&self, _core: usize, _thread: usize) -> bool {
        false
    }
}

pub struct StallingLongLatency {
    pub stalled: Vec<usize>,
}

impl LongLatencyEvents for StallingLongLatency {
    fn has_long_latency(&self, _core: usize, thread: usize) -> bool {
        self.stalled.contains(&thread)
    }
}

pub struct FixedBlockInstMemory {
    pub block_size: u64,
}

impl FixedBlockInstMemory {
    pub fn new(block_size: u64) -> Self {
        Self { block_size }
    }
}

impl InstMemory for FixedBlockInstMemory {
    fn block_size(&self) -> u64 {
        self.block_size
    }

    fn can_access(&self, _paddr: u64) -> bool {
        true
    }

    fn access(&mut self, paddr: u64) -> AccessHandle {
        paddr
    }
}

pub struct NoBranchBtb;

impl Btb for NoBranchBtb {
    fn next_branch(&self, _eip: u64, _block_size: u64) -> Option<u64> {
        None
    }

    fn lookup(&self, uop: &Uop) -> Option<u64> {
        uop.target_neip
    }
}

pub struct FixedPredictor {
    pub taken: bool,
}

impl FixedPredictor {
    pub fn new(taken: bool) -> Self {
        Self { taken }
    }
}

impl DirectionPredictor for FixedPredictor {
    fn lookup(&mut self, _uop: &Uop) -> bool {
        self.taken
    }

    fn lookup_multiple(&self, _addr: u64, _count: u32) -> u64 {
        0
    }
}

pub struct MissTraceCache;

impl TraceCache for MissTraceCache {
    fn lookup(&mut self, _eip: u64, _mpred: u64) -> Option<TraceCacheHit> {
        None
    }
}

pub struct ScriptedTraceCache {
    pub hit: Option<TraceCacheHit>,
}

impl TraceCache for ScriptedTraceCache {
    fn lookup(&mut self, _eip: u64, _mpred: u64) -> Option<TraceCacheHit> {
        self.hit.take()
    }
}

/// A guest context driven by a fixed script of `(size, uinsts, target)`
/// steps; once exhausted, reports a zero-length decode forever.
pub struct ScriptedContext {
    steps: VecDeque<(u32, Vec<Uinst>, Option<u64>)>,
    eip: u64,
    last_size: u32,
    last_target: Option<u64>,
}

impl ScriptedContext {
    pub fn new(steps: impl IntoIterator<Item = (u32, Vec<Uinst>, Option<u64>)>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            eip: 0,
            last_size: 0,
            last_target: None,
        }
    }
}

impl GuestContext for ScriptedContext {
    fn is_running(&self) -> bool {
        true
    }

    fn dealloc_signal(&self) -> bool {
        false
    }

    fn set_eip(&mut self, eip: u64) {
        self.eip = eip;
    }

    fn execute(&mut self, staging: &mut UinstStagingList) {
        if let Some((size, uinsts, target)) = self.steps.pop_front() {
            self.last_size = size;
            self.last_target = target;
            self.eip += u64::from(size);
            for uinst in uinsts {
                staging.push(uinst);
            }
        } else {
            self.last_size = 0;
            self.last_target = None;
        }
    }

    fn eip_after_execute(&self) -> u64 {
        self.eip
    }

    fn last_inst_size(&self) -> u32 {
        self.last_size
    }

    fn last_target_eip(&self) -> Option<u64> {
        self.last_target
    }

    fn last_inst_asm(&self) -> Option<String> {
        Some(format!("inst@{:#x}", self.eip))
    }

    fn specmode(&self) -> bool {
        false
    }

    fn asid(&self) -> u64 {
        0
    }
}

/// Builds an unallocated thread with a straight-line BTB/predictor (never
/// predicts a branch taken) and no trace cache, ready to be `allocate`d with
/// a scripted context.
pub fn straight_line_thread(block_size: u64) -> Thread {
    Thread::new(
        Box::new(NoBranchBtb),
        Box::new(FixedPredictor::new(false)),
        None,
        Box::new(FixedBlockInstMemory::new(block_size)),
    )
}

/// Builds an unallocated thread whose BTB/predictor always resolve any
/// control uop as taken, for branch-termination scenarios.
pub fn branchy_thread(block_size: u64) -> Thread {
    Thread::new(
        Box::new(NoBranchBtb),
        Box::new(FixedPredictor::new(true)),
        None,
        Box::new(FixedBlockInstMemory::new(block_size)),
    )
}

/// Builds an unallocated thread with a trace cache programmed to return
/// `hit` on its first lookup and miss thereafter.
pub fn trace_cache_thread(block_size: u64, hit: TraceCacheHit) -> Thread {
    Thread::new(
        Box::new(NoBranchBtb),
        Box::new(FixedPredictor::new(true)),
        Some(Box::new(ScriptedTraceCache { hit: Some(hit) })),
        Box::new(FixedBlockInstMemory::new(block_size)),
    )
}
