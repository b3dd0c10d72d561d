//! Shared deterministic test doubles for the external collaborator traits.
//!
//! Used by unit tests throughout this crate and by the integration tests
//! under `tests/`. Kept separate from `mockall`-generated mocks (used where
//! interaction counts matter) because several of the concrete scenario
//! tests need a collaborator with actual programmable state, not just call
//! expectations.

#![cfg(test)]

use std::collections::VecDeque;

use crate::collaborators::{
    Btb, DirectionPredictor, GuestContext, InstMemory, LongLatencyEvents, Mmu, PageAccessKind,
    RegisterFile, TraceCache, TraceCacheHit,
};
use crate::uop::{Uinst, UinstStagingList, Uop};

/// Identity-translating MMU: `translate` returns its input unchanged.
pub(crate) struct FakeMmu {
    pub(crate) access_log: Vec<(u64, PageAccessKind)>,
}

impl FakeMmu {
    pub(crate) fn new() -> Self {
        Self {
            access_log: Vec::new(),
        }
    }
}

impl Mmu for FakeMmu {
    fn translate(&mut self, _asid: u64, vaddr: u64) -> u64 {
        vaddr
    }

    fn access_page(&mut self, paddr: u64, kind: PageAccessKind) {
        self.access_log.push((paddr, kind));
    }
}

/// Register-file stub that always reports a single integer dependency.
pub(crate) struct FakeRegisterFile;

impl RegisterFile for FakeRegisterFile {
    fn count_deps(&mut self, uop: &mut Uop, _uinst: &Uinst) {
        uop.deps.int = 1;
    }
}

/// Long-latency oracle whose answer is fixed at construction, or toggled
/// per-thread.
pub(crate) struct FakeLongLatency {
    pub(crate) stalled_threads: Vec<usize>,
}

impl FakeLongLatency {
    pub(crate) fn none() -> Self {
        Self {
            stalled_threads: Vec::new(),
        }
    }
}

impl LongLatencyEvents for FakeLongLatency {
    fn has_long_latency(&self, _core: usize, thread: usize) -> bool {
        self.stalled_threads.contains(&thread)
    }
}

/// Always-present, fixed-size instruction memory that accepts every access.
pub(crate) struct FakeInstMemory {
    pub(crate) block_size: u64,
    pub(crate) accepts: bool,
}

impl FakeInstMemory {
    pub(crate) fn new(block_size: u64) -> Self {
        Self {
            block_size,
            accepts: true,
        }
    }
}

impl InstMemory for FakeInstMemory {
    fn block_size(&self) -> u64 {
        self.block_size
    }

    fn can_access(&self, _paddr: u64) -> bool {
        self.accepts
    }

    fn access(&mut self, _paddr: u64) -> u64 {
        0
    }
}

/// BTB stub with a single programmable `(branch_addr, target)` pair.
pub(crate) struct FakeBtb {
    pub(crate) next_branch: Option<u64>,
    pub(crate) target: Option<u64>,
}

impl FakeBtb {
    pub(crate) fn none() -> Self {
        Self {
            next_branch: None,
            target: None,
        }
    }

    pub(crate) fn with_target(target: u64) -> Self {
        Self {
            next_branch: Some(target),
            target: Some(target),
        }
    }
}

impl Btb for FakeBtb {
    fn next_branch(&self, _eip: u64, _block_size: u64) -> Option<u64> {
        self.next_branch
    }

    fn lookup(&self, _uop: &Uop) -> Option<u64> {
        self.target
    }
}

/// Direction predictor stub whose prediction is fixed at construction.
pub(crate) struct FakeDirectionPredictor {
    pub(crate) taken: bool,
    pub(crate) multiple: u64,
}

impl FakeDirectionPredictor {
    pub(crate) fn new(taken: bool) -> Self {
        Self {
            taken,
            multiple: 0,
        }
    }
}

impl DirectionPredictor for FakeDirectionPredictor {
    fn lookup(&mut self, _uop: &Uop) -> bool {
        self.taken
    }

    fn lookup_multiple(&self, _addr: u64, _count: u32) -> u64 {
        self.multiple
    }
}

/// Trace cache stub returning one scripted hit, then misses forever.
pub(crate) struct FakeTraceCache {
    pub(crate) hit: Option<TraceCacheHit>,
}

impl FakeTraceCache {
    pub(crate) fn miss() -> Self {
        Self { hit: None }
    }

    pub(crate) fn with_hit(hit: TraceCacheHit) -> Self {
        Self { hit: Some(hit) }
    }
}

impl TraceCache for FakeTraceCache {
    fn lookup(&mut self, _eip: u64, _mpred: u64) -> Option<TraceCacheHit> {
        self.hit.take()
    }
}

/// A scripted guest context: each call to `execute` pops the next scripted
/// `(size, uinsts, target_eip)` outcome and applies it. Once the script is
/// exhausted, further `execute` calls report a zero-length (invalid) decode.
pub(crate) struct ScriptedContext {
    pub(crate) steps: VecDeque<(u32, Vec<Uinst>, Option<u64>)>,
    pub(crate) running: bool,
    pub(crate) dealloc_signal: bool,
    pub(crate) specmode: bool,
    eip: u64,
    last_size: u32,
    last_target: Option<u64>,
    last_asm: Option<String>,
}

impl ScriptedContext {
    pub(crate) fn new(steps: impl IntoIterator<Item = (u32, Vec<Uinst>, Option<u64>)>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            running: true,
            dealloc_signal: false,
            specmode: false,
            eip: 0,
            last_size: 0,
            last_target: None,
            last_asm: None,
        }
    }
}

impl GuestContext for ScriptedContext {
    fn is_running(&self) -> bool {
        self.running
    }

    fn dealloc_signal(&self) -> bool {
        self.dealloc_signal
    }

    fn set_eip(&mut self, eip: u64) {
        self.eip = eip;
    }

    fn execute(&mut self, staging: &mut UinstStagingList) {
        if let Some((size, uinsts, target)) = self.steps.pop_front() {
            self.last_size = size;
            self.last_target = target;
            self.last_asm = Some(format!("inst@{:#x}", self.eip));
            self.eip += u64::from(size);
            for uinst in uinsts {
                staging.push(uinst);
            }
        } else {
            self.last_size = 0;
            self.last_target = None;
            self.last_asm = None;
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
        self.last_asm.clone()
    }

    fn specmode(&self) -> bool {
        self.specmode
    }

    fn asid(&self) -> u64 {
        0
    }
}
