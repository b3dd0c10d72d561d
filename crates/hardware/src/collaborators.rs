//! External collaborator interfaces (§6).
//!
//! The fetch stage owns none of these: the guest context, the MMU, the
//! instruction-memory module, the BTB, the direction predictor, the trace
//! cache, the long-latency event queue, and the register-file helper are all
//! supplied by the surrounding simulator. Each is a trait here so the fetch
//! stage can be built, tested, and reasoned about without any of their real
//! implementations existing yet.

use crate::uop::{Uinst, UinstStagingList, Uop};

/// Opaque handle to an outstanding instruction-cache access, used only for
/// trace correlation between the instruction-memory module and the thread
/// that opened the access.
pub type AccessHandle = u64;

/// Per-context state the fetch stage needs to query or drive, but does not
/// own.
///
/// `execute` is the single point of contact with guest functional
/// simulation: it single-steps one macro-instruction, mutating the
/// context's architectural state and appending zero or more uinsts to
/// `staging`.
pub trait GuestContext {
    /// Whether the context is currently in the `running` status.
    fn is_running(&self) -> bool;

    /// Whether a deallocation signal is pending against this context.
    fn dealloc_signal(&self) -> bool;

    /// Sets the context's current instruction pointer before a call to
    /// `execute`.
    fn set_eip(&mut self, eip: u64);

    /// Single-steps one macro-instruction at the context's current eip,
    /// appending its uinsts to `staging`.
    fn execute(&mut self, staging: &mut UinstStagingList);

    /// Architectural instruction pointer after the most recent `execute`
    /// call.
    fn eip_after_execute(&self) -> u64;

    /// Byte length of the macro-instruction decoded by the most recent
    /// `execute` call; zero means an invalid decode.
    fn last_inst_size(&self) -> u32;

    /// Branch target computed by the most recent `execute` call, if the
    /// decoded macro-instruction was a control-flow instruction with a
    /// statically known target.
    fn last_target_eip(&self) -> Option<u64>;

    /// Disassembly of the macro-instruction decoded by the most recent
    /// `execute` call, used only for trace output.
    fn last_inst_asm(&self) -> Option<String>;

    /// Whether this context is currently executing on a mispredicted path.
    fn specmode(&self) -> bool;

    /// Address-space identifier used for MMU translation.
    fn asid(&self) -> u64;
}

/// Page-access event kind reported to the MMU when reporting is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAccessKind {
    /// Instruction fetch.
    Execute,
    /// Data load.
    Load,
    /// Data store.
    Store,
}

/// Virtual-to-physical address translation, shared by every thread on a
/// processor.
///
/// Page-table-walk machinery lives entirely behind this trait; the fetch
/// stage only ever calls `translate` and, optionally, `access_page` for
/// passive reporting.
pub trait Mmu {
    /// Translates a virtual address in the given address space to a
    /// physical address.
    fn translate(&mut self, asid: u64, vaddr: u64) -> u64;

    /// Records a page-access event. A no-op unless the MMU has reporting
    /// enabled; the fetch stage never depends on this having an effect.
    fn access_page(&mut self, _paddr: u64, _kind: PageAccessKind) {}
}

/// Instruction-cache timing model consulted once per opened block.
pub trait InstMemory {
    /// The instruction-cache line size in bytes; block boundaries in the
    /// fetch stage are computed against this.
    fn block_size(&self) -> u64;

    /// Whether a new access at `paddr` can be accepted this cycle.
    fn can_access(&self, paddr: u64) -> bool;

    /// Opens a load access at `paddr`, returning a handle for trace
    /// correlation.
    fn access(&mut self, paddr: u64) -> AccessHandle;
}

/// Branch Target Buffer: predicts branch addresses and targets.
pub trait Btb {
    /// Finds the next branch at or after `eip` within one `block_size`-byte
    /// window, if any.
    fn next_branch(&self, eip: u64, block_size: u64) -> Option<u64>;

    /// Looks up the predicted target for a control uop.
    fn lookup(&self, uop: &Uop) -> Option<u64>;
}

/// Direction predictor: taken/not-taken prediction for control uops.
pub trait DirectionPredictor {
    /// Predicts (and registers prediction history for) a control uop.
    fn lookup(&mut self, uop: &Uop) -> bool;

    /// Packs up to `count` sequential taken/not-taken predictions starting
    /// at `addr` into a bitmap, least-significant bit first.
    fn lookup_multiple(&self, addr: u64, count: u32) -> u64;
}

/// A recorded uop trail returned by a trace-cache hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceCacheHit {
    /// Successive fetch addresses for each uop in the trail, in order.
    pub mop_addrs: Vec<u64>,
    /// Fetch address to resume at after the trail completes.
    pub neip: u64,
}

/// Trace cache: records and replays uop sequences across predicted-taken
/// branches.
pub trait TraceCache {
    /// Looks up a trail keyed by the current fetch address and the packed
    /// direction-prediction bitmap.
    fn lookup(&mut self, eip: u64, mpred: u64) -> Option<TraceCacheHit>;
}

/// Long-latency event queue, consulted only by the switch-on-event SMT
/// policy.
pub trait LongLatencyEvents {
    /// Whether the given (core, thread) has a long-latency event pending
    /// (e.g. an outstanding cache miss) that should discourage the arbiter
    /// from treating it as an attractive fetch target.
    fn has_long_latency(&self, core: usize, thread: usize) -> bool;
}

/// Register-file dependency classification, delegated out of the fetch
/// stage per §4.2 step 4.
pub trait RegisterFile {
    /// Classifies a uop's register dependencies, filling in `uop.deps`.
    fn count_deps(&mut self, uop: &mut Uop, uinst: &Uinst);
}
