//! Per-hardware-thread fetch state (§3.1).

use crate::collaborators::{
    AccessHandle, Btb, DirectionPredictor, GuestContext, InstMemory, TraceCache,
};
use crate::uop::Uop;

/// One SMT hardware thread's fetch-stage state.
///
/// A thread with `ctx: None` is unallocated: the eligibility predicate
/// rejects it unconditionally (§4.1 condition 1).
pub struct Thread {
    /// Bound guest context, or `None` if this thread is unallocated.
    pub ctx: Option<Box<dyn GuestContext>>,
    /// This thread's branch target buffer.
    pub btb: Box<dyn Btb>,
    /// This thread's direction predictor.
    pub direction_predictor: Box<dyn DirectionPredictor>,
    /// This thread's trace cache, if the trace-cache path is enabled.
    pub trace_cache: Option<Box<dyn TraceCache>>,
    /// This thread's instruction-memory module.
    pub inst_mod: Box<dyn InstMemory>,

    /// Current architectural instruction pointer.
    pub fetch_eip: u64,
    /// Next architectural instruction pointer to fetch from.
    pub fetch_neip: u64,
    /// Cache-line base address of the currently open instruction-cache
    /// fetch.
    pub fetch_block: u64,
    /// Physical address of `fetch_block`.
    pub fetch_address: u64,
    /// Outstanding instruction-cache access handle for the open block.
    pub fetch_access: Option<AccessHandle>,
    /// Cycle strictly before which this thread may not fetch.
    pub fetch_stall_until: u64,

    /// Byte-count occupancy of the fetch queue.
    pub fetchq_occ: u32,
    /// Uop-count occupancy of the trace-cache virtual sub-queue.
    pub trace_cache_queue_occ: u32,
    /// Uops awaiting decode, in fetch order.
    pub fetch_queue: Vec<Uop>,

    /// Total uops fetched by this thread.
    pub fetched: u64,
    /// Total uops committed by this thread (maintained by downstream
    /// stages; read here only by the switch-on-event fairness throttle).
    pub committed: u64,
    /// Total instruction-cache block accesses opened by this thread.
    pub btb_reads: u64,
}

impl Thread {
    /// Creates an unallocated thread (no bound context) with the given
    /// branch-prediction collaborators.
    #[must_use]
    pub fn new(
        btb: Box<dyn Btb>,
        direction_predictor: Box<dyn DirectionPredictor>,
        trace_cache: Option<Box<dyn TraceCache>>,
        inst_mod: Box<dyn InstMemory>,
    ) -> Self {
        Self {
            ctx: None,
            btb,
            direction_predictor,
            trace_cache,
            inst_mod,
            fetch_eip: 0,
            fetch_neip: 0,
            fetch_block: u64::MAX,
            fetch_address: 0,
            fetch_access: None,
            fetch_stall_until: 0,
            fetchq_occ: 0,
            trace_cache_queue_occ: 0,
            fetch_queue: Vec::new(),
            fetched: 0,
            committed: 0,
            btb_reads: 0,
        }
    }

    /// Binds a guest context to this thread, starting fetch at `start_eip`.
    pub fn allocate(&mut self, ctx: Box<dyn GuestContext>, start_eip: u64) {
        self.ctx = Some(ctx);
        self.fetch_eip = start_eip;
        self.fetch_neip = start_eip;
        self.fetch_block = u64::MAX;
    }
}

impl std::fmt::Debug for Thread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thread")
            .field("allocated", &self.ctx.is_some())
            .field("fetch_eip", &self.fetch_eip)
            .field("fetch_neip", &self.fetch_neip)
            .field("fetchq_occ", &self.fetchq_occ)
            .field("trace_cache_queue_occ", &self.trace_cache_queue_occ)
            .field("fetch_queue_len", &self.fetch_queue.len())
            .field("fetched", &self.fetched)
            .field("committed", &self.committed)
            .field("btb_reads", &self.btb_reads)
            .finish()
    }
}
