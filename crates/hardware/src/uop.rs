//! The uop and uinst data model (§3.1 of the design document).
//!
//! A [`Uinst`] is what the guest functional executor produces; a [`Uop`] is
//! what the fetch primitive builds around exactly one uinst before handing
//! it to the fetch queue. The [`UinstStagingList`] is the FIFO channel
//! between the two: the executor pushes, the fetch primitive drains.

use std::collections::VecDeque;

use bitflags::bitflags;

use crate::collaborators::AccessHandle;

bitflags! {
    /// Bitmask copied from a uinst's opcode descriptor onto every uop built
    /// from it.
    ///
    /// Only [`UopFlags::CTRL`] and [`UopFlags::MEM`] affect fetch-stage
    /// control flow; the remaining bits are carried through for downstream
    /// stages and for realistic trace output.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UopFlags: u32 {
        /// Integer ALU operation.
        const INT = 1 << 0;
        /// Logical (bitwise) operation.
        const LOGIC = 1 << 1;
        /// Floating-point operation.
        const FP = 1 << 2;
        /// Reads or writes memory; gates the `phy_addr` translation in the
        /// fetch primitive (§4.2 step 4).
        const MEM = 1 << 3;
        /// Control-flow uop (branch, call, return, jump); gates BTB/direction
        /// predictor consultation and the "prefer the control uop" return
        /// rule in the fetch primitive.
        const CTRL = 1 << 4;
        /// Conditional control flow.
        const COND = 1 << 5;
        /// Unconditional control flow.
        const UNCOND = 1 << 6;
    }
}

/// Integer/floating-point/flag dependency counts produced by the
/// register-file helper's `count_deps` classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepCounts {
    /// Number of integer register inputs.
    pub int: u8,
    /// Number of floating-point register inputs.
    pub fp: u8,
    /// Number of flag inputs.
    pub flags: u8,
}

/// One element of the uinst staging list: what the guest functional
/// executor emits for a single micro-operation of the macro-instruction it
/// just decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uinst {
    /// Opcode-descriptor flags, copied verbatim onto the uop built from this
    /// uinst.
    pub flags: UopFlags,
    /// Memory operand address, present iff `flags` contains
    /// [`UopFlags::MEM`].
    pub address: Option<u64>,
    /// Disassembly text for this uinst, used only for the `uasm=` trace
    /// token.
    pub asm: Option<String>,
}

impl Uinst {
    /// Builds a non-memory uinst with the given flags.
    #[must_use]
    pub const fn new(flags: UopFlags) -> Self {
        Self {
            flags,
            address: None,
            asm: None,
        }
    }

    /// Builds a memory uinst carrying the given operand address.
    #[must_use]
    pub const fn with_address(flags: UopFlags, address: u64) -> Self {
        Self {
            flags: flags.union(UopFlags::MEM),
            address: Some(address),
            asm: None,
        }
    }

    /// Attaches disassembly text, for trace output.
    #[must_use]
    pub fn with_asm(mut self, asm: impl Into<String>) -> Self {
        self.asm = Some(asm.into());
        self
    }
}

/// The process-wide, single-consumer FIFO the guest functional executor
/// appends to and the fetch primitive drains (§3.1, §5).
///
/// Implementations must treat re-entrant draining — calling the fetch
/// primitive again before a prior drain completes — as a defect; this type
/// does not itself guard against it since the fetch primitive is the sole
/// caller of [`UinstStagingList::drain_all`] and never recurses into itself.
#[derive(Debug, Default)]
pub struct UinstStagingList {
    inner: VecDeque<Uinst>,
}

impl UinstStagingList {
    /// Creates an empty staging list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a uinst produced by the functional executor.
    pub fn push(&mut self, uinst: Uinst) {
        self.inner.push_back(uinst);
    }

    /// Number of uinsts currently staged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the staging list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drains every staged uinst in FIFO order.
    ///
    /// Only the fetch primitive calls this; it must consume the returned
    /// iterator to completion within the same fetch-primitive invocation,
    /// leaving the list empty on exit (invariant from §3.1/§3.3).
    pub(crate) fn drain_all(&mut self) -> std::collections::vec_deque::Drain<'_, Uinst> {
        self.inner.drain(..)
    }
}

/// One micro-operation, built by the fetch primitive around exactly one
/// [`Uinst`] (§3.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uop {
    /// Process-unique, strictly monotonically increasing identifier.
    pub id: u64,
    /// Core-unique, strictly monotonically increasing identifier.
    pub id_in_core: u64,
    /// `id` of the first uop in this uop's macro-instruction group.
    pub mop_id: u64,
    /// Number of uops produced by this uop's macro-instruction.
    pub mop_count: u32,
    /// This uop's position within its macro-instruction group, in
    /// `[0, mop_count)`.
    pub mop_index: u32,
    /// Byte length of the macro-instruction this uop came from.
    pub mop_size: u32,
    /// Opcode-descriptor flags copied from this uop's uinst.
    pub flags: UopFlags,
    /// Macro-instruction address (pre-execution instruction pointer).
    pub eip: u64,
    /// Architectural next-eip after functional execution.
    pub neip: u64,
    /// Front-end's prediction of the next fetch address.
    pub pred_neip: u64,
    /// Branch target, if the functional executor computed one.
    pub target_neip: Option<u64>,
    /// Translated physical address, present iff `flags` contains
    /// [`UopFlags::MEM`].
    pub phy_addr: Option<u64>,
    /// Speculative-mode flag captured from the context at fetch time.
    pub specmode: bool,
    /// Whether this uop currently resides in a thread's fetch queue.
    pub in_fetch_queue: bool,
    /// Provenance flag: `true` iff this uop was produced by the trace-cache
    /// path rather than the block-fetch path.
    pub fetch_trace_cache: bool,
    /// Physical address of the instruction-cache line this uop's
    /// macro-instruction was fetched from.
    pub fetch_address: u64,
    /// Outstanding instruction-cache access handle, copied from the thread,
    /// used for trace correlation.
    pub fetch_access: Option<AccessHandle>,
    /// Register dependency classification from the register-file helper.
    pub deps: DepCounts,
    /// Macro-instruction disassembly, set only on the first uop of a group.
    pub asm: Option<String>,
    /// This uop's uinst disassembly.
    pub uasm: Option<String>,
}

impl Uop {
    /// Whether this uop is a control-flow uop.
    #[must_use]
    pub fn is_ctrl(&self) -> bool {
        self.flags.contains(UopFlags::CTRL)
    }

    /// Whether this uop accesses memory.
    #[must_use]
    pub fn is_mem(&self) -> bool {
        self.flags.contains(UopFlags::MEM)
    }
}
