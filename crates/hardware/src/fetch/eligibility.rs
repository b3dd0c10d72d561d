//! Fetch Eligibility Predicate (§4.1).

use crate::collaborators::Mmu;
use crate::thread::Thread;

/// Decides whether `thread` may fetch this cycle.
///
/// Performs an MMU translation for peek-ahead purposes when the next fetch
/// address crosses into a new cache line; this translation is not cached
/// across this call and the subsequent block-fetch code — both translate
/// independently.
pub fn can_fetch(thread: &Thread, cycle: u64, queue_size: u32, mmu: &mut dyn Mmu) -> bool {
    let Some(ctx) = thread.ctx.as_deref() else {
        return false;
    };

    if !ctx.is_running() {
        return false;
    }

    if thread.fetch_stall_until >= cycle || ctx.dealloc_signal() {
        return false;
    }

    if thread.fetchq_occ >= queue_size {
        return false;
    }

    let block_size = thread.inst_mod.block_size();
    let next_block = thread.fetch_neip & !(block_size - 1);
    if next_block != thread.fetch_block {
        let paddr = mmu.translate(ctx.asid(), thread.fetch_neip);
        if !thread.inst_mod.can_access(paddr) {
            return false;
        }
    }

    true
}
