//! Block Fetch Path (§4.4).

use super::trace_cache_path::fetch_thread_trace_cache;
use super::{primitive::fetch_inst, CoreFetchEnv};
use crate::collaborators::PageAccessKind;
use crate::thread::Thread;

/// Fetches up to one basic block for `thread`: tries the trace-cache path
/// first, then falls back to the cache-line-bounded block loop.
pub fn fetch_thread(thread: &mut Thread, env: &mut CoreFetchEnv<'_>) {
    if fetch_thread_trace_cache(thread, env) {
        return;
    }

    let block_size = thread.inst_mod.block_size();
    let block = thread.fetch_neip & !(block_size - 1);

    if block != thread.fetch_block {
        let Some(ctx) = thread.ctx.as_deref() else {
            return;
        };
        let asid = ctx.asid();
        let paddr = env.mmu.translate(asid, thread.fetch_neip);
        thread.fetch_block = block;
        thread.fetch_address = paddr;
        thread.fetch_access = Some(thread.inst_mod.access(paddr));
        thread.btb_reads += 1;
        env.mmu.access_page(paddr, PageAccessKind::Execute);
    }

    while (thread.fetch_neip & !(block_size - 1)) == block {
        let Some(ctx) = thread.ctx.as_deref() else {
            break;
        };
        if !ctx.is_running() {
            break;
        }
        if thread.fetchq_occ >= env.config.fetch.queue_size {
            break;
        }

        let produced = fetch_inst(thread, env, false);

        let ctx = thread.ctx.as_deref().expect("checked above");
        if ctx.last_inst_size() == 0 {
            break;
        }

        let Some(uop) = produced else {
            continue;
        };

        if uop.is_ctrl() {
            if let Some(target) = thread.btb.lookup(&uop) {
                if thread.direction_predictor.lookup(&uop) {
                    thread.fetch_neip = target;
                    if let Some(queued) = thread.fetch_queue.last_mut() {
                        queued.pred_neip = target;
                    }
                    break;
                }
            }
        }
    }
}
