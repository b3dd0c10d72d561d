//! Per-uop trace-line emission (§6 "Trace output").
//!
//! The literal token grammar is preserved byte-for-byte regardless of the
//! logging backend in front of it, so anything downstream scraping
//! `x86.new_inst` lines out of a log stream keeps working.

use crate::uop::Uop;

pub(crate) fn emit_new_inst(core_idx: usize, uop: &Uop) {
    let mut line = format!("x86.new_inst id={} core={core_idx}", uop.id_in_core);

    if uop.specmode {
        line.push_str(" spec=\"t\"");
    }

    if uop.mop_index == 0 {
        if let Some(asm) = &uop.asm {
            line.push_str(&format!(" asm=\"{asm}\""));
        }
    }

    let uasm = uop.uasm.as_deref().unwrap_or("");
    line.push_str(&format!(" uasm=\"{uasm}\" stg=\"fe\""));

    tracing::info!(target: "fetchcore::trace", "{line}");
}
