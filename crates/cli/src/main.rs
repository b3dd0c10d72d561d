//! Manual exploration and smoke-running CLI for the fetch-stage library.
//!
//! Drives a [`fetchcore::Processor`] with synthetic collaborators — there is
//! no guest ISA execution in scope here (§1 Out of scope) — over a fixed
//! number of cycles and prints the resulting fetch statistics.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use fetchcore::{
    AccessHandle, Btb, Config, DirectionPredictor, GuestContext, InstMemory, LongLatencyEvents,
    Mmu, PageAccessKind, Processor, RegisterFile, Thread, Uinst, UinstStagingList, Uop, UopFlags,
};

#[derive(Parser)]
#[command(name = "fetchsim", about = "Front-end fetch stage smoke-runner")]
struct Args {
    /// Path to a JSON configuration document; falls back to defaults for
    /// anything not present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of simulated cycles to run.
    #[arg(long, default_value_t = 1_000)]
    cycles: u64,

    /// Print per-uop trace lines (`x86.new_inst ...`) to stderr.
    #[arg(long)]
    trace: bool,

    /// Print a stats snapshot every this many cycles; 0 disables periodic
    /// snapshots and only the final one is printed.
    #[arg(long, default_value_t = 0)]
    report_every: u64,
}

fn main() {
    let args = Args::parse();

    if args.trace {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("fetchsim: {err}");
            std::process::exit(1);
        }
    };

    let mut processor = match Processor::new(
        config,
        Box::new(IdentityMmu),
        Box::new(NaiveRegisterFile),
        Box::new(NoLongLatencyEvents),
        synthetic_thread,
    ) {
        Ok(mut processor) => {
            processor.trace_enabled = args.trace;
            processor
        }
        Err(err) => {
            eprintln!("fetchsim: invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    for cycle in 0..args.cycles {
        fetchcore::fetch::fetch(&mut processor);
        processor.cycle += 1;

        if args.report_every != 0 && cycle % args.report_every == 0 {
            println!("{}", fetchcore::stats::FetchStats::collect(&processor));
        }
    }

    println!("{}", fetchcore::stats::FetchStats::collect(&processor));
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, String> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path).map_err(|err| format!("reading {path:?}: {err}"))?;
    serde_json::from_str(&text).map_err(|err| format!("parsing {path:?}: {err}"))
}

/// Builds one hardware thread bound to a [`LoopingContext`] synthetic guest:
/// a deterministic straight-line instruction stream punctuated by a taken
/// backward branch every eight macro-instructions, enough to exercise the
/// block boundary, branch prediction, and fetch-queue back-pressure paths
/// without any real guest ISA behind it.
fn synthetic_thread(_core: usize, _thread: usize) -> Thread {
    let mut thread = Thread::new(
        Box::new(LoopBtb),
        Box::new(AlwaysTakenPredictor),
        None,
        Box::new(FixedLatencyInstMemory),
    );
    thread.allocate(Box::new(LoopingContext::new()), 0x1000);
    thread
}

struct IdentityMmu;

impl Mmu for IdentityMmu {
    fn translate(&mut self, _asid: u64, vaddr: u64) -> u64 {
        vaddr
    }

    fn access_page(&mut self, _paddr: u64, _kind: PageAccessKind) {}
}

struct NaiveRegisterFile;

impl RegisterFile for NaiveRegisterFile {
    fn count_deps(&mut self, uop: &mut Uop, _uinst: &Uinst) {
        uop.deps.int = u8::from(!uop.is_ctrl());
    }
}

struct NoLongLatencyEvents;

impl LongLatencyEvents for NoLongLatencyEvents {
    fn has_long_latency(&self, _core: usize, _thread: usize) -> bool {
        false
    }
}

struct FixedLatencyInstMemory;

impl InstMemory for FixedLatencyInstMemory {
    fn block_size(&self) -> u64 {
        64
    }

    fn can_access(&self, _paddr: u64) -> bool {
        true
    }

    fn access(&mut self, paddr: u64) -> AccessHandle {
        paddr
    }
}

struct LoopBtb;

impl Btb for LoopBtb {
    fn next_branch(&self, _eip: u64, _block_size: u64) -> Option<u64> {
        None
    }

    fn lookup(&self, uop: &Uop) -> Option<u64> {
        uop.target_neip
    }
}

struct AlwaysTakenPredictor;

impl DirectionPredictor for AlwaysTakenPredictor {
    fn lookup(&mut self, _uop: &Uop) -> bool {
        true
    }

    fn lookup_multiple(&self, _addr: u64, _count: u32) -> u64 {
        0
    }
}

const LOOP_BODY_INSTS: u64 = 7;
const INST_SIZE: u32 = 4;

/// A synthetic context that loops over `LOOP_BODY_INSTS` straight-line
/// instructions before an unconditional backward branch to the loop head.
struct LoopingContext {
    eip: u64,
    step: u64,
    loop_head: u64,
    neip: u64,
    target: Option<u64>,
}

impl LoopingContext {
    fn new() -> Self {
        Self {
            eip: 0,
            step: 0,
            loop_head: 0x1000,
            neip: 0,
            target: None,
        }
    }
}

impl GuestContext for LoopingContext {
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
        let is_branch = self.step % LOOP_BODY_INSTS == LOOP_BODY_INSTS - 1;
        self.step += 1;

        if is_branch {
            self.target = Some(self.loop_head);
            self.neip = self.loop_head;
            staging.push(Uinst::new(UopFlags::CTRL | UopFlags::UNCOND));
        } else {
            self.target = None;
            self.neip = self.eip + u64::from(INST_SIZE);
            staging.push(Uinst::new(UopFlags::INT));
        }
    }

    fn eip_after_execute(&self) -> u64 {
        self.neip
    }

    fn last_inst_size(&self) -> u32 {
        INST_SIZE
    }

    fn last_target_eip(&self) -> Option<u64> {
        self.target
    }

    fn last_inst_asm(&self) -> Option<String> {
        Some(if self.target.is_some() {
            "jmp loop_head".to_string()
        } else {
            "add eax, 1".to_string()
        })
    }

    fn specmode(&self) -> bool {
        false
    }

    fn asid(&self) -> u64 {
        0
    }
}
