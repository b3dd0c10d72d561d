//! Universally-quantified properties (§8 properties 1 and 2).

use crate::common::{
    straight_line_thread, IdentityMmu, NoLongLatency, OneDepRegisterFile, ScriptedContext,
};
use fetchcore::{Config, Processor, Uinst, UopFlags};
use proptest::prelude::*;

fn run_straight_line(sizes: Vec<u32>, queue_size: u32) -> Processor {
    let mut config = Config::default();
    config.fetch.queue_size = queue_size;
    let mut processor = Processor::new(
        config,
        Box::new(IdentityMmu::new()),
        Box::new(OneDepRegisterFile),
        Box::new(NoLongLatency),
        move |_core, _thread| straight_line_thread(64),
    )
    .unwrap();

    let steps = sizes
        .into_iter()
        .map(|size| (size, vec![Uinst::new(UopFlags::INT)], None))
        .collect::<Vec<_>>();
    let step_count = steps.len();
    processor.cores[0]
        .threads[0]
        .allocate(Box::new(ScriptedContext::new(steps)), 0);

    for _ in 0..(step_count + 4) {
        fetchcore::fetch::fetch(&mut processor);
        processor.cycle += 1;
        let thread = &processor.cores[0].threads[0];
        prop_assert_back_pressure(thread.fetchq_occ, queue_size);
    }
    processor
}

fn prop_assert_back_pressure(occ: u32, limit: u32) {
    assert!(occ <= limit, "fetchq_occ {occ} exceeded {limit}");
}

proptest! {
    #[test]
    fn fetchq_occ_never_exceeds_queue_size(
        sizes in prop::collection::vec(2u32..=15, 0..20),
        queue_size in 8u32..64,
    ) {
        run_straight_line(sizes, queue_size);
    }

    #[test]
    fn uop_ids_are_strictly_monotonic_within_a_thread(
        sizes in prop::collection::vec(2u32..=15, 1..20),
    ) {
        let processor = run_straight_line(sizes, 1_000_000);
        let thread = &processor.cores[0].threads[0];
        let ids: Vec<u64> = thread.fetch_queue.iter().map(|u| u.id).collect();
        for window in ids.windows(2) {
            prop_assert!(window[0] < window[1]);
        }
        let core_ids: Vec<u64> = thread.fetch_queue.iter().map(|u| u.id_in_core).collect();
        for window in core_ids.windows(2) {
            prop_assert!(window[0] < window[1]);
        }
    }
}
