//! A pipeline is shared read-only between concurrent compilations.

use std::thread;

use lccfq_compile::{Pipeline, Stage, Topology};
use lccfq_ir::{Circuit, CircuitBuilder, QubitId};

fn workload(seed: u32) -> Circuit {
    let mut b = CircuitBuilder::new(format!("job_{seed}"), 5, 5);
    for i in 0..5 {
        let a = (seed + i) % 5;
        let t = (seed + 2 * i + 1) % 5;
        if a != t {
            b.cx(QubitId(a), QubitId(t)).unwrap();
        }
        b.rx(f64::from(seed) * 0.1, QubitId(t)).unwrap();
    }
    b.measure_all().unwrap();
    b.build()
}

#[test]
fn test_shared_pipeline_matches_sequential_runs() {
    let pipeline = Pipeline::builder()
        .topology(Topology::ring(5))
        .architecture("pfaff_v1")
        .build()
        .unwrap();

    let circuits: Vec<Circuit> = (0..16).map(workload).collect();
    let sequential: Vec<_> = circuits
        .iter()
        .map(|c| pipeline.run(c, Stage::Transpiled).unwrap())
        .collect();

    let concurrent: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = circuits
            .iter()
            .map(|c| s.spawn(|| pipeline.run(c, Stage::Transpiled).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}
