//! # Path Planner Benchmark
//!
//! The planner runs once per 10 ms control cycle, a single cycle must be a
//! negligible share of that.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sync_lib::{
    calib::{self, Calib},
    path_planner::{PathPlanner, TuningConstants},
    sim::SyncRig,
};
use util::module::State;

fn path_planner_benchmark(c: &mut Criterion) {
    // ---- Single cycle ----

    let mut planner = PathPlanner::init(TuningConstants::reference()).unwrap();

    c.bench_function("path_planner_tick", |b| {
        b.iter(|| {
            let feedback = planner.position();
            planner
                .tick(black_box(20.0), black_box(feedback), black_box(0.5))
                .unwrap()
        })
    });

    // ---- Closed loop rig, one second of cycles ----

    let calib_params: calib::Params = util::params::load_from_path(
        concat!(env!("CARGO_MANIFEST_DIR"), "/../params/calib.toml")
    )
    .unwrap();
    let calib = Calib::new(&calib_params).unwrap();

    c.bench_function("sync_rig_100_cycles", |b| {
        b.iter(|| {
            let mut planner = PathPlanner::init(TuningConstants::reference()).unwrap();
            let mut rig = SyncRig::new(calib::AxisFamily::Rear, &calib, 0.05, 0.01);

            for _ in 0..100 {
                rig.step(&mut planner, &calib, black_box(20.0)).unwrap();
            }

            rig.slow.position
        })
    });
}

criterion_group!(benches, path_planner_benchmark);
criterion_main!(benches);
