use astar_stepper::{backtrack, CellGrid, GridConfig, SearchEngine, StepController};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn cross_grid(n: usize) -> CellGrid {
    let mut rng = StdRng::seed_from_u64(0);
    CellGrid::from_config(&GridConfig::auto(n, n), &mut rng).unwrap()
}

fn fill_bench(c: &mut Criterion) {
    for n in [15, 64, 256] {
        let mut grid = cross_grid(n);
        let mut engine = SearchEngine::new();
        c.bench_function(format!("fill {n}x{n}").as_str(), |b| {
            b.iter(|| {
                black_box(engine.fill_shortest_path(&mut grid, None));
                black_box(backtrack(&grid, grid.end()));
            })
        });
    }
}

fn step_bench(c: &mut Criterion) {
    for n in [15, 64, 256] {
        let mut grid = cross_grid(n);
        let mut engine = SearchEngine::new();
        let max_steps = engine.run(&mut grid, usize::MAX);
        c.bench_function(format!("half visible {n}x{n}").as_str(), |b| {
            b.iter(|| black_box(engine.run(&mut grid, max_steps / 2)))
        });
    }
}

fn scrub_bench(c: &mut Criterion) {
    let mut controller = StepController::new(cross_grid(64));
    let max_steps = controller.max_steps() as i64;
    c.bench_function("scrub 64x64", |b| {
        b.iter(|| {
            for step in (0..max_steps).step_by(16) {
                controller.set_step(step);
                black_box(controller.tick());
            }
        })
    });
}

criterion_group!(benches, fill_bench, step_bench, scrub_bench);
criterion_main!(benches);
