//! Benchmarks for one engine tick per rule set.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use gridsim::{
    compute::{Label, Topology},
    schema::{Layout, RuleConfig, SimulationConfig},
    Simulation,
};

fn config(size: usize, variant: &str, weights: Vec<(Label, f64)>) -> SimulationConfig {
    SimulationConfig {
        rows: size,
        cols: size,
        topology: Topology::Wrapping,
        rules: RuleConfig {
            variant: variant.to_string(),
            parameters: Default::default(),
        },
        layout: Layout::Random { weights, seed: 42 },
        seed: Some(42),
    }
}

fn bench_tick(c: &mut Criterion) {
    let variants = [
        ("life", vec![(Label::Dead, 2.0), (Label::Alive, 1.0)]),
        (
            "segregation",
            vec![(Label::Empty, 1.0), (Label::Red, 2.0), (Label::Blue, 2.0)],
        ),
        (
            "predator_prey",
            vec![(Label::Water, 4.0), (Label::Fish, 2.0), (Label::Shark, 1.0)],
        ),
        ("sugarscape", vec![(Label::Patch, 5.0), (Label::Agent, 1.0)]),
    ];

    for (variant, weights) in variants {
        let mut group = c.benchmark_group(format!("tick_{}", variant));

        for size in [32, 64, 128, 256] {
            let config = config(size, variant, weights.clone());
            let mut simulation = Simulation::from_config(&config).expect("valid bench config");

            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{}x{}", size, size)),
                &size,
                |b, _| {
                    b.iter(|| {
                        simulation.step();
                        black_box(simulation.generation());
                    });
                },
            );
        }

        group.finish();
    }
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
