use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rcga::{
    breeding::{BlendCrossover, CrossoverStrategy, MutationStrategy, PolynomialMutation},
    evolution::{Engine, OptimizationDirection, Parameters},
    individual::{Solution, Value},
    population::Population,
    rng::RandomNumberGenerator,
    search_space::SearchSpace,
    selection::{SelectionStrategy, TournamentSelection},
};

fn space(dimensions: usize) -> SearchSpace {
    let mut builder = SearchSpace::builder();
    for i in 0..dimensions {
        builder = builder.continuous(format!("x{}", i), -5.12, 5.12);
    }
    builder.build().unwrap()
}

// Rastrigin, deliberately heavy enough for parallel evaluation to matter
fn rastrigin(s: &Solution) -> Option<f64> {
    let mut total = 10.0 * s.len() as f64;
    for value in s.values() {
        let x = value.as_f64()?;
        total += x * x - 10.0 * (2.0 * std::f64::consts::PI * x).cos();
    }
    Some(total)
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");
    let space = Arc::new(space(20));

    for size in [10, 100, 1000, 10000].iter() {
        let mut template = Population::new(Arc::clone(&space), 42);
        template.initialise(*size);

        group.bench_with_input(BenchmarkId::new("sequential", size), &template, |b, template| {
            b.iter(|| {
                let mut population = template.clone();
                black_box(population.evaluate_with_threshold(&rastrigin, usize::MAX))
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &template, |b, template| {
            b.iter(|| {
                let mut population = template.clone();
                black_box(population.evaluate_with_threshold(&rastrigin, 1))
            })
        });
    }

    group.finish();
}

fn bench_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators");
    let space = Arc::new(space(10));
    let direction = OptimizationDirection::Minimize;

    for size in [10, 100, 1000].iter() {
        let mut population = Population::new(Arc::clone(&space), 7);
        population.initialise(*size);
        population.evaluate(&rastrigin);

        let selection = TournamentSelection::new(3, 1.0, direction).unwrap();
        let crossover = BlendCrossover::new(0.5, 0.9, *size).unwrap();
        let mutation = PolynomialMutation::new(0.1, 20.0).unwrap();

        group.bench_with_input(BenchmarkId::new("tournament", size), &population, |b, population| {
            let mut rng = RandomNumberGenerator::from_seed(1);
            b.iter(|| selection.select(black_box(population), &mut rng).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("blend", size), &population, |b, population| {
            let mut rng = RandomNumberGenerator::from_seed(2);
            b.iter(|| crossover.crossover(black_box(population), &mut rng).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("polynomial", size), &population, |b, population| {
            let mut rng = RandomNumberGenerator::from_seed(3);
            b.iter(|| mutation.mutate(population.clone(), &mut rng).unwrap())
        });
    }

    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(10);

    for threshold in [usize::MAX, 1].iter() {
        let label = if *threshold == 1 { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| {
                let parameters = Parameters::builder()
                    .seed(42)
                    .population_size(200)
                    .max_generations(20)
                    .parallel_threshold(*threshold)
                    .elite_count(2)
                    .build()
                    .unwrap();
                let mut engine = Engine::new(space(10), parameters, rastrigin).unwrap();
                black_box(engine.execute().unwrap())
            })
        });
    }

    group.finish();
}

fn bench_insertion(c: &mut Criterion) {
    let space = Arc::new(space(10));
    let out_of_range: Solution = space
        .variable_names()
        .into_iter()
        .map(|name| (name.to_string(), Value::Real(100.0)))
        .collect();

    c.bench_function("insert_out_of_range", |b| {
        b.iter(|| {
            let mut population = Population::new(Arc::clone(&space), 3);
            population.insert_individual(black_box(out_of_range.clone()), None)
        })
    });
}

criterion_group!(
    benches,
    bench_evaluation,
    bench_operators,
    bench_full_run,
    bench_insertion
);
criterion_main!(benches);
