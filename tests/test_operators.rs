use std::sync::Arc;

use rcga::breeding::{BlendCrossover, CrossoverStrategy, MutationStrategy, PolynomialMutation};
use rcga::evolution::OptimizationDirection;
use rcga::individual::{Solution, Value};
use rcga::population::Population;
use rcga::rng::RandomNumberGenerator;
use rcga::search_space::SearchSpace;
use rcga::selection::{Elitism, SelectionStrategy, TournamentSelection};

fn mixed_space() -> Arc<SearchSpace> {
    Arc::new(
        SearchSpace::builder()
            .continuous("x", 0.0, 10.0)
            .integer("n", -2, 2)
            .enumerated("colors", ["red", "green", "blue"])
            .binary("flag")
            .build()
            .unwrap(),
    )
}

fn solution(entries: &[(&str, Value)]) -> Solution {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn assert_in_domain(population: &Population) {
    for individual in population.individuals() {
        assert_eq!(
            individual.solution().len(),
            population.search_space().number_of_variables()
        );
        for variable in population.search_space().variables() {
            let value = &individual.solution()[variable.name()];
            assert!(
                variable.contains(value),
                "{} = {} escapes its domain",
                variable.name(),
                value
            );
        }
    }
}

#[test]
fn test_adversarial_insertion_is_repaired() {
    let mut population = Population::new(mixed_space(), 13);

    let hostile = [
        solution(&[
            ("x", Value::Real(-50.0)),
            ("n", Value::Integer(99)),
            ("colors", Value::Category("purple".to_string())),
            ("flag", Value::Bit(7)),
        ]),
        solution(&[
            ("x", Value::Real(f64::NAN)),
            ("n", Value::Real(-1.6)),
            ("colors", Value::Integer(1)),
            ("flag", Value::Real(0.5)),
        ]),
        solution(&[("x", Value::Real(f64::INFINITY)), ("junk", Value::Bit(1))]),
        Solution::new(),
    ];
    for s in hostile {
        let id = population.insert_individual(s, Some(1.0));
        assert_eq!(population.individual(id).unwrap().fitness(), None);
    }

    assert_in_domain(&population);
    let first = population.individuals()[0].solution();
    assert_eq!(first["x"], Value::Real(0.0));
    assert_eq!(first["n"], Value::Integer(2));
    assert_eq!(population.individuals()[1].solution()["n"], Value::Integer(-2));
    assert!(!population.individuals()[2].solution().contains_key("junk"));
}

#[test]
fn test_valid_insertion_keeps_fitness() {
    let mut population = Population::new(mixed_space(), 13);
    let s = solution(&[
        ("x", Value::Real(4.5)),
        ("n", Value::Integer(0)),
        ("colors", Value::Category("blue".to_string())),
        ("flag", Value::Bit(1)),
    ]);
    let id = population.insert_individual(s.clone(), Some(2.5));
    let stored = population.individual(id).unwrap();
    assert_eq!(stored.solution(), &s);
    assert_eq!(stored.fitness(), Some(2.5));
}

#[test]
fn test_enumerated_mutation_stays_in_domain() {
    let space = Arc::new(
        SearchSpace::builder()
            .enumerated("colors", ["red", "green", "blue"])
            .build()
            .unwrap(),
    );
    let mut population = Population::new(space, 4);
    population.initialise(10);

    let mutation = PolynomialMutation::new(1.0, 20.0).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(99);
    let mut seen = std::collections::BTreeSet::new();

    // 100 rounds of 10 individuals: 1000 draws
    for _ in 0..100 {
        population = mutation.mutate(population, &mut rng).unwrap();
        assert_eq!(population.len(), 10);
        for individual in population.individuals() {
            let token = individual.solution()["colors"].as_category().unwrap();
            assert!(["red", "green", "blue"].contains(&token), "{}", token);
            seen.insert(token.to_string());
        }
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_blend_with_identical_parents_is_exact() {
    let space = Arc::new(SearchSpace::builder().continuous("x", 0.0, 10.0).build().unwrap());
    let mut pool = Population::new(space, 8);
    for _ in 0..2 {
        pool.insert_individual(solution(&[("x", Value::Real(4.2))]), Some(1.0));
    }

    let crossover = BlendCrossover::new(0.5, 1.0, 20).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(8);
    let offspring = crossover.crossover(&pool, &mut rng).unwrap();

    assert_eq!(offspring.len(), 20);
    for child in offspring.individuals() {
        assert_eq!(child.solution()["x"], Value::Real(4.2));
        assert_eq!(child.fitness(), None);
    }
}

#[test]
fn test_full_pipeline_keeps_domain_and_size() {
    let mut population = Population::new(mixed_space(), 31);
    population.initialise(25);
    let model = |s: &Solution| {
        let x = s["x"].as_f64()?;
        let n = s["n"].as_f64()?;
        Some(x + n)
    };
    population.evaluate(&model);

    let direction = OptimizationDirection::Minimize;
    let selection = TournamentSelection::new(3, 0.8, direction).unwrap();
    let crossover = BlendCrossover::new(0.5, 0.9, 25).unwrap();
    let mutation = PolynomialMutation::new(0.5, 5.0).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(2);

    let pool = selection.select(&population, &mut rng).unwrap();
    assert_eq!(pool.len(), 20);
    assert_in_domain(&pool);

    let offspring = crossover.crossover(&pool, &mut rng).unwrap();
    assert_eq!(offspring.len(), 25);
    assert_in_domain(&offspring);

    let mutated = mutation.mutate(offspring, &mut rng).unwrap();
    assert_eq!(mutated.len(), 25);
    assert_in_domain(&mutated);
}

#[test]
fn test_tournament_winner_beats_or_ties_population_median() {
    let space = Arc::new(SearchSpace::builder().continuous("x", 0.0, 100.0).build().unwrap());
    let mut population = Population::new(space, 17);
    for i in 0..40 {
        population.insert_individual(solution(&[("x", Value::Real(i as f64))]), Some(i as f64));
    }

    // a tournament as large as the population always picks the global best
    let exhaustive = TournamentSelection::new(40, 1.0, OptimizationDirection::Maximize).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(3);
    let pool = exhaustive.select(&population, &mut rng).unwrap();
    assert!(pool.individuals().iter().all(|i| i.fitness() == Some(39.0)));

    // tournaments of size 8 win with the worst-ranked individuals essentially never
    let selection = TournamentSelection::new(8, 1.0, OptimizationDirection::Minimize).unwrap();
    let pool = selection.select(&population, &mut rng).unwrap();
    let mean: f64 = pool.individuals().iter().filter_map(|i| i.fitness()).sum::<f64>()
        / pool.len() as f64;
    assert!(mean < 19.5, "mean winner fitness {}", mean);
}

#[test]
fn test_selection_ignores_unevaluated_individuals() {
    let space = Arc::new(SearchSpace::builder().continuous("x", 0.0, 10.0).build().unwrap());
    let mut population = Population::new(space, 5);
    population.insert_individual(solution(&[("x", Value::Real(1.0))]), None);
    population.insert_individual(solution(&[("x", Value::Real(2.0))]), Some(4.0));
    population.insert_individual(solution(&[("x", Value::Real(3.0))]), None);

    let selection = TournamentSelection::new(2, 1.0, OptimizationDirection::Minimize).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(5);
    let pool = selection.select(&population, &mut rng).unwrap();

    assert_eq!(pool.len(), 3);
    for individual in pool.individuals() {
        assert_eq!(individual.solution()["x"], Value::Real(2.0));
    }

    let elites = Elitism::new(2, OptimizationDirection::Minimize).elites(&population);
    assert_eq!(elites.len(), 1);
    assert_eq!(elites[0].fitness(), Some(4.0));
}

#[test]
fn test_evaluate_is_idempotent() {
    let mut population = Population::new(mixed_space(), 1);
    population.initialise(12);
    let calls = std::sync::atomic::AtomicUsize::new(0);
    let model = |s: &Solution| {
        calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        s["x"].as_f64()
    };

    assert_eq!(population.evaluate(&model).evaluations, 12);
    assert_eq!(population.evaluate(&model).evaluations, 0);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 12);
    assert_eq!(population.evaluations(), 12);
}

#[test]
fn test_unit_tournament_is_uniform_resample() {
    let space = Arc::new(SearchSpace::builder().continuous("x", 0.0, 100.0).build().unwrap());
    let mut population = Population::new(space, 23);
    for i in 0..10 {
        population.insert_individual(solution(&[("x", Value::Real(i as f64))]), Some(i as f64));
    }

    let selection = TournamentSelection::new(1, 1.0, OptimizationDirection::Minimize).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(6);
    let mut picks = [0usize; 10];
    for _ in 0..100 {
        let pool = selection.select(&population, &mut rng).unwrap();
        assert_eq!(pool.len(), 10);
        for individual in pool.individuals() {
            picks[individual.fitness().unwrap() as usize] += 1;
        }
    }

    // 1000 draws, 100 expected per individual; the best is not favoured
    for count in picks {
        assert!((50..=150).contains(&count), "picks: {:?}", picks);
    }
}
