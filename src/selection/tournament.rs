use crate::error::{GeneticError, Result};
use crate::evolution::options::{check_probability, OptimizationDirection, SelectionParams};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::SelectionStrategy;

/// A selection strategy that fills the mating pool through tournaments.
///
/// Each pool slot runs one tournament: `tournament_size` distinct evaluated
/// individuals are drawn uniformly at random and a copy of the strict winner
/// (the first drawn wins ties) is inserted into the pool.
///
/// - Smaller tournament sizes lead to more exploration (size 1 is a uniform resample)
/// - Larger tournament sizes lead to more exploitation
///
/// The pool holds `floor(mating_pool_fraction * population size)` individuals.
/// Individuals without fitness never take part.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
    mating_pool_fraction: f64,
    direction: OptimizationDirection,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTournament` if `tournament_size` is 0 and a configuration
    /// error if `mating_pool_fraction` is outside `(0, 1]`.
    pub fn new(
        tournament_size: usize,
        mating_pool_fraction: f64,
        direction: OptimizationDirection,
    ) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::EmptyTournament);
        }
        check_probability("mating_pool_fraction", mating_pool_fraction)?;

        Ok(Self {
            tournament_size,
            mating_pool_fraction,
            direction,
        })
    }

    pub fn from_params(params: &SelectionParams, direction: OptimizationDirection) -> Result<Self> {
        Self::new(
            params.n_ind_tournament,
            params.mating_pool_fraction,
            direction,
        )
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Runs a single tournament among `eligible` and returns the winner's index.
    fn run_tournament(
        &self,
        fitness: &[Option<f64>],
        eligible: &[usize],
        rng: &mut RandomNumberGenerator,
    ) -> Result<usize> {
        if eligible.is_empty() {
            return Err(GeneticError::NoEvaluatedIndividuals(
                "No eligible individuals for tournament selection".to_string(),
            ));
        }

        // cannot draw more distinct participants than there are candidates
        let size = self.tournament_size.min(eligible.len());
        let mut participants: Vec<usize> = Vec::with_capacity(size);
        while participants.len() < size {
            let candidate = eligible[rng.index(eligible.len())];
            if !participants.contains(&candidate) {
                participants.push(candidate);
            }
        }

        let mut best_idx = participants[0];
        let mut best_fitness = fitness[best_idx].unwrap_or(f64::NAN);

        for &idx in &participants[1..] {
            if let Some(current) = fitness[idx] {
                if self.direction.is_better(current, best_fitness) {
                    best_idx = idx;
                    best_fitness = current;
                }
            }
        }

        Ok(best_idx)
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self {
            tournament_size: 2,
            mating_pool_fraction: 1.0,
            direction: OptimizationDirection::Minimize,
        }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(
        &self,
        population: &Population,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let fitness: Vec<Option<f64>> = population
            .individuals()
            .iter()
            .map(|individual| individual.fitness())
            .collect();
        let eligible: Vec<usize> = fitness
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_some())
            .map(|(idx, _)| idx)
            .collect();

        let pool_size = (self.mating_pool_fraction * population.len() as f64).floor() as usize;
        let mut pool = population.spawn(population.seed());

        for _ in 0..pool_size {
            let winner_idx = self.run_tournament(&fitness, &eligible, rng)?;
            let winner = &population.individuals()[winner_idx];
            pool.insert_individual(winner.solution().clone(), winner.fitness());
        }

        Ok(pool)
    }
}
