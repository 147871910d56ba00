use rayon::prelude::*;

use crate::data::weapon::Weapon;
use crate::matchup::scorer::{score_with, ScoringWeights};
use crate::parallel::WorkerPool;

/// Scores of every ordered pair of rated weapons. `scores[i][j]` is `score(names[i], names[j])`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupMatrix {
    pub names: Vec<String>,
    pub scores: Vec<Vec<f64>>,
}

impl MatchupMatrix {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn score(&self, weapon: usize, other: usize) -> Option<f64> {
        self.scores.get(weapon).and_then(|row| row.get(other)).copied()
    }
}

/// Weapons eligible for matchups, in input order.
pub fn rated_weapons(weapons: &[Weapon]) -> Vec<&Weapon> {
    weapons.iter().filter(|weapon| weapon.is_rated()).collect()
}

pub fn build_matrix_with(weapons: &[Weapon], weights: &ScoringWeights, pool: &WorkerPool) -> MatchupMatrix {
    let rated = rated_weapons(weapons);
    let score_row = |weapon: &&Weapon| -> Vec<f64> {
        rated.iter().map(|other| score_with(weights, weapon, other)).collect()
    };
    let scores: Vec<Vec<f64>> = pool.install(|| rated.par_iter().map(score_row).collect());

    MatchupMatrix {
        names: rated.iter().map(|weapon| weapon.name.clone()).collect(),
        scores,
    }
}

/// Every ordered pair, self-pairs included. Rows come back in input order.
pub fn build_matrix(weapons: &[Weapon], pool: &WorkerPool) -> MatchupMatrix {
    build_matrix_with(weapons, &ScoringWeights::default(), pool)
}
