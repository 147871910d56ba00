use serde::Serialize;

use crate::matchup::matrix::MatchupMatrix;

/// Scores within this distance of zero count as ties.
pub const TIE_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupSummary {
    pub name: String,
    /// Score against every rated weapon, self included, in matrix order.
    pub opponents: Vec<(String, f64)>,
    pub average_matchup: f64,
    pub winning_matchups: usize,
    pub losing_matchups: usize,
    pub tied_matchups: usize,
}

impl MatchupSummary {
    pub fn score_against(&self, opponent: &str) -> Option<f64> {
        self.opponents
            .iter()
            .find(|(name, _)| name == opponent)
            .map(|(_, score)| *score)
    }
}

pub fn summarize_row(name: &str, opponents: &[String], scores: &[f64]) -> MatchupSummary {
    let total = scores.len();
    let winning_matchups = scores.iter().filter(|s| **s > TIE_THRESHOLD).count();
    let losing_matchups = scores.iter().filter(|s| **s < -TIE_THRESHOLD).count();
    let average_matchup = if total == 0 {
        0.0
    } else {
        scores.iter().sum::<f64>() / total as f64
    };

    MatchupSummary {
        name: name.to_string(),
        opponents: opponents.iter().cloned().zip(scores.iter().copied()).collect(),
        average_matchup,
        winning_matchups,
        losing_matchups,
        tied_matchups: total - winning_matchups - losing_matchups,
    }
}

/// Summaries ordered by average score, best first. Equal averages keep matrix order.
pub fn rank_matchups(matrix: &MatchupMatrix) -> Vec<MatchupSummary> {
    let mut ranked: Vec<MatchupSummary> = matrix
        .names
        .iter()
        .zip(&matrix.scores)
        .map(|(name, scores)| summarize_row(name, &matrix.names, scores))
        .collect();

    ranked.sort_by(|left, right| right.average_matchup.total_cmp(&left.average_matchup));
    ranked
}
