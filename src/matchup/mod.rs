pub mod export_csv;
pub mod matrix;
pub mod ranking;
pub mod scorer;
pub mod weights;

pub use export_csv::{write_matchup_csv, write_matchup_table};
pub use matrix::{build_matrix, build_matrix_with, rated_weapons, MatchupMatrix};
pub use ranking::{rank_matchups, summarize_row, MatchupSummary, TIE_THRESHOLD};
pub use scorer::{compare_winner, score, score_with, ScoringWeights};
pub use weights::{load_weights, parse_weights, WeightsError};
