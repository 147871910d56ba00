pub mod cli;
pub mod combat;
pub mod config;
pub mod data;
pub mod matchup;
pub mod parallel;
