use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::data::{ingest_export, load_export, Weapon, WeaponStore};
use crate::matchup::{build_matrix_with, load_weights, rank_matchups, score, write_matchup_csv};
use crate::parallel::WorkerPool;

const USAGE: &str = "usage: armory <ingest|matchups|score>";
const MATCHUPS_USAGE: &str =
    "usage: armory matchups [weapons_dir] [output.csv] [--workers N] [--weights weights.yaml]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ingest,
    Matchups,
    Score,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("ingest") => Some(Command::Ingest),
        Some("matchups") => Some(Command::Matchups),
        Some("score") => Some(Command::Score),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    run_with_config(args, PipelineConfig::from_env())
}

pub fn run_with_config(args: &[String], config: PipelineConfig) -> i32 {
    match parse_command(args) {
        Some(Command::Ingest) => handle_ingest(args, config),
        Some(Command::Matchups) => handle_matchups(args, config),
        Some(Command::Score) => handle_score(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Positional arguments after the command, with `--flag value` pairs removed.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn handle_ingest(args: &[String], config: PipelineConfig) -> i32 {
    let positional = positionals(args);
    let Some(export_path) = positional.first() else {
        eprintln!("usage: armory ingest <export.json> [weapons_dir] [changelog.txt]");
        return 2;
    };
    let weapons_dir = positional.get(1).map_or(config.weapons_dir, |p| PathBuf::from(*p));
    let changelog_path = positional.get(2).map_or(config.changelog, |p| PathBuf::from(*p));

    let export = match load_export(export_path) {
        Ok(export) => export,
        Err(err) => {
            eprintln!("ingest failed: {err}");
            return 1;
        }
    };
    let store = match WeaponStore::create(&weapons_dir) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("ingest failed: {err}");
            return 1;
        }
    };

    let report = match ingest_export(&export, &store) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("ingest failed: {err}");
            return 1;
        }
    };

    report.changelog.log();
    if let Err(err) = report.changelog.write_to(&changelog_path, Utc::now()) {
        eprintln!("failed to write changelog '{}': {err}", changelog_path.display());
        return 1;
    }

    println!(
        "ingest complete: written={}, changed={}, failed={}, dropped_rows={}",
        report.written.len(),
        report.changelog.len(),
        report.failures.len(),
        report.dropped_rows
    );
    for failure in &report.failures {
        eprintln!("- {}: {}", failure.weapon, failure.reason);
    }

    if report.has_failures() {
        1
    } else {
        0
    }
}

fn handle_matchups(args: &[String], config: PipelineConfig) -> i32 {
    let positional = positionals(args);
    let weapons_dir = positional.first().map_or(config.weapons_dir, |p| PathBuf::from(*p));
    let output = positional.get(1).map_or(config.matchups, |p| PathBuf::from(*p));
    let workers = match flag_value(args, "--workers") {
        None => config.workers,
        Some(raw) => match raw.parse::<usize>() {
            Ok(workers) => workers,
            Err(_) => {
                eprintln!("{MATCHUPS_USAGE}");
                return 2;
            }
        },
    };
    let weights_path = flag_value(args, "--weights").map(PathBuf::from).or(config.weights);
    let weights = match weights_path {
        None => Default::default(),
        Some(path) => match load_weights(&path) {
            Ok(weights) => weights,
            Err(err) => {
                eprintln!("matchups failed: {err}");
                return 1;
            }
        },
    };

    let weapons = match WeaponStore::new(&weapons_dir).load_rated() {
        Ok(weapons) => weapons,
        Err(err) => {
            eprintln!("matchups failed: {err}");
            return 1;
        }
    };

    let matrix = build_matrix_with(&weapons, &weights, &WorkerPool::with_workers(workers));
    let ranked = rank_matchups(&matrix);
    if let Err(err) = write_matchup_csv(&output, &ranked) {
        eprintln!("failed to write matchups '{}': {err}", output.display());
        return 1;
    }

    tracing::info!(weapons = matrix.len(), output = %output.display(), "matchup table written");
    println!("matchups complete: weapons={}, output='{}'", matrix.len(), output.display());
    0
}

fn load_weapon(path: &Path) -> Result<Weapon, String> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("'{}' is not a weapon file", path.display()))?;

    let record = WeaponStore::new(dir)
        .load_record(stem)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("'{}' does not exist", path.display()))?;
    Weapon::from_record(record).map_err(|err| format!("'{}': {err}", path.display()))
}

fn handle_score(args: &[String]) -> i32 {
    let positional = positionals(args);
    let (Some(first), Some(second)) = (positional.first(), positional.get(1)) else {
        eprintln!("usage: armory score <weapon.json> <other.json>");
        return 2;
    };

    let (weapon, other) = match (load_weapon(Path::new(first)), load_weapon(Path::new(second))) {
        (Ok(weapon), Ok(other)) => (weapon, other),
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("score failed: {err}");
            return 1;
        }
    };

    println!("{}\t{}\t{}", weapon.name, other.name, score(&weapon, &other));
    println!("{}\t{}\t{}", other.name, weapon.name, score(&other, &weapon));
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["armory", "ingest"])), Some(Command::Ingest));
        assert_eq!(parse_command(&args(&["armory", "matchups"])), Some(Command::Matchups));
        assert_eq!(parse_command(&args(&["armory", "serve"])), None);
        assert_eq!(parse_command(&args(&["armory"])), None);
    }

    #[test]
    fn flags_are_not_positionals() {
        let raw = args(&["armory", "matchups", "--workers", "4", "dir", "out.csv"]);
        assert_eq!(positionals(&raw), vec!["dir", "out.csv"]);
        assert_eq!(flag_value(&raw, "--workers"), Some("4"));
    }

    #[test]
    fn bad_worker_count_is_a_usage_error() {
        let raw = args(&["armory", "matchups", "--workers", "many"]);
        assert_eq!(run_with_config(&raw, PipelineConfig::default()), 2);
    }
}
