//! Hand-tuned scoring weights loaded from YAML. Keys left out of the file keep
//! their built-in weight.
//!
//! ```yaml
//! stats:
//!   windup: -0.2
//!   staminaDamage: 0.5
//! attacks:
//!   throw: 0.5
//! heavy: 0.75
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::data::stats::Stat;
use crate::data::weapon::AttackName;
use crate::matchup::scorer::ScoringWeights;

#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("failed to read weights '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse weights YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown stat '{0}' in weights")]
    UnknownStat(String),
    #[error("unknown attack '{0}' in weights")]
    UnknownAttack(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WeightsFile {
    #[serde(default)]
    stats: BTreeMap<String, f64>,
    #[serde(default)]
    attacks: BTreeMap<String, f64>,
    #[serde(default)]
    light: Option<f64>,
    #[serde(default)]
    heavy: Option<f64>,
}

fn upsert<K: PartialEq>(weights: &mut Vec<(K, f64)>, key: K, weight: f64) {
    match weights.iter_mut().find(|(existing, _)| *existing == key) {
        Some(entry) => entry.1 = weight,
        None => weights.push((key, weight)),
    }
}

pub fn parse_weights(raw: &str) -> Result<ScoringWeights, WeightsError> {
    let file: WeightsFile = if raw.trim().is_empty() {
        WeightsFile::default()
    } else {
        serde_yaml::from_str(raw)?
    };
    let mut weights = ScoringWeights::default();

    for (key, weight) in file.stats {
        let stat = Stat::parse(&key).ok_or(WeightsError::UnknownStat(key))?;
        upsert(&mut weights.stats, stat, weight);
    }
    for (key, weight) in file.attacks {
        let attack = AttackName::parse(&key).ok_or(WeightsError::UnknownAttack(key))?;
        upsert(&mut weights.attacks, attack, weight);
    }
    if let Some(light) = file.light {
        weights.light = light;
    }
    if let Some(heavy) = file.heavy {
        weights.heavy = heavy;
    }
    Ok(weights)
}

pub fn load_weights(path: impl AsRef<Path>) -> Result<ScoringWeights, WeightsError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| WeightsError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_weights(&raw)
}
