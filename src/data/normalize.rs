//! Turn flat dotted export rows into nested per-weapon attack records.
//!
//! Row names look like `<Owner>.<Attack>[Heavy]` or just `<Owner>`. The `Default`
//! owner feeds the default table; every other owner (minus a `Weapon_` prefix)
//! becomes a weapon. Attack names outside the export allow-list are noise and
//! are dropped.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::data::export::RawExport;
use crate::data::stats::{Stat, StatBlock};
use crate::data::weapon::{Attack, Attacks, RawAttackKey, Slot, Weapon};

pub const DEFAULT_OWNER: &str = "Default";
pub const WEAPON_PREFIX: &str = "Weapon_";

/// Per-attack stat defaults collected from `Default.*` rows. Same shape as a weapon's attacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultTable {
    pub attacks: Attacks,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedExport {
    pub defaults: DefaultTable,
    /// Weapons in first-seen order, named by their raw owner (prefix stripped).
    pub weapons: Vec<Weapon>,
    /// Owner-level rows without an attack part. Kept for inspection only.
    pub base_rows: BTreeMap<String, Map<String, Value>>,
    pub dropped_rows: usize,
}

impl NormalizedExport {
    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|weapon| weapon.name == name)
    }
}

fn lowercase_first_char(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn clean_row(row: &Map<String, Value>) -> Map<String, Value> {
    row.iter()
        .map(|(key, value)| (lowercase_first_char(key), value.clone()))
        .collect()
}

/// Seconds to milliseconds for time-valued stats, then intra-record fallbacks.
pub fn transform_stats(row: &Map<String, Value>) -> StatBlock {
    let mut block = StatBlock::from(clean_row(row));

    let time_stats: Vec<Stat> = block.stats().filter(Stat::is_time_valued).collect();
    for stat in time_stats {
        block.scale(stat, 1000.0);
    }

    let present: Vec<Stat> = block.stats().collect();
    for stat in present {
        let undefined = match block.get(stat) {
            None => true,
            Some(value) => value == 0.0,
        };
        if !undefined {
            continue;
        }
        match stat.fallback() {
            Some(partner) if block.contains(partner) => {
                let borrowed = block.get(partner);
                block.insert(stat, borrowed);
            }
            _ => tracing::warn!(stat = %stat, "unset or zero value without a fallback"),
        }
    }

    block
}

fn route_attack(attacks: &mut Attacks, key: RawAttackKey, block: StatBlock) {
    match attacks.entry(key.attack) {
        Attack::Swing(swing) => *swing.slot_mut(key.slot) = block,
        Attack::Simple(existing) => *existing = block,
    }
}

pub fn normalize_export(export: &RawExport) -> NormalizedExport {
    let mut normalized = NormalizedExport::default();
    let mut weapon_index: HashMap<String, usize> = HashMap::new();

    for (row_name, row) in &export.rows {
        let mut parts = row_name.split('.');
        let owner = parts.next().unwrap_or_default();
        let attack = parts.next().map(lowercase_first_char);

        let Some(attack) = attack else {
            normalized.base_rows.insert(owner.to_string(), clean_row(row));
            continue;
        };
        let Some(key) = RawAttackKey::parse(&attack) else {
            tracing::debug!(row = %row_name, "dropping row with unrecognised attack");
            normalized.dropped_rows += 1;
            continue;
        };

        let block = transform_stats(row);
        if owner == DEFAULT_OWNER {
            route_attack(&mut normalized.defaults.attacks, key, block);
            continue;
        }

        let weapon_name = owner.replace(WEAPON_PREFIX, "");
        let index = *weapon_index.entry(weapon_name.clone()).or_insert_with(|| {
            normalized.weapons.push(Weapon::new(weapon_name.clone()));
            normalized.weapons.len() - 1
        });
        route_attack(&mut normalized.weapons[index].attacks, key, block);
    }

    tracing::debug!(
        weapons = normalized.weapons.len(),
        default_attacks = normalized.defaults.attacks.len(),
        dropped = normalized.dropped_rows,
        "normalized export"
    );
    normalized
}
