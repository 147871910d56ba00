//! Fill unset per-weapon stats from the default table.

use crate::data::normalize::DefaultTable;
use crate::data::stats::{is_sentinel, StatBlock};
use crate::data::weapon::{Attack, Slot, Weapon};

/// Outcome counters for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultsSummary {
    pub resolved: usize,
    /// Unset stats with no matching default. They stay unset.
    pub unresolved: usize,
}

fn resolve_block(block: &mut StatBlock, default: Option<&StatBlock>, summary: &mut DefaultsSummary) {
    let unset: Vec<_> = block.stats().filter(|stat| block.is_unset(*stat)).collect();
    for stat in unset {
        match default.and_then(|d| d.get(stat)) {
            Some(value) => {
                block.set(stat, value);
                summary.resolved += 1;
            }
            None => summary.unresolved += 1,
        }
    }

    // columns outside the stat vocabulary still carry the raw sentinel
    let unset_extra: Vec<String> = block
        .extra
        .iter()
        .filter(|(_, value)| is_sentinel(value))
        .map(|(key, _)| key.clone())
        .collect();
    for key in unset_extra {
        let fallback = default
            .and_then(|d| d.extra.get(&key))
            .filter(|value| !is_sentinel(value));
        match fallback {
            Some(value) => {
                block.extra.insert(key, value.clone());
                summary.resolved += 1;
            }
            None => summary.unresolved += 1,
        }
    }
}

pub fn resolve_weapon_defaults(weapon: &mut Weapon, defaults: &DefaultTable) -> DefaultsSummary {
    let mut summary = DefaultsSummary::default();
    for (name, attack) in weapon.attacks.iter_mut() {
        let default = defaults.attacks.get(name);
        match attack {
            Attack::Swing(swing) => {
                for slot in Slot::BOTH {
                    let default_block = default.and_then(Attack::as_swing).map(|d| d.slot(slot));
                    resolve_block(swing.slot_mut(slot), default_block, &mut summary);
                }
            }
            Attack::Simple(block) => {
                resolve_block(block, default.and_then(Attack::as_simple), &mut summary);
            }
        }
    }
    if summary.unresolved > 0 {
        tracing::debug!(
            weapon = %weapon.name,
            unresolved = summary.unresolved,
            "stats left unset, no default available"
        );
    }
    summary
}

pub fn resolve_defaults(weapons: &mut [Weapon], defaults: &DefaultTable) -> DefaultsSummary {
    weapons
        .iter_mut()
        .map(|weapon| resolve_weapon_defaults(weapon, defaults))
        .fold(DefaultsSummary::default(), |acc, next| DefaultsSummary {
            resolved: acc.resolved + next.resolved,
            unresolved: acc.unresolved + next.unresolved,
        })
}
