//! Secondary stats computed from a resolved weapon record: stamina damage per
//! attack, the synthetic average swing, and the sprint charge fallback.

use serde_json::Map;

use crate::combat::stamina::stamina_damage;
use crate::combat::DeriveError;
use crate::data::stats::{number_value, numeric, Stat, StatBlock};
use crate::data::weapon::{Attack, AttackName, Slot, SwingAttack, Weapon};

/// Derive every secondary stat in place. Returns `false` for template records
/// without a slash attack, which are left untouched.
pub fn derive_stats(weapon: &mut Weapon) -> Result<bool, DeriveError> {
    if !weapon.attacks.contains(AttackName::Slash) {
        tracing::debug!(weapon = %weapon.name, "no slash attack, skipping derivation");
        return Ok(false);
    }

    if weapon.damage_type.is_some() {
        make_stamina_damage(weapon)?;
    } else if weapon.is_rated() {
        return Err(DeriveError::MissingDamageType(weapon.name.clone()));
    }

    let average = make_average_attack(weapon)?;
    weapon.attacks.insert(AttackName::Average, Attack::Swing(average));
    fill_sprint_charge(weapon);
    Ok(true)
}

/// `staminaDamage` for every measured attack, from its damage and damage type
/// (a per-record override wins over the weapon's type). The average attack is
/// skipped; it inherits stamina damage through averaging.
pub fn make_stamina_damage(weapon: &mut Weapon) -> Result<(), DeriveError> {
    let Some(weapon_type) = weapon.damage_type.clone() else {
        return Err(DeriveError::MissingDamageType(weapon.name.clone()));
    };

    for (name, attack) in weapon.attacks.iter_mut() {
        if name == AttackName::Average {
            continue;
        }
        for block in attack.blocks_mut() {
            let damage_type = block.damage_type_override.as_ref().unwrap_or(&weapon_type);
            let Some(damage) = block.get(Stat::Damage) else {
                continue;
            };
            let value = stamina_damage(damage, damage_type)?;
            block.set(Stat::StaminaDamage, value);
        }
    }
    Ok(())
}

fn measured_swings(weapon: &Weapon) -> Result<[&SwingAttack; 3], DeriveError> {
    let get = |name: AttackName| {
        weapon.attacks.swing(name).ok_or_else(|| DeriveError::MissingAttack {
            weapon: weapon.name.clone(),
            attack: name,
        })
    };
    Ok([
        get(AttackName::Slash)?,
        get(AttackName::Overhead)?,
        get(AttackName::Stab)?,
    ])
}

fn average_slot(sources: &[&SwingAttack; 3], template: &StatBlock, slot: Slot) -> StatBlock {
    let mut average = StatBlock::new();

    for stat in template.stats() {
        let values: Option<Vec<f64>> = sources.iter().map(|s| s.slot(slot).get(stat)).collect();
        match values {
            Some(values) => average.set(stat, values.iter().sum::<f64>() / 3.0),
            None => tracing::warn!(stat = %stat, slot = slot.as_str(), "stat unset on a measured swing, not averaged"),
        }
    }

    let mut extra = Map::new();
    for (key, template_value) in &template.extra {
        if numeric(template_value).is_none() {
            tracing::warn!(stat = %key, value = %template_value, "non-numeric stat, not averaged");
            continue;
        }
        let values: Option<Vec<f64>> = sources
            .iter()
            .map(|s| s.slot(slot).extra.get(key).and_then(numeric))
            .collect();
        match values {
            Some(values) => {
                extra.insert(key.clone(), number_value(values.iter().sum::<f64>() / 3.0));
            }
            None => tracing::warn!(stat = %key, slot = slot.as_str(), "non-numeric stat, not averaged"),
        }
    }
    average.extra = extra;
    average
}

/// Mean of slash, overhead and stab, light and heavy independently. The key set
/// follows `slash.light`; `cleaveOverride` and `damageTypeOverride` never carry over.
pub fn make_average_attack(weapon: &Weapon) -> Result<SwingAttack, DeriveError> {
    let sources = measured_swings(weapon)?;
    let template = &sources[0].light;

    let mut average = SwingAttack {
        light: average_slot(&sources, template, Slot::Light),
        heavy: average_slot(&sources, template, Slot::Heavy),
        ..SwingAttack::default()
    };

    if sources.iter().any(|s| s.range.is_some()) {
        average.range = Some(sources.iter().filter_map(|s| s.range).sum::<f64>() / 3.0);
    }
    if sources.iter().any(|s| s.alt_range.is_some()) {
        average.alt_range = Some(sources.iter().filter_map(|s| s.alt_range).sum::<f64>() / 3.0);
    }
    Ok(average)
}

/// Weapons without a dedicated sprint charge reuse their sprint attack.
pub fn fill_sprint_charge(weapon: &mut Weapon) {
    if weapon.attacks.contains(AttackName::SprintCharge) {
        return;
    }
    if let Some(sprint) = weapon.attacks.get(AttackName::SprintAttack).cloned() {
        weapon.attacks.insert(AttackName::SprintCharge, sprint);
    }
}
