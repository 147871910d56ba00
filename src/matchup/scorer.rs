//! Pairwise weapon comparison across a weighted stat/attack matrix.
//!
//! Both weapons are cloned before the damage-type multiplier and the
//! opponent-dependent stamina negation are applied, so a comparison never
//! leaks into another. Because stamina negation depends on the opponent,
//! `score(a, b)` is not guaranteed to equal `-score(b, a)`.

use crate::combat::{global_damage_multiplier, negation_multiplier};
use crate::data::stats::{Stat, StatBlock};
use crate::data::weapon::{Attack, AttackName, SwingAttack, Weapon};

/// Stat weights; the sign says whether higher (positive) or lower (negative) is better.
/// Riposte stands in for windup when riposting, so the two share windup's weight.
pub const MATCHUP_STAT_WEIGHTS: [(Stat, f64); 9] = [
    (Stat::Windup, -0.125),
    (Stat::Riposte, -0.125),
    (Stat::Release, 0.25),
    (Stat::Recovery, -0.25),
    (Stat::Combo, -0.25),
    (Stat::Damage, 1.0),
    (Stat::StaminaDamage, 1.0),
    (Stat::Range, 1.0),
    (Stat::AltRange, 1.0),
];

pub const MATCHUP_ATTACK_WEIGHTS: [(AttackName, f64); 8] = [
    (AttackName::Average, 0.0),
    (AttackName::Slash, 1.0),
    (AttackName::Overhead, 1.0),
    (AttackName::Stab, 1.0),
    (AttackName::Special, 0.0),
    (AttackName::SprintAttack, 0.0),
    (AttackName::SprintCharge, 0.0),
    (AttackName::Throw, 0.0),
];

pub const LIGHT_WEIGHT: f64 = 1.0;
pub const HEAVY_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub stats: Vec<(Stat, f64)>,
    pub attacks: Vec<(AttackName, f64)>,
    pub light: f64,
    pub heavy: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            stats: MATCHUP_STAT_WEIGHTS.to_vec(),
            attacks: MATCHUP_ATTACK_WEIGHTS.to_vec(),
            light: LIGHT_WEIGHT,
            heavy: HEAVY_WEIGHT,
        }
    }
}

impl ScoringWeights {
    pub fn stat_weight(&self, stat: Stat) -> f64 {
        self.stats
            .iter()
            .find(|(s, _)| *s == stat)
            .map_or(0.0, |(_, weight)| *weight)
    }
}

/// `+weight` when `a` wins, `-weight` when `b` wins, zero on a tie.
pub fn compare_winner(weight: f64, a: f64, b: f64) -> f64 {
    if a > b {
        weight
    } else if a < b {
        -weight
    } else {
        0.0
    }
}

fn for_each_block(weapon: &mut Weapon, mut apply: impl FnMut(&mut StatBlock)) {
    for (_, attack) in weapon.attacks.iter_mut() {
        for block in attack.blocks_mut() {
            apply(block);
        }
    }
}

/// Scale every attack's damage by the weapon's damage-type multiplier.
pub fn apply_damage_multiplier(weapon: &mut Weapon) {
    let multiplier = global_damage_multiplier(weapon.damage_type.as_ref());
    for_each_block(weapon, |block| block.scale(Stat::Damage, multiplier));
}

/// Reduce the stamina damage `weapon` deals by the target's negation percentage.
pub fn apply_stamina_negation(weapon: &mut Weapon, target_negation: Option<f64>) {
    let multiplier = negation_multiplier(target_negation);
    for_each_block(weapon, |block| block.scale(Stat::StaminaDamage, multiplier));
}

/// Isolated copies of both weapons with matchup preprocessing applied.
pub fn prepare_pair(weapon: &Weapon, other: &Weapon) -> (Weapon, Weapon) {
    let mut weapon = weapon.clone();
    let mut other = other.clone();

    apply_damage_multiplier(&mut weapon);
    apply_damage_multiplier(&mut other);

    let weapon_negation = weapon.stamina_damage_negation;
    apply_stamina_negation(&mut weapon, other.stamina_damage_negation);
    apply_stamina_negation(&mut other, weapon_negation);

    (weapon, other)
}

fn value(block: &StatBlock, stat: Stat) -> f64 {
    block.get(stat).unwrap_or(0.0)
}

fn score_blocks(weights: &ScoringWeights, scale: f64, a: &StatBlock, b: &StatBlock) -> f64 {
    weights
        .stats
        .iter()
        .map(|(stat, weight)| compare_winner(scale * weight, value(a, *stat), value(b, *stat)))
        .sum()
}

fn score_swing(weights: &ScoringWeights, attack_weight: f64, a: &SwingAttack, b: &SwingAttack) -> f64 {
    let mut score = compare_winner(
        attack_weight * weights.stat_weight(Stat::Range),
        a.range.unwrap_or(0.0),
        b.range.unwrap_or(0.0),
    );
    score += compare_winner(
        attack_weight * weights.stat_weight(Stat::AltRange),
        a.alt_range.unwrap_or(0.0),
        b.alt_range.unwrap_or(0.0),
    );
    score += score_blocks(weights, attack_weight * weights.light, &a.light, &b.light);
    score += score_blocks(weights, attack_weight * weights.heavy, &a.heavy, &b.heavy);
    score
}

/// Contribution of one attack. A side missing the attack compares as all zeros.
fn score_attack(
    weights: &ScoringWeights,
    name: AttackName,
    attack_weight: f64,
    a: Option<&Attack>,
    b: Option<&Attack>,
) -> f64 {
    if name.is_swing() {
        let empty = SwingAttack::default();
        let a = a.and_then(Attack::as_swing).unwrap_or(&empty);
        let b = b.and_then(Attack::as_swing).unwrap_or(&empty);
        score_swing(weights, attack_weight, a, b)
    } else {
        let empty = StatBlock::default();
        let a = a.and_then(Attack::as_simple).unwrap_or(&empty);
        let b = b.and_then(Attack::as_simple).unwrap_or(&empty);
        score_blocks(weights, attack_weight, a, b)
    }
}

pub fn score_with(weights: &ScoringWeights, weapon: &Weapon, other: &Weapon) -> f64 {
    let (weapon, other) = prepare_pair(weapon, other);

    weights
        .attacks
        .iter()
        .filter(|(_, attack_weight)| *attack_weight != 0.0)
        .map(|(name, attack_weight)| {
            score_attack(
                weights,
                *name,
                *attack_weight,
                weapon.attacks.get(*name),
                other.attacks.get(*name),
            )
        })
        .sum()
}

/// Positive favours `weapon`, negative favours `other`, zero is a tie.
pub fn score(weapon: &Weapon, other: &Weapon) -> f64 {
    score_with(&ScoringWeights::default(), weapon, other)
}
