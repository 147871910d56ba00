use crate::combat::DeriveError;
use crate::data::weapon::DamageType;

/// Share of physical damage dealt to stamina before damage-type scaling.
pub const BASE_STAMINA_DAMAGE_MULT: f64 = 0.3;

pub const CHOP_STAMINA_FACTOR: f64 = 1.1;
pub const BLUNT_STAMINA_FACTOR: f64 = 1.25;
pub const CUT_STAMINA_FACTOR: f64 = 1.0;

/// Mean class bonus for blunt weapons across the four target classes: (1 + 1 + 1.35 + 1.5) / 4.
pub const BLUNT_DAMAGE_MULTIPLIER: f64 = 1.2125;
/// (1 + 1 + 1.175 + 1.25) / 4.
pub const SLASH_DAMAGE_MULTIPLIER: f64 = 1.10625;

pub fn stamina_factor(damage_type: &DamageType) -> Result<f64, DeriveError> {
    match damage_type {
        DamageType::Chop => Ok(CHOP_STAMINA_FACTOR),
        DamageType::Blunt => Ok(BLUNT_STAMINA_FACTOR),
        DamageType::Cut => Ok(CUT_STAMINA_FACTOR),
        other => Err(DeriveError::UnknownDamageType(other.to_string())),
    }
}

pub fn stamina_damage(damage: f64, damage_type: &DamageType) -> Result<f64, DeriveError> {
    Ok(damage * BASE_STAMINA_DAMAGE_MULT * stamina_factor(damage_type)?)
}

/// Damage scaling applied to every attack of a weapon when scoring matchups.
pub fn global_damage_multiplier(damage_type: Option<&DamageType>) -> f64 {
    match damage_type {
        Some(DamageType::Blunt) => BLUNT_DAMAGE_MULTIPLIER,
        Some(DamageType::Slash) => SLASH_DAMAGE_MULTIPLIER,
        _ => 1.0,
    }
}

/// Fraction of stamina damage that lands on a target with `target_negation` percent negation.
pub fn negation_multiplier(target_negation: Option<f64>) -> f64 {
    (100.0 - target_negation.unwrap_or(0.0)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn stamina_damage_scales_by_damage_type() {
        approx_eq(stamina_damage(100.0, &DamageType::parse("cut")).unwrap(), 30.0);
        approx_eq(stamina_damage(100.0, &DamageType::parse("Chop")).unwrap(), 33.0);
        approx_eq(stamina_damage(100.0, &DamageType::parse("BLUNT")).unwrap(), 37.5);
    }

    #[test]
    fn slash_and_unknown_types_have_no_stamina_factor() {
        assert!(matches!(
            stamina_damage(10.0, &DamageType::Slash),
            Err(DeriveError::UnknownDamageType(t)) if t == "Slash"
        ));
        assert!(stamina_damage(10.0, &DamageType::parse("pierce")).is_err());
    }

    #[test]
    fn negation_defaults_to_zero() {
        approx_eq(negation_multiplier(None), 1.0);
        approx_eq(negation_multiplier(Some(50.0)), 0.5);
    }

    #[test]
    fn global_multiplier_only_boosts_blunt_and_slash() {
        approx_eq(global_damage_multiplier(Some(&DamageType::Blunt)), 1.2125);
        approx_eq(global_damage_multiplier(Some(&DamageType::Slash)), 1.10625);
        approx_eq(global_damage_multiplier(Some(&DamageType::Chop)), 1.0);
        approx_eq(global_damage_multiplier(None), 1.0);
    }
}
