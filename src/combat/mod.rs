pub mod derived;
pub mod stamina;

use thiserror::Error;

use crate::data::weapon::AttackName;

#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("unknown damage type '{0}'")]
    UnknownDamageType(String),
    #[error("weapon '{weapon}' is missing its {attack} attack")]
    MissingAttack { weapon: String, attack: AttackName },
    #[error("weapon '{0}' has an id but no damage type")]
    MissingDamageType(String),
}

pub use derived::{derive_stats, fill_sprint_charge, make_average_attack, make_stamina_damage};
pub use stamina::{
    global_damage_multiplier, negation_multiplier, stamina_damage, stamina_factor,
    BASE_STAMINA_DAMAGE_MULT,
};
