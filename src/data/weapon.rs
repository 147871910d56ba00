//! Per-weapon record model: attacks keyed by a closed set of names, each either a
//! light/heavy swing or a single flat stat block.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::data::stats::{optional_stat, StatBlock};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown attack '{0}'")]
    UnknownAttack(String),
    #[error("attack '{attack}' has an invalid shape: {source}")]
    AttackShape {
        attack: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("attack '{0}' must be a JSON object")]
    NotAnObject(String),
    #[error("invalid weapon record: {0}")]
    Record(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DamageType {
    Cut,
    Chop,
    Blunt,
    Slash,
    Other(String),
}

impl DamageType {
    /// Case-insensitive; unrecognised names are kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cut" => Self::Cut,
            "chop" => Self::Chop,
            "blunt" => Self::Blunt,
            "slash" => Self::Slash,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Cut => "Cut",
            Self::Chop => "Chop",
            Self::Blunt => "Blunt",
            Self::Slash => "Slash",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for DamageType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<DamageType> for String {
    fn from(damage_type: DamageType) -> Self {
        damage_type.as_str().to_string()
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttackName {
    Slash,
    Overhead,
    Stab,
    Average,
    Throw,
    Special,
    SprintAttack,
    SprintCharge,
}

impl AttackName {
    pub const ALL: [AttackName; 8] = [
        AttackName::Average,
        AttackName::Slash,
        AttackName::Overhead,
        AttackName::Stab,
        AttackName::Special,
        AttackName::SprintAttack,
        AttackName::SprintCharge,
        AttackName::Throw,
    ];

    /// The three measured swings that the average attack is built from.
    pub const MEASURED_SWINGS: [AttackName; 3] =
        [AttackName::Slash, AttackName::Overhead, AttackName::Stab];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slash => "slash",
            Self::Overhead => "overhead",
            Self::Stab => "stab",
            Self::Average => "average",
            Self::Throw => "throw",
            Self::Special => "special",
            Self::SprintAttack => "sprintAttack",
            Self::SprintCharge => "sprintCharge",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|name| name.as_str() == key)
    }

    /// Swing attacks carry separate light and heavy records.
    pub fn is_swing(&self) -> bool {
        matches!(self, Self::Slash | Self::Overhead | Self::Stab | Self::Average)
    }
}

impl fmt::Display for AttackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Light,
    Heavy,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::Light, Slot::Heavy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Heavy => "heavy",
        }
    }
}

/// Attack key as it appears after the dot in an export row name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAttackKey {
    pub attack: AttackName,
    pub slot: Slot,
}

impl RawAttackKey {
    /// Accepts the ten export attack names (`slash`, `slashHeavy`, ..., `sprintCharge`).
    /// `average` is synthesized, never exported, and is rejected here.
    pub fn parse(key: &str) -> Option<Self> {
        let (base, slot) = match key.strip_suffix("Heavy") {
            Some(base) => (base, Slot::Heavy),
            None => (key, Slot::Light),
        };
        let attack = AttackName::parse(base)?;
        match (attack, slot) {
            (AttackName::Average, _) => None,
            (name, Slot::Heavy) if !name.is_swing() => None,
            (attack, slot) => Some(Self { attack, slot }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingAttack {
    #[serde(default, with = "optional_stat", skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
    #[serde(default, with = "optional_stat", skip_serializing_if = "Option::is_none")]
    pub alt_range: Option<f64>,
    #[serde(default)]
    pub light: StatBlock,
    #[serde(default)]
    pub heavy: StatBlock,
    /// Hand-authored swing-level keys, kept across ingestion.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SwingAttack {
    pub fn slot(&self, slot: Slot) -> &StatBlock {
        match slot {
            Slot::Light => &self.light,
            Slot::Heavy => &self.heavy,
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut StatBlock {
        match slot {
            Slot::Light => &mut self.light,
            Slot::Heavy => &mut self.heavy,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attack {
    Swing(SwingAttack),
    Simple(StatBlock),
}

impl Attack {
    /// Empty attack of the shape `name` requires.
    pub fn empty_for(name: AttackName) -> Self {
        if name.is_swing() {
            Self::Swing(SwingAttack::default())
        } else {
            Self::Simple(StatBlock::default())
        }
    }

    pub fn as_swing(&self) -> Option<&SwingAttack> {
        match self {
            Self::Swing(swing) => Some(swing),
            Self::Simple(_) => None,
        }
    }

    pub fn as_simple(&self) -> Option<&StatBlock> {
        match self {
            Self::Simple(block) => Some(block),
            Self::Swing(_) => None,
        }
    }

    /// Every stat block in the attack: light then heavy for swings, the flat record otherwise.
    pub fn blocks(&self) -> Vec<&StatBlock> {
        match self {
            Self::Swing(swing) => vec![&swing.light, &swing.heavy],
            Self::Simple(block) => vec![block],
        }
    }

    pub fn blocks_mut(&mut self) -> Vec<&mut StatBlock> {
        match self {
            Self::Swing(swing) => vec![&mut swing.light, &mut swing.heavy],
            Self::Simple(block) => vec![block],
        }
    }

    fn to_value(&self) -> Value {
        let map: Map<String, Value> = match self {
            Self::Swing(swing) => match serde_json::to_value(swing) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            Self::Simple(block) => block.clone().into(),
        };
        Value::Object(map)
    }
}

/// Attack table of one weapon (or of the default table), ordered by [AttackName].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Attacks(BTreeMap<AttackName, Attack>);

impl Attacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: AttackName) -> Option<&Attack> {
        self.0.get(&name)
    }

    pub fn get_mut(&mut self, name: AttackName) -> Option<&mut Attack> {
        self.0.get_mut(&name)
    }

    pub fn swing(&self, name: AttackName) -> Option<&SwingAttack> {
        self.get(name).and_then(Attack::as_swing)
    }

    pub fn contains(&self, name: AttackName) -> bool {
        self.0.contains_key(&name)
    }

    pub fn insert(&mut self, name: AttackName, attack: Attack) -> Option<Attack> {
        self.0.insert(name, attack)
    }

    /// Existing attack, or a freshly created empty one of the right shape.
    pub fn entry(&mut self, name: AttackName) -> &mut Attack {
        self.0.entry(name).or_insert_with(|| Attack::empty_for(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttackName, &Attack)> {
        self.0.iter().map(|(name, attack)| (*name, attack))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AttackName, &mut Attack)> {
        self.0.iter_mut().map(|(name, attack)| (*name, attack))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for Attacks {
    type Error = ModelError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut attacks = Attacks::new();
        for (key, value) in map {
            let name = AttackName::parse(&key).ok_or_else(|| ModelError::UnknownAttack(key.clone()))?;
            let Value::Object(fields) = value else {
                return Err(ModelError::NotAnObject(key));
            };
            let attack = if name.is_swing() {
                let swing = serde_json::from_value(Value::Object(fields))
                    .map_err(|source| ModelError::AttackShape { attack: key, source })?;
                Attack::Swing(swing)
            } else {
                Attack::Simple(StatBlock::from(fields))
            };
            attacks.insert(name, attack);
        }
        Ok(attacks)
    }
}

impl From<Attacks> for Map<String, Value> {
    fn from(attacks: Attacks) -> Self {
        attacks
            .0
            .iter()
            .map(|(name, attack)| (name.as_str().to_string(), attack.to_value()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<DamageType>,
    #[serde(default, with = "optional_stat", skip_serializing_if = "Option::is_none")]
    pub stamina_damage_negation: Option<f64>,
    #[serde(default)]
    pub attacks: Attacks,
    /// Hand-authored fields (classes, weapon types, aliases, ...) that ingestion never touches.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Weapon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            damage_type: None,
            stamina_damage_negation: None,
            attacks: Attacks::new(),
            extra: Map::new(),
        }
    }

    /// Weapons with an id take part in matchups; the rest are templates.
    pub fn is_rated(&self) -> bool {
        self.id.is_some()
    }

    pub fn to_record(&self) -> Result<Map<String, Value>, ModelError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    pub fn from_record(record: Map<String, Value>) -> Result<Self, ModelError> {
        Ok(serde_json::from_value(Value::Object(record))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::Stat;
    use serde_json::json;

    #[test]
    fn raw_attack_keys_cover_the_export_allow_list() {
        let allowed = [
            "slash",
            "slashHeavy",
            "overhead",
            "overheadHeavy",
            "stab",
            "stabHeavy",
            "throw",
            "special",
            "sprintAttack",
            "sprintCharge",
        ];
        for key in allowed {
            assert!(RawAttackKey::parse(key).is_some(), "{key} should be accepted");
        }
        assert_eq!(
            RawAttackKey::parse("stabHeavy"),
            Some(RawAttackKey {
                attack: AttackName::Stab,
                slot: Slot::Heavy
            })
        );
        for key in ["average", "throwHeavy", "kick", "Slash", "jumpAttack"] {
            assert!(RawAttackKey::parse(key).is_none(), "{key} should be dropped");
        }
    }

    #[test]
    fn damage_type_parses_case_insensitively() {
        assert_eq!(DamageType::parse("BLUNT"), DamageType::Blunt);
        assert_eq!(DamageType::parse("chop"), DamageType::Chop);
        assert_eq!(DamageType::parse("Pierce"), DamageType::Other("Pierce".into()));
        assert_eq!(String::from(DamageType::Cut), "Cut");
    }

    #[test]
    fn weapon_record_round_trips_with_hand_authored_fields() {
        let record = json!({
            "name": "Messer",
            "id": "messer",
            "damageType": "Cut",
            "classes": ["Footman"],
            "attacks": {
                "slash": {"range": 50, "altRange": 45, "light": {"damage": 40}, "heavy": {"damage": 60}},
                "throw": {"damage": 30}
            }
        });
        let Value::Object(map) = record else { unreachable!() };
        let weapon = Weapon::from_record(map).unwrap();
        assert!(weapon.is_rated());
        assert_eq!(weapon.damage_type, Some(DamageType::Cut));
        assert_eq!(weapon.extra.get("classes"), Some(&json!(["Footman"])));
        let slash = weapon.attacks.swing(AttackName::Slash).unwrap();
        assert_eq!(slash.range, Some(50.0));
        assert_eq!(slash.heavy.get(Stat::Damage), Some(60.0));
        let throw = weapon.attacks.get(AttackName::Throw).and_then(Attack::as_simple).unwrap();
        assert_eq!(throw.get(Stat::Damage), Some(30.0));

        let back = weapon.to_record().unwrap();
        assert_eq!(back["attacks"]["slash"]["light"]["damage"], json!(40));
        assert_eq!(back["classes"], json!(["Footman"]));
    }

    #[test]
    fn swing_level_keys_survive_a_round_trip() {
        let Value::Object(map) = json!({
            "name": "Axe",
            "attacks": {"slash": {"range": 50, "rangeSource": "save-2024", "light": {}, "heavy": {}}}
        }) else {
            unreachable!()
        };
        let weapon = Weapon::from_record(map).unwrap();
        let slash = weapon.attacks.swing(AttackName::Slash).unwrap();
        assert_eq!(slash.range, Some(50.0));
        assert_eq!(slash.extra.get("rangeSource"), Some(&json!("save-2024")));

        let back = weapon.to_record().unwrap();
        assert_eq!(back["attacks"]["slash"]["rangeSource"], json!("save-2024"));
        assert!(back["attacks"]["slash"].get("light").is_some());
    }

    #[test]
    fn unknown_attack_in_record_is_rejected() {
        let Value::Object(map) = json!({"name": "X", "attacks": {"kick": {}}}) else { unreachable!() };
        let err = Weapon::from_record(map).unwrap_err();
        assert!(err.to_string().contains("kick"));
    }
}
