//! Stat vocabulary and the flat stat block shared by every attack record.
//!
//! Raw exports mark "inherit the default" with `-1`; here that becomes `None`.
//! A stat can therefore be absent (never exported), present but unset, or set.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::data::weapon::DamageType;

/// Raw export value meaning "not set, inherit default".
pub const SENTINEL: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stat {
    Windup,
    Release,
    Recovery,
    Combo,
    Holding,
    Thwack,
    Riposte,
    Damage,
    StaminaDamage,
    Range,
    AltRange,
}

impl Stat {
    pub const ALL: [Stat; 11] = [
        Stat::Windup,
        Stat::Release,
        Stat::Recovery,
        Stat::Combo,
        Stat::Holding,
        Stat::Thwack,
        Stat::Riposte,
        Stat::Damage,
        Stat::StaminaDamage,
        Stat::Range,
        Stat::AltRange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windup => "windup",
            Self::Release => "release",
            Self::Recovery => "recovery",
            Self::Combo => "combo",
            Self::Holding => "holding",
            Self::Thwack => "thwack",
            Self::Riposte => "riposte",
            Self::Damage => "damage",
            Self::StaminaDamage => "staminaDamage",
            Self::Range => "range",
            Self::AltRange => "altRange",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|stat| stat.as_str() == key)
    }

    /// Exported in seconds, stored in milliseconds.
    pub fn is_time_valued(&self) -> bool {
        matches!(
            self,
            Self::Windup
                | Self::Release
                | Self::Recovery
                | Self::Combo
                | Self::Holding
                | Self::Thwack
                | Self::Riposte
        )
    }

    /// Stat whose value is borrowed when this one is unset or zero.
    pub fn fallback(&self) -> Option<Stat> {
        match self {
            Self::Riposte => Some(Self::Windup),
            Self::Thwack => Some(Self::Release),
            _ => None,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a stat value as JSON, keeping whole numbers integral so persisted
/// files stay stable across runs.
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Interpret a raw JSON value as a stat: numbers are values, `-1` and `null` are unset.
/// Anything else is not a stat value.
fn stat_value(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(n) => {
            let v = n.as_f64()?;
            Some(if v == SENTINEL { None } else { Some(v) })
        }
        _ => None,
    }
}

/// Raw `-1` left in a column outside the stat vocabulary.
pub fn is_sentinel(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.as_f64() == Some(SENTINEL))
}

/// Attempted numeric conversion used when averaging loosely typed columns.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Flat stat record for a simple attack or one light/heavy slot of a swing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct StatBlock {
    values: BTreeMap<Stat, Option<f64>>,
    pub cleave_override: Option<bool>,
    pub damage_type_override: Option<DamageType>,
    /// Export columns outside the stat vocabulary, carried through untouched.
    pub extra: Map<String, Value>,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set value of `stat`, or `None` when absent or unset.
    pub fn get(&self, stat: Stat) -> Option<f64> {
        self.values.get(&stat).copied().flatten()
    }

    pub fn contains(&self, stat: Stat) -> bool {
        self.values.contains_key(&stat)
    }

    /// Present in the record but carrying no value.
    pub fn is_unset(&self, stat: Stat) -> bool {
        matches!(self.values.get(&stat), Some(None))
    }

    pub fn set(&mut self, stat: Stat, value: f64) {
        self.values.insert(stat, Some(value));
    }

    pub fn insert(&mut self, stat: Stat, value: Option<f64>) {
        self.values.insert(stat, value);
    }

    pub fn remove(&mut self, stat: Stat) -> Option<Option<f64>> {
        self.values.remove(&stat)
    }

    /// Builder-style setter used heavily by fixtures.
    pub fn with(mut self, stat: Stat, value: f64) -> Self {
        self.set(stat, value);
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (Stat, Option<f64>)> + '_ {
        self.values.iter().map(|(stat, value)| (*stat, *value))
    }

    pub fn stats(&self) -> impl Iterator<Item = Stat> + '_ {
        self.values.keys().copied()
    }

    /// Multiply `stat` in place when it holds a value.
    pub fn scale(&mut self, stat: Stat, factor: f64) {
        if let Some(Some(value)) = self.values.get_mut(&stat) {
            *value *= factor;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
            && self.cleave_override.is_none()
            && self.damage_type_override.is_none()
            && self.extra.is_empty()
    }
}

impl From<Map<String, Value>> for StatBlock {
    fn from(map: Map<String, Value>) -> Self {
        let mut block = StatBlock::default();
        for (key, value) in map {
            match key.as_str() {
                "cleaveOverride" => {
                    if let Value::Bool(flag) = value {
                        block.cleave_override = Some(flag);
                        continue;
                    }
                }
                "damageTypeOverride" => {
                    if let Value::String(raw) = &value {
                        block.damage_type_override = Some(DamageType::parse(raw));
                        continue;
                    }
                }
                _ => {}
            }
            match (Stat::parse(&key), stat_value(&value)) {
                (Some(stat), Some(parsed)) => {
                    block.values.insert(stat, parsed);
                }
                _ => {
                    block.extra.insert(key, value);
                }
            }
        }
        block
    }
}

impl From<StatBlock> for Map<String, Value> {
    fn from(block: StatBlock) -> Self {
        let mut map = Map::new();
        for (stat, value) in block.values {
            let rendered = value.map(number_value).unwrap_or(Value::Null);
            map.insert(stat.as_str().to_string(), rendered);
        }
        if let Some(flag) = block.cleave_override {
            map.insert("cleaveOverride".to_string(), Value::Bool(flag));
        }
        if let Some(damage_type) = block.damage_type_override {
            map.insert("damageTypeOverride".to_string(), Value::String(damage_type.into()));
        }
        for (key, value) in block.extra {
            map.insert(key, value);
        }
        map
    }
}

/// Serde adapter for optional numeric fields outside a [StatBlock] (swing `range`/`altRange`,
/// weapon-level `staminaDamageNegation`). Reads `-1` as unset.
pub mod optional_stat {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => number_value(*v).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(raw.filter(|v| *v != SENTINEL))
    }
}
