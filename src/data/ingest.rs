//! Ingestion run: normalize the export, resolve defaults, then merge each weapon
//! into its persisted record, derive secondary stats and write it back.

use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::combat::{derive_stats, DeriveError};
use crate::data::changelog::Changelog;
use crate::data::defaults::resolve_defaults;
use crate::data::export::{ExportError, RawExport};
use crate::data::merge::{align_key_order, merge_records, ChangeEntry};
use crate::data::naming::{display_name, file_stem, pascal_to_space};
use crate::data::normalize::normalize_export;
use crate::data::store::{StoreError, WeaponStore};
use crate::data::weapon::{ModelError, Weapon};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Derive(#[from] DeriveError),
}

/// A weapon that could not be derived. The rest of the run continues without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponFailure {
    pub weapon: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub written: Vec<PathBuf>,
    pub changelog: Changelog,
    pub failures: Vec<WeaponFailure>,
    pub dropped_rows: usize,
    pub unresolved_defaults: usize,
}

impl IngestReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// One weapon after merge and derivation.
#[derive(Debug, Clone)]
pub struct MergedWeapon {
    pub changes: Vec<ChangeEntry>,
    pub weapon: Weapon,
    /// `weapon` as it is persisted, keys in the order of the file it was merged into.
    pub record: Map<String, Value>,
}

/// Merge one normalized weapon into its persisted record and derive its stats.
/// `incoming.name` is the raw export owner; the result carries the display name.
pub fn ingest_weapon(
    incoming: &Weapon,
    existing: Option<Map<String, Value>>,
) -> Result<MergedWeapon, IngestError> {
    let mut incoming = incoming.clone();
    incoming.name = display_name(&incoming.name);
    let incoming_record = incoming.to_record()?;

    let (changes, merged) = merge_records(existing.unwrap_or_default(), &incoming_record);
    let mut weapon = Weapon::from_record(merged.clone())?;
    derive_stats(&mut weapon)?;
    weapon.name = pascal_to_space(&weapon.name);
    let record = align_key_order(weapon.to_record()?, &merged);
    Ok(MergedWeapon { changes, weapon, record })
}

pub fn ingest_export(export: &RawExport, store: &WeaponStore) -> Result<IngestReport, IngestError> {
    let mut normalized = normalize_export(export);
    let defaults = resolve_defaults(&mut normalized.weapons, &normalized.defaults);

    let mut report = IngestReport {
        dropped_rows: normalized.dropped_rows,
        unresolved_defaults: defaults.unresolved,
        ..IngestReport::default()
    };

    for weapon in &normalized.weapons {
        let stem = file_stem(&weapon.name);
        let existing = store.load_record(&stem)?;

        let merged = match ingest_weapon(weapon, existing) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(weapon = %weapon.name, error = %err, "skipping weapon");
                report.failures.push(WeaponFailure {
                    weapon: weapon.name.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        report.written.push(store.save_record(&stem, &merged.record)?);
        report.changelog.record(merged.weapon.name, merged.changes);
    }

    tracing::info!(
        written = report.written.len(),
        changed = report.changelog.len(),
        failed = report.failures.len(),
        "ingestion complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::Stat;
    use crate::data::weapon::{Attack, AttackName};
    use serde_json::json;

    fn existing(value: Value) -> Option<Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn hand_authored_fields_survive_the_merge() {
        let mut incoming = Weapon::new("LongSword");
        incoming.attacks.entry(AttackName::Throw);
        if let Some(Attack::Simple(throw)) = incoming.attacks.get_mut(AttackName::Throw) {
            throw.set(Stat::Damage, 35.0);
        }

        let merged = ingest_weapon(
            &incoming,
            existing(json!({"name": "Long Sword", "damageType": "Cut", "classes": ["Knight"]})),
        )
        .unwrap();

        assert_eq!(merged.weapon.name, "Long Sword");
        assert_eq!(merged.weapon.extra.get("classes"), Some(&json!(["Knight"])));
        assert_eq!(merged.changes.len(), 1);
        assert_eq!(merged.changes[0].dotted_path(), "attacks");
        let keys: Vec<&str> = merged.record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "damageType", "classes", "attacks"]);
    }
}
