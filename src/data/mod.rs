pub mod changelog;
pub mod defaults;
pub mod export;
pub mod ingest;
pub mod merge;
pub mod naming;
pub mod normalize;
pub mod stats;
pub mod store;
pub mod weapon;

pub use changelog::Changelog;
pub use defaults::{resolve_defaults, resolve_weapon_defaults, DefaultsSummary};
pub use export::{load_export, parse_export, ExportError, RawExport};
pub use ingest::{
    ingest_export, ingest_weapon, IngestError, IngestReport, MergedWeapon, WeaponFailure,
};
pub use merge::{align_key_order, merge_into, merge_records, ChangeEntry};
pub use normalize::{normalize_export, DefaultTable, NormalizedExport};
pub use stats::{Stat, StatBlock};
pub use store::{StoreError, WeaponStore};
pub use weapon::{Attack, AttackName, Attacks, DamageType, ModelError, Slot, SwingAttack, Weapon};
