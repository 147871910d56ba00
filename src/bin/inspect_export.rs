//! Print what an attack-table export normalizes to, without touching the weapon store.
//! Run: cargo run --bin inspect_export -- <export.json>

use armory::data::{load_export, normalize_export, resolve_defaults};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: inspect_export <export.json>");
        std::process::exit(2);
    };

    let export = load_export(&path)?;
    let mut normalized = normalize_export(&export);
    let defaults = resolve_defaults(&mut normalized.weapons, &normalized.defaults);

    println!("export: {path}");
    println!(
        "rows={} weapons={} base_rows={} dropped_rows={}",
        export.len(),
        normalized.weapons.len(),
        normalized.base_rows.len(),
        normalized.dropped_rows
    );
    println!(
        "default attacks={} resolved_stats={} unresolved_stats={}",
        normalized.defaults.attacks.len(),
        defaults.resolved,
        defaults.unresolved
    );

    for weapon in &normalized.weapons {
        let attacks: Vec<&str> = weapon.attacks.iter().map(|(name, _)| name.as_str()).collect();
        println!("{}\t{}", weapon.name, attacks.join(","));
    }
    Ok(())
}
