use armory::data::{merge_records, Changelog, ChangeEntry, Weapon};
use serde_json::{json, Map, Value};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn reversed(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .rev()
        .map(|(key, value)| {
            let value = match value {
                Value::Object(nested) => Value::Object(reversed(nested)),
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

fn sorted_paths(changes: &[ChangeEntry]) -> Vec<String> {
    let mut lines: Vec<String> = changes.iter().map(ToString::to_string).collect();
    lines.sort();
    lines
}

fn persisted_messer() -> Map<String, Value> {
    object(json!({
        "name": "Messer",
        "id": "messer",
        "damageType": "Cut",
        "classes": ["Footman", "Vanguard"],
        "attacks": {
            "slash": {
                "range": 60,
                "light": {"windup": 450, "damage": 40, "staminaDamage": 12},
                "heavy": {"windup": 700, "damage": 65}
            },
            "throw": {"damage": 30}
        }
    }))
}

#[test]
fn merging_a_record_into_itself_changes_nothing() {
    for record in [
        persisted_messer(),
        object(json!({})),
        object(json!({"name": "Club", "attacks": {"special": {"damage": null}}})),
    ] {
        let (changes, merged) = merge_records(record.clone(), &record);
        assert!(changes.is_empty(), "unexpected changes: {changes:?}");
        assert_eq!(merged, record);
    }
}

#[test]
fn merge_result_does_not_depend_on_traversal_order() {
    let incoming = object(json!({
        "damageType": "Chop",
        "attacks": {
            "slash": {"light": {"damage": 44, "combo": 300}, "altRange": 40},
            "stab": {"light": {"damage": 35}},
            "throw": {"damage": 30}
        }
    }));

    let (forward_changes, forward) = merge_records(persisted_messer(), &incoming);
    let (reverse_changes, reverse) = merge_records(persisted_messer(), &reversed(&incoming));

    assert_eq!(forward, reverse);
    assert_eq!(sorted_paths(&forward_changes), sorted_paths(&reverse_changes));
    assert_eq!(
        sorted_paths(&forward_changes),
        vec![
            "attacks.slash.altRange: None -> 40",
            "attacks.slash.light.combo: None -> 300",
            "attacks.slash.light.damage: 40 -> 44",
            "attacks.stab: None -> {\n  \"light\": {\n    \"damage\": 35\n  }\n}",
            "damageType: Cut -> Chop",
        ]
    );
}

#[test]
fn hand_authored_fields_outside_the_export_survive() {
    let incoming = object(json!({"attacks": {"slash": {"light": {"damage": 41}}}}));
    let (changes, merged) = merge_records(persisted_messer(), &incoming);

    assert_eq!(changes.len(), 1);
    assert_eq!(merged["classes"], json!(["Footman", "Vanguard"]));
    assert_eq!(merged["attacks"]["slash"]["heavy"]["windup"], json!(700));
    assert_eq!(merged["attacks"]["slash"]["light"]["staminaDamage"], json!(12));
}

#[test]
fn typed_weapon_round_trips_through_an_unchanged_merge() {
    let weapon = Weapon::from_record(persisted_messer()).unwrap();
    let record = weapon.to_record().unwrap();

    let (changes, merged) = merge_records(persisted_messer(), &record);
    assert!(changes.is_empty(), "unexpected changes: {changes:?}");
    assert_eq!(Weapon::from_record(merged).unwrap(), weapon);
}

#[test]
fn changelog_groups_changes_per_weapon() {
    let incoming = object(json!({"attacks": {"throw": {"damage": 32}}}));
    let (changes, _) = merge_records(persisted_messer(), &incoming);

    let mut changelog = Changelog::new();
    changelog.record("Messer", changes);
    changelog.record("Club", Vec::new());

    assert_eq!(changelog.len(), 1);
    assert_eq!(changelog.render_text(), "Messer:\n\tattacks.throw.damage: 30 -> 32\n");
    assert_eq!(changelog.lines(), vec!["Messer.attacks.throw.damage: 30 -> 32"]);
    assert!(changelog.changes_for("Club").is_none());
}
