//! Structural merge of a freshly ingested record into the persisted one, with an
//! audit trail of every leaf that changed.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// One changed or added leaf. `old` is `None` when the key was new.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEntry {
    pub path: Vec<String>,
    pub old: Option<Value>,
    pub new: Value,
}

impl ChangeEntry {
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Plain rendering: strings unquoted, nested records as pretty JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let old = self.old.as_ref().map(render_value).unwrap_or_else(|| "None".to_string());
        write!(f, "{}: {} -> {}", self.dotted_path(), old, render_value(&self.new))
    }
}

/// Leaf equality; numbers compare by value so `500` and `500.0` are the same leaf.
fn leaf_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => left == right,
    }
}

/// Merge `incoming` into `existing` in place. Changes are returned in the order
/// `incoming`'s keys are visited, depth first, each path prefixed with `path`.
pub fn merge_into(
    existing: &mut Map<String, Value>,
    incoming: &Map<String, Value>,
    path: &[String],
) -> Vec<ChangeEntry> {
    let mut changes = Vec::new();

    for (key, value) in incoming {
        let mut key_path = path.to_vec();
        key_path.push(key.clone());

        match existing.get_mut(key) {
            Some(Value::Object(current)) if value.is_object() => {
                if let Value::Object(nested) = value {
                    changes.extend(merge_into(current, nested, &key_path));
                }
            }
            Some(current) => {
                if !leaf_eq(current, value) {
                    changes.push(ChangeEntry {
                        path: key_path,
                        old: Some(current.clone()),
                        new: value.clone(),
                    });
                    *current = value.clone();
                }
            }
            None => {
                changes.push(ChangeEntry {
                    path: key_path,
                    old: None,
                    new: value.clone(),
                });
                existing.insert(key.clone(), value.clone());
            }
        }
    }

    changes
}

/// `existing` survives as the base of the merged record; `incoming` is only read.
pub fn merge_records(
    mut existing: Map<String, Value>,
    incoming: &Map<String, Value>,
) -> (Vec<ChangeEntry>, Map<String, Value>) {
    let changes = merge_into(&mut existing, incoming, &[]);
    (changes, existing)
}

/// Reorder `record`'s keys, at every depth, to follow `reference`. Keys missing
/// from `reference` keep their relative order after the known ones.
pub fn align_key_order(mut record: Map<String, Value>, reference: &Map<String, Value>) -> Map<String, Value> {
    let mut aligned = Map::new();
    for (key, reference_value) in reference {
        let Some(value) = record.get_mut(key).map(Value::take) else {
            continue;
        };
        let value = match (value, reference_value) {
            (Value::Object(nested), Value::Object(nested_reference)) => {
                Value::Object(align_key_order(nested, nested_reference))
            }
            (value, _) => value,
        };
        aligned.insert(key.clone(), value);
    }
    for (key, value) in record {
        if !aligned.contains_key(&key) {
            aligned.insert(key, value);
        }
    }
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn records_changed_and_new_leaves_with_paths() {
        let existing = object(json!({"name": "Axe", "attacks": {"slash": {"light": {"damage": 40}}}}));
        let incoming = object(json!({"attacks": {"slash": {"light": {"damage": 45, "windup": 400}}}}));

        let (changes, merged) = merge_records(existing, &incoming);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].dotted_path(), "attacks.slash.light.damage");
        assert_eq!(changes[0].old, Some(json!(40)));
        assert_eq!(changes[0].new, json!(45));
        assert_eq!(changes[1].old, None);
        assert_eq!(merged["attacks"]["slash"]["light"]["windup"], json!(400));
        assert_eq!(merged["name"], json!("Axe"));
    }

    #[test]
    fn integral_and_float_numbers_are_equal_leaves() {
        let existing = object(json!({"windup": 500}));
        let incoming = object(json!({"windup": 500.0}));
        let (changes, _) = merge_records(existing, &incoming);
        assert!(changes.is_empty());
    }

    #[test]
    fn leaf_replaced_by_record_is_a_single_change() {
        let existing = object(json!({"throw": 3}));
        let incoming = object(json!({"throw": {"damage": 30}}));
        let (changes, merged) = merge_records(existing, &incoming);
        assert_eq!(changes.len(), 1);
        assert_eq!(merged["throw"]["damage"], json!(30));
    }

    #[test]
    fn aligned_keys_follow_the_reference_then_keep_new_ones_last() {
        let reference = object(json!({
            "name": "Axe",
            "attacks": {"slash": {"light": {"damage": 40, "heldCost": 3, "windup": 400}}}
        }));
        let record = object(json!({
            "attacks": {"slash": {"light": {"windup": 400, "damage": 45, "staminaDamage": 13.5, "heldCost": 3}}},
            "name": "Axe",
            "id": "axe"
        }));

        let aligned = align_key_order(record.clone(), &reference);
        assert_eq!(aligned, record);
        let top: Vec<&str> = aligned.keys().map(String::as_str).collect();
        assert_eq!(top, vec!["name", "attacks", "id"]);
        let light: Vec<&str> = aligned["attacks"]["slash"]["light"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(light, vec!["damage", "heldCost", "windup", "staminaDamage"]);
    }

    #[test]
    fn change_entry_renders_like_the_changelog() {
        let entry = ChangeEntry {
            path: vec!["attacks".into(), "stab".into(), "range".into()],
            old: None,
            new: json!(55),
        };
        assert_eq!(entry.to_string(), "attacks.stab.range: None -> 55");
    }
}
