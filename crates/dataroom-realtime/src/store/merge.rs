//! JSON merge patch (RFC 7396).

use serde_json::{Map, Value};

/// Apply `patch` to `target` in place.
///
/// Object members merge recursively, `null` members delete, and any
/// non-object patch replaces the target.
pub fn apply_merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                apply_merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_replaces_and_removes() {
        let mut doc = json!({"name": "A", "file_ids": ["x"], "meta": {"a": 1, "b": 2}});
        apply_merge_patch(
            &mut doc,
            &json!({"name": "B", "file_ids": [], "meta": {"b": null, "c": 3}}),
        );
        assert_eq!(doc, json!({"name": "B", "file_ids": [], "meta": {"a": 1, "c": 3}}));
    }

    #[test]
    fn test_merge_into_non_object() {
        let mut doc = Value::Null;
        apply_merge_patch(&mut doc, &json!({"active_room_id": "r"}));
        assert_eq!(doc, json!({"active_room_id": "r"}));
    }
}
