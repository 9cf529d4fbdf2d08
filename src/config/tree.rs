//! Dotted-path access into the nested configuration tree
//!
//! Keys like `"joysticks.left.dead_zone"` are split on `.` and walked one
//! object level per segment.

use serde_json::{Map, Value};

/// Look up a dotted key. `None` if a segment is missing or the walk hits a
/// non-object before the last segment.
pub fn get_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(root, |node, segment| node.as_object()?.get(segment))
}

/// Set a dotted key, creating intermediate objects as needed
///
/// A non-object value sitting where an intermediate object is needed is
/// replaced by an empty object.
pub fn set_path(root: &mut Value, key: &str, value: Value) {
    let mut segments: Vec<&str> = key.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut node = root;
    for segment in segments {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else {
            return;
        };
        node = map
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        map.insert(leaf.to_string(), value);
    }
}

/// Remove a dotted key, returning the removed value
pub fn remove_path(root: &mut Value, key: &str) -> Option<Value> {
    let (parent, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };

    let mut node = root;
    if let Some(parent) = parent {
        for segment in parent.split('.') {
            node = node.as_object_mut()?.get_mut(segment)?;
        }
    }
    node.as_object_mut()?.remove(leaf)
}

/// Merge `overlay` into `base`
///
/// Objects merge key by key, recursively. Everything else (scalars and
/// arrays) replaces the base value wholesale.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let nested = value.is_object() && base_map.get(&key).is_some_and(Value::is_object);
                match base_map.get_mut(&key) {
                    Some(existing) if nested => deep_merge(existing, value),
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
