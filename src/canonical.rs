// src/canonical.rs
// Stable JSON serialization for byte-size accounting. The chain charges
// by serialized size, so the serializer must be byte-for-byte
// deterministic: object keys are emitted in lexicographic order at every
// depth, regardless of insertion order.

use serde_json::Value;

/// Serialize a JSON value with lexicographically sorted object keys.
pub fn to_stable_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Same as [`to_stable_string`] but returns the UTF-8 bytes directly.
pub fn to_stable_bytes(value: &Value) -> Vec<u8> {
    to_stable_string(value).into_bytes()
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // serde_json handles string escaping
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_value(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        leaf => out.push_str(&leaf.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_at_every_depth() {
        let value = json!({
            "zebra": {"b": 2, "a": 1},
            "alpha": [{"y": true, "x": false}],
        });
        assert_eq!(
            to_stable_string(&value),
            r#"{"alpha":[{"x":false,"y":true}],"zebra":{"a":1,"b":2}}"#
        );
    }

    #[test]
    fn escapes_strings_and_keeps_array_order() {
        let value = json!({"note": "line\nbreak", "list": [3, 1, 2]});
        assert_eq!(
            to_stable_string(&value),
            r#"{"list":[3,1,2],"note":"line\nbreak"}"#
        );
    }

    #[test]
    fn identical_values_serialize_identically() {
        let a = json!({"k": [1, 2], "m": {"q": null}});
        let b = json!({"m": {"q": null}, "k": [1, 2]});
        assert_eq!(to_stable_bytes(&a), to_stable_bytes(&b));
    }
}
