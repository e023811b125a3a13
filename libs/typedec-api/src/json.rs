use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::value::Value;

// ═══════════════════════════════════════════════════════════════
//  Value → JSON conversion
// ═══════════════════════════════════════════════════════════════

/// Render a value as JSON for diagnostics.
///
/// Bytes become base64 strings. Maps become arrays of `[key, value]` pairs
/// because keys need not be strings. Intermediate variants are rendered too,
/// so a half-normalized value can still be inspected.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Int8(i) => serde_json::json!(i),
        Value::Int16(i) => serde_json::json!(i),
        Value::Int32(i) => serde_json::json!(i),
        Value::Int64(i) => serde_json::json!(i),
        Value::Float32(f) => serde_json::json!(f),
        Value::Float64(f) => serde_json::json!(f),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(b) => serde_json::Value::String(STANDARD.encode(b)),
        Value::Array(items) | Value::Tuple(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect())
        }
        Value::Map(entries) => serde_json::Value::Array(
            entries
                .iter()
                .map(|(k, v)| serde_json::Value::Array(vec![to_json(k), to_json(v)]))
                .collect(),
        ),
        Value::Struct(s) => {
            let map: serde_json::Map<String, serde_json::Value> = s
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
        Value::Logical(l) => serde_json::json!({ "logical": l.kind_name() }),
        Value::Raw(b) => serde_json::json!({ "raw": STANDARD.encode(b) }),
    }
}
