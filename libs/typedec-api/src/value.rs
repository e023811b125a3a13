use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::net::IpAddr;

/// Decoded value whose natural form cannot appear in bound output as-is.
///
/// Produced by a primitive codec for logical kinds. A formatting step turns it
/// into the scalar its schema declares before binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Logical {
    /// Arbitrary-precision decimal: `unscaled * 10^-scale`.
    Decimal { unscaled: i128, scale: i32 },
    VarInt(i128),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    /// Days since the Unix epoch.
    Date(i64),
    /// Nanoseconds since midnight.
    Time(i64),
    Uuid([u8; 16]),
    TimeUuid([u8; 16]),
    Inet(IpAddr),
    Duration { months: i32, days: i32, nanos: i64 },
}

impl Logical {
    /// Name of the primitive kind this wrapper was decoded from.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Logical::Decimal { .. } => "decimal",
            Logical::VarInt(_) => "varint",
            Logical::Timestamp(_) => "timestamp",
            Logical::Date(_) => "date",
            Logical::Time(_) => "time",
            Logical::Uuid(_) => "uuid",
            Logical::TimeUuid(_) => "timeuuid",
            Logical::Inet(_) => "inet",
            Logical::Duration { .. } => "duration",
        }
    }
}

/// Named fields of a bound structure, in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Struct {
    pub name: Option<String>,
    pub fields: Vec<(String, Value)>,
}

impl Struct {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }
}

/// Canonical value representation.
///
/// Strategy by variant:
/// - Scalars, `String`, `Bytes`: final form, accepted by the binder.
/// - `Array`, `Map`, `Struct`: final when every element is final.
/// - `Tuple`: positional fields before binding; the binder names them.
/// - `Logical`, `Raw`: intermediate only. A composite decode leaves them
///   behind and normalization removes them; the binder rejects both.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),

    /// Recursive; elements in stored order.
    Array(Vec<Value>),
    /// Entries in stored order. Keys are unique within one value.
    Map(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    Struct(Struct),

    Logical(Logical),
    /// Still-encoded nested fragment.
    Raw(Vec<u8>),
}

impl Value {
    /// Short name of the variant, for error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Tuple(_) => "tuple",
            Value::Struct(_) => "struct",
            Value::Logical(_) => "logical",
            Value::Raw(_) => "raw",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Map building
// ═══════════════════════════════════════════════════════════════

/// Accumulates map entries with last-write-wins on equal keys.
///
/// Multi-cell storage guarantees key uniqueness, so a repeated key only occurs
/// with bad upstream data; the later value overwrites the earlier one in place
/// and the key keeps its first position. Keys are indexed by a structural hash,
/// so building an n-entry map is linear in n.
#[derive(Debug, Default)]
pub struct MapBuilder {
    entries: Vec<(Value, Value)>,
    index: HashMap<u64, Vec<usize>>,
}

impl MapBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity), index: HashMap::with_capacity(capacity) }
    }

    pub fn insert(&mut self, key: Value, value: Value) {
        let slots = self.index.entry(key_hash(&key)).or_default();
        let found = slots.iter().copied().find(|&i| self.entries[i].0 == key);
        match found {
            Some(i) => self.entries[i].1 = value,
            None => {
                slots.push(self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Value {
        Value::Map(self.entries)
    }
}

fn key_hash(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(value, &mut hasher);
    hasher.finish()
}

/// Hash consistent with `PartialEq`: values that compare equal hash equal.
/// Floats hash by bits with both zeros folded together.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Boolean(b) => b.hash(state),
        Value::Int8(v) => v.hash(state),
        Value::Int16(v) => v.hash(state),
        Value::Int32(v) => v.hash(state),
        Value::Int64(v) => v.hash(state),
        Value::Float32(v) => (if *v == 0.0 { 0 } else { v.to_bits() }).hash(state),
        Value::Float64(v) => (if *v == 0.0 { 0 } else { v.to_bits() }).hash(state),
        Value::String(s) => s.hash(state),
        Value::Bytes(b) | Value::Raw(b) => b.hash(state),
        Value::Array(items) | Value::Tuple(items) => {
            items.len().hash(state);
            items.iter().for_each(|item| hash_value(item, state));
        }
        Value::Map(entries) => {
            entries.len().hash(state);
            for (k, v) in entries {
                hash_value(k, state);
                hash_value(v, state);
            }
        }
        Value::Struct(s) => {
            s.name.hash(state);
            s.fields.len().hash(state);
            for (name, v) in &s.fields {
                name.hash(state);
                hash_value(v, state);
            }
        }
        Value::Logical(l) => l.hash(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_duplicate_key_wins() {
        let mut map = MapBuilder::default();
        map.insert(Value::Int32(1), Value::String("a".into()));
        map.insert(Value::Int32(2), Value::String("b".into()));
        map.insert(Value::Int32(1), Value::String("c".into()));
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.finish(),
            Value::Map(vec![
                (Value::Int32(1), Value::String("c".into())),
                (Value::Int32(2), Value::String("b".into())),
            ])
        );
    }

    #[test]
    fn equal_floats_share_a_key() {
        let mut map = MapBuilder::default();
        map.insert(Value::Float64(0.0), Value::Int32(1));
        map.insert(Value::Float64(-0.0), Value::Int32(2));
        map.insert(Value::Float64(f64::NAN), Value::Int32(3));
        map.insert(Value::Float64(f64::NAN), Value::Int32(4));
        // NaN never equals itself, so each NaN key is its own entry.
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn composite_keys_compare_structurally() {
        let key = |n| Value::Struct(Struct { name: None, fields: vec![("field1".into(), Value::Int32(n))] });
        let mut map = MapBuilder::with_capacity(3);
        map.insert(key(1), Value::Null);
        map.insert(key(2), Value::Null);
        map.insert(key(1), Value::Boolean(true));
        assert_eq!(
            map.finish(),
            Value::Map(vec![(key(1), Value::Boolean(true)), (key(2), Value::Null)])
        );
    }

    #[test]
    fn large_map_with_repeats() {
        let mut map = MapBuilder::with_capacity(200_000);
        for i in 0..200_000i64 {
            map.insert(Value::Int64(i % 100_000), Value::Int64(i));
        }
        let Value::Map(entries) = map.finish() else { panic!("expected map") };
        assert_eq!(entries.len(), 100_000);
        assert_eq!(entries[0], (Value::Int64(0), Value::Int64(100_000)));
        assert_eq!(entries[99_999], (Value::Int64(99_999), Value::Int64(199_999)));
    }

    #[test]
    fn struct_lookup() {
        let s = Struct {
            name: Some("address".into()),
            fields: vec![("zip".into(), Value::Int32(12345))],
        };
        assert_eq!(s.get("zip"), Some(&Value::Int32(12345)));
        assert_eq!(s.get("street"), None);
    }
}
