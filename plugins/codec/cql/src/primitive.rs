use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use typedec_api::{CodecError, Logical, PrimitiveKind, Schema, SchemaKind, Value};

use crate::vint;

/// Dates are stored as unsigned days with the Unix epoch at 2^31.
const DATE_EPOCH: i64 = 1 << 31;
const NANOS_PER_DAY: i64 = 86_400_000_000_000;

// ═══════════════════════════════════════════════════════════════
//  Decode
// ═══════════════════════════════════════════════════════════════

pub(crate) fn decode(kind: PrimitiveKind, bytes: &[u8]) -> Result<Value, CodecError> {
    use PrimitiveKind::*;

    // Empty buffers are a legal "no value" for everything except strings and blobs.
    if bytes.is_empty() && !matches!(kind, Ascii | Text | Blob) {
        return Ok(Value::Null);
    }

    let value = match kind {
        Ascii => {
            if !bytes.is_ascii() {
                return Err(CodecError::malformed("non-ASCII byte in ascii value"));
            }
            Value::String(String::from_utf8(bytes.to_vec())?)
        }
        Text => Value::String(String::from_utf8(bytes.to_vec())?),
        Boolean => Value::Boolean(fixed::<1>(bytes)?[0] != 0),
        TinyInt => Value::Int8(i8::from_be_bytes(fixed(bytes)?)),
        SmallInt => Value::Int16(i16::from_be_bytes(fixed(bytes)?)),
        Int => Value::Int32(i32::from_be_bytes(fixed(bytes)?)),
        BigInt | Counter => Value::Int64(i64::from_be_bytes(fixed(bytes)?)),
        Float => Value::Float32(f32::from_be_bytes(fixed(bytes)?)),
        Double => Value::Float64(f64::from_be_bytes(fixed(bytes)?)),
        Blob => Value::Bytes(bytes.to_vec()),
        Uuid => Value::Logical(Logical::Uuid(fixed(bytes)?)),
        TimeUuid => {
            let raw: [u8; 16] = fixed(bytes)?;
            if raw[6] >> 4 != 1 {
                return Err(CodecError::malformed(format!("uuid version {} is not time-based", raw[6] >> 4)));
            }
            Value::Logical(Logical::TimeUuid(raw))
        }
        Inet => Value::Logical(Logical::Inet(match bytes.len() {
            4 => IpAddr::V4(Ipv4Addr::from(fixed::<4>(bytes)?)),
            16 => IpAddr::V6(Ipv6Addr::from(fixed::<16>(bytes)?)),
            n => return Err(CodecError::malformed(format!("inet must be 4 or 16 bytes, got {n}"))),
        })),
        Timestamp => Value::Logical(Logical::Timestamp(i64::from_be_bytes(fixed(bytes)?))),
        Date => {
            let raw = u32::from_be_bytes(fixed(bytes)?);
            Value::Logical(Logical::Date(raw as i64 - DATE_EPOCH))
        }
        Time => {
            let nanos = i64::from_be_bytes(fixed(bytes)?);
            if !(0..NANOS_PER_DAY).contains(&nanos) {
                return Err(CodecError::malformed(format!("time {nanos}ns is outside one day")));
            }
            Value::Logical(Logical::Time(nanos))
        }
        Decimal => {
            if bytes.len() < 5 {
                return Err(CodecError::malformed(format!("decimal needs at least 5 bytes, got {}", bytes.len())));
            }
            let scale = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            let unscaled = decode_varint(&bytes[4..])?;
            Value::Logical(Logical::Decimal { unscaled, scale })
        }
        VarInt => Value::Logical(Logical::VarInt(decode_varint(bytes)?)),
        Duration => {
            let mut pos = 0;
            let months = narrow(vint::read_signed(bytes, &mut pos)?, "months")?;
            let days = narrow(vint::read_signed(bytes, &mut pos)?, "days")?;
            let nanos = vint::read_signed(bytes, &mut pos)?;
            if pos != bytes.len() {
                return Err(CodecError::malformed(format!("{} trailing bytes after duration", bytes.len() - pos)));
            }
            Value::Logical(Logical::Duration { months, days, nanos })
        }
    };
    Ok(value)
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CodecError> {
    bytes
        .try_into()
        .map_err(|_| CodecError::malformed(format!("expected {N} bytes, got {}", bytes.len())))
}

fn narrow(v: i64, what: &str) -> Result<i32, CodecError> {
    i32::try_from(v).map_err(|_| CodecError::malformed(format!("duration {what} {v} out of range")))
}

/// Two's-complement big-endian integer, at most 128 bits wide.
fn decode_varint(bytes: &[u8]) -> Result<i128, CodecError> {
    if bytes.is_empty() || bytes.len() > 16 {
        return Err(CodecError::malformed(format!("varint of {} bytes is not supported", bytes.len())));
    }
    let fill = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut buf = [fill; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    Ok(i128::from_be_bytes(buf))
}

fn encode_varint(v: i128) -> Vec<u8> {
    let bytes = v.to_be_bytes();
    let mut start = 0;
    while start < 15 {
        let (b, next) = (bytes[start], bytes[start + 1]);
        let redundant = (b == 0x00 && next & 0x80 == 0) || (b == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

// ═══════════════════════════════════════════════════════════════
//  Encode
// ═══════════════════════════════════════════════════════════════

pub(crate) fn encode(kind: PrimitiveKind, value: &Value) -> Result<Vec<u8>, CodecError> {
    use PrimitiveKind::*;

    let bytes = match (kind, value) {
        (_, Value::Null) => Vec::new(),
        (Ascii, Value::String(s)) if s.is_ascii() => s.as_bytes().to_vec(),
        (Text, Value::String(s)) => s.as_bytes().to_vec(),
        (Boolean, Value::Boolean(b)) => vec![*b as u8],
        (TinyInt, Value::Int8(v)) => v.to_be_bytes().to_vec(),
        (SmallInt, Value::Int16(v)) => v.to_be_bytes().to_vec(),
        (Int, Value::Int32(v)) => v.to_be_bytes().to_vec(),
        (BigInt | Counter, Value::Int64(v)) => v.to_be_bytes().to_vec(),
        (Float, Value::Float32(v)) => v.to_be_bytes().to_vec(),
        (Double, Value::Float64(v)) => v.to_be_bytes().to_vec(),
        (Blob, Value::Bytes(b)) => b.clone(),
        (Uuid, Value::Logical(Logical::Uuid(raw))) | (TimeUuid, Value::Logical(Logical::TimeUuid(raw))) => {
            raw.to_vec()
        }
        (Inet, Value::Logical(Logical::Inet(IpAddr::V4(ip)))) => ip.octets().to_vec(),
        (Inet, Value::Logical(Logical::Inet(IpAddr::V6(ip)))) => ip.octets().to_vec(),
        (Timestamp, Value::Logical(Logical::Timestamp(ms))) => ms.to_be_bytes().to_vec(),
        (Date, Value::Logical(Logical::Date(days))) => {
            let raw = u32::try_from(days + DATE_EPOCH)
                .map_err(|_| CodecError::malformed(format!("date {days} out of range")))?;
            raw.to_be_bytes().to_vec()
        }
        (Time, Value::Logical(Logical::Time(nanos))) => nanos.to_be_bytes().to_vec(),
        (Decimal, Value::Logical(Logical::Decimal { unscaled, scale })) => {
            let mut out = scale.to_be_bytes().to_vec();
            out.extend(encode_varint(*unscaled));
            out
        }
        (VarInt, Value::Logical(Logical::VarInt(v))) => encode_varint(*v),
        (Duration, Value::Logical(Logical::Duration { months, days, nanos })) => {
            let mut out = Vec::new();
            vint::write_signed(&mut out, *months as i64);
            vint::write_signed(&mut out, *days as i64);
            vint::write_signed(&mut out, *nanos);
            out
        }
        (kind, v) => {
            return Err(CodecError::mismatch(format!("cannot encode {} as {kind}", v.variant_name())));
        }
    };
    Ok(bytes)
}

// ═══════════════════════════════════════════════════════════════
//  Schema
// ═══════════════════════════════════════════════════════════════

/// Schema of the value a kind has once logical wrappers are formatted.
pub(crate) fn schema(kind: PrimitiveKind) -> Schema {
    use PrimitiveKind::*;

    let (schema_kind, name) = match kind {
        Ascii | Text => (SchemaKind::String, None),
        Boolean => (SchemaKind::Boolean, None),
        TinyInt => (SchemaKind::Int8, None),
        SmallInt => (SchemaKind::Int16, None),
        Int => (SchemaKind::Int32, None),
        BigInt | Counter => (SchemaKind::Int64, None),
        Float => (SchemaKind::Float32, None),
        Double => (SchemaKind::Float64, None),
        Blob => (SchemaKind::Bytes, None),
        Uuid | TimeUuid => (SchemaKind::String, Some("uuid")),
        Inet => (SchemaKind::String, Some("inet")),
        Timestamp => (SchemaKind::Int64, Some("timestamp")),
        Date => (SchemaKind::String, Some("date")),
        Time => (SchemaKind::Int64, Some("time")),
        Decimal => (SchemaKind::String, Some("decimal")),
        VarInt => (SchemaKind::String, Some("varint")),
        Duration => (SchemaKind::String, Some("duration")),
    };
    let schema = Schema::new(schema_kind).optional();
    match name {
        Some(name) => schema.named(name),
        None => schema,
    }
}
