use std::fmt::Write as _;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use typedec_api::{Logical, Schema, TypeDescriptor, Value};

use super::TypeHandler;
use super::primitive::{kind_of, single_cell};
use crate::error::DecodeError;
use crate::registry::Registry;

/// `from_num_days_from_ce` counts 0001-01-01 as day 1.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;

/// Scalars that decode into a [`Logical`] wrapper and need formatting.
#[derive(Debug, Clone)]
pub struct LogicalHandler {
    date_format: String,
}

impl Default for LogicalHandler {
    fn default() -> Self {
        Self { date_format: "%Y-%m-%d".to_string() }
    }
}

impl LogicalHandler {
    /// Fails if `date_format` is not a valid chrono format string, or asks for
    /// fields a bare date does not have (time of day, offset).
    pub fn new(date_format: &str) -> Result<Self, DecodeError> {
        if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
            return Err(DecodeError::Config(format!("invalid date format '{date_format}'")));
        }
        let mut trial = String::new();
        if write!(trial, "{}", NaiveDate::MIN.format(date_format)).is_err() {
            return Err(DecodeError::Config(format!("date format '{date_format}' cannot render a date")));
        }
        Ok(Self { date_format: date_format.to_string() })
    }

    fn format_logical(&self, ty: &TypeDescriptor, logical: Logical) -> Result<Value, DecodeError> {
        let value = match logical {
            Logical::Decimal { unscaled, scale } => Value::String(format_decimal(unscaled, scale)),
            Logical::VarInt(v) => Value::String(v.to_string()),
            Logical::Timestamp(ms) => Value::Int64(ms),
            Logical::Date(days) => {
                let date = i32::try_from(days + UNIX_EPOCH_DAYS_FROM_CE)
                    .ok()
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
                    .ok_or_else(|| DecodeError::malformed(ty, format!("date {days} days from epoch is out of range")))?;
                let mut text = String::new();
                write!(text, "{}", date.format(&self.date_format)).map_err(|_| {
                    DecodeError::malformed(ty, format!("date format '{}' cannot render {date}", self.date_format))
                })?;
                Value::String(text)
            }
            Logical::Time(nanos) => Value::Int64(nanos),
            Logical::Uuid(raw) | Logical::TimeUuid(raw) => {
                Value::String(uuid::Uuid::from_bytes(raw).hyphenated().to_string())
            }
            Logical::Inet(ip) => Value::String(ip.to_string()),
            Logical::Duration { months, days, nanos } => Value::String(format_duration(months, days, nanos)),
        };
        Ok(value)
    }
}

impl TypeHandler for LogicalHandler {
    fn decode(&self, registry: &Registry, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, DecodeError> {
        let kind = kind_of("logical", ty)?;
        let value = registry.codec().decode(kind, bytes).map_err(|e| DecodeError::from_codec(ty, e))?;
        let value = self.format(ty, value)?;
        registry.bind(ty, value, &self.schema(registry, ty)?)
    }

    fn decode_cells(&self, registry: &Registry, ty: &TypeDescriptor, cells: &[&[u8]]) -> Result<Value, DecodeError> {
        self.decode(registry, ty, single_cell(ty, cells)?)
    }

    fn schema(&self, registry: &Registry, ty: &TypeDescriptor) -> Result<Schema, DecodeError> {
        let kind = kind_of("logical", ty)?;
        registry.codec().schema(kind).map_err(|e| DecodeError::from_codec(ty, e))
    }

    /// Values that are not wrapped (nulls, already formatted) pass through.
    fn format(&self, ty: &TypeDescriptor, value: Value) -> Result<Value, DecodeError> {
        match value {
            Value::Logical(logical) => self.format_logical(ty, logical),
            other => Ok(other),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Text forms
// ═══════════════════════════════════════════════════════════════

/// Canonical decimal text: plain notation unless the scale is negative or
/// the number is smaller than 1e-6, then scientific (`1.2345E+6`, `1E-7`).
fn format_decimal(unscaled: i128, scale: i32) -> String {
    let digits = unscaled.unsigned_abs().to_string();
    let sign = if unscaled < 0 { "-" } else { "" };
    let adjusted = -(scale as i64) + (digits.len() as i64 - 1);

    if scale >= 0 && adjusted >= -6 {
        let scale = scale as usize;
        if scale == 0 {
            return format!("{sign}{digits}");
        }
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            return format!("{sign}{int}.{frac}");
        }
        return format!("{sign}0.{}{digits}", "0".repeat(scale - digits.len()));
    }

    let (head, tail) = digits.split_at(1);
    let mut out = format!("{sign}{head}");
    if !tail.is_empty() {
        out.push('.');
        out.push_str(tail);
    }
    out.push('E');
    if adjusted >= 0 {
        out.push('+');
    }
    out.push_str(&adjusted.to_string());
    out
}

/// Unit-suffixed duration text, e.g. `1y2mo3d4h5m6s7ms8us9ns`.
fn format_duration(months: i32, days: i32, nanos: i64) -> String {
    if months == 0 && days == 0 && nanos == 0 {
        return "0s".to_string();
    }
    let mut out = String::new();
    if months < 0 || days < 0 || nanos < 0 {
        out.push('-');
    }
    let months = months.unsigned_abs() as u64;
    let rest = append_unit(&mut out, months, 12, "y");
    append_unit(&mut out, rest, 1, "mo");
    append_unit(&mut out, days.unsigned_abs() as u64, 1, "d");

    let mut rest = nanos.unsigned_abs();
    for (divisor, unit) in [
        (NANOS_PER_HOUR, "h"),
        (NANOS_PER_MINUTE, "m"),
        (NANOS_PER_SECOND, "s"),
        (NANOS_PER_MILLI, "ms"),
        (NANOS_PER_MICRO, "us"),
        (1, "ns"),
    ] {
        rest = append_unit(&mut out, rest, divisor, unit);
    }
    out
}

fn append_unit(out: &mut String, dividend: u64, divisor: u64, unit: &str) -> u64 {
    if dividend == 0 || dividend < divisor {
        return dividend;
    }
    out.push_str(&(dividend / divisor).to_string());
    out.push_str(unit);
    dividend % divisor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::registry;
    use typedec_api::PrimitiveKind;

    fn formatted(logical: Logical) -> Value {
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Date);
        LogicalHandler::default().format_logical(&ty, logical).unwrap()
    }

    #[test]
    fn decimal_text() {
        assert_eq!(format_decimal(12345, 2), "123.45");
        assert_eq!(format_decimal(-5, 3), "-0.005");
        assert_eq!(format_decimal(7, 0), "7");
        assert_eq!(format_decimal(0, 2), "0.00");
        assert_eq!(format_decimal(12345, -2), "1.2345E+6");
        assert_eq!(format_decimal(1, 7), "1E-7");
        assert_eq!(format_decimal(-15, 7), "-0.0000015");
    }

    #[test]
    fn duration_text() {
        assert_eq!(format_duration(14, 3, 3_723_004_005_006), "1y2mo3d1h2m3s4ms5us6ns");
        assert_eq!(format_duration(0, -2, 0), "-2d");
        assert_eq!(format_duration(0, 0, 0), "0s");
        assert_eq!(format_duration(0, 0, i64::MIN), "-2562047h47m16s854ms775us808ns");
    }

    #[test]
    fn scalar_forms() {
        assert_eq!(formatted(Logical::Date(19_000)), Value::String("2022-01-08".into()));
        assert_eq!(formatted(Logical::Timestamp(-1)), Value::Int64(-1));
        assert_eq!(formatted(Logical::VarInt(-12)), Value::String("-12".into()));
        assert_eq!(
            formatted(Logical::Inet("10.0.0.1".parse().unwrap())),
            Value::String("10.0.0.1".into())
        );
        let mut raw = [0u8; 16];
        raw[15] = 1;
        assert_eq!(
            formatted(Logical::Uuid(raw)),
            Value::String("00000000-0000-0000-0000-000000000001".into())
        );
    }

    #[test]
    fn custom_date_format() {
        let handler = LogicalHandler::new("%d.%m.%Y").unwrap();
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Date);
        assert_eq!(
            handler.format(&ty, Value::Logical(Logical::Date(0))).unwrap(),
            Value::String("01.01.1970".into())
        );
        assert!(LogicalHandler::new("%Q").is_err());
    }

    #[test]
    fn date_format_with_time_fields_is_rejected() {
        for format in ["%Y-%m-%d %H:%M", "%s", "%z"] {
            let err = LogicalHandler::new(format).unwrap_err();
            assert!(matches!(err, DecodeError::Config(_)), "{format}: {err}");
        }
    }

    #[test]
    fn unrenderable_date_format_is_malformed_not_a_panic() {
        let handler = LogicalHandler { date_format: "%H:%M".to_string() };
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Date);
        let err = handler.format(&ty, Value::Logical(Logical::Date(0))).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedColumnData { .. }), "{err}");
    }

    #[test]
    fn out_of_range_date_is_malformed() {
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Date);
        let err = LogicalHandler::default()
            .format(&ty, Value::Logical(Logical::Date(i64::from(i32::MAX))))
            .unwrap_err();
        assert!(matches!(err, DecodeError::MalformedColumnData { .. }));
    }

    #[test]
    fn decode_formats_before_binding() {
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Decimal);
        let bytes = [0, 0, 0, 2, 0x30, 0x39];
        assert_eq!(registry().decode(&ty, &bytes).unwrap(), Value::String("123.45".into()));
    }

    #[test]
    fn nulls_pass_through() {
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Timestamp);
        assert_eq!(registry().decode(&ty, &[]).unwrap(), Value::Null);
    }
}
