use typedec_api::CodecError;

// ═══════════════════════════════════════════════════════════════
//  Variable-length integers
// ═══════════════════════════════════════════════════════════════
//
// The number of leading one bits in the first byte is the number of extra
// bytes that follow. The remaining bits of the first byte are the most
// significant bits of the value. A first byte of 0xFF is followed by all 8
// value bytes.

pub(crate) fn read_unsigned(buf: &[u8], pos: &mut usize) -> Result<u64, CodecError> {
    let first = *buf
        .get(*pos)
        .ok_or_else(|| CodecError::malformed("truncated vint"))?;
    *pos += 1;
    let extra = first.leading_ones() as usize;
    if extra == 0 {
        return Ok(first as u64);
    }
    let mut value = if extra >= 8 { 0 } else { (first & (0xFF >> extra)) as u64 };
    let tail = buf
        .get(*pos..*pos + extra)
        .ok_or_else(|| CodecError::malformed("truncated vint"))?;
    for b in tail {
        value = (value << 8) | *b as u64;
    }
    *pos += extra;
    Ok(value)
}

pub(crate) fn write_unsigned(out: &mut Vec<u8>, value: u64) {
    let size = unsigned_size(value);
    if size == 1 {
        out.push(value as u8);
        return;
    }
    if size == 9 {
        out.push(0xFF);
        out.extend_from_slice(&value.to_be_bytes());
        return;
    }
    let extra = (size - 1) as u32;
    let be = value.to_be_bytes();
    let start = out.len();
    out.extend_from_slice(&be[8 - size..]);
    out[start] |= !(0xFFu8 >> extra);
}

fn unsigned_size(value: u64) -> usize {
    let magnitude = (value | 1).leading_zeros() as usize;
    (639 - magnitude * 9) >> 6
}

pub(crate) fn read_signed(buf: &[u8], pos: &mut usize) -> Result<i64, CodecError> {
    let v = read_unsigned(buf, pos)?;
    Ok(((v >> 1) as i64) ^ -((v & 1) as i64))
}

pub(crate) fn write_signed(out: &mut Vec<u8>, value: i64) {
    write_unsigned(out, ((value << 1) ^ (value >> 63)) as u64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sizes_match_boundaries() {
        assert_eq!(unsigned_size(0), 1);
        assert_eq!(unsigned_size(127), 1);
        assert_eq!(unsigned_size(128), 2);
        assert_eq!(unsigned_size(16_383), 2);
        assert_eq!(unsigned_size(16_384), 3);
        assert_eq!(unsigned_size(u64::MAX), 9);
    }

    #[test]
    fn two_byte_layout() {
        let mut out = Vec::new();
        write_unsigned(&mut out, 300);
        assert_eq!(out, vec![0x81, 0x2C]);
    }

    #[test]
    fn truncated_input_is_malformed() {
        let mut pos = 0;
        assert!(read_unsigned(&[0xC0, 0x01], &mut pos).is_err());
    }

    proptest! {
        #[test]
        fn signed_values_survive(v in any::<i64>()) {
            let mut out = Vec::new();
            write_signed(&mut out, v);
            let mut pos = 0;
            prop_assert_eq!(read_signed(&out, &mut pos).unwrap(), v);
            prop_assert_eq!(pos, out.len());
        }
    }
}
