//! Length-prefixed framing used inside flat composite payloads.
//!
//! Collections: `[i32 count]` then `count` values (maps: `2 * count`).
//! Tuples and user types: one value per field, no count.
//! Each value is `[i32 len][len bytes]`; a negative length is null.

use typedec_api::CodecError;

pub struct FrameReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        let bytes = self
            .buf
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| CodecError::malformed(format!("truncated length at byte {}", self.pos)))?;
        self.pos += 4;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Element count of a collection. Each element needs at least its 4-byte
    /// length prefix, which bounds the count by the remaining input.
    pub fn read_count(&mut self, per_element: usize) -> Result<usize, CodecError> {
        let n = self.read_i32()?;
        let n = usize::try_from(n).map_err(|_| CodecError::malformed(format!("negative element count {n}")))?;
        if n.saturating_mul(per_element * 4) > self.remaining() {
            return Err(CodecError::malformed(format!(
                "element count {n} exceeds the {} remaining bytes",
                self.remaining()
            )));
        }
        Ok(n)
    }

    pub fn read_value(&mut self) -> Result<Option<&'a [u8]>, CodecError> {
        let len = self.read_i32()?;
        if len < 0 {
            return Ok(None);
        }
        let len = len as usize;
        let bytes = self.buf.get(self.pos..self.pos + len).ok_or_else(|| {
            CodecError::malformed(format!("value of {len} bytes overruns buffer at byte {}", self.pos))
        })?;
        self.pos += len;
        Ok(Some(bytes))
    }

    pub fn finish(&self) -> Result<(), CodecError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::malformed(format!("{} trailing bytes", self.remaining())))
        }
    }
}

pub fn write_value(out: &mut Vec<u8>, value: Option<&[u8]>) {
    match value {
        Some(bytes) => {
            out.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
            out.extend_from_slice(bytes);
        }
        None => out.extend_from_slice(&(-1i32).to_be_bytes()),
    }
}

/// Flat list or set payload.
pub fn encode_collection<'v>(items: impl IntoIterator<Item = Option<&'v [u8]>>) -> Vec<u8> {
    let mut body = Vec::new();
    let mut n: i32 = 0;
    for item in items {
        write_value(&mut body, item);
        n += 1;
    }
    let mut out = n.to_be_bytes().to_vec();
    out.extend_from_slice(&body);
    out
}

/// Flat map payload.
pub fn encode_map<'v>(entries: impl IntoIterator<Item = (Option<&'v [u8]>, Option<&'v [u8]>)>) -> Vec<u8> {
    let mut body = Vec::new();
    let mut n: i32 = 0;
    for (k, v) in entries {
        write_value(&mut body, k);
        write_value(&mut body, v);
        n += 1;
    }
    let mut out = n.to_be_bytes().to_vec();
    out.extend_from_slice(&body);
    out
}

/// Flat tuple or user-type payload.
pub fn encode_fields<'v>(fields: impl IntoIterator<Item = Option<&'v [u8]>>) -> Vec<u8> {
    let mut out = Vec::new();
    for field in fields {
        write_value(&mut out, field);
    }
    out
}
