//! Cursor-style little-endian reader with bounds checks on every access.

use crate::error::WireError;

/// Reads fixed-width little-endian fields from a byte slice.
///
/// Every accessor returns [`WireError::OutOfBounds`] instead of panicking
/// when the slice is exhausted.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], WireError> {
        let offset = self.pos;
        let bytes = offset
            .checked_add(N)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(WireError::OutOfBounds { what, offset })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos = offset.saturating_add(N);
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, WireError> {
        self.take::<1>("u8").map(|[b]| b)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, WireError> {
        self.take::<1>("i8").map(i8::from_le_bytes)
    }

    #[inline]
    pub fn bool(&mut self) -> Result<bool, WireError> {
        self.u8().map(|v| v != 0)
    }

    #[inline]
    pub fn u16_le(&mut self) -> Result<u16, WireError> {
        self.take("u16").map(u16::from_le_bytes)
    }

    #[inline]
    pub fn i16_le(&mut self) -> Result<i16, WireError> {
        self.take("i16").map(i16::from_le_bytes)
    }

    #[inline]
    pub fn u32_le(&mut self) -> Result<u32, WireError> {
        self.take("u32").map(u32::from_le_bytes)
    }

    #[inline]
    pub fn u64_le(&mut self) -> Result<u64, WireError> {
        self.take("u64").map(u64::from_le_bytes)
    }

    /// Non-finite values read as `0.0`.
    #[inline]
    pub fn f32_le(&mut self) -> Result<f32, WireError> {
        self.take("f32")
            .map(f32::from_le_bytes)
            .map(|v| if v.is_finite() { v } else { 0.0 })
    }

    /// Non-finite values read as `0.0`.
    #[inline]
    pub fn f64_le(&mut self) -> Result<f64, WireError> {
        self.take("f64")
            .map(f64::from_le_bytes)
            .map(|v| if v.is_finite() { v } else { 0.0 })
    }

    pub fn u8_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        self.take("byte array")
    }

    pub fn u16_le_array<const N: usize>(&mut self) -> Result<[u16; N], WireError> {
        let mut arr = [0u16; N];
        for item in arr.iter_mut() {
            *item = self.u16_le()?;
        }
        Ok(arr)
    }

    pub fn f32_le_array<const N: usize>(&mut self) -> Result<[f32; N], WireError> {
        let mut arr = [0.0f32; N];
        for item in arr.iter_mut() {
            *item = self.f32_le()?;
        }
        Ok(arr)
    }

    /// Minutes-plus-milliseconds pair used from 2023 on, folded into milliseconds.
    pub fn split_time_ms(&mut self) -> Result<u32, WireError> {
        let ms = u32::from(self.u16_le()?);
        let minutes = u32::from(self.u8()?);
        Ok(minutes.saturating_mul(60_000).saturating_add(ms))
    }

    /// Fixed-width NUL-padded UTF-8 name field.
    pub fn name<const N: usize>(&mut self) -> Result<String, WireError> {
        let raw = self.u8_array::<N>()?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(N);
        let text = raw.get(..end).unwrap_or_default();
        Ok(String::from_utf8_lossy(text).into_owned())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        let offset = self.pos;
        match offset.checked_add(n) {
            Some(end) if end <= self.data.len() => {
                self.pos = end;
                Ok(())
            }
            _ => Err(WireError::OutOfBounds {
                what: "skip",
                offset,
            }),
        }
    }
}
