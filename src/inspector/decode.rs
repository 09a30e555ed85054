//! Decoding of raw property buffers.

use std::fmt;

use bytemuck::Pod;

use crate::error::{InspectError, Result};
use crate::inspector::key::{Decoding, FlagTable, PropertyKey, Width};

/// A decoded property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Integer(u64),
    Flags(BitFlagSet),
    Sequence(Vec<u64>),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Integer(n) => write!(f, "{}", n),
            PropertyValue::Flags(set) => write!(f, "{}", set),
            PropertyValue::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// The names from a [`FlagTable`] whose bits are set, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitFlagSet {
    bits: u64,
    names: Vec<&'static str>,
}

impl BitFlagSet {
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| *n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for BitFlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(" | "))
    }
}

/// Reinterprets the start of `bytes` as one `T`.
///
/// The buffer must be non-empty and a whole multiple of `size_of::<T>()`.
pub fn decode_scalar<T: Pod>(bytes: &[u8]) -> Result<T> {
    let width = std::mem::size_of::<T>();
    if width == 0 || bytes.is_empty() || bytes.len() % width != 0 {
        return Err(InspectError::DecodeSizeMismatch {
            len: bytes.len(),
            width,
        });
    }
    Ok(bytemuck::pod_read_unaligned(&bytes[..width]))
}

/// Splits `bytes` into exactly `count` elements of `T`.
pub fn decode_array<T: Pod>(bytes: &[u8], count: usize) -> Result<Vec<T>> {
    let width = std::mem::size_of::<T>();
    let mismatch = InspectError::DecodeSizeMismatch {
        len: bytes.len(),
        width,
    };
    if width == 0 || bytes.len() % width != 0 {
        return Err(mismatch);
    }
    match count.checked_mul(width) {
        Some(needed) if bytes.len() >= needed => Ok(bytes[..needed]
            .chunks_exact(width)
            .map(bytemuck::pod_read_unaligned)
            .collect()),
        _ => Err(mismatch),
    }
}

/// Reads the bytes up to the first NUL as a string.
pub fn decode_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Tests each flag of `table`, in order, against the integer in `bytes`.
pub fn decode_bit_flags(bytes: &[u8], table: &'static FlagTable) -> Result<BitFlagSet> {
    let bits = read_unsigned(bytes, table.width)?;
    let names = table
        .flags
        .iter()
        .filter(|(flag, _)| bits & flag != 0)
        .map(|(_, name)| *name)
        .collect();
    Ok(BitFlagSet { bits, names })
}

pub(crate) fn read_unsigned(bytes: &[u8], width: Width) -> Result<u64> {
    Ok(match width {
        Width::U8 => decode_scalar::<u8>(bytes)? as u64,
        Width::U32 => decode_scalar::<u32>(bytes)? as u64,
        Width::U64 => decode_scalar::<u64>(bytes)?,
        Width::Size => decode_scalar::<usize>(bytes)? as u64,
    })
}

pub(crate) fn read_unsigned_array(bytes: &[u8], width: Width, count: usize) -> Result<Vec<u64>> {
    Ok(match width {
        Width::U8 => widen(decode_array::<u8>(bytes, count)?),
        Width::U32 => widen(decode_array::<u32>(bytes, count)?),
        Width::U64 => decode_array::<u64>(bytes, count)?,
        Width::Size => decode_array::<usize>(bytes, count)?
            .into_iter()
            .map(|v| v as u64)
            .collect(),
    })
}

fn widen<T: Into<u64>>(items: Vec<T>) -> Vec<u64> {
    items.into_iter().map(Into::into).collect()
}

/// Decodes `bytes` along the path `key` implies.
///
/// `count` is the element count for array keys. When it is `None` the count
/// is taken from the buffer length.
pub fn decode(key: PropertyKey, bytes: &[u8], count: Option<usize>) -> Result<PropertyValue> {
    let value = match key.decoding() {
        Decoding::Text => PropertyValue::Text(decode_string(bytes)),
        Decoding::Scalar(width) => PropertyValue::Integer(read_unsigned(bytes, width)?),
        Decoding::Flags(table) => PropertyValue::Flags(decode_bit_flags(bytes, table)?),
        Decoding::Array { width, .. } => {
            let count = count.unwrap_or(bytes.len() / width.bytes());
            PropertyValue::Sequence(read_unsigned_array(bytes, width, count)?)
        }
        Decoding::Raw => {
            log::warn!("No decoding known for {}, showing first byte", key);
            PropertyValue::Integer(read_unsigned(bytes, Width::U8)?)
        }
    };
    Ok(value)
}

/// Decodes and renders `bytes` for display.
pub fn format(key: PropertyKey, bytes: &[u8]) -> Result<String> {
    decode(key, bytes, None).map(|value| value.to_string())
}
