use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use crate::EngineError;

/// Numeric element types the array can be driven with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Int32,
    Float32,
}

impl ElementKind {
    /// Serialized width in bytes, identical on the wire and in the reference stream
    pub const fn size(self) -> usize {
        match self {
            ElementKind::Int32 => 4,
            ElementKind::Float32 => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::Int32 => "int32",
            ElementKind::Float32 => "float32",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int32" | "i32" | "int" => Ok(ElementKind::Int32),
            "float32" | "f32" | "float" => Ok(ElementKind::Float32),
            other => Err(EngineError::UnsupportedKind(other.to_string())),
        }
    }
}

/// A decoded element tagged with its kind, used in diagnostics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    Int32(i32),
    Float32(f32),
}

impl Value {
    pub fn kind(&self) -> ElementKind {
        match self {
            Value::Int32(_) => ElementKind::Int32,
            Value::Float32(_) => ElementKind::Float32,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int32(v) => v as f64,
            Value::Float32(v) => v as f64,
        }
    }
}

// Bit-level equality: 0.0 and -0.0 differ, identical NaN payloads match.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int32(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}

/// Scalar types that can populate a [`crate::Matrix`].
///
/// The skewing and framing code is generic over this trait; everything that
/// differs between integer and float runs (byte codecs, the reference dot
/// product, diagnostics) lives in the two impls below.
pub trait Element: sealed::Sealed + Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: ElementKind;

    fn zero() -> Self;

    fn write_be<W: Write>(self, out: &mut W) -> io::Result<()>;

    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()>;

    fn read_be<R: Read>(input: &mut R) -> io::Result<Self>;

    fn read_le<R: Read>(input: &mut R) -> io::Result<Self>;

    /// Dot product accumulated in a wider type, then narrowed to `Self`
    fn dot<I: Iterator<Item = (Self, Self)>>(pairs: I) -> Self;

    fn to_value(self) -> Value;
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::Int32;

    fn zero() -> Self {
        0
    }

    fn write_be<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_i32::<BigEndian>(self)
    }

    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_i32::<LittleEndian>(self)
    }

    fn read_be<R: Read>(input: &mut R) -> io::Result<Self> {
        input.read_i32::<BigEndian>()
    }

    fn read_le<R: Read>(input: &mut R) -> io::Result<Self> {
        input.read_i32::<LittleEndian>()
    }

    fn dot<I: Iterator<Item = (Self, Self)>>(pairs: I) -> Self {
        // i32 * i32 always fits in i64; the sum wraps, which keeps the low 32 bits exact
        let acc = pairs.fold(0i64, |acc, (a, b)| acc.wrapping_add(a as i64 * b as i64));
        acc as i32
    }

    fn to_value(self) -> Value {
        Value::Int32(self)
    }
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::Float32;

    fn zero() -> Self {
        0.0
    }

    fn write_be<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_f32::<BigEndian>(self)
    }

    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_f32::<LittleEndian>(self)
    }

    fn read_be<R: Read>(input: &mut R) -> io::Result<Self> {
        input.read_f32::<BigEndian>()
    }

    fn read_le<R: Read>(input: &mut R) -> io::Result<Self> {
        input.read_f32::<LittleEndian>()
    }

    fn dot<I: Iterator<Item = (Self, Self)>>(pairs: I) -> Self {
        let acc = pairs.fold(0f64, |acc, (a, b)| acc + a as f64 * b as f64);
        acc as f32
    }

    fn to_value(self) -> Value {
        Value::Float32(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("int32".parse::<ElementKind>().unwrap(), ElementKind::Int32);
        assert_eq!("F32".parse::<ElementKind>().unwrap(), ElementKind::Float32);
        assert_eq!(" float32 ".parse::<ElementKind>().unwrap(), ElementKind::Float32);

        let err = "int16".parse::<ElementKind>().unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedKind(ref name) if name == "int16"));
    }

    #[test]
    fn test_kind_size() {
        assert_eq!(ElementKind::Int32.size(), 4);
        assert_eq!(ElementKind::Float32.size(), 4);
    }

    #[test]
    fn test_byte_order() {
        let mut be: Vec<u8> = Vec::new();
        0x0102_0304i32.write_be(&mut be).unwrap();
        assert_eq!(be, [1, 2, 3, 4]);

        let mut le: Vec<u8> = Vec::new();
        0x0102_0304i32.write_le(&mut le).unwrap();
        assert_eq!(le, [4, 3, 2, 1]);

        let mut be: Vec<u8> = Vec::new();
        1.0f32.write_be(&mut be).unwrap();
        assert_eq!(be, 1.0f32.to_bits().to_be_bytes());
    }

    #[test]
    fn test_int_dot_truncates_to_32_bits() {
        // 2^30 * 4 = 2^32 wraps to 0 in the low word
        let pairs = [(1 << 30, 4), (0, 0)].into_iter();
        assert_eq!(i32::dot(pairs), 0);

        let pairs = [(1 << 30, 2), (3, 1)].into_iter();
        assert_eq!(i32::dot(pairs), i32::MIN + 3);
    }

    #[test]
    fn test_float_dot_accumulates_in_f64() {
        // Summed in f32 this would lose the small terms entirely
        let pairs = [(1.0e8f32, 1.0f32), (1.0, 1.0), (1.0, 1.0), (-1.0e8, 1.0)].into_iter();
        assert_eq!(f32::dot(pairs), 2.0);
    }

    #[test]
    fn test_value_equality_is_bitwise() {
        assert_eq!(Value::Float32(1.5), Value::Float32(1.5));
        assert_ne!(Value::Float32(0.0), Value::Float32(-0.0));
        assert_eq!(Value::Float32(f32::NAN), Value::Float32(f32::NAN));
        assert_ne!(Value::Int32(1), Value::Float32(1.0));
    }
}
