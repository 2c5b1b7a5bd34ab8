//! Shared binary-format helpers.
//!
//! Two layouts are in play: the wire frame fed to the simulator's input port
//! is big-endian, while the reference stream and the simulator's result
//! buffer are little-endian, row-major. Both use fixed-width elements with no
//! headers or length prefixes.

use std::io::{Cursor, Write};

use crate::element::{Element, ElementKind};
use crate::{EngineError, EngineResult};

/// Byte length of a wire frame: 2n time steps, each carrying one n-element
/// column for A and one for B.
pub fn frame_len(n: usize, kind: ElementKind) -> usize {
    2 * n * 2 * n * kind.size()
}

/// Byte length of an n×n result stream.
pub fn reference_len(n: usize, kind: ElementKind) -> usize {
    n * n * kind.size()
}

/// Returns the number of whole elements in `bytes`, rejecting ragged tails.
pub fn element_count(bytes: &[u8], kind: ElementKind, stream: &'static str) -> EngineResult<usize> {
    let size = kind.size();
    if bytes.len() % size != 0 {
        return Err(EngineError::MalformedStream {
            stream,
            reason: format!(
                "length {} is not a multiple of the {}-byte {} element",
                bytes.len(),
                size,
                kind
            ),
        });
    }
    Ok(bytes.len() / size)
}

/// Checks that `bytes` is exactly `expected` bytes long.
pub fn ensure_len(bytes: &[u8], expected: usize, stream: &'static str) -> EngineResult<()> {
    if bytes.len() != expected {
        return Err(EngineError::MalformedStream {
            stream,
            reason: format!("expected {} bytes, got {}", expected, bytes.len()),
        });
    }
    Ok(())
}

pub fn write_elements_be<'a, T, W, I>(out: &mut W, values: I) -> EngineResult<()>
where
    T: Element,
    W: Write,
    I: IntoIterator<Item = &'a T>,
{
    for value in values {
        value.write_be(out)?;
    }
    Ok(())
}

pub fn write_elements_le<'a, T, W, I>(out: &mut W, values: I) -> EngineResult<()>
where
    T: Element,
    W: Write,
    I: IntoIterator<Item = &'a T>,
{
    for value in values {
        value.write_le(out)?;
    }
    Ok(())
}

/// Decodes a whole little-endian stream.
pub fn read_elements_le<T: Element>(bytes: &[u8], stream: &'static str) -> EngineResult<Vec<T>> {
    let count = element_count(bytes, T::KIND, stream)?;
    let mut cursor = Cursor::new(bytes);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(T::read_le(&mut cursor)?);
    }
    Ok(out)
}

/// Decodes a whole big-endian stream.
pub fn read_elements_be<T: Element>(bytes: &[u8], stream: &'static str) -> EngineResult<Vec<T>> {
    let count = element_count(bytes, T::KIND, stream)?;
    let mut cursor = Cursor::new(bytes);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(T::read_be(&mut cursor)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_lengths() {
        assert_eq!(frame_len(2, ElementKind::Int32), 64);
        assert_eq!(frame_len(4, ElementKind::Float32), 256);
        assert_eq!(reference_len(2, ElementKind::Int32), 16);
        assert_eq!(reference_len(1, ElementKind::Float32), 4);
    }

    #[test]
    fn test_element_count_rejects_ragged_tail() {
        assert_eq!(element_count(&[0u8; 8], ElementKind::Int32, "actual").unwrap(), 2);
        let err = element_count(&[0u8; 7], ElementKind::Int32, "actual").unwrap_err();
        assert!(matches!(err, EngineError::MalformedStream { stream: "actual", .. }));
    }

    #[test]
    fn test_read_write_both_orders() {
        let values = [1i32, -2, i32::MAX];

        let mut le: Vec<u8> = Vec::new();
        write_elements_le(&mut le, &values).unwrap();
        assert_eq!(&le[..4], &[1, 0, 0, 0]);
        assert_eq!(read_elements_le::<i32>(&le, "reference").unwrap(), values);

        let mut be: Vec<u8> = Vec::new();
        write_elements_be(&mut be, &values).unwrap();
        assert_eq!(&be[..4], &[0, 0, 0, 1]);
        assert_eq!(read_elements_be::<i32>(&be, "wire").unwrap(), values);
    }
}
