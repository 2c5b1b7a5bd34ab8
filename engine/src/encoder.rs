use std::io::{Cursor, Write};

use tracing::debug;

use crate::element::{Element, ElementKind};
use crate::matrix::{ensure_same_size, Matrix, MatrixPair};
use crate::skew::{skew_columns, skew_rows, SkewedGrid};
use crate::wire::{ensure_len, frame_len, reference_len, write_elements_le};
use crate::EngineResult;

/// Input and golden-output streams for one simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStreams {
    pub n: usize,
    pub kind: ElementKind,
    /// Skewed operands in feed order, big-endian
    pub wire_frame: Vec<u8>,
    /// A·B row-major, little-endian
    pub reference: Vec<u8>,
}

pub fn encode(pair: &MatrixPair) -> EngineResult<EncodedStreams> {
    match pair {
        MatrixPair::Int32(a, b) => encode_matrices(a, b),
        MatrixPair::Float32(a, b) => encode_matrices(a, b),
    }
}

/// Encode both streams and hand them to the caller's sinks.
///
/// Everything is computed in memory first, so a shape error leaves both sinks
/// untouched.
pub fn encode_to<W1: Write, W2: Write>(
    pair: &MatrixPair,
    mut wire_sink: W1,
    mut reference_sink: W2,
) -> EngineResult<EncodedStreams> {
    let streams = encode(pair)?;
    wire_sink.write_all(&streams.wire_frame)?;
    wire_sink.flush()?;
    reference_sink.write_all(&streams.reference)?;
    reference_sink.flush()?;
    Ok(streams)
}

pub fn encode_matrices<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> EngineResult<EncodedStreams> {
    ensure_same_size(a, b)?;
    let n = a.n();

    let a_skew = skew_rows(a);
    let b_skew = skew_columns(b);

    let mut wire_frame = Vec::with_capacity(frame_len(n, T::KIND));
    write_wire_frame(&a_skew, &b_skew, &mut wire_frame)?;

    let product = reference_product(a, b)?;
    let mut reference = Vec::with_capacity(reference_len(n, T::KIND));
    write_elements_le(&mut reference, product.as_row_major())?;

    debug!(
        n,
        kind = T::KIND.name(),
        wire_bytes = wire_frame.len(),
        reference_bytes = reference.len(),
        "encoded operands"
    );

    Ok(EncodedStreams {
        n,
        kind: T::KIND,
        wire_frame,
        reference,
    })
}

/// Emit the skewed grids one time step at a time.
///
/// Each step carries column t of A's grid then column t of B's grid, both
/// bottom row first: the array numbers its physical rows opposite to the
/// matrix's logical rows.
pub fn write_wire_frame<T: Element, W: Write>(
    a_skew: &SkewedGrid<T>,
    b_skew: &SkewedGrid<T>,
    out: &mut W,
) -> EngineResult<()> {
    for step in 0..a_skew.width() {
        for value in a_skew.column(step).rev() {
            value.write_be(out)?;
        }
        for value in b_skew.column(step).rev() {
            value.write_be(out)?;
        }
    }
    Ok(())
}

/// Parse a wire frame back into the two skewed grids it was built from.
pub fn decode_wire_frame<T: Element>(
    bytes: &[u8],
    n: usize,
) -> EngineResult<(SkewedGrid<T>, SkewedGrid<T>)> {
    ensure_len(bytes, frame_len(n, T::KIND), "wire")?;

    let mut a_skew = SkewedGrid::zeros(n);
    let mut b_skew = SkewedGrid::zeros(n);
    let mut cursor = Cursor::new(bytes);
    for step in 0..2 * n {
        for row in (0..n).rev() {
            a_skew.set(row, step, T::read_be(&mut cursor)?);
        }
        for row in (0..n).rev() {
            b_skew.set(row, step, T::read_be(&mut cursor)?);
        }
    }
    Ok((a_skew, b_skew))
}

/// Exact A·B with wide accumulation, narrowed to the operand type.
pub fn reference_product<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> EngineResult<Matrix<T>> {
    ensure_same_size(a, b)?;
    let n = a.n();
    let data = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| T::dot(a.row(i).iter().copied().zip(b.column(j))))
        .collect();
    Matrix::from_row_major(n, data)
}
