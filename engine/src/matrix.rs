use crate::element::{Element, ElementKind};
use crate::{EngineError, EngineResult};

/// Square matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<T: Element> Matrix<T> {
    /// Build an n×n matrix from its rows, rejecting empty or ragged input
    pub fn from_rows(rows: Vec<Vec<T>>) -> EngineResult<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(EngineError::InvalidShape {
                expected: "at least one row".to_string(),
                actual: "empty matrix".to_string(),
            });
        }

        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(EngineError::InvalidShape {
                    expected: format!("{}x{} square matrix", n, n),
                    actual: format!("row {} has {} columns", i, row.len()),
                });
            }
            data.extend(row);
        }

        Ok(Self { n, data })
    }

    /// Build an n×n matrix from a flat row-major buffer
    pub fn from_row_major(n: usize, data: Vec<T>) -> EngineResult<Self> {
        if n == 0 || data.len() != n * n {
            return Err(EngineError::InvalidShape {
                expected: format!("{} elements for a {}x{} matrix", n * n, n, n),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { n, data })
    }

    pub fn zeros(n: usize) -> EngineResult<Self> {
        Self::from_row_major(n, vec![T::zero(); n * n])
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn kind(&self) -> ElementKind {
        T::KIND
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.n + col]
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn column(&self, j: usize) -> impl DoubleEndedIterator<Item = T> + '_ {
        self.data.iter().skip(j).step_by(self.n).copied()
    }

    pub fn as_row_major(&self) -> &[T] {
        &self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data.chunks(self.n).map(|row| row.to_vec()).collect()
    }
}

/// The two operands of one run, tagged by element type.
///
/// Integer and float runs never mix; holding both operands in one variant
/// makes that a type-level guarantee.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixPair {
    Int32(Matrix<i32>, Matrix<i32>),
    Float32(Matrix<f32>, Matrix<f32>),
}

impl MatrixPair {
    pub fn int32(a: Matrix<i32>, b: Matrix<i32>) -> EngineResult<Self> {
        ensure_same_size(&a, &b)?;
        Ok(MatrixPair::Int32(a, b))
    }

    pub fn float32(a: Matrix<f32>, b: Matrix<f32>) -> EngineResult<Self> {
        ensure_same_size(&a, &b)?;
        Ok(MatrixPair::Float32(a, b))
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            MatrixPair::Int32(..) => ElementKind::Int32,
            MatrixPair::Float32(..) => ElementKind::Float32,
        }
    }

    pub fn n(&self) -> usize {
        match self {
            MatrixPair::Int32(a, _) => a.n(),
            MatrixPair::Float32(a, _) => a.n(),
        }
    }
}

pub(crate) fn ensure_same_size<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> EngineResult<()> {
    if a.n() != b.n() {
        return Err(EngineError::InvalidShape {
            expected: format!("operands of equal size ({}x{})", a.n(), a.n()),
            actual: format!("B is {}x{}", b.n(), b.n()),
        });
    }
    Ok(())
}
