use crate::element::Element;
use crate::matrix::Matrix;
use crate::{EngineError, EngineResult};

/// An n×2n grid where line i of the source sits at column offset i.
///
/// Reading the grid column by column delivers each source line one cycle
/// later than the line above it, which is the staggered feed a systolic
/// array needs for its operands to meet on the diagonal wavefront.
#[derive(Debug, Clone, PartialEq)]
pub struct SkewedGrid<T> {
    n: usize,
    cells: Vec<T>,
}

impl<T: Element> SkewedGrid<T> {
    pub(crate) fn zeros(n: usize) -> Self {
        Self {
            n,
            cells: vec![T::zero(); n * 2 * n],
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of time steps (columns), always 2n
    pub fn width(&self) -> usize {
        2 * self.n
    }

    pub fn get(&self, row: usize, step: usize) -> T {
        self.cells[row * self.width() + step]
    }

    pub(crate) fn set(&mut self, row: usize, step: usize, value: T) {
        let width = self.width();
        self.cells[row * width + step] = value;
    }

    pub fn row(&self, i: usize) -> &[T] {
        let width = self.width();
        &self.cells[i * width..(i + 1) * width]
    }

    /// Values presented to every array row at time step `step`, top row first
    pub fn column(&self, step: usize) -> impl DoubleEndedIterator<Item = T> + '_ {
        (0..self.n).map(move |row| self.get(row, step))
    }

    /// Recover the matrix whose rows were skewed by [`skew_rows`]
    pub fn unskew_rows(&self) -> EngineResult<Matrix<T>> {
        self.ensure_zero_padding()?;
        let data = (0..self.n)
            .flat_map(|i| self.row(i)[i..i + self.n].iter().copied())
            .collect();
        Matrix::from_row_major(self.n, data)
    }

    /// Recover the matrix whose columns were skewed by [`skew_columns`]
    pub fn unskew_columns(&self) -> EngineResult<Matrix<T>> {
        self.ensure_zero_padding()?;
        let n = self.n;
        let data = (0..n)
            .flat_map(|r| (0..n).map(move |c| (r, c)))
            .map(|(r, c)| self.get(c, c + r))
            .collect();
        Matrix::from_row_major(n, data)
    }

    fn ensure_zero_padding(&self) -> EngineResult<()> {
        for i in 0..self.n {
            for (step, value) in self.row(i).iter().enumerate() {
                let in_window = step >= i && step < i + self.n;
                if !in_window && *value != T::zero() {
                    return Err(EngineError::MalformedStream {
                        stream: "wire",
                        reason: format!("non-zero padding at row {}, step {}", i, step),
                    });
                }
            }
        }
        Ok(())
    }
}

fn skew_lines<T, F, I>(n: usize, line: F) -> SkewedGrid<T>
where
    T: Element,
    F: Fn(usize) -> I,
    I: Iterator<Item = T>,
{
    let mut grid = SkewedGrid::zeros(n);
    for i in 0..n {
        for (j, value) in line(i).enumerate() {
            grid.set(i, i + j, value);
        }
    }
    grid
}

/// Row i of `a` becomes i zeros, the row itself, then n - i zeros.
pub fn skew_rows<T: Element>(a: &Matrix<T>) -> SkewedGrid<T> {
    skew_lines(a.n(), |i| a.row(i).iter().copied())
}

/// Same staggering as [`skew_rows`], but line i is column i of `b`.
pub fn skew_columns<T: Element>(b: &Matrix<T>) -> SkewedGrid<T> {
    skew_lines(b.n(), |i| b.column(i))
}
