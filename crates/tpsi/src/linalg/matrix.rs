use crate::{Error, Result};
use ndarray::{s, Array2, Axis};
use num_bigint::BigUint;
use std::ops::Range;
use tpsi_traits::ThresholdScheme;

/// A matrix of ciphertexts with a fixed shape.
///
/// Operations never modify a matrix in place; they return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct EncryptedMatrix<C> {
    data: Array2<C>,
}

impl<C: Clone> EncryptedMatrix<C> {
    /// Create a matrix from its entries in row-major order.
    pub fn from_vec(rows: usize, cols: usize, entries: Vec<C>) -> Result<Self> {
        let found = entries.len();
        let data = Array2::from_shape_vec((rows, cols), entries)
            .map_err(|_| Error::TooFewValues(found, rows * cols))?;
        Ok(Self { data })
    }

    /// Wrap an array of ciphertexts.
    pub fn from_array(data: Array2<C>) -> Self {
        Self { data }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Shape of the matrix.
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Entry at row `i` and column `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<&C> {
        self.data.get((i, j))
    }

    /// Row `i` as a vector.
    pub fn row(&self, i: usize) -> Vec<C> {
        self.data.row(i).to_vec()
    }

    /// All the entries in row-major order.
    pub fn to_vec(&self) -> Vec<C> {
        self.data.iter().cloned().collect()
    }

    /// The underlying array.
    pub fn as_array(&self) -> &Array2<C> {
        &self.data
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.t().to_owned(),
        }
    }

    /// The block of rows `rows` and columns `cols`.
    pub fn block(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self> {
        if rows.start > rows.end
            || cols.start > cols.end
            || rows.end > self.rows()
            || cols.end > self.cols()
        {
            return Err(tpsi_math::Error::DimensionMismatch {
                expected: self.dim(),
                found: (rows.end, cols.end),
            }
            .into());
        }
        Ok(Self {
            data: self.data.slice(s![rows, cols]).to_owned(),
        })
    }

    /// Concatenate matrices with the same number of rows, left to right.
    pub fn hstack(blocks: &[Self]) -> Result<Self> {
        let views = blocks.iter().map(|b| b.data.view()).collect::<Vec<_>>();
        let data = ndarray::concatenate(Axis(1), &views).map_err(|_| {
            let first = blocks.first().map(Self::dim).unwrap_or((0, 0));
            let found = blocks
                .iter()
                .map(Self::dim)
                .find(|d| d.0 != first.0)
                .unwrap_or(first);
            Error::from(tpsi_math::Error::DimensionMismatch {
                expected: first,
                found,
            })
        })?;
        Ok(Self { data })
    }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(tpsi_math::Error::DimensionMismatch {
                expected: self.dim(),
                found: other.dim(),
            }
            .into());
        }
        Ok(())
    }

    /// Entry-wise homomorphic addition.
    pub fn add<S: ThresholdScheme<Ciphertext = C>>(
        &self,
        other: &Self,
        scheme: &S,
    ) -> Result<Self> {
        self.check_same_shape(other)?;
        Ok(Self {
            data: Array2::from_shape_fn(self.dim(), |ij| {
                scheme.add(&self.data[ij], &other.data[ij])
            }),
        })
    }

    /// Entry-wise homomorphic subtraction.
    pub fn sub<S: ThresholdScheme<Ciphertext = C>>(
        &self,
        other: &Self,
        scheme: &S,
    ) -> Result<Self> {
        self.check_same_shape(other)?;
        Ok(Self {
            data: Array2::from_shape_fn(self.dim(), |ij| {
                scheme.sub(&self.data[ij], &other.data[ij])
            }),
        })
    }

    /// Entry-wise homomorphic negation.
    pub fn neg<S: ThresholdScheme<Ciphertext = C>>(&self, scheme: &S) -> Self {
        Self {
            data: self.data.map(|c| scheme.negate(c)),
        }
    }

    /// Multiplication by a public scalar.
    pub fn scale<S: ThresholdScheme<Ciphertext = C>>(&self, k: &BigUint, scheme: &S) -> Self {
        Self {
            data: self.data.map(|c| scheme.scale(c, k)),
        }
    }

    /// Product `self · p` with a plaintext matrix `p`.
    pub fn mul_plain_right<S: ThresholdScheme<Ciphertext = C>>(
        &self,
        p: &Array2<BigUint>,
        scheme: &S,
    ) -> Result<Self> {
        let (r, s) = self.dim();
        let (s2, t) = p.dim();
        if s != s2 || s == 0 {
            return Err(tpsi_math::Error::DimensionMismatch {
                expected: (s, t),
                found: (s2, t),
            }
            .into());
        }
        Ok(Self {
            data: Array2::from_shape_fn((r, t), |(i, j)| {
                (1..s).fold(scheme.scale(&self.data[(i, 0)], &p[(0, j)]), |acc, l| {
                    scheme.add(&acc, &scheme.scale(&self.data[(i, l)], &p[(l, j)]))
                })
            }),
        })
    }
}
