/// Dense `R × C` matrix of `f64`, stored row-major.
///
/// The shape is part of the type, so a matrix can never change shape after
/// construction. Elementwise transforms go through [`Matrix::map`]; there is
/// no implicit broadcasting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const R: usize, const C: usize> {
    rows: [[f64; C]; R],
}

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const R: usize, const C: usize> Matrix<R, C> {
    pub const ZERO: Self = Self {
        rows: [[0.0; C]; R],
    };

    #[must_use]
    pub const fn from_rows(rows: [[f64; C]; R]) -> Self {
        Self { rows }
    }

    /// Builds a matrix by calling `f(row, col)` for every entry in row-major order.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut rows = [[0.0; C]; R];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = f(r, c);
            }
        }
        Self { rows }
    }

    #[must_use]
    pub const fn rows(&self) -> &[[f64; C]; R] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row)?.get(col).copied()
    }

    /// Applies `f` to every entry, producing a new matrix.
    #[must_use]
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        Self::from_fn(|r, c| f(self.rows[r][c]))
    }

    /// Matrix-vector product `self · v`.
    #[must_use]
    pub fn mul_vec(&self, v: &[f64; C]) -> [f64; R] {
        let mut out = [0.0; R];
        for (o, row) in out.iter_mut().zip(&self.rows) {
            *o = row.iter().zip(v).map(|(w, x)| w * x).sum();
        }
        out
    }

    /// Iterates over all entries in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flatten().copied()
    }
}

/// Applies `f` to every entry of a vector, producing a new vector.
#[must_use]
pub fn map_vec<const N: usize, F>(v: &[f64; N], f: F) -> [f64; N]
where
    F: FnMut(f64) -> f64,
{
    v.map(f)
}

/// Elementwise sum of two vectors.
#[must_use]
pub fn add_vec<const N: usize>(a: &[f64; N], b: &[f64; N]) -> [f64; N] {
    let mut out = *a;
    for (o, x) in out.iter_mut().zip(b) {
        *o += x;
    }
    out
}
