//! Evaluation-form Reed–Solomon code over GF(p) with a Berlekamp–Welch
//! bounded-distance decoder.
//!
//! A message of `k` field elements is read as the coefficients of a
//! polynomial `f` of degree `< k`; its codeword is `(f(0), f(1), .., f(n-1))`.
//! The code has minimum distance `n - k + 1` and the decoder corrects up to
//! `(n - k) / 2` symbol errors. Beyond that radius it either reports failure
//! or, rarely, lands on a different codeword (miscorrection).

use crate::error::FuzzyError;
use crate::field::PrimeField;

/// A Reed–Solomon code `RS[n, k]` over a prime field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReedSolomon {
    field: PrimeField,
    length: usize,
    dimension: usize,
}

impl ReedSolomon {
    /// Create `RS[length, dimension]` over `field`.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidParameters`] if the field has fewer than
    /// `length` distinct evaluation points or `dimension` is not in
    /// `1..=length`.
    pub fn new(field: PrimeField, length: usize, dimension: usize) -> Result<Self, FuzzyError> {
        let points = usize::try_from(field.modulus()).unwrap_or(usize::MAX);
        if length > points {
            return Err(FuzzyError::InvalidParameters(format!(
                "code length {length} exceeds the {points} evaluation points of GF({points})"
            )));
        }
        if dimension == 0 || dimension > length {
            return Err(FuzzyError::InvalidParameters(format!(
                "code dimension {dimension} outside 1..={length}"
            )));
        }
        Ok(Self {
            field,
            length,
            dimension,
        })
    }

    /// The underlying field.
    #[must_use]
    pub const fn field(&self) -> &PrimeField {
        &self.field
    }

    /// Codeword length `n`.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Message length `k`.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Guaranteed correction radius `(n - k) / 2`.
    #[must_use]
    pub const fn correction_radius(&self) -> usize {
        self.length.saturating_sub(self.dimension) / 2
    }

    /// Encode `message` (exactly `k` reduced elements) into a codeword.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::ConfigurationMismatch`] on a wrong message length.
    pub fn encode(&self, message: &[u32]) -> Result<Vec<u32>, FuzzyError> {
        if message.len() != self.dimension {
            return Err(FuzzyError::ConfigurationMismatch(format!(
                "message has {} symbols (expected {})",
                message.len(),
                self.dimension
            )));
        }
        Ok(self.evaluate(message))
    }

    /// Decode `received` to the unique codeword within the correction radius.
    ///
    /// Returns `None` when no codeword lies within `(n - k) / 2` symbols, or
    /// when `received` has the wrong length or unreduced symbols.
    #[must_use]
    pub fn decode(&self, received: &[u32]) -> Option<Vec<u32>> {
        let p = self.field.modulus();
        if received.len() != self.length || received.iter().any(|&y| y >= p) {
            return None;
        }

        let radius = self.correction_radius();
        let q_len = self.dimension.checked_add(radius)?;
        let unknowns = q_len.checked_add(radius)?;

        // Q(x_i) - y_i * (E(x_i) - x_i^t) = y_i * x_i^t, with E monic of degree t.
        let mut rows = Vec::with_capacity(self.length);
        for (x, &y) in (0u32..).zip(received) {
            let mut row = Vec::with_capacity(unknowns.checked_add(1)?);
            let mut power = 1;
            for _ in 0..q_len {
                row.push(power);
                power = self.field.mul(power, x);
            }
            let mut power = 1;
            for _ in 0..radius {
                row.push(self.field.neg(self.field.mul(y, power)));
                power = self.field.mul(power, x);
            }
            row.push(self.field.mul(y, power));
            rows.push(row);
        }

        let solution = solve(&self.field, rows, unknowns)?;
        let (q_coeffs, e_coeffs) = solution.split_at(q_len);
        let mut locator = e_coeffs.to_vec();
        locator.push(1);

        let (mut message, remainder) = self.field.poly_div(q_coeffs, &locator)?;
        if remainder.iter().any(|&c| c != 0) {
            return None;
        }
        message.resize(self.dimension, 0);

        let codeword = self.evaluate(&message);
        let agreements = codeword
            .iter()
            .zip(received)
            .filter(|(c, y)| c == y)
            .count();
        if agreements < self.length.saturating_sub(radius) {
            return None;
        }
        Some(codeword)
    }

    fn evaluate(&self, poly: &[u32]) -> Vec<u32> {
        (0u32..)
            .take(self.length)
            .map(|x| self.field.eval(poly, x))
            .collect()
    }
}

/// Gauss–Jordan elimination on an augmented matrix (`unknowns + 1` columns).
///
/// Free variables are set to zero. Returns `None` if the system is
/// inconsistent.
fn solve(field: &PrimeField, mut rows: Vec<Vec<u32>>, unknowns: usize) -> Option<Vec<u32>> {
    let mut pivot_cols = Vec::with_capacity(unknowns);

    for col in 0..unknowns {
        let rank = pivot_cols.len();
        if rank == rows.len() {
            break;
        }
        let Some(found) = (rank..rows.len()).find(|&r| rows[r][col] != 0) else {
            continue;
        };
        rows.swap(rank, found);

        let inv = field.inv(rows[rank][col])?;
        for cell in &mut rows[rank][col..] {
            *cell = field.mul(*cell, inv);
        }
        let pivot = rows[rank].clone();

        for (r, row) in rows.iter_mut().enumerate() {
            if r == rank {
                continue;
            }
            let factor = row[col];
            if factor == 0 {
                continue;
            }
            for (cell, &pv) in row[col..].iter_mut().zip(&pivot[col..]) {
                *cell = field.sub(*cell, field.mul(factor, pv));
            }
        }
        pivot_cols.push(col);
    }

    let rank = pivot_cols.len();
    if rows[rank..].iter().any(|row| row[unknowns] != 0) {
        return None;
    }

    let mut solution = vec![0u32; unknowns];
    for (row, &col) in rows.iter().zip(&pivot_cols) {
        solution[col] = row[unknowns];
    }
    Some(solution)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
