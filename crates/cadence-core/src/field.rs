//! Prime-field arithmetic GF(p) for the sketch code.
//!
//! Elements are `u32` values in `0..p`. The modulus never exceeds 251, so
//! every product of two reduced elements fits in a `u32`.

use std::num::NonZeroU32;

use crate::error::FuzzyError;

/// The prime field GF(p).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimeField {
    modulus: NonZeroU32,
}

impl PrimeField {
    /// Largest modulus accepted; keeps elements byte-sized.
    pub const MAX_MODULUS: u32 = 251;

    /// Create GF(`modulus`).
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidParameters`] if `modulus` is not a prime
    /// in `2..=MAX_MODULUS`.
    pub fn new(modulus: u32) -> Result<Self, FuzzyError> {
        if modulus > Self::MAX_MODULUS || !is_prime(modulus) {
            return Err(FuzzyError::InvalidParameters(format!(
                "field modulus {modulus} is not a prime in 2..={}",
                Self::MAX_MODULUS
            )));
        }
        let modulus = NonZeroU32::new(modulus)
            .ok_or_else(|| FuzzyError::InvalidParameters("field modulus is zero".into()))?;
        Ok(Self { modulus })
    }

    /// The prime `p`.
    #[must_use]
    pub const fn modulus(&self) -> u32 {
        self.modulus.get()
    }

    /// Reduce an arbitrary `u32` into `0..p`.
    #[must_use]
    pub fn reduce(&self, x: u32) -> u32 {
        x % self.modulus
    }

    /// `a + b mod p`.
    #[must_use]
    pub fn add(&self, a: u32, b: u32) -> u32 {
        self.reduce(a.wrapping_add(b))
    }

    /// `a - b mod p`. Both operands must already be reduced.
    #[must_use]
    pub fn sub(&self, a: u32, b: u32) -> u32 {
        self.reduce(a.wrapping_add(self.modulus()).wrapping_sub(b))
    }

    /// `-a mod p`.
    #[must_use]
    pub fn neg(&self, a: u32) -> u32 {
        self.sub(0, self.reduce(a))
    }

    /// `a * b mod p`. Both operands must already be reduced.
    #[must_use]
    pub fn mul(&self, a: u32, b: u32) -> u32 {
        self.reduce(a.wrapping_mul(b))
    }

    /// `base^exp mod p` by square-and-multiply.
    #[must_use]
    pub fn pow(&self, base: u32, mut exp: u32) -> u32 {
        let mut acc = 1;
        let mut square = self.reduce(base);
        while exp > 0 {
            if exp & 1 == 1 {
                acc = self.mul(acc, square);
            }
            square = self.mul(square, square);
            exp >>= 1;
        }
        self.reduce(acc)
    }

    /// Multiplicative inverse via Fermat's little theorem; `None` for zero.
    #[must_use]
    pub fn inv(&self, a: u32) -> Option<u32> {
        let a = self.reduce(a);
        if a == 0 {
            return None;
        }
        Some(self.pow(a, self.modulus().saturating_sub(2)))
    }

    /// Evaluate `poly` (coefficients lowest degree first) at `x` by Horner's rule.
    #[must_use]
    pub fn eval(&self, poly: &[u32], x: u32) -> u32 {
        poly.iter()
            .rev()
            .fold(0, |acc, &c| self.add(self.mul(acc, x), c))
    }

    /// Polynomial long division `num / den`, returning `(quotient, remainder)`.
    ///
    /// Trailing zero coefficients of `den` are ignored. Returns `None` if
    /// `den` is the zero polynomial.
    #[must_use]
    pub fn poly_div(&self, num: &[u32], den: &[u32]) -> Option<(Vec<u32>, Vec<u32>)> {
        let den_len = den.iter().rposition(|&c| c != 0)?.checked_add(1)?;
        let den = &den[..den_len];
        let lead_inv = self.inv(den[den_len.checked_sub(1)?])?;

        let mut rem = num.to_vec();
        if rem.len() < den_len {
            return Some((Vec::new(), rem));
        }
        let quot_len = rem.len().checked_sub(den_len)?.checked_add(1)?;
        let mut quot = vec![0u32; quot_len];

        for shift in (0..quot_len).rev() {
            let top = rem[shift.checked_add(den_len)?.checked_sub(1)?];
            if top == 0 {
                continue;
            }
            let factor = self.mul(top, lead_inv);
            quot[shift] = factor;
            for (offset, &d) in den.iter().enumerate() {
                let slot = &mut rem[shift.checked_add(offset)?];
                *slot = self.sub(*slot, self.mul(factor, d));
            }
        }
        rem.truncate(den_len.saturating_sub(1));
        Some((quot, rem))
    }
}

/// Trial-division primality test (moduli here are tiny).
#[must_use]
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u32;
    while d.checked_mul(d).is_some_and(|sq| sq <= n) {
        if n.checked_rem(d) == Some(0) {
            return false;
        }
        d = d.saturating_add(1);
    }
    true
}

/// Smallest prime `>= n`.
#[must_use]
pub fn smallest_prime_at_least(n: u32) -> u32 {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(1);
    }
    candidate
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
