//! # Poly — Dense Polynomials over Z and Z/nZ
//!
//! Coefficient-vector polynomials used by the ring gate of the layered test.
//! Index `i` holds the coefficient of `x^i`.
//!
//! ## Canonical Form
//!
//! A [`Poly`] never stores trailing zero coefficients. The zero polynomial is
//! the single coefficient `[0]`. Every constructor and every operation below
//! trims its result, so `==` and [`Poly::degree`] are well-defined.
//!
//! ## Quotient Ring
//!
//! [`poly_reduce`] folds a polynomial into `Z[x]/(x^(degree+1) - q(x))`, and
//! [`poly_pow`] exponentiates inside that ring modulo `m`. With
//! `degree = d - 1` and `q = [c]` this is the ring `Z_m[x]/(x^d - c)`.
//!
//! Multiplication is schoolbook convolution, `O(len(a)·len(b))`. The ring
//! degree used by the test is bounded by `log2(n)`, so operands stay short.

use rug::Integer;

use crate::arith::{self, nonzero, reduce, ArithError};

/// A dense polynomial in canonical (trailing-zero-free) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Poly {
    coeffs: Vec<Integer>,
}

impl Poly {
    /// Build a polynomial from coefficients, lowest power first.
    pub fn new(mut coeffs: Vec<Integer>) -> Self {
        while coeffs.len() > 1 && coeffs.last().is_some_and(Integer::is_zero) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(Integer::new());
        }
        Poly { coeffs }
    }

    pub fn zero() -> Self {
        Poly {
            coeffs: vec![Integer::new()],
        }
    }

    /// The multiplicative identity `[1]`.
    pub fn one() -> Self {
        Poly {
            coeffs: vec![Integer::from(1)],
        }
    }

    /// Coefficients, lowest power first. Never empty.
    pub fn coeffs(&self) -> &[Integer] {
        &self.coeffs
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    /// Index of the highest non-zero coefficient; 0 for the zero polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficient of `x^i` (zero beyond the stored length).
    pub fn coeff(&self, i: usize) -> Integer {
        self.coeffs.get(i).cloned().unwrap_or_default()
    }
}

impl<T> From<&[T]> for Poly
where
    T: Copy,
    Integer: From<T>,
{
    fn from(coeffs: &[T]) -> Self {
        Poly::new(coeffs.iter().map(|&c| Integer::from(c)).collect())
    }
}

impl<T, const N: usize> From<[T; N]> for Poly
where
    T: Copy,
    Integer: From<T>,
{
    fn from(coeffs: [T; N]) -> Self {
        Poly::from(&coeffs[..])
    }
}

impl std::fmt::Display for Poly {
    /// Highest power first, e.g. `2x^2 + 1`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (i, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            match i {
                0 => write!(f, "{}", c)?,
                1 if *c == 1 => write!(f, "x")?,
                1 => write!(f, "{}x", c)?,
                _ if *c == 1 => write!(f, "x^{}", i)?,
                _ => write!(f, "{}x^{}", c, i)?,
            }
        }
        Ok(())
    }
}

/// Product `a·b`, each accumulated coefficient reduced mod `modulus` if given.
pub fn poly_mul(a: &Poly, b: &Poly, modulus: Option<&Integer>) -> Result<Poly, ArithError> {
    let modulus = nonzero(modulus)?;
    let len = (a.len() + b.len()).saturating_sub(1).max(1);
    let mut c = vec![Integer::new(); len];
    for (i, ai) in a.coeffs.iter().enumerate() {
        if ai.is_zero() {
            continue;
        }
        for (j, bj) in b.coeffs.iter().enumerate() {
            let k = i + j;
            c[k] += Integer::from(ai * bj);
            if modulus.is_some() {
                c[k] = reduce(std::mem::take(&mut c[k]), modulus);
            }
        }
    }
    Ok(Poly::new(c))
}

/// Fold `a` down to at most `degree + 1` coefficients using
/// `x^(degree+1) ≡ q(x)`.
///
/// Terms are folded from the top down: the coefficient at `i > degree` is
/// spread over `q` shifted to `x^(i-degree-1)`, then cleared. Polynomials
/// with at most `degree` coefficients are returned as-is. Otherwise every
/// remaining coefficient is reduced mod `modulus` if given.
pub fn poly_reduce(
    a: &Poly,
    degree: usize,
    q: &Poly,
    modulus: Option<&Integer>,
) -> Result<Poly, ArithError> {
    let modulus = nonzero(modulus)?;
    if a.len() <= degree {
        return Ok(a.clone());
    }
    let q_degree = q.degree();
    if q_degree > degree {
        return Err(ArithError::ModulusDegree {
            modulus_degree: q_degree,
            degree,
        });
    }

    let mut b = a.coeffs.clone();
    for i in (degree + 1..b.len()).rev() {
        if b[i].is_zero() {
            continue;
        }
        let lead = std::mem::take(&mut b[i]);
        // q's leading term lands here; lower terms follow downward
        let top = i - 1 - degree + q_degree;
        for (j, qk) in (0..=top).rev().zip(q.coeffs.iter().rev()) {
            b[j] += Integer::from(&lead * qk);
        }
    }

    b.truncate(degree + 1);
    let c = b.into_iter().map(|v| reduce(v, modulus)).collect();
    Ok(Poly::new(c))
}

/// `a^k` in `Z_m[x]/(x^(degree+1) - q(x))` by binary exponentiation.
///
/// `k = 0` gives `[1]`. With `m = None` coefficients grow without bound.
pub fn poly_pow(
    a: &Poly,
    k: &Integer,
    m: Option<&Integer>,
    degree: usize,
    q: &Poly,
) -> Result<Poly, ArithError> {
    if *k < 0 {
        return Err(ArithError::NegativeExponent);
    }
    let m = nonzero(m)?;
    let mut result = Poly::one();
    let mut base = a.clone();
    let bits = k.significant_bits();
    for i in 0..bits {
        if k.get_bit(i) {
            result = poly_reduce(&poly_mul(&base, &result, m)?, degree, q, m)?;
        }
        if i + 1 < bits {
            base = poly_reduce(&poly_mul(&base, &base, m)?, degree, q, m)?;
        }
    }
    tracing::trace!(bits, degree, len = result.len(), "poly_pow done");
    Ok(result)
}

/// `p(x)`, reduced mod `modulus` at the end if given.
///
/// Each non-zero term is `p[i]·x^i` with `x^i` from [`arith::pow`]; without a
/// modulus that power is exact and `i` must fit a `u32`.
pub fn poly_eval(p: &Poly, x: &Integer, modulus: Option<&Integer>) -> Result<Integer, ArithError> {
    let modulus = nonzero(modulus)?;
    let mut sum = p.coeffs[0].clone();
    for (i, c) in p.coeffs.iter().enumerate().skip(1) {
        if c.is_zero() {
            continue;
        }
        let exp = u32::try_from(i).map_err(|_| ArithError::ExponentOverflow {
            bits: usize::BITS - i.leading_zeros(),
        })?;
        let power = arith::pow(x, &Integer::from(exp), modulus)?;
        sum += power * c;
    }
    Ok(reduce(sum, modulus))
}

/// Highest index with a non-zero coefficient (0 if all zero).
pub fn poly_degree(p: &Poly) -> usize {
    p.degree()
}
