//! # Arith — Big-Integer Modular Primitives
//!
//! The scalar layer underneath the polynomial ring and the layered test:
//! modular exponentiation with an optional modulus, reduction of any integer
//! into `[0, n)`, and a bit-length based `log2` estimate used to bound the
//! degree search.
//!
//! Every modulus is an `Option<&Integer>`. `None` means "exact integer
//! arithmetic"; `Some(0)` is rejected with [`ArithError::DivisionByZero`]
//! rather than being read as "no modulus".

use rug::ops::{Pow, RemRounding};
use rug::Integer;

/// Errors raised by the arithmetic core.
///
/// None of these are recoverable: a failed computation aborts the current
/// candidate only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArithError {
    /// A zero modulus was supplied.
    DivisionByZero,
    /// Exact (unreduced) exponentiation with an exponent wider than `u32`.
    ExponentOverflow { bits: u32 },
    /// Exponents must be non-negative.
    NegativeExponent,
    /// The reduction polynomial has degree above the target degree, so
    /// folding would never terminate below it.
    ModulusDegree { modulus_degree: usize, degree: usize },
}

impl std::fmt::Display for ArithError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithError::DivisionByZero => write!(f, "division by zero modulus"),
            ArithError::ExponentOverflow { bits } => write!(
                f,
                "exponent of {} bits does not fit an exact power (max 32)",
                bits
            ),
            ArithError::NegativeExponent => write!(f, "negative exponent"),
            ArithError::ModulusDegree {
                modulus_degree,
                degree,
            } => write!(
                f,
                "modulus polynomial of degree {} cannot reduce to degree {}",
                modulus_degree, degree
            ),
        }
    }
}

impl std::error::Error for ArithError {}

/// Reject `Some(0)` so callers can reduce without further checks.
pub(crate) fn nonzero(modulus: Option<&Integer>) -> Result<Option<&Integer>, ArithError> {
    match modulus {
        Some(m) if m.is_zero() => Err(ArithError::DivisionByZero),
        other => Ok(other),
    }
}

/// Reduce `value` into `[0, |m|)` when a modulus is present.
pub(crate) fn reduce(value: Integer, modulus: Option<&Integer>) -> Integer {
    match modulus {
        Some(m) => value.rem_euc(m),
        None => value,
    }
}

/// `base^exponent mod modulus`, or the exact power when `modulus` is `None`.
///
/// The modular path is GMP's square-and-multiply and always returns a value
/// in `[0, |modulus|)`, also for negative `base`. The exact path needs the
/// exponent to fit a `u32`.
pub fn pow(
    base: &Integer,
    exponent: &Integer,
    modulus: Option<&Integer>,
) -> Result<Integer, ArithError> {
    if *exponent < 0 {
        return Err(ArithError::NegativeExponent);
    }
    match nonzero(modulus)? {
        Some(m) => base
            .pow_mod_ref(exponent, m)
            .map(Integer::from)
            .ok_or(ArithError::NegativeExponent),
        None => {
            let exp = exponent.to_u32().ok_or(ArithError::ExponentOverflow {
                bits: exponent.significant_bits(),
            })?;
            Ok(Integer::from(base.pow(exp)))
        }
    }
}

/// Representative of `a` in `[0, n)`, negative `a` included.
///
/// A negative `n` is treated as `|n|`.
pub fn wrap_to_range(a: &Integer, n: &Integer) -> Result<Integer, ArithError> {
    if n.is_zero() {
        return Err(ArithError::DivisionByZero);
    }
    Ok(a.clone().rem_euc(n))
}

/// `max(0, bit_length(n) - 1)`, i.e. `floor(log2 |n|)` for non-zero `n`.
pub fn bit_length_minus_one(n: &Integer) -> u32 {
    n.significant_bits().saturating_sub(1)
}
